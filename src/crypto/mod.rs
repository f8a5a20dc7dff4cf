// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

//! # Cryptographic Utilities for the Deposit Tree
//!
//! This module contains the cryptographic utilities used while maintaining the deposit tree.
//!
//! ## Sub-modules
//!
//! - `hash`: This sub-module contains the `HashValue` structure and the SHA-256 helpers used to
//!   combine tree nodes. The helpers are infallible, so the module carries no error type.

pub mod hash;
