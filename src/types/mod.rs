// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

//! # Types Module
//!
//! This module provides the wire data structures exchanged between the deposit tree and external
//! components. The types defined in this module implement custom `to_ssz_bytes` and
//! `from_ssz_bytes` methods to handle their serialization and deserialization. This is to reduce
//! dependencies on external libraries.
//!
//! ## Sub-modules
//!
//! - `snapshot`: This sub-module contains the compact serialized form of a finalized deposit
//!   tree.
//!
//! For more detailed information, users should refer to the specific documentation for each
//! sub-module.

pub mod error;
pub mod snapshot;
pub mod utils;

/// Length of a bytes32 array.
pub const BYTES_32_LEN: usize = 32;

/// Length of u64 in bytes.
pub const U64_LEN: usize = (u64::BITS / 8) as usize;

/// A 32-byte array.
pub type Bytes32 = [u8; BYTES_32_LEN];
