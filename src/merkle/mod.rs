// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

//! # Merkle Tree
//!
//! This module provides the utilities to create and manipulate the incremental Merkle tree
//! maintained over the deposits of the Ethereum deposit contract. The tree is a fixed-depth
//! binary tree where each leaf node is the hash of a deposit and each internal node is the hash
//! of its children. Leaves are appended one at a time, filling the leftmost empty position, and
//! a prefix of leaves that became irreversibly final can be collapsed to single hash nodes.
//!
//! ## Sub-modules
//!
//! - `error`: This sub-module contains the error types that can be returned by the Merkle Tree
//!   utilities.
//! - `node`: This sub-module contains the recursive node representation of the tree and the
//!   algorithms operating on it.
//! - `tree`: This sub-module contains the `DepositTree` structure wrapping the root node,
//!   exposing appends, finalization and the snapshot round-trip.

use crate::crypto::hash::{sha2_hash_concat, HashValue};
use crate::types::{BYTES_32_LEN, U64_LEN};
use std::sync::OnceLock;

pub mod error;
pub mod node;
pub mod tree;

/// Depth of the Merkle tree maintained by the Ethereum deposit contract.
pub const DEPOSIT_CONTRACT_DEPTH: u32 = 32;

/// Maximum number of deposits the contract tree can hold.
pub const MAX_DEPOSIT_COUNT: u64 = 1 << DEPOSIT_CONTRACT_DEPTH;

/// Returns the root of an all-empty subtree of the given depth.
///
/// The values follow the zero-hash ladder `z[0] = 0^32, z[i] = sha256(z[i-1] || z[i-1])` used by
/// the deposit contract to pad unfilled positions. The ladder is computed once and cached.
///
/// # Arguments
///
/// * `depth` - The depth of the empty subtree. Must be at most [`DEPOSIT_CONTRACT_DEPTH`].
///
/// # Returns
///
/// The root of an empty subtree of the given depth.
pub fn zero_hash(depth: u32) -> HashValue {
    static ZERO_HASHES: OnceLock<[HashValue; (DEPOSIT_CONTRACT_DEPTH + 1) as usize]> =
        OnceLock::new();

    ZERO_HASHES.get_or_init(|| {
        let mut hashes = [HashValue::default(); (DEPOSIT_CONTRACT_DEPTH + 1) as usize];
        for depth in 1..hashes.len() {
            hashes[depth] = sha2_hash_concat(&hashes[depth - 1], &hashes[depth - 1]);
        }
        hashes
    })[depth as usize]
}

/// Mixes a base hash with the number of elements it commits to. Used in SSZ Merkleization for
/// lists with a variable number of elements.
///
/// # Arguments
///
/// * `base_hash` - The base hash to mix.
/// * `length` - The number of elements committed to by `base_hash`.
///
/// # Returns
///
/// The mixed hash.
pub fn mix_in_length(base_hash: &HashValue, length: u64) -> HashValue {
    let mut length_bytes = [0; BYTES_32_LEN];
    length_bytes[0..U64_LEN].copy_from_slice(&length.to_le_bytes());

    sha2_hash_concat(base_hash, &HashValue::new(length_bytes))
}
