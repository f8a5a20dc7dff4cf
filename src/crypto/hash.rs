// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

use getset::Getters;
use sha2::{Digest, Sha256};

/// Length of hash digests in bytes.
pub const HASH_LENGTH: usize = 32;

/// A 32-byte hash, as produced by SHA-256.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Getters, Hash)]
pub struct HashValue {
    #[getset(get = "pub(crate)")]
    hash: [u8; HASH_LENGTH],
}

impl HashValue {
    /// Wraps a raw 32-byte digest.
    pub const fn new(hash: [u8; HASH_LENGTH]) -> Self {
        HashValue { hash }
    }
}

impl AsRef<[u8; HASH_LENGTH]> for HashValue {
    fn as_ref(&self) -> &[u8; HASH_LENGTH] {
        &self.hash
    }
}

/// Hashes the input data using SHA-256.
///
/// # Arguments
///
/// * `input` - The input data to hash.
///
/// # Returns
///
/// A `HashValue` representing the SHA-256 hash of the input data.
pub fn sha2_hash(input: &[u8]) -> HashValue {
    HashValue::new(Sha256::digest(input).into())
}

/// Hashes the concatenation of two hash values, as done to compute the parent of two nodes in a
/// binary Merkle tree.
///
/// # Arguments
///
/// * `a` - The left hash value.
/// * `b` - The right hash value.
///
/// # Returns
///
/// A `HashValue` representing the SHA-256 hash of `a || b`.
pub fn sha2_hash_concat(a: &HashValue, b: &HashValue) -> HashValue {
    let mut hasher = Sha256::new();
    hasher.update(a.as_ref());
    hasher.update(b.as_ref());
    HashValue::new(hasher.finalize().into())
}
