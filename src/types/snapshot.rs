// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

//! # Deposit Tree Snapshot
//!
//! This module contains the compact serialized form of a finalized deposit tree: the
//! left-to-right spine of finalized subtree roots, the root and number of deposits they commit
//! to, and the execution block at which finalization happened. A snapshot is the minimum
//! information needed to reconstruct the finalized portion of a tree and continue appending new
//! deposits to it.

use crate::crypto::hash::{sha2_hash_concat, HashValue};
use crate::deserialization_error;
use crate::merkle::error::MerkleError;
use crate::merkle::{mix_in_length, zero_hash, DEPOSIT_CONTRACT_DEPTH, MAX_DEPOSIT_COUNT};
use crate::types::error::TypesError;
use crate::types::utils::{extract_bytes32, extract_u32, extract_u64, OFFSET_BYTE_LENGTH};
use crate::types::{Bytes32, BYTES_32_LEN, U64_LEN};
use anyhow::Result;
use getset::{CopyGetters, Getters};

/// Length in bytes of the fixed-size part of a serialized `DepositTreeSnapshot`.
pub const DEPOSIT_TREE_SNAPSHOT_BASE_BYTES_LEN: usize =
    OFFSET_BYTE_LENGTH + BYTES_32_LEN + U64_LEN + BYTES_32_LEN + U64_LEN;

/// Maximum number of hashes in the finalized spine of a snapshot.
pub const MAX_FINALIZED_SPINE_LEN: usize = DEPOSIT_CONTRACT_DEPTH as usize;

/// `DepositTreeSnapshot` commits to the finalized portion of a deposit tree. Deposits pushed
/// after the finalized prefix are not part of a snapshot and have to be replayed after
/// restoring from it.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct DepositTreeSnapshot {
    /// Roots of the finalized subtrees, left to right.
    #[getset(get = "pub")]
    finalized: Vec<Bytes32>,
    /// Root of the finalized portion of the tree, including the mixed-in deposit count.
    #[getset(get = "pub")]
    deposit_root: Bytes32,
    /// Number of deposits covered by the finalized spine.
    #[getset(get_copy = "pub")]
    deposit_count: u64,
    /// Hash of the execution block containing the last finalized deposit.
    #[getset(get = "pub")]
    execution_block_hash: Bytes32,
    /// Height of the execution block containing the last finalized deposit.
    #[getset(get_copy = "pub")]
    execution_block_height: u64,
}

impl DepositTreeSnapshot {
    /// Creates a new `DepositTreeSnapshot` from values received from an external source.
    ///
    /// # Arguments
    ///
    /// * `finalized` - The roots of the finalized subtrees, left to right.
    /// * `deposit_root` - The advertised root of the finalized portion of the tree.
    /// * `deposit_count` - The number of deposits covered by the finalized spine.
    /// * `execution_block_hash` - The hash of the execution block anchor.
    /// * `execution_block_height` - The height of the execution block anchor.
    ///
    /// # Returns
    ///
    /// A new `DepositTreeSnapshot` instance.
    pub fn new(
        finalized: Vec<Bytes32>,
        deposit_root: Bytes32,
        deposit_count: u64,
        execution_block_hash: Bytes32,
        execution_block_height: u64,
    ) -> Self {
        Self {
            finalized,
            deposit_root,
            deposit_count,
            execution_block_hash,
            execution_block_height,
        }
    }

    /// Creates a `DepositTreeSnapshot` from the parts collected out of a deposit tree, computing
    /// the root the spine commits to.
    ///
    /// # Arguments
    ///
    /// * `finalized` - The roots of the finalized subtrees, left to right.
    /// * `deposit_count` - The number of deposits covered by the finalized spine.
    /// * `execution_block_hash` - The hash of the execution block anchor.
    /// * `execution_block_height` - The height of the execution block anchor.
    ///
    /// # Returns
    ///
    /// A `Result` containing the new `DepositTreeSnapshot`, or a `MerkleError` if the spine does
    /// not cover `deposit_count` deposits.
    pub fn from_tree_parts(
        finalized: &[HashValue],
        deposit_count: u64,
        execution_block_hash: Bytes32,
        execution_block_height: u64,
    ) -> Result<Self, MerkleError> {
        let mut snapshot = Self {
            finalized: finalized.iter().map(|hash| *hash.as_ref()).collect(),
            deposit_root: [0; BYTES_32_LEN],
            deposit_count,
            execution_block_hash,
            execution_block_height,
        };
        snapshot.deposit_root = *snapshot.calculate_root()?.as_ref();

        Ok(snapshot)
    }

    /// Computes the root committed to by the finalized spine, without reconstructing the tree.
    ///
    /// Each bit of `deposit_count` selects, from the smallest region up, whether the
    /// corresponding level consumes a finalized subtree root or pads with the zero hash of that
    /// depth. The result is mixed with the deposit count, following the SSZ list root
    /// convention.
    ///
    /// # Returns
    ///
    /// A `Result` containing the root, or a `MerkleError` if the spine length does not match
    /// the deposit count.
    pub fn calculate_root(&self) -> Result<HashValue, MerkleError> {
        let inconsistent = || MerkleError::InvalidSnapshot {
            spine_length: self.finalized.len(),
            deposit_count: self.deposit_count,
        };

        // A full tree is a single finalized region whose root needs no padding.
        if self.deposit_count == MAX_DEPOSIT_COUNT {
            if self.finalized.len() != 1 {
                return Err(inconsistent());
            }
            return Ok(mix_in_length(
                &HashValue::new(self.finalized[0]),
                self.deposit_count,
            ));
        }

        let mut size = self.deposit_count;
        let mut remaining = self.finalized.as_slice();
        let mut root = zero_hash(0);

        for depth in 0..DEPOSIT_CONTRACT_DEPTH {
            if size & 1 == 1 {
                let (hash, rest) = remaining.split_last().ok_or_else(inconsistent)?;
                remaining = rest;
                root = sha2_hash_concat(&HashValue::new(*hash), &root);
            } else {
                root = sha2_hash_concat(&root, &zero_hash(depth));
            }
            size >>= 1;
        }

        if !remaining.is_empty() {
            return Err(inconsistent());
        }

        Ok(mix_in_length(&root, self.deposit_count))
    }

    /// Serialize a `DepositTreeSnapshot` data structure to an SSZ formatted vector of bytes.
    ///
    /// # Returns
    ///
    /// A `Vec<u8>` containing the SSZ serialized `DepositTreeSnapshot` data structure.
    pub fn to_ssz_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        // Serialize the offset of the variable-length finalized spine
        bytes.extend_from_slice(&(DEPOSIT_TREE_SNAPSHOT_BASE_BYTES_LEN as u32).to_le_bytes());

        // Serialize deposit_root
        bytes.extend_from_slice(&self.deposit_root);

        // Serialize deposit_count
        bytes.extend_from_slice(&self.deposit_count.to_le_bytes());

        // Serialize execution_block_hash
        bytes.extend_from_slice(&self.execution_block_hash);

        // Serialize execution_block_height
        bytes.extend_from_slice(&self.execution_block_height.to_le_bytes());

        // Serialize the finalized spine
        for hash in &self.finalized {
            bytes.extend_from_slice(hash);
        }

        bytes
    }

    /// Deserialize a `DepositTreeSnapshot` data structure from SSZ formatted bytes.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The SSZ formatted bytes to deserialize the `DepositTreeSnapshot` data
    ///   structure from.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deserialized `DepositTreeSnapshot` data structure or a
    /// `TypesError`.
    ///
    /// # Errors
    ///
    /// Returns a `TypesError` if the bytes are not long enough, if the offset for the finalized
    /// spine is invalid, or if the spine is not a whole number of 32-byte hashes.
    pub fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, TypesError> {
        if bytes.len() < DEPOSIT_TREE_SNAPSHOT_BASE_BYTES_LEN {
            return Err(TypesError::UnderLength {
                structure: "DepositTreeSnapshot".into(),
                minimum: DEPOSIT_TREE_SNAPSHOT_BASE_BYTES_LEN,
                actual: bytes.len(),
            });
        }
        if bytes.len()
            > DEPOSIT_TREE_SNAPSHOT_BASE_BYTES_LEN + MAX_FINALIZED_SPINE_LEN * BYTES_32_LEN
        {
            return Err(TypesError::OverLength {
                structure: "DepositTreeSnapshot".into(),
                maximum: DEPOSIT_TREE_SNAPSHOT_BASE_BYTES_LEN
                    + MAX_FINALIZED_SPINE_LEN * BYTES_32_LEN,
                actual: bytes.len(),
            });
        }

        let cursor = 0;
        let (cursor, offset) = extract_u32("DepositTreeSnapshot", bytes, cursor)?;
        let (cursor, deposit_root) = extract_bytes32("DepositTreeSnapshot", bytes, cursor)?;
        let (cursor, deposit_count) = extract_u64("DepositTreeSnapshot", bytes, cursor)?;
        let (cursor, execution_block_hash) = extract_bytes32("DepositTreeSnapshot", bytes, cursor)?;
        let (cursor, execution_block_height) = extract_u64("DepositTreeSnapshot", bytes, cursor)?;

        if cursor != offset as usize {
            return Err(deserialization_error!(
                "DepositTreeSnapshot",
                "Invalid offset for the finalized spine"
            ));
        }

        if (bytes.len() - cursor) % BYTES_32_LEN != 0 {
            return Err(deserialization_error!(
                "DepositTreeSnapshot",
                "Finalized spine is not a whole number of 32-byte hashes"
            ));
        }

        let mut cursor = cursor;
        let mut finalized = Vec::with_capacity((bytes.len() - cursor) / BYTES_32_LEN);
        while cursor < bytes.len() {
            let (new_cursor, hash) = extract_bytes32("DepositTreeSnapshot", bytes, cursor)?;
            cursor = new_cursor;
            finalized.push(hash);
        }

        Ok(Self {
            finalized,
            deposit_root,
            deposit_count,
            execution_block_hash,
            execution_block_height,
        })
    }
}
