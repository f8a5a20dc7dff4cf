// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

//! # Deposit Tree
//!
//! The `DepositTree` represents the full state maintained for the deposit contract Merkle tree.
//! It wraps the recursive node representation and exposes the operations external components
//! rely on: appending the hash of a new deposit, computing the root the deposit contract
//! commits to, finalizing the prefix of deposits that became irreversible, and the snapshot
//! round-trip used to persist and restore the finalized state.

use crate::crypto::hash::HashValue;
use crate::merkle::error::MerkleError;
use crate::merkle::node::MerkleNode;
use crate::merkle::{mix_in_length, DEPOSIT_CONTRACT_DEPTH, MAX_DEPOSIT_COUNT};
use crate::types::snapshot::DepositTreeSnapshot;
use crate::types::{Bytes32, BYTES_32_LEN};
use anyhow::Result;
use getset::{CopyGetters, Getters};

/// The `DepositTree` represents the state of the deposit contract Merkle tree. It tracks every
/// deposit pushed so far, the subset of them that is irreversibly finalized, and the execution
/// block at which finalization happened.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct DepositTree {
    tree: MerkleNode,
    /// Total number of deposits pushed, finalized or not. Mixed in the root computation.
    #[getset(get_copy = "pub")]
    deposit_count: u64,
    /// Hash of the execution block whose deposits were last finalized.
    #[getset(get = "pub")]
    finalized_execution_block: Bytes32,
    /// Height of the execution block whose deposits were last finalized.
    #[getset(get_copy = "pub")]
    execution_block_height: u64,
}

impl DepositTree {
    /// Initializes an empty `DepositTree`.
    ///
    /// # Returns
    ///
    /// A new `DepositTree` instance with no deposits.
    pub fn new() -> Self {
        Self {
            tree: MerkleNode::Zero {
                depth: DEPOSIT_CONTRACT_DEPTH,
            },
            deposit_count: 0,
            finalized_execution_block: [0; BYTES_32_LEN],
            execution_block_height: 0,
        }
    }

    /// Appends the hash of a new deposit at the lowest-indexed empty position of the tree.
    ///
    /// # Arguments
    ///
    /// * `leaf` - The hash of the deposit data to append.
    ///
    /// # Returns
    ///
    /// A `Result` containing `()` if the deposit was appended, or a `MerkleError` if the tree
    /// already holds the maximum number of deposits. The tree is unchanged on error.
    pub fn push_leaf(&mut self, leaf: HashValue) -> Result<(), MerkleError> {
        if self.deposit_count == MAX_DEPOSIT_COUNT {
            return Err(MerkleError::TreeFull);
        }

        self.tree.push_leaf(leaf, DEPOSIT_CONTRACT_DEPTH)?;
        self.deposit_count += 1;

        Ok(())
    }

    /// Computes the root the deposit contract commits to: the root of the Merkle tree mixed
    /// with the number of deposits it contains, following the SSZ list root convention.
    ///
    /// # Returns
    ///
    /// The root of the deposit tree.
    pub fn get_root(&self) -> HashValue {
        mix_in_length(&self.tree.root(), self.deposit_count)
    }

    /// Returns `true` if the tree holds the maximum number of deposits.
    pub fn is_full(&self) -> bool {
        self.tree.is_full()
    }

    /// Returns the number of deposits covered by the finalized portion of the tree.
    pub fn finalized_deposit_count(&self) -> u64 {
        let mut spine = Vec::new();
        self.tree.collect_finalized(&mut spine)
    }

    /// Marks the first `deposit_count` deposits as irreversibly finalized, collapsing the
    /// subtrees covering them to single hash nodes. The root of the tree is unchanged.
    ///
    /// Finalization is monotonic: a count lower than a previous call leaves the tree untouched.
    ///
    /// # Arguments
    ///
    /// * `deposit_count` - The number of deposits, from the left, that are final.
    /// * `execution_block_hash` - The hash of the execution block containing the last finalized
    ///   deposit.
    /// * `execution_block_height` - The height of that execution block.
    ///
    /// # Returns
    ///
    /// A `Result` containing `()` if the prefix was finalized, or a `MerkleError` if
    /// `deposit_count` exceeds the number of deposits pushed so far. The tree is unchanged on
    /// error.
    pub fn finalize(
        &mut self,
        deposit_count: u64,
        execution_block_hash: Bytes32,
        execution_block_height: u64,
    ) -> Result<(), MerkleError> {
        if deposit_count > self.deposit_count {
            return Err(MerkleError::FinalizeBeyondPushed {
                requested: deposit_count,
                pushed: self.deposit_count,
            });
        }

        if deposit_count > 0 {
            self.tree.finalize(deposit_count, DEPOSIT_CONTRACT_DEPTH)?;
        }
        self.finalized_execution_block = execution_block_hash;
        self.execution_block_height = execution_block_height;

        Ok(())
    }

    /// Extracts the compact snapshot of the finalized portion of the tree: the left-to-right
    /// spine of finalized subtree roots, the number of deposits they cover and the execution
    /// block anchor.
    ///
    /// Deposits that were pushed but not finalized are not part of the snapshot; they have to
    /// be replayed after restoring from it.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `DepositTreeSnapshot` for the current finalized state.
    pub fn to_snapshot(&self) -> Result<DepositTreeSnapshot, MerkleError> {
        let mut finalized = Vec::new();
        let deposit_count = self.tree.collect_finalized(&mut finalized);

        DepositTreeSnapshot::from_tree_parts(
            &finalized,
            deposit_count,
            self.finalized_execution_block,
            self.execution_block_height,
        )
    }

    /// Reconstructs a `DepositTree` from a snapshot, restoring the canonical shape of the
    /// finalized portion. New deposits can be appended to the restored tree.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The snapshot to restore from.
    ///
    /// # Returns
    ///
    /// A `Result` containing the restored `DepositTree`, or a `MerkleError` if the snapshot is
    /// structurally inconsistent or if the root recomputed from it does not match the root it
    /// advertises.
    pub fn from_snapshot(snapshot: &DepositTreeSnapshot) -> Result<Self, MerkleError> {
        let deposit_count = snapshot.deposit_count();
        let spine_length = snapshot.finalized().len();

        if deposit_count > MAX_DEPOSIT_COUNT
            || spine_length != deposit_count.count_ones() as usize
        {
            return Err(MerkleError::InvalidSnapshot {
                spine_length,
                deposit_count,
            });
        }

        let spine = snapshot
            .finalized()
            .iter()
            .copied()
            .map(HashValue::new)
            .collect::<Vec<_>>();
        let tree = MerkleNode::from_snapshot_parts(&spine, deposit_count, DEPOSIT_CONTRACT_DEPTH)?;

        let restored = Self {
            tree,
            deposit_count,
            finalized_execution_block: *snapshot.execution_block_hash(),
            execution_block_height: snapshot.execution_block_height(),
        };

        let root = restored.get_root();
        if root.hash() != snapshot.deposit_root() {
            return Err(MerkleError::SnapshotRootMismatch {
                expected: format!("0x{}", hex::encode(snapshot.deposit_root())),
                actual: format!("0x{}", hex::encode(root.as_ref())),
            });
        }

        Ok(restored)
    }
}

impl Default for DepositTree {
    fn default() -> Self {
        Self::new()
    }
}
