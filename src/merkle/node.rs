// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

//! # Merkle Node
//!
//! This module contains the recursive representation of the deposit tree. Every subtree, at every
//! level, is exactly one of four shapes: all-empty, a single populated leaf, a finalized region
//! collapsed to its root hash, or a branch with two children. The shape of the tree at any moment
//! encodes which prefix of deposits is finalized, which positions are empty and which are
//! individually populated.

use crate::crypto::hash::{sha2_hash_concat, HashValue};
use crate::merkle::error::MerkleError;
use crate::merkle::zero_hash;
use anyhow::Result;

/// A node of the deposit tree.
///
/// Depth is never stored except for empty subtrees, where it is needed to derive the padding
/// hash; all other operations receive their depth from the caller on the way down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerkleNode {
    /// An all-empty subtree of the given depth. Depth 0 is a single empty leaf.
    Zero { depth: u32 },
    /// A single populated leaf. Only ever present at depth 0.
    Leaf { hash: HashValue },
    /// A subtree whose contents are irreversibly final, collapsed to its root hash and the
    /// number of deposits it covers.
    Finalized { deposit_count: u64, hash: HashValue },
    /// A branch node owning both of its children.
    Inner {
        left: Box<MerkleNode>,
        right: Box<MerkleNode>,
    },
}

impl MerkleNode {
    /// Computes the root of the subtree.
    pub fn root(&self) -> HashValue {
        match self {
            Self::Zero { depth } => zero_hash(*depth),
            Self::Leaf { hash } | Self::Finalized { hash, .. } => *hash,
            Self::Inner { left, right } => sha2_hash_concat(&left.root(), &right.root()),
        }
    }

    /// Returns `true` if no empty leaf position remains in the subtree.
    ///
    /// Leaves are appended left to right, so a branch is full exactly when its right child is.
    pub fn is_full(&self) -> bool {
        match self {
            Self::Zero { .. } => false,
            Self::Leaf { .. } | Self::Finalized { .. } => true,
            Self::Inner { right, .. } => right.is_full(),
        }
    }

    /// Appends a leaf at the lowest-indexed empty position of the subtree.
    ///
    /// The caller must have checked that the subtree is not full; descending into a populated
    /// leaf or a finalized region is an invariant violation.
    pub(crate) fn push_leaf(&mut self, leaf: HashValue, depth: u32) -> Result<(), MerkleError> {
        match self {
            Self::Zero { .. } => {
                *self = Self::single_leaf_tree(leaf, depth);
                Ok(())
            }
            Self::Leaf { .. } => Err(MerkleError::InvariantViolation {
                reason: "pushed a leaf into an already populated leaf",
            }),
            Self::Finalized { .. } => Err(MerkleError::InvariantViolation {
                reason: "pushed a leaf into a finalized subtree",
            }),
            Self::Inner { left, right } => {
                if left.is_full() {
                    right.push_leaf(leaf, depth - 1)
                } else {
                    left.push_leaf(leaf, depth - 1)
                }
            }
        }
    }

    /// Collapses the leftmost `deposit_count` leaves of the subtree into `Finalized` nodes.
    ///
    /// Already finalized regions are left untouched, making finalization idempotent and
    /// monotonic. Reaching an empty subtree with a nonzero count means the caller asked to
    /// finalize deposits that were never pushed.
    pub(crate) fn finalize(&mut self, deposit_count: u64, depth: u32) -> Result<(), MerkleError> {
        match self {
            Self::Finalized { .. } => Ok(()),
            Self::Leaf { hash } => {
                let hash = *hash;
                *self = Self::Finalized {
                    deposit_count: 1,
                    hash,
                };
                Ok(())
            }
            Self::Zero { .. } => Err(MerkleError::FinalizeOnEmpty),
            Self::Inner { left, right } => {
                let capacity = 1u64 << depth;
                if capacity <= deposit_count {
                    let hash = sha2_hash_concat(&left.root(), &right.root());
                    *self = Self::Finalized {
                        deposit_count: capacity,
                        hash,
                    };
                    return Ok(());
                }

                let half = capacity / 2;
                left.finalize(deposit_count.min(half), depth - 1)?;
                if deposit_count > half {
                    right.finalize(deposit_count - half, depth - 1)?;
                }
                Ok(())
            }
        }
    }

    /// Appends the hashes of the finalized regions to `result`, left to right.
    ///
    /// # Returns
    ///
    /// The total number of deposits covered by the appended hashes.
    pub(crate) fn collect_finalized(&self, result: &mut Vec<HashValue>) -> u64 {
        match self {
            Self::Zero { .. } | Self::Leaf { .. } => 0,
            Self::Finalized {
                deposit_count,
                hash,
            } => {
                result.push(*hash);
                *deposit_count
            }
            Self::Inner { left, right } => {
                let left_deposits = left.collect_finalized(result);
                let right_deposits = right.collect_finalized(result);

                left_deposits + right_deposits
            }
        }
    }

    /// Reconstructs the canonical shape of a tree whose first `deposit_count` leaves are
    /// finalized, from the left-to-right spine of finalized subtree roots.
    ///
    /// A finalized boundary aligned exactly on a power of two leaves no live frontier in this
    /// subtree, so the right sibling stays empty in that case.
    pub(crate) fn from_snapshot_parts(
        finalized: &[HashValue],
        deposit_count: u64,
        depth: u32,
    ) -> Result<Self, MerkleError> {
        if finalized.is_empty() || deposit_count == 0 {
            return Ok(Self::Zero { depth });
        }
        if deposit_count == 1u64 << depth {
            return Ok(Self::Finalized {
                deposit_count,
                hash: finalized[0],
            });
        }
        if depth == 0 {
            return Err(MerkleError::InvalidSnapshot {
                spine_length: finalized.len(),
                deposit_count,
            });
        }

        let half = 1u64 << (depth - 1);
        if deposit_count <= half {
            Ok(Self::Inner {
                left: Box::new(Self::from_snapshot_parts(finalized, deposit_count, depth - 1)?),
                right: Box::new(Self::Zero { depth: depth - 1 }),
            })
        } else {
            Ok(Self::Inner {
                left: Box::new(Self::Finalized {
                    deposit_count: half,
                    hash: finalized[0],
                }),
                right: Box::new(Self::from_snapshot_parts(
                    &finalized[1..],
                    deposit_count - half,
                    depth - 1,
                )?),
            })
        }
    }

    /// Builds the minimal subtree of the given depth containing a single leaf at its leftmost
    /// position.
    fn single_leaf_tree(leaf: HashValue, depth: u32) -> Self {
        if depth == 0 {
            return Self::Leaf { hash: leaf };
        }

        Self::Inner {
            left: Box::new(Self::single_leaf_tree(leaf, depth - 1)),
            right: Box::new(Self::Zero { depth: depth - 1 }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::hash::sha2_hash;

    const TEST_DEPTH: u32 = 4;

    fn leaves(count: u64) -> Vec<HashValue> {
        (0..count).map(|i| sha2_hash(&i.to_le_bytes())).collect()
    }

    fn tree_with_leaves(count: u64, depth: u32) -> MerkleNode {
        let mut node = MerkleNode::Zero { depth };
        for leaf in leaves(count) {
            node.push_leaf(leaf, depth).unwrap();
        }
        node
    }

    /// Pairwise reduction over a ladder-padded level, independent of the node algorithms.
    fn reference_root(leaves: &[HashValue], depth: u32) -> HashValue {
        let mut level = leaves.to_vec();
        for current_depth in 0..depth {
            if level.len() % 2 == 1 {
                level.push(zero_hash(current_depth));
            }
            level = level
                .chunks(2)
                .map(|pair| sha2_hash_concat(&pair[0], &pair[1]))
                .collect();
            if level.is_empty() {
                level.push(zero_hash(current_depth + 1));
            }
        }
        level[0]
    }

    #[test]
    fn test_empty_subtree_root_is_ladder_value() {
        for depth in 0..=TEST_DEPTH {
            assert_eq!(MerkleNode::Zero { depth }.root(), zero_hash(depth));
        }
    }

    #[test]
    fn test_single_leaf_tree_shape() {
        let leaf = sha2_hash(b"leaf");
        let node = MerkleNode::single_leaf_tree(leaf, 2);

        let expected = MerkleNode::Inner {
            left: Box::new(MerkleNode::Inner {
                left: Box::new(MerkleNode::Leaf { hash: leaf }),
                right: Box::new(MerkleNode::Zero { depth: 0 }),
            }),
            right: Box::new(MerkleNode::Zero { depth: 1 }),
        };

        assert_eq!(node, expected);
    }

    #[test]
    fn test_push_leaf_matches_reference_merkleization() {
        for count in 0..=(1 << TEST_DEPTH) {
            let node = tree_with_leaves(count, TEST_DEPTH);

            assert_eq!(node.root(), reference_root(&leaves(count), TEST_DEPTH));
        }
    }

    #[test]
    fn test_push_leaf_into_populated_positions_is_rejected() {
        let mut leaf = MerkleNode::Leaf {
            hash: sha2_hash(b"populated"),
        };
        assert!(matches!(
            leaf.push_leaf(sha2_hash(b"new"), 0),
            Err(MerkleError::InvariantViolation { .. })
        ));

        let mut finalized = MerkleNode::Finalized {
            deposit_count: 2,
            hash: sha2_hash(b"frozen"),
        };
        assert!(matches!(
            finalized.push_leaf(sha2_hash(b"new"), 1),
            Err(MerkleError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_is_full_tracks_right_spine() {
        let capacity = 1 << TEST_DEPTH;
        for count in 0..capacity {
            assert!(!tree_with_leaves(count, TEST_DEPTH).is_full());
        }
        assert!(tree_with_leaves(capacity, TEST_DEPTH).is_full());
    }

    #[test]
    fn test_finalize_preserves_root() {
        for count in 1..=(1u64 << TEST_DEPTH) {
            for finalized_count in 1..=count {
                let mut node = tree_with_leaves(count, TEST_DEPTH);
                let root = node.root();

                node.finalize(finalized_count, TEST_DEPTH).unwrap();

                assert_eq!(node.root(), root);
            }
        }
    }

    #[test]
    fn test_finalize_collapses_aligned_prefix_to_single_node() {
        let mut node = tree_with_leaves(3, TEST_DEPTH);
        node.finalize(2, TEST_DEPTH).unwrap();

        let mut spine = vec![];
        let covered = node.collect_finalized(&mut spine);

        assert_eq!(covered, 2);
        assert_eq!(spine, vec![sha2_hash_concat(&leaves(2)[0], &leaves(2)[1])]);
    }

    #[test]
    fn test_finalize_on_empty_subtree_is_rejected() {
        let mut node = MerkleNode::Zero { depth: TEST_DEPTH };

        assert!(matches!(
            node.finalize(1, TEST_DEPTH),
            Err(MerkleError::FinalizeOnEmpty)
        ));
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut node = tree_with_leaves(11, TEST_DEPTH);
        node.finalize(7, TEST_DEPTH).unwrap();
        let snapshot_before = node.clone();

        // A smaller count must not change the structure.
        node.finalize(3, TEST_DEPTH).unwrap();
        assert_eq!(node, snapshot_before);

        // A larger count collapses further.
        node.finalize(11, TEST_DEPTH).unwrap();
        let mut spine = vec![];
        assert_eq!(node.collect_finalized(&mut spine), 11);
        assert_eq!(spine.len(), 11u64.count_ones() as usize);
    }

    #[test]
    fn test_collect_finalized_spine_is_popcount_sized() {
        for count in 1..=(1u64 << TEST_DEPTH) {
            for finalized_count in 1..=count {
                let mut node = tree_with_leaves(count, TEST_DEPTH);
                node.finalize(finalized_count, TEST_DEPTH).unwrap();

                let mut spine = vec![];
                let covered = node.collect_finalized(&mut spine);

                assert_eq!(covered, finalized_count);
                assert_eq!(spine.len(), finalized_count.count_ones() as usize);
            }
        }
    }

    #[test]
    fn test_from_snapshot_parts_round_trip() {
        for count in 1..=(1u64 << TEST_DEPTH) {
            let mut node = tree_with_leaves(count, TEST_DEPTH);
            node.finalize(count, TEST_DEPTH).unwrap();

            let mut spine = vec![];
            node.collect_finalized(&mut spine);

            let rebuilt = MerkleNode::from_snapshot_parts(&spine, count, TEST_DEPTH).unwrap();

            assert_eq!(rebuilt.root(), node.root());
        }
    }

    #[test]
    fn test_from_snapshot_parts_power_of_two_leaves_empty_right_sibling() {
        let spine = vec![sha2_hash(b"aligned")];
        let rebuilt = MerkleNode::from_snapshot_parts(&spine, 8, TEST_DEPTH).unwrap();

        let expected = MerkleNode::Inner {
            left: Box::new(MerkleNode::Finalized {
                deposit_count: 8,
                hash: spine[0],
            }),
            right: Box::new(MerkleNode::Zero { depth: 3 }),
        };

        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn test_from_snapshot_parts_rejects_count_beyond_capacity() {
        // Five deposits cannot fit in a depth-2 subtree.
        let spine = vec![sha2_hash(b"a"), sha2_hash(b"b"), sha2_hash(b"c")];

        assert!(matches!(
            MerkleNode::from_snapshot_parts(&spine, 5, 2),
            Err(MerkleError::InvalidSnapshot { .. })
        ));
    }
}
