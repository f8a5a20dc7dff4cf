// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors possible while manipulating the deposit tree.
#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("Deposit tree is full")]
    TreeFull,
    #[error("Cannot finalize {requested} deposits, only {pushed} have been pushed")]
    FinalizeBeyondPushed { requested: u64, pushed: u64 },
    #[error("Cannot finalize deposits in an empty subtree")]
    FinalizeOnEmpty,
    #[error("Snapshot root mismatch. Expected {expected}, got {actual}")]
    SnapshotRootMismatch { expected: String, actual: String },
    #[error("Snapshot is inconsistent: {spine_length} finalized hashes for {deposit_count} deposits")]
    InvalidSnapshot {
        spine_length: usize,
        deposit_count: u64,
    },
    #[error("Deposit tree invariant violated: {reason}")]
    InvariantViolation { reason: &'static str },
}
