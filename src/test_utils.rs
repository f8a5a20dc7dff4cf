// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

use crate::crypto::hash::{sha2_hash_concat, HashValue};
use crate::merkle::{mix_in_length, zero_hash, DEPOSIT_CONTRACT_DEPTH};
use crate::types::snapshot::DepositTreeSnapshot;
use crate::types::Bytes32;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const TEST_CASES_PATH: &str = "test-assets/test_cases.yaml";

#[derive(Debug, Deserialize)]
struct RawTestCase {
    deposit_data_root: String,
    eth1_data: RawEth1Data,
    block_height: u64,
    snapshot: RawSnapshot,
}

#[derive(Debug, Deserialize)]
struct RawEth1Data {
    deposit_root: String,
    deposit_count: u64,
    block_hash: String,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    finalized: Vec<String>,
    deposit_root: String,
    deposit_count: u64,
    execution_block_hash: String,
    execution_block_height: u64,
}

/// One step of the incremental deposit contract test vectors: the deposit to push, the root the
/// contract advertises afterwards, and the snapshot taken once every deposit up to this block is
/// finalized.
pub(crate) struct TestCase {
    pub deposit_data_root: HashValue,
    pub deposit_root: HashValue,
    pub deposit_count: u64,
    pub block_hash: Bytes32,
    pub block_height: u64,
    pub snapshot: DepositTreeSnapshot,
}

pub(crate) fn hex_to_bytes32(hex_str: &str) -> Bytes32 {
    hex::decode(hex_str.strip_prefix("0x").unwrap())
        .unwrap()
        .try_into()
        .unwrap()
}

pub(crate) fn hex_to_hash(hex_str: &str) -> HashValue {
    HashValue::new(hex_to_bytes32(hex_str))
}

pub(crate) fn read_test_cases() -> Vec<TestCase> {
    let test_asset_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(TEST_CASES_PATH);

    let raw_cases: Vec<RawTestCase> =
        serde_yaml::from_str(&fs::read_to_string(test_asset_path).unwrap()).unwrap();

    raw_cases
        .into_iter()
        .map(|raw| TestCase {
            deposit_data_root: hex_to_hash(&raw.deposit_data_root),
            deposit_root: hex_to_hash(&raw.eth1_data.deposit_root),
            deposit_count: raw.eth1_data.deposit_count,
            block_hash: hex_to_bytes32(&raw.eth1_data.block_hash),
            block_height: raw.block_height,
            snapshot: DepositTreeSnapshot::new(
                raw.snapshot
                    .finalized
                    .iter()
                    .map(|hash| hex_to_bytes32(hash))
                    .collect(),
                hex_to_bytes32(&raw.snapshot.deposit_root),
                raw.snapshot.deposit_count,
                hex_to_bytes32(&raw.snapshot.execution_block_hash),
                raw.snapshot.execution_block_height,
            ),
        })
        .collect()
}

/// Computes the root of a depth-32 deposit tree over the given leaves by ladder-padded pairwise
/// reduction, independently of the incremental algorithms under test.
pub(crate) fn reference_deposit_root(leaves: &[HashValue]) -> HashValue {
    let mut level = leaves.to_vec();
    for depth in 0..DEPOSIT_CONTRACT_DEPTH {
        if level.len() % 2 == 1 {
            level.push(zero_hash(depth));
        }
        level = level
            .chunks(2)
            .map(|pair| sha2_hash_concat(&pair[0], &pair[1]))
            .collect();
        if level.is_empty() {
            level.push(zero_hash(depth + 1));
        }
    }

    mix_in_length(&level[0], leaves.len() as u64)
}
