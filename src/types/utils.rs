// Copyright (c) Argument Computer Corporation
// SPDX-License-Identifier: Apache-2.0

use crate::deserialization_error;
use crate::types::error::TypesError;
use crate::types::{BYTES_32_LEN, U64_LEN};

/// Bytes length of an offset encoded for variable length fields in SSZ.
pub const OFFSET_BYTE_LENGTH: usize = 4;

/// Utility method to extract a 32-byte hash at a given cursor from a byte array.
///
/// # Arguments
///
/// * `structure` - The name of the structure being extracted.
/// * `bytes` - The byte array to extract from.
/// * `cursor` - The current cursor position in the byte array.
///
/// # Returns
///
/// A tuple containing the new cursor position and the extracted hash.
pub fn extract_bytes32(
    structure: &str,
    bytes: &[u8],
    cursor: usize,
) -> Result<(usize, [u8; BYTES_32_LEN]), TypesError> {
    let end = cursor + BYTES_32_LEN;
    if end > bytes.len() {
        return Err(deserialization_error!(
            structure,
            "Not enough bytes to extract a 32-byte hash"
        ));
    }
    let result = bytes[cursor..end]
        .try_into()
        .map_err(|_| deserialization_error!(structure, "Invalid 32-byte hash"))?;

    Ok((end, result))
}

/// Utility method to extract a little-endian `u64` at a given cursor from a byte array.
///
/// # Arguments
///
/// * `structure` - The name of the structure being extracted.
/// * `bytes` - The byte array to extract from.
/// * `cursor` - The current cursor position in the byte array.
///
/// # Returns
///
/// A tuple containing the new cursor position and the extracted `u64`.
pub fn extract_u64(
    structure: &str,
    bytes: &[u8],
    cursor: usize,
) -> Result<(usize, u64), TypesError> {
    let end = cursor + U64_LEN;
    if end > bytes.len() {
        return Err(deserialization_error!(
            structure,
            "Not enough bytes to extract a u64"
        ));
    }
    let value_bytes = bytes[cursor..end]
        .try_into()
        .map_err(|_| deserialization_error!(structure, "Invalid u64 bytes"))?;

    Ok((end, u64::from_le_bytes(value_bytes)))
}

/// Utility method to extract a little-endian `u32` offset at a given cursor from a byte array.
///
/// # Arguments
///
/// * `structure` - The name of the structure being extracted.
/// * `bytes` - The byte array to extract from.
/// * `cursor` - The current cursor position in the byte array.
///
/// # Returns
///
/// A tuple containing the new cursor position and the extracted `u32`.
pub fn extract_u32(
    structure: &str,
    bytes: &[u8],
    cursor: usize,
) -> Result<(usize, u32), TypesError> {
    let end = cursor + OFFSET_BYTE_LENGTH;
    if end > bytes.len() {
        return Err(deserialization_error!(
            structure,
            "Not enough bytes to extract a u32"
        ));
    }
    let value_bytes = bytes[cursor..end]
        .try_into()
        .map_err(|_| deserialization_error!(structure, "Invalid u32 bytes"))?;

    Ok((end, u32::from_le_bytes(value_bytes)))
}
