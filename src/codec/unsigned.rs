//! Unsigned big-endian integers of caller-specified width.
//!
//! This is the raw integer view of a group value: DPT 5 (1 byte),
//! DPT 7 (2 bytes) and wider unsigned payloads all share it.
//!
//! ## Example
//!
//! ```
//! use knx_entities::codec::{decode_int, encode_int};
//!
//! let payload = encode_int(0x1234, 2)?;
//! assert_eq!(payload.as_slice(), &[0x12, 0x34]);
//! assert_eq!(decode_int(&payload), 0x1234);
//! # Ok::<(), knx_entities::KnxError>(())
//! ```

use super::{Payload, MAX_PAYLOAD};
use crate::error::{KnxError, Result};

/// Encode `value` big-endian into exactly `num_bytes` bytes.
///
/// # Errors
///
/// Returns a range error if `num_bytes` exceeds [`MAX_PAYLOAD`] or if
/// `value >= 256^num_bytes`.
pub fn encode_int(value: u64, num_bytes: usize) -> Result<Payload> {
    if num_bytes > MAX_PAYLOAD {
        return Err(KnxError::payload_too_wide());
    }
    if num_bytes < 8 && value >> (8 * num_bytes) != 0 {
        return Err(KnxError::value_out_of_range());
    }

    let mut payload = Payload::new();
    for index in (0..num_bytes).rev() {
        // Widths past 8 bytes are zero-padded on the left
        let byte = if index < 8 { (value >> (8 * index)) as u8 } else { 0 };
        payload
            .push(byte)
            .map_err(|_full| KnxError::payload_too_wide())?;
    }
    Ok(payload)
}

/// Decode a big-endian unsigned integer.
///
/// An empty payload decodes to 0 (a poll answered before the device
/// reported anything). Payloads longer than 8 bytes keep their low-order
/// 8 bytes.
pub fn decode_int(bytes: &[u8]) -> u64 {
    let start = bytes.len().saturating_sub(8);
    bytes[start..]
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}
