//! Inverted 0-100 % scale over one byte.
//!
//! Cover actuators report position with byte 0 meaning fully open (up) and
//! 255 fully closed (down), while entities expose 100 % as open. Both
//! directions scale by 255/100 and round toward zero (floor), which makes
//! `decode_percentage(encode_percentage(p)) == p` for every `p` in 0..=100.
//!
//! | Percent | Byte |
//! |---------|------|
//! | 100     | 0    |
//! | 50      | 127  |
//! | 0       | 255  |

use crate::error::{KnxError, Result};

/// Validate a percentage, returning it narrowed to `u8`.
///
/// # Errors
///
/// Returns a range error outside 0..=100.
pub fn check_percentage(pct: i32) -> Result<u8> {
    u8::try_from(pct)
        .ok()
        .filter(|pct| *pct <= 100)
        .ok_or_else(KnxError::value_out_of_range)
}

/// Encode a percentage into its bus byte: `floor((100 - pct) * 255 / 100)`.
///
/// # Errors
///
/// Returns a range error outside 0..=100; values are never clamped.
pub fn encode_percentage(pct: i32) -> Result<u8> {
    let pct = check_percentage(pct)?;
    Ok(((u16::from(100 - pct) * 255) / 100) as u8)
}

/// Decode a bus byte into a percentage: `floor((255 - byte) * 100 / 255)`.
pub fn decode_percentage(byte: u8) -> u8 {
    ((u16::from(255 - byte) * 100) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_exact_values() {
        assert_eq!(encode_percentage(0).unwrap(), 255);
        assert_eq!(encode_percentage(50).unwrap(), 127);
        assert_eq!(encode_percentage(100).unwrap(), 0);
        assert_eq!(encode_percentage(1).unwrap(), 252);
        assert_eq!(encode_percentage(99).unwrap(), 2);
    }

    #[test]
    fn test_decode_exact_values() {
        assert_eq!(decode_percentage(255), 0);
        assert_eq!(decode_percentage(0), 100);
        assert_eq!(decode_percentage(127), 50);
        assert_eq!(decode_percentage(128), 49);
        assert_eq!(decode_percentage(254), 0);
    }

    #[test]
    fn test_out_of_range() {
        for pct in [-1, 101, 150, i32::MAX, i32::MIN] {
            let err = encode_percentage(pct).unwrap_err();
            assert!(matches!(err, KnxError::Range(ref e) if e.is_out_of_range()));
        }
    }

    #[test]
    fn test_round_trip_spot_values() {
        for pct in [0, 1, 50, 99, 100] {
            let byte = encode_percentage(pct).unwrap();
            assert_eq!(i32::from(decode_percentage(byte)), pct);
        }
    }

    #[test]
    fn test_round_trip_whole_range() {
        for pct in 0..=100 {
            let byte = encode_percentage(pct).unwrap();
            assert_eq!(i32::from(decode_percentage(byte)), pct, "pct {pct}");
        }
    }
}
