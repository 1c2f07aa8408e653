//! One-byte boolean (DPT 1.xxx style switch, up/down, start/stop).
//!
//! The wire form is the integer view at width 1: `0x00` for off/up/stop,
//! `0x01` for on/down/start. Decoding treats any nonzero value as on.

static SWITCH_OFF: [u8; 1] = [0x00];
static SWITCH_ON: [u8; 1] = [0x01];

/// Encode a boolean into its one-byte payload.
pub fn encode_bool(value: bool) -> &'static [u8] {
    if value {
        &SWITCH_ON
    } else {
        &SWITCH_OFF
    }
}

/// Decode a boolean: any nonzero byte is on, empty is off.
pub fn decode_bool(bytes: &[u8]) -> bool {
    bytes.iter().any(|&byte| byte != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode_bool(false), &[0x00]);
        assert_eq!(encode_bool(true), &[0x01]);
    }

    #[test]
    fn test_decode() {
        assert!(!decode_bool(&[]));
        assert!(!decode_bool(&[0x00]));
        assert!(decode_bool(&[0x01]));
        assert!(decode_bool(&[0xFE]));
        assert!(decode_bool(&[0x00, 0x10]));
    }

    #[test]
    fn test_decode_wide_payload() {
        // Nonzero byte beyond the low eight
        let mut wide = [0u8; 9];
        wide[0] = 0x01;
        assert!(decode_bool(&wide));
        assert!(!decode_bool(&[0u8; 14]));
    }
}
