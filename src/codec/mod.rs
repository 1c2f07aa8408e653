//! Value codec: raw group payloads <-> domain values.
//!
//! ## Views
//!
//! - **switch** - one byte, nonzero is on (switches, up/down, stop)
//! - **unsigned** - big-endian unsigned integer of any width up to [`MAX_PAYLOAD`]
//! - **percentage** - one byte, inverted 0-100 % scale (cover position)
//!
//! A [`ValueKind`] attaches one of those views to a device role, so the
//! device adapter can store raw payloads and decode them on access.
//!
//! ## Usage
//!
//! ```
//! use knx_entities::codec::{DomainValue, ValueKind};
//!
//! let payload = ValueKind::Percentage.encode(DomainValue::Percent(100))?;
//! assert_eq!(payload.as_slice(), &[0x00]);
//! assert_eq!(ValueKind::Percentage.decode(&[0xFF]), DomainValue::Percent(0));
//!
//! let payload = ValueKind::Unsigned(2).encode(DomainValue::Int(500))?;
//! assert_eq!(payload.as_slice(), &[0x01, 0xF4]);
//! # Ok::<(), knx_entities::KnxError>(())
//! ```

use crate::error::{KnxError, Result};

pub mod percentage;
pub mod switch;
pub mod unsigned;

#[doc(inline)]
pub use percentage::{check_percentage, decode_percentage, encode_percentage};
#[doc(inline)]
pub use switch::{decode_bool, encode_bool};
#[doc(inline)]
pub use unsigned::{decode_int, encode_int};

/// Longest group value payload (standard frame APDU data).
pub const MAX_PAYLOAD: usize = 14;

/// Raw group value bytes, big-endian.
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD>;

/// A decoded group value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DomainValue {
    /// On/off, up/down, start/stop
    Bool(bool),
    /// Unsigned integer, bounded by the role's byte width
    Int(u64),
    /// 0-100 %
    Percent(u8),
}

impl DomainValue {
    /// The boolean view, if this is a `Bool`.
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// The integer view, if this is an `Int`.
    pub const fn as_int(self) -> Option<u64> {
        match self {
            Self::Int(value) => Some(value),
            _ => None,
        }
    }

    /// The percentage view, if this is a `Percent`.
    pub const fn as_percent(self) -> Option<u8> {
        match self {
            Self::Percent(value) => Some(value),
            _ => None,
        }
    }
}

/// How the payload of a role is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// One byte boolean
    Switch,
    /// Unsigned integer of the given byte width
    Unsigned(u8),
    /// One byte inverted percentage
    Percentage,
}

impl ValueKind {
    /// Payload width in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::Switch | Self::Percentage => 1,
            Self::Unsigned(width) => width as usize,
        }
    }

    /// Encode a domain value for this kind.
    ///
    /// Integers are accepted by every kind (the raw byte view), booleans by
    /// the integer kinds, percentages only by `Percentage`.
    ///
    /// # Errors
    ///
    /// Returns a range error if the value does not fit or does not make
    /// sense for this kind.
    pub fn encode(self, value: DomainValue) -> Result<Payload> {
        match (self, value) {
            (Self::Percentage, DomainValue::Percent(pct)) => {
                let byte = encode_percentage(i32::from(pct))?;
                encode_int(u64::from(byte), 1)
            }
            (Self::Percentage, DomainValue::Bool(_)) | (_, DomainValue::Percent(_)) => {
                Err(KnxError::incompatible_value())
            }
            (_, DomainValue::Bool(on)) => encode_int(u64::from(on), self.width()),
            (_, DomainValue::Int(raw)) => encode_int(raw, self.width()),
        }
    }

    /// Decode a payload for this kind. Never fails: short or empty payloads
    /// read as zero.
    pub fn decode(self, bytes: &[u8]) -> DomainValue {
        match self {
            Self::Switch => DomainValue::Bool(decode_bool(bytes)),
            Self::Unsigned(_) => DomainValue::Int(decode_int(bytes)),
            Self::Percentage => {
                DomainValue::Percent(decode_percentage(bytes.last().copied().unwrap_or(0)))
            }
        }
    }
}
