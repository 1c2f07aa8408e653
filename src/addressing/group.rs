//! KNX Group Address.
//!
//! Two textual formats are accepted when reading configuration:
//! - 3-level: Main/Middle/Sub (e.g., `9/0/3`) - most common
//! - 2-level: Main/Sub (e.g., `9/3`)
//!
//! Internally stored as 16 bits:
//! - Main: 5 bits (0-31)
//! - Middle: 3 bits (0-7)
//! - Sub: 8 bits (0-255), or 11 bits in the 2-level view

use crate::error::{KnxError, Result};
use core::fmt;

/// KNX Group Address
///
/// The bus endpoint a device role reads from or writes to.
///
/// # Examples
///
/// ```
/// use knx_entities::GroupAddress;
///
/// let addr = GroupAddress::new(9, 0, 3).unwrap();
/// assert_eq!(addr.to_string(), "9/0/3");
///
/// let parsed: GroupAddress = "9/0/3".parse().unwrap();
/// assert_eq!(parsed, addr);
///
/// let two_level: GroupAddress = "9/3".parse().unwrap();
/// assert_eq!(two_level, addr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupAddress {
    raw: u16,
}

impl GroupAddress {
    /// Maximum main group value (5 bits)
    pub const MAX_MAIN: u8 = 31;
    /// Maximum middle group value (3 bits)
    pub const MAX_MIDDLE: u8 = 7;
    /// Maximum sub value for 2-level format (11 bits)
    pub const MAX_SUB_2LEVEL: u16 = 2047;

    /// Create a 3-level Group Address (Main/Middle/Sub).
    ///
    /// # Errors
    ///
    /// Returns an addressing error if `main` or `middle` is out of range.
    pub fn new(main: u8, middle: u8, sub: u8) -> Result<Self> {
        if main > Self::MAX_MAIN || middle > Self::MAX_MIDDLE {
            return Err(KnxError::address_out_of_range());
        }
        let raw = (u16::from(main) << 11) | (u16::from(middle) << 8) | u16::from(sub);
        Ok(Self { raw })
    }

    /// Create a 2-level Group Address (Main/Sub).
    ///
    /// # Errors
    ///
    /// Returns an addressing error if `main` or `sub` is out of range.
    pub fn new_2level(main: u8, sub: u16) -> Result<Self> {
        if main > Self::MAX_MAIN || sub > Self::MAX_SUB_2LEVEL {
            return Err(KnxError::address_out_of_range());
        }
        Ok(Self {
            raw: (u16::from(main) << 11) | sub,
        })
    }

    /// Get the raw u16 representation of the address.
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Main group component (0-31).
    #[inline(always)]
    pub const fn main(self) -> u8 {
        ((self.raw >> 11) & 0x1F) as u8
    }

    /// Middle group component (0-7).
    #[inline(always)]
    pub const fn middle(self) -> u8 {
        ((self.raw >> 8) & 0x07) as u8
    }

    /// Sub group component (0-255).
    #[inline(always)]
    pub const fn sub(self) -> u8 {
        (self.raw & 0xFF) as u8
    }
}

impl From<u16> for GroupAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<GroupAddress> for u16 {
    #[inline(always)]
    fn from(addr: GroupAddress) -> u16 {
        addr.raw
    }
}

impl fmt::Display for GroupAddress {
    /// Always formats in 3-level notation
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.main(), self.middle(), self.sub())
    }
}

impl core::str::FromStr for GroupAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('/').map(str::trim);

        let main = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(KnxError::invalid_group_address)?;

        let second = parts
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(KnxError::invalid_group_address)?;

        match (parts.next(), parts.next()) {
            (None, _) => Self::new_2level(main, second),
            (Some(sub), None) => {
                let sub = sub
                    .parse::<u8>()
                    .map_err(|_invalid| KnxError::invalid_group_address())?;
                let middle =
                    u8::try_from(second).map_err(|_overflow| KnxError::address_out_of_range())?;
                Self::new(main, middle, sub)
            }
            (Some(_), Some(_)) => Err(KnxError::invalid_group_address()),
        }
    }
}
