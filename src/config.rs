//! Device configuration: entity name plus role -> group address entries.
//!
//! Configurations come either from the builder API or from the same
//! `KEY=VALUE` text the platform configuration uses:
//!
//! ```text
//! # Living room shutter
//! name=Living Room
//! updown_address=9/0/0
//! stop_address=9/0/1
//! setposition_address=9/0/3
//! getposition_address=9/0/4
//! ```
//!
//! `address` is the device's primary address and maps to the `base` role;
//! every other `<role>_address` key maps to `<role>`. Keys that are neither
//! (e.g. `platform=knx`) belong to the host and are skipped.

use heapless::{String, Vec};

use crate::addressing::GroupAddress;
use crate::binding::roles;
use crate::error::{KnxError, Result};

/// Maximum number of role entries in one device configuration.
pub const MAX_CONFIG_ENTRIES: usize = 8;
/// Maximum entity name length in bytes.
pub const MAX_NAME_LEN: usize = 32;
/// Maximum role name length in bytes.
pub const MAX_ROLE_LEN: usize = 16;

/// Entity display name.
pub type Name = String<MAX_NAME_LEN>;
type RoleKey = String<MAX_ROLE_LEN>;

const NAME_KEY: &str = "name";
const ADDRESS_KEY: &str = "address";
const ADDRESS_SUFFIX: &str = "_address";

/// Role -> address configuration for one device.
///
/// # Examples
///
/// ```
/// use knx_entities::{config::DeviceConfig, ga};
///
/// let config = DeviceConfig::parse("
///     name=Kitchen
///     address=1/0/0
///     dimmer_address=1/0/1
///     brightness_address=1/0/2
/// ")?;
///
/// assert_eq!(config.name(), Some("Kitchen"));
/// assert_eq!(config.address("base"), Some(ga!(1/0/0)));
/// assert_eq!(config.address("dimmer"), Some(ga!(1/0/1)));
/// # Ok::<(), knx_entities::KnxError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    name: Option<Name>,
    entries: Vec<(RoleKey, GroupAddress), MAX_CONFIG_ENTRIES>,
}

impl DeviceConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// - Configuration error for a line without `=`, a duplicate role,
    ///   an over-long name or too many entries
    /// - Addressing error for an invalid group address
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::new();

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(KnxError::malformed_config)?;
            let (key, value) = (key.trim(), value.trim());

            if key == NAME_KEY {
                config.set_name(value)?;
            } else if let Some(role) = role_for_key(key) {
                config.insert(role, value.parse()?)?;
            }
        }

        Ok(config)
    }

    /// Builder form of [`set_name`](Self::set_name).
    pub fn with_name(mut self, name: &str) -> Result<Self> {
        self.set_name(name)?;
        Ok(self)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_address(mut self, role: &str, address: GroupAddress) -> Result<Self> {
        self.insert(role, address)?;
        Ok(self)
    }

    /// Set the entity name.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let mut owned = Name::new();
        owned.push_str(name).map_err(|_full| KnxError::name_too_long())?;
        self.name = Some(owned);
        Ok(())
    }

    /// Bind `role` to `address`. A role can only be configured once.
    pub fn insert(&mut self, role: &str, address: GroupAddress) -> Result<()> {
        if self.contains(role) {
            return Err(KnxError::duplicate_role());
        }
        let mut key = RoleKey::new();
        key.push_str(role).map_err(|_full| KnxError::malformed_config())?;
        self.entries
            .push((key, address))
            .map_err(|_full| KnxError::too_many_entries())
    }

    /// The configured entity name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The configured name, or `default` when none was given.
    pub fn name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.name().unwrap_or(default)
    }

    /// Address configured for `role`.
    pub fn address(&self, role: &str) -> Option<GroupAddress> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_str() == role)
            .map(|(_, address)| *address)
    }

    /// Whether `role` has an address.
    pub fn contains(&self, role: &str) -> bool {
        self.address(role).is_some()
    }

    /// Configured role names, in configuration order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Copy of this configuration where `from` is known as `to`, unless
    /// `to` is already configured.
    pub fn aliased(&self, from: &str, to: &str) -> Result<Self> {
        let mut config = self.clone();
        if config.contains(to) {
            return Ok(config);
        }
        if let Some((key, _)) = config.entries.iter_mut().find(|(key, _)| key.as_str() == from) {
            key.clear();
            key.push_str(to).map_err(|_full| KnxError::malformed_config())?;
        }
        Ok(config)
    }
}

fn role_for_key(key: &str) -> Option<&str> {
    if key == ADDRESS_KEY {
        Some(roles::BASE)
    } else {
        key.strip_suffix(ADDRESS_SUFFIX).filter(|role| !role.is_empty())
    }
}
