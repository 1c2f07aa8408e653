//! Error types for KNX entity operations following M-ERRORS-CANONICAL-STRUCTS guideline.
//!
//! Every category is a struct wrapping a private kind enum, with a backtrace
//! when `std` is enabled and `is_*` helpers for callers that need to branch.
//!
//! | Category        | Raised by                                  | Recovery                     |
//! |-----------------|--------------------------------------------|------------------------------|
//! | `Configuration` | config parsing, role binding               | fatal, entity is not created |
//! | `Range`         | value encoding                             | caller bug, surfaced         |
//! | `RoleUnbound`   | writes to optional roles never configured  | check `has_attribute` first  |
//! | `Transport`     | the bus collaborator                       | retried on the next poll     |
//! | `Addressing`    | group address parsing and construction     | fix the configuration        |

use core::fmt;

#[cfg(feature = "std")]
use std::backtrace::Backtrace;

use crate::binding::Role;

/// Result type alias for KNX entity operations.
pub type Result<T> = core::result::Result<T, KnxError>;

// =============================================================================
// Error Kind Enums (Internal)
// =============================================================================

/// Configuration error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum ConfigurationErrorKind {
    MissingRole,
    IncompleteGroup,
    DuplicateRole,
    MalformedEntry,
    TooManyEntries,
    NameTooLong,
}

/// Range error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum RangeErrorKind {
    ValueOutOfRange,
    PayloadTooWide,
    IncompatibleValue,
}

/// Transport error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum TransportErrorKind {
    ReadFailed,
    WriteFailed,
    NoResponse,
    NotConnected,
}

/// Addressing error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum AddressingErrorKind {
    InvalidGroupAddress,
    OutOfRange,
}

// =============================================================================
// Main Error Type
// =============================================================================

/// KNX entity error types.
///
/// This is the main error type returned by all operations of the crate.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KnxError {
    /// Role/address configuration is incomplete or malformed
    Configuration(ConfigurationError),
    /// A domain value does not fit its encoding
    Range(RangeError),
    /// A write targeted an optional role with no address
    RoleUnbound(RoleUnboundError),
    /// The bus collaborator failed to read or write
    Transport(TransportError),
    /// Group address text or components are invalid
    Addressing(AddressingError),
    /// The bus did not answer within the configured bound
    Timeout,
}

// =============================================================================
// Structured Error Types
// =============================================================================

/// Configuration error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigurationError {
    kind: ConfigurationErrorKind,
    role: Option<Role>,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl ConfigurationError {
    pub(crate) fn new(kind: ConfigurationErrorKind, role: Option<Role>) -> Self {
        Self {
            kind,
            role,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// The role the error refers to, when there is one.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Check if a required role had no address
    pub fn is_missing_role(&self) -> bool {
        matches!(self.kind, ConfigurationErrorKind::MissingRole)
    }

    /// Check if only part of an all-or-nothing role group was configured
    pub fn is_incomplete_group(&self) -> bool {
        matches!(self.kind, ConfigurationErrorKind::IncompleteGroup)
    }

    /// Check if a role was configured twice
    pub fn is_duplicate_role(&self) -> bool {
        matches!(self.kind, ConfigurationErrorKind::DuplicateRole)
    }

    /// Check if a configuration line could not be parsed
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ConfigurationErrorKind::MalformedEntry)
    }
}

/// Range error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeError {
    kind: RangeErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl RangeError {
    pub(crate) fn new(kind: RangeErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if the value exceeded its domain range
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, RangeErrorKind::ValueOutOfRange)
    }

    /// Check if the requested width exceeds the maximum payload
    pub fn is_payload_too_wide(&self) -> bool {
        matches!(self.kind, RangeErrorKind::PayloadTooWide)
    }
}

/// Write to a role that has no bound address
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoleUnboundError {
    role: Role,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl RoleUnboundError {
    pub(crate) fn new(role: Role) -> Self {
        Self {
            role,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// The role that was not bound.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Transport error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportError {
    kind: TransportErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl TransportError {
    pub(crate) fn new(kind: TransportErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if a read got no answer from the bus
    pub fn is_no_response(&self) -> bool {
        matches!(self.kind, TransportErrorKind::NoResponse)
    }

    /// Check if the bus connection is down
    pub fn is_not_connected(&self) -> bool {
        matches!(self.kind, TransportErrorKind::NotConnected)
    }
}

/// Addressing error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressingError {
    kind: AddressingErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl AddressingError {
    pub(crate) fn new(kind: AddressingErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if address is out of range
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, AddressingErrorKind::OutOfRange)
    }
}

// =============================================================================
// Convenience Constructors for KnxError
// =============================================================================

impl KnxError {
    // Configuration errors
    pub(crate) fn missing_role(role: Role) -> Self {
        Self::Configuration(ConfigurationError::new(
            ConfigurationErrorKind::MissingRole,
            Some(role),
        ))
    }

    pub(crate) fn incomplete_group(role: Role) -> Self {
        Self::Configuration(ConfigurationError::new(
            ConfigurationErrorKind::IncompleteGroup,
            Some(role),
        ))
    }

    pub(crate) fn duplicate_role() -> Self {
        Self::Configuration(ConfigurationError::new(ConfigurationErrorKind::DuplicateRole, None))
    }

    pub(crate) fn malformed_config() -> Self {
        Self::Configuration(ConfigurationError::new(ConfigurationErrorKind::MalformedEntry, None))
    }

    pub(crate) fn too_many_entries() -> Self {
        Self::Configuration(ConfigurationError::new(ConfigurationErrorKind::TooManyEntries, None))
    }

    pub(crate) fn name_too_long() -> Self {
        Self::Configuration(ConfigurationError::new(ConfigurationErrorKind::NameTooLong, None))
    }

    // Range errors
    pub(crate) fn value_out_of_range() -> Self {
        Self::Range(RangeError::new(RangeErrorKind::ValueOutOfRange))
    }

    pub(crate) fn payload_too_wide() -> Self {
        Self::Range(RangeError::new(RangeErrorKind::PayloadTooWide))
    }

    pub(crate) fn incompatible_value() -> Self {
        Self::Range(RangeError::new(RangeErrorKind::IncompatibleValue))
    }

    // Role errors
    pub(crate) fn role_unbound(role: Role) -> Self {
        Self::RoleUnbound(RoleUnboundError::new(role))
    }

    // Transport errors
    /// Read failure, for [`GroupBus`](crate::bus::GroupBus) implementations.
    pub fn read_failed() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::ReadFailed))
    }

    /// Write failure, for [`GroupBus`](crate::bus::GroupBus) implementations.
    pub fn write_failed() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::WriteFailed))
    }

    /// No answer to a read request.
    pub fn no_response() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::NoResponse))
    }

    /// Connection to the bus is down.
    pub fn not_connected() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::NotConnected))
    }

    // Addressing errors
    pub(crate) fn invalid_group_address() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::InvalidGroupAddress))
    }

    pub(crate) fn address_out_of_range() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::OutOfRange))
    }

    // Category checks

    /// Check if this error is fatal at setup time.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if a value was rejected by a codec.
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(_))
    }

    /// Check if a write targeted an unbound role.
    pub fn is_role_unbound(&self) -> bool {
        matches!(self, Self::RoleUnbound(_))
    }

    /// Check if this is a transient bus failure (transport or timeout).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout)
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for KnxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnxError::Configuration(e) => match e.role {
                Some(role) => write!(f, "Configuration error: {:?} (role '{}')", e.kind, role),
                None => write!(f, "Configuration error: {:?}", e.kind),
            },
            KnxError::Range(e) => write!(f, "Range error: {:?}", e.kind),
            KnxError::RoleUnbound(e) => write!(f, "Role '{}' has no group address", e.role),
            KnxError::Transport(e) => write!(f, "Transport error: {:?}", e.kind),
            KnxError::Addressing(e) => write!(f, "Addressing error: {:?}", e.kind),
            KnxError::Timeout => write!(f, "Operation timeout"),
        }
    }
}

// Implement std::error::Error for std-based applications
#[cfg(feature = "std")]
impl std::error::Error for KnxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_role_carries_role() {
        let err = KnxError::missing_role("updown");
        assert!(err.is_configuration());
        match err {
            KnxError::Configuration(e) => {
                assert!(e.is_missing_role());
                assert_eq!(e.role(), Some("updown"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_categories() {
        assert!(KnxError::value_out_of_range().is_range());
        assert!(KnxError::role_unbound("dimmer").is_role_unbound());
        assert!(KnxError::read_failed().is_transient());
        assert!(KnxError::Timeout.is_transient());
        assert!(!KnxError::malformed_config().is_transient());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            KnxError::role_unbound("setposition").to_string(),
            "Role 'setposition' has no group address"
        );
        assert_eq!(
            KnxError::missing_role("stop").to_string(),
            "Configuration error: MissingRole (role 'stop')"
        );
        assert_eq!(KnxError::Timeout.to_string(), "Operation timeout");
    }
}
