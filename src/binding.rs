//! Address binding: resolving configured role -> address pairs against the
//! roles a device type requires or accepts.
//!
//! Roles outside a device's schema are ignored, so configurations written
//! for a newer schema still load.

use heapless::Vec;

use crate::addressing::GroupAddress;
use crate::codec::ValueKind;
use crate::config::DeviceConfig;
use crate::error::{KnxError, Result};

/// Name of a logical function inside a device.
pub type Role = &'static str;

/// Maximum number of roles one device can bind.
pub const MAX_ROLES: usize = 8;

/// Role names used by the built-in entities.
pub mod roles {
    use super::Role;

    /// Primary switching address of a light
    pub const BASE: Role = "base";
    /// Read-back of a switch or binary sensor
    pub const STATE: Role = "state";
    /// Cover up/down movement
    pub const UPDOWN: Role = "updown";
    /// Cover stop
    pub const STOP: Role = "stop";
    /// Cover target position
    pub const SETPOSITION: Role = "setposition";
    /// Cover reported position
    pub const GETPOSITION: Role = "getposition";
    /// Light brightness read-back
    pub const BRIGHTNESS: Role = "brightness";
    /// Light brightness command
    pub const DIMMER: Role = "dimmer";
}

/// A role resolved to its group address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressBinding {
    /// The role
    pub role: Role,
    /// Its address, fixed for the lifetime of the device
    pub address: GroupAddress,
    /// Whether the device type requires this role
    pub required: bool,
}

/// Resolved bindings in schema order.
pub type Bindings = Vec<AddressBinding, MAX_ROLES>;

/// Resolve `config` against the given role sets.
///
/// Required roles come first in the result, then whichever optional roles
/// are configured. Roles in `config` that appear in neither set are ignored.
///
/// # Errors
///
/// Configuration error naming the first required role without an address,
/// or if more than [`MAX_ROLES`] roles would be bound.
///
/// # Examples
///
/// ```
/// use knx_entities::{binding::bind, device_config};
///
/// let config = device_config! { "updown" => 9/0/0, "stop" => 9/0/1 }?;
/// let bindings = bind(&config, ["updown", "stop"], ["setposition", "getposition"])?;
/// assert_eq!(bindings.len(), 2);
///
/// let err = bind(&config, ["updown", "stop", "extra"], []).unwrap_err();
/// assert!(err.is_configuration());
/// # Ok::<(), knx_entities::KnxError>(())
/// ```
pub fn bind<R, O>(config: &DeviceConfig, required: R, optional: O) -> Result<Bindings>
where
    R: IntoIterator<Item = Role>,
    O: IntoIterator<Item = Role>,
{
    let mut bindings = Bindings::new();

    for role in required {
        let address = config.address(role).ok_or_else(|| KnxError::missing_role(role))?;
        push(&mut bindings, AddressBinding { role, address, required: true })?;
    }

    for role in optional {
        if let Some(address) = config.address(role) {
            push(&mut bindings, AddressBinding { role, address, required: false })?;
        }
    }

    Ok(bindings)
}

fn push(bindings: &mut Bindings, binding: AddressBinding) -> Result<()> {
    bindings
        .push(binding)
        .map_err(|_full| KnxError::too_many_entries())
}

/// Check that each group of roles is configured entirely or not at all.
///
/// # Errors
///
/// Configuration error naming the first missing role of a partial group.
pub fn check_inclusive(config: &DeviceConfig, groups: &[&[Role]]) -> Result<()> {
    for group in groups {
        let configured = group.iter().filter(|role| config.contains(role)).count();
        if configured != 0 && configured != group.len() {
            if let Some(missing) = group.iter().find(|role| !config.contains(role)) {
                return Err(KnxError::incomplete_group(*missing));
            }
        }
    }
    Ok(())
}

/// One role a device type knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoleSpec {
    /// Role name
    pub role: Role,
    /// Codec view of its payload
    pub kind: ValueKind,
    /// Construction fails without it
    pub required: bool,
    /// Read on every `update()`
    pub polled: bool,
}

impl RoleSpec {
    /// A required, write-only role.
    pub const fn required(role: Role, kind: ValueKind) -> Self {
        Self { role, kind, required: true, polled: false }
    }

    /// An optional, write-only role.
    pub const fn optional(role: Role, kind: ValueKind) -> Self {
        Self { role, kind, required: false, polled: false }
    }

    /// Mark the role as read on every poll.
    pub const fn polled(mut self) -> Self {
        self.polled = true;
        self
    }
}

/// The roles of a device type plus its all-or-nothing role groups.
#[derive(Debug, Clone, Copy)]
pub struct DeviceSchema {
    /// Known roles, in binding order
    pub roles: &'static [RoleSpec],
    /// Roles that must be configured together
    pub inclusive: &'static [&'static [Role]],
}

impl DeviceSchema {
    /// Required role names.
    pub fn required(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().filter(|spec| spec.required).map(|spec| spec.role)
    }

    /// Optional role names.
    pub fn optional(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().filter(|spec| !spec.required).map(|spec| spec.role)
    }

    /// Spec for `role`, if the schema knows it.
    pub fn spec(&self, role: &str) -> Option<&RoleSpec> {
        self.roles.iter().find(|spec| spec.role == role)
    }

    /// Resolve `config` against this schema.
    pub fn bind(&self, config: &DeviceConfig) -> Result<Bindings> {
        check_inclusive(config, self.inclusive)?;
        bind(config, self.required(), self.optional())
    }

    /// Configured roles this schema does not know.
    pub fn unknown_roles<'a>(
        &'a self,
        config: &'a DeviceConfig,
    ) -> impl Iterator<Item = &'a str> + 'a {
        config.roles().filter(move |role| self.spec(role).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga;

    const SCHEMA: DeviceSchema = DeviceSchema {
        roles: &[
            RoleSpec::required(roles::UPDOWN, ValueKind::Switch),
            RoleSpec::required(roles::STOP, ValueKind::Switch),
            RoleSpec::optional(roles::SETPOSITION, ValueKind::Percentage),
            RoleSpec::optional(roles::GETPOSITION, ValueKind::Percentage).polled(),
        ],
        inclusive: &[],
    };

    fn cover_config() -> DeviceConfig {
        DeviceConfig::new()
            .with_address("updown", ga!(9 / 0 / 0))
            .unwrap()
            .with_address("stop", ga!(9 / 0 / 1))
            .unwrap()
    }

    #[test]
    fn test_bind_required_only() {
        let bindings = bind(&cover_config(), ["updown", "stop"], ["setposition"]).unwrap();
        assert_eq!(
            bindings.as_slice(),
            &[
                AddressBinding { role: "updown", address: ga!(9 / 0 / 0), required: true },
                AddressBinding { role: "stop", address: ga!(9 / 0 / 1), required: true },
            ]
        );
    }

    #[test]
    fn test_bind_missing_required() {
        let config = DeviceConfig::new().with_address("updown", ga!(9 / 0 / 0)).unwrap();
        let err = bind(&config, ["updown", "stop"], []).unwrap_err();
        match err {
            KnxError::Configuration(e) => {
                assert!(e.is_missing_role());
                assert_eq!(e.role(), Some("stop"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bind_optional_present() {
        let config = cover_config().with_address("getposition", ga!(9 / 0 / 4)).unwrap();
        let bindings = SCHEMA.bind(&config).unwrap();
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[2].role, "getposition");
        assert!(!bindings[2].required);
    }

    #[test]
    fn test_bind_ignores_unknown_roles() {
        let config = cover_config().with_address("tilt", ga!(9 / 0 / 7)).unwrap();
        let bindings = SCHEMA.bind(&config).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(SCHEMA.unknown_roles(&config).collect::<std::vec::Vec<_>>(), ["tilt"]);
    }

    #[test]
    fn test_inclusive_group() {
        let group: &[&[Role]] = &[&["brightness", "dimmer"]];
        let none = DeviceConfig::new();
        assert!(check_inclusive(&none, group).is_ok());

        let both = DeviceConfig::new()
            .with_address("brightness", ga!(1 / 0 / 2))
            .unwrap()
            .with_address("dimmer", ga!(1 / 0 / 1))
            .unwrap();
        assert!(check_inclusive(&both, group).is_ok());

        let partial = DeviceConfig::new().with_address("dimmer", ga!(1 / 0 / 1)).unwrap();
        match check_inclusive(&partial, group).unwrap_err() {
            KnxError::Configuration(e) => {
                assert!(e.is_incomplete_group());
                assert_eq!(e.role(), Some("brightness"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_schema_role_sets() {
        assert_eq!(SCHEMA.required().collect::<std::vec::Vec<_>>(), ["updown", "stop"]);
        assert_eq!(SCHEMA.optional().collect::<std::vec::Vec<_>>(), ["setposition", "getposition"]);
        assert!(SCHEMA.spec("getposition").unwrap().polled);
        assert!(SCHEMA.spec("tilt").is_none());
    }
}
