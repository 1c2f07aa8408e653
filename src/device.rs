//! Device adapter: a set of role bindings, a per-role value cache, and the
//! read/write/poll surface every entity is built on.
//!
//! ## Role lifecycle
//!
//! ```text
//! Unbound ── (optional role, no address; permanent)
//!
//! Bound ──update() ok──► Fresh ──set_value() or failed read──► Stale
//!   │                      ▲                                   │
//!   └──update() fails──┘   └──────────update() ok──────────────┘
//!      (stays Bound)
//! ```
//!
//! The cached value only changes on a successful read: a write marks a
//! cached role stale until the next successful read instead of guessing the
//! bus value. A failed read keeps the previous value, marked stale, and the
//! remaining roles are still read. Fresh therefore means "read during the
//! last `update()`".
//!
//! ## Example
//!
//! ```rust
//! use knx_entities::binding::{roles, DeviceSchema, RoleSpec};
//! use knx_entities::bus::MockBus;
//! use knx_entities::codec::{DomainValue, ValueKind};
//! use knx_entities::device::{Device, RoleState};
//! use knx_entities::{device_config, ga};
//!
//! const SWITCH: DeviceSchema = DeviceSchema {
//!     roles: &[
//!         RoleSpec::required(roles::BASE, ValueKind::Switch),
//!         RoleSpec::optional(roles::STATE, ValueKind::Switch).polled(),
//!     ],
//!     inclusive: &[],
//! };
//!
//! let config = device_config! { "base" => 1/0/0, "state" => 1/0/1 }?;
//! let mut bus = MockBus::new();
//! bus.set_value(ga!(1/0/1), &[1]);
//!
//! let mut device = Device::new("Switch", &config, &SWITCH, bus)?;
//! assert_eq!(device.state(roles::STATE), RoleState::Bound);
//!
//! embassy_futures::block_on(async {
//!     device.update().await;
//!     assert_eq!(device.value(roles::STATE), Some(DomainValue::Bool(true)));
//!     device.set_value(roles::BASE, DomainValue::Bool(false)).await
//! })?;
//! # Ok::<(), knx_entities::KnxError>(())
//! ```

use heapless::Vec;

use crate::addressing::GroupAddress;
use crate::binding::{AddressBinding, DeviceSchema, Role, MAX_ROLES};
use crate::bus::GroupBus;
use crate::codec::{decode_int, DomainValue, Payload, ValueKind};
use crate::config::{DeviceConfig, Name};
use crate::error::{KnxError, Result};
use crate::observer::{LogObserver, Observer};

/// Where a role is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoleState {
    /// No address configured
    Unbound,
    /// Address configured, no value read yet
    Bound,
    /// Cache holds the latest value read from the bus
    Fresh,
    /// Written since the last read; cached value may be outdated
    Stale,
}

/// Outcome of one `update()` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateReport {
    /// Roles whose cache entry was replaced
    pub refreshed: u8,
    /// Roles whose read failed (cache kept)
    pub failed: u8,
}

impl UpdateReport {
    /// True when every polled role was read.
    pub const fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Payload,
    fresh: bool,
}

/// A bound role with its codec view and cached value.
#[derive(Debug, Clone)]
struct Slot {
    binding: AddressBinding,
    kind: ValueKind,
    polled: bool,
    cache: Option<CacheEntry>,
}

/// A device assembled from group address bindings.
///
/// Generic over the bus `B` it talks through and the [`Observer`] `O` that
/// receives its events.
#[derive(Debug)]
pub struct Device<B, O = LogObserver> {
    name: Name,
    bus: B,
    observer: O,
    slots: Vec<Slot, MAX_ROLES>,
}

impl<B: GroupBus> Device<B> {
    /// Bind `config` against `schema`, logging through [`LogObserver`].
    ///
    /// # Errors
    ///
    /// Configuration error if a required role is missing, an inclusive
    /// role group is only partly configured, or the name is too long.
    pub fn new(name: &str, config: &DeviceConfig, schema: &DeviceSchema, bus: B) -> Result<Self> {
        Self::with_observer(name, config, schema, bus, LogObserver)
    }
}

impl<B: GroupBus, O: Observer> Device<B, O> {
    /// Bind `config` against `schema`, reporting to `observer`.
    pub fn with_observer(
        name: &str,
        config: &DeviceConfig,
        schema: &DeviceSchema,
        bus: B,
        mut observer: O,
    ) -> Result<Self> {
        let mut owned_name = Name::new();
        owned_name.push_str(name).map_err(|_full| KnxError::name_too_long())?;

        let bindings = schema.bind(config)?;
        for role in schema.unknown_roles(config) {
            observer.role_ignored(name, role);
        }

        let mut slots = Vec::new();
        for binding in bindings {
            // bind() only returns roles taken from the schema
            let Some(spec) = schema.spec(binding.role) else {
                continue;
            };
            let slot = Slot {
                binding,
                kind: spec.kind,
                polled: spec.polled,
                cache: None,
            };
            slots.push(slot).map_err(|_full| KnxError::too_many_entries())?;
        }

        Ok(Self {
            name: owned_name,
            bus,
            observer,
            slots,
        })
    }

    /// Device name used in observer events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True iff `role` has a group address.
    pub fn has_attribute(&self, role: &str) -> bool {
        self.slot(role).is_some()
    }

    /// Group address bound to `role`.
    pub fn address(&self, role: &str) -> Option<GroupAddress> {
        self.slot(role).map(|slot| slot.binding.address)
    }

    /// All bindings, required roles first.
    pub fn bindings(&self) -> impl Iterator<Item = &AddressBinding> {
        self.slots.iter().map(|slot| &slot.binding)
    }

    /// Lifecycle state of `role`.
    pub fn state(&self, role: &str) -> RoleState {
        match self.slot(role) {
            None => RoleState::Unbound,
            Some(Slot { cache: None, .. }) => RoleState::Bound,
            Some(Slot { cache: Some(entry), .. }) if entry.fresh => RoleState::Fresh,
            Some(_) => RoleState::Stale,
        }
    }

    /// Cached value of `role`, decoded through the role's codec.
    ///
    /// `None` if the role is unbound or was never read.
    pub fn value(&self, role: &str) -> Option<DomainValue> {
        let slot = self.slot(role)?;
        let entry = slot.cache.as_ref()?;
        Some(slot.kind.decode(&entry.payload))
    }

    /// Cached value of `role` as a raw unsigned integer.
    pub fn int_value(&self, role: &str) -> Option<u64> {
        self.raw_value(role).map(decode_int)
    }

    /// Cached payload of `role`.
    pub fn raw_value(&self, role: &str) -> Option<&[u8]> {
        self.slot(role)?.cache.as_ref().map(|entry| entry.payload.as_slice())
    }

    /// Encode `value` for `role` and write it to the bus.
    ///
    /// The write does not touch the cached value; a cached role turns
    /// [`RoleState::Stale`] until the next successful `update()`.
    ///
    /// # Errors
    ///
    /// - `RoleUnbound` if `role` has no address (nothing is written)
    /// - `Range` if `value` does not fit the role's codec
    /// - whatever the bus reports for the write
    pub async fn set_value(&mut self, role: Role, value: DomainValue) -> Result<()> {
        let index = self.index(role).ok_or_else(|| KnxError::role_unbound(role))?;
        let (binding, kind) = (self.slots[index].binding, self.slots[index].kind);
        let payload = kind.encode(value)?;

        match self.bus.write(binding.address, &payload).await {
            Ok(()) => {
                self.observer.written(&self.name, binding.role, binding.address, &payload);
                if let Some(entry) = self.slots[index].cache.as_mut() {
                    entry.fresh = false;
                }
                Ok(())
            }
            Err(error) => {
                self.observer.write_failed(&self.name, binding.role, binding.address, &error);
                Err(error)
            }
        }
    }

    /// Read every bound polled role and refresh its cache entry.
    ///
    /// Never fails: a role whose read fails keeps its previous value (now
    /// [`RoleState::Stale`]) and the remaining roles are still read.
    pub async fn update(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();

        for index in 0..self.slots.len() {
            if !self.slots[index].polled {
                continue;
            }
            let binding = self.slots[index].binding;

            match self.bus.read(binding.address).await {
                Ok(payload) => {
                    self.observer.refreshed(&self.name, binding.role, binding.address, &payload);
                    self.slots[index].cache = Some(CacheEntry { payload, fresh: true });
                    report.refreshed += 1;
                }
                Err(error) => {
                    self.observer.read_failed(&self.name, binding.role, binding.address, &error);
                    if let Some(entry) = self.slots[index].cache.as_mut() {
                        entry.fresh = false;
                    }
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// The bus this device talks through.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// The bus this device talks through, mutably.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// The injected observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The injected observer, mutably. Entities report skipped commands here.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Report a command that was dropped because `role` is unbound.
    pub(crate) fn skip_command(&mut self, command: &str, role: Role) {
        self.observer.command_skipped(&self.name, command, role);
    }

    fn index(&self, role: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.binding.role == role)
    }

    fn slot(&self, role: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.binding.role == role)
    }
}
