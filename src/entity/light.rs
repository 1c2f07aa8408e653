//! Switchable light, optionally dimmable.

use crate::binding::{roles, DeviceSchema, Role, RoleSpec};
use crate::bus::GroupBus;
use crate::codec::{DomainValue, ValueKind};
use crate::config::DeviceConfig;
use crate::device::{Device, RoleState, UpdateReport};
use crate::entity::Entity;
use crate::error::Result;
use crate::observer::{LogObserver, Observer};

/// Name used when the configuration has none.
pub const DEFAULT_NAME: &str = "KNX Light";

/// Feature bit: the light accepts a brightness.
pub const SUPPORT_BRIGHTNESS: u32 = 1;

const SCHEMA: DeviceSchema = DeviceSchema {
    roles: &[
        RoleSpec::required(roles::BASE, ValueKind::Switch),
        RoleSpec::optional(roles::STATE, ValueKind::Switch).polled(),
        RoleSpec::optional(roles::BRIGHTNESS, ValueKind::Unsigned(1)).polled(),
        RoleSpec::optional(roles::DIMMER, ValueKind::Unsigned(1)),
    ],
    // A dimmer without read-back (or the reverse) is a configuration mistake
    inclusive: &[&[roles::BRIGHTNESS, roles::DIMMER]],
};

/// Arguments of [`Light::turn_on`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOnRequest {
    /// Brightness 0-255; ignored by lights without a dimmer.
    pub brightness: Option<u8>,
}

impl TurnOnRequest {
    /// Turn on at `brightness`.
    pub const fn with_brightness(brightness: u8) -> Self {
        Self { brightness: Some(brightness) }
    }
}

/// A light driven by group addresses.
///
/// On-state and brightness are tracked locally. Switching sets the on-state
/// right away, dimming sets the brightness once its write succeeded, and
/// polls overwrite both with whatever the bus reported in that pass.
#[derive(Debug)]
pub struct Light<B, O = LogObserver> {
    device: Device<B, O>,
    on: Option<bool>,
    brightness: Option<u8>,
}

impl<B: GroupBus> Light<B> {
    /// Create a light that logs through [`LogObserver`].
    ///
    /// # Errors
    ///
    /// Configuration error if the primary address is missing, or only one
    /// of `brightness` and `dimmer` is configured.
    pub fn new(config: &DeviceConfig, bus: B) -> Result<Self> {
        Self::with_observer(config, bus, LogObserver)
    }
}

impl<B: GroupBus, O: Observer> Light<B, O> {
    /// Create a light reporting to `observer`.
    pub fn with_observer(config: &DeviceConfig, bus: B, observer: O) -> Result<Self> {
        let name = config.name_or(DEFAULT_NAME);
        let device = Device::with_observer(name, config, &SCHEMA, bus, observer)?;
        Ok(Self {
            device,
            on: None,
            brightness: None,
        })
    }

    /// On-state, `None` until commanded or polled.
    pub fn is_on(&self) -> Option<bool> {
        self.on
    }

    /// Brightness 0-255, `None` until known or if not dimmable.
    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    /// True iff a dimmer address is configured.
    pub fn supports_brightness(&self) -> bool {
        self.device.has_attribute(roles::DIMMER)
    }

    /// Feature bitmask (`SUPPORT_BRIGHTNESS`).
    pub fn supported_features(&self) -> u32 {
        if self.supports_brightness() {
            SUPPORT_BRIGHTNESS
        } else {
            0
        }
    }

    /// Switch on, then dim if a brightness is requested and supported.
    ///
    /// # Errors
    ///
    /// Bus errors from either write. The light is recorded as on even when
    /// a write fails; the next poll corrects it. A failed switch write skips
    /// the dimmer.
    pub async fn turn_on(&mut self, request: TurnOnRequest) -> Result<()> {
        let switched = self.device.set_value(roles::BASE, DomainValue::Bool(true)).await;
        self.on = Some(true);
        switched?;

        let Some(brightness) = request.brightness else {
            return Ok(());
        };
        if !self.supports_brightness() {
            self.device.skip_command("turn_on brightness", roles::DIMMER);
            return Ok(());
        }

        self.device
            .set_value(roles::DIMMER, DomainValue::Int(u64::from(brightness)))
            .await?;
        self.brightness = Some(brightness);
        Ok(())
    }

    /// Switch off. The light is recorded as off even if the write fails.
    pub async fn turn_off(&mut self) -> Result<()> {
        let switched = self.device.set_value(roles::BASE, DomainValue::Bool(false)).await;
        self.on = Some(false);
        switched
    }

    /// Value of `role` if the last poll read it.
    fn refreshed(&self, role: Role) -> Option<u64> {
        if self.device.state(role) == RoleState::Fresh {
            self.device.int_value(role)
        } else {
            None
        }
    }

    /// The underlying device.
    pub fn device(&self) -> &Device<B, O> {
        &self.device
    }

    /// The underlying device, mutably.
    pub fn device_mut(&mut self) -> &mut Device<B, O> {
        &mut self.device
    }
}

impl<B: GroupBus, O: Observer> Entity for Light<B, O> {
    fn name(&self) -> &str {
        self.device.name()
    }

    async fn update(&mut self) -> UpdateReport {
        let report = self.device.update().await;

        // Roles that failed this pass keep the command state
        if let Some(state) = self.refreshed(roles::STATE) {
            self.on = Some(state != 0);
        }
        if self.supports_brightness() {
            if let Some(level) = self.refreshed(roles::BRIGHTNESS) {
                self.brightness = Some(u8::try_from(level).unwrap_or(u8::MAX));
            }
        }

        report
    }
}
