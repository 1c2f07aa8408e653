//! Binary sensor: one polled boolean address.

use crate::binding::{roles, DeviceSchema, RoleSpec};
use crate::bus::GroupBus;
use crate::codec::ValueKind;
use crate::config::DeviceConfig;
use crate::device::{Device, UpdateReport};
use crate::entity::Entity;
use crate::error::Result;
use crate::observer::{LogObserver, Observer};

/// Name used when the configuration has none.
pub const DEFAULT_NAME: &str = "KNX Binary Sensor";

const SCHEMA: DeviceSchema = DeviceSchema {
    roles: &[RoleSpec::required(roles::STATE, ValueKind::Switch).polled()],
    inclusive: &[],
};

/// A sensor whose single address is both its identity and its read-back.
///
/// Configured with `address=` (or `state_address=`).
#[derive(Debug)]
pub struct BinarySensor<B, O = LogObserver> {
    device: Device<B, O>,
}

impl<B: GroupBus> BinarySensor<B> {
    /// Create a sensor that logs through [`LogObserver`].
    ///
    /// # Errors
    ///
    /// Configuration error if no address is configured.
    pub fn new(config: &DeviceConfig, bus: B) -> Result<Self> {
        Self::with_observer(config, bus, LogObserver)
    }
}

impl<B: GroupBus, O: Observer> BinarySensor<B, O> {
    /// Create a sensor reporting to `observer`.
    pub fn with_observer(config: &DeviceConfig, bus: B, observer: O) -> Result<Self> {
        let config = config.aliased(roles::BASE, roles::STATE)?;
        let name = config.name_or(DEFAULT_NAME);
        let device = Device::with_observer(name, &config, &SCHEMA, bus, observer)?;
        Ok(Self { device })
    }

    /// Last polled state; `None` before the first successful read.
    pub fn is_on(&self) -> Option<bool> {
        self.device.value(roles::STATE)?.as_bool()
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

impl<B: GroupBus, O: Observer> Entity for BinarySensor<B, O> {
    fn name(&self) -> &str {
        self.device.name()
    }

    async fn update(&mut self) -> UpdateReport {
        self.device.update().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MockBus;
    use crate::ga;
    use embassy_futures::block_on;

    fn sensor(text: &str) -> BinarySensor<MockBus> {
        BinarySensor::new(&DeviceConfig::parse(text).unwrap(), MockBus::new()).unwrap()
    }

    #[test]
    fn test_default_name() {
        assert_eq!(sensor("address=3/0/1").name(), DEFAULT_NAME);
        assert_eq!(sensor("name=Door\naddress=3/0/1").name(), "Door");
    }

    #[test]
    fn test_address_is_state() {
        let sensor = sensor("address=3/0/1");
        assert_eq!(sensor.device().address(roles::STATE), Some(ga!(3 / 0 / 1)));
        assert!(!sensor.device().has_attribute(roles::BASE));
    }

    #[test]
    fn test_missing_address() {
        let err = BinarySensor::new(&DeviceConfig::new(), MockBus::new()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_until_polled() {
        let mut sensor = sensor("address=3/0/1");
        assert_eq!(sensor.is_on(), None);

        // No answer yet: still unknown
        let report = block_on(sensor.update());
        assert_eq!(report.failed, 1);
        assert_eq!(sensor.is_on(), None);
    }

    #[test]
    fn test_nonzero_is_on() {
        let mut sensor = sensor("address=3/0/1");
        for (raw, expected) in [(0u8, false), (1, true), (0x80, true)] {
            sensor.device_mut().bus_mut().set_value(ga!(3 / 0 / 1), &[raw]);
            block_on(sensor.update());
            assert_eq!(sensor.is_on(), Some(expected), "raw {raw:#04x}");
        }
    }

    #[test]
    fn test_keeps_last_state_on_failure() {
        let mut sensor = sensor("address=3/0/1");
        sensor.device_mut().bus_mut().set_value(ga!(3 / 0 / 1), &[1]);
        block_on(sensor.update());

        sensor.device_mut().bus_mut().fail_reads(ga!(3 / 0 / 1));
        block_on(sensor.update());
        assert_eq!(sensor.is_on(), Some(true));
    }
}
