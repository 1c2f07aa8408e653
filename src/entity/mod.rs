//! Entity facades: domain views over a [`Device`](crate::device::Device).
//!
//! Each facade owns one device, translates host commands into role writes
//! and projects the device cache into domain state. None of them knows
//! anything about the bus beyond the [`GroupBus`] it was handed.
//!
//! ## Polling
//!
//! ```rust
//! use knx_entities::bus::MockBus;
//! use knx_entities::entity::{BinarySensor, Entity};
//! use knx_entities::{config::DeviceConfig, ga};
//!
//! let config = DeviceConfig::parse("name=Door\naddress=3/0/1")?;
//! let mut bus = MockBus::new();
//! bus.set_value(ga!(3/0/1), &[1]);
//!
//! let mut door = BinarySensor::new(&config, bus)?;
//! assert!(door.should_poll());
//!
//! embassy_futures::block_on(door.update());
//! assert_eq!(door.is_on(), Some(true));
//! # Ok::<(), knx_entities::KnxError>(())
//! ```

use crate::device::UpdateReport;

pub mod binary_sensor;
pub mod cover;
pub mod light;

#[doc(inline)]
pub use binary_sensor::BinarySensor;
#[doc(inline)]
pub use cover::{Cover, SetPositionRequest};
#[doc(inline)]
pub use light::{Light, TurnOnRequest, SUPPORT_BRIGHTNESS};

/// What the host's entity registry needs from every facade.
#[allow(async_fn_in_trait)]
pub trait Entity {
    /// Display name.
    fn name(&self) -> &str;

    /// Whether the host must call [`update`](Self::update) periodically.
    /// State is never pushed, so this is always true.
    fn should_poll(&self) -> bool {
        true
    }

    /// Refresh cached state from the bus. Transport failures degrade to
    /// the previous state and are reported to the device's observer.
    async fn update(&mut self) -> UpdateReport;
}

/// Poll every entity once, in order.
///
/// Returns the combined report.
pub async fn update_all<E: Entity>(entities: &mut [E]) -> UpdateReport {
    let mut total = UpdateReport::default();
    for entity in entities.iter_mut() {
        let report = entity.update().await;
        total.refreshed = total.refreshed.saturating_add(report.refreshed);
        total.failed = total.failed.saturating_add(report.failed);
    }
    total
}
