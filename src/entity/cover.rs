//! Cover (blind, shutter) with up/down, stop and optional positioning.
//!
//! Positions are percentages where 100 is fully open. On the bus they use
//! the inverted one-byte encoding: `0x00` is open, `0xFF` is closed.

use crate::binding::{roles, DeviceSchema, RoleSpec};
use crate::bus::GroupBus;
use crate::codec::{check_percentage, DomainValue, ValueKind};
use crate::config::DeviceConfig;
use crate::device::{Device, UpdateReport};
use crate::entity::Entity;
use crate::error::Result;
use crate::observer::{LogObserver, Observer};

/// Name used when the configuration has none.
pub const DEFAULT_NAME: &str = "KNX Cover";

const SCHEMA: DeviceSchema = DeviceSchema {
    roles: &[
        RoleSpec::required(roles::UPDOWN, ValueKind::Switch),
        RoleSpec::required(roles::STOP, ValueKind::Switch),
        RoleSpec::optional(roles::SETPOSITION, ValueKind::Percentage),
        RoleSpec::optional(roles::GETPOSITION, ValueKind::Percentage).polled(),
    ],
    inclusive: &[],
};

const UP: DomainValue = DomainValue::Int(0);
const DOWN: DomainValue = DomainValue::Int(1);
const STOP: DomainValue = DomainValue::Int(1);

/// Arguments of [`Cover::set_cover_position`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetPositionRequest {
    /// Target position in percent (100 = open). `None` means nothing to do.
    pub position: Option<i32>,
}

impl SetPositionRequest {
    /// Request moving to `position` percent.
    pub const fn to(position: i32) -> Self {
        Self { position: Some(position) }
    }
}

/// A cover driven by group addresses.
#[derive(Debug)]
pub struct Cover<B, O = LogObserver> {
    device: Device<B, O>,
    target: Option<u8>,
}

impl<B: GroupBus> Cover<B> {
    /// Create a cover that logs through [`LogObserver`].
    ///
    /// # Errors
    ///
    /// Configuration error if `updown` or `stop` has no address.
    pub fn new(config: &DeviceConfig, bus: B) -> Result<Self> {
        Self::with_observer(config, bus, LogObserver)
    }
}

impl<B: GroupBus, O: Observer> Cover<B, O> {
    /// Create a cover reporting to `observer`.
    pub fn with_observer(config: &DeviceConfig, bus: B, observer: O) -> Result<Self> {
        let name = config.name_or(DEFAULT_NAME);
        let device = Device::with_observer(name, config, &SCHEMA, bus, observer)?;
        Ok(Self { device, target: None })
    }

    /// Reported position in percent, `None` if unknown.
    pub fn current_cover_position(&self) -> Option<u8> {
        self.device.value(roles::GETPOSITION)?.as_percent()
    }

    /// `Some(true)` when fully closed, `None` if the position is unknown.
    pub fn is_closed(&self) -> Option<bool> {
        self.current_cover_position().map(|position| position == 0)
    }

    /// Last position requested through [`set_cover_position`](Self::set_cover_position).
    pub fn target_position(&self) -> Option<u8> {
        self.target
    }

    /// Whether the cover accepts position commands.
    pub fn supports_position(&self) -> bool {
        self.device.has_attribute(roles::SETPOSITION)
    }

    /// Move up.
    pub async fn open_cover(&mut self) -> Result<()> {
        self.device.set_value(roles::UPDOWN, UP).await
    }

    /// Move down.
    pub async fn close_cover(&mut self) -> Result<()> {
        self.device.set_value(roles::UPDOWN, DOWN).await
    }

    /// Stop moving.
    pub async fn stop_cover(&mut self) -> Result<()> {
        self.device.set_value(roles::STOP, STOP).await
    }

    /// Move to a position.
    ///
    /// Does nothing if the request carries no position or the cover has no
    /// `setposition` address.
    ///
    /// # Errors
    ///
    /// - Range error if the position is outside 0-100
    /// - Bus errors from the write
    pub async fn set_cover_position(&mut self, request: SetPositionRequest) -> Result<()> {
        let Some(position) = request.position else {
            return Ok(());
        };
        let position = check_percentage(position)?;

        if !self.supports_position() {
            self.device.skip_command("set_cover_position", roles::SETPOSITION);
            return Ok(());
        }

        self.target = Some(position);
        self.device
            .set_value(roles::SETPOSITION, DomainValue::Percent(position))
            .await
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

impl<B: GroupBus, O: Observer> Entity for Cover<B, O> {
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
    use crate::observer::RecordingObserver;
    use embassy_futures::block_on;

    const FULL: &str = "
        updown_address=9/0/0
        stop_address=9/0/1
        setposition_address=9/0/3
        getposition_address=9/0/4
    ";

    fn cover(text: &str) -> Cover<MockBus, RecordingObserver> {
        let config = DeviceConfig::parse(text).unwrap();
        Cover::with_observer(&config, MockBus::new(), RecordingObserver::default()).unwrap()
    }

    fn poll_position(cover: &mut Cover<MockBus, RecordingObserver>, raw: u8) {
        cover.device_mut().bus_mut().set_value(ga!(9 / 0 / 4), &[raw]);
        block_on(cover.update());
    }

    #[test]
    fn test_missing_stop() {
        let config = DeviceConfig::parse("updown_address=9/0/0").unwrap();
        let err = Cover::new(&config, MockBus::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::KnxError::Configuration(ref e) if e.role() == Some(roles::STOP)
        ));
    }

    #[test]
    fn test_default_name() {
        assert_eq!(cover(FULL).name(), DEFAULT_NAME);
    }

    #[test]
    fn test_closed_at_raw_255() {
        let mut cover = cover(FULL);
        poll_position(&mut cover, 255);
        assert_eq!(cover.current_cover_position(), Some(0));
        assert_eq!(cover.is_closed(), Some(true));
    }

    #[test]
    fn test_open_at_raw_0() {
        let mut cover = cover(FULL);
        poll_position(&mut cover, 0);
        assert_eq!(cover.current_cover_position(), Some(100));
        assert_eq!(cover.is_closed(), Some(false));
    }

    #[test]
    fn test_half_open() {
        let mut cover = cover(FULL);
        poll_position(&mut cover, 127);
        assert_eq!(cover.current_cover_position(), Some(50));
        assert_eq!(cover.is_closed(), Some(false));
    }

    #[test]
    fn test_position_unknown_without_getposition() {
        let mut cover = cover("updown_address=9/0/0\nstop_address=9/0/1");
        block_on(cover.update());
        assert_eq!(cover.current_cover_position(), None);
        assert_eq!(cover.is_closed(), None);
        assert!(cover.device().bus().reads().is_empty());
    }

    #[test]
    fn test_position_unknown_before_first_poll() {
        let cover = cover(FULL);
        assert_eq!(cover.current_cover_position(), None);
        assert_eq!(cover.is_closed(), None);
    }

    #[test]
    fn test_movement_commands() {
        let mut cover = cover(FULL);
        block_on(cover.open_cover()).unwrap();
        block_on(cover.close_cover()).unwrap();
        block_on(cover.stop_cover()).unwrap();

        let bus = cover.device().bus();
        let updown: std::vec::Vec<&[u8]> = bus.writes_to(ga!(9 / 0 / 0)).collect();
        assert_eq!(updown, [&[0u8][..], &[1u8][..]]);
        let stop: std::vec::Vec<&[u8]> = bus.writes_to(ga!(9 / 0 / 1)).collect();
        assert_eq!(stop, [&[1u8][..]]);
    }

    #[test]
    fn test_set_cover_position() {
        let mut cover = cover(FULL);
        block_on(cover.set_cover_position(SetPositionRequest::to(50))).unwrap();
        assert_eq!(cover.target_position(), Some(50));

        let (address, payload) = cover.device().bus().last_write().unwrap();
        assert_eq!(*address, ga!(9 / 0 / 3));
        assert_eq!(payload.as_slice(), &[127]);

        // Target does not fake the reported position
        assert_eq!(cover.current_cover_position(), None);
    }

    #[test]
    fn test_set_cover_position_without_position() {
        let mut cover = cover(FULL);
        block_on(cover.set_cover_position(SetPositionRequest::default())).unwrap();
        assert!(cover.device().bus().writes().is_empty());
        assert_eq!(cover.target_position(), None);
    }

    #[test]
    fn test_set_cover_position_unbound() {
        let mut cover = cover("updown_address=9/0/0\nstop_address=9/0/1");
        assert!(!cover.supports_position());
        block_on(cover.set_cover_position(SetPositionRequest::to(30))).unwrap();
        assert!(cover.device().bus().writes().is_empty());
        assert_eq!(cover.target_position(), None);
        let skipped = (std::string::String::from("set_cover_position"), roles::SETPOSITION);
        assert_eq!(cover.device().observer().skipped, [skipped]);
    }

    #[test]
    fn test_set_cover_position_out_of_range() {
        let mut cover = cover(FULL);
        for position in [-1, 101, 150] {
            let err =
                block_on(cover.set_cover_position(SetPositionRequest::to(position))).unwrap_err();
            assert!(err.is_range(), "position {position}");
        }
        assert!(cover.device().bus().writes().is_empty());
        assert_eq!(cover.target_position(), None);
    }

    #[test]
    fn test_command_write_failure() {
        let mut cover = cover(FULL);
        cover.device_mut().bus_mut().set_fail_writes(true);
        assert!(block_on(cover.open_cover()).unwrap_err().is_transient());
    }
}
