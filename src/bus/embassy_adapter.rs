//! Embassy integration for the bus collaborator.
//!
//! - [`TimeoutBus`] bounds every read and write with `embassy_time::with_timeout`,
//!   so entity commands and polls can never hang on a silent bus.
//! - `&Mutex<M, B>` implements [`GroupBus`], letting entities in different
//!   tasks share one connection.
//!
//! ## Example
//!
//! ```rust,ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use embassy_sync::mutex::Mutex;
//! use embassy_time::Duration;
//! use knx_entities::bus::TimeoutBus;
//!
//! type SharedBus = Mutex<CriticalSectionRawMutex, TimeoutBus<TunnelBus>>;
//! static BUS: StaticCell<SharedBus> = StaticCell::new();
//! let bus = BUS.init(Mutex::new(TimeoutBus::new(tunnel, Duration::from_secs(3))));
//!
//! let mut cover = Cover::new(&cover_config, &*bus)?;
//! let mut light = Light::new(&light_config, &*bus)?;
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Duration};

use crate::addressing::GroupAddress;
use crate::bus::transport::GroupBus;
use crate::codec::Payload;
use crate::error::{KnxError, Result};

/// Default bound for a single read or write (same as a tunnel response).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// A [`GroupBus`] whose operations fail with [`KnxError::Timeout`] instead
/// of waiting forever.
#[derive(Debug)]
pub struct TimeoutBus<B> {
    inner: B,
    timeout: Duration,
}

impl<B: GroupBus> TimeoutBus<B> {
    /// Wrap `inner`, bounding each operation by `timeout`.
    pub const fn new(inner: B, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Wrap `inner` with [`DEFAULT_TIMEOUT`].
    pub const fn with_default_timeout(inner: B) -> Self {
        Self::new(inner, DEFAULT_TIMEOUT)
    }

    /// The wrapped bus.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// The wrapped bus, mutably.
    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// Unwrap the inner bus.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: GroupBus> GroupBus for TimeoutBus<B> {
    async fn read(&mut self, address: GroupAddress) -> Result<Payload> {
        with_timeout(self.timeout, self.inner.read(address))
            .await
            .map_err(|_elapsed| KnxError::Timeout)?
    }

    async fn write(&mut self, address: GroupAddress, payload: &[u8]) -> Result<()> {
        with_timeout(self.timeout, self.inner.write(address, payload))
            .await
            .map_err(|_elapsed| KnxError::Timeout)?
    }

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }
}

impl<M: RawMutex, B: GroupBus> GroupBus for &Mutex<M, B> {
    async fn read(&mut self, address: GroupAddress) -> Result<Payload> {
        self.lock().await.read(address).await
    }

    async fn write(&mut self, address: GroupAddress, payload: &[u8]) -> Result<()> {
        self.lock().await.write(address, payload).await
    }

    fn is_ready(&self) -> bool {
        // A bus busy with another entity's telegram is still connected
        self.try_lock().map_or(true, |bus| bus.is_ready())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MockBus;
    use crate::entity::{Cover, Entity, Light, TurnOnRequest};
    use crate::{ga, DeviceConfig};
    use core::pin::pin;
    use core::task::Poll;
    use embassy_futures::{block_on, poll_once};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_time::MockDriver;

    /// A bus whose operations never complete.
    #[derive(Debug)]
    struct SilentBus;

    impl GroupBus for SilentBus {
        async fn read(&mut self, _address: GroupAddress) -> Result<Payload> {
            core::future::pending().await
        }

        async fn write(&mut self, _address: GroupAddress, _payload: &[u8]) -> Result<()> {
            core::future::pending().await
        }
    }

    #[test]
    fn test_timeout_bounds_silent_bus() {
        let driver = MockDriver::get();
        driver.reset();
        let mut bus = TimeoutBus::with_default_timeout(SilentBus);

        {
            let mut read = pin!(bus.read(ga!(9 / 0 / 4)));
            assert!(poll_once(read.as_mut()).is_pending());

            driver.advance(Duration::from_secs(1));
            assert!(poll_once(read.as_mut()).is_pending());

            driver.advance(DEFAULT_TIMEOUT);
            assert!(matches!(poll_once(read.as_mut()), Poll::Ready(Err(KnxError::Timeout))));
        }

        let mut write = pin!(bus.write(ga!(9 / 0 / 0), &[1]));
        assert!(poll_once(write.as_mut()).is_pending());
        driver.advance(DEFAULT_TIMEOUT);
        match poll_once(write.as_mut()) {
            Poll::Ready(Err(err)) => assert!(err.is_transient()),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_timeout_passes_through_answers() {
        let mut inner = MockBus::new();
        inner.set_value(ga!(9 / 0 / 4), &[0x80]);
        let mut bus = TimeoutBus::new(inner, Duration::from_millis(500));

        let payload = block_on(bus.read(ga!(9 / 0 / 4))).unwrap();
        assert_eq!(payload.as_slice(), &[0x80]);
        block_on(bus.write(ga!(9 / 0 / 0), &[1])).unwrap();

        // Inner errors are not turned into timeouts
        let err = block_on(bus.read(ga!(9 / 0 / 5))).unwrap_err();
        assert!(matches!(err, KnxError::Transport(ref e) if e.is_no_response()));

        assert!(bus.is_ready());
        assert_eq!(bus.into_inner().writes().len(), 1);
    }

    #[test]
    fn test_entities_share_mutex_bus() {
        let mut inner = MockBus::new();
        inner.set_value(ga!(9 / 0 / 4), &[0xFF]);
        inner.set_value(ga!(1 / 0 / 1), &[1]);
        let bus: Mutex<NoopRawMutex, MockBus> = Mutex::new(inner);

        let cover_text = "updown_address=9/0/0\nstop_address=9/0/1\ngetposition_address=9/0/4";
        let cover_config = DeviceConfig::parse(cover_text).unwrap();
        let light_config = DeviceConfig::parse("address=1/0/0\nstate_address=1/0/1").unwrap();
        let mut cover = Cover::new(&cover_config, &bus).unwrap();
        let mut light = Light::new(&light_config, &bus).unwrap();

        block_on(async {
            cover.update().await;
            light.update().await;
            cover.open_cover().await.unwrap();
            light.turn_on(TurnOnRequest::default()).await.unwrap();
        });

        assert_eq!(cover.is_closed(), Some(true));
        assert_eq!(light.is_on(), Some(true));

        let shared = block_on(bus.lock());
        assert_eq!(shared.reads(), &[ga!(9 / 0 / 4), ga!(1 / 0 / 1)]);
        assert_eq!(shared.writes().len(), 2);
        assert_eq!(shared.writes()[0].0, ga!(9 / 0 / 0));
        assert_eq!(shared.writes()[1].0, ga!(1 / 0 / 0));
    }

    #[test]
    fn test_locked_mutex_bus_reports_ready() {
        let bus: Mutex<NoopRawMutex, MockBus> = Mutex::new(MockBus::new());
        let handle = &bus;
        assert!(handle.is_ready());

        let guard = block_on(bus.lock());
        assert!(handle.is_ready());
        drop(guard);

        block_on(bus.lock()).set_ready(false);
        assert!(!handle.is_ready());
    }
}
