//! Group value transport abstraction.
//!
//! This module provides the `GroupBus` trait that abstracts how group
//! values reach the bus, enabling:
//! - Testability through [`MockBus`](super::MockBus)
//! - Any transport underneath (tunneling, routing, serial)
//! - Dependency Inversion: devices depend on the trait, transports implement it
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_entities::bus::GroupBus;
//! use knx_entities::codec::Payload;
//! use knx_entities::{GroupAddress, Result};
//!
//! struct TunnelBus { /* tunnel client */ }
//!
//! impl GroupBus for TunnelBus {
//!     async fn read(&mut self, address: GroupAddress) -> Result<Payload> {
//!         // send GroupValue_Read, wait for GroupValue_Response
//!         # unimplemented!()
//!     }
//!
//!     async fn write(&mut self, address: GroupAddress, payload: &[u8]) -> Result<()> {
//!         // send GroupValue_Write
//!         # unimplemented!()
//!     }
//! }
//! ```

use crate::addressing::GroupAddress;
use crate::codec::Payload;
use crate::error::Result;

/// Asynchronous group value transport.
///
/// # Contract
///
/// - `read` asks the bus for the current value of `address` and returns the
///   answer's payload. It may take as long as the bus does; bounding that
///   wait is the implementation's job (see `TimeoutBus` with the `embassy`
///   feature).
/// - `write` sends a value. Fire-and-forget is acceptable: confirmation, if
///   any, shows up on a later read.
/// - Failures are reported as transport errors; devices never retry.
#[allow(async_fn_in_trait)]
pub trait GroupBus {
    /// Read the current value of a group address.
    ///
    /// # Errors
    ///
    /// Returns a transport error (or `Timeout`) when no value arrives.
    async fn read(&mut self, address: GroupAddress) -> Result<Payload>;

    /// Write a value to a group address.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the telegram could not be sent.
    async fn write(&mut self, address: GroupAddress, payload: &[u8]) -> Result<()>;

    /// Check if the transport is currently connected.
    ///
    /// Default implementation returns `true`.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<T: GroupBus + ?Sized> GroupBus for &mut T {
    async fn read(&mut self, address: GroupAddress) -> Result<Payload> {
        (**self).read(address).await
    }

    async fn write(&mut self, address: GroupAddress, payload: &[u8]) -> Result<()> {
        (**self).write(address, payload).await
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
