//! Mock bus implementation for testing.
//!
//! This module provides a mock implementation of `GroupBus` that can be used
//! in unit tests to simulate a KNX installation without any network.
//!
//! ## Example
//!
//! ```rust
//! use knx_entities::bus::{GroupBus, MockBus};
//! use knx_entities::ga;
//!
//! let mut bus = MockBus::new();
//! bus.set_value(ga!(9/0/4), &[0xFF]);
//!
//! embassy_futures::block_on(async {
//!     assert_eq!(bus.read(ga!(9/0/4)).await.unwrap().as_slice(), &[0xFF]);
//!     bus.write(ga!(9/0/0), &[0x01]).await.unwrap();
//! });
//!
//! assert_eq!(bus.writes().len(), 1);
//! assert_eq!(bus.reads(), &[ga!(9/0/4)]);
//! ```

extern crate alloc;

use alloc::vec::Vec;

use crate::addressing::GroupAddress;
use crate::bus::transport::GroupBus;
use crate::codec::{Payload, MAX_PAYLOAD};
use crate::error::{KnxError, Result};

/// Mock bus for testing devices without a real installation.
///
/// This mock bus allows you to:
/// - Program the value each group address answers reads with
/// - Inspect every write and read that was issued
/// - Simulate failing reads per address, failing writes, or a lost connection
#[derive(Debug)]
pub struct MockBus {
    /// Value returned for reads, per address
    values: Vec<(GroupAddress, Payload)>,
    /// Addresses whose reads fail
    failing_reads: Vec<GroupAddress>,
    /// Whether writes fail
    fail_writes: bool,
    /// Record of all writes
    writes: Vec<(GroupAddress, Payload)>,
    /// Record of all reads, failed ones included
    reads: Vec<GroupAddress>,
    /// Whether the bus is "connected"
    ready: bool,
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBus {
    /// Create a new, connected mock bus with no programmed values.
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            failing_reads: Vec::new(),
            fail_writes: false,
            writes: Vec::new(),
            reads: Vec::new(),
            ready: true,
        }
    }

    /// Program the value reads of `address` return. Payloads longer than
    /// [`MAX_PAYLOAD`] are truncated.
    pub fn set_value(&mut self, address: GroupAddress, payload: &[u8]) {
        let payload =
            Payload::from_slice(&payload[..payload.len().min(MAX_PAYLOAD)]).unwrap_or_default();
        match self.values.iter_mut().find(|(addr, _)| *addr == address) {
            Some((_, value)) => *value = payload,
            None => self.values.push((address, payload)),
        }
    }

    /// Forget the programmed value; reads then get no response.
    pub fn clear_value(&mut self, address: GroupAddress) {
        self.values.retain(|(addr, _)| *addr != address);
    }

    /// Make reads of `address` fail until [`restore_reads`](Self::restore_reads).
    pub fn fail_reads(&mut self, address: GroupAddress) {
        if !self.failing_reads.contains(&address) {
            self.failing_reads.push(address);
        }
    }

    /// Let reads of `address` succeed again.
    pub fn restore_reads(&mut self, address: GroupAddress) {
        self.failing_reads.retain(|addr| *addr != address);
    }

    /// Make every write fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Set whether the bus should report as connected.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// All successful writes as `(address, payload)`, oldest first.
    pub fn writes(&self) -> &[(GroupAddress, Payload)] {
        &self.writes
    }

    /// The most recent successful write.
    pub fn last_write(&self) -> Option<&(GroupAddress, Payload)> {
        self.writes.last()
    }

    /// Payloads written to `address`, oldest first.
    pub fn writes_to(&self, address: GroupAddress) -> impl Iterator<Item = &[u8]> {
        self.writes
            .iter()
            .filter(move |(addr, _)| *addr == address)
            .map(|(_, payload)| payload.as_slice())
    }

    /// Every address a read was attempted on, oldest first.
    pub fn reads(&self) -> &[GroupAddress] {
        &self.reads
    }

    /// Clear the read and write history.
    pub fn clear_history(&mut self) {
        self.writes.clear();
        self.reads.clear();
    }
}

impl GroupBus for MockBus {
    async fn read(&mut self, address: GroupAddress) -> Result<Payload> {
        if !self.ready {
            return Err(KnxError::not_connected());
        }
        self.reads.push(address);
        if self.failing_reads.contains(&address) {
            return Err(KnxError::read_failed());
        }
        self.values
            .iter()
            .find(|(addr, _)| *addr == address)
            .map(|(_, payload)| payload.clone())
            .ok_or_else(KnxError::no_response)
    }

    async fn write(&mut self, address: GroupAddress, payload: &[u8]) -> Result<()> {
        if !self.ready {
            return Err(KnxError::not_connected());
        }
        if self.fail_writes {
            return Err(KnxError::write_failed());
        }
        let payload = Payload::from_slice(payload).map_err(|_full| KnxError::write_failed())?;
        self.writes.push((address, payload));
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    fn addr(sub: u8) -> GroupAddress {
        GroupAddress::new(1, 0, sub).unwrap()
    }

    #[test]
    fn test_read_programmed_value() {
        let mut bus = MockBus::new();
        bus.set_value(addr(1), &[0x42]);
        let payload = block_on(bus.read(addr(1))).unwrap();
        assert_eq!(payload.as_slice(), &[0x42]);
        assert_eq!(bus.reads(), &[addr(1)]);
    }

    #[test]
    fn test_read_unprogrammed_is_no_response() {
        let mut bus = MockBus::new();
        let err = block_on(bus.read(addr(2))).unwrap_err();
        assert!(matches!(err, KnxError::Transport(ref e) if e.is_no_response()));
    }

    #[test]
    fn test_set_value_replaces() {
        let mut bus = MockBus::new();
        bus.set_value(addr(1), &[1]);
        bus.set_value(addr(1), &[2]);
        assert_eq!(block_on(bus.read(addr(1))).unwrap().as_slice(), &[2]);

        bus.clear_value(addr(1));
        assert!(block_on(bus.read(addr(1))).is_err());
    }

    #[test]
    fn test_failing_reads() {
        let mut bus = MockBus::new();
        bus.set_value(addr(1), &[1]);
        bus.fail_reads(addr(1));
        assert!(block_on(bus.read(addr(1))).unwrap_err().is_transient());
        bus.restore_reads(addr(1));
        assert!(block_on(bus.read(addr(1))).is_ok());
    }

    #[test]
    fn test_writes_recorded() {
        let mut bus = MockBus::new();
        block_on(bus.write(addr(1), &[1])).unwrap();
        block_on(bus.write(addr(2), &[0])).unwrap();
        block_on(bus.write(addr(1), &[0])).unwrap();

        assert_eq!(bus.writes().len(), 3);
        assert_eq!(bus.last_write().unwrap().0, addr(1));
        let to_first: Vec<&[u8]> = bus.writes_to(addr(1)).collect();
        assert_eq!(to_first, [&[1u8][..], &[0u8][..]]);

        bus.clear_history();
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn test_failing_writes_not_recorded() {
        let mut bus = MockBus::new();
        bus.set_fail_writes(true);
        assert!(block_on(bus.write(addr(1), &[1])).is_err());
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn test_ready_state() {
        let mut bus = MockBus::new();
        assert!(bus.is_ready());

        bus.set_ready(false);
        assert!(!bus.is_ready());
        assert!(block_on(bus.write(addr(1), &[1])).is_err());
        assert!(block_on(bus.read(addr(1))).is_err());
    }

    async fn switch_on<B: GroupBus>(mut bus: B) -> Result<()> {
        bus.write(addr(3), &[1]).await
    }

    #[test]
    fn test_shared_through_mut_ref() {
        let mut bus = MockBus::new();
        block_on(switch_on(&mut bus)).unwrap();
        block_on(switch_on(&mut bus)).unwrap();
        assert_eq!(bus.writes().len(), 2);
    }
}
