//! Observability hooks injected into each device.
//!
//! A device reports what happens on its bindings to an [`Observer`] it was
//! given at construction, so applications choose per device whether events
//! go to the log, to counters, or nowhere. [`LogObserver`] is the default
//! and forwards everything to [`knx_log!`](crate::knx_log); `()` discards.

use crate::addressing::GroupAddress;
use crate::binding::Role;
use crate::error::KnxError;

/// Receives binding events from a device. Every method defaults to a no-op.
pub trait Observer {
    /// A polled role was read and its cache entry replaced.
    fn refreshed(&mut self, device: &str, role: Role, address: GroupAddress, payload: &[u8]) {
        let _ = (device, role, address, payload);
    }

    /// A polled role could not be read; its previous value was kept.
    fn read_failed(&mut self, device: &str, role: Role, address: GroupAddress, error: &KnxError) {
        let _ = (device, role, address, error);
    }

    /// A value was written to a role.
    fn written(&mut self, device: &str, role: Role, address: GroupAddress, payload: &[u8]) {
        let _ = (device, role, address, payload);
    }

    /// Writing a value to a role failed.
    fn write_failed(&mut self, device: &str, role: Role, address: GroupAddress, error: &KnxError) {
        let _ = (device, role, address, error);
    }

    /// A command was dropped because the role it needs is not bound.
    fn command_skipped(&mut self, device: &str, command: &str, role: Role) {
        let _ = (device, command, role);
    }

    /// A configured role is unknown to the device type and was ignored.
    fn role_ignored(&mut self, device: &str, role: &str) {
        let _ = (device, role);
    }
}

/// Discards every event.
impl Observer for () {}

/// Forwards events to the crate's log backend (`defmt` or `log`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn refreshed(&mut self, device: &str, role: Role, address: GroupAddress, payload: &[u8]) {
        knx_log!(debug, "{}: read {} from {} = {:?}", device, role, address, payload);
    }

    fn read_failed(&mut self, device: &str, role: Role, address: GroupAddress, error: &KnxError) {
        knx_log!(warn, "{}: reading {} from {} failed: {}", device, role, address, error);
    }

    fn written(&mut self, device: &str, role: Role, address: GroupAddress, payload: &[u8]) {
        knx_log!(debug, "{}: wrote {:?} to {} ({})", device, payload, address, role);
    }

    fn write_failed(&mut self, device: &str, role: Role, address: GroupAddress, error: &KnxError) {
        knx_log!(warn, "{}: writing {} to {} failed: {}", device, role, address, error);
    }

    fn command_skipped(&mut self, device: &str, command: &str, role: Role) {
        knx_log!(debug, "{}: {} ignored, no {} address", device, command, role);
    }

    fn role_ignored(&mut self, device: &str, role: &str) {
        knx_log!(debug, "{}: ignoring unknown role {}", device, role);
    }
}

/// Records events for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    pub(crate) refreshed: std::vec::Vec<Role>,
    pub(crate) read_failures: std::vec::Vec<Role>,
    pub(crate) written: std::vec::Vec<Role>,
    pub(crate) write_failures: std::vec::Vec<Role>,
    pub(crate) skipped: std::vec::Vec<(std::string::String, Role)>,
    pub(crate) ignored: std::vec::Vec<std::string::String>,
}

#[cfg(test)]
impl Observer for RecordingObserver {
    fn refreshed(&mut self, _device: &str, role: Role, _address: GroupAddress, _payload: &[u8]) {
        self.refreshed.push(role);
    }

    fn read_failed(
        &mut self,
        _device: &str,
        role: Role,
        _address: GroupAddress,
        _error: &KnxError,
    ) {
        self.read_failures.push(role);
    }

    fn written(&mut self, _device: &str, role: Role, _address: GroupAddress, _payload: &[u8]) {
        self.written.push(role);
    }

    fn write_failed(
        &mut self,
        _device: &str,
        role: Role,
        _address: GroupAddress,
        _error: &KnxError,
    ) {
        self.write_failures.push(role);
    }

    fn command_skipped(&mut self, _device: &str, command: &str, role: Role) {
        self.skipped.push((command.into(), role));
    }

    fn role_ignored(&mut self, _device: &str, role: &str) {
        self.ignored.push(role.into());
    }
}
