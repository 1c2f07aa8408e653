//! Unified Logging Macros for knx-entities
//!
//! This module provides a unified logging interface that automatically
//! selects between `defmt::`, `log::` or nothing based on the active
//! feature flags.
//!
//! # Usage
//!
//! ```rust,ignore
//! knx_log!(info, "Cover {} created", name);
//! knx_log!(debug, "Wrote {:?} to {}", payload, address);
//! knx_log!(warn, "Read of {} failed: {}", address, error);
//! ```
//!
//! # Feature Flags
//!
//! - `defmt` - Uses `defmt::` (takes precedence, most efficient for embedded)
//! - `log` - Uses the `log::` facade (host builds, USB serial debugging)
//! - Neither - Logging compiles to nothing, arguments are still type-checked

/// Unified logging macro - automatically selects defmt:: or log:: based on features
///
/// Format strings must stay within the subset both backends accept
/// (`{}` and `{:?}`).
#[macro_export]
#[cfg(feature = "defmt")]
macro_rules! knx_log {
    (info, $($arg:tt)*) => { defmt::info!($($arg)*) };
    (debug, $($arg:tt)*) => { defmt::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { defmt::warn!($($arg)*) };
    (error, $($arg:tt)*) => { defmt::error!($($arg)*) };
    (trace, $($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[macro_export]
#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! knx_log {
    (info, $($arg:tt)*) => { log::info!($($arg)*) };
    (debug, $($arg:tt)*) => { log::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { log::warn!($($arg)*) };
    (error, $($arg:tt)*) => { log::error!($($arg)*) };
    (trace, $($arg:tt)*) => { log::trace!($($arg)*) };
}

#[macro_export]
#[cfg(not(any(feature = "defmt", feature = "log")))]
macro_rules! knx_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::logging::discard(core::format_args!($($arg)*))
    };
}

/// Sink for log statements when no backend is enabled.
#[doc(hidden)]
#[inline(always)]
pub fn discard(_args: core::fmt::Arguments<'_>) {}
