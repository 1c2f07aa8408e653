//! Convenience macros for building addresses and device configurations.

/// Creates a [`GroupAddress`](crate::addressing::GroupAddress) from 3-level notation.
///
/// # Syntax
///
/// ```text
/// ga!(main/middle/sub)
/// ```
///
/// # Examples
///
/// ```
/// use knx_entities::ga;
///
/// let updown = ga!(9/0/0);
/// assert_eq!(updown.to_string(), "9/0/0");
/// ```
///
/// # Compile-Time Validation
///
/// ```compile_fail
/// // main group > 31
/// let addr = knx_entities::ga!(32/0/0);
/// ```
///
/// ```compile_fail
/// // middle group > 7
/// let addr = knx_entities::ga!(1/8/0);
/// ```
#[macro_export]
macro_rules! ga {
    ($main:literal / $middle:literal / $sub:literal) => {{
        const _: () = {
            if $main > 31 {
                panic!("Main group must be 0-31");
            }
            if $middle > 7 {
                panic!("Middle group must be 0-7");
            }
            if $sub > 255 {
                panic!("Sub group must be 0-255");
            }
        };

        // 5 bits main, 3 bits middle, 8 bits sub
        const RAW: u16 = (($main & 0x1F) << 11) | (($middle & 0x07) << 8) | ($sub & 0xFF);
        $crate::addressing::GroupAddress::from(RAW)
    }};
}

/// Builds a [`DeviceConfig`](crate::config::DeviceConfig) from role/address pairs.
///
/// Expands to a `Result<DeviceConfig>`: duplicate roles or an overfull
/// configuration are reported, not panicked on.
///
/// # Syntax
///
/// ```text
/// device_config! {
///     "role" => main/middle/sub,
///     ...
/// }
/// ```
///
/// # Examples
///
/// ```
/// use knx_entities::{device_config, ga};
///
/// let config = device_config! {
///     "updown" => 9/0/0,
///     "stop" => 9/0/1,
///     "getposition" => 9/0/4,
/// }?;
///
/// assert_eq!(config.address("stop"), Some(ga!(9/0/1)));
/// # Ok::<(), knx_entities::KnxError>(())
/// ```
#[macro_export]
macro_rules! device_config {
    ($( $role:literal => $main:literal / $middle:literal / $sub:literal ),* $(,)?) => {{
        // Closure allows early return with ?
        (|| -> $crate::Result<$crate::config::DeviceConfig> {
            let config = $crate::config::DeviceConfig::new();
            $(
                let config = config.with_address($role, $crate::ga!($main / $middle / $sub))?;
            )*
            Ok(config)
        })()
    }};
}
