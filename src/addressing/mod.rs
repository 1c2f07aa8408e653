//! KNX group addressing.
//!
//! Devices are composed of roles, each bound to one group address
//! (Main/Middle/Sub or Main/Sub). This layer treats the address as an
//! opaque, immutable key; only parsing and formatting know its structure.

pub mod group;

pub use group::GroupAddress;
