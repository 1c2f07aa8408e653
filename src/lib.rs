#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! # knx-entities
//!
//! Maps KNX group addresses onto devices and keeps their state in sync.
//!
//! This crate provides a `no_std` layer between a KNX bus connection and a
//! host's entity model, designed for the same async style as the Embassy
//! runtime on embedded microcontrollers.
//!
//! ## Layers
//!
//! - [`codec`] - raw payload bytes <-> domain values
//! - [`binding`] - configured roles -> group addresses
//! - [`device`] - per-role cache with read, write and poll
//! - [`entity`] - binary sensor, cover and light facades
//!
//! ## Example
//!
//! ```rust
//! use knx_entities::bus::MockBus;
//! use knx_entities::entity::{Cover, Entity, SetPositionRequest};
//! use knx_entities::{device_config, ga};
//!
//! let config = device_config! {
//!     "updown" => 9/0/0,
//!     "stop" => 9/0/1,
//!     "setposition" => 9/0/3,
//!     "getposition" => 9/0/4,
//! }?;
//!
//! let mut bus = MockBus::new();
//! bus.set_value(ga!(9/0/4), &[0xFF]);
//! let mut cover = Cover::new(&config, bus)?;
//!
//! embassy_futures::block_on(async {
//!     cover.update().await;
//!     assert_eq!(cover.is_closed(), Some(true));
//!     cover.set_cover_position(SetPositionRequest::to(100)).await
//! })?;
//! # Ok::<(), knx_entities::KnxError>(())
//! ```

// Macro modules (must be declared before use)
#[macro_use]
pub mod macros;
#[macro_use]
pub mod logging;

pub mod addressing;
pub mod binding;
pub mod bus;
pub mod codec;
pub mod config;
pub mod device;
pub mod entity;
pub mod error;
pub mod observer;

// Re-export commonly used types
#[doc(inline)]
pub use addressing::GroupAddress;
#[doc(inline)]
pub use bus::GroupBus;
#[doc(inline)]
pub use codec::{DomainValue, ValueKind};
#[doc(inline)]
pub use config::DeviceConfig;
#[doc(inline)]
pub use device::{Device, RoleState, UpdateReport};
#[doc(inline)]
pub use entity::{BinarySensor, Cover, Entity, Light, SetPositionRequest, TurnOnRequest};
#[doc(inline)]
pub use error::{KnxError, Result};
#[doc(inline)]
pub use observer::{LogObserver, Observer};
