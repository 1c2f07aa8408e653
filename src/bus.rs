//! The bus collaborator seen by device adapters.
//!
//! Devices never speak KNXnet/IP or cEMI themselves. They read and write
//! group values through a [`GroupBus`], which a tunnel client, a routing
//! socket or a test double implements.
//!
//! ## Sharing one bus
//!
//! Every entity owns its `B: GroupBus`. To poll several entities over one
//! connection, hand each a shared handle:
//!
//! - `&mut B` works when entities are driven one after another;
//! - with the `embassy` feature, `&embassy_sync::mutex::Mutex<M, B>` works
//!   across tasks.

pub mod mock_transport;
pub mod transport;

#[cfg(feature = "embassy")]
pub mod embassy_adapter;

#[doc(inline)]
pub use mock_transport::MockBus;
#[doc(inline)]
pub use transport::GroupBus;

#[cfg(feature = "embassy")]
#[doc(inline)]
pub use embassy_adapter::TimeoutBus;
