//! Scheduled port I/O between a host discrete-event simulator and a compiled
//! RTL model.
//!
//! The host advances time in unit ticks. A [`Dut`] wraps one model that
//! implements [`RtlModel`], marshals host byte buffers into packed
//! [`Signal`]s, and applies writes either immediately or at a future tick.
//!
//! # Architecture
//!
//! - [`model`]: the [`RtlModel`] trait with its optional introspection methods
//! - [`port`]: the direct-access [`PortMap`] and the [`port_table!`] macro
//! - [`queue`]: the deferred [`WriteQueue`]
//! - [`dut`]: the [`Dut`] engine
//! - [`link`]: [`PortEvent`] routing for link-driven components
//! - [`error`]: [`DutError`]

#![warn(missing_docs)]

pub mod dut;
pub mod error;
pub mod link;
pub mod model;
pub mod port;
pub mod queue;

pub use dut::{Dut, DutState};
pub use error::DutError;
pub use link::{LinkAdapter, LinkError, PortAction, PortEvent};
pub use model::{Handle, ObjectKind, RtlModel};
pub use port::{PortDirection, PortEntry, PortField, PortMap, PortRow};
pub use queue::{QueuedWrite, WriteQueue};
pub use vsst_config::{AccessPath, DutConfig};
pub use vsst_signal::{Signal, SignalError, VecVal};
