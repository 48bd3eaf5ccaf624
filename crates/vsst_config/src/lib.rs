//! Parsing and validation of `vsst.toml` harness configuration files.
//!
//! This crate reads the harness configuration and produces a strongly-typed
//! [`VsstConfig`]: the engine's access path and clock binding, the reset
//! values applied at init, the link port map and the run length.

#![warn(missing_docs)]

pub mod error;
pub mod frequency;
pub mod loader;
pub mod ports;
pub mod types;

pub use error::ConfigError;
pub use frequency::{Frequency, ParseFrequencyError};
pub use loader::{load_config, load_config_from_str};
pub use ports::{LinkDirection, LinkPortDef, PortReset};
pub use types::*;
