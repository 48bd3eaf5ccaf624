//! Configuration types deserialized from `vsst.toml`.

use serde::Deserialize;

use crate::frequency::Frequency;
use crate::ports::{LinkPortDef, PortReset};

/// The top-level harness configuration parsed from `vsst.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VsstConfig {
    /// Engine settings.
    #[serde(default)]
    pub dut: DutConfig,
    /// Link port map.
    #[serde(default)]
    pub link: LinkConfig,
    /// Run length.
    #[serde(default)]
    pub run: RunConfig,
}

/// How the engine reaches the model's ports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessPath {
    /// Generated per-port accessor functions.
    #[default]
    Direct,
    /// Name lookup through the engine's introspection interface.
    Introspective,
}

/// Settings for a single engine instance.
#[derive(Debug, Clone, Deserialize)]
pub struct DutConfig {
    /// Port access path.
    #[serde(default)]
    pub access: AccessPath,
    /// Name of the clock input toggled by `tick_clock_period`.
    #[serde(default = "default_clock_port")]
    pub clock_port: String,
    /// Host clock handler rate.
    #[serde(default)]
    pub clock_freq: Option<Frequency>,
    /// Log verbosity requested by the host (0 is quiet).
    #[serde(default)]
    pub verbose: u32,
    /// Values written to ports by `init`.
    #[serde(default)]
    pub reset_values: Vec<PortReset>,
}

impl Default for DutConfig {
    fn default() -> Self {
        Self {
            access: AccessPath::default(),
            clock_port: default_clock_port(),
            clock_freq: None,
            verbose: 0,
            reset_values: Vec::new(),
        }
    }
}

fn default_clock_port() -> String {
    "clock".to_string()
}

/// Link port map used to route host events to model ports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkConfig {
    /// Port definitions, one per link-visible port.
    #[serde(default)]
    pub ports: Vec<LinkPortDef>,
}

/// Run settings for self-driven harnesses.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Number of clock cycles to simulate.
    #[serde(default = "default_num_cycles")]
    pub num_cycles: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_cycles: default_num_cycles(),
        }
    }
}

fn default_num_cycles() -> u64 {
    1000
}
