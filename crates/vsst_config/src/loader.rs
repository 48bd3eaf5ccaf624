//! Configuration file loading and validation.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::VsstConfig;

/// Loads and validates a `vsst.toml` configuration from a directory.
///
/// Reads `<dir>/vsst.toml`, parses it, and validates it.
pub fn load_config(dir: &Path) -> Result<VsstConfig, ConfigError> {
    let config_path = dir.join("vsst.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `vsst.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<VsstConfig, ConfigError> {
    let config: VsstConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks cross-field consistency the type layer cannot express.
fn validate_config(config: &VsstConfig) -> Result<(), ConfigError> {
    if config.dut.clock_port.is_empty() {
        return Err(ConfigError::MissingField("dut.clock_port".to_string()));
    }
    if let Some(freq) = config.dut.clock_freq {
        if freq.period_ps().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "clock frequency {freq} must be positive"
            )));
        }
    }

    let mut seen = HashSet::new();
    for reset in &config.dut.reset_values {
        if !seen.insert(reset.port.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate reset value for port '{}'",
                reset.port
            )));
        }
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for port in &config.link.ports {
        if !ids.insert(port.id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate link port id {}",
                port.id
            )));
        }
        if !names.insert(port.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate link port '{}'",
                port.name
            )));
        }
        if port.size == 0 {
            return Err(ConfigError::ValidationError(format!(
                "link port '{}' has zero size",
                port.name
            )));
        }
    }
    Ok(())
}
