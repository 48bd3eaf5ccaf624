//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `vsst.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A reset value entry is not of the form `port:value`.
    #[error("invalid reset value '{0}', expected 'port:value'")]
    InvalidResetValue(String),

    /// A link port entry is not of the form `name:id:size:direction`.
    #[error("invalid link port '{0}', expected 'name:id:size:direction'")]
    InvalidPortDef(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
