//! Error types for configuration loading.

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A unit reference string is not in `Name@Version` form.
    #[error("invalid unit reference '{0}': expected 'Name@Version'")]
    InvalidReference(String),
}
