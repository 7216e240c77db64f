use std::fmt;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while locating, reading or parsing a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file was not found.
    FileNotFound(String),

    /// The file exists but could not be read.
    ReadError(String),

    /// The content is not valid JSON for the requested type.
    ParseError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::ReadError(msg) => {
                write!(f, "Failed to read configuration file: {}", msg)
            }
            ConfigError::ParseError(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
