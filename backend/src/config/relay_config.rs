use config_loader::ConfigError;
use serde::Deserialize;

use crate::config::{LoggingConfig, ServerConfig};

/// Upper bound for `server.max_line_length` (1 MiB).
const MAX_LINE_LENGTH_LIMIT: usize = 1 << 20;

/// Voice relay server configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = config_loader::load_json_file(path)?;
        config.validated()
    }

    /// Parse configuration from an inline JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = config_loader::parse_json(json)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.server.chunk_size == 0 {
            return Err(ConfigError::ParseError(
                "server.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.server.max_line_length == 0 || self.server.max_line_length > MAX_LINE_LENGTH_LIMIT
        {
            return Err(ConfigError::ParseError(format!(
                "server.max_line_length must be between 1 and {}",
                MAX_LINE_LENGTH_LIMIT
            )));
        }
        if self.server.outbox_capacity == 0 {
            return Err(ConfigError::ParseError(
                "server.outbox_capacity must be greater than zero".to_string(),
            ));
        }
        if self.server.write_timeout_ms == 0 {
            return Err(ConfigError::ParseError(
                "server.write_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicateRegistrationPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.chunk_size, 1024);
        assert_eq!(
            config.server.duplicate_registration,
            DuplicateRegistrationPolicy::Reject
        );
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.server.outbox_capacity, 256);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RelayConfig::from_json_str(
            r#"{"server": {"port": 6000, "duplicate_registration": "evict"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.chunk_size, 1024);
        assert_eq!(
            config.server.duplicate_registration,
            DuplicateRegistrationPolicy::Evict
        );
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"chunk_size": 320}}, "logging": {{"enable_file": false}}}}"#
        )
        .unwrap();

        let config = RelayConfig::load_from_file(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.server.chunk_size, 320);
        assert!(!config.logging.enable_file);
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let result = RelayConfig::from_json_str(r#"{"server": {"chunk_size": 0}}"#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_out_of_range_limits_are_rejected() {
        let huge = format!(r#"{{"server": {{"max_line_length": {}}}}}"#, usize::MAX);
        assert!(matches!(
            RelayConfig::from_json_str(&huge),
            Err(ConfigError::ParseError(_))
        ));
        assert!(RelayConfig::from_json_str(r#"{"server": {"outbox_capacity": 0}}"#).is_err());
        assert!(RelayConfig::from_json_str(r#"{"server": {"write_timeout_ms": 0}}"#).is_err());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result =
            RelayConfig::from_json_str(r#"{"server": {"duplicate_registration": "merge"}}"#);
        assert!(result.is_err());
    }
}
