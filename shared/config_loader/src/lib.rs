//! # Config Loader
//!
//! Locates configuration files on disk and deserializes them from JSON.
//!
//! ```no_run
//! use config_loader::{find_config_file, load_json_file};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct AppConfig {
//!     port: u16,
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let path = find_config_file("server_config.json", "CONFIG_PATH")?;
//!     let config: AppConfig = load_json_file(&path)?;
//!     println!("port = {}", config.port);
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a configuration file into a string without interpreting it.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))
}

/// Deserializes a JSON document held in memory (for example an environment
/// variable carrying the whole configuration).
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(ConfigError::from)
}

/// Reads and deserializes a JSON configuration file.
pub fn load_json_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = load_config_file(path)?;
    parse_json(&content)
}

/// Searches common locations for a configuration file.
///
/// Search order:
/// 1. The path held by the environment variable `env_var` (if set and existing)
/// 2. `./config/{filename}`
/// 3. `./{filename}`
pub fn find_config_file(filename: &str, env_var: &str) -> Result<PathBuf> {
    if let Ok(path) = env::var(env_var) {
        let path_buf = PathBuf::from(&path);
        if path_buf.exists() {
            return Ok(path_buf);
        }
    }

    let config_dir = PathBuf::from("./config").join(filename);
    if config_dir.exists() {
        return Ok(config_dir);
    }

    let current_dir = PathBuf::from("./").join(filename);
    if current_dir.exists() {
        return Ok(current_dir);
    }

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found. Searched: {} env var, ./config/{}, ./{}",
        filename, env_var, filename, filename
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        port: u16,
        #[serde(default)]
        name: String,
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config_file("/path/that/does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_find_nonexistent_file() {
        let result = find_config_file(
            "file_that_definitely_does_not_exist_12345.json",
            "CONFIG_LOADER_TEST_UNSET_VAR",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"port\": 5000}}").unwrap();

        let sample: Sample = load_json_file(file.path()).unwrap();
        assert_eq!(
            sample,
            Sample {
                port: 5000,
                name: String::new()
            }
        );
    }

    #[test]
    fn test_parse_json_reports_parse_error() {
        let result: Result<Sample> = parse_json("{\"port\": \"not a number\"}");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
