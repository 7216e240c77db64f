use serde::Deserialize;

use std::time::Duration;

use crate::infrastructure::outbox::DEFAULT_OUTBOX_CAPACITY;
use crate::tcp::protocol::DEFAULT_MAX_LINE_LENGTH;

/// What to do when a `REGISTER` names an id that is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateRegistrationPolicy {
    /// Close the new connection; the registered session keeps the id
    #[default]
    Reject,
    /// Tear down the registered session and give the id to the new one
    Evict,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Size in bytes of the audio payload following each `VOICE` line
    pub chunk_size: usize,
    pub max_line_length: usize,
    /// Messages queued for one client before it is dropped as too slow
    pub outbox_capacity: usize,
    /// Longest a single socket write may block
    pub write_timeout_ms: u64,
    pub duplicate_registration: DuplicateRegistrationPolicy,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            chunk_size: 1024,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            write_timeout_ms: 5000,
            duplicate_registration: DuplicateRegistrationPolicy::Reject,
        }
    }
}
