//! A single log record as it travels to the sinks.

use crate::log_level::LogLevel;
use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// One informational record. Records are write-only: once emitted they are
/// only formatted and handed to sinks.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub message: String,
}

impl LogRecord {
    /// Creates a record stamped with the current local time.
    pub fn now(level: LogLevel, component: Option<String>, message: String) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            level,
            component,
            message,
        }
    }

    /// `[timestamp] LEVEL [component: X]: message`, without a trailing newline.
    pub fn display_line(&self) -> String {
        match self.component {
            Some(ref component) => format!(
                "[{}] {} [component: {}]: {}",
                self.timestamp,
                self.level.as_str(),
                component,
                self.message
            ),
            None => format!(
                "[{}] {}: {}",
                self.timestamp,
                self.level.as_str(),
                self.message
            ),
        }
    }

    /// Line as written to the log file (newline terminated).
    pub fn format(&self) -> String {
        let mut line = self.display_line();
        line.push('\n');
        line
    }
}
