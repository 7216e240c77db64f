//! Thread-safe asynchronous logging library.

pub mod error;
mod log_level;
mod log_record;
mod log_writer;
mod logger;

pub use error::{LoggingError, Result};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder};
