//! Thread-safe asynchronous logger implementation.
//!
//! A [`Logger`] fans each record out to up to three sinks: a log file written
//! by a dedicated thread, the console, and any number of display subscribers
//! (for example a log window draining a channel on its own timer).

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_record::LogRecord;
use crate::log_writer::spawn_writer_thread;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

/// Thread-safe, non-blocking logger.
///
/// Clones and component loggers share the same file writer and the same set
/// of display subscribers.
///
/// # Examples
///
/// ```
/// use logging::{LogLevel, Logger};
///
/// let logger = Logger::builder(LogLevel::Info).build().unwrap();
/// let display = logger.subscribe();
///
/// let session_logger = logger.for_component("Session");
/// session_logger.info("Client registered: alice");
///
/// assert!(display.recv().unwrap().contains("Client registered: alice"));
/// ```
#[derive(Clone)]
pub struct Logger {
    file: Option<Sender<LogRecord>>,
    display: Arc<Mutex<Vec<Sender<String>>>>,
    level: LogLevel,
    component: Option<String>,
    console_output: bool,
}

/// Configures the sinks of a [`Logger`].
pub struct LoggerBuilder {
    level: LogLevel,
    file_path: Option<PathBuf>,
    console_output: bool,
    component: Option<String>,
}

impl LoggerBuilder {
    /// Append records to the given file.
    pub fn file(mut self, log_path: PathBuf) -> Self {
        self.file_path = Some(log_path);
        self
    }

    pub fn console(mut self, enabled: bool) -> Self {
        self.console_output = enabled;
        self
    }

    pub fn component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }

    /// Spawns the file writer thread if a file was configured.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be created or opened.
    pub fn build(self) -> Result<Logger> {
        let file = match self.file_path {
            Some(path) => {
                let (sender, receiver) = channel();
                spawn_writer_thread(&path, receiver)?;
                Some(sender)
            }
            None => None,
        };

        Ok(Logger {
            file,
            display: Arc::new(Mutex::new(Vec::new())),
            level: self.level,
            component: self.component,
            console_output: self.console_output,
        })
    }
}

impl Logger {
    /// Starts configuring a logger that records `level` and above.
    pub fn builder(level: LogLevel) -> LoggerBuilder {
        LoggerBuilder {
            level,
            file_path: None,
            console_output: false,
            component: None,
        }
    }

    /// File-only logger without a component tag.
    pub fn new(log_path: PathBuf, level: LogLevel) -> Result<Self> {
        Self::builder(level).file(log_path).build()
    }

    /// Creates a new logger with component identification.
    pub fn with_component(
        log_path: PathBuf,
        level: LogLevel,
        component: &str,
        console_output: bool,
    ) -> Result<Self> {
        Self::builder(level)
            .file(log_path)
            .console(console_output)
            .component(component)
            .build()
    }

    /// Same sinks and level, different component tag. No new thread is
    /// spawned, so this is cheap enough to call once per connection.
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            component: Some(component.to_string()),
            ..self.clone()
        }
    }

    /// Registers a display subscriber. Each record at or above the logger's
    /// level is delivered as one formatted line. Dropping the receiver
    /// unsubscribes it on the next record.
    pub fn subscribe(&self) -> Receiver<String> {
        let (sender, receiver) = channel();
        if let Ok(mut subscribers) = self.display.lock() {
            subscribers.push(sender);
        }
        receiver
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.level {
            return;
        }

        let record = LogRecord::now(level, self.component.clone(), message.to_string());

        if self.console_output {
            print!("{}", record.format());
        }

        if let Ok(mut subscribers) = self.display.lock()
            && !subscribers.is_empty()
        {
            let line = record.display_line();
            subscribers.retain(|subscriber| subscriber.send(line.clone()).is_ok());
        }

        if let Some(ref file) = self.file {
            let _ = file.send(record);
        }
    }
}
