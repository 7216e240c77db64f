//! Dedicated log file writer thread.

use crate::error::Result;
use crate::log_record::LogRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::thread;

/// Appends records to the log file. Owned by the writer thread.
pub(crate) struct LogWriter {
    file: BufWriter<File>,
}

impl LogWriter {
    /// Opens (or creates) the file in append mode.
    pub fn open(log_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    fn write_record(&mut self, record: &LogRecord) {
        if let Err(e) = self.file.write_all(record.format().as_bytes()) {
            eprintln!("Error writing log: {}", e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.file.flush() {
            eprintln!("Error flushing log: {}", e);
        }
    }

    /// Blocks for the next record, then drains whatever else is already
    /// queued before a single flush. Returns when every sender is gone.
    pub fn run(mut self, receiver: Receiver<LogRecord>) {
        while let Ok(record) = receiver.recv() {
            self.write_record(&record);
            for queued in receiver.try_iter() {
                self.write_record(&queued);
            }
            self.flush();
        }
    }
}

/// Opens the file on the caller's thread so open errors surface immediately,
/// then moves the writer onto its own thread.
pub(crate) fn spawn_writer_thread(log_path: &Path, receiver: Receiver<LogRecord>) -> Result<()> {
    let writer = LogWriter::open(log_path)?;
    thread::Builder::new()
        .name("log-writer".to_string())
        .spawn(move || writer.run(receiver))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_level::LogLevel;
    use std::fs;
    use std::sync::mpsc::channel;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("relay.log");

        assert!(LogWriter::open(&log_path).is_ok());
        assert!(log_path.exists());
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("missing").join("relay.log");

        assert!(LogWriter::open(&log_path).is_err());
    }

    #[test]
    fn test_writer_thread_drains_batch() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("relay.log");
        let (sender, receiver) = channel();

        for i in 0..5 {
            sender
                .send(LogRecord::now(LogLevel::Info, None, format!("record {}", i)))
                .unwrap();
        }
        spawn_writer_thread(&log_path, receiver).unwrap();
        drop(sender);

        thread::sleep(Duration::from_millis(100));

        let content = fs::read_to_string(log_path).unwrap();
        assert_eq!(content.lines().count(), 5);
        assert!(content.contains("record 4"));
    }
}
