//! Logger handle
//!
//! A `Logger` is created once by the caller and cloned into every component
//! that reports diagnostics. Clones share one history and one log file.
//! Records are also forwarded to the `log` facade under the `tsrw` target,
//! so a binary can mirror them to the console with any `log` backend.

use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// File name used inside the configured log folder
pub const LOG_FILE_NAME: &str = "tsrw.log";

const LOG_TARGET: &str = "tsrw";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Warning => write!(f, "WARNING"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

impl From<Level> for log::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => log::Level::Info,
            Level::Warning => log::Level::Warn,
            Level::Error => log::Level::Error,
        }
    }
}

/// A single emitted diagnostic
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
            self.level,
            self.message
        )
    }
}

#[derive(Default)]
struct LoggerState {
    history: Vec<LogRecord>,
    file: Option<LineWriter<File>>,
    log_path: Option<PathBuf>,
}

#[derive(Clone, Default)]
pub struct Logger {
    state: Arc<Mutex<LoggerState>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("log_path", &self.log_path())
            .finish()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attaches (or replaces) the file sink, appending to `<folder>/tsrw.log`
    pub fn set_log_folder<P: AsRef<Path>>(&self, folder: P) -> io::Result<PathBuf> {
        let log_path = folder.as_ref().join(LOG_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let mut state = self.lock();
        if let Some(mut previous) = state.file.take() {
            let _ = previous.flush();
        }
        state.file = Some(LineWriter::new(file));
        state.log_path = Some(log_path.clone());
        Ok(log_path)
    }

    /// Path of the active log file, if any
    pub fn log_path(&self) -> Option<PathBuf> {
        self.lock().log_path.clone()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Level::Info, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.emit(Level::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(Level::Error, message.into());
    }

    fn emit(&self, level: Level, message: String) {
        log::log!(target: LOG_TARGET, level.into(), "{}", message);

        let record = LogRecord {
            timestamp: Local::now(),
            level,
            message,
        };

        let mut state = self.lock();
        if let Some(file) = state.file.as_mut() {
            // Write failures are ignored
            let _ = writeln!(file, "{}", record);
        }
        state.history.push(record);
    }

    /// Snapshot of everything logged so far
    pub fn history(&self) -> Vec<LogRecord> {
        self.lock().history.clone()
    }

    /// Messages logged at `level`, oldest first
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lock()
            .history
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }
}
