//! Event sinks: the dual file/console logger and test helpers
//!
//! The logger is injected into the synchronizer rather than installed as
//! process-global state, so multiple pairs or test harnesses can run
//! without cross-contamination.

use crate::types::{EventSink, MirraError, SyncEvent};
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Logs every event as a timestamped, leveled line to two sinks at once: a
/// persistent log file and the console.
///
/// The log file path is the sentinel the delete phase exempts; constructing
/// the logger from `Config::log_path()` keeps the two in lockstep. Lines
/// are appended, so the log survives across process restarts.
pub struct SyncLogger {
    file: Mutex<File>,
    console: bool,
}

impl SyncLogger {
    /// Open (or create) the log file in append mode, creating parent
    /// directories as needed.
    pub fn create(log_path: &Path) -> Result<Self, MirraError> {
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            file: Mutex::new(file),
            console: true,
        })
    }

    /// Disable the console stream, keeping only the file sink.
    pub fn without_console(mut self) -> Self {
        self.console = false;
        self
    }

    fn write_line(&self, line: &str) {
        if self.console {
            println!("{line}");
        }

        // Log IO failures are swallowed: losing a log line must not take
        // down the sync loop.
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    }
}

impl EventSink for SyncLogger {
    fn emit(&self, event: &SyncEvent) {
        let line = format!(
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            event.level(),
            event
        );
        self.write_line(&line);
    }
}

/// Sink that records every event in memory.
///
/// Meant for tests and harnesses that assert on emitted events.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<SyncEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &SyncEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
