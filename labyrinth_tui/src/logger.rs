use std::collections::VecDeque;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Keeps only this many of the most recent lines.
const CAPACITY: usize = 256;

/// A `log` sink that buffers formatted records in memory so the TUI can show
/// them without writing over the terminal.
pub struct MemoryLogger {
    lines: Mutex<VecDeque<String>>,
}

static LOGGER: MemoryLogger = MemoryLogger {
    lines: Mutex::new(VecDeque::new()),
};

/// Installs the memory logger as the global `log` sink.
pub fn init(level: LevelFilter) -> Result<&'static MemoryLogger, SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(&LOGGER)
}

impl MemoryLogger {
    /// Returns up to `count` of the most recent lines, oldest first.
    pub fn recent(&self, count: usize) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines
                .iter()
                .skip(lines.len().saturating_sub(count))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Removes and returns every buffered line.
    pub fn drain(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(mut lines) => lines.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Log for MemoryLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == CAPACITY {
                lines.pop_front();
            }
            lines.push_back(format!("{:<5} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}
