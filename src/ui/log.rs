//! Capture log sinks
//!
//! The log mirrors the console: one entry per message, each followed by a
//! blank line.

use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Line-oriented destination for reported messages
pub trait LogSink: Send {
    /// Append one message
    fn write(&mut self, message: &str) -> io::Result<()>;

    /// Flush and release the underlying resource; later writes are dropped
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Append-only log file named `__snag_log_<unix seconds>.txt`
pub struct FileLog {
    path: PathBuf,
    file: Option<File>,
}

impl FileLog {
    /// Create the log inside `dir` and record `command_line` as its first entry
    pub fn create(dir: &Path, command_line: &str) -> io::Result<Self> {
        let path = dir.join(format!("__snag_log_{}.txt", Utc::now().timestamp()));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut log = Self {
            path,
            file: Some(file),
        };
        log.write(&format!("{}\n-------", command_line))?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLog {
    fn write(&mut self, message: &str) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => {
                write!(file, "{}\n\n", message)?;
                file.flush()
            }
            None => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

/// In-memory sink; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Whether any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Number of messages containing `needle`
    pub fn count(&self, needle: &str) -> usize {
        self.lines().iter().filter(|line| line.contains(needle)).count()
    }
}

impl LogSink for MemoryLog {
    fn write(&mut self, message: &str) -> io::Result<()> {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
        Ok(())
    }
}
