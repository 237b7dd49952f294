//! # snag - catch files the moment they appear
//!
//! Polls a source directory and copies every new file (and, optionally,
//! every new or changed first-level directory) into a destination directory.
//! When a copy is refused, it can kill the process holding the file and retry,
//! then fall back to an external raw reader.

// Module declarations
pub mod classify;
pub mod config;
pub mod executor;
pub mod scanner;
pub mod snapshot;
pub mod types;
pub mod ui;
pub mod watch;

// Re-export commonly used types
pub use config::Config;
pub use snapshot::Snapshot;
pub use types::{CaptureOutcome, Entry, EntryKind, KillOutcome, SnagError};
pub use watch::{CancellationToken, Watcher};
