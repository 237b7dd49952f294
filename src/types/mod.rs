//! Core type definitions for snag

mod entry;
mod error;
mod outcome;

pub use entry::{Entry, EntryKind};
pub use error::SnagError;
pub use outcome::{CaptureOutcome, KillOutcome};
