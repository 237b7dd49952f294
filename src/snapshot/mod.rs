//! Snapshot store: everything the watcher already handled
//!
//! Entries are never forgotten. A file that is deleted and later re-created
//! under the same name is not captured again for the rest of the run.
//! Names are kept as exact `OsString`s, so names that only differ in
//! non-UTF-8 bytes stay distinct.

use crate::scanner::{list_source, Listing};
use crate::types::SnagError;
use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Names already handled, plus recorded child listings in deep-check mode
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Top-level names that are never looked at again
    seen: HashSet<OsString>,

    /// Directory name -> sorted child names at the time of the last capture
    dirs: HashMap<OsString, Vec<OsString>>,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// List `source` once and record everything currently in it.
    ///
    /// Also returns the change signal of that listing, the baseline for the
    /// first poll.
    pub fn initialize(source: &Path, deep_check: bool) -> Result<(Self, usize), SnagError> {
        let listing = list_source(source, deep_check)?;
        Ok((Self::from_listing(&listing, deep_check), listing.change_signal()))
    }

    /// Directories are recorded by child listing in deep-check mode, and as
    /// plain seen names otherwise.
    fn from_listing(listing: &Listing, deep_check: bool) -> Self {
        let mut snapshot = Self::new();
        for entry in &listing.entries {
            match &entry.children {
                Some(children) if deep_check && entry.is_dir() => {
                    snapshot.record_directory(&entry.file_name, children.clone());
                }
                _ => snapshot.record_file(&entry.file_name),
            }
        }
        snapshot
    }

    /// True once `name` has been recorded as seen.
    ///
    /// Recorded child listings do not count.
    pub fn is_known(&self, name: impl AsRef<OsStr>) -> bool {
        self.seen.contains(name.as_ref())
    }

    /// True if `name` is an unseen directory or its children differ from the
    /// recorded listing, compared as an unordered multiset.
    pub fn is_directory_changed(&self, name: impl AsRef<OsStr>, children: &[OsString]) -> bool {
        match self.dirs.get(name.as_ref()) {
            None => true,
            Some(recorded) => {
                let mut current = children.to_vec();
                current.sort();
                *recorded != current
            }
        }
    }

    /// Mark `name` as seen
    pub fn record_file(&mut self, name: impl AsRef<OsStr>) {
        self.seen.insert(name.as_ref().to_os_string());
    }

    /// Store the child listing of directory `name`, replacing any previous one
    pub fn record_directory(&mut self, name: impl AsRef<OsStr>, mut children: Vec<OsString>) {
        children.sort();
        self.dirs.insert(name.as_ref().to_os_string(), children);
    }
}
