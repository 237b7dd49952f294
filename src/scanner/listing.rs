//! One-level listing of the source directory

use crate::types::{Entry, EntryKind, SnagError};
use std::ffi::OsString;
use std::fs;
use std::path::Path;

/// A point-in-time view of the first level of the source directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Entries sorted by file name
    pub entries: Vec<Entry>,
}

impl Listing {
    /// Cheap change signal: number of trackable items.
    ///
    /// Files and other entries count once; in deep-check mode a directory
    /// counts as itself plus its children. Equal counts across an add and a
    /// remove hide both changes until the next count-changing event.
    pub fn change_signal(&self) -> usize {
        self.entries.iter().map(Entry::weight).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// List `root` one level deep.
///
/// With `deep_check`, every directory also gets its immediate child names.
/// A directory whose children cannot be read is listed with no children.
pub fn list_source(root: &Path, deep_check: bool) -> Result<Listing, SnagError> {
    let read_dir = fs::read_dir(root).map_err(|e| SnagError::from_io(root, e))?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };

        let path = dir_entry.path();
        let file_name = dir_entry.file_name();

        // Follow symlinks like a plain stat would; dangling links become Other
        let kind = match fs::metadata(&path) {
            Ok(m) if m.is_file() => EntryKind::File,
            Ok(m) if m.is_dir() => EntryKind::Directory,
            _ => EntryKind::Other,
        };

        let mut entry = Entry::new(file_name, path, kind);
        if deep_check && kind == EntryKind::Directory {
            let children = match list_children(&entry.path) {
                Ok(children) => children,
                Err(e) => {
                    tracing::warn!("cannot list {}: {}", entry.path.display(), e);
                    Vec::new()
                }
            };
            entry = entry.with_children(children);
        }
        entries.push(entry);
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(Listing { entries })
}

/// Names of the immediate children of `dir`
pub fn list_children(dir: &Path) -> Result<Vec<OsString>, SnagError> {
    let mut names = Vec::new();
    for child in fs::read_dir(dir).map_err(|e| SnagError::from_io(dir, e))? {
        let child = child?;
        names.push(child.file_name());
    }
    names.sort();
    Ok(names)
}
