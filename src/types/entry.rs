//! Entry - a single name observed in the source directory

use std::ffi::OsString;
use std::path::PathBuf;

/// Filesystem kind of a source entry, as seen when it was listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, fifos, dangling links and anything else that cannot be copied
    Other,
}

/// An item in the first level of the source directory
///
/// Entries have no identity beyond their file name: a renamed file is a new
/// entry, and two names that differ only in non-UTF-8 bytes are distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Exact file name, used as the snapshot key
    pub file_name: OsString,

    /// Lossy UTF-8 form of the name, for suffix checks and messages
    pub name: String,

    /// Full path inside the source directory
    pub path: PathBuf,

    pub kind: EntryKind,

    /// Sorted immediate children; only listed for directories in deep-check mode
    pub children: Option<Vec<OsString>>,
}

impl Entry {
    /// Create a new entry without a child listing
    pub fn new(file_name: impl Into<OsString>, path: PathBuf, kind: EntryKind) -> Self {
        let file_name = file_name.into();
        Self {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            path,
            kind,
            children: None,
        }
    }

    /// Attach a child listing, sorted so listings compare as multisets
    pub fn with_children(mut self, mut children: Vec<OsString>) -> Self {
        children.sort();
        self.children = Some(children);
        self
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// How much this entry contributes to the change signal
    pub fn weight(&self) -> usize {
        match &self.children {
            Some(children) => children.len() + 1,
            None => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_has_no_children() {
        let entry = Entry::new("a.txt", PathBuf::from("/src/a.txt"), EntryKind::File);
        assert_eq!(entry.name, "a.txt");
        assert_eq!(entry.file_name, OsString::from("a.txt"));
        assert!(!entry.is_dir());
        assert_eq!(entry.children, None);
        assert_eq!(entry.weight(), 1);
    }

    #[test]
    fn test_with_children_sorts_listing() {
        let entry = Entry::new("d", PathBuf::from("/src/d"), EntryKind::Directory)
            .with_children(vec!["z".into(), "a".into(), "m".into()]);

        assert_eq!(
            entry.children,
            Some(vec![OsString::from("a"), OsString::from("m"), OsString::from("z")])
        );
        assert_eq!(entry.weight(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_stay_distinct() {
        use std::os::unix::ffi::OsStringExt;

        let a = Entry::new(OsString::from_vec(b"x\xff.bin".to_vec()), PathBuf::new(), EntryKind::File);
        let b = Entry::new(OsString::from_vec(b"x\xfe.bin".to_vec()), PathBuf::new(), EntryKind::File);

        assert_eq!(a.name, b.name);
        assert_ne!(a.file_name, b.file_name);
        assert!(a.name.ends_with(".bin"));
    }
}
