//! Item classifier: what to do with one entry of the source listing

use crate::snapshot::Snapshot;
use crate::types::{Entry, EntryKind};
use crate::Config;
use std::ffi::OsString;

/// Decision for a single entry during a classification pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Already in the snapshot
    Skip,

    /// Name ends with an excluded suffix; ignored from now on
    Exclude,

    /// New file, hand it to the capture engine
    CaptureFile,

    /// New directory while deep-check is off; announce it only
    AnnounceDir,

    /// New or changed directory in deep-check mode
    CaptureDir { children: Vec<OsString> },

    /// Directory whose child listing matches the snapshot
    Unchanged,

    /// Neither file nor directory
    Ignore,
}

impl Action {
    /// Short label for traces
    pub fn name(&self) -> &'static str {
        match self {
            Action::Skip => "Skip",
            Action::Exclude => "Exclude",
            Action::CaptureFile => "CaptureFile",
            Action::AnnounceDir => "AnnounceDir",
            Action::CaptureDir { .. } => "CaptureDir",
            Action::Unchanged => "Unchanged",
            Action::Ignore => "Ignore",
        }
    }
}

/// Decide what to do with `entry`.
///
/// Checks run in a fixed order: snapshot membership, suffix exclusion, then
/// filesystem kind. Directories without a child listing in deep-check mode
/// are treated as empty.
pub fn classify(entry: &Entry, snapshot: &Snapshot, config: &Config) -> Action {
    if snapshot.is_known(&entry.file_name) {
        return Action::Skip;
    }

    if config.is_excluded(&entry.name) {
        return Action::Exclude;
    }

    match entry.kind {
        EntryKind::File => Action::CaptureFile,
        EntryKind::Directory if !config.deep_check => Action::AnnounceDir,
        EntryKind::Directory => {
            let children = entry.children.clone().unwrap_or_default();
            if snapshot.is_directory_changed(&entry.file_name, &children) {
                Action::CaptureDir { children }
            } else {
                Action::Unchanged
            }
        }
        EntryKind::Other => Action::Ignore,
    }
}

/// Update the snapshot once `action` has been carried out for `entry`.
///
/// Captured files are recorded whether or not the copy worked, so a failed
/// file is never retried. Captured directories get their new listing.
pub fn record_handled(action: &Action, entry: &Entry, snapshot: &mut Snapshot) {
    match action {
        Action::Skip | Action::Unchanged => {}
        Action::Exclude | Action::CaptureFile | Action::AnnounceDir | Action::Ignore => {
            snapshot.record_file(&entry.file_name);
        }
        Action::CaptureDir { children } => {
            snapshot.record_directory(&entry.file_name, children.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str) -> Entry {
        Entry::new(name, PathBuf::from("/src").join(name), EntryKind::File)
    }

    fn dir(name: &str, children: &[&str]) -> Entry {
        Entry::new(name, PathBuf::from("/src").join(name), EntryKind::Directory)
            .with_children(children.iter().map(|c| OsString::from(*c)).collect())
    }

    fn deep() -> Config {
        Config {
            deep_check: true,
            ..Config::default()
        }
    }

    #[test]
    fn test_known_entry_is_skipped() {
        let mut snapshot = Snapshot::new();
        snapshot.record_file("a.txt");
        assert_eq!(classify(&file("a.txt"), &snapshot, &Config::default()), Action::Skip);
    }

    #[test]
    fn test_new_file_is_captured() {
        let action = classify(&file("a.txt"), &Snapshot::new(), &Config::default());
        assert_eq!(action, Action::CaptureFile);
    }

    #[test]
    fn test_excluded_suffix_wins_over_kind() {
        let config = Config {
            exclude: vec!["tmp".to_string()],
            deep_check: true,
            ..Config::default()
        };
        let snapshot = Snapshot::new();

        assert_eq!(classify(&file("x.tmp"), &snapshot, &config), Action::Exclude);
        assert_eq!(classify(&dir("cache.tmp", &["a"]), &snapshot, &config), Action::Exclude);
    }

    #[test]
    fn test_flat_mode_announces_directories() {
        let entry = Entry::new("d", PathBuf::from("/src/d"), EntryKind::Directory);
        let action = classify(&entry, &Snapshot::new(), &Config::default());
        assert_eq!(action, Action::AnnounceDir);
    }

    #[test]
    fn test_deep_mode_captures_new_directory() {
        let action = classify(&dir("d", &["b", "a"]), &Snapshot::new(), &deep());
        assert_eq!(
            action,
            Action::CaptureDir {
                children: vec![OsString::from("a"), OsString::from("b")]
            }
        );
    }

    #[test]
    fn test_deep_mode_unchanged_directory() {
        let mut snapshot = Snapshot::new();
        snapshot.record_directory("d", vec![OsString::from("a")]);
        assert_eq!(classify(&dir("d", &["a"]), &snapshot, &deep()), Action::Unchanged);
        assert!(matches!(
            classify(&dir("d", &["a", "b"]), &snapshot, &deep()),
            Action::CaptureDir { .. }
        ));
    }

    #[test]
    fn test_other_kind_is_ignored() {
        let entry = Entry::new("sock", PathBuf::from("/src/sock"), EntryKind::Other);
        assert_eq!(classify(&entry, &Snapshot::new(), &Config::default()), Action::Ignore);
    }

    #[test]
    fn test_record_handled_marks_known() {
        let mut snapshot = Snapshot::new();
        for (name, action) in [
            ("a.txt", Action::CaptureFile),
            ("b.tmp", Action::Exclude),
            ("d", Action::AnnounceDir),
            ("s", Action::Ignore),
        ] {
            record_handled(&action, &file(name), &mut snapshot);
            assert!(snapshot.is_known(name), "{} should be known", name);
        }
    }

    #[test]
    fn test_record_handled_updates_directory_listing() {
        let mut snapshot = Snapshot::new();
        let entry = dir("d", &["a"]);
        let action = classify(&entry, &snapshot, &deep());
        record_handled(&action, &entry, &mut snapshot);

        assert!(!snapshot.is_known("d"));
        assert_eq!(classify(&entry, &snapshot, &deep()), Action::Unchanged);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::Skip.name(), "Skip");
        assert_eq!(Action::CaptureDir { children: vec![] }.name(), "CaptureDir");
    }
}
