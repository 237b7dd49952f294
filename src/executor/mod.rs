//! Capture engine: the escalating copy protocol
//!
//! A file goes through up to three tiers: a standard copy, a retry after
//! killing the configured processes, and finally the raw copy tool. A
//! directory gets the first two tiers only. Every failure is reported; an
//! entry that exhausts its tiers is abandoned.

pub mod copy;
pub mod raw;
pub mod terminate;

pub use copy::{copy_file_atomic, copy_into, copy_tree};
pub use raw::{RawCopier, RawCopyCommand};
pub use terminate::{ProcessKiller, SystemTerminator, TerminateProcess};

use crate::types::{CaptureOutcome, SnagError};
use crate::ui::Reporter;
use crate::Config;
use std::ffi::OsStr;
use std::path::Path;

/// Standard copy operations used by the first two tiers
pub trait Copier: Send {
    /// Copy file `src` into `dest_dir` under the same name
    fn copy_file(&mut self, src: &Path, dest_dir: &Path) -> Result<u64, SnagError>;

    /// Copy directory `src` to `dest`, merging into an existing directory
    fn copy_tree(&mut self, src: &Path, dest: &Path) -> Result<u64, SnagError>;
}

/// Copier backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCopier;

impl Copier for FsCopier {
    fn copy_file(&mut self, src: &Path, dest_dir: &Path) -> Result<u64, SnagError> {
        copy_into(src, dest_dir)
    }

    fn copy_tree(&mut self, src: &Path, dest: &Path) -> Result<u64, SnagError> {
        copy_tree(src, dest)
    }
}

/// Runs the escalation protocol for single entries
pub struct CaptureEngine {
    copier: Box<dyn Copier>,
    killer: ProcessKiller,
    raw: Option<Box<dyn RawCopier>>,
}

impl CaptureEngine {
    pub fn new(
        copier: Box<dyn Copier>,
        killer: ProcessKiller,
        raw: Option<Box<dyn RawCopier>>,
    ) -> Self {
        Self {
            copier,
            killer,
            raw,
        }
    }

    /// Engine using the filesystem, the platform kill tool and the configured
    /// raw copy executable
    pub fn from_config(config: &Config) -> Self {
        let killer = ProcessKiller::new(
            config.kill.clone(),
            config.kill_once,
            config.kill_grace,
            Box::new(SystemTerminator),
        );
        let raw = config
            .raw_copy
            .as_ref()
            .map(|program| Box::new(RawCopyCommand::new(program)) as Box<dyn RawCopier>);

        Self::new(Box::new(FsCopier), killer, raw)
    }

    /// Kill list as it stands now
    pub fn killer(&self) -> &ProcessKiller {
        &self.killer
    }

    /// Capture file `src` (named `name`) into `dest_dir`.
    pub fn capture_file(
        &mut self,
        src: &Path,
        name: &str,
        dest_dir: &Path,
        reporter: &mut Reporter,
    ) -> CaptureOutcome {
        let copied = format!("file {} copied.", name);

        match self.copier.copy_file(src, dest_dir) {
            Ok(_) => {
                reporter.message(&copied);
                return CaptureOutcome::Copied;
            }
            Err(e) => reporter.error(describe_failure(src, &e)),
        }

        if !self.killer.is_empty() {
            self.killer.terminate(reporter);
            match self.copier.copy_file(src, dest_dir) {
                Ok(_) => {
                    reporter.message(&copied);
                    return CaptureOutcome::CopiedAfterKill;
                }
                Err(e) => reporter.error(describe_failure(src, &e)),
            }
        }

        if let Some(raw) = self.raw.as_mut() {
            match raw.raw_copy(src, dest_dir) {
                Ok(command) => {
                    reporter.message(&format!("Attempt to copy with RawCopy: {}", command));
                    return CaptureOutcome::RawCopyAttempted;
                }
                Err(e) => reporter.error(format!("Cannot run raw copy for {}: {}", name, e)),
            }
        }

        tracing::warn!("abandoning {}", src.display());
        CaptureOutcome::Abandoned
    }

    /// Capture directory `src` (named `name`) into `dest_dir/name`.
    ///
    /// `nested_count` is the number of immediate children, used for the
    /// success message only.
    pub fn capture_dir(
        &mut self,
        src: &Path,
        name: &str,
        dest_dir: &Path,
        nested_count: usize,
        reporter: &mut Reporter,
    ) -> CaptureOutcome {
        let save_path = dest_dir.join(src.file_name().unwrap_or_else(|| OsStr::new(name)));
        let copied = format!("dir {} with {} nested items copied.", name, nested_count);

        match self.copier.copy_tree(src, &save_path) {
            Ok(_) => {
                reporter.message(&copied);
                return CaptureOutcome::Copied;
            }
            Err(e) => reporter.error(describe_failure(src, &e)),
        }

        if !self.killer.is_empty() {
            self.killer.terminate(reporter);
            match self.copier.copy_tree(src, &save_path) {
                Ok(_) => {
                    reporter.message(&copied);
                    return CaptureOutcome::CopiedAfterKill;
                }
                Err(e) => reporter.error(describe_failure(src, &e)),
            }
        }

        tracing::warn!("abandoning {}", src.display());
        CaptureOutcome::Abandoned
    }
}

fn describe_failure(src: &Path, error: &SnagError) -> String {
    format!("Cannot copy {}\n{}", src.display(), error)
}
