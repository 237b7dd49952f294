//! Raw copy fallback through an external low-level reader

use crate::types::SnagError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Capability to read a locked file with an external tool
pub trait RawCopier: Send {
    /// Copy `src` into `dest_dir`, returning the command line that was run.
    ///
    /// Only failures to launch the tool are errors; whether the tool itself
    /// succeeded is not checked.
    fn raw_copy(&mut self, src: &Path, dest_dir: &Path) -> Result<String, SnagError>;
}

/// RawCopy-style executable taking `/FileNamePath:` and `/OutputPath:`
#[derive(Debug, Clone)]
pub struct RawCopyCommand {
    program: PathBuf,
}

impl RawCopyCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(src: &Path, dest_dir: &Path) -> [String; 2] {
        [
            format!("/FileNamePath:{}", src.display()),
            format!("/OutputPath:{}", dest_dir.display()),
        ]
    }

    /// Human-readable command line, quoted the way a shell would need it
    pub fn describe(&self, src: &Path, dest_dir: &Path) -> String {
        format!(
            "{} /FileNamePath:\"{}\" /OutputPath:\"{}\"",
            self.program.display(),
            src.display(),
            dest_dir.display()
        )
    }
}

impl RawCopier for RawCopyCommand {
    fn raw_copy(&mut self, src: &Path, dest_dir: &Path) -> Result<String, SnagError> {
        let description = self.describe(src, dest_dir);
        tracing::debug!("running {}", description);

        let status = Command::new(&self.program)
            .args(Self::args(src, dest_dir))
            .status()
            .map_err(|e| SnagError::from_io(&self.program, e))?;
        tracing::debug!("raw copy exited with {}", status);

        Ok(description)
    }
}
