//! Configuration management

mod cli;

pub use cli::Cli;

use crate::types::SnagError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default delay between two polls of the source directory
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Pause after a successful kill, so the OS can release file handles
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(2);

/// File name of the raw copy tool looked up next to the executable
pub const RAW_COPY_EXE: &str = "RawCopy.exe";

/// Validated, immutable run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory being watched
    pub source: PathBuf,

    /// Directory captured items are copied into
    pub destination: PathBuf,

    /// Track first-level directory contents instead of ignoring directories
    pub deep_check: bool,

    /// Literal name suffixes that are never captured
    pub exclude: Vec<String>,

    /// Delay between polls
    pub interval: Duration,

    /// Processes to kill when a copy is refused
    pub kill: Vec<String>,

    /// Kill each process at most once per run
    pub kill_once: bool,

    /// Pause after a successful kill
    pub kill_grace: Duration,

    /// External raw copy executable, when the fallback is enabled
    pub raw_copy: Option<PathBuf>,

    /// Write a log file into the destination
    pub log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            deep_check: false,
            exclude: Vec::new(),
            interval: DEFAULT_INTERVAL,
            kill: Vec::new(),
            kill_once: false,
            kill_grace: DEFAULT_KILL_GRACE,
            raw_copy: None,
            log: true,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = SnagError;

    /// Validate every switch, creating the destination if needed.
    ///
    /// All problems are collected and returned together in `SnagError::Config`.
    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut problems = Vec::new();

        if !cli.from.exists() {
            problems.push(format!(
                "Cannot access \"--from\" dir: {}",
                cli.from.display()
            ));
        } else if !cli.from.is_dir() {
            problems.push(format!(
                "Switch \"--from\" must be a dir, but a file is specified: {}",
                cli.from.display()
            ));
        }

        if cli.to.is_file() {
            problems.push(format!(
                "Switch \"--to\" must be a dir, but a file is specified: {}",
                cli.to.display()
            ));
        } else if !cli.to.exists() {
            if let Err(e) = fs::create_dir_all(&cli.to) {
                problems.push(format!(
                    "Cannot create \"--to\" dir: {} ({})",
                    cli.to.display(),
                    e
                ));
            }
        }

        if cli.from.is_dir() && cli.to.is_dir() && same_dir(&cli.from, &cli.to) {
            problems.push(format!(
                "Switches \"--from\" and \"--to\" must point to different dirs: {}",
                cli.from.display()
            ));
        }

        let interval = match u64::try_from(cli.delay) {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                problems.push(format!("Invalid value for \"--delay\" switch: {}", cli.delay));
                DEFAULT_INTERVAL
            }
        };

        let raw_copy = if cli.rc {
            let path = cli.rc_path.unwrap_or_else(default_raw_copy_path);
            if path.is_dir() {
                problems.push(format!(
                    "Switch \"--rcpath\" must be a file, but a dir is specified: {}",
                    path.display()
                ));
            } else if !path.exists() {
                problems.push(format!(
                    "Cannot find {} in the specified path: {}",
                    RAW_COPY_EXE,
                    path.display()
                ));
            }
            Some(path)
        } else {
            None
        };

        if !problems.is_empty() {
            return Err(SnagError::Config(problems));
        }

        Ok(Self {
            source: cli.from,
            destination: cli.to,
            deep_check: cli.checkdirs,
            exclude: cli.exc,
            interval,
            kill: cli.kill,
            kill_once: cli.once,
            kill_grace: DEFAULT_KILL_GRACE,
            raw_copy,
            log: !cli.no_log,
        })
    }
}

impl Config {
    /// Whether `name` ends with one of the excluded suffixes.
    ///
    /// Matching is on the literal trailing characters, so `report.txt` is
    /// excluded by `txt`, `.txt` and `t.txt` alike.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn default_raw_copy_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(RAW_COPY_EXE)
}
