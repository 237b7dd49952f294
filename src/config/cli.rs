//! Command-line interface definition

use clap::Parser;
use std::path::PathBuf;

/// Catch new files in a directory and copy them before they disappear
#[derive(Debug, Clone, Parser)]
#[command(name = "snag", version, about, long_about = None)]
pub struct Cli {
    /// Directory to watch for new files
    #[arg(long = "from", value_name = "DIR")]
    pub from: PathBuf,

    /// Directory to store captured files in (created if missing)
    #[arg(long = "to", value_name = "DIR")]
    pub to: PathBuf,

    /// Also track first-level directories and their contents
    #[arg(long)]
    pub checkdirs: bool,

    /// Process image name to kill when a copy is refused (repeatable)
    #[arg(long = "kill", value_name = "NAME")]
    pub kill: Vec<String>,

    /// Kill each named process at most once
    #[arg(long)]
    pub once: bool,

    /// Name suffix to ignore permanently (repeatable)
    #[arg(long = "exc", value_name = "SUFFIX")]
    pub exc: Vec<String>,

    /// Delay between directory checks in milliseconds
    #[arg(short = 'd', long = "delay", value_name = "MS", default_value_t = 200, allow_negative_numbers = true)]
    pub delay: i64,

    /// Fall back to RawCopy for files that stay locked
    #[arg(long)]
    pub rc: bool,

    /// Path to the RawCopy executable (defaults to RawCopy.exe next to snag)
    #[arg(long = "rcpath", value_name = "PATH")]
    pub rc_path: Option<PathBuf>,

    /// Do not create a log file in the destination directory
    #[arg(long = "no-log")]
    pub no_log: bool,

    /// Print diagnostic traces to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
