//! Console and log reporting

pub mod log;

pub use log::{FileLog, LogSink, MemoryLog};

use console::style;
use std::fmt::Display;

const ERROR_RULE: &str =
    "=============================================================================";
const NOTICE_RULE: &str = "-----------------------------------";

/// Prints human-readable events and mirrors them into an optional log sink
pub struct Reporter {
    sink: Option<Box<dyn LogSink>>,
    quiet: bool,
}

impl Reporter {
    /// Console-only reporter
    pub fn new() -> Self {
        Self {
            sink: None,
            quiet: false,
        }
    }

    /// Reporter that also appends every message to `sink`
    pub fn with_sink(sink: impl LogSink + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            quiet: false,
        }
    }

    /// Stop printing to stdout; the sink still receives everything
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Report a regular event
    pub fn message(&mut self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
        self.log(msg);
    }

    /// Report something that went wrong but needs no banner
    pub fn warning(&mut self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).yellow());
        }
        self.log(msg);
    }

    /// Report an error inside a delimited banner
    pub fn error(&mut self, error: impl Display) {
        let banner = error_banner(&error);
        if !self.quiet {
            println!("{}", style(&banner).red());
        }
        self.log(&banner);
    }

    /// Flush and close the log sink
    pub fn close(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.close() {
                tracing::warn!("failed to close log: {}", e);
            }
        }
    }

    fn log(&mut self, msg: &str) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.write(msg) {
                tracing::warn!("failed to write log entry: {}", e);
            }
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.close();
    }
}

/// Error text framed by `=` rules
pub fn error_banner(error: &dyn Display) -> String {
    format!("{}\n{}\n{}\n", ERROR_RULE, error, ERROR_RULE)
}

/// Notice printed once the watcher is ready
pub fn startup_banner() -> String {
    format!(
        "{}\nPress Ctrl + C to exit the program.\n{}\n",
        NOTICE_RULE, NOTICE_RULE
    )
}

/// Notice printed when the watcher is interrupted
pub fn interrupt_banner() -> String {
    format!(
        "{}\nKeyboardInterrupt.\nExiting the program.\n{}\n",
        NOTICE_RULE, NOTICE_RULE
    )
}
