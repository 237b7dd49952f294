//! Poll loop controller
//!
//! The watcher alternates between waiting out the poll interval and running
//! a classification pass. A pass only runs when the change signal (see
//! [`Listing::change_signal`]) differs from the value seen at the start of
//! the previous pass. Writes to the destination never feed back into the
//! signal, since source and destination are disjoint.

mod cancel;

pub use cancel::CancellationToken;

use crate::classify::{classify, record_handled, Action};
use crate::executor::CaptureEngine;
use crate::scanner::{list_source, Listing};
use crate::snapshot::Snapshot;
use crate::types::{CaptureOutcome, SnagError};
use crate::ui::Reporter;
use crate::Config;
use std::thread;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep; bounds how late a cancellation is noticed
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Counters for one classification pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Entries in the listing, known or not
    pub entries: usize,
    /// Files and directories that reached the destination
    pub copied: usize,
    /// Files handed to the raw copy tool
    pub raw_attempts: usize,
    /// Entries for which every tier failed
    pub abandoned: usize,
    /// Entries ignored because of their suffix
    pub excluded: usize,
    /// Directories announced in flat mode
    pub new_dirs: usize,
}

impl PassReport {
    fn count(&mut self, outcome: CaptureOutcome) {
        match outcome {
            CaptureOutcome::Copied | CaptureOutcome::CopiedAfterKill => self.copied += 1,
            CaptureOutcome::RawCopyAttempted => self.raw_attempts += 1,
            CaptureOutcome::Abandoned => self.abandoned += 1,
        }
    }
}

/// Detection-and-capture loop over one source directory
pub struct Watcher {
    config: Config,
    snapshot: Snapshot,
    engine: CaptureEngine,
    reporter: Reporter,
    baseline: usize,
    /// Set while the source cannot be listed, so the failure is reported once
    listing_failed: bool,
}

impl Watcher {
    /// Record the current content of the source so nothing already there is
    /// treated as new.
    pub fn new(
        config: Config,
        engine: CaptureEngine,
        reporter: Reporter,
    ) -> Result<Self, SnagError> {
        let (snapshot, baseline) = Snapshot::initialize(&config.source, config.deep_check)?;
        tracing::debug!("initial snapshot: change signal {}", baseline);

        Ok(Self {
            config,
            snapshot,
            engine,
            reporter,
            baseline,
            listing_failed: false,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Change signal recorded at the start of the last pass
    pub fn baseline(&self) -> usize {
        self.baseline
    }

    pub fn engine(&self) -> &CaptureEngine {
        &self.engine
    }

    /// List the source once; run a pass if the change signal moved.
    ///
    /// Returns `None` when the signal is unchanged and nothing was examined.
    pub fn poll_once(&mut self) -> Result<Option<PassReport>, SnagError> {
        let listing = list_source(&self.config.source, self.config.deep_check)?;
        let signal = listing.change_signal();
        if signal == self.baseline {
            return Ok(None);
        }

        tracing::debug!("change signal {} -> {}, scanning", self.baseline, signal);
        let report = self.run_pass(&listing);
        self.baseline = signal;
        Ok(Some(report))
    }

    fn run_pass(&mut self, listing: &Listing) -> PassReport {
        let mut report = PassReport {
            entries: listing.len(),
            ..PassReport::default()
        };
        let destination = self.config.destination.clone();

        for entry in &listing.entries {
            let action = classify(entry, &self.snapshot, &self.config);
            tracing::trace!("{} -> {}", entry.name, action.name());

            match &action {
                Action::Skip | Action::Unchanged => {}
                Action::Exclude => report.excluded += 1,
                Action::Ignore => {
                    tracing::debug!("ignoring special entry {}", entry.path.display());
                }
                Action::AnnounceDir => {
                    self.reporter
                        .message(&format!("new dir found: {}", entry.path.display()));
                    report.new_dirs += 1;
                }
                Action::CaptureFile => {
                    let outcome = self.engine.capture_file(
                        &entry.path,
                        &entry.name,
                        &destination,
                        &mut self.reporter,
                    );
                    report.count(outcome);
                }
                Action::CaptureDir { children } => {
                    let outcome = self.engine.capture_dir(
                        &entry.path,
                        &entry.name,
                        &destination,
                        children.len(),
                        &mut self.reporter,
                    );
                    report.count(outcome);
                }
            }

            record_handled(&action, entry, &mut self.snapshot);
        }

        report
    }

    /// Poll until `token` is cancelled, then close the log.
    ///
    /// The loop keeps going when the source cannot be listed. The failure is
    /// reported when it starts and again when listing works once more.
    pub fn run(&mut self, token: &CancellationToken) -> Result<(), SnagError> {
        while !token.is_cancelled() {
            match self.poll_once() {
                Ok(_) if self.listing_failed => {
                    self.listing_failed = false;
                    self.reporter.message(&format!(
                        "Source {} is readable again.",
                        self.config.source.display()
                    ));
                }
                Ok(_) => {}
                Err(e) if self.listing_failed => {
                    tracing::debug!("source still unreadable: {}", e);
                }
                Err(e) => {
                    self.listing_failed = true;
                    self.reporter.error(format!(
                        "Cannot list {}\n{}",
                        self.config.source.display(),
                        e
                    ));
                }
            }
            self.pause(token);
        }

        self.reporter.close();
        Ok(())
    }

    fn pause(&self, token: &CancellationToken) {
        let deadline = Instant::now() + self.config.interval;
        while !token.is_cancelled() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }
}
