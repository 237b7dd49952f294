//! Forceful termination of processes that hold source files open

use crate::types::KillOutcome;
use crate::ui::Reporter;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// Capability to stop a process by image name
pub trait TerminateProcess: Send {
    fn terminate(&mut self, name: &str) -> KillOutcome;
}

/// Uses the platform kill tool: `taskkill /f /im` on Windows, `pkill -KILL -x`
/// elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTerminator;

impl TerminateProcess for SystemTerminator {
    fn terminate(&mut self, name: &str) -> KillOutcome {
        let mut command = kill_command(name);
        tracing::debug!("running {:?}", command);

        match command.stdout(Stdio::null()).stderr(Stdio::null()).status() {
            Ok(status) => outcome_from_exit_code(status.code()),
            Err(e) => {
                tracing::warn!("cannot run kill command for {}: {}", name, e);
                KillOutcome::NotFound
            }
        }
    }
}

#[cfg(windows)]
fn kill_command(name: &str) -> Command {
    let mut command = Command::new("taskkill");
    command.args(["/f", "/im", name]);
    command
}

#[cfg(not(windows))]
fn kill_command(name: &str) -> Command {
    let mut command = Command::new("pkill");
    command.args(["-KILL", "-x", name]);
    command
}

/// taskkill: 0 killed, 1 access denied, anything else means no such process
#[cfg(windows)]
fn outcome_from_exit_code(code: Option<i32>) -> KillOutcome {
    match code {
        Some(0) => KillOutcome::Killed,
        Some(1) => KillOutcome::AccessDenied,
        _ => KillOutcome::NotFound,
    }
}

/// pkill: 0 killed, 1 nothing matched, anything else is a failure to signal
#[cfg(not(windows))]
fn outcome_from_exit_code(code: Option<i32>) -> KillOutcome {
    match code {
        Some(0) => KillOutcome::Killed,
        Some(1) => KillOutcome::NotFound,
        _ => KillOutcome::AccessDenied,
    }
}

/// Kill policy over a list of process names
///
/// With `kill_once`, a process that was killed successfully is dropped from
/// the list, so it is attempted at most once per run.
pub struct ProcessKiller {
    names: Vec<String>,
    kill_once: bool,
    grace: Duration,
    backend: Box<dyn TerminateProcess>,
}

impl ProcessKiller {
    pub fn new(
        names: Vec<String>,
        kill_once: bool,
        grace: Duration,
        backend: Box<dyn TerminateProcess>,
    ) -> Self {
        Self {
            names,
            kill_once,
            grace,
            backend,
        }
    }

    /// Names still eligible for termination
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Try to stop every listed process and report each outcome.
    ///
    /// Sleeps for the grace period if at least one process was killed.
    pub fn terminate(&mut self, reporter: &mut Reporter) -> Vec<(String, KillOutcome)> {
        let mut outcomes = Vec::with_capacity(self.names.len());

        for name in &self.names {
            let outcome = self.backend.terminate(name);
            match outcome {
                KillOutcome::Killed => reporter.message(&format!("{} killed.", name)),
                KillOutcome::AccessDenied => {
                    reporter.warning(&format!("{} access denied.", name))
                }
                KillOutcome::NotFound => reporter.message(&format!("{} not found.", name)),
            }
            outcomes.push((name.clone(), outcome));
        }

        let killed: Vec<&str> = outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == KillOutcome::Killed)
            .map(|(name, _)| name.as_str())
            .collect();

        if self.kill_once {
            self.names.retain(|name| !killed.contains(&name.as_str()));
        }

        if !killed.is_empty() && !self.grace.is_zero() {
            thread::sleep(self.grace);
        }

        outcomes
    }
}
