//! Outcomes reported by the capture engine and the process terminator

/// Result of a single forceful termination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// The process was found and stopped
    Killed,

    /// The process exists but we may not stop it
    AccessDenied,

    /// No process with that image name is running
    NotFound,
}

/// How a capture attempt for one entry ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Standard copy succeeded on the first try
    Copied,

    /// Standard copy succeeded after terminating the blocking processes
    CopiedAfterKill,

    /// Raw copy was launched; its result is not verified
    RawCopyAttempted,

    /// Every configured tier failed, the entry is abandoned
    Abandoned,
}
