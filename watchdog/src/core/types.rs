//! Shared deterministic types for supervisor core logic.

use std::time::Duration;

/// Observed result of one launch: the child ran and terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    /// Exit code, or `None` when the child was terminated without one (e.g. by a signal).
    pub code: Option<i32>,
    /// Wall-clock time between spawn and reap.
    pub uptime: Duration,
}

impl ChildExit {
    pub fn with_code(code: i32, uptime: Duration) -> Self {
        Self {
            code: Some(code),
            uptime,
        }
    }

    pub fn terminated(uptime: Duration) -> Self {
        Self { code: None, uptime }
    }
}

/// Classification of a child exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// Exit code 0.
    Clean,
    /// Any non-zero exit code.
    Failed(i32),
    /// No exit code was reported (killed by a signal on unix).
    Terminated,
}

/// What the loop does after a child exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    /// Pause for `delay`, then launch again.
    Restart { delay: Duration },
    /// Leave the loop.
    Stop,
}
