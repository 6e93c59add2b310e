//! Restart policy: a fixed delay after every exit.
//!
//! The delay never grows and there is no attempt limit. The only way out of the
//! loop is the opt-in `stop_on_clean_exit` flag.

use std::time::Duration;

use crate::core::types::{ExitKind, RestartDecision};

/// Delay used when nothing is configured.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub delay: Duration,
    pub stop_on_clean_exit: bool,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RESTART_DELAY,
            stop_on_clean_exit: false,
        }
    }
}

impl RestartPolicy {
    pub fn decide(&self, kind: ExitKind) -> RestartDecision {
        if self.stop_on_clean_exit && kind == ExitKind::Clean {
            return RestartDecision::Stop;
        }
        RestartDecision::Restart { delay: self.delay }
    }
}
