//! Deterministic classification of child exits.

use crate::core::types::{ChildExit, ExitKind};

/// Classify an observed exit.
///
/// - `Clean` for code 0.
/// - `Failed(code)` for any other code, negative codes included.
/// - `Terminated` when no code was reported.
pub fn classify_exit(exit: &ChildExit) -> ExitKind {
    match exit.code {
        Some(0) => ExitKind::Clean,
        Some(code) => ExitKind::Failed(code),
        None => ExitKind::Terminated,
    }
}
