//! Stable exit codes for watchdog CLI commands.

/// Command succeeded, or `run` stopped after a clean child exit.
pub const OK: i32 = 0;
/// Invalid config or working directory, or any other error.
pub const INVALID: i32 = 1;
/// The target program could not be spawned. The loop does not retry this.
pub const LAUNCH_FAILED: i32 = 2;
