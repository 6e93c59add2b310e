//! Restart-forever process supervisor.
//!
//! The watchdog launches a target program, blocks until it exits, pauses for a
//! fixed interval and launches it again, indefinitely. The architecture keeps a
//! strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (exit classification, restart decisions).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config file, process launch, pausing).
//!   Isolated behind traits so the loop can be driven by scripted doubles in tests.
//!
//! Orchestration modules ([`supervise`], [`check`]) coordinate core logic with I/O
//! to implement CLI commands.

pub mod check;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod supervise;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
