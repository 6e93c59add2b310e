//! I/O helpers for watchdog commands.

pub mod config;
pub mod pause;
pub mod process;
pub mod workdir;
