//! Launching the target program and waiting for it to exit.
//!
//! The child inherits the supervisor's environment and stdio. There is no
//! timeout: a hung child blocks the caller until it terminates.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument};

use crate::core::types::ChildExit;

/// Parameters for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Executable to run. Bare names are resolved via `PATH` by the OS.
    pub program: PathBuf,
    /// Arguments for the child. Empty unless configured.
    pub args: Vec<String>,
    /// Working directory for the child.
    pub workdir: PathBuf,
}

/// Marker attached to errors from a failed spawn so the CLI can map them to
/// `exit_codes::LAUNCH_FAILED`.
#[derive(Debug)]
pub struct LaunchError {
    pub program: PathBuf,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to launch {}", self.program.display())
    }
}

impl std::error::Error for LaunchError {}

/// Abstraction over starting the target. Tests use scripted launchers that
/// return predetermined exits without spawning processes.
pub trait Launcher {
    /// Start the program and block until it terminates.
    fn launch(&self, request: &LaunchRequest) -> Result<ChildExit>;
}

/// Launcher backed by `std::process::Command`.
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    #[instrument(skip_all, fields(program = %request.program.display()))]
    fn launch(&self, request: &LaunchRequest) -> Result<ChildExit> {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .current_dir(&request.workdir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        debug!(args = ?request.args, workdir = %request.workdir.display(), "spawning child process");
        let started = Instant::now();
        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                error!(err = %e, "failed to spawn program");
                return Err(anyhow::Error::new(e).context(LaunchError {
                    program: request.program.clone(),
                }));
            }
        };
        info!(pid = child.id(), "child started");

        let status = child.wait().context("wait for child")?;
        let exit = ChildExit {
            code: status.code(),
            uptime: started.elapsed(),
        };
        debug!(exit_code = ?exit.code, uptime_ms = exit.uptime.as_millis() as u64, "child exited");
        Ok(exit)
    }
}
