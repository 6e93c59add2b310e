//! `watchdog check`: resolve the effective configuration without launching.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::io::config::WatchdogConfig;
use crate::io::workdir::resolve_workdir;

/// Where the program would be found at spawn time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum ProgramStatus {
    Found(PathBuf),
    NotFound,
}

/// Effective settings the supervisor would run with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub program: PathBuf,
    pub program_status: ProgramStatus,
    pub args: Vec<String>,
    pub workdir: PathBuf,
    pub restart_delay_ms: u64,
    pub stop_on_clean_exit: bool,
}

/// Validate `config`, resolve the working directory and locate the program.
///
/// Errors only for invalid config or workdir. A missing program is reported in
/// the returned status.
pub fn check_config(config: &WatchdogConfig) -> Result<CheckReport> {
    config.validate()?;
    let workdir = resolve_workdir(&config.workdir)?;
    let program_status = locate_program(&config.program, &workdir, env::var_os("PATH"));
    debug!(program = %config.program.display(), status = ?program_status, "program located");
    Ok(CheckReport {
        program: config.program.clone(),
        program_status,
        args: config.args.clone(),
        workdir,
        restart_delay_ms: config.restart_delay_ms,
        stop_on_clean_exit: config.stop_on_clean_exit,
    })
}

/// Mirror how the OS resolves a program: names containing a separator are
/// paths (relative ones against the child's workdir), bare names go through `PATH`.
fn locate_program(
    program: &Path,
    workdir: &Path,
    path_var: Option<OsString>,
) -> ProgramStatus {
    if program.components().count() > 1 || program.is_absolute() {
        let candidate = workdir.join(program);
        return if is_launchable(&candidate) {
            ProgramStatus::Found(candidate)
        } else {
            ProgramStatus::NotFound
        };
    }
    let Some(path_var) = path_var else {
        return ProgramStatus::NotFound;
    };
    env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_launchable(candidate))
        .map_or(ProgramStatus::NotFound, ProgramStatus::Found)
}

/// A regular file the OS would agree to exec. On unix that needs an execute
/// bit; `PATH` lookup skips files without one.
#[cfg(unix)]
fn is_launchable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_launchable(path: &Path) -> bool {
    path.is_file()
}
