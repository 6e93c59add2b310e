//! Test-only helpers: scripted launchers, recording pauses and shell scripts.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::core::types::ChildExit;
use crate::io::pause::Pause;
use crate::io::process::{LaunchError, LaunchRequest, Launcher};

/// One scripted launch result.
#[derive(Debug, Clone)]
pub enum ScriptedLaunch {
    /// The child ran and exited.
    Exit(ChildExit),
    /// The spawn failed, as if the program did not exist.
    SpawnFailure,
}

/// Launcher that replays queued results and records every request.
///
/// Runs out with an error so a test never loops forever by accident.
pub struct ScriptedLauncher {
    queue: RefCell<VecDeque<ScriptedLaunch>>,
    requests: RefCell<Vec<LaunchRequest>>,
}

impl ScriptedLauncher {
    pub fn new(launches: Vec<ScriptedLaunch>) -> Self {
        Self {
            queue: RefCell::new(launches.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Launcher whose child always exits with `code` immediately.
    pub fn exiting(code: i32, times: usize) -> Self {
        Self::new(vec![
            ScriptedLaunch::Exit(ChildExit::with_code(code, Duration::ZERO));
            times
        ])
    }

    pub fn requests(&self) -> Vec<LaunchRequest> {
        self.requests.borrow().clone()
    }

    pub fn launch_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Launcher for ScriptedLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<ChildExit> {
        self.requests.borrow_mut().push(request.clone());
        match self.queue.borrow_mut().pop_front() {
            Some(ScriptedLaunch::Exit(exit)) => Ok(exit),
            Some(ScriptedLaunch::SpawnFailure) => Err(anyhow!("No such file or directory")
                .context(LaunchError {
                    program: request.program.clone(),
                })),
            None => Err(anyhow!("scripted launcher exhausted")),
        }
    }
}

/// Pause that returns immediately and records requested delays.
#[derive(Default)]
pub struct RecordingPause {
    delays: RefCell<Vec<Duration>>,
}

impl RecordingPause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, delay: Duration) {
        self.delays.borrow_mut().push(delay);
    }
}

/// Write an executable `/bin/sh` script into `dir` and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}"))?;
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms)?;
    Ok(path)
}

/// Read a file of one-record-per-line output written by a probe script.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_string)
        .collect())
}

/// Scratch layout for end-to-end tests: an `app/` working directory, a probe
/// script and the log it appends to.
pub struct TestApp {
    temp: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir()?;
        fs::create_dir_all(temp.path().join("app"))?;
        Ok(Self { temp })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn workdir(&self) -> PathBuf {
        self.root().join("app")
    }

    pub fn probe_log(&self) -> PathBuf {
        self.root().join("launches.log")
    }

    /// Script that appends `<cwd> <argc>` to the probe log and exits with `code`.
    #[cfg(unix)]
    pub fn probe_script(&self, code: i32) -> Result<PathBuf> {
        let body = format!(
            "echo \"$(pwd -P) $#\" >> '{}'\nexit {code}\n",
            self.probe_log().display()
        );
        write_script(self.root(), "probe.sh", &body)
    }

    /// Parsed probe log: one `(cwd, argc)` per launch.
    pub fn launches(&self) -> Result<Vec<(PathBuf, usize)>> {
        read_lines(&self.probe_log())?
            .iter()
            .map(|line| -> Result<(PathBuf, usize)> {
                let (cwd, argc) = line
                    .rsplit_once(' ')
                    .ok_or_else(|| anyhow!("malformed probe line {line:?}"))?;
                Ok((PathBuf::from(cwd), argc.parse()?))
            })
            .collect()
    }
}
