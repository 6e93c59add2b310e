//! Watchdog configuration stored in `watchdog.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::policy::{DEFAULT_RESTART_DELAY, RestartPolicy};

/// Default config file name, looked up in the invoking directory.
pub const DEFAULT_CONFIG_FILE: &str = "watchdog.toml";

/// Watchdog configuration (TOML).
///
/// Intended to be edited by humans. Missing fields take the defaults below;
/// `program` has no usable default and must come from the file or the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Executable launched on every iteration.
    pub program: PathBuf,

    /// Arguments passed to `program`. Empty by default.
    pub args: Vec<String>,

    /// Working directory of every launched child. A relative path in a config
    /// file is relative to that file's directory; on the command line it is
    /// relative to the invoking directory.
    pub workdir: PathBuf,

    /// Pause between a child exit and the next launch, in milliseconds.
    pub restart_delay_ms: u64,

    /// Leave the loop when the child exits with status 0.
    pub stop_on_clean_exit: bool,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::new(),
            args: Vec::new(),
            workdir: PathBuf::from("."),
            restart_delay_ms: DEFAULT_RESTART_DELAY.as_millis() as u64,
            stop_on_clean_exit: false,
        }
    }
}

impl WatchdogConfig {
    pub fn validate(&self) -> Result<()> {
        if self.program.as_os_str().is_empty() {
            return Err(anyhow!("program must be set (config file or --program)"));
        }
        if self.workdir.as_os_str().is_empty() {
            return Err(anyhow!("workdir must not be empty"));
        }
        if self.restart_delay_ms == 0 {
            return Err(anyhow!("restart_delay_ms must be > 0"));
        }
        Ok(())
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn restart_policy(&self) -> RestartPolicy {
        RestartPolicy {
            delay: self.restart_delay(),
            stop_on_clean_exit: self.stop_on_clean_exit,
        }
    }
}

/// Values given on the command line. `None` leaves the file value alone;
/// `Some` replaces it, so `Some(vec![])` clears the args and `Some(false)`
/// turns off a file's `stop_on_clean_exit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub program: Option<PathBuf>,
    pub args: Option<Vec<String>>,
    pub workdir: Option<PathBuf>,
    pub restart_delay_ms: Option<u64>,
    pub stop_on_clean_exit: Option<bool>,
}

/// Apply command-line overrides to the loaded config and validate the result.
pub fn apply_overrides(
    mut base: WatchdogConfig,
    overrides: &ConfigOverrides,
) -> Result<WatchdogConfig> {
    if let Some(program) = &overrides.program {
        base.program = program.clone();
    }
    if let Some(args) = &overrides.args {
        base.args = args.clone();
    }
    if let Some(workdir) = &overrides.workdir {
        base.workdir = workdir.clone();
    }
    if let Some(delay) = overrides.restart_delay_ms {
        base.restart_delay_ms = delay;
    }
    if let Some(stop) = overrides.stop_on_clean_exit {
        base.stop_on_clean_exit = stop;
    }
    base.validate()?;
    Ok(base)
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `WatchdogConfig::default()`. Validation is
/// left to [`apply_overrides`] since the CLI may still supply `program`.
/// A relative `workdir` is anchored at the file's directory.
pub fn load_config(path: &Path) -> Result<WatchdogConfig> {
    if !path.exists() {
        return Ok(WatchdogConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut cfg: WatchdogConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    if cfg.workdir.is_relative()
        && let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        cfg.workdir = dir.join(&cfg.workdir);
    }
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &WatchdogConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
