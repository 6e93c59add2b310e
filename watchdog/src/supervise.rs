//! The restart loop behind `watchdog run`.
//!
//! launch → wait for exit → fixed pause → launch, forever. The working
//! directory is resolved once before the first launch.

use std::ops::ControlFlow;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::core::classifier::classify_exit;
use crate::core::types::{ChildExit, ExitKind, RestartDecision};
use crate::io::config::WatchdogConfig;
use crate::io::pause::Pause;
use crate::io::process::{LaunchRequest, Launcher};
use crate::io::workdir::resolve_workdir;

/// Reason why `run_supervisor` returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuperviseStop {
    /// `stop_on_clean_exit` is set and the child exited with status 0.
    CleanExit,
    /// The exit observer asked the loop to stop.
    Observer,
}

/// Summary of a supervisor run that ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperviseOutcome {
    /// Number of children spawned.
    pub launches: u64,
    pub stop: SuperviseStop,
}

/// One finished iteration, handed to the exit observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchRecord {
    /// 1-indexed launch number.
    pub launch: u64,
    pub exit: ChildExit,
    pub kind: ExitKind,
}

/// Keep `config.program` running.
///
/// `on_exit` sees every exit before the pause; returning `ControlFlow::Break`
/// ends the loop. The CLI always continues, so in practice the loop only ends on
/// a launch error, a clean exit with `stop_on_clean_exit`, or external kill.
///
/// Launch failures are returned as errors without a retry.
pub fn run_supervisor<L, P, F>(
    config: &WatchdogConfig,
    launcher: &L,
    pause: &P,
    mut on_exit: F,
) -> Result<SuperviseOutcome>
where
    L: Launcher,
    P: Pause,
    F: FnMut(&LaunchRecord) -> ControlFlow<()>,
{
    config.validate()?;
    let workdir = resolve_workdir(&config.workdir)?;
    let request = LaunchRequest {
        program: config.program.clone(),
        args: config.args.clone(),
        workdir,
    };
    let policy = config.restart_policy();
    info!(
        program = %request.program.display(),
        workdir = %request.workdir.display(),
        delay_ms = policy.delay.as_millis() as u64,
        "supervisor starting"
    );

    let mut launches = 0u64;
    loop {
        let exit = launcher
            .launch(&request)
            .with_context(|| format!("launch #{}", launches + 1))?;
        launches += 1;

        let kind = classify_exit(&exit);
        match kind {
            ExitKind::Clean => info!(launch = launches, "child exited cleanly"),
            ExitKind::Failed(code) => warn!(
                launch = launches,
                exit_code = code,
                uptime_ms = exit.uptime.as_millis() as u64,
                "child exited with failure"
            ),
            ExitKind::Terminated => warn!(
                launch = launches,
                uptime_ms = exit.uptime.as_millis() as u64,
                "child terminated without exit code"
            ),
        }

        let record = LaunchRecord {
            launch: launches,
            exit,
            kind,
        };
        if on_exit(&record).is_break() {
            return Ok(SuperviseOutcome {
                launches,
                stop: SuperviseStop::Observer,
            });
        }

        match policy.decide(kind) {
            RestartDecision::Stop => {
                info!(launch = launches, "clean exit, supervisor stopping");
                return Ok(SuperviseOutcome {
                    launches,
                    stop: SuperviseStop::CleanExit,
                });
            }
            RestartDecision::Restart { delay } => {
                debug!(delay_ms = delay.as_millis() as u64, "pausing before restart");
                pause.pause(delay);
            }
        }
    }
}
