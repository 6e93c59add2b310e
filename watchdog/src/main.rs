//! Restart-forever process supervisor.
//!
//! Launches the configured program, waits for it to exit, pauses for a fixed
//! interval and launches it again until the watchdog itself is killed.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use watchdog::check::{ProgramStatus, check_config};
use watchdog::exit_codes;
use watchdog::io::config::{
    ConfigOverrides, DEFAULT_CONFIG_FILE, WatchdogConfig, apply_overrides, load_config,
    write_config,
};
use watchdog::io::pause::ThreadPause;
use watchdog::io::process::{LaunchError, ProcessLauncher};
use watchdog::logging;
use watchdog::supervise::{SuperviseStop, run_supervisor};

#[derive(Parser)]
#[command(
    name = "watchdog",
    version,
    about = "Keep a program running by relaunching it whenever it exits"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Launch the program and relaunch it after every exit, forever.
    Run {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Validate the config, resolve the workdir and locate the program.
    Check {
        #[command(flatten)]
        target: TargetArgs,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Write a config file from the given flags.
    Init {
        #[command(flatten)]
        target: TargetArgs,
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Config file (TOML). A missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Executable to keep running.
    #[arg(long)]
    program: Option<PathBuf>,
    /// Working directory for the program.
    #[arg(long)]
    workdir: Option<PathBuf>,
    /// Pause between an exit and the next launch.
    #[arg(long)]
    restart_delay_ms: Option<u64>,
    /// Stop instead of relaunching when the program exits with status 0.
    /// `--stop-on-clean-exit=false` turns off a value set in the config file.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    stop_on_clean_exit: Option<bool>,
    /// Launch the program without the arguments set in the config file.
    #[arg(long, conflicts_with = "args")]
    clear_args: bool,
    /// Arguments for the program (after `--`).
    #[arg(last = true)]
    args: Vec<String>,
}

impl TargetArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            program: self.program.clone(),
            args: if self.clear_args {
                Some(Vec::new())
            } else if self.args.is_empty() {
                None
            } else {
                Some(self.args.clone())
            },
            workdir: self.workdir.clone(),
            restart_delay_ms: self.restart_delay_ms,
            stop_on_clean_exit: self.stop_on_clean_exit,
        }
    }

    fn resolve(&self) -> Result<WatchdogConfig> {
        let base = load_config(&self.config)
            .with_context(|| format!("load config {}", self.config.display()))?;
        apply_overrides(base, &self.overrides())
    }
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run { target } => cmd_run(&target),
        Command::Check { target, json } => cmd_check(&target, json),
        Command::Init { target, force } => cmd_init(&target, force),
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<LaunchError>().is_some() {
        exit_codes::LAUNCH_FAILED
    } else {
        exit_codes::INVALID
    }
}

fn cmd_run(target: &TargetArgs) -> Result<i32> {
    let config = target.resolve()?;
    let outcome = run_supervisor(&config, &ProcessLauncher, &ThreadPause, |_| {
        ControlFlow::Continue(())
    })?;
    match outcome.stop {
        SuperviseStop::CleanExit => {
            info!(launches = outcome.launches, "stopped after clean exit");
            Ok(exit_codes::OK)
        }
        SuperviseStop::Observer => Ok(exit_codes::OK),
    }
}

fn cmd_check(target: &TargetArgs, json: bool) -> Result<i32> {
    let config = target.resolve()?;
    let report = check_config(&config)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize check report")?
        );
    } else {
        println!("check: program={}", report.program.display());
        match &report.program_status {
            ProgramStatus::Found(path) => println!("check: program_path={}", path.display()),
            ProgramStatus::NotFound => println!("check: program_path=(not found)"),
        }
        println!("check: args={:?}", report.args);
        println!("check: workdir={}", report.workdir.display());
        println!(
            "check: restart_delay_ms={} stop_on_clean_exit={}",
            report.restart_delay_ms, report.stop_on_clean_exit
        );
    }
    match report.program_status {
        ProgramStatus::Found(_) => Ok(exit_codes::OK),
        ProgramStatus::NotFound => Ok(exit_codes::LAUNCH_FAILED),
    }
}

fn cmd_init(target: &TargetArgs, force: bool) -> Result<i32> {
    let path: &Path = &target.config;
    if !force && path.exists() {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let config = apply_overrides(WatchdogConfig::default(), &target.overrides())?;
    write_config(path, &config)?;
    println!("init: wrote {}", path.display());
    Ok(exit_codes::OK)
}
