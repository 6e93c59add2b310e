//! CLI tests for `watchdog init` and `watchdog check`.

use std::process::Command;

use watchdog::exit_codes;
use watchdog::io::config::load_config;

fn write_program(path: &std::path::Path, mode: u32) {
    std::fs::write(path, "#!/bin/sh\n").expect("write program");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).expect("chmod");
    }
    #[cfg(not(unix))]
    let _ = mode;
}

#[test]
fn init_writes_config_that_check_accepts() {
    let temp = tempfile::tempdir().expect("tempdir");
    let program = temp.path().join("gui");
    write_program(&program, 0o755);

    let status = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .arg("init")
        .arg("--program")
        .arg(&program)
        .status()
        .expect("watchdog init");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let cfg = load_config(&temp.path().join("watchdog.toml")).expect("load");
    assert_eq!(cfg.program, program);
    assert!(cfg.args.is_empty());
    assert_eq!(cfg.restart_delay_ms, 2000);

    let output = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .arg("check")
        .arg("--json")
        .output()
        .expect("watchdog check");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["program_status"]["status"], "found");
    assert_eq!(report["restart_delay_ms"], 2000);
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let temp = tempfile::tempdir().expect("tempdir");
    std::fs::write(temp.path().join("watchdog.toml"), "program = \"a\"\n").expect("write");

    let status = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .args(["init", "--program", "b"])
        .status()
        .expect("watchdog init");
    assert_eq!(status.code(), Some(exit_codes::INVALID));

    let status = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .args(["init", "--force", "--program", "b"])
        .status()
        .expect("watchdog init --force");
    assert_eq!(status.code(), Some(exit_codes::OK));
    let cfg = load_config(&temp.path().join("watchdog.toml")).expect("load");
    assert_eq!(cfg.program, std::path::PathBuf::from("b"));
}

#[test]
fn check_reports_missing_program() {
    let temp = tempfile::tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .arg("check")
        .arg("--program")
        .arg(temp.path().join("missing"))
        .status()
        .expect("watchdog check");
    assert_eq!(status.code(), Some(exit_codes::LAUNCH_FAILED));
}

#[test]
fn check_without_program_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .arg("check")
        .status()
        .expect("watchdog check");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[cfg(unix)]
#[test]
fn check_rejects_program_without_execute_bit() {
    let temp = tempfile::tempdir().expect("tempdir");
    let program = temp.path().join("gui");
    write_program(&program, 0o644);

    let output = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .arg("check")
        .arg("--json")
        .arg("--program")
        .arg(&program)
        .output()
        .expect("watchdog check");
    assert_eq!(output.status.code(), Some(exit_codes::LAUNCH_FAILED));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["program_status"]["status"], "not_found");

    // `run` agrees: the same program fails to launch.
    let status = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .arg("run")
        .arg("--program")
        .arg(&program)
        .status()
        .expect("watchdog run");
    assert_eq!(status.code(), Some(exit_codes::LAUNCH_FAILED));
}

#[test]
fn relative_workdir_in_config_follows_the_config_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let etc = temp.path().join("etc");
    std::fs::create_dir_all(etc.join("app")).expect("mkdir");
    let config = etc.join("watchdog.toml");
    std::fs::write(&config, "program = \"gui\"\nworkdir = \"app\"\n").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .arg("check")
        .arg("--json")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("watchdog check");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let workdir = etc.join("app").canonicalize().expect("canonicalize");
    assert_eq!(report["workdir"], workdir.to_str().expect("utf8"));
}

#[test]
fn flags_can_undo_config_file_settings() {
    let temp = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        temp.path().join("watchdog.toml"),
        "program = \"gui\"\nargs = [\"--kiosk\"]\nstop_on_clean_exit = true\n",
    )
    .expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_watchdog"))
        .current_dir(temp.path())
        .args([
            "check",
            "--json",
            "--stop-on-clean-exit=false",
            "--clear-args",
        ])
        .output()
        .expect("watchdog check");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["stop_on_clean_exit"], false);
    assert_eq!(report["args"], serde_json::json!([]));
}
