use reefbot::runner::{self, RunnerConfig};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Stand-in backtester: a shell script printing a fixed transcript
fn write_stub(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake_backtester.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

struct Setup {
    _tmp: TempDir,
    artifact: PathBuf,
    destination: PathBuf,
    config: RunnerConfig,
}

/// Temp workspace with an artifact file, a backtests/ directory and a
/// stub backtester whose last line names the artifact in field six
fn setup(extra_stub_lines: &str) -> Setup {
    let tmp = TempDir::new().unwrap();

    let artifact = tmp.path().join("round1.log");
    fs::write(&artifact, "backtest log contents").unwrap();

    let dest_dir = tmp.path().join("backtests");
    fs::create_dir(&dest_dir).unwrap();
    let destination = dest_dir.join("output.log");

    let stub = write_stub(
        tmp.path(),
        &format!(
            "{extra_stub_lines}echo \"Backtesting round 1\"\n\
             echo \"Successfully saved backtest results to {}\"",
            artifact.display()
        ),
    );

    let config = RunnerConfig {
        backtester: stub.display().to_string(),
        algorithm: "auto.py".to_string(),
        destination: destination.clone(),
    };

    Setup {
        _tmp: tmp,
        artifact,
        destination,
        config,
    }
}

#[test]
fn moves_artifact_to_destination() {
    let s = setup("");

    runner::run(&s.config, &[]).unwrap();

    assert!(!s.artifact.exists(), "artifact should be gone from its source");
    assert_eq!(
        fs::read_to_string(&s.destination).unwrap(),
        "backtest log contents"
    );
}

#[test]
fn overwrites_existing_destination() {
    let s = setup("");
    fs::write(&s.destination, "stale previous run").unwrap();

    runner::run(&s.config, &[]).unwrap();

    assert_eq!(
        fs::read_to_string(&s.destination).unwrap(),
        "backtest log contents"
    );
}

#[test]
fn forwards_default_args_to_the_backtester() {
    let s = setup("printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args.txt\"\n");

    runner::run(&s.config, &[]).unwrap();

    let recorded = fs::read_to_string(s._tmp.path().join("args.txt")).unwrap();
    assert_eq!(recorded, "auto.py\n1\n--merge-pnl\n--vis\n");
}

#[test]
fn forwards_caller_args_verbatim() {
    let s = setup("printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args.txt\"\n");

    let args = vec!["1-0".to_string(), "--vis".to_string()];
    runner::run(&s.config, &args).unwrap();

    let recorded = fs::read_to_string(s._tmp.path().join("args.txt")).unwrap();
    assert_eq!(recorded, "auto.py\n1-0\n--vis\n");
}

#[test]
fn short_last_line_fails_at_the_move_with_not_found() {
    let tmp = TempDir::new().unwrap();
    let stub = write_stub(tmp.path(), "echo \"nothing useful here\"");

    let config = RunnerConfig {
        backtester: stub.display().to_string(),
        algorithm: "auto.py".to_string(),
        destination: tmp.path().join("backtests/output.log"),
    };

    let err = runner::run(&config, &[]).unwrap_err();
    let io_err = err
        .root_cause()
        .downcast_ref::<std::io::Error>()
        .expect("move failure should surface an io error");
    assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn missing_backtester_fails_to_start() {
    let tmp = TempDir::new().unwrap();
    let config = RunnerConfig {
        backtester: tmp.path().join("no_such_tool").display().to_string(),
        algorithm: "auto.py".to_string(),
        destination: tmp.path().join("backtests/output.log"),
    };

    let err = runner::run(&config, &[]).unwrap_err();
    assert!(err.to_string().contains("failed to run"));
}

#[test]
fn binary_echoes_output_blank_line_and_confirmation() {
    let s = setup("");

    let output = Command::new(env!("CARGO_BIN_EXE_reefbot"))
        .env("REEFBOT_BACKTESTER", &s.config.backtester)
        .env("REEFBOT_ALGORITHM", &s.config.algorithm)
        .env("REEFBOT_OUTPUT", &s.destination)
        .output()
        .expect("invoke reefbot");

    assert!(output.status.success(), "runner should exit cleanly");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = format!(
        "Backtesting round 1\n\
         Successfully saved backtest results to {}\n\
         \n\
         Saved logs and script to {}\n",
        s.artifact.display(),
        s.destination.display()
    );
    assert_eq!(stdout, expected);
}

#[test]
fn binary_forwards_trailing_flags() {
    let s = setup("printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args.txt\"\n");

    let status = Command::new(env!("CARGO_BIN_EXE_reefbot"))
        .args(["1-0", "--vis"])
        .env("REEFBOT_BACKTESTER", &s.config.backtester)
        .env("REEFBOT_ALGORITHM", &s.config.algorithm)
        .env("REEFBOT_OUTPUT", &s.destination)
        .status()
        .expect("invoke reefbot");
    assert!(status.success());

    let recorded = fs::read_to_string(s._tmp.path().join("args.txt")).unwrap();
    assert_eq!(recorded, "auto.py\n1-0\n--vis\n");
}
