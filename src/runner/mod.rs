use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Arguments used when the caller supplies none: round 1 with merged PnL
/// and a visualizer link
const DEFAULT_ARGS: &[&str] = &["1", "--merge-pnl", "--vis"];

/// How the runner finds the backtester and where it parks the artifact
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Backtester executable
    pub backtester: String,
    /// Algorithm file handed to the backtester as its first argument
    pub algorithm: String,
    /// Fixed destination for the generated log/script file
    pub destination: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            backtester: "prosperity3bt".to_string(),
            algorithm: "auto.py".to_string(),
            destination: PathBuf::from("backtests/output.log"),
        }
    }
}

impl RunnerConfig {
    /// Read overrides from the environment, falling back to the defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backtester: env::var("REEFBOT_BACKTESTER").unwrap_or(defaults.backtester),
            algorithm: env::var("REEFBOT_ALGORITHM").unwrap_or(defaults.algorithm),
            destination: env::var("REEFBOT_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.destination),
        }
    }

    /// Full argument list for the backtester: the algorithm file followed
    /// by the caller's arguments verbatim, or the default set when the
    /// caller supplied none
    pub fn build_args(&self, caller_args: &[String]) -> Vec<String> {
        let mut args = vec![self.algorithm.clone()];
        if caller_args.is_empty() {
            args.extend(DEFAULT_ARGS.iter().map(|s| s.to_string()));
        } else {
            args.extend(caller_args.iter().cloned());
        }
        args
    }
}

/// Artifact path from the backtester's output: the 6th space-delimited
/// field of the last line ("Successfully saved backtest results to
/// <path>"). Empty when the line has fewer fields; the caller's file move
/// surfaces that as a not-found error.
pub fn artifact_path(output: &str) -> &str {
    let last_line = output.lines().last().unwrap_or("");
    last_line.split(' ').nth(5).unwrap_or("")
}

/// Base name of the artifact: directory prefix stripped, then cut at the
/// first period
pub fn artifact_base_name(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}

/// Run the backtester, echo its output and move the artifact into place.
///
/// Blocks until the backtester exits; stdout is captured in full while
/// stderr and the exit code pass through uninspected. Every failure
/// propagates as-is, there is no retry.
pub fn run(config: &RunnerConfig, caller_args: &[String]) -> Result<()> {
    let args = config.build_args(caller_args);
    tracing::debug!("invoking {} {}", config.backtester, args.join(" "));

    let output = Command::new(&config.backtester)
        .args(&args)
        .output()
        .with_context(|| format!("failed to run {}", config.backtester))?;

    // Match shell command substitution: trailing newlines dropped before
    // the output is parsed or echoed
    let captured = String::from_utf8_lossy(&output.stdout);
    let stdout = captured.trim_end_matches('\n');

    let artifact = artifact_path(stdout);
    // The base name is not consumed anywhere yet; surfaced for inspection
    tracing::debug!(
        "artifact {:?} (base name {:?})",
        artifact,
        artifact_base_name(artifact)
    );

    let mut console = io::stdout();
    console.write_all(stdout.as_bytes())?;
    console.write_all(b"\n\n")?;
    writeln!(
        console,
        "Saved logs and script to {}",
        config.destination.display()
    )?;

    move_artifact(artifact, &config.destination).with_context(|| {
        format!(
            "failed to move {:?} to {}",
            artifact,
            config.destination.display()
        )
    })?;

    Ok(())
}

/// Move the artifact into place, overwriting the destination. Rename
/// where possible; when the artifact sits on a different filesystem than
/// the destination (rename fails with EXDEV), copy and remove instead,
/// like `mv` does.
fn move_artifact(source: &str, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_select_round_one_with_pnl_and_vis() {
        let config = RunnerConfig::default();
        assert_eq!(
            config.build_args(&[]),
            vec!["auto.py", "1", "--merge-pnl", "--vis"]
        );
    }

    #[test]
    fn test_caller_args_forwarded_verbatim_in_order() {
        let config = RunnerConfig::default();
        let args = vec!["1-0".to_string(), "--vis".to_string()];
        assert_eq!(config.build_args(&args), vec!["auto.py", "1-0", "--vis"]);
    }

    #[test]
    fn test_artifact_path_is_sixth_field_of_last_line() {
        let output = "Backtesting auto.py\n\
                      Total profit: 1,234\n\
                      Successfully saved backtest results to backtests/round1.log";
        assert_eq!(artifact_path(output), "backtests/round1.log");
    }

    #[test]
    fn test_artifact_path_ignores_extra_fields() {
        let output = "Some tool output text here path/to/artifact_file.log extra";
        assert_eq!(artifact_path(output), "path/to/artifact_file.log");
        assert_eq!(
            artifact_base_name(artifact_path(output)),
            "artifact_file"
        );
    }

    #[test]
    fn test_short_last_line_yields_empty_path() {
        assert_eq!(artifact_path("done"), "");
        assert_eq!(artifact_path("one two three four five"), "");
        assert_eq!(artifact_path(""), "");
    }

    #[test]
    fn test_base_name_strips_directory_and_extensions() {
        assert_eq!(artifact_base_name("path/to/artifact_file.log"), "artifact_file");
        assert_eq!(artifact_base_name("backtests/run.2024.log"), "run");
        assert_eq!(artifact_base_name("plain"), "plain");
        assert_eq!(artifact_base_name(""), "");
    }

    #[test]
    fn test_move_artifact_relocates_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("round1.log");
        let destination = tmp.path().join("output.log");
        std::fs::write(&source, "fresh run").unwrap();
        std::fs::write(&destination, "stale run").unwrap();

        move_artifact(source.to_str().unwrap(), &destination).unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "fresh run");
    }

    #[test]
    fn test_move_artifact_keeps_not_found_for_missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let err = move_artifact("", &tmp.path().join("output.log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_configured_algorithm_leads_the_args() {
        let config = RunnerConfig {
            backtester: "/opt/bt".to_string(),
            algorithm: "algo.py".to_string(),
            destination: PathBuf::from("out/result.log"),
        };
        assert_eq!(config.build_args(&[])[0], "algo.py");
        assert_eq!(
            config.build_args(&["2".to_string()]),
            vec!["algo.py", "2"]
        );
    }
}
