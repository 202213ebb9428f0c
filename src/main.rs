use clap::Parser;
use reefbot::runner::{self, RunnerConfig};
use reefbot::Result;

/// Wraps the external backtester: forwards arguments, echoes its output
/// and parks the generated log at a fixed location
#[derive(Parser)]
#[command(name = "reefbot", about = "Backtest wrapper for the island exchange bot")]
struct Cli {
    /// Arguments forwarded verbatim to the backtester; defaults to
    /// "1 --merge-pnl --vis" when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config = RunnerConfig::from_env();
    runner::run(&config, &cli.args)?;

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter("reefbot=info")
        .with_writer(std::io::stderr)
        .init();
}
