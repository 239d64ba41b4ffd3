//! ledger-steps - behavior-driven scenarios for a token ledger
//!
//! Runs Gherkin and YAML scenarios that create, mint, associate and
//! transfer tokens against an in-memory ledger network.

use clap::Parser;
use commands::Commands;
use ledger_steps::common::logging;
use ledger_steps::{cli, commands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ledger-steps", about = "Behavior-driven token ledger scenarios")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logs
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Also write logs to a file (default location when no path is given)
    #[arg(long, global = true, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_file = match cli.log_file {
        Some(Some(path)) => Some(path),
        Some(None) => logging::default_log_path(),
        None => None,
    };
    let guard = logging::init_cli(cli.verbose, log_file.as_deref());

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        // exit() skips destructors; flush the log file first
        drop(guard);
        std::process::exit(1);
    }
}
