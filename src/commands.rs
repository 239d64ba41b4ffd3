//! CLI command definitions
//!
//! Defines the clap commands for the ledger-steps CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios against the in-memory ledger
    Run {
        /// Scenario files or directories (searched recursively)
        #[arg(default_value = "features")]
        paths: Vec<PathBuf>,

        /// Account configuration file (default: platform config directory)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Only run scenarios with this tag; can be repeated
        #[arg(long = "tags", short = 't')]
        tags: Vec<String>,

        /// Stop after the first failing scenario
        #[arg(long)]
        fail_fast: bool,
    },

    /// Parse scenario files and report steps with no single definition
    Check {
        /// Scenario files or directories (searched recursively)
        #[arg(default_value = "features")]
        paths: Vec<PathBuf>,
    },

    /// List the step patterns and the keywords they answer to
    Steps {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
