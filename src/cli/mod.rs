//! CLI command handling
//!
//! Dispatches CLI commands to the runner and formats output.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::ledger::MemoryNetwork;
use crate::steps::CATALOG;
use crate::testing::{self, RunOptions, Runner};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            paths,
            config,
            tags,
            fail_fast,
        } => {
            let config = Arc::new(load_config(config.as_deref())?);
            let features = testing::load_features(&paths)?;
            let network = MemoryNetwork::from_config(&config)?;

            let options = RunOptions { tags, fail_fast };
            let summary = Runner::new(Arc::new(network), Arc::clone(&config), options)
                .run(features)
                .await;

            if summary.success() {
                Ok(())
            } else {
                Err(Error::ScenariosFailed {
                    failed: summary.total() - summary.passed,
                    total: summary.total(),
                })
            }
        }

        Commands::Check { paths } => {
            let features = testing::load_features(&paths)?;
            let issues = testing::check(&features);

            if issues.is_empty() {
                println!(
                    "{} {} features, {} scenarios, all steps defined",
                    "✓".green(),
                    features.len(),
                    testing::scenario_count(&features)
                );
                return Ok(());
            }

            for issue in &issues {
                println!("{} {}:{}", "✗".red(), issue.path, issue.line);
                println!("    {}", issue.error);
            }
            Err(Error::UnresolvedSteps(issues.len()))
        }

        Commands::Steps { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(CATALOG)?);
                return Ok(());
            }

            for entry in CATALOG {
                println!(
                    "{:<12} {}",
                    entry.keywords.join("/").cyan(),
                    entry.pattern
                );
            }
            Ok(())
        }
    }
}

/// Explicit config file, or the default location
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if config.accounts.is_empty() {
        tracing::warn!("No accounts configured; account steps will fail");
    }
    Ok(config)
}
