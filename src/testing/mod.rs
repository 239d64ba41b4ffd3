//! Scenario runner
//!
//! Loads Gherkin and YAML scenario files and runs them through cucumber
//! against a ledger client, one fresh [`ScenarioContext`] per scenario.

mod config;
mod context;
mod feature;
mod runner;

pub use config::{load_yaml_feature, TestScenario};
pub use context::{CreatedToken, ScenarioContext};
pub use feature::{
    collect_files, load_feature, load_features, parse_feature, scenario_count, Preloaded,
};
pub use runner::{check, RunOptions, RunSummary, Runner, StepIssue};
