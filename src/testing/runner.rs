//! Test runner implementation
//!
//! Drives cucumber over preloaded features. Each scenario gets a fresh
//! [`ScenarioContext`] attached to a new client from the factory; cucumber
//! runs the steps, skips the rest of a scenario after a failure and
//! prints the report.

use std::sync::Arc;

use cucumber::gherkin;
use cucumber::writer::Stats as _;
use cucumber::World as _;
use serde::Serialize;

use crate::common::config::Config;
use crate::common::Error;
use crate::ledger::ClientFactory;

use super::context::ScenarioContext;
use super::feature::Preloaded;

/// Options for a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only run scenarios carrying one of these tags (all when empty)
    pub tags: Vec<String>,
    /// Stop after the first failing scenario
    pub fail_fast: bool,
}

/// Counts reported by cucumber at the end of a run
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    /// Scenarios stopped by a step with no definition
    pub skipped: usize,
    pub steps_passed: usize,
    pub steps_failed: usize,
    pub steps_skipped: usize,
    pub parsing_errors: usize,
    pub hook_errors: usize,
}

impl RunSummary {
    /// Every selected scenario passed
    pub fn success(&self) -> bool {
        self.failed == 0 && self.skipped == 0 && self.parsing_errors == 0 && self.hook_errors == 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// Step that would fail to resolve, found without running anything
#[derive(Debug, Clone, Serialize)]
pub struct StepIssue {
    pub path: String,
    pub line: usize,
    pub text: String,
    pub error: String,
}

/// Resolve every step against the registered definitions without running it
///
/// Reports undefined and ambiguous steps; an empty result means every
/// scenario can be dispatched.
pub fn check(features: &[gherkin::Feature]) -> Vec<StepIssue> {
    let collection = ScenarioContext::collection();
    let mut issues: Vec<StepIssue> = Vec::new();

    for feature in features {
        let path = feature
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| feature.name.clone());

        let backgrounds = feature
            .background
            .iter()
            .chain(feature.rules.iter().filter_map(|r| r.background.as_ref()))
            .flat_map(|b| b.steps.iter());
        let scenarios = feature
            .scenarios
            .iter()
            .chain(feature.rules.iter().flat_map(|r| r.scenarios.iter()))
            .flat_map(|s| s.steps.iter());

        for step in backgrounds.chain(scenarios) {
            let error = match collection.find(step) {
                Ok(Some(_)) => continue,
                Ok(None) => Error::UndefinedStep(step.value.clone()),
                Err(e) => Error::AmbiguousStep {
                    text: step.value.clone(),
                    patterns: format!("{:?}", e),
                },
            };
            let line = step.position.line;
            // Expanded outline rows repeat steps without placeholders
            let duplicate = issues
                .iter()
                .any(|i| i.path == path && i.line == line && i.text == step.value);
            if !duplicate {
                issues.push(StepIssue {
                    path: path.clone(),
                    line,
                    text: step.value.clone(),
                    error: error.to_string(),
                });
            }
        }
    }
    issues
}

/// Whether any wanted tag is on the scenario, its rule or its feature
///
/// Tags are compared without their leading `@`. An empty filter selects
/// every scenario.
fn selected(
    wanted: &[String],
    feature: &gherkin::Feature,
    rule: Option<&gherkin::Rule>,
    scenario: &gherkin::Scenario,
) -> bool {
    if wanted.is_empty() {
        return true;
    }
    let tags: Vec<&str> = feature
        .tags
        .iter()
        .chain(rule.into_iter().flat_map(|r| r.tags.iter()))
        .chain(scenario.tags.iter())
        .map(|t| t.trim_start_matches('@'))
        .collect();
    wanted
        .iter()
        .any(|w| tags.contains(&w.trim_start_matches('@')))
}

/// Executes scenarios against ledger clients from a factory
pub struct Runner {
    factory: Arc<dyn ClientFactory>,
    config: Arc<Config>,
    options: RunOptions,
}

impl Runner {
    pub fn new(factory: Arc<dyn ClientFactory>, config: Arc<Config>, options: RunOptions) -> Self {
        Self {
            factory,
            config,
            options,
        }
    }

    /// Run every selected scenario, one at a time, in file order
    pub async fn run(&self, features: Vec<gherkin::Feature>) -> RunSummary {
        let factory = Arc::clone(&self.factory);
        let config = Arc::clone(&self.config);
        let tags = self.options.tags.clone();

        let cucumber = ScenarioContext::cucumber::<std::path::PathBuf>()
            .with_parser(Preloaded)
            .max_concurrent_scenarios(1)
            .before(move |feature, _rule, scenario, ctx| {
                tracing::info!(feature = %feature.name, scenario = %scenario.name, "Scenario started");
                ctx.attach(factory.client(), Arc::clone(&config));
                Box::pin(async {})
            });
        let cucumber = if self.options.fail_fast {
            cucumber.fail_fast()
        } else {
            cucumber
        };

        let writer = cucumber
            .with_default_cli()
            .filter_run(features, move |feature, rule, scenario| {
                selected(&tags, feature, rule, scenario)
            })
            .await;

        let scenarios = writer.scenarios_stats();
        let steps = writer.steps_stats();
        let summary = RunSummary {
            passed: scenarios.passed,
            failed: scenarios.failed,
            skipped: scenarios.skipped,
            steps_passed: steps.passed,
            steps_failed: steps.failed,
            steps_skipped: steps.skipped,
            parsing_errors: writer.parsing_errors(),
            hook_errors: writer.hook_errors(),
        };
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Run finished"
        );
        summary
    }
}
