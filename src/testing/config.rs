//! YAML scenario files
//!
//! A lighter alternative to Gherkin for one-off scenarios:
//!
//! ```yaml
//! name: Mint more tokens
//! description: Supply grows by the minted amount
//! tags: [mint]
//! steps:
//!   - Given A Hedera account with more than 10 hbar
//!   - When I create a token named Test Token (HTT)
//!   - Then An attempt to mint 100 additional tokens succeeds
//! ```
//!
//! Each file becomes a feature with a single scenario.

use serde::Deserialize;
use std::path::Path;

use cucumber::gherkin;

use crate::common::{Error, Result};

use super::feature::parse_feature;

const STEP_KEYWORDS: [&str; 5] = ["Given", "When", "Then", "And", "But"];

/// A test scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct TestScenario {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the test verifies
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Steps, each starting with its keyword
    pub steps: Vec<String>,
}

impl TestScenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!(
                "Failed to parse test scenario '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: TestScenario =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if scenario.steps.is_empty() {
            return Err(Error::Config(format!(
                "Scenario '{}' has no steps",
                scenario.name
            )));
        }
        Ok(scenario)
    }

    /// Render as a single-scenario Gherkin feature
    ///
    /// Every step must start with `Given`, `When`, `Then`, `And` or `But`.
    pub fn to_gherkin(&self) -> Result<String> {
        let mut out = format!("Feature: {}\n", self.name);
        if let Some(description) = &self.description {
            for line in description.lines() {
                out.push_str(&format!("  {}\n", line.trim()));
            }
        }
        out.push('\n');

        if !self.tags.is_empty() {
            let tags: Vec<String> = self
                .tags
                .iter()
                .map(|t| format!("@{}", t.trim_start_matches('@')))
                .collect();
            out.push_str(&format!("  {}\n", tags.join(" ")));
        }
        out.push_str(&format!("  Scenario: {}\n", self.name));

        for raw in &self.steps {
            let step = raw.trim();
            let keyword = STEP_KEYWORDS.iter().find(|kw| {
                step.strip_prefix(**kw)
                    .is_some_and(|rest| rest.starts_with(char::is_whitespace))
            });
            if keyword.is_none() {
                return Err(Error::Config(format!(
                    "Step '{}' of '{}' must start with Given, When, Then, And or But",
                    step, self.name
                )));
            }
            out.push_str(&format!("    {}\n", step));
        }
        Ok(out)
    }
}

/// Read a YAML scenario file as a feature
pub fn load_yaml_feature(path: &Path) -> Result<gherkin::Feature> {
    let scenario = TestScenario::load(path)?;
    let content = scenario.to_gherkin().map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    parse_feature(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINT: &str = r#"
name: Mint more tokens
description: Supply grows by the minted amount
tags: [mint, "@smoke"]
steps:
  - Given A Hedera account with more than 10 hbar
  - When I create a token named Test Token (HTT)
  - And The token has 2 decimals
"#;

    #[test]
    fn test_yaml_scenario_to_feature() {
        let text = TestScenario::parse(MINT).unwrap().to_gherkin().unwrap();
        let feature = parse_feature(Path::new("mint.yaml"), &text).unwrap();
        assert_eq!(feature.name, "Mint more tokens");
        assert_eq!(feature.scenarios.len(), 1);

        let scenario = &feature.scenarios[0];
        assert_eq!(scenario.name, "Mint more tokens");
        assert_eq!(scenario.tags, vec!["mint", "smoke"]);
        assert_eq!(scenario.steps[0].ty, gherkin::StepType::Given);
        assert_eq!(scenario.steps[0].value, "A Hedera account with more than 10 hbar");
        assert_eq!(scenario.steps[2].ty, gherkin::StepType::When);
        assert_eq!(scenario.steps[2].value, "The token has 2 decimals");
    }

    #[test]
    fn test_steps_need_a_keyword() {
        let yaml = "name: Bare\nsteps:\n  - The token has 2 decimals\n";
        match TestScenario::parse(yaml).unwrap().to_gherkin() {
            Err(Error::Config(msg)) => assert!(msg.contains("must start with Given")),
            other => panic!("Expected Config error, got {:?}", other),
        }

        let glued = "name: Glued\nsteps:\n  - GivenA second Hedera account\n";
        assert!(TestScenario::parse(glued).unwrap().to_gherkin().is_err());
    }

    #[test]
    fn test_rejects_empty_and_unknown_fields() {
        assert!(TestScenario::parse("name: Empty\nsteps: []\n").is_err());
        assert!(TestScenario::parse("name: X\nsteps: [a]\ntarget: y\n").is_err());
    }
}
