//! Step definitions
//!
//! Steps are registered with cucumber's `#[given]`, `#[when]` and `#[then]`
//! attributes against [`ScenarioContext`](crate::testing::ScenarioContext).
//! Each registered function is a thin wrapper that applies the step timeout
//! and calls a public async function holding the step's logic, so the logic
//! can also be driven directly.
//!
//! cucumber matches on the keyword as well as the text. Steps used both as
//! setup and as the action under test are registered under both keywords.

pub mod account;
pub mod token;
pub mod transfer;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::common::{Error, Result};

/// Run a step body, failing it with `StepTimeout` once `limit` passes
pub async fn within<F>(limit: Duration, body: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match tokio::time::timeout(limit, body).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(secs = limit.as_secs(), "Step timed out");
            Err(Error::StepTimeout(limit.as_secs()))
        }
    }
}

/// One entry of the step listing
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StepEntry {
    /// Keywords the pattern is registered under
    pub keywords: &'static [&'static str],
    pub pattern: &'static str,
    /// Step text the pattern accepts
    pub example: &'static str,
}

const GIVEN: &[&str] = &["given"];
const THEN: &[&str] = &["then"];
const GIVEN_WHEN: &[&str] = &["given", "when"];
const GIVEN_THEN: &[&str] = &["given", "then"];

/// Every step this crate defines, in registration order
pub const CATALOG: &[StepEntry] = &[
    StepEntry {
        keywords: GIVEN,
        pattern: r"^A (?:Hedera|first hedera) account with more than (\d+) hbar$",
        example: "A Hedera account with more than 10 hbar",
    },
    StepEntry {
        keywords: GIVEN,
        pattern: r"^A second Hedera account$",
        example: "A second Hedera account",
    },
    StepEntry {
        keywords: GIVEN_THEN,
        pattern: r"^The (first|second|third|fourth) account holds (\d+) (\w+) tokens$",
        example: "The first account holds 100 HTT tokens",
    },
    StepEntry {
        keywords: GIVEN_WHEN,
        pattern: r"^The (first|second|third|fourth) account is associated with the token$",
        example: "The third account is associated with the token",
    },
    StepEntry {
        keywords: GIVEN,
        pattern: r"^A first hedera account with more than (\d+) hbar and (\d+) (\w+) tokens$",
        example: "A first hedera account with more than 10 hbar and 900 HTT tokens",
    },
    StepEntry {
        keywords: GIVEN,
        pattern: r"^A (second|third|fourth) Hedera account with (\d+) hbar and (\d+) (\w+) tokens$",
        example: "A fourth Hedera account with 10 hbar and 0 HTT tokens",
    },
    StepEntry {
        keywords: GIVEN_WHEN,
        pattern: r"^I create a token named (.+) \(([^()]+)\)$",
        example: "I create a token named Test Token (HTT)",
    },
    StepEntry {
        keywords: GIVEN_WHEN,
        pattern: r"^I create a fixed supply token named (.+) \(([^()]+)\) with (\d+) tokens$",
        example: "I create a fixed supply token named Test Token (HTT) with 1000 tokens",
    },
    StepEntry {
        keywords: THEN,
        pattern: r#"^The token has the name "([^"]*)"$"#,
        example: r#"The token has the name "Test Token""#,
    },
    StepEntry {
        keywords: THEN,
        pattern: r#"^The token has the symbol "([^"]*)"$"#,
        example: r#"The token has the symbol "HTT""#,
    },
    StepEntry {
        keywords: THEN,
        pattern: r"^The token has (\d+) decimals$",
        example: "The token has 2 decimals",
    },
    StepEntry {
        keywords: THEN,
        pattern: r"^The token is owned by the account$",
        example: "The token is owned by the account",
    },
    StepEntry {
        keywords: THEN,
        pattern: r"^An attempt to mint (\d+) additional tokens succeeds$",
        example: "An attempt to mint 1000 additional tokens succeeds",
    },
    StepEntry {
        keywords: THEN,
        pattern: r"^The total supply of the token is (\d+)$",
        example: "The total supply of the token is 1000",
    },
    StepEntry {
        keywords: THEN,
        pattern: r"^An attempt to mint tokens fails$",
        example: "An attempt to mint tokens fails",
    },
    StepEntry {
        keywords: GIVEN,
        pattern: r"^A token named (.+) \(([^()]+)\) with (\d+) tokens$",
        example: "A token named Test Token (HTT) with 1000 tokens",
    },
    StepEntry {
        keywords: GIVEN_WHEN,
        pattern: r"^The (first|second|third|fourth) account creates a transaction to transfer (\d+) (\w+) tokens to the (first|second|third|fourth) account$",
        example: "The first account creates a transaction to transfer 10 HTT tokens to the second account",
    },
    StepEntry {
        keywords: GIVEN_WHEN,
        pattern: r"^The (first|second|third|fourth) account submits the transaction$",
        example: "The first account submits the transaction",
    },
    StepEntry {
        keywords: THEN,
        pattern: r"^The (first|second|third|fourth) account has paid for the transaction fee$",
        example: "The second account has paid for the transaction fee",
    },
    StepEntry {
        keywords: GIVEN_WHEN,
        pattern: r"^A transaction is created to transfer (\d+) (\w+) tokens out of the first and second account and (\d+) (\w+) tokens into the third account and (\d+) (\w+) tokens into the fourth account$",
        example: "A transaction is created to transfer 10 HTT tokens out of the first and second account and 5 HTT tokens into the third account and 15 HTT tokens into the fourth account",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{parse_feature, ScenarioContext};
    use cucumber::World as _;
    use std::path::Path;

    fn keyword(kind: &str) -> &'static str {
        match kind {
            "given" => "Given",
            "when" => "When",
            _ => "Then",
        }
    }

    #[test]
    fn test_examples_match_their_patterns() {
        for entry in CATALOG {
            let regex = regex::Regex::new(entry.pattern).unwrap();
            assert!(regex.is_match(entry.example), "{}", entry.example);
            let others = CATALOG
                .iter()
                .filter(|e| e.pattern != entry.pattern)
                .filter(|e| regex::Regex::new(e.pattern).unwrap().is_match(entry.example))
                .count();
            assert_eq!(others, 0, "{} matches several patterns", entry.example);
        }
    }

    #[test]
    fn test_every_listed_step_is_registered() {
        let mut content = String::from("Feature: Listing\n");
        for (i, entry) in CATALOG.iter().enumerate() {
            for kind in entry.keywords {
                content.push_str(&format!(
                    "\n  Scenario: {} {}\n    {} {}\n",
                    kind,
                    i,
                    keyword(kind),
                    entry.example
                ));
            }
        }
        let feature = parse_feature(Path::new("listing.feature"), &content).unwrap();
        let collection = ScenarioContext::collection();

        for scenario in &feature.scenarios {
            let step = &scenario.steps[0];
            match collection.find(step) {
                Ok(Some(_)) => {}
                Ok(None) => panic!("'{}' has no definition", scenario.name),
                Err(e) => panic!("'{}' is ambiguous: {:?}", scenario.name, e),
            }
        }
    }

    #[test]
    fn test_keyword_restricts_matching() {
        let content = "Feature: Keywords\n\n  Scenario: Wrong keyword\n    Then A second Hedera account\n";
        let feature = parse_feature(Path::new("keywords.feature"), content).unwrap();
        let step = &feature.scenarios[0].steps[0];
        assert!(matches!(ScenarioContext::collection().find(step), Ok(None)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_within_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok(())
        };
        assert!(matches!(
            within(Duration::from_secs(60), slow).await,
            Err(Error::StepTimeout(60))
        ));

        let quick = async { Err(Error::NoTokenCreated) };
        assert!(matches!(
            within(Duration::from_secs(60), quick).await,
            Err(Error::NoTokenCreated)
        ));
    }
}
