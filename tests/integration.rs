//! End-to-end integration tests for ledger-steps
//!
//! These tests verify the complete scenario workflow by:
//! 1. Running the bundled features through the library against the
//!    in-memory network
//! 2. Driving step functions directly to check scenario state handling
//! 3. Running the built binary for the CLI surface

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use ledger_steps::common::config::{Config, Role};
use ledger_steps::ledger::{Status, TokenId};
use ledger_steps::steps::{account, token, transfer};
use ledger_steps::testing::{self, load_feature, RunOptions, Runner, ScenarioContext};
use ledger_steps::{Error, MemoryNetwork};

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn example_config_path() -> PathBuf {
    manifest_dir().join("features").join("ledger-steps.example.toml")
}

fn fixtures_dir() -> PathBuf {
    manifest_dir().join("tests").join("fixtures")
}

/// Shared network and config for one test
struct TestContext {
    network: Arc<MemoryNetwork>,
    config: Arc<Config>,
}

impl TestContext {
    fn new() -> Self {
        let config = Config::load_from(&example_config_path()).expect("example config");
        Self::with_config(config)
    }

    fn with_config(config: Config) -> Self {
        let config = Arc::new(config);
        let network = MemoryNetwork::from_config(&config).expect("network");
        Self { network, config }
    }

    fn scenario(&self) -> ScenarioContext {
        ScenarioContext::with_client(Box::new(self.network.connect()), Arc::clone(&self.config))
    }

    fn runner(&self) -> Runner {
        Runner::new(
            Arc::new(Arc::clone(&self.network)),
            Arc::clone(&self.config),
            RunOptions::default(),
        )
    }
}

// ============== Library Tests ==============

#[tokio::test]
async fn test_bundled_features_pass() {
    let tc = TestContext::new();
    let features = testing::load_features(&[manifest_dir().join("features")]).unwrap();
    assert_eq!(features.len(), 1);
    // Outline expands into two scenarios
    assert_eq!(testing::scenario_count(&features), 7);

    let summary = tc.runner().run(features).await;
    assert!(summary.success(), "{:?}", summary);
    assert_eq!(summary.passed, 7);
}

#[tokio::test]
async fn test_yaml_fixture_passes() {
    let tc = TestContext::new();
    let feature = load_feature(&fixtures_dir().join("mint.yaml")).unwrap();
    assert_eq!(feature.scenarios[0].tags, vec!["mint"]);

    let summary = tc.runner().run(vec![feature]).await;
    assert!(summary.success(), "{:?}", summary);
    assert_eq!(summary.steps_passed, 6);
}

#[tokio::test]
async fn test_failing_fixture_reports_each_failure() {
    let tc = TestContext::new();
    let feature = load_feature(&fixtures_dir().join("failing.feature")).unwrap();
    let summary = tc.runner().run(vec![feature]).await;

    assert_eq!(summary.failed, 3);
    assert_eq!(summary.steps_passed, 5);
    // The step after the mint failure never runs
    assert_eq!(summary.steps_failed, 3);
}

#[tokio::test]
async fn test_token_ids_unique_across_scenarios() {
    let tc = TestContext::new();
    let mut ids: Vec<TokenId> = Vec::new();

    for (name, symbol, supply) in [
        ("Test Token", "HTT", None),
        ("Test Token", "HTT", Some(1000)),
        ("Other Token", "OTT", None),
    ] {
        let mut ctx = tc.scenario();
        account::first_account_with_hbar(&mut ctx, 10).await.unwrap();
        token::create_token(&mut ctx, name, symbol, supply).await.unwrap();
        ids.push(ctx.token().unwrap().id);
    }

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[tokio::test]
async fn test_undefined_state_fails_distinctly() {
    let tc = TestContext::new();
    let mut ctx = tc.scenario();

    assert!(matches!(
        token::token_has_decimals(&mut ctx, 2).await,
        Err(Error::NoTokenCreated)
    ));
    assert!(matches!(
        transfer::paid_fee(&mut ctx, Role::First).await,
        Err(Error::NoSubmittedTransaction)
    ));
    assert!(matches!(
        token::create_token(&mut ctx, "Test Token", "HTT", None).await,
        Err(Error::NoOperator)
    ));
}

#[tokio::test]
async fn test_mint_fails_only_on_mint_rejection() {
    let tc = TestContext::new();
    let mut ctx = tc.scenario();
    account::first_account_with_hbar(&mut ctx, 10).await.unwrap();
    token::create_token(&mut ctx, "Test Token", "HTT", Some(1000))
        .await
        .unwrap();
    // No supply key: the ledger refuses the mint itself
    token::mint_fails(&mut ctx).await.unwrap();

    let mut ctx = tc.scenario();
    account::first_account_with_hbar(&mut ctx, 10).await.unwrap();
    token::create_token(&mut ctx, "Test Token", "HTT", None)
        .await
        .unwrap();
    assert!(matches!(
        token::mint_fails(&mut ctx).await,
        Err(Error::ExpectedFailureNotObserved(_))
    ));
}

#[tokio::test]
async fn test_mint_fails_propagates_payer_precheck() {
    // 20 hbar accounts, 15 hbar fee: creation leaves too little for the mint
    let toml = fs::read_to_string(example_config_path())
        .unwrap()
        .replace("hbar = 1000", "hbar = 20")
        .replace(
            "transaction_fee_tinybars = 5000000",
            "transaction_fee_tinybars = 1500000000",
        );
    let tc = TestContext::with_config(Config::parse(&toml).unwrap());
    let mut ctx = tc.scenario();
    account::first_account_with_hbar(&mut ctx, 10).await.unwrap();
    token::create_token(&mut ctx, "Test Token", "HTT", Some(1000))
        .await
        .unwrap();

    match token::mint_fails(&mut ctx).await {
        Err(Error::Precheck { status, .. }) => {
            assert_eq!(status, Status::InsufficientPayerBalance)
        }
        other => panic!("Expected a payer precheck, got {:?}", other),
    }
}

#[tokio::test]
async fn test_second_submit_needs_a_new_transaction() {
    let tc = TestContext::new();
    let mut ctx = tc.scenario();
    account::first_account_with_hbar(&mut ctx, 10).await.unwrap();
    token::create_token(&mut ctx, "Test Token", "HTT", Some(1000))
        .await
        .unwrap();
    account::associate_account(&mut ctx, Role::Second).await.unwrap();
    transfer::build_transfer(&mut ctx, Role::First, 10, "HTT", Role::Second)
        .await
        .unwrap();
    transfer::submit_transaction(&mut ctx, Role::First).await.unwrap();

    assert!(matches!(
        transfer::submit_transaction(&mut ctx, Role::First).await,
        Err(Error::NoPendingTransaction)
    ));
    account::account_holds(&mut ctx, Role::Second, 10, "HTT")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_association_is_not_repeatable() {
    let tc = TestContext::new();
    let mut ctx = tc.scenario();
    account::first_account_with_hbar(&mut ctx, 10).await.unwrap();
    token::create_token(&mut ctx, "Test Token", "HTT", None)
        .await
        .unwrap();
    account::associate_account(&mut ctx, Role::Third).await.unwrap();

    match account::associate_account(&mut ctx, Role::Third).await {
        Err(Error::ReceiptStatus { status, .. }) => {
            assert_eq!(status.as_str(), "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT")
        }
        other => panic!("Expected ReceiptStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transfer_steps_check_symbol_and_sum() {
    let tc = TestContext::new();
    let mut ctx = tc.scenario();
    account::first_account_with_hbar(&mut ctx, 10).await.unwrap();
    token::create_token(&mut ctx, "Test Token", "HTT", Some(5))
        .await
        .unwrap();

    assert!(matches!(
        transfer::build_transfer(&mut ctx, Role::First, 1, "ABC", Role::Second).await,
        Err(Error::TestAssertion(_))
    ));

    assert!(matches!(
        transfer::build_distribution(&mut ctx, 10, 5, 10, ["HTT"; 3]).await,
        Err(Error::UnbalancedTransfer { net: -500, .. })
    ));
    assert!(ctx.pending().is_none());
}

// ============== CLI Tests ==============

/// Output from a CLI invocation
#[derive(Debug)]
struct CliOutput {
    stdout: String,
    stderr: String,
    success: bool,
    code: Option<i32>,
}

fn run_cli(args: &[&str], config_home: &Path) -> CliOutput {
    let output = Command::new(env!("CARGO_BIN_EXE_ledger-steps"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run ledger-steps");

    CliOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
        code: output.status.code(),
    }
}

#[test]
fn test_cli_run_bundled_features() {
    let home = tempfile::tempdir().unwrap();
    let config = example_config_path();
    let features = manifest_dir().join("features");

    let output = run_cli(
        &[
            "run",
            features.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
        home.path(),
    );
    assert!(
        output.success,
        "run failed:\nstdout: {}\nstderr: {}",
        output.stdout, output.stderr
    );
    assert!(output.stdout.contains("(7 passed)"), "{}", output.stdout);
}

#[test]
fn test_cli_run_exit_code() {
    let home = tempfile::tempdir().unwrap();
    let config = example_config_path();
    let failing = fixtures_dir().join("failing.feature");

    let output = run_cli(
        &[
            "run",
            failing.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
        home.path(),
    );
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("3 of 3 scenarios failed"));
}

#[test]
fn test_cli_tag_filter() {
    let home = tempfile::tempdir().unwrap();
    let config = example_config_path();
    let features = manifest_dir().join("features");

    let output = run_cli(
        &[
            "run",
            features.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--tags",
            "mint",
        ],
        home.path(),
    );
    assert!(output.success, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("(2 passed)"), "{}", output.stdout);
}

#[test]
fn test_cli_config_from_default_location() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join("ledger-steps");
    fs::create_dir_all(&config_dir).unwrap();
    fs::copy(example_config_path(), config_dir.join("config.toml")).unwrap();

    let scenario = home.path().join("one.yaml");
    fs::write(
        &scenario,
        "name: Operator\nsteps:\n  - Given A Hedera account with more than 999 hbar\n",
    )
    .unwrap();

    let output = run_cli(&["run", scenario.to_str().unwrap()], home.path());
    // XDG_CONFIG_HOME is only honoured on Linux
    if cfg!(target_os = "linux") {
        assert!(output.success, "stderr: {}", output.stderr);
    }
}

#[test]
fn test_cli_invalid_config() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("bad.toml");
    fs::write(
        &config,
        "[[accounts]]\nid = \"not-an-id\"\nprivate_key = \"00\"\n",
    )
    .unwrap();
    let features = manifest_dir().join("features");

    let output = run_cli(
        &[
            "run",
            features.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
        home.path(),
    );
    assert!(!output.success);
    assert!(output.stderr.contains("Invalid configuration file"));
}

#[test]
fn test_cli_check() {
    let home = tempfile::tempdir().unwrap();

    let ok = run_cli(
        &["check", manifest_dir().join("features").to_str().unwrap()],
        home.path(),
    );
    assert!(ok.success, "stdout: {}", ok.stdout);
    assert!(ok.stdout.contains("7 scenarios, all steps defined"));

    let undefined = fixtures_dir().join("undefined.feature");
    let bad = run_cli(&["check", undefined.to_str().unwrap()], home.path());
    assert!(!bad.success);
    assert!(bad.stdout.contains("Undefined step: I create a tokn named Test Token (HTT)"));
    assert!(bad.stderr.contains("1 steps cannot be resolved"));
}

#[test]
fn test_cli_steps_listing() {
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(&["steps", "--json"], home.path());
    assert!(output.success);

    let listing: Vec<serde_json::Value> = serde_json::from_str(&output.stdout).unwrap();
    assert!(listing
        .iter()
        .any(|d| d["pattern"] == r"^The token has (\d+) decimals$" && d["keywords"][0] == "then"));
}
