//! Error types for ledger scenarios
//!
//! Error messages are written to be read in a failing scenario report,
//! with hints on which step is missing when scenario state is undefined.

use std::io;
use thiserror::Error;

use crate::ledger::{Status, TransactionId};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ledger-steps
#[derive(Error, Debug)]
pub enum Error {
    // === Scenario State Errors ===
    #[error("No token has been created in this scenario. Add a token creation step first")]
    NoTokenCreated,

    #[error("No transaction is pending. Add a step that creates the transaction before submitting it")]
    NoPendingTransaction,

    #[error("No transaction has been submitted in this scenario")]
    NoSubmittedTransaction,

    #[error("No operator is set on the ledger client")]
    NoOperator,

    #[error("No ledger client is attached to this scenario")]
    NoClient,

    #[error("Account '{role}' maps to index {index}, but only {available} accounts are configured")]
    AccountNotConfigured {
        role: String,
        index: usize,
        available: usize,
    },

    // === Ledger Errors ===
    #[error("Rejected at precheck with status {status}{}", fmt_tx(.transaction_id))]
    Precheck {
        status: Status,
        transaction_id: Option<TransactionId>,
    },

    #[error("Receipt for transaction {transaction_id} has status {status}")]
    ReceiptStatus {
        status: Status,
        transaction_id: TransactionId,
    },

    #[error("Receipt for transaction {0} carries no token id")]
    ReceiptMissingTokenId(TransactionId),

    #[error("Account {account} has no relationship with token {token}")]
    NoTokenRelationship { account: String, token: String },

    #[error("Transfer of token {token} does not balance: net amount is {net}")]
    UnbalancedTransfer { token: String, net: i64 },

    #[error("Amount {amount} overflows at {decimals} decimals")]
    AmountOverflow { amount: u64, decimals: u32 },

    #[error("Invalid entity id '{0}': expected shard.realm.num")]
    InvalidEntityId(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    // === Step Errors ===
    #[error("Undefined step: {0}")]
    UndefinedStep(String),

    #[error("Ambiguous step '{text}' matches: {patterns}")]
    AmbiguousStep { text: String, patterns: String },

    #[error("Expected {0} to fail, but it succeeded")]
    ExpectedFailureNotObserved(String),

    // === Run Errors ===
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    #[error("{0} steps cannot be resolved")]
    UnresolvedSteps(usize),

    // === Timeout Errors ===
    #[error("Step timed out after {0} seconds")]
    StepTimeout(u64),

    // === Scenario File Errors ===
    #[error("Failed to parse '{path}': {message}")]
    FeatureParse { path: String, message: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

fn fmt_tx(id: &Option<TransactionId>) -> String {
    match id {
        Some(id) => format!(" (transaction {})", id),
        None => String::new(),
    }
}

impl Error {
    /// Create a precheck error for a query (no transaction id)
    pub fn precheck(status: Status) -> Self {
        Self::Precheck {
            status,
            transaction_id: None,
        }
    }

    /// Create a precheck error for a submitted transaction
    pub fn precheck_tx(status: Status, transaction_id: &TransactionId) -> Self {
        Self::Precheck {
            status,
            transaction_id: Some(transaction_id.clone()),
        }
    }

    /// Create a missing token relationship error
    pub fn no_relationship(account: impl ToString, token: impl ToString) -> Self {
        Self::NoTokenRelationship {
            account: account.to_string(),
            token: token.to_string(),
        }
    }

    /// Create a feature parse error
    pub fn feature_parse(path: &std::path::Path, message: impl ToString) -> Self {
        Self::FeatureParse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Ledger status carried by this error, if the ledger rejected the operation
    pub fn ledger_status(&self) -> Option<Status> {
        match self {
            Error::Precheck { status, .. } | Error::ReceiptStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
