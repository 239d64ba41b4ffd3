//! ledger-steps - behavior-driven scenarios for a token ledger
//!
//! Step definitions for token creation, minting, association and
//! transfers, a Gherkin/YAML scenario runner, and an in-memory ledger
//! network the steps run against.

pub mod cli;
pub mod commands;
pub mod common;
pub mod ledger;
pub mod steps;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use ledger::{ClientFactory, LedgerClient, MemoryNetwork};
pub use steps::CATALOG;
pub use testing::{RunOptions, RunSummary, Runner, ScenarioContext};
