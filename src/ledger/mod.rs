//! Ledger client seam and value types
//!
//! Steps depend only on [`LedgerClient`]; [`MemoryNetwork`] is the
//! bundled implementation used by the CLI and the tests.

pub mod client;
pub mod memory;
pub mod transaction;
pub mod types;

pub use client::{ClientFactory, LedgerClient};
pub use memory::{MemoryClient, MemoryNetwork};
pub use transaction::{
    TokenAssociateTransaction, TokenCreateTransaction, TokenMintTransaction, TokenTransfer,
    Transaction, TransactionBody, TransferTransaction,
};
pub use types::{
    AccountBalance, AccountId, AccountInfo, Hbar, Operator, PrivateKey, PublicKey, Receipt,
    Status, TokenId, TokenInfo, TokenRelationship, TransactionId, TransactionResponse,
    TINYBARS_PER_HBAR,
};
