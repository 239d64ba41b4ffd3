//! Ledger client seam
//!
//! Steps talk to the ledger only through [`LedgerClient`]. A real SDK
//! plugs in by implementing it together with a [`ClientFactory`].

use async_trait::async_trait;

use crate::common::{Error, Result};

use super::transaction::Transaction;
use super::types::{
    AccountBalance, AccountId, AccountInfo, Operator, Receipt, TokenId, TokenInfo,
    TransactionResponse,
};

/// Client for one ledger network, acting as one operator at a time
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Replace the operator identity (there is no stack of operators)
    fn set_operator(&mut self, operator: Operator);

    /// Currently configured operator
    fn operator(&self) -> Option<&Operator>;

    /// Query an account's hbar and token balances
    async fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance>;

    /// Query an account's info, including its token relationships
    async fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo>;

    /// Query a token's current info
    async fn token_info(&self, token_id: &TokenId) -> Result<TokenInfo>;

    /// Sign with the operator and submit
    ///
    /// Assigns the transaction id on first execution. Rejections before
    /// consensus are returned as [`Error::Precheck`].
    async fn execute(&self, transaction: &mut Transaction) -> Result<TransactionResponse>;

    /// Wait for the final outcome of a submitted transaction
    ///
    /// A non-success status is returned in the receipt, not as an error.
    async fn get_receipt(&self, response: &TransactionResponse) -> Result<Receipt>;

    /// Operator or `NoOperator`
    fn require_operator(&self) -> Result<&Operator> {
        self.operator().ok_or(Error::NoOperator)
    }
}

/// Produces a fresh client per scenario
pub trait ClientFactory: Send + Sync {
    fn client(&self) -> Box<dyn LedgerClient>;
}
