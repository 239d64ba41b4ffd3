//! Per-scenario state
//!
//! [`ScenarioContext`] is the cucumber world. Every scenario gets its own
//! context: its own client handle and empty slots for the created token,
//! the pending transaction and the last submission. Nothing carries over
//! from one scenario to the next.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cucumber::World;

use crate::common::config::{AccountConfig, Config, Role};
use crate::common::{Error, Result};
use crate::ledger::{
    AccountId, LedgerClient, PublicKey, Receipt, TokenId, Transaction, TransactionResponse,
};

/// Token created earlier in the scenario
#[derive(Debug, Clone)]
pub struct CreatedToken {
    pub id: TokenId,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    /// Account that created the token and holds its supply
    pub treasury: AccountId,
    /// Key of the creating account, set as the token's admin key
    pub admin_key: PublicKey,
}

impl CreatedToken {
    /// Whole tokens to raw units
    pub fn to_raw(&self, amount: u64) -> Result<u64> {
        10u64
            .checked_pow(self.decimals)
            .and_then(|scale| amount.checked_mul(scale))
            .ok_or(Error::AmountOverflow {
                amount,
                decimals: self.decimals,
            })
    }

    /// Whole tokens to raw units, for transfer legs
    pub fn to_raw_signed(&self, amount: u64) -> Result<i64> {
        let raw = self.to_raw(amount)?;
        i64::try_from(raw).map_err(|_| Error::AmountOverflow {
            amount,
            decimals: self.decimals,
        })
    }

    /// Raw units rendered in whole tokens, e.g. `1000` or `10.5`
    pub fn format_raw(&self, raw: u64) -> String {
        let scale = match 10u64.checked_pow(self.decimals) {
            Some(scale) => scale,
            None => return raw.to_string(),
        };
        let whole = raw / scale;
        let frac = raw % scale;
        if frac == 0 {
            whole.to_string()
        } else {
            let digits = format!("{:0width$}", frac, width = self.decimals as usize);
            format!("{}.{}", whole, digits.trim_end_matches('0'))
        }
    }

    /// Check a symbol captured from step text against this token
    pub fn ensure_symbol(&self, symbol: &str) -> Result<()> {
        if symbol == self.symbol {
            Ok(())
        } else {
            Err(Error::TestAssertion(format!(
                "Step refers to {} tokens, but the scenario's token is {}",
                symbol, self.symbol
            )))
        }
    }
}

/// State shared by the steps of one scenario
///
/// Created empty by the runner and attached to a client from the
/// scenario's `before` hook.
#[derive(World)]
pub struct ScenarioContext {
    client: Option<Box<dyn LedgerClient>>,
    config: Arc<Config>,
    token: Option<CreatedToken>,
    pending: Option<Transaction>,
    last_submission: Option<TransactionResponse>,
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self {
            client: None,
            config: Arc::new(Config::default()),
            token: None,
            pending: None,
            last_submission: None,
        }
    }
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = self
            .client
            .as_ref()
            .and_then(|c| c.operator())
            .map(|o| o.account_id);
        f.debug_struct("ScenarioContext")
            .field("operator", &operator)
            .field("token", &self.token.as_ref().map(|t| t.id))
            .field("pending", &self.pending.as_ref().map(|t| t.body().kind()))
            .field("last_submission", &self.last_submission)
            .finish_non_exhaustive()
    }
}

impl ScenarioContext {
    /// Context already attached to a client
    pub fn with_client(client: Box<dyn LedgerClient>, config: Arc<Config>) -> Self {
        let mut ctx = Self::default();
        ctx.attach(client, config);
        ctx
    }

    /// Bind the scenario to a fresh client, clearing every slot
    pub fn attach(&mut self, client: Box<dyn LedgerClient>, config: Arc<Config>) {
        *self = Self {
            client: Some(client),
            config,
            ..Self::default()
        };
    }

    pub fn client(&self) -> Result<&dyn LedgerClient> {
        self.client.as_deref().ok_or(Error::NoClient)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ceiling for a single step
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeouts.step_secs)
    }

    /// Account configured for a role
    pub fn account(&self, role: Role) -> Result<AccountConfig> {
        self.config.account(role).cloned()
    }

    /// Make the role's account the client operator, replacing the previous one
    pub fn use_operator(&mut self, role: Role) -> Result<AccountConfig> {
        let account = self.account(role)?;
        let client = self.client.as_mut().ok_or(Error::NoClient)?;
        if let Some(previous) = client.operator() {
            if previous.account_id != account.id {
                tracing::debug!(from = %previous.account_id, to = %account.id, "Replacing operator");
            }
        }
        client.set_operator(account.operator());
        tracing::info!(role = %role, account = %account.id, "Operator set");
        Ok(account)
    }

    /// Token created earlier in this scenario
    pub fn token(&self) -> Result<&CreatedToken> {
        self.token.as_ref().ok_or(Error::NoTokenCreated)
    }

    pub fn set_token(&mut self, token: CreatedToken) {
        tracing::info!(token = %token.id, name = %token.name, symbol = %token.symbol, "Token created");
        self.token = Some(token);
    }

    /// Hold a transaction for a later submit step
    ///
    /// A transaction that is still pending is discarded.
    pub fn stage(&mut self, transaction: Transaction) {
        if let Some(previous) = self.pending.replace(transaction) {
            tracing::warn!(
                kind = previous.body().kind(),
                "Discarding pending transaction that was never submitted"
            );
        }
    }

    pub fn pending(&self) -> Option<&Transaction> {
        self.pending.as_ref()
    }

    /// Remove and return the pending transaction
    pub fn take_pending(&mut self) -> Result<Transaction> {
        self.pending.take().ok_or(Error::NoPendingTransaction)
    }

    /// Most recent submission in this scenario
    pub fn last_submission(&self) -> Result<&TransactionResponse> {
        self.last_submission
            .as_ref()
            .ok_or(Error::NoSubmittedTransaction)
    }

    /// Execute a transaction and wait for its receipt
    ///
    /// The receipt is returned whatever its status; use
    /// [`Receipt::ensure_success`] where only success is acceptable.
    pub async fn submit(&mut self, mut transaction: Transaction) -> Result<Receipt> {
        let response = self.client()?.execute(&mut transaction).await?;
        tracing::info!(
            transaction = %response.transaction_id,
            kind = transaction.body().kind(),
            "Transaction submitted"
        );
        self.last_submission = Some(response.clone());

        let receipt = self.client()?.get_receipt(&response).await?;
        tracing::debug!(transaction = %receipt.transaction_id, status = %receipt.status, "Receipt");
        Ok(receipt)
    }
}
