//! Transaction builders
//!
//! Each builder converts into a [`Transaction`], which is what clients
//! execute. A transaction gets its id on first execution and keeps it, so
//! executing the same object twice is seen by the ledger as a duplicate.

use serde::Serialize;

use super::types::{AccountId, PrivateKey, PublicKey, TokenId, TransactionId};

/// Create a new token
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenCreateTransaction {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub initial_supply: u64,
    pub treasury_account_id: Option<AccountId>,
    pub admin_key: Option<PublicKey>,
    pub supply_key: Option<PublicKey>,
}

impl TokenCreateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn token_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Initial supply in raw units
    pub fn initial_supply(mut self, raw: u64) -> Self {
        self.initial_supply = raw;
        self
    }

    pub fn treasury_account_id(mut self, account_id: AccountId) -> Self {
        self.treasury_account_id = Some(account_id);
        self
    }

    pub fn admin_key(mut self, key: PublicKey) -> Self {
        self.admin_key = Some(key);
        self
    }

    /// Without a supply key the token's supply is fixed
    pub fn supply_key(mut self, key: PublicKey) -> Self {
        self.supply_key = Some(key);
        self
    }
}

/// Mint additional units of a token into its treasury
#[derive(Debug, Clone, Serialize)]
pub struct TokenMintTransaction {
    pub token_id: TokenId,
    /// Raw units
    pub amount: u64,
}

impl TokenMintTransaction {
    pub fn new(token_id: TokenId, amount: u64) -> Self {
        Self { token_id, amount }
    }
}

/// Associate an account with tokens so it can hold them
#[derive(Debug, Clone, Serialize)]
pub struct TokenAssociateTransaction {
    pub account_id: AccountId,
    pub token_ids: Vec<TokenId>,
}

impl TokenAssociateTransaction {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            token_ids: Vec::new(),
        }
    }

    pub fn token_id(mut self, token_id: TokenId) -> Self {
        self.token_ids.push(token_id);
        self
    }
}

/// One leg of a token transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenTransfer {
    pub token_id: TokenId,
    pub account_id: AccountId,
    /// Raw units; negative debits the account
    pub amount: i64,
}

/// Move token units between accounts
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransferTransaction {
    pub token_transfers: Vec<TokenTransfer>,
}

impl TransferTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_transfer(mut self, token_id: TokenId, account_id: AccountId, amount: i64) -> Self {
        self.token_transfers.push(TokenTransfer {
            token_id,
            account_id,
            amount,
        });
        self
    }

    /// Net amount per token; a valid transfer nets to zero for every token
    pub fn net_amounts(&self) -> Vec<(TokenId, i64)> {
        let mut nets: Vec<(TokenId, i64)> = Vec::new();
        for transfer in &self.token_transfers {
            match nets.iter_mut().find(|(id, _)| *id == transfer.token_id) {
                Some((_, net)) => *net = net.saturating_add(transfer.amount),
                None => nets.push((transfer.token_id, transfer.amount)),
            }
        }
        nets
    }
}

/// What a transaction does
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionBody {
    TokenCreate(TokenCreateTransaction),
    TokenMint(TokenMintTransaction),
    TokenAssociate(TokenAssociateTransaction),
    Transfer(TransferTransaction),
}

impl TransactionBody {
    pub fn kind(&self) -> &'static str {
        match self {
            TransactionBody::TokenCreate(_) => "token create",
            TransactionBody::TokenMint(_) => "token mint",
            TransactionBody::TokenAssociate(_) => "token associate",
            TransactionBody::Transfer(_) => "transfer",
        }
    }
}

/// A transaction ready to be executed by a client
#[derive(Debug, Clone)]
pub struct Transaction {
    body: TransactionBody,
    transaction_id: Option<TransactionId>,
    signers: Vec<PrivateKey>,
}

impl Transaction {
    pub fn new(body: TransactionBody) -> Self {
        Self {
            body,
            transaction_id: None,
            signers: Vec::new(),
        }
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.transaction_id.as_ref()
    }

    /// Assign the id on first execution; later calls keep the first id
    pub fn freeze_with_id(&mut self, id: TransactionId) -> &TransactionId {
        self.transaction_id.get_or_insert(id)
    }

    /// Add a signature in addition to the operator's
    pub fn sign(mut self, key: &PrivateKey) -> Self {
        if !self.signers.contains(key) {
            self.signers.push(key.clone());
        }
        self
    }

    pub fn signers(&self) -> &[PrivateKey] {
        &self.signers
    }
}

impl From<TokenCreateTransaction> for Transaction {
    fn from(tx: TokenCreateTransaction) -> Self {
        Transaction::new(TransactionBody::TokenCreate(tx))
    }
}

impl From<TokenMintTransaction> for Transaction {
    fn from(tx: TokenMintTransaction) -> Self {
        Transaction::new(TransactionBody::TokenMint(tx))
    }
}

impl From<TokenAssociateTransaction> for Transaction {
    fn from(tx: TokenAssociateTransaction) -> Self {
        Transaction::new(TransactionBody::TokenAssociate(tx))
    }
}

impl From<TransferTransaction> for Transaction {
    fn from(tx: TransferTransaction) -> Self {
        Transaction::new(TransactionBody::Transfer(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_amounts_per_token() {
        let a = TokenId::new(0, 0, 10);
        let b = TokenId::new(0, 0, 11);
        let tx = TransferTransaction::new()
            .token_transfer(a, AccountId::new(0, 0, 1), -10)
            .token_transfer(a, AccountId::new(0, 0, 2), 10)
            .token_transfer(b, AccountId::new(0, 0, 1), 5);

        assert_eq!(tx.net_amounts(), vec![(a, 0), (b, 5)]);
    }

    #[test]
    fn test_transaction_id_is_kept() {
        let mut tx: Transaction = TokenMintTransaction::new(TokenId::new(0, 0, 10), 1).into();
        let first = TransactionId {
            account_id: AccountId::new(0, 0, 3),
            valid_start_secs: 1,
            valid_start_nanos: 0,
        };
        let second = TransactionId {
            valid_start_secs: 2,
            ..first.clone()
        };

        tx.freeze_with_id(first.clone());
        assert_eq!(tx.freeze_with_id(second), &first);
    }
}
