//! In-memory ledger network
//!
//! Simulates the account and token service rules the steps depend on:
//! fees, signatures, duplicate detection, associations, minting and
//! zero-sum transfers. All scenarios of a run share one network, the
//! same way they would share a real one.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::common::config::{Config, NetworkConfig};
use crate::common::{Error, Result};

use super::client::{ClientFactory, LedgerClient};
use super::transaction::{
    TokenAssociateTransaction, TokenCreateTransaction, TokenMintTransaction, Transaction,
    TransactionBody, TransferTransaction,
};
use super::types::{
    AccountBalance, AccountId, AccountInfo, Hbar, Operator, PrivateKey, PublicKey, Receipt,
    Status, TokenId, TokenInfo, TokenRelationship, TransactionId, TransactionResponse,
};

/// Largest raw supply a token may reach
const MAX_SUPPLY: u64 = i64::MAX as u64;

struct AccountState {
    key: PublicKey,
    hbar: i64,
    /// Token relationships with raw balances
    tokens: BTreeMap<TokenId, u64>,
}

struct TokenState {
    name: String,
    symbol: String,
    decimals: u32,
    total_supply: u64,
    treasury: AccountId,
    admin_key: Option<PublicKey>,
    supply_key: Option<PublicKey>,
}

/// Successful application of a transaction body
#[derive(Default)]
struct Applied {
    token_id: Option<TokenId>,
    total_supply: Option<u64>,
}

type Outcome = std::result::Result<Applied, Status>;

struct LedgerState {
    accounts: BTreeMap<AccountId, AccountState>,
    tokens: BTreeMap<TokenId, TokenState>,
    receipts: HashMap<TransactionId, Receipt>,
    next_entity_num: u64,
    last_valid_start: (u64, u32),
}

impl LedgerState {
    /// Wall-clock valid start, bumped by a nanosecond when it would repeat
    fn next_valid_start(&mut self) -> (u64, u32) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let mut next = (now.as_secs(), now.subsec_nanos());
        if next <= self.last_valid_start {
            let (secs, nanos) = self.last_valid_start;
            next = if nanos >= 999_999_999 {
                (secs + 1, 0)
            } else {
                (secs, nanos + 1)
            };
        }
        self.last_valid_start = next;
        next
    }

    fn submit(
        &mut self,
        operator: &Operator,
        transaction: &Transaction,
        id: &TransactionId,
        fee: Hbar,
    ) -> Result<()> {
        let operator_key = operator.key.public_key();
        let payer = self
            .accounts
            .get_mut(&operator.account_id)
            .ok_or_else(|| Error::precheck_tx(Status::PayerAccountNotFound, id))?;
        if payer.key != operator_key {
            return Err(Error::precheck_tx(Status::InvalidSignature, id));
        }
        if self.receipts.contains_key(id) {
            return Err(Error::precheck_tx(Status::DuplicateTransaction, id));
        }
        let remaining = payer
            .hbar
            .checked_sub(fee.to_tinybars())
            .filter(|left| fee.to_tinybars() >= 0 && *left >= 0)
            .ok_or_else(|| Error::precheck_tx(Status::InsufficientPayerBalance, id))?;

        // Fee is charged even when the body fails at consensus
        payer.hbar = remaining;

        let mut signers: HashSet<PublicKey> = transaction
            .signers()
            .iter()
            .map(PrivateKey::public_key)
            .collect();
        signers.insert(operator_key);

        let outcome = match transaction.body() {
            TransactionBody::TokenCreate(body) => self.create_token(body, &signers),
            TransactionBody::TokenMint(body) => self.mint(body, &signers),
            TransactionBody::TokenAssociate(body) => self.associate(body, &signers),
            TransactionBody::Transfer(body) => self.transfer(body, &signers),
        };

        let receipt = match outcome {
            Ok(applied) => Receipt {
                transaction_id: id.clone(),
                status: Status::Success,
                token_id: applied.token_id,
                total_supply: applied.total_supply,
            },
            Err(status) => Receipt {
                transaction_id: id.clone(),
                status,
                token_id: None,
                total_supply: None,
            },
        };

        tracing::debug!(
            transaction = %id,
            kind = transaction.body().kind(),
            status = %receipt.status,
            "Transaction reached consensus"
        );
        self.receipts.insert(id.clone(), receipt);
        Ok(())
    }

    fn create_token(&mut self, tx: &TokenCreateTransaction, signers: &HashSet<PublicKey>) -> Outcome {
        if tx.name.trim().is_empty() {
            return Err(Status::MissingTokenName);
        }
        if tx.symbol.trim().is_empty() {
            return Err(Status::MissingTokenSymbol);
        }
        if tx.initial_supply > MAX_SUPPLY {
            return Err(Status::InvalidTokenInitialSupply);
        }

        let treasury_id = tx
            .treasury_account_id
            .ok_or(Status::InvalidTreasuryAccountForToken)?;
        let treasury = self
            .accounts
            .get_mut(&treasury_id)
            .ok_or(Status::InvalidTreasuryAccountForToken)?;
        if !signers.contains(&treasury.key) {
            return Err(Status::InvalidSignature);
        }
        if let Some(admin_key) = &tx.admin_key {
            if !signers.contains(admin_key) {
                return Err(Status::InvalidSignature);
            }
        }

        let token_id = TokenId::new(0, 0, self.next_entity_num);
        self.next_entity_num += 1;

        treasury.tokens.insert(token_id, tx.initial_supply);
        self.tokens.insert(
            token_id,
            TokenState {
                name: tx.name.clone(),
                symbol: tx.symbol.clone(),
                decimals: tx.decimals,
                total_supply: tx.initial_supply,
                treasury: treasury_id,
                admin_key: tx.admin_key.clone(),
                supply_key: tx.supply_key.clone(),
            },
        );

        Ok(Applied {
            token_id: Some(token_id),
            ..Applied::default()
        })
    }

    fn mint(&mut self, tx: &TokenMintTransaction, signers: &HashSet<PublicKey>) -> Outcome {
        let token = self
            .tokens
            .get_mut(&tx.token_id)
            .ok_or(Status::InvalidTokenId)?;
        let supply_key = token.supply_key.as_ref().ok_or(Status::TokenHasNoSupplyKey)?;
        if !signers.contains(supply_key) {
            return Err(Status::InvalidSignature);
        }
        if tx.amount == 0 {
            return Err(Status::InvalidTokenMintAmount);
        }
        let total = token
            .total_supply
            .checked_add(tx.amount)
            .filter(|total| *total <= MAX_SUPPLY)
            .ok_or(Status::InvalidTokenMintAmount)?;

        let treasury = self
            .accounts
            .get_mut(&token.treasury)
            .ok_or(Status::InvalidTreasuryAccountForToken)?;
        let balance = treasury.tokens.entry(tx.token_id).or_insert(0);
        *balance += tx.amount;
        token.total_supply = total;

        Ok(Applied {
            total_supply: Some(total),
            ..Applied::default()
        })
    }

    fn associate(&mut self, tx: &TokenAssociateTransaction, signers: &HashSet<PublicKey>) -> Outcome {
        let account = self
            .accounts
            .get_mut(&tx.account_id)
            .ok_or(Status::InvalidAccountId)?;
        if !signers.contains(&account.key) {
            return Err(Status::InvalidSignature);
        }
        for token_id in &tx.token_ids {
            if !self.tokens.contains_key(token_id) {
                return Err(Status::InvalidTokenId);
            }
            if account.tokens.contains_key(token_id) {
                return Err(Status::TokenAlreadyAssociatedToAccount);
            }
        }
        for token_id in &tx.token_ids {
            account.tokens.insert(*token_id, 0);
        }
        Ok(Applied::default())
    }

    fn transfer(&mut self, tx: &TransferTransaction, signers: &HashSet<PublicKey>) -> Outcome {
        if tx.token_transfers.is_empty() {
            return Err(Status::EmptyTokenTransferAccountAmounts);
        }
        if tx.net_amounts().iter().any(|(_, net)| *net != 0) {
            return Err(Status::TransfersNotZeroSumForToken);
        }

        let mut seen = HashSet::new();
        let mut updates = Vec::with_capacity(tx.token_transfers.len());
        for leg in &tx.token_transfers {
            if !seen.insert((leg.token_id, leg.account_id)) {
                return Err(Status::AccountRepeatedInAccountAmounts);
            }
            if !self.tokens.contains_key(&leg.token_id) {
                return Err(Status::InvalidTokenId);
            }
            let account = self
                .accounts
                .get(&leg.account_id)
                .ok_or(Status::InvalidAccountId)?;
            let balance = *account
                .tokens
                .get(&leg.token_id)
                .ok_or(Status::TokenNotAssociatedToAccount)?;
            if leg.amount < 0 && !signers.contains(&account.key) {
                return Err(Status::InvalidSignature);
            }
            let updated = i128::from(balance) + i128::from(leg.amount);
            if updated < 0 {
                return Err(Status::InsufficientTokenBalance);
            }
            let updated = u64::try_from(updated).map_err(|_| Status::InsufficientTokenBalance)?;
            updates.push((leg.account_id, leg.token_id, updated));
        }

        for (account_id, token_id, balance) in updates {
            if let Some(account) = self.accounts.get_mut(&account_id) {
                account.tokens.insert(token_id, balance);
            }
        }
        Ok(Applied::default())
    }

    fn account(&self, account_id: &AccountId) -> Result<&AccountState> {
        self.accounts
            .get(account_id)
            .ok_or_else(|| Error::precheck(Status::InvalidAccountId))
    }
}

/// Shared in-memory ledger
pub struct MemoryNetwork {
    state: Mutex<LedgerState>,
    fee: Hbar,
}

impl MemoryNetwork {
    /// Create an empty network
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                accounts: BTreeMap::new(),
                tokens: BTreeMap::new(),
                receipts: HashMap::new(),
                next_entity_num: config.first_entity_num,
                last_valid_start: (0, 0),
            }),
            fee: Hbar::from_tinybars(config.transaction_fee_tinybars),
        }
    }

    /// Create a network seeded with the configured accounts
    pub fn from_config(config: &Config) -> Result<Arc<Self>> {
        let network = Self::new(&config.network);
        for account in &config.accounts {
            network.add_account(account.id, &account.private_key, account.initial_balance())?;
        }
        Ok(Arc::new(network))
    }

    /// Register an account with its key and hbar balance
    pub fn add_account(&self, account_id: AccountId, key: &PrivateKey, balance: Hbar) -> Result<()> {
        let mut state = self.lock()?;
        if state.accounts.contains_key(&account_id) {
            return Err(Error::Config(format!("Account {} already exists", account_id)));
        }
        state.accounts.insert(
            account_id,
            AccountState {
                key: key.public_key(),
                hbar: balance.to_tinybars(),
                tokens: BTreeMap::new(),
            },
        );
        // Keep new token ids clear of account ids
        if account_id.num >= state.next_entity_num {
            state.next_entity_num = account_id.num + 1;
        }
        Ok(())
    }

    /// Fee charged per transaction
    pub fn fee(&self) -> Hbar {
        self.fee
    }

    /// Client bound to this network with no operator yet
    pub fn connect(self: &Arc<Self>) -> MemoryClient {
        MemoryClient {
            network: Arc::clone(self),
            operator: None,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>> {
        self.state
            .lock()
            .map_err(|_| Error::Internal("ledger state lock poisoned".to_string()))
    }

    fn submit(&self, operator: &Operator, transaction: &mut Transaction) -> Result<TransactionId> {
        let mut state = self.lock()?;
        let id = match transaction.transaction_id() {
            Some(id) => id.clone(),
            None => {
                let (secs, nanos) = state.next_valid_start();
                transaction
                    .freeze_with_id(TransactionId {
                        account_id: operator.account_id,
                        valid_start_secs: secs,
                        valid_start_nanos: nanos,
                    })
                    .clone()
            }
        };
        state.submit(operator, transaction, &id, self.fee)?;
        Ok(id)
    }

    fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance> {
        let state = self.lock()?;
        let account = state.account(account_id)?;
        Ok(AccountBalance {
            account_id: *account_id,
            hbars: Hbar::from_tinybars(account.hbar),
            tokens: account.tokens.clone(),
        })
    }

    fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo> {
        let state = self.lock()?;
        let account = state.account(account_id)?;
        let token_relationships = account
            .tokens
            .iter()
            .filter_map(|(token_id, balance)| {
                state.tokens.get(token_id).map(|token| {
                    (
                        *token_id,
                        TokenRelationship {
                            token_id: *token_id,
                            symbol: token.symbol.clone(),
                            balance: *balance,
                            decimals: token.decimals,
                        },
                    )
                })
            })
            .collect();

        Ok(AccountInfo {
            account_id: *account_id,
            key: account.key.clone(),
            balance: Hbar::from_tinybars(account.hbar),
            token_relationships,
        })
    }

    fn token_info(&self, token_id: &TokenId) -> Result<TokenInfo> {
        let state = self.lock()?;
        let token = state
            .tokens
            .get(token_id)
            .ok_or_else(|| Error::precheck(Status::InvalidTokenId))?;
        Ok(TokenInfo {
            token_id: *token_id,
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            decimals: token.decimals,
            total_supply: token.total_supply,
            treasury_account_id: token.treasury,
            admin_key: token.admin_key.clone(),
            supply_key: token.supply_key.clone(),
        })
    }

    fn receipt(&self, transaction_id: &TransactionId) -> Result<Receipt> {
        let state = self.lock()?;
        state
            .receipts
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| Error::precheck_tx(Status::ReceiptNotFound, transaction_id))
    }
}

impl ClientFactory for Arc<MemoryNetwork> {
    fn client(&self) -> Box<dyn LedgerClient> {
        Box::new(self.connect())
    }
}

/// Client handle onto a [`MemoryNetwork`]
pub struct MemoryClient {
    network: Arc<MemoryNetwork>,
    operator: Option<Operator>,
}

#[async_trait]
impl LedgerClient for MemoryClient {
    fn set_operator(&mut self, operator: Operator) {
        self.operator = Some(operator);
    }

    fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    async fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance> {
        self.network.account_balance(account_id)
    }

    async fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo> {
        self.network.account_info(account_id)
    }

    async fn token_info(&self, token_id: &TokenId) -> Result<TokenInfo> {
        self.network.token_info(token_id)
    }

    async fn execute(&self, transaction: &mut Transaction) -> Result<TransactionResponse> {
        let operator = self.require_operator()?;
        let transaction_id = self.network.submit(operator, transaction)?;
        Ok(TransactionResponse { transaction_id })
    }

    async fn get_receipt(&self, response: &TransactionResponse) -> Result<Receipt> {
        self.network.receipt(&response.transaction_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";
    const KEY_B: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";

    struct Fixture {
        network: Arc<MemoryNetwork>,
        alice: Operator,
        bob: Operator,
    }

    fn fixture() -> Fixture {
        let network = Arc::new(MemoryNetwork::new(&NetworkConfig::default()));
        let alice = Operator::new(AccountId::new(0, 0, 1001), KEY_A.parse().unwrap());
        let bob = Operator::new(AccountId::new(0, 0, 1002), KEY_B.parse().unwrap());
        network
            .add_account(alice.account_id, &alice.key, Hbar::from_hbar(100))
            .unwrap();
        network
            .add_account(bob.account_id, &bob.key, Hbar::from_hbar(100))
            .unwrap();
        Fixture {
            network,
            alice,
            bob,
        }
    }

    async fn run(client: &MemoryClient, tx: impl Into<Transaction>) -> Receipt {
        let mut tx = tx.into();
        let response = client.execute(&mut tx).await.unwrap();
        client.get_receipt(&response).await.unwrap()
    }

    fn mintable(treasury: &Operator) -> TokenCreateTransaction {
        TokenCreateTransaction::new()
            .token_name("Test Token")
            .token_symbol("HTT")
            .decimals(2)
            .treasury_account_id(treasury.account_id)
            .admin_key(treasury.key.public_key())
            .supply_key(treasury.key.public_key())
    }

    #[tokio::test]
    async fn test_create_mint_and_query() {
        let fx = fixture();
        let mut client = fx.network.connect();
        client.set_operator(fx.alice.clone());

        let receipt = run(&client, mintable(&fx.alice)).await;
        assert!(receipt.is_success());
        let token_id = receipt.token_id.unwrap();
        // Entity numbers continue past the highest account
        assert_eq!(token_id.num, 1003);

        let receipt = run(&client, TokenMintTransaction::new(token_id, 10_000)).await;
        assert!(receipt.is_success());
        assert_eq!(receipt.total_supply, Some(10_000));

        let info = client.token_info(&token_id).await.unwrap();
        assert_eq!(info.name, "Test Token");
        assert_eq!(info.total_supply, 10_000);
        assert_eq!(info.admin_key, Some(fx.alice.key.public_key()));

        let balance = client.account_balance(&fx.alice.account_id).await.unwrap();
        assert_eq!(balance.tokens.get(&token_id), Some(&10_000));
        // Two transactions paid at the default fee
        assert_eq!(
            balance.hbars,
            Hbar::from_tinybars(Hbar::from_hbar(100).to_tinybars() - 2 * 5_000_000)
        );
    }

    #[tokio::test]
    async fn test_fixed_supply_token_cannot_mint() {
        let fx = fixture();
        let mut client = fx.network.connect();
        client.set_operator(fx.alice.clone());

        let create = TokenCreateTransaction::new()
            .token_name("Test Token")
            .token_symbol("HTT")
            .decimals(2)
            .initial_supply(100_000)
            .treasury_account_id(fx.alice.account_id)
            .admin_key(fx.alice.key.public_key());
        let token_id = run(&client, create).await.token_id.unwrap();

        let receipt = run(&client, TokenMintTransaction::new(token_id, 1_000)).await;
        assert_eq!(receipt.status, Status::TokenHasNoSupplyKey);
        assert_eq!(client.token_info(&token_id).await.unwrap().total_supply, 100_000);
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_rejected() {
        let fx = fixture();
        let mut client = fx.network.connect();
        client.set_operator(fx.alice.clone());

        let mut tx: Transaction = mintable(&fx.alice).into();
        client.execute(&mut tx).await.unwrap();
        let err = client.execute(&mut tx).await.unwrap_err();
        assert_eq!(err.ledger_status(), Some(Status::DuplicateTransaction));
    }

    #[tokio::test]
    async fn test_transfer_requires_association_and_sender_signature() {
        let fx = fixture();
        let mut client = fx.network.connect();
        client.set_operator(fx.alice.clone());
        let token_id = run(&client, mintable(&fx.alice).initial_supply(1_000))
            .await
            .token_id
            .unwrap();

        let transfer = TransferTransaction::new()
            .token_transfer(token_id, fx.alice.account_id, -10)
            .token_transfer(token_id, fx.bob.account_id, 10);

        let receipt = run(&client, transfer.clone()).await;
        assert_eq!(receipt.status, Status::TokenNotAssociatedToAccount);

        // Bob is unassociated: no relationship at all, not a zero balance
        let info = client.account_info(&fx.bob.account_id).await.unwrap();
        assert!(info.token_relationships.get(&token_id).is_none());

        let associate = Transaction::from(TokenAssociateTransaction::new(fx.bob.account_id).token_id(token_id))
            .sign(&fx.bob.key);
        assert!(run(&client, associate).await.is_success());
        let info = client.account_info(&fx.bob.account_id).await.unwrap();
        assert_eq!(info.token_relationships[&token_id].balance, 0);

        // Bob pays, but Alice's tokens move without her signature
        client.set_operator(fx.bob.clone());
        let receipt = run(&client, transfer.clone()).await;
        assert_eq!(receipt.status, Status::InvalidSignature);

        let signed = Transaction::from(transfer).sign(&fx.alice.key);
        assert!(run(&client, signed).await.is_success());
        let info = client.account_info(&fx.bob.account_id).await.unwrap();
        assert_eq!(info.token_relationships[&token_id].balance, 10);
    }

    #[tokio::test]
    async fn test_transfer_rules() {
        let fx = fixture();
        let mut client = fx.network.connect();
        client.set_operator(fx.alice.clone());
        let token_id = run(&client, mintable(&fx.alice).initial_supply(5))
            .await
            .token_id
            .unwrap();
        let associate = Transaction::from(TokenAssociateTransaction::new(fx.bob.account_id).token_id(token_id))
            .sign(&fx.bob.key);
        run(&client, associate).await;

        let unbalanced = TransferTransaction::new()
            .token_transfer(token_id, fx.alice.account_id, -5)
            .token_transfer(token_id, fx.bob.account_id, 4);
        assert_eq!(run(&client, unbalanced).await.status, Status::TransfersNotZeroSumForToken);

        let overdraw = TransferTransaction::new()
            .token_transfer(token_id, fx.alice.account_id, -6)
            .token_transfer(token_id, fx.bob.account_id, 6);
        assert_eq!(run(&client, overdraw).await.status, Status::InsufficientTokenBalance);

        assert_eq!(
            run(&client, TransferTransaction::new()).await.status,
            Status::EmptyTokenTransferAccountAmounts
        );

        // Failed transfers leave balances untouched
        let balance = client.account_balance(&fx.alice.account_id).await.unwrap();
        assert_eq!(balance.tokens[&token_id], 5);
    }

    #[tokio::test]
    async fn test_prechecks() {
        let fx = fixture();
        let mut client = fx.network.connect();

        let mut tx: Transaction = mintable(&fx.alice).into();
        assert!(matches!(client.execute(&mut tx).await, Err(Error::NoOperator)));

        // Right account, wrong key
        client.set_operator(Operator::new(fx.alice.account_id, fx.bob.key.clone()));
        let err = client.execute(&mut tx).await.unwrap_err();
        assert_eq!(err.ledger_status(), Some(Status::InvalidSignature));

        let err = client.account_info(&AccountId::new(0, 0, 9)).await.unwrap_err();
        assert_eq!(err.ledger_status(), Some(Status::InvalidAccountId));

        let err = client.token_info(&TokenId::new(0, 0, 9)).await.unwrap_err();
        assert_eq!(err.ledger_status(), Some(Status::InvalidTokenId));
    }

    #[tokio::test]
    async fn test_insufficient_payer_balance() {
        let network = Arc::new(MemoryNetwork::new(&NetworkConfig::default()));
        let poor = Operator::new(AccountId::new(0, 0, 7), KEY_A.parse().unwrap());
        network
            .add_account(poor.account_id, &poor.key, Hbar::from_tinybars(1))
            .unwrap();
        let mut client = network.connect();
        client.set_operator(poor.clone());

        let mut tx: Transaction = mintable(&poor).into();
        let err = client.execute(&mut tx).await.unwrap_err();
        assert_eq!(err.ledger_status(), Some(Status::InsufficientPayerBalance));
    }

    #[tokio::test]
    async fn test_out_of_range_fee_is_rejected_without_crediting() {
        let config = NetworkConfig {
            transaction_fee_tinybars: i64::MIN,
            ..NetworkConfig::default()
        };
        let network = Arc::new(MemoryNetwork::new(&config));
        let payer = Operator::new(AccountId::new(0, 0, 7), KEY_A.parse().unwrap());
        network
            .add_account(payer.account_id, &payer.key, Hbar::from_hbar(1))
            .unwrap();
        let mut client = network.connect();
        client.set_operator(payer.clone());

        let mut tx: Transaction = mintable(&payer).into();
        let err = client.execute(&mut tx).await.unwrap_err();
        assert_eq!(err.ledger_status(), Some(Status::InsufficientPayerBalance));

        let balance = client.account_balance(&payer.account_id).await.unwrap();
        assert_eq!(balance.hbars, Hbar::from_hbar(1));
    }
}
