//! Ledger value types
//!
//! Identifiers, keys, amounts, statuses and the records returned by
//! queries and receipts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

/// Tinybars per hbar
pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// Parse `shard.realm.num`
fn parse_entity(s: &str) -> Result<(u64, u64, u64)> {
    let parts: Vec<&str> = s.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(Error::InvalidEntityId(s.to_string()));
    }
    let mut nums = [0u64; 3];
    for (slot, part) in nums.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| Error::InvalidEntityId(s.to_string()))?;
    }
    Ok((nums[0], nums[1], nums[2]))
}

/// Account identifier (`shard.realm.num`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl AccountId {
    pub fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (shard, realm, num) = parse_entity(s)?;
        Ok(Self { shard, realm, num })
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl TryFrom<String> for AccountId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}

/// Token identifier (`shard.realm.num`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl TokenId {
    pub fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl FromStr for TokenId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (shard, realm, num) = parse_entity(s)?;
        Ok(Self { shard, realm, num })
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl TryFrom<String> for TokenId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TokenId> for String {
    fn from(id: TokenId) -> Self {
        id.to_string()
    }
}

/// DER prefix of an ED25519 PKCS#8 private key
const ED25519_DER_PREFIX: &str = "302e020100300506032b657004220420";

/// ED25519 private key material, kept as its raw 32 bytes
///
/// Accepts raw hex or DER-encoded hex, with an optional `0x` prefix.
/// Signing is the ledger client's concern; this type only carries the key
/// and derives the public identity the ledger checks signatures against.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct PrivateKey {
    bytes: Vec<u8>,
}

impl PrivateKey {
    /// Public identity of this key
    pub fn public_key(&self) -> PublicKey {
        PublicKey(blake3::hash(&self.bytes).to_hex().to_string())
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let lower = trimmed.strip_prefix("0x").unwrap_or(trimmed).to_ascii_lowercase();
        let hex_str = lower
            .strip_prefix(ED25519_DER_PREFIX)
            .filter(|raw| raw.len() == 64)
            .unwrap_or(lower.as_str());

        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::InvalidPrivateKey(format!("not hex: {}", e)))?;
        if bytes.len() != 32 {
            return Err(Error::InvalidPrivateKey(format!(
                "expected 32 key bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }
}

impl TryFrom<String> for PrivateKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.public_key())
    }
}

/// Public identity derived from a private key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(String);

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell keys apart in logs
        write!(f, "{}", &self.0[..self.0.len().min(16)])
    }
}

/// Account and key a client signs and pays with
#[derive(Debug, Clone)]
pub struct Operator {
    pub account_id: AccountId,
    pub key: PrivateKey,
}

impl Operator {
    pub fn new(account_id: AccountId, key: PrivateKey) -> Self {
        Self { account_id, key }
    }
}

/// Hbar amount, stored in tinybars
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Hbar(i64);

impl Hbar {
    pub fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    pub fn from_hbar(hbar: i64) -> Self {
        Self(hbar.saturating_mul(TINYBARS_PER_HBAR))
    }

    pub fn to_tinybars(self) -> i64 {
        self.0
    }

    /// Whole hbar, truncated toward zero
    pub fn to_hbar(self) -> i64 {
        self.0 / TINYBARS_PER_HBAR
    }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_hbar = TINYBARS_PER_HBAR.unsigned_abs();
        let (whole, frac) = (abs / per_hbar, abs % per_hbar);
        if frac == 0 {
            write!(f, "{}{} ℏ", sign, whole)
        } else {
            write!(f, "{}{}.{:08} ℏ", sign, whole, frac)
        }
    }
}

/// Transaction identifier: payer account plus valid-start timestamp
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start_secs: u64,
    pub valid_start_nanos: u32,
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id, self.valid_start_secs, self.valid_start_nanos
        )
    }
}

impl FromStr for TransactionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Internal(format!("Invalid transaction id '{}'", s));
        let (account, start) = s.split_once('@').ok_or_else(invalid)?;
        let (secs, nanos) = start.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            account_id: account.parse()?,
            valid_start_secs: secs.parse().map_err(|_| invalid())?,
            valid_start_nanos: nanos.parse().map_err(|_| invalid())?,
        })
    }
}

/// Ledger response codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    InvalidSignature,
    InvalidAccountId,
    InvalidTokenId,
    PayerAccountNotFound,
    InsufficientPayerBalance,
    DuplicateTransaction,
    ReceiptNotFound,
    MissingTokenName,
    MissingTokenSymbol,
    InvalidTreasuryAccountForToken,
    InvalidTokenInitialSupply,
    TokenHasNoSupplyKey,
    InvalidTokenMintAmount,
    TokenAlreadyAssociatedToAccount,
    TokenNotAssociatedToAccount,
    EmptyTokenTransferAccountAmounts,
    TransfersNotZeroSumForToken,
    AccountRepeatedInAccountAmounts,
    InsufficientTokenBalance,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::InvalidSignature => "INVALID_SIGNATURE",
            Status::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Status::InvalidTokenId => "INVALID_TOKEN_ID",
            Status::PayerAccountNotFound => "PAYER_ACCOUNT_NOT_FOUND",
            Status::InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
            Status::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Status::ReceiptNotFound => "RECEIPT_NOT_FOUND",
            Status::MissingTokenName => "MISSING_TOKEN_NAME",
            Status::MissingTokenSymbol => "MISSING_TOKEN_SYMBOL",
            Status::InvalidTreasuryAccountForToken => "INVALID_TREASURY_ACCOUNT_FOR_TOKEN",
            Status::InvalidTokenInitialSupply => "INVALID_TOKEN_INITIAL_SUPPLY",
            Status::TokenHasNoSupplyKey => "TOKEN_HAS_NO_SUPPLY_KEY",
            Status::InvalidTokenMintAmount => "INVALID_TOKEN_MINT_AMOUNT",
            Status::TokenAlreadyAssociatedToAccount => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
            Status::TokenNotAssociatedToAccount => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
            Status::EmptyTokenTransferAccountAmounts => "EMPTY_TOKEN_TRANSFER_ACCOUNT_AMOUNTS",
            Status::TransfersNotZeroSumForToken => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
            Status::AccountRepeatedInAccountAmounts => "ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS",
            Status::InsufficientTokenBalance => "INSUFFICIENT_TOKEN_BALANCE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
}

/// Final outcome of a transaction
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub transaction_id: TransactionId,
    pub status: Status,
    /// Set for successful token creations
    pub token_id: Option<TokenId>,
    /// Set for successful mints
    pub total_supply: Option<u64>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Fail with `ReceiptStatus` unless the status is SUCCESS
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::ReceiptStatus {
                status: self.status,
                transaction_id: self.transaction_id,
            })
        }
    }
}

/// Result of an account balance query
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub hbars: Hbar,
    /// Raw token balances
    pub tokens: BTreeMap<TokenId, u64>,
}

/// An account's association with one token
#[derive(Debug, Clone, Serialize)]
pub struct TokenRelationship {
    pub token_id: TokenId,
    pub symbol: String,
    /// Raw balance in the token's smallest unit
    pub balance: u64,
    pub decimals: u32,
}

/// Result of an account info query
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub account_id: AccountId,
    pub key: PublicKey,
    pub balance: Hbar,
    pub token_relationships: BTreeMap<TokenId, TokenRelationship>,
}

/// Result of a token info query
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub token_id: TokenId,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    /// Raw total supply
    pub total_supply: u64,
    pub treasury_account_id: AccountId,
    pub admin_key: Option<PublicKey>,
    pub supply_key: Option<PublicKey>,
}
