//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use crate::ledger::{AccountId, Hbar, Operator, PrivateKey};

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Test accounts, addressed by position
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,

    /// Which account index plays which role in the steps
    #[serde(default)]
    pub roles: Roles,

    /// Token settings used by creation steps
    #[serde(default)]
    pub token: TokenDefaults,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// In-memory network settings
    #[serde(default)]
    pub network: NetworkConfig,
}

/// One test account
#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    /// Account id, e.g. `0.0.1001`
    pub id: AccountId,

    /// ED25519 private key as hex (raw or DER)
    pub private_key: PrivateKey,

    /// Starting balance on the in-memory network, in hbar
    #[serde(default = "default_account_hbar")]
    pub hbar: i64,
}

impl AccountConfig {
    pub fn operator(&self) -> Operator {
        Operator::new(self.id, self.private_key.clone())
    }

    pub fn initial_balance(&self) -> Hbar {
        Hbar::from_hbar(self.hbar)
    }
}

fn default_account_hbar() -> i64 {
    1_000
}

/// Account role named in step text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    First,
    Second,
    Third,
    Fourth,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::First => "first",
            Role::Second => "second",
            Role::Third => "third",
            Role::Fourth => "fourth",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Role::First),
            "second" => Ok(Role::Second),
            "third" => Ok(Role::Third),
            "fourth" => Ok(Role::Fourth),
            other => Err(Error::Config(format!("Unknown account role '{}'", other))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role to account index mapping
#[derive(Debug, Deserialize, Clone)]
pub struct Roles {
    #[serde(default = "default_first")]
    pub first: usize,
    #[serde(default = "default_second")]
    pub second: usize,
    #[serde(default = "default_third")]
    pub third: usize,
    #[serde(default = "default_fourth")]
    pub fourth: usize,
}

impl Roles {
    pub fn index(&self, role: Role) -> usize {
        match role {
            Role::First => self.first,
            Role::Second => self.second,
            Role::Third => self.third,
            Role::Fourth => self.fourth,
        }
    }
}

impl Default for Roles {
    fn default() -> Self {
        Self {
            first: default_first(),
            second: default_second(),
            third: default_third(),
            fourth: default_fourth(),
        }
    }
}

fn default_first() -> usize {
    3
}
fn default_second() -> usize {
    1
}
fn default_third() -> usize {
    2
}
fn default_fourth() -> usize {
    4
}

/// Token settings
#[derive(Debug, Deserialize, Clone)]
pub struct TokenDefaults {
    /// Decimal places of tokens created by the steps
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for TokenDefaults {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
        }
    }
}

fn default_decimals() -> u32 {
    2
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Ceiling for a single step
    #[serde(default = "default_step")]
    pub step_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            step_secs: default_step(),
        }
    }
}

fn default_step() -> u64 {
    60
}

/// In-memory network settings
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Fee charged to the payer of every transaction
    #[serde(default = "default_fee")]
    pub transaction_fee_tinybars: i64,

    /// Lowest entity number handed out to new tokens
    #[serde(default = "default_first_entity")]
    pub first_entity_num: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            transaction_fee_tinybars: default_fee(),
            first_entity_num: default_first_entity(),
        }
    }
}

fn default_fee() -> i64 {
    5_000_000
}
fn default_first_entity() -> u64 {
    1_001
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (i, account) in self.accounts.iter().enumerate() {
            if self.accounts[..i].iter().any(|a| a.id == account.id) {
                return Err(Error::ConfigParse(format!(
                    "Account {} is listed more than once",
                    account.id
                )));
            }
            if account.hbar < 0 {
                return Err(Error::ConfigParse(format!(
                    "Account {} has a negative hbar balance",
                    account.id
                )));
            }
        }
        if self.network.transaction_fee_tinybars < 0 {
            return Err(Error::ConfigParse(format!(
                "network.transaction_fee_tinybars must not be negative (got {})",
                self.network.transaction_fee_tinybars
            )));
        }
        if self.timeouts.step_secs == 0 {
            return Err(Error::ConfigParse(
                "timeouts.step_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Account playing the given role
    pub fn account(&self, role: Role) -> Result<&AccountConfig> {
        let index = self.roles.index(role);
        self.accounts
            .get(index)
            .ok_or_else(|| Error::AccountNotConfigured {
                role: role.to_string(),
                index,
                available: self.accounts.len(),
            })
    }
}
