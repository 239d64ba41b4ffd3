//! Token steps: creation, metadata queries and minting.

use cucumber::{given, then, when};

use crate::common::{Error, Result};
use crate::ledger::{Status, TokenCreateTransaction, TokenInfo, TokenMintTransaction, Transaction};
use crate::testing::{CreatedToken, ScenarioContext};

use super::within;

/// Receipt statuses that mean the ledger refused the mint itself
const MINT_REJECTIONS: [Status; 4] = [
    Status::TokenHasNoSupplyKey,
    Status::InvalidTokenMintAmount,
    Status::InvalidTokenId,
    Status::InvalidSignature,
];

/// Create a token with the operator as treasury and admin
///
/// `supply` is `None` for a mintable token (operator holds the supply
/// key) and the initial supply in whole tokens for a fixed-supply one.
pub async fn create_token(
    ctx: &mut ScenarioContext,
    name: &str,
    symbol: &str,
    supply: Option<u64>,
) -> Result<()> {
    let operator = ctx.client()?.require_operator()?.clone();
    let decimals = ctx.config().token.decimals;
    let admin_key = operator.key.public_key();

    let mut create = TokenCreateTransaction::new()
        .token_name(name)
        .token_symbol(symbol)
        .decimals(decimals)
        .treasury_account_id(operator.account_id)
        .admin_key(admin_key.clone());

    create = match supply {
        Some(amount) => create.initial_supply(scale(amount, decimals)?),
        None => create.supply_key(operator.key.public_key()),
    };

    let receipt = ctx
        .submit(Transaction::from(create))
        .await?
        .ensure_success()?;
    let id = receipt
        .token_id
        .ok_or_else(|| Error::ReceiptMissingTokenId(receipt.transaction_id.clone()))?;

    ctx.set_token(CreatedToken {
        id,
        name: name.to_string(),
        symbol: symbol.to_string(),
        decimals,
        treasury: operator.account_id,
        admin_key,
    });
    Ok(())
}

/// Whole tokens to raw units before the token exists
fn scale(amount: u64, decimals: u32) -> Result<u64> {
    10u64
        .checked_pow(decimals)
        .and_then(|factor| amount.checked_mul(factor))
        .ok_or(Error::AmountOverflow { amount, decimals })
}

async fn current_info(ctx: &ScenarioContext) -> Result<TokenInfo> {
    let token_id = ctx.token()?.id;
    let info = ctx.client()?.token_info(&token_id).await?;
    tracing::debug!(token = %token_id, supply = info.total_supply, "Token info");
    Ok(info)
}

fn mismatch(
    field: &str,
    expected: impl std::fmt::Display,
    actual: impl std::fmt::Display,
) -> Error {
    Error::TestAssertion(format!(
        "Token {} is '{}', expected '{}'",
        field, actual, expected
    ))
}

pub async fn token_has_name(ctx: &mut ScenarioContext, expected: &str) -> Result<()> {
    let info = current_info(ctx).await?;
    if info.name != expected {
        return Err(mismatch("name", expected, info.name));
    }
    Ok(())
}

pub async fn token_has_symbol(ctx: &mut ScenarioContext, expected: &str) -> Result<()> {
    let info = current_info(ctx).await?;
    if info.symbol != expected {
        return Err(mismatch("symbol", expected, info.symbol));
    }
    Ok(())
}

pub async fn token_has_decimals(ctx: &mut ScenarioContext, expected: u32) -> Result<()> {
    let info = current_info(ctx).await?;
    if info.decimals != expected {
        return Err(mismatch("decimals", expected, info.decimals));
    }
    Ok(())
}

/// Admin key and treasury both belong to the creating account
pub async fn token_is_owned(ctx: &mut ScenarioContext) -> Result<()> {
    let info = current_info(ctx).await?;
    let token = ctx.token()?;
    match &info.admin_key {
        None => {
            return Err(Error::TestAssertion(format!(
                "Token {} has no admin key",
                token.id
            )))
        }
        Some(key) if *key != token.admin_key => {
            return Err(Error::TestAssertion(format!(
                "Token {} admin key {} does not belong to the creating account",
                token.id, key
            )))
        }
        Some(_) => {}
    }
    if info.treasury_account_id != token.treasury {
        return Err(Error::TestAssertion(format!(
            "Token {} treasury is {}, expected {}",
            token.id, info.treasury_account_id, token.treasury
        )));
    }
    Ok(())
}

/// Mint exactly `amount` whole tokens and check the supply grew by it
pub async fn mint_succeeds(ctx: &mut ScenarioContext, amount: u64) -> Result<()> {
    let token = ctx.token()?.clone();
    let raw = token.to_raw(amount)?;

    let before = current_info(ctx).await?.total_supply;
    let mint = TokenMintTransaction::new(token.id, raw);
    ctx.submit(mint.into()).await?.ensure_success()?;
    let after = current_info(ctx).await?.total_supply;

    let expected = before.checked_add(raw).ok_or(Error::AmountOverflow {
        amount,
        decimals: token.decimals,
    })?;
    if after != expected {
        return Err(Error::TestAssertion(format!(
            "Total supply after minting {} is {}, expected {}",
            amount,
            token.format_raw(after),
            token.format_raw(expected)
        )));
    }
    Ok(())
}

pub async fn total_supply_is(ctx: &mut ScenarioContext, expected: u64) -> Result<()> {
    let token = ctx.token()?.clone();
    let info = current_info(ctx).await?;
    if info.total_supply != token.to_raw(expected)? {
        return Err(mismatch(
            "total supply",
            expected,
            token.format_raw(info.total_supply),
        ));
    }
    Ok(())
}

/// Mint one whole token; passes only when the ledger refuses the mint
///
/// Precheck rejections concern the payer (balance, signature, duplicate
/// id), not the token, so they fail the step like any other error.
pub async fn mint_fails(ctx: &mut ScenarioContext) -> Result<()> {
    let token = ctx.token()?.clone();
    let mint = TokenMintTransaction::new(token.id, token.to_raw(1)?);

    let receipt = ctx.submit(mint.into()).await?;
    if receipt.is_success() {
        return Err(Error::ExpectedFailureNotObserved(format!(
            "minting token {}",
            token.id
        )));
    }
    if !MINT_REJECTIONS.contains(&receipt.status) {
        return Err(Error::ReceiptStatus {
            status: receipt.status,
            transaction_id: receipt.transaction_id,
        });
    }
    tracing::info!(status = %receipt.status, "Mint rejected as expected");
    Ok(())
}

/// The scenario token carries this name, symbol and supply
pub async fn token_with_supply(
    ctx: &mut ScenarioContext,
    name: &str,
    symbol: &str,
    supply: u64,
) -> Result<()> {
    let token = ctx.token()?.clone();
    let info = current_info(ctx).await?;
    if info.name != name {
        return Err(mismatch("name", name, info.name));
    }
    if info.symbol != symbol {
        return Err(mismatch("symbol", symbol, info.symbol));
    }
    if info.total_supply != token.to_raw(supply)? {
        return Err(mismatch(
            "total supply",
            supply,
            token.format_raw(info.total_supply),
        ));
    }
    Ok(())
}

// Registered steps

#[given(regex = r"^I create a token named (.+) \(([^()]+)\)$")]
async fn given_mintable(ctx: &mut ScenarioContext, name: String, symbol: String) -> Result<()> {
    within(ctx.step_timeout(), create_token(ctx, &name, &symbol, None)).await
}

#[when(regex = r"^I create a token named (.+) \(([^()]+)\)$")]
async fn when_mintable(ctx: &mut ScenarioContext, name: String, symbol: String) -> Result<()> {
    within(ctx.step_timeout(), create_token(ctx, &name, &symbol, None)).await
}

#[given(regex = r"^I create a fixed supply token named (.+) \(([^()]+)\) with (\d+) tokens$")]
async fn given_fixed_supply(
    ctx: &mut ScenarioContext,
    name: String,
    symbol: String,
    supply: u64,
) -> Result<()> {
    within(ctx.step_timeout(), create_token(ctx, &name, &symbol, Some(supply))).await
}

#[when(regex = r"^I create a fixed supply token named (.+) \(([^()]+)\) with (\d+) tokens$")]
async fn when_fixed_supply(
    ctx: &mut ScenarioContext,
    name: String,
    symbol: String,
    supply: u64,
) -> Result<()> {
    within(ctx.step_timeout(), create_token(ctx, &name, &symbol, Some(supply))).await
}

#[then(regex = r#"^The token has the name "([^"]*)"$"#)]
async fn then_name(ctx: &mut ScenarioContext, name: String) -> Result<()> {
    within(ctx.step_timeout(), token_has_name(ctx, &name)).await
}

#[then(regex = r#"^The token has the symbol "([^"]*)"$"#)]
async fn then_symbol(ctx: &mut ScenarioContext, symbol: String) -> Result<()> {
    within(ctx.step_timeout(), token_has_symbol(ctx, &symbol)).await
}

#[then(regex = r"^The token has (\d+) decimals$")]
async fn then_decimals(ctx: &mut ScenarioContext, decimals: u32) -> Result<()> {
    within(ctx.step_timeout(), token_has_decimals(ctx, decimals)).await
}

#[then(regex = r"^The token is owned by the account$")]
async fn then_owned(ctx: &mut ScenarioContext) -> Result<()> {
    within(ctx.step_timeout(), token_is_owned(ctx)).await
}

#[then(regex = r"^An attempt to mint (\d+) additional tokens succeeds$")]
async fn then_mint_succeeds(ctx: &mut ScenarioContext, amount: u64) -> Result<()> {
    within(ctx.step_timeout(), mint_succeeds(ctx, amount)).await
}

#[then(regex = r"^The total supply of the token is (\d+)$")]
async fn then_total_supply(ctx: &mut ScenarioContext, supply: u64) -> Result<()> {
    within(ctx.step_timeout(), total_supply_is(ctx, supply)).await
}

#[then(regex = r"^An attempt to mint tokens fails$")]
async fn then_mint_fails(ctx: &mut ScenarioContext) -> Result<()> {
    within(ctx.step_timeout(), mint_fails(ctx)).await
}

#[given(regex = r"^A token named (.+) \(([^()]+)\) with (\d+) tokens$")]
async fn given_token_with_supply(
    ctx: &mut ScenarioContext,
    name: String,
    symbol: String,
    supply: u64,
) -> Result<()> {
    within(ctx.step_timeout(), token_with_supply(ctx, &name, &symbol, supply)).await
}
