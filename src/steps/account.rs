//! Account steps: operator selection, hbar preconditions, token holdings
//! and token association.

use cucumber::{given, then, when};

use crate::common::config::Role;
use crate::common::{Error, Result};
use crate::ledger::{Hbar, TokenAssociateTransaction, Transaction};
use crate::testing::ScenarioContext;

use super::within;

/// How an observed amount is compared to the expected one
#[derive(Debug, Clone, Copy)]
enum Expect {
    AtLeast,
    MoreThan,
    Exactly,
}

impl Expect {
    fn holds<T: PartialOrd>(self, observed: T, expected: T) -> bool {
        match self {
            Expect::AtLeast => observed >= expected,
            Expect::MoreThan => observed > expected,
            Expect::Exactly => observed == expected,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Expect::AtLeast => "at least",
            Expect::MoreThan => "more than",
            Expect::Exactly => "exactly",
        }
    }
}

async fn check_hbar(ctx: &ScenarioContext, role: Role, expect: Expect, hbar: i64) -> Result<()> {
    let account = ctx.account(role)?;
    let balance = ctx.client()?.account_balance(&account.id).await?;
    tracing::debug!(account = %account.id, balance = %balance.hbars, "Hbar balance");

    if expect.holds(balance.hbars, Hbar::from_hbar(hbar)) {
        Ok(())
    } else {
        Err(Error::TestAssertion(format!(
            "The {} account ({}) has {}, expected {} {} hbar",
            role,
            account.id,
            balance.hbars,
            expect.describe(),
            hbar
        )))
    }
}

/// Check the role's balance of the scenario token, in whole tokens
async fn check_holding(
    ctx: &ScenarioContext,
    role: Role,
    expect: Expect,
    amount: u64,
    symbol: &str,
) -> Result<()> {
    let token = ctx.token()?;
    token.ensure_symbol(symbol)?;
    let account = ctx.account(role)?;

    let info = ctx.client()?.account_info(&account.id).await?;
    let relationship = info
        .token_relationships
        .get(&token.id)
        .ok_or_else(|| Error::no_relationship(account.id, token.id))?;

    let expected = token.to_raw(amount)?;
    if expect.holds(relationship.balance, expected) {
        Ok(())
    } else {
        Err(Error::TestAssertion(format!(
            "The {} account ({}) holds {} {}, expected {} {}",
            role,
            account.id,
            token.format_raw(relationship.balance),
            token.symbol,
            expect.describe(),
            amount
        )))
    }
}

/// Make the first account the operator; it must hold more than `hbar`
pub async fn first_account_with_hbar(ctx: &mut ScenarioContext, hbar: i64) -> Result<()> {
    ctx.use_operator(Role::First)?;
    check_hbar(ctx, Role::First, Expect::MoreThan, hbar).await
}

pub async fn second_account(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.use_operator(Role::Second)?;
    Ok(())
}

/// The first account holds at least `amount`, every other role exactly
pub async fn account_holds(
    ctx: &mut ScenarioContext,
    role: Role,
    amount: u64,
    symbol: &str,
) -> Result<()> {
    let expect = match role {
        Role::First => Expect::AtLeast,
        _ => Expect::Exactly,
    };
    check_holding(ctx, role, expect, amount, symbol).await
}

/// Associate the role's account with the scenario token, signed by it
pub async fn associate_account(ctx: &mut ScenarioContext, role: Role) -> Result<()> {
    let token_id = ctx.token()?.id;
    let account = ctx.account(role)?;

    let transaction =
        Transaction::from(TokenAssociateTransaction::new(account.id).token_id(token_id))
            .sign(&account.private_key);

    let receipt = ctx.submit(transaction).await?.ensure_success()?;
    tracing::info!(account = %account.id, token = %token_id, transaction = %receipt.transaction_id, "Account associated");
    Ok(())
}

pub async fn first_account_with_hbar_and_tokens(
    ctx: &mut ScenarioContext,
    hbar: i64,
    amount: u64,
    symbol: &str,
) -> Result<()> {
    ctx.use_operator(Role::First)?;
    check_hbar(ctx, Role::First, Expect::MoreThan, hbar).await?;
    check_holding(ctx, Role::First, Expect::AtLeast, amount, symbol).await
}

pub async fn account_with_hbar_and_tokens(
    ctx: &mut ScenarioContext,
    role: Role,
    hbar: i64,
    amount: u64,
    symbol: &str,
) -> Result<()> {
    check_hbar(ctx, role, Expect::AtLeast, hbar).await?;
    check_holding(ctx, role, Expect::Exactly, amount, symbol).await
}

// Registered steps

#[given(regex = r"^A (?:Hedera|first hedera) account with more than (\d+) hbar$")]
async fn given_first_account(ctx: &mut ScenarioContext, hbar: i64) -> Result<()> {
    within(ctx.step_timeout(), first_account_with_hbar(ctx, hbar)).await
}

#[given(regex = r"^A second Hedera account$")]
async fn given_second_account(ctx: &mut ScenarioContext) -> Result<()> {
    within(ctx.step_timeout(), second_account(ctx)).await
}

#[given(regex = r"^The (first|second|third|fourth) account holds (\d+) (\w+) tokens$")]
async fn given_holds(ctx: &mut ScenarioContext, role: Role, amount: u64, symbol: String) -> Result<()> {
    within(ctx.step_timeout(), account_holds(ctx, role, amount, &symbol)).await
}

#[then(regex = r"^The (first|second|third|fourth) account holds (\d+) (\w+) tokens$")]
async fn then_holds(ctx: &mut ScenarioContext, role: Role, amount: u64, symbol: String) -> Result<()> {
    within(ctx.step_timeout(), account_holds(ctx, role, amount, &symbol)).await
}

#[given(regex = r"^The (first|second|third|fourth) account is associated with the token$")]
async fn given_associated(ctx: &mut ScenarioContext, role: Role) -> Result<()> {
    within(ctx.step_timeout(), associate_account(ctx, role)).await
}

#[when(regex = r"^The (first|second|third|fourth) account is associated with the token$")]
async fn when_associated(ctx: &mut ScenarioContext, role: Role) -> Result<()> {
    within(ctx.step_timeout(), associate_account(ctx, role)).await
}

#[given(regex = r"^A first hedera account with more than (\d+) hbar and (\d+) (\w+) tokens$")]
async fn given_first_account_holding(
    ctx: &mut ScenarioContext,
    hbar: i64,
    amount: u64,
    symbol: String,
) -> Result<()> {
    within(
        ctx.step_timeout(),
        first_account_with_hbar_and_tokens(ctx, hbar, amount, &symbol),
    )
    .await
}

#[given(regex = r"^A (second|third|fourth) Hedera account with (\d+) hbar and (\d+) (\w+) tokens$")]
async fn given_account_holding(
    ctx: &mut ScenarioContext,
    role: Role,
    hbar: i64,
    amount: u64,
    symbol: String,
) -> Result<()> {
    within(
        ctx.step_timeout(),
        account_with_hbar_and_tokens(ctx, role, hbar, amount, &symbol),
    )
    .await
}
