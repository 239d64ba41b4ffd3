//! Transfer steps: building, submitting and paying for token transfers.

use cucumber::{given, then, when};

use crate::common::config::Role;
use crate::common::{Error, Result};
use crate::ledger::{Transaction, TransferTransaction};
use crate::testing::ScenarioContext;

use super::within;

/// Stage a transfer of `amount` whole tokens signed by the sender
pub async fn build_transfer(
    ctx: &mut ScenarioContext,
    from: Role,
    amount: u64,
    symbol: &str,
    to: Role,
) -> Result<()> {
    let token = ctx.token()?;
    token.ensure_symbol(symbol)?;
    let raw = token.to_raw_signed(amount)?;
    let token_id = token.id;

    let sender = ctx.account(from)?;
    let receiver = ctx.account(to)?;

    let transfer = TransferTransaction::new()
        .token_transfer(token_id, sender.id, -raw)
        .token_transfer(token_id, receiver.id, raw);
    let transaction = Transaction::from(transfer).sign(&sender.private_key);

    tracing::debug!(from = %sender.id, to = %receiver.id, amount, "Transfer staged");
    ctx.stage(transaction);
    Ok(())
}

/// Submit the staged transaction with `role` as operator and fee payer
pub async fn submit_transaction(ctx: &mut ScenarioContext, role: Role) -> Result<()> {
    let transaction = ctx.take_pending()?;
    ctx.use_operator(role)?;

    let receipt = ctx.submit(transaction).await?.ensure_success()?;
    tracing::info!(role = %role, transaction = %receipt.transaction_id, "Transfer succeeded");
    Ok(())
}

pub async fn paid_fee(ctx: &mut ScenarioContext, role: Role) -> Result<()> {
    let account = ctx.account(role)?;
    let payer = ctx.last_submission()?.transaction_id.account_id;

    if payer != account.id {
        return Err(Error::TestAssertion(format!(
            "Transaction fee was paid by {}, expected the {} account ({})",
            payer, role, account.id
        )));
    }
    Ok(())
}

/// Stage `out_each` out of first and second, `to_third` and `to_fourth` in
///
/// The amounts must net to zero; nothing is staged otherwise.
pub async fn build_distribution(
    ctx: &mut ScenarioContext,
    out_each: u64,
    to_third: u64,
    to_fourth: u64,
    symbols: [&str; 3],
) -> Result<()> {
    let token = ctx.token()?;
    for symbol in symbols {
        token.ensure_symbol(symbol)?;
    }

    let out = token.to_raw_signed(out_each)?;
    let third_in = token.to_raw_signed(to_third)?;
    let fourth_in = token.to_raw_signed(to_fourth)?;
    let token_id = token.id;

    let net = i128::from(third_in) + i128::from(fourth_in) - 2 * i128::from(out);
    if net != 0 {
        return Err(Error::UnbalancedTransfer {
            token: token_id.to_string(),
            net: net.clamp(i64::MIN.into(), i64::MAX.into()) as i64,
        });
    }

    let first = ctx.account(Role::First)?;
    let second = ctx.account(Role::Second)?;
    let third = ctx.account(Role::Third)?;
    let fourth = ctx.account(Role::Fourth)?;

    let transfer = TransferTransaction::new()
        .token_transfer(token_id, first.id, -out)
        .token_transfer(token_id, second.id, -out)
        .token_transfer(token_id, third.id, third_in)
        .token_transfer(token_id, fourth.id, fourth_in);
    let transaction = Transaction::from(transfer)
        .sign(&first.private_key)
        .sign(&second.private_key);

    ctx.stage(transaction);
    Ok(())
}

// Registered steps

#[given(
    regex = r"^The (first|second|third|fourth) account creates a transaction to transfer (\d+) (\w+) tokens to the (first|second|third|fourth) account$"
)]
async fn given_transfer(
    ctx: &mut ScenarioContext,
    from: Role,
    amount: u64,
    symbol: String,
    to: Role,
) -> Result<()> {
    within(ctx.step_timeout(), build_transfer(ctx, from, amount, &symbol, to)).await
}

#[when(
    regex = r"^The (first|second|third|fourth) account creates a transaction to transfer (\d+) (\w+) tokens to the (first|second|third|fourth) account$"
)]
async fn when_transfer(
    ctx: &mut ScenarioContext,
    from: Role,
    amount: u64,
    symbol: String,
    to: Role,
) -> Result<()> {
    within(ctx.step_timeout(), build_transfer(ctx, from, amount, &symbol, to)).await
}

#[given(regex = r"^The (first|second|third|fourth) account submits the transaction$")]
async fn given_submits(ctx: &mut ScenarioContext, role: Role) -> Result<()> {
    within(ctx.step_timeout(), submit_transaction(ctx, role)).await
}

#[when(regex = r"^The (first|second|third|fourth) account submits the transaction$")]
async fn when_submits(ctx: &mut ScenarioContext, role: Role) -> Result<()> {
    within(ctx.step_timeout(), submit_transaction(ctx, role)).await
}

#[then(regex = r"^The (first|second|third|fourth) account has paid for the transaction fee$")]
async fn then_paid_fee(ctx: &mut ScenarioContext, role: Role) -> Result<()> {
    within(ctx.step_timeout(), paid_fee(ctx, role)).await
}

#[given(
    regex = r"^A transaction is created to transfer (\d+) (\w+) tokens out of the first and second account and (\d+) (\w+) tokens into the third account and (\d+) (\w+) tokens into the fourth account$"
)]
async fn given_distribution(
    ctx: &mut ScenarioContext,
    out_each: u64,
    out_symbol: String,
    to_third: u64,
    third_symbol: String,
    to_fourth: u64,
    fourth_symbol: String,
) -> Result<()> {
    let symbols = [out_symbol.as_str(), third_symbol.as_str(), fourth_symbol.as_str()];
    within(
        ctx.step_timeout(),
        build_distribution(ctx, out_each, to_third, to_fourth, symbols),
    )
    .await
}

#[when(
    regex = r"^A transaction is created to transfer (\d+) (\w+) tokens out of the first and second account and (\d+) (\w+) tokens into the third account and (\d+) (\w+) tokens into the fourth account$"
)]
async fn when_distribution(
    ctx: &mut ScenarioContext,
    out_each: u64,
    out_symbol: String,
    to_third: u64,
    third_symbol: String,
    to_fourth: u64,
    fourth_symbol: String,
) -> Result<()> {
    let symbols = [out_symbol.as_str(), third_symbol.as_str(), fourth_symbol.as_str()];
    within(
        ctx.step_timeout(),
        build_distribution(ctx, out_each, to_third, to_fourth, symbols),
    )
    .await
}
