//! Deposits, withdrawals and the two-phase withdraw.
//!
//! Per (user, asset) the two-phase withdraw moves `NONE -> PREPARED` on
//! `prepare_withdraw` and back to `NONE` on `commit_withdraw`. Preparing
//! again while prepared adds to the applied amount and restarts the wait.
//!
//! These functions perform the business checks only. Witness, relay and
//! allow-list checks belong to the caller.

use relaydex_types::{
    Address, AssetArgs, CommitWithdrawArgs, DelegateWithdrawArgs, DexContext, DexError,
    PrepareWithdrawState, Result, StateStore, TypedStore, keys,
};

use crate::idempotency;
use crate::ledger::Ledger;

/// Outcome of a committed two-phase withdraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Amount actually paid out (the applied amount capped at the balance).
    pub withdrawn: u64,
    /// Balance left in the dex.
    pub remaining: u64,
}

/// Move `amount` from the `from` wallet into the dex and credit `to`.
/// Returns the new balance of `to`.
pub fn deposit(ctx: &mut DexContext<'_>, args: &AssetArgs) -> Result<u64> {
    let dex = ctx.config.accounts.dex;
    ctx.modules
        .transfer(&args.asset, &args.from, &dex, args.amount)?;
    let balance = Ledger::new(&mut *ctx.store).credit(&args.to, &args.asset, args.amount)?;
    tracing::info!(
        asset = %args.asset,
        from = %args.from,
        to = %args.to,
        amount = args.amount,
        balance,
        "Deposit"
    );
    Ok(balance)
}

/// Pay `amount` out of the dex to the `to` wallet and debit `from`.
/// Returns the remaining balance of `from`.
pub fn withdraw(ctx: &mut DexContext<'_>, args: &AssetArgs) -> Result<u64> {
    let dex = ctx.config.accounts.dex;
    ctx.modules
        .transfer(&args.asset, &dex, &args.to, args.amount)?;
    let balance = Ledger::new(&mut *ctx.store).debit(&args.from, &args.asset, args.amount)?;
    tracing::info!(
        asset = %args.asset,
        from = %args.from,
        to = %args.to,
        amount = args.amount,
        balance,
        "Withdraw"
    );
    Ok(balance)
}

/// Execute a user-signed withdrawal submitted by a relay. The relay earns
/// `fee` inside the dex; `to` receives `amount - fee` in its wallet.
/// Returns the remaining balance of `from`.
///
/// # Errors
/// - `WithdrawFeeTooHigh` if `fee > amount`
/// - `WithdrawAlreadySubmitted` if this exact request was executed before
/// - `SigKeySetInvalid` / `SigUserMismatch` / `SigVerifyFailed` for a bad signature
/// - `BalanceNotEnough` if `from` cannot cover `amount`
pub fn delegate_withdraw(ctx: &mut DexContext<'_>, args: &DelegateWithdrawArgs) -> Result<u64> {
    let payout = args
        .amount
        .checked_sub(args.fee)
        .ok_or(DexError::WithdrawFeeTooHigh {
            amount: args.amount,
            fee: args.fee,
        })?;

    let hash = args.hash();
    idempotency::ensure_not_done(&*ctx.store, &hash)?;

    if let Err(err) = args.sig.ensure_signer(&args.from) {
        tracing::warn!(expected = %args.from, error = %err, "Delegate withdraw signer mismatch");
        return Err(err);
    }
    if !args.sig.verify(hash.as_bytes()) {
        tracing::warn!(from = %args.from, hash = %hash, "Delegate withdraw signature rejected");
        return Err(DexError::SigVerifyFailed);
    }

    let dex = ctx.config.accounts.dex;
    ctx.modules.transfer(&args.asset, &dex, &args.to, payout)?;
    let mut ledger = Ledger::new(&mut *ctx.store);
    ledger.credit(&args.relay, &args.asset, args.fee)?;
    let balance = ledger.debit(&args.from, &args.asset, args.amount)?;
    idempotency::mark_done(&mut *ctx.store, &hash)?;

    tracing::info!(
        asset = %args.asset,
        relay = %args.relay,
        from = %args.from,
        to = %args.to,
        amount = payout,
        fee = args.fee,
        balance,
        "Delegate withdraw"
    );
    Ok(balance)
}

/// Apply for a withdrawal to self. Returns the cumulative applied amount,
/// which may exceed the balance after later trades.
///
/// # Errors
/// - `InvalidArgs` if `from != to`
/// - `BalanceNotEnough` if the balance cannot cover this request
/// - `Overflow` if the applied amount would exceed `u64::MAX`
pub fn prepare_withdraw(ctx: &mut DexContext<'_>, args: &AssetArgs) -> Result<u64> {
    if args.from != args.to {
        return Err(DexError::invalid_args("withdraw can only be prepared to self"));
    }
    let balance = crate::ledger::balance_of(&*ctx.store, &args.from, &args.asset)?;
    if balance < args.amount {
        return Err(DexError::BalanceNotEnough {
            needed: args.amount,
            available: balance,
        });
    }

    let key = keys::prepare_withdraw(&args.from, &args.asset);
    let mut state: PrepareWithdrawState = ctx.store.load_or_default(&key)?;
    state.amount = state
        .amount
        .checked_add(args.amount)
        .ok_or(DexError::Overflow {
            context: "prepared withdraw amount",
        })?;
    state.time = ctx.exec.timestamp;
    ctx.store.save(&key, &state)?;

    tracing::info!(
        asset = %args.asset,
        from = %args.from,
        applied = state.amount,
        at = state.time,
        "Withdraw prepared"
    );
    Ok(state.amount)
}

/// Pay out a prepared withdrawal once the wait time has passed.
///
/// The applied amount is capped at the current balance and the prepare
/// record is cleared either way.
///
/// # Errors
/// - `ApplyWaitNotEnough` before `time + withdraw_apply_wait_time`
/// - `WithdrawZero` if nothing was prepared
pub fn commit_withdraw(ctx: &mut DexContext<'_>, args: &CommitWithdrawArgs) -> Result<CommitOutcome> {
    let key = keys::prepare_withdraw(&args.from, &args.asset);
    let state: PrepareWithdrawState = ctx.store.load_or_default(&key)?;

    let now = ctx.exec.timestamp;
    let ready_at = state.ready_at(ctx.config.params.withdraw_apply_wait_time);
    if now < ready_at {
        return Err(DexError::ApplyWaitNotEnough { ready_at, now });
    }
    if state.amount == 0 {
        return Err(DexError::WithdrawZero);
    }

    let balance = crate::ledger::balance_of(&*ctx.store, &args.from, &args.asset)?;
    let withdrawn = state.amount.min(balance);
    ctx.store.delete(&key)?;

    let remaining = if withdrawn == 0 {
        balance
    } else {
        withdraw(
            ctx,
            &AssetArgs {
                asset: args.asset,
                from: args.from,
                to: args.from,
                amount: withdrawn,
            },
        )?
    };

    if withdrawn < state.amount {
        tracing::debug!(
            from = %args.from,
            applied = state.amount,
            withdrawn,
            "Prepared withdraw capped at balance"
        );
    }
    Ok(CommitOutcome {
        withdrawn,
        remaining,
    })
}

/// The pending two-phase withdraw of `(from, asset)`, if any.
pub fn prepare_withdraw_state(
    store: &dyn StateStore,
    from: &Address,
    asset: &Address,
) -> Result<Option<PrepareWithdrawState>> {
    store.load(&keys::prepare_withdraw(from, asset))
}
