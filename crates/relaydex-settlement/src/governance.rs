//! Governance fee accrual.
//!
//! System fees are credited to the governance account and bucketed per
//! asset into a [`SpProfit`] record keyed by round. `epoch_end` moves the
//! round forward; `claim_sp_profit` sweeps everything from finished rounds
//! out of the dex.

use relaydex_types::{
    Address, AssetArgs, DexContext, Result, SpProfit, StateStore, TypedStore, keys,
};

use crate::ledger::Ledger;
use crate::withdraw::withdraw;

/// The round set by the last `epoch_end` (0 before the first).
pub fn current_round(store: &dyn StateStore) -> Result<u64> {
    store.load_or_default(&keys::current_round())
}

/// Persist `round` as the current round.
pub fn epoch_end(store: &mut dyn StateStore, round: u64) -> Result<()> {
    store.save(&keys::current_round(), &round)?;
    tracing::info!(round, "Epoch ended");
    Ok(())
}

/// Credit a system fee to `governance` and roll the asset's profit record.
pub fn account_for_governance(
    ledger: &mut Ledger<'_>,
    governance: &Address,
    asset: &Address,
    amount: u64,
) -> Result<()> {
    ledger.credit(governance, asset, amount)?;

    let store = ledger.store();
    let round = current_round(&*store)?;
    let key = keys::sp_profit(asset);
    let mut profit: SpProfit = store.load_or_default(&key)?;
    profit.accrue(round, amount)?;
    store.save(&key, &profit)
}

/// Withdraw the claimable system-fee profit of `asset` to the governance
/// wallet. Returns the claimed amount; `0` changes nothing.
pub fn claim_sp_profit(ctx: &mut DexContext<'_>, asset: &Address) -> Result<u64> {
    let round = current_round(&*ctx.store)?;
    let key = keys::sp_profit(asset);
    let mut profit: SpProfit = ctx.store.load_or_default(&key)?;
    let claimed = profit.claim(round)?;
    if claimed == 0 {
        return Ok(0);
    }

    let governance = ctx.config.accounts.governance;
    withdraw(
        ctx,
        &AssetArgs {
            asset: *asset,
            from: governance,
            to: governance,
            amount: claimed,
        },
    )?;

    if profit.is_empty() {
        ctx.store.delete(&key)?;
    } else {
        ctx.store.save(&key, &profit)?;
    }
    tracing::info!(asset = %asset, round, claimed, "System fee profit claimed");
    Ok(claimed)
}

/// Read the profit record of `asset`.
pub fn sp_profit(store: &dyn StateStore, asset: &Address) -> Result<Option<SpProfit>> {
    store.load(&keys::sp_profit(asset))
}
