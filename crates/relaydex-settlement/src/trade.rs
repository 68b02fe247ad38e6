//! Trade settlement.
//!
//! Applies one [`Clear`] to the ledger:
//! 1. Upsert both order states with the new filled amount
//! 2. Move base and quote between taker and maker, net of fees
//! 3. Pay channel fees
//! 4. Credit system fees to governance (rolling the profit bucket)
//! 5. Check supply conservation over the journal
//!
//! The balance steps run in a fixed order and the first failure aborts.
//! Nothing is undone here; the host transaction discards partial writes.

use relaydex_types::{
    Clear, DexError, Order, OrderState, Result, StateStore, SystemAccounts, TypedStore, keys,
};

use crate::governance::account_for_governance;
use crate::ledger::{BalanceDelta, Ledger};
use crate::supply_conservation::SupplyConservation;

/// What a settled trade did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    pub maker_order: OrderState,
    pub taker_order: OrderState,
    pub clear: Clear,
    /// Every balance change, in application order.
    pub deltas: Vec<BalanceDelta>,
}

/// Settle a matched maker/taker pair.
///
/// Both orders must already carry the fill from matching.
///
/// # Errors
/// - `BalanceNotEnough` if a debit exceeds the balance
/// - `Overflow` if a credit exceeds `u64::MAX` or a fee exceeds its leg
/// - `SupplyInvariantViolation` if the deltas of an asset do not cancel
pub fn settle_trade(
    store: &mut dyn StateStore,
    accounts: &SystemAccounts,
    maker: &Order,
    taker: &Order,
    clear: &Clear,
) -> Result<SettlementReceipt> {
    if !clear.fees_consistent() {
        return Err(DexError::Internal(format!(
            "fee split does not add up: maker {} != {} + {}, taker {} != {} + {}",
            clear.maker_fee,
            clear.maker_channel_fee,
            clear.maker_sys_fee,
            clear.taker_fee,
            clear.taker_channel_fee,
            clear.taker_sys_fee,
        )));
    }

    let maker_order = upsert_order_state(store, maker)?;
    let taker_order = upsert_order_state(store, taker)?;

    let mut ledger = Ledger::new(store);
    let base = &taker.base;
    let quote = &taker.quote;

    // Leg each side receives, and the asset each side's fee is paid in.
    let (taker_pays, taker_gets, taker_pay_amount, taker_get_amount) = if taker.is_sell() {
        (base, quote, clear.trade_amount, clear.trade_quote_amount)
    } else {
        (quote, base, clear.trade_quote_amount, clear.trade_amount)
    };
    let (maker_gets, maker_pays, maker_get_amount, maker_pay_amount) =
        (taker_pays, taker_gets, taker_pay_amount, taker_get_amount);

    // A fee above its leg fails at that leg's credit.
    if taker.is_sell() {
        ledger.debit(&taker.user, taker_pays, taker_pay_amount)?;
        ledger.credit(&taker.user, taker_gets, net_of_fee(taker_get_amount, clear.taker_fee)?)?;
        ledger.credit(&maker.user, maker_gets, net_of_fee(maker_get_amount, clear.maker_fee)?)?;
        ledger.debit(&maker.user, maker_pays, maker_pay_amount)?;
    } else {
        ledger.credit(&taker.user, taker_gets, net_of_fee(taker_get_amount, clear.taker_fee)?)?;
        ledger.debit(&taker.user, taker_pays, taker_pay_amount)?;
        ledger.debit(&maker.user, maker_pays, maker_pay_amount)?;
        ledger.credit(&maker.user, maker_gets, net_of_fee(maker_get_amount, clear.maker_fee)?)?;
    }

    ledger.credit_nonzero(&taker.channel, taker_gets, clear.taker_channel_fee)?;
    ledger.credit_nonzero(&maker.channel, maker_gets, clear.maker_channel_fee)?;

    if clear.taker_sys_fee > 0 {
        account_for_governance(&mut ledger, &accounts.governance, taker_gets, clear.taker_sys_fee)?;
    }
    if clear.maker_sys_fee > 0 {
        account_for_governance(&mut ledger, &accounts.governance, maker_gets, clear.maker_sys_fee)?;
    }

    let deltas = ledger.into_journal();
    SupplyConservation::from_journal(&deltas).verify()?;

    tracing::info!(
        maker = %maker.id.short(),
        taker = %taker.id.short(),
        base = %base,
        quote = %quote,
        trade_amount = clear.trade_amount,
        quote_amount = clear.trade_quote_amount,
        maker_done = maker.is_fully_filled(),
        taker_done = taker.is_fully_filled(),
        "Trade settled"
    );

    Ok(SettlementReceipt {
        maker_order,
        taker_order,
        clear: *clear,
        deltas,
    })
}

fn net_of_fee(amount: u64, fee: u64) -> Result<u64> {
    amount.checked_sub(fee).ok_or(DexError::Overflow {
        context: "fee exceeds received amount",
    })
}

fn upsert_order_state(store: &mut dyn StateStore, order: &Order) -> Result<OrderState> {
    let key = keys::order_state(&order.id);
    let mut state: OrderState = store.load_or_default(&key)?;
    state.user = order.user;
    state.filled = order.filled;
    store.save(&key, &state)?;
    Ok(state)
}
