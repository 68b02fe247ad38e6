//! Rebuild working [`Order`]s and the [`Relay`] instruction from signed
//! string payloads.
//!
//! Prices are always parsed at 8 decimals, amounts at the base asset's
//! decimals. The filled amount comes from the persisted [`OrderState`].

use relaydex_types::constants::PRICE_DECIMALS;
use relaydex_types::fixed_point::{decimal_to_integer, precision};
use relaydex_types::{
    DexError, ExternalModules, Order, OrderState, RawOrderData, Relay, RelayArgs, Result,
    StateStore, TypedStore, keys,
};

/// Build the working order for `raw`.
///
/// # Errors
/// - `InvalidArgs` for a malformed pair
/// - `InvalidNumber` / `Overflow` for unparseable price or amount
/// - whatever the asset module returns for an unknown asset
/// - `Internal` if the stored fill exceeds the order amount
pub fn reconstruct_order(
    raw: &RawOrderData,
    store: &dyn StateStore,
    modules: &dyn ExternalModules,
) -> Result<Order> {
    let (base, quote) = raw.pair_assets()?;
    let base_decimals = modules.asset_decimals(&base)?;
    let quote_decimals = modules.asset_decimals(&quote)?;

    let price = decimal_to_integer(&raw.price, PRICE_DECIMALS)?;
    let amount = decimal_to_integer(&raw.amount, base_decimals)?;

    let id = raw.order_id();
    let state: OrderState = store.load_or_default(&keys::order_state(&id))?;
    let surplus = amount.checked_sub(state.filled).ok_or_else(|| {
        DexError::Internal(format!(
            "order {id} filled {} exceeds amount {amount}",
            state.filled
        ))
    })?;

    Ok(Order {
        id,
        user: raw.user,
        channel: raw.channel,
        side: raw.side,
        base,
        quote,
        price,
        amount,
        maker_fee_rate: raw.maker_fee_rate,
        taker_fee_rate: raw.taker_fee_rate,
        base_decimals,
        quote_decimals,
        base_precision: precision(base_decimals)?,
        quote_precision: precision(quote_decimals)?,
        filled: state.filled,
        surplus,
    })
}

/// Parse the relay instruction against the taker order.
///
/// The trade amount is in base units. Each advisory fee is in the asset its
/// side receives: when the taker sells, the maker gets base and the taker
/// gets quote, and the other way round when the taker buys.
pub fn parse_relay(args: &RelayArgs, taker: &Order) -> Result<Relay> {
    let (maker_fee_decimals, taker_fee_decimals) = if taker.is_sell() {
        (taker.base_decimals, taker.quote_decimals)
    } else {
        (taker.quote_decimals, taker.base_decimals)
    };
    Ok(Relay {
        from: args.from,
        trade_amount: decimal_to_integer(&args.trade_amount, taker.base_decimals)?,
        maker_fee: decimal_to_integer(&args.maker_fee, maker_fee_decimals)?,
        taker_fee: decimal_to_integer(&args.taker_fee, taker_fee_decimals)?,
    })
}
