//! Audit log records.
//!
//! Every event is a flat list of strings led by its name. Amounts in
//! transfer events are raw integers; amounts in trade events are rendered
//! at the decimals of the asset they are denominated in.

use relaydex_types::constants::PRICE_DECIMALS;
use relaydex_types::fixed_point::integer_to_decimal;
use relaydex_types::{Address, AssetArgs, Clear, DelegateWithdrawArgs, Order, OrderId};

pub const DEPOSIT: &str = "deposit";
pub const WITHDRAW: &str = "withdraw";
pub const PREPARE_WITHDRAW: &str = "prepareWithdraw";
pub const COMMIT_WITHDRAW: &str = "commitWithdraw";
pub const TRADE: &str = "trade";
pub const DELEGATE_WITHDRAW: &str = "delegateWithdraw";
pub const CANCEL: &str = "cancel";
pub const SET_RELAY: &str = "setRelay";
pub const DELEGATE_CANCEL: &str = "delegateCancel";

/// `[name, asset, from, to, amount, balance]`
#[must_use]
pub fn transfer(name: &str, args: &AssetArgs, balance: u64) -> Vec<String> {
    vec![
        name.to_owned(),
        args.asset.to_string(),
        args.from.to_string(),
        args.to.to_string(),
        args.amount.to_string(),
        balance.to_string(),
    ]
}

/// `[trade, maker id, taker id, price, trade amount, quote amount,
/// maker fee, taker fee, maker channel fee, taker channel fee]`
#[must_use]
pub fn trade(clear: &Clear, maker: &Order, taker: &Order) -> Vec<String> {
    // Fees are paid in the asset each side receives.
    let (maker_fee_decimals, taker_fee_decimals) = if taker.is_sell() {
        (taker.base_decimals, taker.quote_decimals)
    } else {
        (taker.quote_decimals, taker.base_decimals)
    };
    vec![
        TRADE.to_owned(),
        maker.id.to_string(),
        taker.id.to_string(),
        integer_to_decimal(clear.price, PRICE_DECIMALS),
        integer_to_decimal(clear.trade_amount, taker.base_decimals),
        integer_to_decimal(clear.trade_quote_amount, taker.quote_decimals),
        integer_to_decimal(clear.maker_fee, maker_fee_decimals),
        integer_to_decimal(clear.taker_fee, taker_fee_decimals),
        integer_to_decimal(clear.maker_channel_fee, maker_fee_decimals),
        integer_to_decimal(clear.taker_channel_fee, taker_fee_decimals),
    ]
}

/// `[delegateWithdraw, asset, relay, from, to, extra, paid out, fee, balance]`
#[must_use]
pub fn delegate_withdraw(args: &DelegateWithdrawArgs, balance: u64) -> Vec<String> {
    vec![
        DELEGATE_WITHDRAW.to_owned(),
        args.asset.to_string(),
        args.relay.to_string(),
        args.from.to_string(),
        args.to.to_string(),
        args.extra.clone(),
        args.amount.saturating_sub(args.fee).to_string(),
        args.fee.to_string(),
        balance.to_string(),
    ]
}

#[must_use]
pub fn cancel(user: &Address, id: &OrderId) -> Vec<String> {
    vec![CANCEL.to_owned(), user.to_string(), id.to_string()]
}

#[must_use]
pub fn delegate_cancel(relay: &Address, user: &Address, number: u64) -> Vec<String> {
    vec![
        DELEGATE_CANCEL.to_owned(),
        relay.to_string(),
        user.to_string(),
        number.to_string(),
    ]
}

#[must_use]
pub fn set_relay(target: &Address, value: bool) -> Vec<String> {
    vec![SET_RELAY.to_owned(), target.to_string(), value.to_string()]
}
