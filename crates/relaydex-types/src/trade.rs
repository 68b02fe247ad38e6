//! Trade submission and clearing result.

use serde::{Deserialize, Serialize};

use crate::ids::Address;
use crate::order::OrderData;

/// Relay instruction as submitted: amounts are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayArgs {
    /// The submitting relay account.
    pub from: Address,
    /// Requested fill, in base-asset units.
    pub trade_amount: String,
    /// Advisory maker fee, in the asset the maker receives.
    pub maker_fee: String,
    /// Advisory taker fee, in the asset the taker receives.
    pub taker_fee: String,
}

/// Arguments of a `trade` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeArgs {
    pub maker: OrderData,
    pub taker: OrderData,
    pub relay: RelayArgs,
}

/// Parsed relay instruction. The fees are recorded for audit only; the
/// settled fees come from the fee engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relay {
    pub from: Address,
    pub trade_amount: u64,
    pub maker_fee: u64,
    pub taker_fee: u64,
}

/// Outcome of matching one maker/taker pair.
///
/// `maker_fee == maker_channel_fee + maker_sys_fee`, same for the taker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clear {
    /// Maker price, scaled by `PRICE_SCALE`.
    pub price: u64,
    /// Base-asset fill.
    pub trade_amount: u64,
    /// Quote-asset fill.
    pub trade_quote_amount: u64,
    pub maker_fee: u64,
    pub taker_fee: u64,
    pub maker_channel_fee: u64,
    pub taker_channel_fee: u64,
    pub maker_sys_fee: u64,
    pub taker_sys_fee: u64,
}

impl Clear {
    #[must_use]
    pub fn fees_consistent(&self) -> bool {
        self.maker_channel_fee.checked_add(self.maker_sys_fee) == Some(self.maker_fee)
            && self.taker_channel_fee.checked_add(self.taker_sys_fee) == Some(self.taker_fee)
    }
}
