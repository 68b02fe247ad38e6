//! Order model: the signed payload, the reconstructed working order and the
//! persisted per-order state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_FEE_RATE, PAIR_SEPARATOR};
use crate::error::{DexError, Result};
use crate::ids::{Address, OrderId};
use crate::signature::MultiSig;

/// Buy or sell (from the perspective of the base asset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RawOrderData
// ---------------------------------------------------------------------------

/// The fields a user signs. Prices and amounts are decimal strings; they are
/// scaled only once the asset decimals are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOrderData {
    pub chain_id: u32,
    pub user: Address,
    /// `BASE_QUOTE`, each side a hex asset address.
    pub pair: String,
    pub side: OrderSide,
    pub price: String,
    pub amount: String,
    pub channel: Address,
    /// Channel fee rate charged when this order makes (basis points).
    pub maker_fee_rate: u32,
    /// Channel fee rate charged when this order takes (basis points).
    pub taker_fee_rate: u32,
    /// Unix timestamp; `0` never expires.
    pub expire: u64,
    /// Per-user sequence number; invalidated by delegated cancel.
    pub salt: u64,
}

impl RawOrderData {
    /// `key=value` pairs joined by `&`, keys in lexicographic order.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        format!(
            "amount={}&chain_id={}&channel={}&expire={}&maker_fee_rate={}&pair={}&price={}&salt={}&side={}&taker_fee_rate={}&user={}",
            self.amount,
            self.chain_id,
            self.channel,
            self.expire,
            self.maker_fee_rate,
            self.pair,
            self.price,
            self.salt,
            self.side,
            self.taker_fee_rate,
            self.user,
        )
    }

    /// Content hash of the order; the signature covers these bytes.
    #[must_use]
    pub fn order_id(&self) -> OrderId {
        OrderId::digest(&self.canonical_string())
    }

    /// Split the pair into `(base, quote)`.
    ///
    /// # Errors
    /// `InvalidArgs` unless the pair is exactly two valid addresses.
    pub fn pair_assets(&self) -> Result<(Address, Address)> {
        let (base, quote) = self
            .pair
            .split_once(PAIR_SEPARATOR)
            .ok_or_else(|| DexError::invalid_args(format!("bad pair {:?}", self.pair)))?;
        Ok((base.parse()?, quote.parse()?))
    }

    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        self.expire != 0 && now >= self.expire
    }

    /// First channel fee rate above 100%, if any.
    #[must_use]
    pub fn illegal_fee_rate(&self) -> Option<u32> {
        [self.maker_fee_rate, self.taker_fee_rate]
            .into_iter()
            .find(|rate| *rate > MAX_FEE_RATE)
    }
}

/// Build the pair string for two assets.
#[must_use]
pub fn pair_string(base: &Address, quote: &Address) -> String {
    format!("{base}{PAIR_SEPARATOR}{quote}")
}

/// A signed order as submitted by a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderData {
    pub raw: RawOrderData,
    pub sig: MultiSig,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// Working copy of an order, rebuilt for every call from [`OrderData`] and
/// the persisted [`OrderState`]. All amounts are scaled integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user: Address,
    pub channel: Address,
    pub side: OrderSide,
    pub base: Address,
    pub quote: Address,
    /// Scaled by `PRICE_SCALE`.
    pub price: u64,
    /// Scaled by `base_precision`.
    pub amount: u64,
    pub maker_fee_rate: u32,
    pub taker_fee_rate: u32,
    pub base_decimals: u32,
    pub quote_decimals: u32,
    pub base_precision: u64,
    pub quote_precision: u64,
    pub filled: u64,
    /// Always `amount - filled`.
    pub surplus: u64,
}

impl Order {
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.side == OrderSide::Sell
    }

    #[must_use]
    pub fn is_fully_filled(&self) -> bool {
        self.surplus == 0
    }

    /// Move `amount` from surplus to filled.
    ///
    /// # Errors
    /// `SurplusNotEnough` if `amount` exceeds the surplus.
    pub fn fill(&mut self, amount: u64) -> Result<()> {
        let surplus = self
            .surplus
            .checked_sub(amount)
            .ok_or(DexError::SurplusNotEnough {
                requested: amount,
                available: self.surplus,
            })?;
        let filled = self.filled.checked_add(amount).ok_or(DexError::Overflow {
            context: "order fill",
        })?;
        self.surplus = surplus;
        self.filled = filled;
        Ok(())
    }
}

/// Persisted per-order state, keyed by [`OrderId`]. Never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderState {
    pub user: Address,
    pub filled: u64,
    pub canceled: bool,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// An 8/8-decimal order with scaled `price` and `amount`, nothing filled.
    pub fn dummy(side: OrderSide, price: u64, amount: u64) -> Self {
        let precision = crate::constants::PRICE_SCALE;
        Self {
            id: OrderId::digest(&format!("{side}:{price}:{amount}")),
            user: Address([0x11; 20]),
            channel: Address([0x22; 20]),
            side,
            base: Address([0xb0; 20]),
            quote: Address([0xc0; 20]),
            price,
            amount,
            maker_fee_rate: 0,
            taker_fee_rate: 0,
            base_decimals: 8,
            quote_decimals: 8,
            base_precision: precision,
            quote_precision: precision,
            filled: 0,
            surplus: amount,
        }
    }
}
