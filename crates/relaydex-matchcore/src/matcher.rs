//! Pure single-pair matcher.
//!
//! ```text
//! match_order(&mut maker, &mut taker, &relay) -> Clear
//! ```
//!
//! No store access and no fees: the result carries only the price and the
//! two fill amounts. The maker's price is authoritative regardless of which
//! side takes.

use relaydex_types::{Clear, DexError, Order, Relay, Result, fixed_point};

/// `true` when the two limit prices cross.
#[must_use]
pub fn prices_cross(maker: &Order, taker: &Order) -> bool {
    if maker.is_sell() {
        maker.price <= taker.price
    } else {
        maker.price >= taker.price
    }
}

/// Fill `relay.trade_amount` of both orders at the maker's price.
///
/// ## Algorithm
///
/// 1. Prices must cross (`PriceNotMatch`)
/// 2. The requested amount must fit both surpluses (`SurplusNotEnough`)
/// 3. Quote amount = `⌊price · amount · quote_prec / (1e8 · base_prec)⌋`,
///    rejected when zero (`QuoteAmountZero`) or above `u64` (`Overflow`)
/// 4. Both orders move the amount from surplus to filled, in memory
///
/// On error neither order is modified.
pub fn match_order(maker: &mut Order, taker: &mut Order, relay: &Relay) -> Result<Clear> {
    if !prices_cross(maker, taker) {
        tracing::warn!(
            maker = %maker.id,
            taker = %taker.id,
            maker_price = maker.price,
            taker_price = taker.price,
            "Prices do not cross"
        );
        return Err(DexError::PriceNotMatch {
            maker_price: maker.price,
            taker_price: taker.price,
        });
    }

    let trade_amount = relay.trade_amount;
    for order in [&*maker, &*taker] {
        if trade_amount > order.surplus {
            return Err(DexError::SurplusNotEnough {
                requested: trade_amount,
                available: order.surplus,
            });
        }
    }

    let trade_quote_amount = fixed_point::quote_amount(
        maker.price,
        trade_amount,
        maker.base_precision,
        maker.quote_precision,
    )?;
    if trade_quote_amount == 0 {
        return Err(DexError::QuoteAmountZero);
    }

    maker.fill(trade_amount)?;
    taker.fill(trade_amount)?;

    tracing::debug!(
        maker = %maker.id,
        taker = %taker.id,
        price = maker.price,
        trade_amount,
        trade_quote_amount,
        "Orders matched"
    );

    Ok(Clear {
        price: maker.price,
        trade_amount,
        trade_quote_amount,
        ..Clear::default()
    })
}
