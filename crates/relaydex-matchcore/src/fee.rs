//! Fee engine.
//!
//! Each side pays a system fee (to governance) and a channel fee (to the
//! channel named in its own order), both taken out of what that side
//! receives: the taker's leg is the asset the taker gets, the maker's leg is
//! the asset the maker gets.
//!
//! ```text
//! sys_fee      = ⌊leg · sys_rate / 10000⌋
//! sys_fee      = ⌊leg · sys_rate · discount_percent / (10000 · 100)⌋   (prime)
//! channel_fee  = ⌊leg · order_rate / 10000⌋
//! ```

use relaydex_types::constants::{FEE_RATE_DENOMINATOR, PERCENT_DENOMINATOR};
use relaydex_types::fixed_point::mul_div_floor;
use relaydex_types::{Clear, DexError, DexParams, Order, Result};

/// Prime membership of the two users, looked up by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimeStatus {
    pub maker: bool,
    pub taker: bool,
}

/// System fee on `leg`.
pub fn sys_fee(leg: u64, rate: u32, prime: bool, discount_percent: u32) -> Result<u64> {
    if prime {
        let factor = u64::from(rate) * u64::from(discount_percent);
        mul_div_floor(leg, factor, FEE_RATE_DENOMINATOR * PERCENT_DENOMINATOR)
    } else {
        mul_div_floor(leg, u64::from(rate), FEE_RATE_DENOMINATOR)
    }
}

/// Channel fee on `leg`; zero rate means no fee.
pub fn channel_fee(leg: u64, rate: u32) -> Result<u64> {
    if rate == 0 {
        return Ok(0);
    }
    mul_div_floor(leg, u64::from(rate), FEE_RATE_DENOMINATOR)
}

/// Fill the six fee fields of `clear`.
///
/// # Errors
/// `InvalidArgs` if a side's total fee exceeds what it receives.
pub fn count_fee(
    params: &DexParams,
    maker: &Order,
    taker: &Order,
    prime: PrimeStatus,
    clear: &mut Clear,
) -> Result<()> {
    let (taker_leg, maker_leg) = if taker.is_sell() {
        (clear.trade_quote_amount, clear.trade_amount)
    } else {
        (clear.trade_amount, clear.trade_quote_amount)
    };

    let discount = params.prime_fee_discount_percent;
    let taker_sys_fee = sys_fee(taker_leg, params.taker_sys_fee_rate, prime.taker, discount)?;
    let maker_sys_fee = sys_fee(maker_leg, params.maker_sys_fee_rate, prime.maker, discount)?;
    let taker_channel_fee = channel_fee(taker_leg, taker.taker_fee_rate)?;
    let maker_channel_fee = channel_fee(maker_leg, maker.maker_fee_rate)?;

    let taker_fee = checked_total(taker_sys_fee, taker_channel_fee, taker_leg, "taker")?;
    let maker_fee = checked_total(maker_sys_fee, maker_channel_fee, maker_leg, "maker")?;

    clear.maker_fee = maker_fee;
    clear.taker_fee = taker_fee;
    clear.maker_channel_fee = maker_channel_fee;
    clear.taker_channel_fee = taker_channel_fee;
    clear.maker_sys_fee = maker_sys_fee;
    clear.taker_sys_fee = taker_sys_fee;

    tracing::debug!(
        maker_fee,
        taker_fee,
        maker_sys_fee,
        taker_sys_fee,
        maker_channel_fee,
        taker_channel_fee,
        maker_prime = prime.maker,
        taker_prime = prime.taker,
        "Fees counted"
    );
    Ok(())
}

fn checked_total(sys: u64, channel: u64, leg: u64, side: &str) -> Result<u64> {
    match sys.checked_add(channel) {
        Some(total) if total <= leg => Ok(total),
        _ => Err(DexError::invalid_args(format!(
            "{side} fee {sys}+{channel} exceeds proceeds {leg}"
        ))),
    }
}
