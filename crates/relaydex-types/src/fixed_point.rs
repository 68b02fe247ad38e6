//! Fixed-point conversions and overflow-checked scaling.
//!
//! Amounts travel as decimal strings in signed payloads and live as
//! `u64` integers scaled by `10^decimals` everywhere else. Conversion never
//! rounds: a string with more fractional digits than the asset supports is
//! rejected.

use rust_decimal::Decimal;

use crate::constants::{MAX_DECIMALS, PRICE_SCALE};
use crate::error::{DexError, Result};

fn invalid_number(input: &str, reason: &str) -> DexError {
    DexError::InvalidNumber {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// `10^decimals`.
pub fn precision(decimals: u32) -> Result<u64> {
    10u64.checked_pow(decimals).ok_or(DexError::Overflow {
        context: "precision",
    })
}

/// Parse a non-negative decimal string into an integer scaled by
/// `10^decimals`.
///
/// # Errors
/// - `InvalidNumber` for anything that is not `digits[.digits]`, or with more
///   than `decimals` fractional digits.
/// - `Overflow` if the scaled value does not fit in a `u64`.
pub fn decimal_to_integer(input: &str, decimals: u32) -> Result<u64> {
    if decimals > MAX_DECIMALS {
        return Err(invalid_number(input, "too many decimals"));
    }

    let (int_part, frac_part) = match input.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (input, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
        return Err(invalid_number(input, "malformed"));
    }
    if frac_part.is_some_and(|f| f.len() > decimals as usize) {
        return Err(invalid_number(input, "precision exceeds decimals"));
    }

    let parsed = Decimal::from_str_exact(input).map_err(|_| DexError::Overflow {
        context: "decimal_to_integer",
    })?;
    let shift = 10i128
        .checked_pow(decimals - parsed.scale())
        .ok_or(DexError::Overflow {
            context: "decimal_to_integer",
        })?;
    parsed
        .mantissa()
        .checked_mul(shift)
        .and_then(|v| u64::try_from(v).ok())
        .ok_or(DexError::Overflow {
            context: "decimal_to_integer",
        })
}

/// Render a scaled integer with exactly `decimals` fractional digits.
/// Zero renders as `"0"`.
#[must_use]
pub fn integer_to_decimal(value: u64, decimals: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let digits = value.to_string();
    let frac = decimals as usize;
    if frac == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = frac + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - frac);
    format!("{int_part}.{frac_part}")
}

/// `⌊a·b / scale⌋` with a 128-bit intermediate.
///
/// # Errors
/// `Overflow` if the quotient exceeds `u64`, `InvalidArgs` if `scale == 0`.
pub fn mul_div_floor(a: u64, b: u64, scale: u64) -> Result<u64> {
    if scale == 0 {
        return Err(DexError::invalid_args("mul_div_floor by zero"));
    }
    let quotient = u128::from(a) * u128::from(b) / u128::from(scale);
    u64::try_from(quotient).map_err(|_| DexError::Overflow {
        context: "mul_div_floor",
    })
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Quote-asset amount of a fill:
/// `⌊price·amount·quote_precision / (PRICE_SCALE·base_precision)⌋`.
///
/// The two precisions are powers of ten, so after cancelling their common
/// factor at most one of them is above one. A 128-bit overflow of the
/// numerator therefore implies the quotient itself exceeds `u64`.
///
/// # Errors
/// `Overflow` if the result does not fit in a `u64`; `InvalidArgs` for a
/// zero precision.
pub fn quote_amount(
    price: u64,
    amount: u64,
    base_precision: u64,
    quote_precision: u64,
) -> Result<u64> {
    if base_precision == 0 || quote_precision == 0 {
        return Err(DexError::invalid_args("zero asset precision"));
    }
    let common = gcd(base_precision, quote_precision);
    let quote_factor = u128::from(quote_precision / common);
    let base_factor = u128::from(base_precision / common);

    let overflow = || DexError::Overflow {
        context: "quote_amount",
    };
    let numerator = (u128::from(price) * u128::from(amount))
        .checked_mul(quote_factor)
        .ok_or_else(overflow)?;
    let denominator = u128::from(PRICE_SCALE) * base_factor;
    u64::try_from(numerator / denominator).map_err(|_| overflow())
}
