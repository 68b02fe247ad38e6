//! System-wide constants for the RelayDEX settlement core.

/// Decimal places of every order price.
pub const PRICE_DECIMALS: u32 = 8;

/// `10^PRICE_DECIMALS`.
pub const PRICE_SCALE: u64 = 100_000_000;

/// Basis-point denominator for every fee rate.
pub const FEE_RATE_DENOMINATOR: u64 = 10_000;

/// Largest legal fee rate (100%).
pub const MAX_FEE_RATE: u32 = 10_000;

/// Denominator of the prime discount percentage.
pub const PERCENT_DENOMINATOR: u64 = 100;

/// Largest number of decimals whose precision (`10^d`) fits in a `u64`.
pub const MAX_DECIMALS: u32 = 19;

/// Default system fee rate charged to makers (basis points).
pub const DEFAULT_MAKER_SYS_FEE_RATE: u32 = 0;

/// Default system fee rate charged to takers (basis points).
pub const DEFAULT_TAKER_SYS_FEE_RATE: u32 = 3;

/// Default share of the system fee a prime account still pays.
pub const DEFAULT_PRIME_FEE_DISCOUNT_PERCENT: u32 = 80;

/// Default minimum delay between prepare and commit withdraw.
pub const DEFAULT_WITHDRAW_APPLY_WAIT_TIME: u64 = 10;

/// Separator between base and quote in a pair string (`BASE_QUOTE`).
pub const PAIR_SEPARATOR: char = '_';
