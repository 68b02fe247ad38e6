//! Error types for the RelayDEX settlement core.
//!
//! All errors use the `DEX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Argument / authorization errors
//! - 2xx: Order and matching errors
//! - 3xx: Balance and withdrawal errors
//! - 4xx: Signature errors
//! - 9xx: Store / external / internal errors
//!
//! Every variant maps onto a coarse [`ErrorKind`] so callers can tell a
//! validation failure ("retry with different parameters") from a systemic
//! one without matching on the full enum.

use thiserror::Error;

use crate::{Address, OrderId};

/// Central error enum for all RelayDEX operations.
#[derive(Debug, Error)]
pub enum DexError {
    // =================================================================
    // Argument / Authorization Errors (1xx)
    // =================================================================
    /// Malformed or inconsistent call arguments.
    #[error("DEX_ERR_100: Invalid arguments: {reason}")]
    InvalidArgs { reason: String },

    /// A decimal string could not be converted to a scaled integer.
    #[error("DEX_ERR_101: Invalid number {input:?}: {reason}")]
    InvalidNumber { input: String, reason: String },

    /// Witness, relay or operator check failed.
    #[error("DEX_ERR_102: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Configuration error (out-of-range parameter, missing account).
    #[error("DEX_ERR_103: Configuration error: {0}")]
    Configuration(String),

    // =================================================================
    // Order / Matching Errors (2xx)
    // =================================================================
    /// Maker and taker prices do not cross.
    #[error("DEX_ERR_200: Price not match: maker {maker_price}, taker {taker_price}")]
    PriceNotMatch { maker_price: u64, taker_price: u64 },

    /// Requested trade amount exceeds an order's unfilled remainder.
    #[error("DEX_ERR_201: Surplus not enough: requested {requested}, available {available}")]
    SurplusNotEnough { requested: u64, available: u64 },

    /// The computed quote amount rounded down to zero.
    #[error("DEX_ERR_202: Trade quote amount is zero")]
    QuoteAmountZero,

    /// Arithmetic overflow.
    #[error("DEX_ERR_203: Arithmetic overflow in {context}")]
    Overflow { context: &'static str },

    /// The order's expiry timestamp has passed.
    #[error("DEX_ERR_204: Order expired: {order} (expire {expire}, now {now})")]
    OrderExpired {
        order: OrderId,
        expire: u64,
        now: u64,
    },

    /// The order was canceled directly or by a delegated cancel sequence.
    #[error("DEX_ERR_205: Order canceled: {0}")]
    OrderCanceled(OrderId),

    /// Maker and taker trade different pairs.
    #[error("DEX_ERR_206: Pair mismatch: maker {maker}, taker {taker}")]
    PairError { maker: String, taker: String },

    /// Both orders are on the same side.
    #[error("DEX_ERR_207: Side error: both orders are {0}")]
    SideError(crate::OrderSide),

    /// A fee rate is above the basis-point denominator.
    #[error("DEX_ERR_208: Fee rate {rate} exceeds {max}")]
    FeeIllegal { rate: u32, max: u32 },

    /// The order was signed for a different chain.
    #[error("DEX_ERR_209: Chain id mismatch: expected {expected}, got {actual}")]
    ChainIdError { expected: u32, actual: u32 },

    // =================================================================
    // Balance / Withdrawal Errors (3xx)
    // =================================================================
    /// Not enough balance to debit.
    #[error("DEX_ERR_300: Balance not enough: need {needed}, have {available}")]
    BalanceNotEnough { needed: u64, available: u64 },

    /// A prepared withdrawal was committed before its wait time elapsed.
    #[error("DEX_ERR_301: Apply wait time not enough: ready at {ready_at}, now {now}")]
    ApplyWaitNotEnough { ready_at: u64, now: u64 },

    /// The delegated withdrawal with this hash already executed.
    #[error("DEX_ERR_302: Delegated withdraw already submitted: {0}")]
    WithdrawAlreadySubmitted(String),

    /// Delegated withdrawal fee is larger than the amount.
    #[error("DEX_ERR_303: Withdraw fee {fee} exceeds amount {amount}")]
    WithdrawFeeTooHigh { amount: u64, fee: u64 },

    /// Commit called with nothing prepared.
    #[error("DEX_ERR_304: Nothing prepared to withdraw")]
    WithdrawZero,

    /// Supply conservation invariant violated: critical safety alert.
    #[error("DEX_ERR_305: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Signature Errors (4xx)
    // =================================================================
    /// The address derived from the signing keys is not the declared user.
    #[error("DEX_ERR_400: Signature user mismatch: expected {expected}, recovered {recovered}")]
    SigUserMismatch {
        expected: Address,
        recovered: Address,
    },

    /// The signature does not verify over the signed payload.
    #[error("DEX_ERR_401: Signature verification failed")]
    SigVerifyFailed,

    /// The key set cannot derive any address (no keys, or a bad threshold).
    #[error("DEX_ERR_402: Signature key set invalid for {expected}: {reason}")]
    SigKeySetInvalid { expected: Address, reason: String },

    // =================================================================
    // Store / External / Internal (9xx)
    // =================================================================
    /// Underlying state store failure.
    #[error("DEX_ERR_900: Store error: {0}")]
    Store(String),

    /// Persisted record could not be encoded or decoded.
    #[error("DEX_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// A call into another on-chain module failed.
    #[error("DEX_ERR_902: External call failed: {0}")]
    External(String),

    /// Unrecoverable internal error.
    #[error("DEX_ERR_909: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DexError>;

impl From<serde_json::Error> for DexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Coarse error classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgs,
    Unauthorized,
    PriceNotMatch,
    SurplusNotEnough,
    QuoteAmountZero,
    Overflow,
    BalanceNotEnough,
    OrderExpired,
    OrderCanceled,
    PairError,
    SideError,
    FeeIllegal,
    ChainIdError,
    SignatureInvalid,
    ApplyWaitNotEnough,
    WithdrawAlreadySubmitted,
    StoreError,
    External,
    Internal,
}

impl ErrorKind {
    /// Store, external and internal failures are not the caller's fault.
    #[must_use]
    pub fn is_systemic(self) -> bool {
        matches!(self, Self::StoreError | Self::External | Self::Internal)
    }
}

impl DexError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgs { .. }
            | Self::InvalidNumber { .. }
            | Self::Configuration(_)
            | Self::WithdrawFeeTooHigh { .. }
            | Self::WithdrawZero => ErrorKind::InvalidArgs,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::PriceNotMatch { .. } => ErrorKind::PriceNotMatch,
            Self::SurplusNotEnough { .. } => ErrorKind::SurplusNotEnough,
            Self::QuoteAmountZero => ErrorKind::QuoteAmountZero,
            Self::Overflow { .. } => ErrorKind::Overflow,
            Self::OrderExpired { .. } => ErrorKind::OrderExpired,
            Self::OrderCanceled(_) => ErrorKind::OrderCanceled,
            Self::PairError { .. } => ErrorKind::PairError,
            Self::SideError(_) => ErrorKind::SideError,
            Self::FeeIllegal { .. } => ErrorKind::FeeIllegal,
            Self::ChainIdError { .. } => ErrorKind::ChainIdError,
            Self::BalanceNotEnough { .. } => ErrorKind::BalanceNotEnough,
            Self::ApplyWaitNotEnough { .. } => ErrorKind::ApplyWaitNotEnough,
            Self::WithdrawAlreadySubmitted(_) => ErrorKind::WithdrawAlreadySubmitted,
            Self::SigUserMismatch { .. } | Self::SigVerifyFailed | Self::SigKeySetInvalid { .. } => {
                ErrorKind::SignatureInvalid
            }
            Self::Store(_) | Self::Serialization(_) => ErrorKind::StoreError,
            Self::External(_) => ErrorKind::External,
            Self::SupplyInvariantViolation { .. } | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for an [`DexError::InvalidArgs`] with a reason.
    pub fn invalid_args(reason: impl Into<String>) -> Self {
        Self::InvalidArgs {
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`DexError::Unauthorized`] with a reason.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }
}
