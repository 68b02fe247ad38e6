//! # relaydex-ingress
//!
//! **Verification plane**: everything a relay-submitted trade must pass
//! before it reaches matching.
//!
//! ## Architecture
//!
//! 1. **reconstruct**: signed strings + persisted fill state → working [`Order`](relaydex_types::Order)s
//! 2. **cancel**: direct cancel flag and delegated cancel sequence lookups
//! 3. **verify**: the ordered ten-step gate, see [`verify_trade`]
//!
//! ## Trade Flow
//!
//! ```text
//! TradeArgs → verify_trade() → VerifiedTrade → match_order() → count_fee() → settle()
//! ```
//!
//! Ingress only reads the store; it never writes.

pub mod cancel;
pub mod reconstruct;
pub mod verify;

pub use cancel::{cancel_sequence, is_canceled, is_sequence_canceled};
pub use reconstruct::{parse_relay, reconstruct_order};
pub use verify::{VerifiedTrade, verify_trade};
