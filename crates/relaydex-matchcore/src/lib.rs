//! # relaydex-matchcore
//!
//! **Pure matching and fee computation for one relay-submitted pair.**
//!
//! The caller hands in two reconstructed orders and a relay instruction and
//! gets back a [`Clear`](relaydex_types::Clear):
//!
//! - **Zero side effects**: no store access, no external calls
//! - **Maker price is authoritative**: the trade settles at the maker's limit
//! - **Exact arithmetic**: 128-bit intermediates, overflow is an error
//! - **Fees in place**: [`count_fee`] fills the fee fields of the clear

pub mod fee;
pub mod matcher;

pub use fee::{PrimeStatus, channel_fee, count_fee, sys_fee};
pub use matcher::{match_order, prices_cross};
