//! # relaydex-types
//!
//! Shared types, errors, and host capabilities for the **RelayDEX**
//! settlement core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`OrderId`], [`WithdrawHash`]
//! - **Order model**: [`RawOrderData`], [`OrderData`], [`Order`], [`OrderSide`], [`OrderState`]
//! - **Trade model**: [`TradeArgs`], [`RelayArgs`], [`Relay`], [`Clear`]
//! - **Operation arguments**: [`AssetArgs`], [`DelegateWithdrawArgs`], [`CommitWithdrawArgs`],
//!   [`DelegateCancelArgs`], [`SetRelayArgs`]
//! - **Persisted records**: [`PrepareWithdrawState`], [`SpProfit`]
//! - **Fixed-point helpers**: [`fixed_point`]
//! - **Signatures**: [`MultiSig`] (m-of-n ed25519)
//! - **State**: [`StateStore`], [`TypedStore`], [`MemoryStore`], [`CacheStore`], key layout in [`keys`]
//! - **Host capabilities**: [`Authorizer`], [`ExternalModules`], [`EventSink`], [`DexContext`]
//! - **Configuration**: [`DexConfig`], [`DexParams`], [`SystemAccounts`]
//! - **Errors**: [`DexError`] with `DEX_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: system-wide limits and defaults

pub mod args;
pub mod config;
pub mod constants;
pub mod error;
pub mod fixed_point;
pub mod host;
pub mod ids;
pub mod keys;
pub mod order;
pub mod records;
pub mod signature;
pub mod store;
pub mod trade;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

// Re-export all primary types at crate root for ergonomic imports:
//   use relaydex_types::{Order, OrderSide, Clear, DexError, ...};

pub use args::*;
pub use config::*;
pub use error::*;
pub use host::*;
pub use ids::*;
pub use order::*;
pub use records::*;
pub use signature::*;
pub use store::*;
pub use trade::*;

// Constants, keys and fixed-point helpers are accessed by module path
// (not re-exported to avoid name collisions).
