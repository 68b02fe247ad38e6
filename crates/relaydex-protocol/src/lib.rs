//! # relaydex-protocol
//!
//! The callable surface of the **RelayDEX** settlement core.
//!
//! A host decodes an [`Operation`], builds a [`DexContext`] for the call and
//! hands both to [`DexProtocol::invoke`] (or [`DexProtocol::invoke_atomic`]
//! when it has no transaction of its own):
//!
//! ```text
//! Operation ──▶ authorize ──▶ ingress / matchcore / settlement ──▶ event ──▶ Response
//! ```
//!
//! - [`operation`]: the fifteen operations and their results
//! - [`relay`]: the operator-maintained relay registry
//! - [`orders`]: direct and delegated cancellation
//! - [`events`]: audit log record layout
//!
//! [`DexContext`]: relaydex_types::DexContext

pub mod events;
pub mod operation;
pub mod orders;
pub mod protocol;
pub mod relay;

pub use operation::{Operation, Response};
pub use protocol::DexProtocol;
