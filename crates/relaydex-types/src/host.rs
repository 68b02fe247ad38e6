//! Host capabilities consumed by the settlement core.
//!
//! The core never holds a handle to the chain. Each call receives a
//! [`DexContext`] that borrows the store, the witness checker, the other
//! modules and the event log for exactly the duration of that call.

use crate::config::DexConfig;
use crate::error::Result;
use crate::ids::Address;
use crate::store::StateStore;

/// "Is the current call authorized by this account?"
pub trait Authorizer {
    fn check_witness(&self, account: &Address) -> bool;
}

/// Synchronous calls into other on-chain modules. Errors are returned to
/// the caller unchanged.
pub trait ExternalModules {
    /// Move `amount` of `asset` between two accounts in the asset module.
    fn transfer(&mut self, asset: &Address, from: &Address, to: &Address, amount: u64)
    -> Result<()>;

    /// Prime membership, which discounts system fees.
    fn is_prime(&self, account: &Address) -> Result<bool>;

    /// The global operator allowed to maintain the relay list.
    fn operator(&self) -> Result<Address>;

    /// Decimal places of an asset.
    fn asset_decimals(&self, asset: &Address) -> Result<u32>;
}

/// Append-only audit log. Not consulted for control flow.
pub trait EventSink {
    fn emit(&mut self, fields: Vec<String>);
}

/// Per-call execution facts supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionContext {
    pub chain_id: u32,
    /// Block timestamp, seconds.
    pub timestamp: u64,
}

/// Everything one call may touch.
pub struct DexContext<'a> {
    pub exec: ExecutionContext,
    pub config: &'a DexConfig,
    pub store: &'a mut dyn StateStore,
    pub auth: &'a dyn Authorizer,
    pub modules: &'a mut dyn ExternalModules,
    pub events: &'a mut dyn EventSink,
}

/// Event sink that buffers until the owner decides to forward or drop.
#[derive(Debug, Default)]
pub struct BufferedEvents {
    pub events: Vec<Vec<String>>,
}

impl EventSink for BufferedEvents {
    fn emit(&mut self, fields: Vec<String>) {
        self.events.push(fields);
    }
}

impl BufferedEvents {
    /// Forward every buffered event to `sink`.
    pub fn flush_into(self, sink: &mut dyn EventSink) {
        for fields in self.events {
            sink.emit(fields);
        }
    }
}
