//! Read side of order cancellation.
//!
//! An order is dead if its own state says so, or if its salt is at or below
//! the user's delegated cancel sequence. The write side lives in the
//! protocol crate.

use relaydex_types::{Address, OrderId, OrderState, Result, StateStore, TypedStore, keys};

/// Current delegated cancel sequence of `user` (0 if never set).
pub fn cancel_sequence(store: &dyn StateStore, user: &Address) -> Result<u64> {
    store.load_or_default(&keys::delegate_cancel(user))
}

/// Whether `id` was canceled directly.
pub fn is_canceled(store: &dyn StateStore, id: &OrderId) -> Result<bool> {
    let state: OrderState = store.load_or_default(&keys::order_state(id))?;
    Ok(state.canceled)
}

/// Whether an order with `salt` signed by `user` falls under the user's
/// delegated cancel sequence.
pub fn is_sequence_canceled(store: &dyn StateStore, user: &Address, salt: u64) -> Result<bool> {
    Ok(salt <= cancel_sequence(store, user)?)
}
