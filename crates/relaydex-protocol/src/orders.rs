//! Write side of order cancellation.

use relaydex_ingress::cancel_sequence;
use relaydex_types::{
    Address, DexError, OrderId, OrderState, RawOrderData, Result, StateStore, TypedStore, keys,
};

/// Mark an order canceled. Canceling twice is harmless, and canceling an
/// order never seen before creates its state.
pub fn cancel_order(store: &mut dyn StateStore, raw: &RawOrderData) -> Result<OrderId> {
    let id = raw.order_id();
    let key = keys::order_state(&id);
    let mut state: OrderState = store.load_or_default(&key)?;
    state.canceled = true;
    state.user = raw.user;
    store.save(&key, &state)?;
    Ok(id)
}

/// Cancel every order of `user` with a salt at or below `number`.
///
/// # Errors
/// `InvalidArgs` unless `number` is above the current sequence.
pub fn advance_cancel_sequence(store: &mut dyn StateStore, user: &Address, number: u64) -> Result<()> {
    let current = cancel_sequence(&*store, user)?;
    if number <= current {
        return Err(DexError::invalid_args(format!(
            "cancel sequence {number} not above {current}"
        )));
    }
    store.save(&keys::delegate_cancel(user), &number)
}

/// Persisted state of an order, if it has ever been filled or canceled.
pub fn order_state(store: &dyn StateStore, id: &OrderId) -> Result<Option<OrderState>> {
    store.load(&keys::order_state(id))
}
