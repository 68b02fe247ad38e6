//! Relay registry.
//!
//! Relays are the accounts allowed to submit trades, delegated withdrawals
//! and delegated cancels. Only the global operator maintains the list.

use relaydex_types::{Address, DexError, Result, StateStore, TypedStore, keys};

/// Whether `account` is a registered relay.
pub fn is_relay(store: &dyn StateStore, account: &Address) -> Result<bool> {
    Ok(store.load::<bool>(&keys::relay(account))?.unwrap_or(false))
}

/// Fail with `Unauthorized` unless `account` is a registered relay.
pub fn ensure_relay(store: &dyn StateStore, account: &Address) -> Result<()> {
    if is_relay(store, account)? {
        Ok(())
    } else {
        Err(DexError::unauthorized(format!("{account} is not a relay")))
    }
}

/// Register (`true`) or remove (`false`) a relay. Removing an unknown
/// account is a no-op.
pub fn set_relay(store: &mut dyn StateStore, target: &Address, value: bool) -> Result<()> {
    let key = keys::relay(target);
    if value {
        store.save(&key, &true)
    } else {
        store.delete(&key)
    }
}

/// Every registered relay, in key order.
pub fn relays(store: &dyn StateStore) -> Result<Vec<Address>> {
    Ok(store
        .find_prefix(&keys::relay_prefix())?
        .iter()
        .filter_map(|(key, _)| keys::relay_address(key))
        .collect())
}
