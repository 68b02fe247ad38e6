//! Delegated-withdraw replay guard.
//!
//! Each delegated withdrawal is identified by the hash of its signed
//! payload. Once executed, the hash is marked done in the state store and
//! can never be executed again. Flags are never deleted, so the guard holds
//! across restarts and has no eviction.

use relaydex_types::{DexError, Result, StateStore, TypedStore, WithdrawHash, keys};

/// Check whether a delegated withdrawal has already been executed.
pub fn is_done(store: &dyn StateStore, hash: &WithdrawHash) -> Result<bool> {
    Ok(store
        .load::<bool>(&keys::delegate_withdraw_done(hash))?
        .unwrap_or(false))
}

/// Fail if `hash` has already been executed.
///
/// # Errors
/// Returns [`DexError::WithdrawAlreadySubmitted`] for a replay.
pub fn ensure_not_done(store: &dyn StateStore, hash: &WithdrawHash) -> Result<()> {
    if is_done(store, hash)? {
        return Err(DexError::WithdrawAlreadySubmitted(hash.to_string()));
    }
    Ok(())
}

/// Mark `hash` as executed.
pub fn mark_done(store: &mut dyn StateStore, hash: &WithdrawHash) -> Result<()> {
    store.save(&keys::delegate_withdraw_done(hash), &true)
}
