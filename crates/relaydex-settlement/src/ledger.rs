//! Sparse balance ledger over the state store.
//!
//! Balances are plain `u64`s keyed by (account, asset). A balance that
//! reaches zero is deleted, so absent and zero are the same thing. Every
//! mutation is journaled as a signed delta for the conservation check.

use relaydex_types::{Address, DexError, Result, StateStore, TypedStore, keys};

/// One signed balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    pub account: Address,
    pub asset: Address,
    pub delta: i128,
}

/// Read a balance without a ledger.
pub fn balance_of(store: &dyn StateStore, account: &Address, asset: &Address) -> Result<u64> {
    store.load_or_default(&keys::balance(account, asset))
}

/// Checked credit/debit over a borrowed store.
pub struct Ledger<'a> {
    store: &'a mut dyn StateStore,
    journal: Vec<BalanceDelta>,
}

impl<'a> Ledger<'a> {
    pub fn new(store: &'a mut dyn StateStore) -> Self {
        Self {
            store,
            journal: Vec::new(),
        }
    }

    /// The underlying store, for records that change alongside balances.
    pub fn store(&mut self) -> &mut dyn StateStore {
        &mut *self.store
    }

    pub fn balance_of(&self, account: &Address, asset: &Address) -> Result<u64> {
        balance_of(&*self.store, account, asset)
    }

    /// Add `amount`; returns the new balance. A zero credit writes nothing.
    ///
    /// # Errors
    /// `Overflow` if the balance would exceed `u64::MAX`.
    pub fn credit(&mut self, account: &Address, asset: &Address, amount: u64) -> Result<u64> {
        let current = self.balance_of(account, asset)?;
        if amount == 0 {
            return Ok(current);
        }
        let next = current.checked_add(amount).ok_or(DexError::Overflow {
            context: "balance credit",
        })?;
        self.store.save(&keys::balance(account, asset), &next)?;
        self.record(account, asset, i128::from(amount));
        Ok(next)
    }

    /// Subtract `amount`; returns the new balance, deleting it at zero.
    ///
    /// # Errors
    /// `BalanceNotEnough` if the balance is below `amount`.
    pub fn debit(&mut self, account: &Address, asset: &Address, amount: u64) -> Result<u64> {
        let current = self.balance_of(account, asset)?;
        let next = current
            .checked_sub(amount)
            .ok_or(DexError::BalanceNotEnough {
                needed: amount,
                available: current,
            })?;
        if amount == 0 {
            return Ok(current);
        }
        let key = keys::balance(account, asset);
        if next == 0 {
            self.store.delete(&key)?;
        } else {
            self.store.save(&key, &next)?;
        }
        self.record(account, asset, -i128::from(amount));
        Ok(next)
    }

    /// Credit only when `amount > 0`.
    pub fn credit_nonzero(&mut self, account: &Address, asset: &Address, amount: u64) -> Result<()> {
        if amount > 0 {
            self.credit(account, asset, amount)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn journal(&self) -> &[BalanceDelta] {
        &self.journal
    }

    pub fn into_journal(self) -> Vec<BalanceDelta> {
        self.journal
    }

    fn record(&mut self, account: &Address, asset: &Address, delta: i128) {
        self.journal.push(BalanceDelta {
            account: *account,
            asset: *asset,
            delta,
        });
    }
}
