//! Supply conservation invariant checker.
//!
//! Mathematical invariant enforced after every trade settlement:
//! ```text
//! ∀ asset: Σ(balance deltas of the settlement) == 0
//! ```
//!
//! A trade only moves value between users, channels and governance. If any
//! asset's deltas do not cancel, the settlement is rejected with
//! [`DexError::SupplyInvariantViolation`].

use std::collections::BTreeMap;

use relaydex_types::{Address, DexError, Result};

use crate::ledger::BalanceDelta;

/// Per-asset running sum of balance deltas.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    net: BTreeMap<Address, i128>,
}

impl SupplyConservation {
    /// Create a new supply conservation tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tracker from a ledger journal.
    #[must_use]
    pub fn from_journal(journal: &[BalanceDelta]) -> Self {
        let mut tracker = Self::new();
        for delta in journal {
            tracker.record(&delta.asset, delta.delta);
        }
        tracker
    }

    pub fn record(&mut self, asset: &Address, delta: i128) {
        *self.net.entry(*asset).or_insert(0) += delta;
    }

    /// Net change of one asset.
    #[must_use]
    pub fn net(&self, asset: &Address) -> i128 {
        self.net.get(asset).copied().unwrap_or(0)
    }

    /// Verify every tracked asset nets to zero.
    ///
    /// # Errors
    /// Returns [`DexError::SupplyInvariantViolation`] naming the first
    /// unbalanced asset.
    pub fn verify(&self) -> Result<()> {
        if let Some((asset, net)) = self.net.iter().find(|(_, net)| **net != 0) {
            return Err(DexError::SupplyInvariantViolation {
                reason: format!("asset {asset}: settlement deltas sum to {net}"),
            });
        }
        Ok(())
    }
}
