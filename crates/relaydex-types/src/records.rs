//! Persisted ledger-side records.

use serde::{Deserialize, Serialize};

use crate::error::{DexError, Result};

/// A pending two-phase withdrawal for one (user, asset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareWithdrawState {
    /// Timestamp of the latest prepare.
    pub time: u64,
    /// Cumulative amount applied for since the last commit.
    pub amount: u64,
}

impl PrepareWithdrawState {
    /// Earliest time a commit is accepted.
    #[must_use]
    pub fn ready_at(&self, wait_time: u64) -> u64 {
        self.time.saturating_add(wait_time)
    }
}

/// System-fee profit of one asset, bucketed by governance round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpProfit {
    pub latest_round: u64,
    /// Accrued during `latest_round`.
    pub latest_profit: u64,
    /// Accrued in every earlier round and not yet claimed.
    pub history_profit: u64,
}

impl SpProfit {
    /// Add `amount` accrued in `round`, rolling the latest bucket into
    /// history when the round has moved on.
    pub fn accrue(&mut self, round: u64, amount: u64) -> Result<()> {
        let overflow = || DexError::Overflow {
            context: "sp profit accrue",
        };
        if self.latest_round == round {
            self.latest_profit = self.latest_profit.checked_add(amount).ok_or_else(overflow)?;
        } else {
            self.history_profit = self
                .history_profit
                .checked_add(self.latest_profit)
                .ok_or_else(overflow)?;
            self.latest_profit = amount;
            self.latest_round = round;
        }
        Ok(())
    }

    /// Take everything claimable in `round`. Profit of the running round
    /// stays put until the round ends.
    pub fn claim(&mut self, round: u64) -> Result<u64> {
        if self.latest_round == round {
            return Ok(std::mem::take(&mut self.history_profit));
        }
        let profit = self
            .history_profit
            .checked_add(self.latest_profit)
            .ok_or(DexError::Overflow {
                context: "sp profit claim",
            })?;
        self.history_profit = 0;
        self.latest_profit = 0;
        self.latest_round = round;
        Ok(profit)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latest_profit == 0 && self.history_profit == 0
    }
}
