//! # relaydex-settlement
//!
//! **Ledger plane**: every balance the dex holds, and every way it changes.
//!
//! ## Architecture
//!
//! Settlement receives a matched maker/taker pair and its [`Clear`] from
//! matchcore and:
//! 1. Records the new fill on both order states
//! 2. Moves base and quote between the two users, net of fees
//! 3. Pays channel fees and credits system fees to governance
//! 4. Checks supply conservation over the journal of balance deltas
//!
//! Outside of trades it runs the wallet boundary: deposits, withdrawals,
//! relay-submitted delegated withdrawals and the two-phase
//! prepare/commit withdraw.
//!
//! [`Clear`]: relaydex_types::Clear

pub mod governance;
pub mod idempotency;
pub mod ledger;
pub mod supply_conservation;
pub mod trade;
pub mod withdraw;

pub use governance::{account_for_governance, claim_sp_profit, current_round, epoch_end};
pub use ledger::{BalanceDelta, Ledger, balance_of};
pub use supply_conservation::SupplyConservation;
pub use trade::{SettlementReceipt, settle_trade};
pub use withdraw::{
    CommitOutcome, commit_withdraw, delegate_withdraw, deposit, prepare_withdraw,
    prepare_withdraw_state, withdraw,
};
