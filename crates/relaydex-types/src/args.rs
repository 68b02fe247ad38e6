//! Argument records of the ledger and administration operations.

use serde::{Deserialize, Serialize};

use crate::ids::{Address, WithdrawHash};
use crate::signature::MultiSig;

/// Arguments shared by `deposit`, `withdraw` and `prepare_withdraw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetArgs {
    pub asset: Address,
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

/// A user-signed withdrawal submitted by a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateWithdrawArgs {
    pub asset: Address,
    pub from: Address,
    pub to: Address,
    pub amount: u64,
    /// Paid to the relay out of `amount`.
    pub fee: u64,
    pub salt: u64,
    /// Opaque client data, covered by the signature.
    pub extra: String,
    pub sig: MultiSig,
    pub relay: Address,
}

impl DelegateWithdrawArgs {
    /// `key=value` pairs joined by `&`, keys in lexicographic order.
    /// The signature and the relay are not part of the signed payload.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        format!(
            "amount={}&asset={}&extra={}&fee={}&from={}&salt={}&to={}",
            self.amount, self.asset, self.extra, self.fee, self.from, self.salt, self.to
        )
    }

    /// Replay key and signed payload.
    #[must_use]
    pub fn hash(&self) -> WithdrawHash {
        WithdrawHash::digest(&self.canonical_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitWithdrawArgs {
    pub from: Address,
    pub asset: Address,
}

/// Relay-submitted bump of a user's cancel sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateCancelArgs {
    /// The relay.
    pub from: Address,
    pub user: Address,
    /// New sequence; orders with `salt <= number` become canceled.
    pub number: u64,
}

/// Operator update of the relay allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRelayArgs {
    pub from: Address,
    pub target: Address,
    pub value: bool,
}
