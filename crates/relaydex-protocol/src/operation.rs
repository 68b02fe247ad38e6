//! Typed operations and their results.

use serde::{Deserialize, Serialize};

use relaydex_types::{
    Address, AssetArgs, CommitWithdrawArgs, DelegateCancelArgs, DelegateWithdrawArgs, DexError,
    OrderId, OrderState, PrepareWithdrawState, RawOrderData, Result, SetRelayArgs, TradeArgs,
};

/// Every call the dex accepts, each carrying its own arguments.
///
/// On the wire an operation is `{"method": "...", "args": ...}` with the
/// method name in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum Operation {
    Deposit(AssetArgs),
    Withdraw(AssetArgs),
    DelegateWithdraw(DelegateWithdrawArgs),
    PrepareWithdraw(AssetArgs),
    CommitWithdraw(CommitWithdrawArgs),
    GetPrepareWithdrawState { from: Address, asset: Address },
    BalanceOf { account: Address, asset: Address },
    Trade(TradeArgs),
    CancelOrder(RawOrderData),
    DelegateCancelOrder(DelegateCancelArgs),
    GetOrderState(OrderId),
    SetRelay(SetRelayArgs),
    Relays,
    EpochEnd { round: u64 },
    ClaimSpProfit { asset: Address },
}

impl Operation {
    /// Decode an operation from its JSON form.
    ///
    /// # Errors
    /// `InvalidArgs` for malformed input or an unknown method.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|err| DexError::invalid_args(format!("undecodable operation: {err}")))
    }

    /// Method name, as used on the wire and in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit(_) => "deposit",
            Self::Withdraw(_) => "withdraw",
            Self::DelegateWithdraw(_) => "delegateWithdraw",
            Self::PrepareWithdraw(_) => "prepareWithdraw",
            Self::CommitWithdraw(_) => "commitWithdraw",
            Self::GetPrepareWithdrawState { .. } => "getPrepareWithdrawState",
            Self::BalanceOf { .. } => "balanceOf",
            Self::Trade(_) => "trade",
            Self::CancelOrder(_) => "cancelOrder",
            Self::DelegateCancelOrder(_) => "delegateCancelOrder",
            Self::GetOrderState(_) => "getOrderState",
            Self::SetRelay(_) => "setRelay",
            Self::Relays => "relays",
            Self::EpochEnd { .. } => "epochEnd",
            Self::ClaimSpProfit { .. } => "claimSpProfit",
        }
    }

    /// Queries never write and need no witness.
    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::GetPrepareWithdrawState { .. }
                | Self::BalanceOf { .. }
                | Self::GetOrderState(_)
                | Self::Relays
        )
    }
}

/// Result of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    None,
    /// Applied amount, remaining balance, balance or claimed profit.
    Amount(u64),
    Flag(bool),
    PrepareWithdrawState(Option<PrepareWithdrawState>),
    OrderState(Option<OrderState>),
    Relays(Vec<Address>),
}

impl Response {
    #[must_use]
    pub fn amount(&self) -> Option<u64> {
        match self {
            Self::Amount(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            _ => None,
        }
    }
}
