//! Configuration for the settlement core.
//!
//! The host builds a [`DexConfig`] (typically deserialized from its own
//! parameter storage) and passes it by reference into every call.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{DexError, Result};
use crate::ids::Address;

/// Tunable fee and withdrawal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexParams {
    /// System fee rate on the maker leg (basis points).
    pub maker_sys_fee_rate: u32,
    /// System fee rate on the taker leg (basis points).
    pub taker_sys_fee_rate: u32,
    /// Percentage of the system fee a prime account pays.
    pub prime_fee_discount_percent: u32,
    /// Minimum delay between `prepare_withdraw` and `commit_withdraw`.
    pub withdraw_apply_wait_time: u64,
}

impl Default for DexParams {
    fn default() -> Self {
        Self {
            maker_sys_fee_rate: constants::DEFAULT_MAKER_SYS_FEE_RATE,
            taker_sys_fee_rate: constants::DEFAULT_TAKER_SYS_FEE_RATE,
            prime_fee_discount_percent: constants::DEFAULT_PRIME_FEE_DISCOUNT_PERCENT,
            withdraw_apply_wait_time: constants::DEFAULT_WITHDRAW_APPLY_WAIT_TIME,
        }
    }
}

impl DexParams {
    /// Validate that all parameters are in range.
    ///
    /// # Errors
    /// Returns `Configuration` naming the first out-of-range field.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("maker_sys_fee_rate", self.maker_sys_fee_rate),
            ("taker_sys_fee_rate", self.taker_sys_fee_rate),
        ] {
            if rate > constants::MAX_FEE_RATE {
                return Err(DexError::Configuration(format!(
                    "{name} {rate} exceeds {}",
                    constants::MAX_FEE_RATE
                )));
            }
        }
        if u64::from(self.prime_fee_discount_percent) > constants::PERCENT_DENOMINATOR {
            return Err(DexError::Configuration(format!(
                "prime_fee_discount_percent {} exceeds {}",
                self.prime_fee_discount_percent,
                constants::PERCENT_DENOMINATOR
            )));
        }
        if self.withdraw_apply_wait_time == 0 {
            return Err(DexError::Configuration(
                "withdraw_apply_wait_time must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Well-known accounts the core moves funds to and from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemAccounts {
    /// The account holding every deposited asset.
    pub dex: Address,
    /// Receives system fees and is the only caller of `epoch_end` and
    /// `claim_sp_profit`.
    pub governance: Address,
    /// Modules allowed to call the immediate `withdraw`.
    pub withdraw_allow_list: Vec<Address>,
}

impl SystemAccounts {
    #[must_use]
    pub fn may_withdraw(&self, caller: &Address) -> bool {
        self.withdraw_allow_list.contains(caller)
    }
}

/// Everything a call needs besides state and host capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexConfig {
    #[serde(default)]
    pub params: DexParams,
    pub accounts: SystemAccounts,
}

impl DexConfig {
    /// Build a config with default params, putting `dex` and `governance`
    /// on the withdraw allow-list.
    #[must_use]
    pub fn new(dex: Address, governance: Address) -> Self {
        Self {
            params: DexParams::default(),
            accounts: SystemAccounts {
                dex,
                governance,
                withdraw_allow_list: vec![dex, governance],
            },
        }
    }

    /// # Errors
    /// `Configuration` for bad params or a governance account equal to the
    /// dex account.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.accounts.dex == self.accounts.governance {
            return Err(DexError::Configuration(
                "dex and governance accounts must differ".into(),
            ));
        }
        Ok(())
    }
}
