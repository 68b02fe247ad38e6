//! In-memory host doubles for tests across the workspace.

use std::collections::{BTreeMap, BTreeSet};

use ed25519_dalek::SigningKey;

use crate::error::{DexError, Result};
use crate::host::{Authorizer, EventSink, ExternalModules};
use crate::ids::Address;
use crate::order::{OrderData, RawOrderData};
use crate::signature::MultiSig;

/// Asset module, prime registry and operator lookup in one.
#[derive(Debug, Clone, Default)]
pub struct MockModules {
    /// `(account, asset) -> amount` held in the asset module.
    pub holdings: BTreeMap<(Address, Address), u64>,
    pub decimals: BTreeMap<Address, u32>,
    pub prime: BTreeSet<Address>,
    pub operator: Address,
    /// When set, `is_prime` fails with this message.
    pub prime_error: Option<String>,
}

impl MockModules {
    pub fn new(operator: Address) -> Self {
        Self {
            operator,
            ..Self::default()
        }
    }

    pub fn with_asset(mut self, asset: Address, decimals: u32) -> Self {
        self.decimals.insert(asset, decimals);
        self
    }

    pub fn mint(&mut self, account: Address, asset: Address, amount: u64) {
        *self.holdings.entry((account, asset)).or_default() += amount;
    }

    pub fn holding(&self, account: &Address, asset: &Address) -> u64 {
        self.holdings.get(&(*account, *asset)).copied().unwrap_or(0)
    }
}

impl ExternalModules for MockModules {
    fn transfer(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<()> {
        let available = self.holding(from, asset);
        if available < amount {
            return Err(DexError::External(format!(
                "transfer of {amount} from {from} exceeds holding {available}"
            )));
        }
        self.holdings.insert((*from, *asset), available - amount);
        *self.holdings.entry((*to, *asset)).or_default() += amount;
        Ok(())
    }

    fn is_prime(&self, account: &Address) -> Result<bool> {
        match &self.prime_error {
            Some(msg) => Err(DexError::External(msg.clone())),
            None => Ok(self.prime.contains(account)),
        }
    }

    fn operator(&self) -> Result<Address> {
        Ok(self.operator)
    }

    fn asset_decimals(&self, asset: &Address) -> Result<u32> {
        self.decimals
            .get(asset)
            .copied()
            .ok_or_else(|| DexError::External(format!("unknown asset {asset}")))
    }
}

/// Records every event.
#[derive(Debug, Clone, Default)]
pub struct RecordingEvents {
    pub events: Vec<Vec<String>>,
}

impl RecordingEvents {
    /// Events whose first field is `name`.
    pub fn named(&self, name: &str) -> Vec<&Vec<String>> {
        self.events
            .iter()
            .filter(|e| e.first().is_some_and(|n| n == name))
            .collect()
    }
}

impl EventSink for RecordingEvents {
    fn emit(&mut self, fields: Vec<String>) {
        self.events.push(fields);
    }
}

/// Witnesses every account in the set.
#[derive(Debug, Clone, Default)]
pub struct WitnessSet(pub BTreeSet<Address>);

impl WitnessSet {
    pub fn of(accounts: &[Address]) -> Self {
        Self(accounts.iter().copied().collect())
    }
}

impl Authorizer for WitnessSet {
    fn check_witness(&self, account: &Address) -> bool {
        self.0.contains(account)
    }
}

/// A single-key account that can sign payloads.
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    /// Deterministic signer from a one-byte seed.
    pub fn from_seed(seed: u8) -> Self {
        Self {
            key: SigningKey::from_bytes(&[seed; 32]),
        }
    }

    /// Fresh random signer.
    pub fn random() -> Self {
        Self {
            key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    pub fn address(&self) -> Address {
        MultiSig::single(&self.key, &[])
            .recover_address()
            .unwrap_or_default()
    }

    pub fn sign(&self, data: &[u8]) -> MultiSig {
        MultiSig::single(&self.key, data)
    }

    /// Sign an order over its id.
    pub fn sign_order(&self, raw: RawOrderData) -> OrderData {
        let sig = self.sign(raw.order_id().as_bytes());
        OrderData { raw, sig }
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }
}
