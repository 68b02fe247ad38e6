//! Identifiers used throughout RelayDEX.
//!
//! Accounts (users, channels, assets, system modules) share one 20-byte
//! [`Address`] type. Content-addressed ids ([`OrderId`], [`WithdrawHash`])
//! are SHA-256 digests of a canonical `key=value&...` string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DexError, Result};

/// Domain tag for single-key address derivation.
const SINGLE_KEY_TAG: u8 = 0x01;
/// Domain tag for m-of-n address derivation.
const MULTI_KEY_TAG: u8 = 0x02;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Opaque account identifier, rendered as 40 lowercase hex characters.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Width of an address in bytes.
    pub const LEN: usize = 20;

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse an address from a raw byte slice of exactly [`Address::LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| DexError::invalid_args(format!("address must be 20 bytes, got {}", bytes.len())))?;
        Ok(Self(arr))
    }

    /// Derive the account address controlled by an m-of-n public key set.
    ///
    /// A single key hashes as `0x01 || key`; a key set hashes as
    /// `0x02 || m || sorted keys`, so key order never changes the address.
    ///
    /// # Errors
    /// `InvalidArgs` if the key set is empty, `m == 0` or `m > n`.
    pub fn from_public_keys(keys: &[[u8; 32]], m: u8) -> Result<Self> {
        if keys.is_empty() {
            return Err(DexError::invalid_args("empty public key set"));
        }
        if m == 0 || usize::from(m) > keys.len() {
            return Err(DexError::invalid_args(format!(
                "threshold {m} invalid for {} keys",
                keys.len()
            )));
        }

        let mut hasher = Sha256::new();
        if let [key] = keys {
            hasher.update([SINGLE_KEY_TAG]);
            hasher.update(key);
        } else {
            let mut sorted = keys.to_vec();
            sorted.sort_unstable();
            hasher.update([MULTI_KEY_TAG, m]);
            for key in &sorted {
                hasher.update(key);
            }
        }
        let digest = hasher.finalize();
        Self::from_slice(&digest[..Self::LEN])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| DexError::invalid_args(format!("bad address {s:?}: {e}")))?;
        Self::from_slice(&bytes)
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// SHA-256 of an order's canonical string. Also the payload its
/// signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub [u8; 32]);

impl OrderId {
    /// Hash a canonical order string.
    #[must_use]
    pub fn digest(canonical: &str) -> Self {
        Self(Sha256::digest(canonical.as_bytes()).into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// WithdrawHash
// ---------------------------------------------------------------------------

/// Replay key of a delegated withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct WithdrawHash(pub [u8; 32]);

impl WithdrawHash {
    #[must_use]
    pub fn digest(canonical: &str) -> Self {
        Self(Sha256::digest(canonical.as_bytes()).into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for WithdrawHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
