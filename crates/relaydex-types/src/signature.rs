//! m-of-n ed25519 multi-signatures.
//!
//! A [`MultiSig`] carries the full public key set, the threshold and the
//! signatures. The account it authorizes is derived from the key set with
//! [`Address::from_public_keys`], so "who signed" and "is it valid" are two
//! separate checks.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::{DexError, Result};
use crate::ids::Address;

/// Threshold signature over an arbitrary payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSig {
    /// Every key of the controlling set (ed25519, compressed).
    pub public_keys: Vec<[u8; 32]>,
    /// Number of distinct keys that must sign.
    pub m: u8,
    /// Raw 64-byte signatures, in any order.
    pub sig_data: Vec<Vec<u8>>,
}

impl MultiSig {
    /// Sign `data` with each of `signers`, declaring `public_keys` as the
    /// controlling set.
    #[must_use]
    pub fn sign(public_keys: Vec<[u8; 32]>, m: u8, signers: &[&SigningKey], data: &[u8]) -> Self {
        let sig_data = signers
            .iter()
            .map(|key| key.sign(data).to_bytes().to_vec())
            .collect();
        Self {
            public_keys,
            m,
            sig_data,
        }
    }

    /// One-of-one signature.
    #[must_use]
    pub fn single(signer: &SigningKey, data: &[u8]) -> Self {
        Self::sign(vec![signer.verifying_key().to_bytes()], 1, &[signer], data)
    }

    /// The account controlled by this key set.
    pub fn recover_address(&self) -> Result<Address> {
        Address::from_public_keys(&self.public_keys, self.m)
    }

    /// Check that this key set controls `expected`.
    ///
    /// # Errors
    /// `SigKeySetInvalid` if no address can be derived from the key set,
    /// `SigUserMismatch` if it derives a different one.
    pub fn ensure_signer(&self, expected: &Address) -> Result<()> {
        let recovered = self
            .recover_address()
            .map_err(|err| DexError::SigKeySetInvalid {
                expected: *expected,
                reason: err.to_string(),
            })?;
        if recovered != *expected {
            return Err(DexError::SigUserMismatch {
                expected: *expected,
                recovered,
            });
        }
        Ok(())
    }

    /// `true` iff at least `m` signatures verify under distinct listed keys.
    #[must_use]
    pub fn verify(&self, data: &[u8]) -> bool {
        if self.m == 0 {
            return false;
        }
        let keys: Vec<Option<VerifyingKey>> = self
            .public_keys
            .iter()
            .map(|bytes| VerifyingKey::from_bytes(bytes).ok())
            .collect();
        let mut used = vec![false; keys.len()];
        let mut valid = 0usize;

        for raw in &self.sig_data {
            let Ok(sig) = Signature::from_slice(raw) else {
                continue;
            };
            let hit = keys.iter().enumerate().position(|(i, key)| {
                !used[i] && key.as_ref().is_some_and(|k| k.verify_strict(data, &sig).is_ok())
            });
            if let Some(i) = hit {
                used[i] = true;
                valid += 1;
            }
        }
        valid >= usize::from(self.m)
    }
}
