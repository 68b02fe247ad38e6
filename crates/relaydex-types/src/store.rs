//! Key-value state store abstraction and typed access on top of it.
//!
//! The host owns persistence; the core only sees [`StateStore`]. Records are
//! encoded as JSON through [`TypedStore`], which every store gets for free.
//! [`MemoryStore`] and [`CacheStore`] are complete in-process
//! implementations used by hosts that stage writes and by tests.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Byte-oriented key-value store with prefix iteration.
pub trait StateStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<()>;

    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// All entries whose key starts with `prefix`, in key order.
    fn find_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}

/// Typed record access for any [`StateStore`].
pub trait TypedStore: StateStore {
    fn load<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get-or-add without the add: absent records read as `T::default()`
    /// and nothing is written until the caller saves.
    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &[u8]) -> Result<T> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    fn save<T: Serialize>(&mut self, key: &[u8], value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, bytes)
    }
}

impl<S: StateStore + ?Sized> TypedStore for S {}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Ordered in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn find_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// CacheStore
// ---------------------------------------------------------------------------

/// Write-back overlay: reads fall through to `inner`, writes stay in the
/// overlay until [`CacheStore::commit`]. Dropping the cache discards them.
pub struct CacheStore<'a, S: StateStore + ?Sized> {
    inner: &'a mut S,
    /// `None` marks a staged delete.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: StateStore + ?Sized> CacheStore<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            writes: BTreeMap::new(),
        }
    }

    /// Number of staged writes and deletes.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Apply every staged write to the inner store.
    pub fn commit(self) -> Result<()> {
        for (key, value) in self.writes {
            match value {
                Some(bytes) => self.inner.set(&key, bytes)?,
                None => self.inner.delete(&key)?,
            }
        }
        Ok(())
    }
}

impl<S: StateStore + ?Sized> StateStore for CacheStore<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.inner.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.writes.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn find_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.inner.find_prefix(prefix)?.into_iter().collect();
        for (key, staged) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match staged {
                Some(bytes) => {
                    merged.insert(key.clone(), bytes.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}
