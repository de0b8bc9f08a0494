//! Session-scoped byte store.
//!
//! A shared in-process map. Every clone of a [`SessionStorage`] handle sees
//! the same entries, so caches built over it keep their contents across
//! instances for as long as any handle lives.

use std::sync::Arc;

use dashmap::DashMap;

use dex_core::error::Result;
use dex_core::traits::ByteStore;

/// Shared in-process byte store.
///
/// Cloning is cheap and yields a handle to the same storage.
#[derive(Clone, Debug, Default)]
pub struct SessionStorage {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl SessionStorage {
    /// Creates a new, empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys across all caches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` is stored.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes every key, for every cache sharing this store.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl ByteStore for SessionStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
