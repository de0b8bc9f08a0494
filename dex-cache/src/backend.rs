//! Entry storage strategies behind [`KeyedLruCache`](crate::KeyedLruCache).
//!
//! The cache picks one strategy at construction and never branches on the
//! backend kind again. Durable strategies swallow store failures after
//! logging them: a failed read is a miss, a failed write leaves the entry
//! unstored.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use dex_core::error::DexError;
use dex_core::traits::ByteStore;

use crate::config::BackendKind;
use crate::key::{CacheKey, KeyMetadata, StorageKey};

/// How a cache reads, writes, and forgets entries and its metadata list.
pub(crate) trait EntryStore<T>: Send {
    fn kind(&self) -> BackendKind;

    fn load(&self, key: &CacheKey) -> Option<T>;

    fn store(&mut self, key: &CacheKey, value: T);

    fn remove(&mut self, key: &CacheKey);

    fn load_metadata(&self) -> Vec<KeyMetadata>;

    fn save_metadata(&mut self, metadata: &[KeyMetadata]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMORY
// ═══════════════════════════════════════════════════════════════════════════════

/// Values held directly; nothing persists past the cache instance.
pub(crate) struct MemoryEntries<T> {
    values: HashMap<CacheKey, T>,
}

impl<T> MemoryEntries<T> {
    pub(crate) fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<T: Clone + Send> EntryStore<T> for MemoryEntries<T> {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn load(&self, key: &CacheKey) -> Option<T> {
        self.values.get(key).cloned()
    }

    fn store(&mut self, key: &CacheKey, value: T) {
        self.values.insert(key.clone(), value);
    }

    fn remove(&mut self, key: &CacheKey) {
        self.values.remove(key);
    }

    fn load_metadata(&self) -> Vec<KeyMetadata> {
        Vec::new()
    }

    fn save_metadata(&mut self, _metadata: &[KeyMetadata]) {}
}

// ═══════════════════════════════════════════════════════════════════════════════
// DURABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// JSON-encoded values in a shared byte store, namespaced by cache name.
pub(crate) struct DurableEntries<S> {
    name: String,
    kind: BackendKind,
    store: S,
}

impl<S: ByteStore> DurableEntries<S> {
    pub(crate) fn new(name: impl Into<String>, kind: BackendKind, store: S) -> Self {
        Self {
            name: name.into(),
            kind,
            store,
        }
    }

    fn read_json<V: DeserializeOwned>(&self, key: StorageKey<'_>) -> Option<V> {
        let qualified = key.qualify(&self.name);
        let bytes = match self.store.read(&qualified) {
            Ok(bytes) => bytes?,
            Err(e) => {
                warn!(key = %qualified, error = %e, "Cache backend read failed");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %qualified, error = %e, "Discarding undecodable cache record");
                None
            }
        }
    }

    fn write_json<V: Serialize + ?Sized>(&self, key: StorageKey<'_>, value: &V) {
        let qualified = key.qualify(&self.name);
        let result = serde_json::to_vec(value)
            .map_err(DexError::from)
            .and_then(|bytes| self.store.write(&qualified, &bytes));

        if let Err(e) = result {
            warn!(key = %qualified, error = %e, "Cache backend write failed");
        }
    }
}

impl<S, T> EntryStore<T> for DurableEntries<S>
where
    S: ByteStore,
    T: Serialize + DeserializeOwned,
{
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn load(&self, key: &CacheKey) -> Option<T> {
        self.read_json(StorageKey::Entry(key))
    }

    fn store(&mut self, key: &CacheKey, value: T) {
        self.write_json(StorageKey::Entry(key), &value);
    }

    fn remove(&mut self, key: &CacheKey) {
        let qualified = StorageKey::Entry(key).qualify(&self.name);
        if let Err(e) = self.store.delete(&qualified) {
            warn!(key = %qualified, error = %e, "Cache backend delete failed");
        }
    }

    fn load_metadata(&self) -> Vec<KeyMetadata> {
        self.read_json(StorageKey::Metadata).unwrap_or_default()
    }

    fn save_metadata(&mut self, metadata: &[KeyMetadata]) {
        self.write_json(StorageKey::Metadata, metadata);
    }
}
