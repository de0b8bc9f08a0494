//! Capacity-bounded LRU cache over a pluggable backend.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use dex_core::error::{DexError, Result};
use dex_core::traits::ByteStore;

use crate::backend::{DurableEntries, EntryStore, MemoryEntries};
use crate::config::{BackendKind, CacheConfig};
use crate::file::FileStorage;
use crate::key::{CacheKey, KeyMetadata};
use crate::session::SessionStorage;

/// Backend selection, carrying the shared store for durable kinds.
#[derive(Clone)]
pub enum Backend {
    /// Values held in the cache instance
    Memory,
    /// Shared in-process store
    Session(SessionStorage),
    /// Files on disk
    Persistent(FileStorage),
    /// Any caller-supplied byte store
    Custom(Arc<dyn ByteStore>),
}

impl Backend {
    /// Builds the backend a config asks for.
    ///
    /// `session` is the store to share for the session kind; a fresh one is
    /// created when none is given.
    pub fn from_config(config: &CacheConfig, session: Option<&SessionStorage>) -> Result<Self> {
        Ok(match config.backend {
            BackendKind::Memory => Backend::Memory,
            BackendKind::Session => Backend::Session(session.cloned().unwrap_or_default()),
            BackendKind::Persistent => Backend::Persistent(FileStorage::open(&config.storage_dir)?),
            BackendKind::Custom => {
                return Err(DexError::ConfigError(
                    "a custom backend needs its store passed as Backend::Custom".into(),
                ))
            }
        })
    }

    /// Returns the backend kind.
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Memory => BackendKind::Memory,
            Backend::Session(_) => BackendKind::Session,
            Backend::Persistent(_) => BackendKind::Persistent,
            Backend::Custom(_) => BackendKind::Custom,
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => f.write_str("Memory"),
            Backend::Session(storage) => f.debug_tuple("Session").field(storage).finish(),
            Backend::Persistent(storage) => f.debug_tuple("Persistent").field(storage).finish(),
            Backend::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Resident entries
    pub entries: usize,
    /// Maximum resident entries
    pub capacity: usize,
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that returned nothing
    pub misses: u64,
    /// Entries removed to stay within capacity
    pub evictions: u64,
}

struct LruState<T> {
    store: Box<dyn EntryStore<T>>,
    /// Sorted by `last_accessed`, most recent first
    metadata: Vec<KeyMetadata>,
    last_tick: i64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<T> LruState<T> {
    /// Wall-clock milliseconds, forced strictly increasing.
    fn tick(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_tick = now.max(self.last_tick + 1);
        self.last_tick
    }

    fn position(&self, key: &CacheKey) -> Option<usize> {
        self.metadata.iter().position(|m| &m.key == key)
    }

    fn sort_by_recency(&mut self) {
        // Vec::sort_by is stable: equal timestamps keep their relative order
        self.metadata.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
    }

    fn evict_overflow(&mut self, capacity: usize) {
        while self.metadata.len() > capacity {
            if let Some(lru) = self.metadata.pop() {
                debug!(key = %lru.key, "Evicting least recently used entry");
                self.store.remove(&lru.key);
                self.evictions += 1;
            }
        }
    }

    fn persist_metadata(&mut self) {
        self.store.save_metadata(&self.metadata);
    }
}

/// A bounded key/value cache with least-recently-used eviction.
///
/// Every resident key has exactly one recency record; the list of records is
/// kept sorted most-recent-first and eviction always takes the tail. Durable
/// backends persist the list next to the entries so a new instance with the
/// same name picks up where the last one left off.
///
/// Backend failures never surface to callers: a failed read is a miss and a
/// failed write leaves the entry unstored, both logged at `warn`.
///
/// Thread-safe; all operations take `&self`.
pub struct KeyedLruCache<T> {
    name: String,
    capacity: usize,
    state: Mutex<LruState<T>>,
}

impl<T> KeyedLruCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + 'static,
{
    /// Creates a cache named `name` over `backend` holding at most `capacity` entries.
    ///
    /// Durable backends load the metadata list previously persisted under
    /// `name`. Duplicate records are collapsed and anything beyond
    /// `capacity` is evicted straight away.
    pub fn new(name: impl Into<String>, backend: Backend, capacity: usize) -> Result<Self> {
        let name = name.into();
        let config = CacheConfig::new(name.clone(), backend.kind(), capacity);
        config.validate()?;

        let kind = backend.kind();
        let store: Box<dyn EntryStore<T>> = match backend {
            Backend::Memory => Box::new(MemoryEntries::new()),
            Backend::Session(storage) => Box::new(DurableEntries::new(name.clone(), kind, storage)),
            Backend::Persistent(storage) => Box::new(DurableEntries::new(name.clone(), kind, storage)),
            Backend::Custom(storage) => Box::new(DurableEntries::new(name.clone(), kind, storage)),
        };

        let cache = Self {
            name,
            capacity,
            state: Mutex::new(LruState {
                store,
                metadata: Vec::new(),
                last_tick: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        };
        cache.restore_metadata();
        Ok(cache)
    }

    /// Creates an in-memory cache.
    pub fn in_memory(name: impl Into<String>, capacity: usize) -> Result<Self> {
        Self::new(name, Backend::Memory, capacity)
    }

    /// Creates a cache from a config.
    pub fn from_config(config: &CacheConfig, session: Option<&SessionStorage>) -> Result<Self> {
        config.validate()?;
        Self::new(config.name.clone(), Backend::from_config(config, session)?, config.capacity)
    }

    fn restore_metadata(&self) {
        let mut state = self.state.lock();
        let loaded = state.store.load_metadata();
        if loaded.is_empty() {
            return;
        }

        let loaded_len = loaded.len();
        state.metadata = loaded;
        state.sort_by_recency();

        let mut seen = HashSet::new();
        state.metadata.retain(|m| seen.insert(m.key.clone()));
        state.evict_overflow(self.capacity);

        state.last_tick = state.metadata.first().map_or(0, |m| m.last_accessed);
        if state.metadata.len() != loaded_len {
            state.persist_metadata();
        }

        debug!(
            cache = %self.name,
            entries = state.metadata.len(),
            "Restored cache metadata"
        );
    }

    /// Looks up `key`, refreshing its recency on a hit.
    ///
    /// A miss is a normal outcome and has no side effects beyond dropping a
    /// recency record whose value has vanished from the backend.
    pub fn get(&self, key: impl Into<CacheKey>) -> Option<T> {
        let key = key.into();
        let mut state = self.state.lock();

        let Some(value) = state.store.load(&key) else {
            state.misses += 1;
            if let Some(pos) = state.position(&key) {
                debug!(cache = %self.name, %key, "Dropping metadata for vanished entry");
                state.metadata.remove(pos);
                state.persist_metadata();
            }
            debug!(cache = %self.name, %key, "Cache miss");
            return None;
        };

        let now = state.tick();
        match state.position(&key) {
            Some(pos) => state.metadata[pos].last_accessed = now,
            None => {
                // Written by another instance sharing this name; adopt it
                state.metadata.push(KeyMetadata {
                    key: key.clone(),
                    last_accessed: now,
                });
            }
        }
        state.sort_by_recency();
        state.evict_overflow(self.capacity);
        state.persist_metadata();
        state.hits += 1;

        debug!(cache = %self.name, %key, "Cache hit");
        Some(value)
    }

    /// Stores `value` under `key`, evicting the least recently used entry
    /// if the cache would exceed its capacity.
    ///
    /// Re-putting a resident key replaces its value and refreshes its
    /// existing recency record; it never evicts.
    pub fn put(&self, key: impl Into<CacheKey>, value: T) {
        let key = key.into();
        let mut state = self.state.lock();

        let now = state.tick();
        if let Some(pos) = state.position(&key) {
            state.metadata.remove(pos);
        }
        state.metadata.insert(
            0,
            KeyMetadata {
                key: key.clone(),
                last_accessed: now,
            },
        );
        state.store.store(&key, value);
        state.evict_overflow(self.capacity);
        state.persist_metadata();

        debug!(cache = %self.name, %key, entries = state.metadata.len(), "Cached entry");
    }

    /// Reads `key` without refreshing its recency or counting toward stats.
    pub fn peek(&self, key: impl Into<CacheKey>) -> Option<T> {
        let key = key.into();
        let state = self.state.lock();
        state.position(&key)?;
        state.store.load(&key)
    }

    /// Returns true if `key` is resident. Does not refresh recency.
    pub fn contains(&self, key: impl Into<CacheKey>) -> bool {
        let key = key.into();
        self.state.lock().position(&key).is_some()
    }

    /// Removes `key`, returning whether it was resident.
    pub fn remove(&self, key: impl Into<CacheKey>) -> bool {
        let key = key.into();
        let mut state = self.state.lock();

        let Some(pos) = state.position(&key) else {
            return false;
        };
        state.metadata.remove(pos);
        state.store.remove(&key);
        state.persist_metadata();
        true
    }

    /// Removes every entry this cache owns.
    ///
    /// Other caches sharing the same physical store are untouched.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let metadata = std::mem::take(&mut state.metadata);
        for record in &metadata {
            state.store.remove(&record.key);
        }
        state.persist_metadata();
        debug!(cache = %self.name, removed = metadata.len(), "Cleared cache");
    }

    /// Returns resident keys, most recently used first.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.state.lock().metadata.iter().map(|m| m.key.clone()).collect()
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.state.lock().metadata.len()
    }

    /// Returns true if nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.state.lock().metadata.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cache's namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the backend kind.
    pub fn kind(&self) -> BackendKind {
        self.state.lock().store.kind()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.metadata.len(),
            capacity: self.capacity,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        }
    }
}

impl<T> fmt::Debug for KeyedLruCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedLruCache")
            .field("name", &self.name)
            .field("kind", &self.state.lock().store.kind())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn memory_cache(capacity: usize) -> KeyedLruCache<String> {
        KeyedLruCache::in_memory("test", capacity).unwrap()
    }

    fn session_cache(storage: &SessionStorage, name: &str, capacity: usize) -> KeyedLruCache<String> {
        KeyedLruCache::new(name, Backend::Session(storage.clone()), capacity).unwrap()
    }

    #[test]
    fn test_put_get() {
        let cache = memory_cache(3);
        cache.put("a", "alpha".into());

        assert_eq!(cache.get("a").as_deref(), Some("alpha"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss_has_no_side_effects() {
        let cache = memory_cache(3);
        assert!(cache.get("nope").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_lru_evicts_least_recently_used() {
        let cache = memory_cache(2);
        cache.put("a", "1".into());
        cache.put("b", "2".into());
        assert!(cache.get("a").is_some());
        cache.put("c", "3".into());

        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_recency_refresh_protects_key() {
        let cache = memory_cache(3);
        cache.put("a", "1".into());
        cache.put("b", "2".into());
        cache.put("c", "3".into());

        // "a" is oldest by insertion, but reading it moves "b" to the tail
        cache.get("a");
        assert_eq!(cache.keys().last().map(CacheKey::as_str), Some("b"));

        cache.put("d", "4".into());
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_insertion_order_without_reads() {
        let cache = memory_cache(2);
        cache.put("a", "1".into());
        cache.put("b", "2".into());
        cache.put("c", "3".into());

        assert!(!cache.contains("a"));
        assert_eq!(
            cache.keys(),
            vec![CacheKey::from("c"), CacheKey::from("b")]
        );
    }

    #[test]
    fn test_reput_updates_in_place() {
        let cache = memory_cache(2);
        cache.put("a", "1".into());
        cache.put("b", "2".into());
        cache.put("a", "1b".into());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.keys()[0].as_str(), "a");
        assert_eq!(cache.get("a").as_deref(), Some("1b"));

        // "b" is now the tail
        cache.put("c", "3".into());
        assert!(!cache.contains("b"));
        assert!(cache.contains("a"));
    }

    #[test]
    fn test_integer_keys() {
        let cache = memory_cache(2);
        cache.put(25u64, "pikachu".into());
        assert_eq!(cache.get("25").as_deref(), Some("pikachu"));
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = memory_cache(3);
        cache.put("a", "1".into());
        cache.put("b", "2".into());

        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        assert!(cache.get("a").is_none());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = KeyedLruCache::<String>::in_memory("test", 0);
        assert!(matches!(result, Err(DexError::ValidationError(_))));
    }

    #[test]
    fn test_memory_backend_starts_empty() {
        let first = memory_cache(2);
        first.put("a", "1".into());

        let second = memory_cache(2);
        assert!(second.get("a").is_none());
    }

    #[test]
    fn test_session_round_trip_across_instances() {
        let storage = SessionStorage::new();
        {
            let cache = session_cache(&storage, "client", 3);
            cache.put("a", "alpha".into());
            cache.put("b", "beta".into());
        }

        let cache = session_cache(&storage, "client", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").as_deref(), Some("alpha"));
        assert_eq!(cache.get("b").as_deref(), Some("beta"));
    }

    #[test]
    fn test_persistent_round_trip_across_instances() {
        let dir = tempdir().unwrap();
        {
            let cache: KeyedLruCache<Vec<u32>> =
                KeyedLruCache::new("client", Backend::Persistent(FileStorage::open(dir.path()).unwrap()), 3)
                    .unwrap();
            cache.put("https://pokeapi.co/api/v2/pokemon/1/", vec![1, 2, 3]);
        }

        let cache: KeyedLruCache<Vec<u32>> =
            KeyedLruCache::new("client", Backend::Persistent(FileStorage::open(dir.path()).unwrap()), 3)
                .unwrap();
        assert_eq!(cache.get("https://pokeapi.co/api/v2/pokemon/1/"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_recency_persists_across_instances() {
        let storage = SessionStorage::new();
        {
            let cache = session_cache(&storage, "client", 2);
            cache.put("a", "1".into());
            cache.put("b", "2".into());
            cache.get("a");
        }

        let cache = session_cache(&storage, "client", 2);
        cache.put("c", "3".into());
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(!storage.contains_key("client-b"));
    }

    #[test]
    fn test_namespace_isolation() {
        let storage = SessionStorage::new();
        let left = session_cache(&storage, "left", 2);
        let right = session_cache(&storage, "right", 2);

        left.put("k", "from-left".into());

        assert!(right.get("k").is_none());
        assert!(!right.contains("k"));
        assert_eq!(left.get("k").as_deref(), Some("from-left"));

        right.clear();
        assert!(left.contains("k"));
    }

    #[test]
    fn test_eviction_deletes_backend_value() {
        let storage = SessionStorage::new();
        let cache = session_cache(&storage, "client", 1);
        cache.put("a", "1".into());
        cache.put("b", "2".into());

        assert!(!storage.contains_key("client-a"));
        assert!(storage.contains_key("client-b"));
    }

    #[test]
    fn test_shrunk_capacity_trims_on_load() {
        let storage = SessionStorage::new();
        {
            let cache = session_cache(&storage, "client", 4);
            for key in ["a", "b", "c", "d"] {
                cache.put(key, key.to_string());
            }
        }

        let cache = session_cache(&storage, "client", 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.keys(), vec![CacheKey::from("d"), CacheKey::from("c")]);
        assert!(!storage.contains_key("client-a"));
    }

    #[test]
    fn test_duplicate_persisted_records_collapse() {
        let storage = SessionStorage::new();
        let records = serde_json::json!([
            {"key": "a", "last_accessed": 10},
            {"key": "b", "last_accessed": 20},
            {"key": "a", "last_accessed": 30}
        ]);
        storage
            .write("client:key-metadata", records.to_string().as_bytes())
            .unwrap();

        let cache = session_cache(&storage, "client", 5);
        assert_eq!(cache.keys(), vec![CacheKey::from("a"), CacheKey::from("b")]);
    }

    #[test]
    fn test_stable_tie_break() {
        let storage = SessionStorage::new();
        let records = serde_json::json!([
            {"key": "x", "last_accessed": 5},
            {"key": "y", "last_accessed": 5},
            {"key": "z", "last_accessed": 5}
        ]);
        storage
            .write("client:key-metadata", records.to_string().as_bytes())
            .unwrap();

        let cache = session_cache(&storage, "client", 2);
        // Equal timestamps keep list order; the last record is evicted
        assert_eq!(cache.keys(), vec![CacheKey::from("x"), CacheKey::from("y")]);
    }

    #[test]
    fn test_vanished_value_drops_metadata() {
        let storage = SessionStorage::new();
        let cache = session_cache(&storage, "client", 3);
        cache.put("a", "1".into());

        storage.delete("client-a").unwrap();

        assert!(cache.get("a").is_none());
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_backend_failure_degrades_to_miss() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("cache");
        let cache: KeyedLruCache<String> =
            KeyedLruCache::new("client", Backend::Persistent(FileStorage::open(&root).unwrap()), 2)
                .unwrap();
        std::fs::remove_dir_all(&root).unwrap();

        cache.put("a", "1".into());
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_from_config_shares_session() {
        let storage = SessionStorage::new();
        let config = CacheConfig::new("client", BackendKind::Session, 2);

        let first: KeyedLruCache<String> = KeyedLruCache::from_config(&config, Some(&storage)).unwrap();
        first.put("a", "1".into());

        let second: KeyedLruCache<String> = KeyedLruCache::from_config(&config, Some(&storage)).unwrap();
        assert_eq!(second.kind(), BackendKind::Session);
        assert_eq!(second.get("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_peek_leaves_recency_and_stats() {
        let cache = memory_cache(2);
        cache.put("a", "1".into());
        cache.put("b", "2".into());

        assert_eq!(cache.peek("a").as_deref(), Some("1"));
        assert!(cache.peek("zzz").is_none());
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 0);

        // "a" was only peeked, so it is still the eviction candidate
        cache.put("c", "3".into());
        assert!(!cache.contains("a"));
    }

    #[derive(Default)]
    struct CountingStore {
        entries: parking_lot::Mutex<std::collections::HashMap<String, Vec<u8>>>,
        writes: std::sync::atomic::AtomicUsize,
    }

    impl ByteStore for CountingStore {
        fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.entries.lock().get(key).cloned())
        }

        fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
            self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.entries.lock().insert(key.to_string(), bytes.to_vec());
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<()> {
            self.entries.lock().remove(key);
            Ok(())
        }
    }

    #[test]
    fn test_custom_store() {
        let store = Arc::new(CountingStore::default());
        let open = || KeyedLruCache::<String>::new("custom", Backend::Custom(store.clone()), 2).unwrap();

        let cache = open();
        assert_eq!(cache.kind(), BackendKind::Custom);
        cache.put("a", "1".into());
        cache.put("b", "2".into());
        assert_eq!(cache.get("a").as_deref(), Some("1"));
        cache.put("c", "3".into());

        assert!(!store.entries.lock().contains_key("custom-b"));
        assert!(store.entries.lock().contains_key("custom-a"));
        assert!(store.entries.lock().contains_key("custom:key-metadata"));
        assert!(store.writes.load(std::sync::atomic::Ordering::SeqCst) > 0);

        // A new instance over the same store sees the same entries
        let reopened = open();
        assert_eq!(reopened.keys().len(), 2);
        assert_eq!(reopened.get("c").as_deref(), Some("3"));
        assert!(reopened.get("b").is_none());
    }

    #[test]
    fn test_custom_kind_needs_a_store() {
        let config = CacheConfig::new("custom", BackendKind::Custom, 2);
        let err = KeyedLruCache::<String>::from_config(&config, None).unwrap_err();
        assert!(matches!(err, DexError::ConfigError(_)));
    }

    #[test]
    fn test_persistent_long_url_round_trip() {
        let dir = tempdir().unwrap();
        let url = format!("https://pokeapi.co/api/v2/pokemon?limit=20&offset=0&filter={}", "a".repeat(180));
        assert!(url.len() > 200);

        let open = || {
            KeyedLruCache::<String>::new(
                "dex-catalog-client",
                Backend::Persistent(FileStorage::open(dir.path()).unwrap()),
                15,
            )
            .unwrap()
        };
        open().put(url.as_str(), "page".into());

        assert_eq!(open().get(url.as_str()).as_deref(), Some("page"));
    }

    #[test]
    fn test_stats() {
        let cache = memory_cache(1);
        cache.put("a", "1".into());
        cache.get("a");
        cache.get("b");
        cache.put("b", "2".into());

        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                capacity: 1,
                hits: 1,
                misses: 1,
                evictions: 1,
            }
        );
    }

    #[derive(Clone, Debug)]
    enum Op {
        Put(u8),
        Get(u8),
        Remove(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..12).prop_map(Op::Put),
            (0u8..12).prop_map(Op::Get),
            (0u8..12).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_capacity_never_exceeded(
            capacity in 1usize..6,
            ops in proptest::collection::vec(op_strategy(), 0..64),
        ) {
            let storage = SessionStorage::new();
            let cache = session_cache(&storage, "prop", capacity);

            for op in ops {
                match op {
                    Op::Put(k) => cache.put(k as u32, k.to_string()),
                    Op::Get(k) => { cache.get(k as u32); }
                    Op::Remove(k) => { cache.remove(k as u32); }
                }
                prop_assert!(cache.len() <= capacity);

                // One record per key, and exactly the resident keys are stored
                let keys = cache.keys();
                let unique: HashSet<_> = keys.iter().collect();
                prop_assert_eq!(unique.len(), keys.len());
                for key in &keys {
                    let qualified = format!("prop-{}", key);
                    prop_assert!(storage.contains_key(&qualified), "missing entry for {}", qualified);
                }
                let metadata_slot = usize::from(storage.contains_key("prop:key-metadata"));
                prop_assert_eq!(storage.len() - metadata_slot, keys.len());
            }
        }
    }
}
