//! Common traits for the dex crates.

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// BYTE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// A key-scoped byte store backing a durable cache.
///
/// Keys are fully qualified (`"{cache name}-{entry key}"`), so one store can be
/// shared by several caches as long as their names differ. Implementations
/// might use:
/// - A shared in-process map (session lifetime)
/// - Files on disk (survive restarts)
/// - An embedded key-value database
pub trait ByteStore: Send + Sync {
    /// Reads the bytes stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `bytes` under `key`, replacing any previous value.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

impl<S: ByteStore + ?Sized> ByteStore for std::sync::Arc<S> {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).write(key, bytes)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, Vec<u8>>>);

    impl ByteStore for MapStore {
        fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
            self.0.lock().unwrap().insert(key.to_string(), bytes.to_vec());
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<()> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[test]
    fn test_arc_store_delegates() {
        let store = Arc::new(MapStore::default());
        let shared: Arc<MapStore> = store.clone();

        shared.write("a-1", b"one").unwrap();
        assert_eq!(store.read("a-1").unwrap(), Some(b"one".to_vec()));

        shared.delete("a-1").unwrap();
        assert_eq!(store.read("a-1").unwrap(), None);
        // Deleting twice is fine
        shared.delete("a-1").unwrap();
    }
}
