//! The set of requests currently on the wire.

use std::collections::HashSet;

use parking_lot::Mutex;

/// Identifiers of in-flight requests.
///
/// Membership is claimed with [`try_acquire`](Self::try_acquire), which
/// checks and inserts under one lock, and released when the returned guard
/// drops. Every exit path of a request (success, error, or the future being
/// dropped) therefore clears its marker exactly once.
#[derive(Debug, Default)]
pub struct InFlightSet {
    keys: Mutex<HashSet<String>>,
}

impl InFlightSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key`, or returns `None` if it is already in flight.
    pub fn try_acquire(&self, key: &str) -> Option<InFlightGuard<'_>> {
        if !self.keys.lock().insert(key.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            set: self,
            key: key.to_string(),
        })
    }

    /// Returns true if `key` is in flight.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.lock().contains(key)
    }

    /// Returns the number of in-flight requests.
    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    /// Returns true if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }
}

/// Marks one request as in flight until dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    set: &'a InFlightSet,
    key: String,
}

impl InFlightGuard<'_> {
    /// Returns the claimed key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.keys.lock().remove(&self.key);
    }
}
