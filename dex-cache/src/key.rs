//! Cache keys and recency metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

use dex_core::constants::{ENTRY_KEY_SEPARATOR, KEY_METADATA_SUFFIX};

/// Stable identifier of a cache entry.
///
/// Strings and integers are both accepted; integers use their decimal form,
/// so `42` and `"42"` name the same entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates a key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&String> for CacheKey {
    fn from(key: &String) -> Self {
        Self(key.clone())
    }
}

impl From<&CacheKey> for CacheKey {
    fn from(key: &CacheKey) -> Self {
        key.clone()
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CacheKey {
                fn from(key: $ty) -> Self {
                    Self(key.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(u32, u64, i32, i64, usize);

/// Recency record for one resident key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetadata {
    /// The resident key
    pub key: CacheKey,
    /// Milliseconds since the Unix epoch of the last read or write
    pub last_accessed: i64,
}

/// Where something lives in a shared byte store.
///
/// Entries and the metadata list use different separators, so no entry key
/// can land on a cache's metadata slot.
pub(crate) enum StorageKey<'a> {
    Entry(&'a CacheKey),
    Metadata,
}

impl StorageKey<'_> {
    /// Returns the fully qualified backend key for a cache named `name`.
    pub(crate) fn qualify(&self, name: &str) -> String {
        match self {
            StorageKey::Entry(key) => format!("{}{}{}", name, ENTRY_KEY_SEPARATOR, key),
            StorageKey::Metadata => format!("{}:{}", name, KEY_METADATA_SUFFIX),
        }
    }
}
