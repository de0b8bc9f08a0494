//! Cache construction parameters.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use dex_core::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_DIR, DEFAULT_CACHE_NAME};
use dex_core::error::{DexError, Result};

/// Where a cache keeps its entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Values held in the cache instance itself
    Memory,
    /// Shared in-process store, lives as long as the session
    Session,
    /// Files on disk, survive restarts
    Persistent,
    /// Caller-supplied byte store
    Custom,
}

impl BackendKind {
    /// Returns true if entries outlive the cache instance.
    pub fn is_durable(&self) -> bool {
        !matches!(self, BackendKind::Memory)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Memory => "memory",
            BackendKind::Session => "session",
            BackendKind::Persistent => "persistent",
            BackendKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for BackendKind {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(BackendKind::Memory),
            "session" => Ok(BackendKind::Session),
            "persistent" | "local" | "file" => Ok(BackendKind::Persistent),
            other => Err(DexError::ConfigError(format!(
                "unknown cache backend '{}' (expected memory, session, or persistent)",
                other
            ))),
        }
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Namespace separating this cache from others on the same store
    pub name: String,
    /// Backend selection
    pub backend: BackendKind,
    /// Maximum number of resident entries
    pub capacity: usize,
    /// Directory for the persistent backend
    pub storage_dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CACHE_NAME.into(),
            backend: BackendKind::Session,
            capacity: DEFAULT_CACHE_CAPACITY,
            storage_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl CacheConfig {
    /// Creates a config with the given name, backend, and capacity.
    pub fn new(name: impl Into<String>, backend: BackendKind, capacity: usize) -> Self {
        Self {
            name: name.into(),
            backend,
            capacity,
            ..Default::default()
        }
    }

    /// Sets the directory used by the persistent backend.
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Checks that the config describes a usable cache.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DexError::ValidationError("cache name cannot be empty".into()));
        }
        if self.capacity == 0 {
            return Err(DexError::ValidationError("cache capacity must be positive".into()));
        }
        Ok(())
    }
}
