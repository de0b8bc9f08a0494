//! Client configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use dex_cache::{BackendKind, CacheConfig};
use dex_core::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use dex_core::error::{DexError, Result};

/// Catalog client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Catalog API root (e.g. "https://pokeapi.co/api/v2")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent sent with each request
    pub user_agent: String,
    /// Response cache settings
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.into(),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a config pointing at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Loads config from the environment (and `.env`, if present).
    ///
    /// Recognised variables: `DEX_BASE_URL`, `DEX_TIMEOUT_SECONDS`,
    /// `DEX_CACHE_NAME`, `DEX_CACHE_BACKEND`, `DEX_CACHE_CAPACITY`,
    /// `DEX_CACHE_DIR`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("DEX_BASE_URL") {
            config.base_url = url;
        }
        if let Some(timeout) = lookup("DEX_TIMEOUT_SECONDS") {
            config.timeout_seconds = parse_number("DEX_TIMEOUT_SECONDS", &timeout)?;
        }
        if let Some(name) = lookup("DEX_CACHE_NAME") {
            config.cache.name = name;
        }
        if let Some(backend) = lookup("DEX_CACHE_BACKEND") {
            config.cache.backend = backend.parse()?;
        }
        if let Some(capacity) = lookup("DEX_CACHE_CAPACITY") {
            config.cache.capacity = parse_number("DEX_CACHE_CAPACITY", &capacity)?;
        }
        if let Some(dir) = lookup("DEX_CACHE_DIR") {
            config.cache.storage_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Selects the cache backend.
    pub fn with_cache_backend(mut self, backend: BackendKind) -> Self {
        self.cache.backend = backend;
        self
    }

    /// Sets the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache.capacity = capacity;
        self
    }

    /// Sets the directory for the persistent cache backend.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache.storage_dir = dir.into();
        self
    }

    /// Parses and checks the base URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| DexError::ConfigError(format!("invalid base URL '{}': {}", self.base_url, e)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(DexError::ConfigError(format!(
                "base URL must be an http(s) URL: {}",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Checks the whole config.
    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        if self.timeout_seconds == 0 {
            return Err(DexError::ConfigError("timeout must be positive".into()));
        }
        self.cache.validate()
    }
}

fn parse_number<N: std::str::FromStr>(name: &str, raw: &str) -> Result<N> {
    raw.trim()
        .parse()
        .map_err(|_| DexError::ConfigError(format!("{} must be a number, got '{}'", name, raw)))
}
