//! Catalog endpoints and cache defaults.

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG API
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the public creature catalog.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Resource path for creatures, relative to the base URL.
pub const CREATURE_RESOURCE: &str = "pokemon";

/// Page size used when walking the catalog list.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// User agent sent with catalog requests.
pub const DEFAULT_USER_AGENT: &str = concat!("dex/", env!("CARGO_PKG_VERSION"));

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Namespace of the catalog client's cache.
pub const DEFAULT_CACHE_NAME: &str = "dex-catalog-client";

/// Resident entries kept by the catalog client's cache.
///
/// Small on purpose: a catalog page plus the details a user browses from it.
pub const DEFAULT_CACHE_CAPACITY: usize = 15;

/// Directory used by the persistent backend when none is configured.
pub const DEFAULT_CACHE_DIR: &str = ".dex-cache";

/// Separator between a cache name and an entry key in backend storage.
pub const ENTRY_KEY_SEPARATOR: char = '-';

/// Suffix of the backend key holding a cache's recency metadata.
///
/// Joined to the cache name with `:` so no entry key can produce it.
pub const KEY_METADATA_SUFFIX: &str = "key-metadata";

// ═══════════════════════════════════════════════════════════════════════════════
// SEARCH
// ═══════════════════════════════════════════════════════════════════════════════

/// Quiet period before a search query is acted on, in milliseconds.
pub const SEARCH_DELAY_MS: u64 = 500;
