//! # Dex Cache
//!
//! A capacity-bounded key/value cache with least-recently-used eviction and
//! a pluggable persistence backend.
//!
//! - **Memory**: values held directly, gone with the cache instance
//! - **Session**: a shared in-process store ([`SessionStorage`]) that outlives
//!   individual cache instances for as long as a handle is alive
//! - **Persistent**: one file per entry on disk ([`FileStorage`])
//! - **Custom**: any [`ByteStore`] the caller supplies
//!
//! Several caches can share one physical store; each cache's `name` scopes
//! its keys, so two distinct caches must never share a name.
//!
//! ## Example
//!
//! ```rust
//! use dex_cache::{Backend, KeyedLruCache};
//!
//! let cache: KeyedLruCache<String> = KeyedLruCache::new("demo", Backend::Memory, 2).unwrap();
//! cache.put("a", "alpha".to_string());
//! cache.put("b", "beta".to_string());
//! cache.get("a");                      // refreshes "a"
//! cache.put("c", "gamma".to_string()); // evicts "b"
//!
//! assert!(cache.get("b").is_none());
//! assert_eq!(cache.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod backend;
mod cache;
mod config;
mod file;
mod key;
mod session;

pub use cache::{Backend, CacheStats, KeyedLruCache};
pub use config::{BackendKind, CacheConfig};
pub use file::FileStorage;
pub use key::{CacheKey, KeyMetadata};
pub use session::SessionStorage;

// Re-export the backend trait from core
pub use dex_core::traits::ByteStore;
