//! # Dex Client
//!
//! Cache-backed access to the creature catalog.
//!
//! [`CatalogClient`] serves list pages and creature details through a
//! [`KeyedLruCache`](dex_cache::KeyedLruCache), and never has two network
//! calls for the same URL in flight: a second request while the first is
//! pending fails fast with [`DexError::Busy`](dex_core::DexError::Busy).
//!
//! Share one client (behind an `Arc`) across everything that should see the
//! same cache and deduplication.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dex_client::{CatalogClient, ClientConfig};
//!
//! let client = CatalogClient::new(ClientConfig::default())?;
//! let page = client.fetch_list(&client.first_page_url(10, 0)?).await?;
//! let first = client.fetch_details(&page.results[0].url).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
mod config;
mod debounce;
mod inflight;
mod transport;

pub use client::CatalogClient;
pub use config::ClientConfig;
pub use debounce::SearchDebouncer;
pub use inflight::{InFlightGuard, InFlightSet};
pub use transport::{CatalogTransport, HttpTransport};
