//! Cache-backed, deduplicating catalog client.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use dex_cache::{CacheStats, KeyedLruCache, SessionStorage};
use dex_core::constants::CREATURE_RESOURCE;
use dex_core::error::{DexError, Result};
use dex_core::types::{CatalogPayload, Creature, CreatureDetails, ListPage};

use crate::config::ClientConfig;
use crate::inflight::InFlightSet;
use crate::transport::{CatalogTransport, HttpTransport};

/// Client for the creature catalog.
///
/// Every fetch follows the same steps:
/// 1. A cached payload for the URL is returned without touching the network
/// 2. A URL already being fetched fails fast with `DexError::Busy`
/// 3. Otherwise the URL is fetched, parsed, cached, and returned
///
/// Parsed payloads are cached, never raw responses, and nothing is cached
/// when a fetch or parse fails.
pub struct CatalogClient {
    base_url: Url,
    cache: KeyedLruCache<CatalogPayload>,
    in_flight: InFlightSet,
    transport: Arc<dyn CatalogTransport>,
}

impl CatalogClient {
    /// Creates a client with an HTTP transport and the configured cache.
    ///
    /// A session-scoped cache gets a fresh store; use
    /// [`with_session`](Self::with_session) to share one.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_session(config, None)
    }

    /// Creates a client whose session-scoped cache lives in `session`.
    pub fn with_session(config: ClientConfig, session: Option<&SessionStorage>) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::from_config(&config)?);
        let cache = KeyedLruCache::from_config(&config.cache, session)?;
        Self::with_parts(&config.base_url, cache, transport)
    }

    /// Creates a client from explicit parts.
    pub fn with_parts(
        base_url: &str,
        cache: KeyedLruCache<CatalogPayload>,
        transport: Arc<dyn CatalogTransport>,
    ) -> Result<Self> {
        let base_url = ClientConfig::with_base_url(base_url).parsed_base_url()?;
        info!(
            base_url = %base_url,
            cache = cache.name(),
            backend = %cache.kind(),
            capacity = cache.capacity(),
            "Catalog client ready"
        );

        Ok(Self {
            base_url,
            cache,
            in_flight: InFlightSet::new(),
            transport,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FETCH OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Fetches one creature record and converts it for display.
    pub async fn fetch_details(&self, url: &str) -> Result<Creature> {
        self.fetch_details_payload(url).await.map(Creature::from)
    }

    /// Fetches one creature record as returned by the catalog.
    #[instrument(skip(self))]
    pub async fn fetch_details_payload(&self, url: &str) -> Result<CreatureDetails> {
        match self.resolve(url, parse_as::<CreatureDetails>(CatalogPayload::Details)).await? {
            CatalogPayload::Details(details) => Ok(details),
            _ => Err(DexError::PayloadMismatch {
                key: url.to_string(),
                expected: "details",
            }),
        }
    }

    /// Fetches one page of the creature list.
    #[instrument(skip(self))]
    pub async fn fetch_list(&self, url: &str) -> Result<ListPage> {
        match self.resolve(url, parse_as::<ListPage>(CatalogPayload::List)).await? {
            CatalogPayload::List(page) => Ok(page),
            _ => Err(DexError::PayloadMismatch {
                key: url.to_string(),
                expected: "list",
            }),
        }
    }

    /// Looks a creature up by name or id.
    ///
    /// The query is trimmed and lowercased; an empty query is rejected
    /// without a request.
    pub async fn search(&self, query: &str) -> Result<Creature> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(DexError::ValidationError("search query cannot be empty".into()));
        }
        let url = self.details_url(&query)?;
        self.fetch_details(&url).await
    }

    async fn resolve<F>(&self, url: &str, parse: F) -> Result<CatalogPayload>
    where
        F: FnOnce(&[u8]) -> serde_json::Result<CatalogPayload>,
    {
        if let Some(payload) = self.cache.get(url) {
            debug!(url, "Serving from cache");
            return Ok(payload);
        }

        let Some(_guard) = self.in_flight.try_acquire(url) else {
            debug!(url, "Identical request already in flight");
            return Err(DexError::Busy { key: url.to_string() });
        };

        // Another task may have finished this URL between the lookup and the claim
        if let Some(payload) = self.cache.peek(url) {
            return Ok(payload);
        }

        debug!(url, "Fetching from catalog");
        let fetched = match self.transport.get(url).await {
            Ok(body) => parse(&body).map_err(|e| DexError::ParseFailure {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => Err(e),
        };

        match fetched {
            Ok(payload) => {
                self.cache.put(url, payload.clone());
                Ok(payload)
            }
            Err(e) => {
                warn!(url, error = %e, "Catalog fetch failed");
                Err(e)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // URLS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns the URL of a list page.
    pub fn first_page_url(&self, limit: u32, offset: u32) -> Result<String> {
        let mut url = self.resource_url(&[CREATURE_RESOURCE])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url.into())
    }

    /// Returns the details URL for a creature name or id.
    pub fn details_url(&self, name_or_id: &str) -> Result<String> {
        // Trailing empty segment keeps the catalog's canonical trailing slash
        self.resource_url(&[CREATURE_RESOURCE, name_or_id, ""])
            .map(Into::into)
    }

    fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DexError::ConfigError(format!("base URL cannot have a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTROSPECTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns true if a request for `url` is on the wire.
    pub fn is_in_flight(&self, url: &str) -> bool {
        self.in_flight.contains(url)
    }

    /// Returns the number of requests on the wire.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns the response cache.
    pub fn cache(&self) -> &KeyedLruCache<CatalogPayload> {
        &self.cache
    }

    /// Returns response cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Returns the catalog root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn parse_as<P: DeserializeOwned>(
    wrap: fn(P) -> CatalogPayload,
) -> impl FnOnce(&[u8]) -> serde_json::Result<CatalogPayload> {
    move |body| serde_json::from_slice::<P>(body).map(wrap)
}
