//! Network access to the catalog.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use dex_core::error::{DexError, Result};

use crate::config::ClientConfig;

/// Fetches raw response bodies from the catalog.
///
/// The client only ever issues GETs; implementations decide how.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Fetches `url` and returns the body of a successful response.
    ///
    /// Transport failures map to `NetworkFailure`, non-success statuses to
    /// `HttpStatus`.
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP transport over `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with the given timeout and user agent.
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()
            .map_err(|e| DexError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Creates a transport from client config.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.timeout_seconds, &config.user_agent)
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DexError::NetworkFailure {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DexError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| DexError::NetworkFailure {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!(url, len = body.len(), "Fetched catalog response");
        Ok(body.to_vec())
    }
}
