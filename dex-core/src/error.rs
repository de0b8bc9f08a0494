//! Error types for the dex catalog crates.
//!
//! A cache miss is not an error: lookups return `Option`. Everything that can
//! actually go wrong on the fetch path or in a durable backend is a variant of
//! [`DexError`].

use thiserror::Error;

/// Result type alias using `DexError`.
pub type Result<T> = std::result::Result<T, DexError>;

/// Main error type for all dex operations.
#[derive(Debug, Error)]
pub enum DexError {
    // ═══════════════════════════════════════════════════════════════════════════
    // FETCH ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// An identical request is already in flight.
    #[error("Request already in flight: {key}")]
    Busy { key: String },

    /// The transport failed before a response was received.
    #[error("Network request to '{url}' failed: {reason}")]
    NetworkFailure { url: String, reason: String },

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status} for '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// The response body did not match the expected payload shape.
    #[error("Failed to parse response from '{url}': {reason}")]
    ParseFailure { url: String, reason: String },

    /// A cached payload is of a different kind than the operation expects.
    #[error("Cached payload for '{key}' is not a {expected} payload")]
    PayloadMismatch { key: String, expected: &'static str },

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A durable backend read, write, or delete failed.
    #[error("Cache backend error: {0}")]
    BackendFailure(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DexError {
    /// Returns true if retrying the same call later may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            DexError::Busy { .. } | DexError::NetworkFailure { .. } => true,
            DexError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this is the duplicate in-flight condition.
    pub fn is_busy(&self) -> bool {
        matches!(self, DexError::Busy { .. })
    }

    /// Returns true if the failure happened on the wire.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            DexError::NetworkFailure { .. } | DexError::HttpStatus { .. }
        )
    }
}
