//! Error types for the geocoding client.

use thiserror::Error;

/// Errors that can occur while resolving a place query.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body could not be parsed.
    #[error("Failed to parse response: {0}")]
    Json(String),
}
