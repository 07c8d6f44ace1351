//! Error types for the routing service client.

use thiserror::Error;

/// Errors that can occur when calling the routing service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("Service returned status {code}")]
    Status {
        /// HTTP status code.
        code: u16,
    },

    /// Response body could not be parsed.
    #[error("Failed to parse response: {0}")]
    Json(String),
}
