//! Error types for the item API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the container reacts to it
//! (the stale id is dropped from the mirror). All other unexpected statuses
//! land in `HttpError` with the raw status and body for debugging.

use thiserror::Error;

/// Errors returned by `ItemClient` parse methods, transports, and the
/// container callbacks built on them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested item does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status the operation does not accept.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The round trip itself failed (connection refused, reset, ...).
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}
