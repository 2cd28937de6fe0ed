//! Error types for the shop API client.
//!
//! # Design
//! This layer adds no domain-specific error kinds. Anything that is not a
//! 2xx response lands in `HttpError` with the raw status and body so callers
//! can inspect the server's payload. Network failures reported by the
//! transport are carried as `Transport`.

use thiserror::Error;

/// Errors returned by `ShopClient` parse methods and `ShopApi` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// The server payload for HTTP errors, the message for everything else.
    pub fn detail(&self) -> String {
        match self {
            ApiError::HttpError { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}
