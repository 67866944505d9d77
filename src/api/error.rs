//! Error types for the API layer.
//!
//! RequestError   - the call could not be built (programmer error, no I/O happened)
//! TransportError - the call was made but did not succeed (non-2xx other than 404, or no connection)
//! ApiError       - anything a caller must treat as a failure after classification
//!
//! "Not found" is deliberately absent here: it is an outcome, not an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    #[error("missing value for placeholder '{0}'")]
    MissingPlaceholder(String),

    #[error("placeholder '{key}' cannot be '{value}'")]
    DotSegment { key: String, value: String },

    #[error("malformed route template '{0}'")]
    MalformedTemplate(String),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("unexpected response status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("connection failed: {0}")]
    Connection(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}
