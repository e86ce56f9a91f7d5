//! Error types for the API client.

use issuer_session::SessionError;
use thiserror::Error;

/// Result type for API client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the issuing API.
///
/// Non-success HTTP statuses are not errors; resource calls report them as
/// absent results or through [`Saved::status`](crate::Saved::status).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection, timeout, TLS).
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response carried a body that could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The credential could not be persisted.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// The stored token cannot be sent as a header value.
    #[error("stored token is not a valid header value")]
    InvalidToken,

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}
