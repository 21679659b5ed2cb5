//! Common error types for OAuthKit.

use thiserror::Error;

/// Top-level error type for OAuthKit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A registration referenced an implementation identifier that does not exist.
    #[error("Unknown implementation type: {0}")]
    UnknownImplementationType(String),

    /// An implementation satisfies neither the OAuth1 nor the OAuth2 capability set.
    #[error("Invalid service type: {0}")]
    InvalidServiceType(String),

    /// The requested operation is not supported by the resolved service.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP transport failed or returned an unsuccessful status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered a token request with an error or an unreadable body.
    #[error("Token response error: {0}")]
    TokenResponse(String),

    /// No token stored for the service.
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    /// The stored token has expired.
    #[error("Token expired: {0}")]
    ExpiredToken(String),

    /// A refresh was requested for a token without a refresh token.
    #[error("Missing refresh token: {0}")]
    MissingRefreshToken(String),

    /// No authorization state stored for the service.
    #[error("Authorization state not found: {0}")]
    AuthorizationStateNotFound(String),

    /// The authorization state returned by the provider does not match.
    #[error("Invalid authorization state: {0}")]
    InvalidAuthorizationState(String),

    /// Request signing failed.
    #[error("Signature error: {0}")]
    Signature(String),

    /// Token storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
