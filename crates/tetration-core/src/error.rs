//! Error types for Tetration operations.
//!
//! Every failure is one of two kinds: the request could not be built
//! (validation, serialization, signing) or it was built and the exchange with
//! the appliance failed. [`Error::kind`] exposes that split; the variants carry
//! the finer cause.

use thiserror::Error;

/// Main error type for Tetration operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Request signing failed
    #[error("Failed to sign request: {0}")]
    SigningError(String),

    /// Request body could not be serialized
    #[error("Failed to serialize request body: {0}")]
    SerializationError(String),

    /// Invalid endpoint or URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Appliance is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Credentials rejected by the appliance
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Failed to decode the response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing was sent: the request failed to validate, serialize or sign.
    Construction,
    /// The request was dispatched and the exchange failed.
    Transport,
}

/// Specialized result type for Tetration operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SigningError(_) => "SIGNING_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Conflict(_) => "CONFLICT",
            Self::ParseError(_) => "PARSE_ERROR",
        }
    }

    /// Returns whether the error happened before or after dispatch.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SigningError(_)
            | Self::SerializationError(_)
            | Self::InvalidEndpoint(_)
            | Self::ValidationError(_)
            | Self::ConfigError(_) => ErrorKind::Construction,
            Self::HttpError(_)
            | Self::Timeout(_)
            | Self::ServiceUnavailable(_)
            | Self::NotFound(_)
            | Self::BadRequest(_)
            | Self::Unauthorized(_)
            | Self::Conflict(_)
            | Self::ParseError(_) => ErrorKind::Transport,
        }
    }

    /// Returns true if no request reached the network.
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self.kind(), ErrorKind::Construction)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else if err.is_builder() {
            Self::InvalidEndpoint(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

/// Only response decoding goes through this conversion; request bodies map to
/// [`Error::SerializationError`] explicitly.
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::SigningError(err.to_string())
    }
}
