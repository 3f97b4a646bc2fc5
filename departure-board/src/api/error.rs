//! Departure repository error types.

use super::convert::ConversionError;

/// Broad failure category, for callers that only need to know whether the
/// service was unreachable or sent something unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No snapshot was delivered: transport failure or error status.
    Network,
    /// A response arrived but does not conform to the snapshot shape.
    Decode,
}

/// Errors from a departure repository.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// HTTP request failed (connection refused, timeout, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Base URL can't have path segments appended
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Fixture data could not be read
    #[error("fixture error: {0}")]
    Fixture(String),

    /// Body is not valid JSON of the expected shape
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Body parsed but broke a model invariant
    #[error("invalid snapshot: {0}")]
    Conversion(#[from] ConversionError),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::Http(_)
            | RepositoryError::Status { .. }
            | RepositoryError::InvalidBaseUrl(_)
            | RepositoryError::Fixture(_) => ErrorKind::Network,
            RepositoryError::Json { .. } | RepositoryError::Conversion(_) => ErrorKind::Decode,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    pub fn is_decode(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }

    /// Build a `Json` error, keeping the first 500 characters of the body.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        RepositoryError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
