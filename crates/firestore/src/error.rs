//! Error types for the Firestore adapter.

use pingfence_core::StoreError;
use thiserror::Error;

/// Result alias for Firestore operations
pub type FirestoreResult<T> = Result<T, FirestoreError>;

/// Errors that can occur when talking to Firestore
#[derive(Error, Debug)]
pub enum FirestoreError {
    /// HTTP transport error from reqwest
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization or deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to obtain a bearer token
    #[error("Authentication failed: {0}")]
    Auth(#[from] pingfence_gcp_auth::AuthError),

    /// Firestore returned a non-success status
    #[error("Firestore error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body returned by Firestore
        message: String,
    },

    /// A stored document does not decode into the expected shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required environment variable is missing
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl FirestoreError {
    /// Create an API error from a status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a malformed-document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a missing environment variable error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Whether this error is the document-not-found status
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Whether a fresh attempt could plausibly succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::Auth(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Collapse adapter errors into the store port's vocabulary.
///
/// A document that will not decode is the caller's data problem;
/// everything else reads as the backend being unavailable.
impl From<FirestoreError> for StoreError {
    fn from(err: FirestoreError) -> Self {
        match err {
            FirestoreError::MalformedDocument(message) => StoreError::malformed(message),
            other => StoreError::unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_predicate() {
        assert!(FirestoreError::api(404, "missing").is_not_found());
        assert!(!FirestoreError::api(500, "boom").is_not_found());
        assert!(!FirestoreError::malformed("bad field").is_not_found());
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(FirestoreError::api(500, "internal").is_retryable());
        assert!(FirestoreError::api(429, "throttled").is_retryable());
        assert!(!FirestoreError::api(404, "missing").is_retryable());
        assert!(!FirestoreError::config("bad").is_retryable());
    }

    #[test]
    fn test_store_error_mapping_preserves_malformed() {
        let err: StoreError = FirestoreError::malformed("datetime missing").into();
        assert!(matches!(err, StoreError::MalformedRecord(_)));

        let err: StoreError = FirestoreError::api(503, "unavailable").into();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(err.to_string().contains("503"));
    }
}
