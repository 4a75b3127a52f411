//! Error types for the collaborator ports.
//!
//! These are the shapes the orchestrator catches and absorbs; adapter
//! crates map their own richer errors into them at the trait boundary.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the persistence collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing service rejected or failed the call
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored document had an unusable shape
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

impl StoreError {
    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create a malformed-record error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord(message.into())
    }

    /// Check if retrying the same call could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Errors surfaced by the push-notification collaborator.
#[derive(Debug, Error)]
pub enum PushError {
    /// The push service accepted the connection but refused the message
    #[error("push dispatch failed: {0}")]
    Dispatch(String),

    /// The push service could not be reached or authenticated against
    #[error("push service unavailable: {0}")]
    Unavailable(String),
}

impl PushError {
    /// Create a dispatch error.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch(message.into())
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::unavailable("connection refused");
        assert_eq!(err.to_string(), "store unavailable: connection refused");

        let err = StoreError::malformed("geoPoint is not a map");
        assert_eq!(err.to_string(), "malformed record: geoPoint is not a map");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(StoreError::unavailable("timeout").is_retryable());
        assert!(!StoreError::malformed("bad field").is_retryable());
    }
}
