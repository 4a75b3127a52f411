//! Error types for the FCM sender.

use pingfence_core::PushError;
use thiserror::Error;

/// Result alias for FCM operations
pub type FcmResult<T> = Result<T, FcmError>;

/// Errors that can occur when dispatching a push message
#[derive(Error, Debug)]
pub enum FcmError {
    /// HTTP transport error from reqwest
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to obtain a bearer token
    #[error("Authentication failed: {0}")]
    Auth(#[from] pingfence_gcp_auth::AuthError),

    /// FCM returned a non-success status
    #[error("FCM error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body returned by FCM
        message: String,
    },

    /// Configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required environment variable is missing
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl FcmError {
    /// Create an API error from a status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a missing environment variable error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
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

/// Collapse sender errors into the push port's vocabulary.
///
/// Transport and auth failures read as the provider being unreachable;
/// an API rejection, typically a stale or invalid device token, is a
/// dispatch failure for that one message.
impl From<FcmError> for PushError {
    fn from(err: FcmError) -> Self {
        match err {
            FcmError::Api { status, message } if status < 500 && status != 429 => {
                PushError::dispatch(format!("FCM rejected the message ({status}): {message}"))
            }
            other => PushError::unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(FcmError::api(503, "backend unavailable").is_retryable());
        assert!(FcmError::api(429, "quota exceeded").is_retryable());
        assert!(!FcmError::api(404, "unregistered token").is_retryable());
        assert!(!FcmError::config("missing project").is_retryable());
    }

    #[test]
    fn test_push_error_mapping_separates_rejection_from_outage() {
        let err: PushError = FcmError::api(400, "The registration token is not valid").into();
        assert!(matches!(err, PushError::Dispatch(_)));

        let err: PushError = FcmError::api(500, "internal").into();
        assert!(matches!(err, PushError::Unavailable(_)));

        let err: PushError = FcmError::api(429, "quota").into();
        assert!(matches!(err, PushError::Unavailable(_)));
    }
}
