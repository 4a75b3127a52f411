//! API error type and its response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pingfence_core::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors a handler can surface to the client.
///
/// Each variant carries the client-facing message; internal causes stay
/// out of the response body and go to the log instead.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Storage failed; the message is the public half, the source the
    /// logged half
    #[error("{public}")]
    Internal {
        /// Client-facing message
        public: String,
        /// Underlying failure, logged but never sent
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Create a validation error (400)
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal error (500) with a client-facing message
    pub fn internal(public: impl Into<String>, source: StoreError) -> Self {
        Self::Internal {
            public: public.into(),
            source,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(source: StoreError) -> Self {
        Self::internal("internal storage error", source)
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable explanation
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal { public, source } = &self {
            error!(error = %source, public = %public, "request failed on storage");
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("bad latitude").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Schedule not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::unavailable("backend down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_hides_source_from_message() {
        let err = ApiError::internal(
            "Could not create schedule",
            StoreError::unavailable("connection refused to 10.0.0.7"),
        );

        assert_eq!(err.to_string(), "Could not create schedule");
    }
}
