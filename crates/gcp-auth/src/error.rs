//! Error types for the token provider

use thiserror::Error;

/// Result type alias for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Token provider errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Credentials file could not be read
    #[error("could not read credentials: {0}")]
    Io(#[from] std::io::Error),

    /// Key material was present but unusable
    #[error("invalid service-account key: {0}")]
    InvalidKey(String),

    /// Signing the JWT assertion failed
    #[error("failed to sign assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Missing environment variable
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The OAuth2 endpoint rejected the exchange
    #[error("token exchange failed ({status}): {message}")]
    Exchange {
        /// HTTP status code
        status: u16,
        /// Error message from the endpoint
        message: String,
    },
}

impl AuthError {
    /// Create an invalid-key error
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an exchange error
    pub fn exchange(status: u16, message: impl Into<String>) -> Self {
        Self::Exchange {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::Exchange { status, .. } => *status >= 500 || *status == 429,
            Self::Io(_)
            | Self::InvalidKey(_)
            | Self::Signing(_)
            | Self::MissingEnvVar(_)
            | Self::Config(_) => false,
        }
    }
}
