//! Configuration for the token provider
//!
//! Supports environment-based configuration with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Standard location variable for service-account keys
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Scope covering both Firestore and FCM
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Token provider configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Path to the service-account JSON key file
    pub credentials_path: PathBuf,
    /// OAuth2 scope requested for issued tokens
    pub scope: String,
    /// Timeout for the token-exchange request
    pub timeout: Duration,
}

impl AuthConfig {
    /// Create a configuration pointing at a key file, with defaults for
    /// everything else.
    pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            scope: DEFAULT_SCOPE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads `GOOGLE_APPLICATION_CREDENTIALS` (required) for the key file
    /// path. The scope stays at [`DEFAULT_SCOPE`].
    pub fn from_env() -> AuthResult<Self> {
        let path = env::var(CREDENTIALS_ENV).map_err(|_| AuthError::missing_env(CREDENTIALS_ENV))?;
        Ok(Self::new(path))
    }

    /// Builder-style method to set the scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Builder-style method to set the exchange timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> AuthResult<()> {
        if self.credentials_path.as_os_str().is_empty() {
            return Err(AuthError::config("credentials_path cannot be empty"));
        }
        if self.scope.is_empty() {
            return Err(AuthError::config("scope cannot be empty"));
        }
        if self.timeout.is_zero() {
            return Err(AuthError::config("timeout cannot be zero"));
        }
        Ok(())
    }
}
