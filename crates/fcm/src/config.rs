//! Configuration for the FCM sender.

use std::time::Duration;

use crate::error::{FcmError, FcmResult};

/// Environment variable naming the Google Cloud project
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Production FCM HTTP v1 endpoint
pub const DEFAULT_BASE_URL: &str = "https://fcm.googleapis.com/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// FCM connection settings
#[derive(Debug, Clone)]
pub struct FcmConfig {
    /// Google Cloud project id, part of the send endpoint path
    pub project_id: String,
    /// HTTP v1 endpoint base, without a trailing slash
    pub base_url: String,
    /// Per-request timeout. Kept short so a slow provider delays a
    /// location response by bounded time.
    pub timeout: Duration,
}

impl FcmConfig {
    /// Create a configuration for the given project with defaults.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from the environment. `GOOGLE_CLOUD_PROJECT`
    /// is required.
    pub fn from_env() -> FcmResult<Self> {
        let project_id =
            std::env::var(PROJECT_ENV).map_err(|_| FcmError::missing_env(PROJECT_ENV))?;
        Ok(Self::new(project_id))
    }

    /// Override the endpoint base.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> FcmResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(FcmError::config("project id cannot be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(FcmError::config(format!(
                "base URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(FcmError::config("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Full URL of the send endpoint for this project.
    #[must_use]
    pub fn send_url(&self) -> String {
        format!(
            "{}/projects/{}/messages:send",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }
}
