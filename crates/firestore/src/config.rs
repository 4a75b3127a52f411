//! Configuration for the Firestore adapter.

use std::time::Duration;

use crate::error::{FirestoreError, FirestoreResult};

/// Environment variable naming the Google Cloud project
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Environment variable pointing at a local Firestore emulator
pub const EMULATOR_ENV: &str = "FIRESTORE_EMULATOR_HOST";

/// Production Firestore REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Database id used unless one is configured explicitly
pub const DEFAULT_DATABASE_ID: &str = "(default)";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Firestore connection settings
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Google Cloud project id
    pub project_id: String,
    /// Firestore database id, `(default)` for the primary database
    pub database_id: String,
    /// REST endpoint base, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl FirestoreConfig {
    /// Create a configuration for the given project with defaults.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: DEFAULT_DATABASE_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from the environment.
    ///
    /// `GOOGLE_CLOUD_PROJECT` is required. When `FIRESTORE_EMULATOR_HOST`
    /// is set the adapter talks plain HTTP to the emulator instead of the
    /// production endpoint.
    pub fn from_env() -> FirestoreResult<Self> {
        let project_id =
            std::env::var(PROJECT_ENV).map_err(|_| FirestoreError::missing_env(PROJECT_ENV))?;

        let mut config = Self::new(project_id);
        if let Ok(host) = std::env::var(EMULATOR_ENV) {
            config.base_url = format!("http://{host}/v1");
        }
        Ok(config)
    }

    /// Override the database id.
    #[must_use]
    pub fn with_database(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Override the REST endpoint base.
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
    pub fn validate(&self) -> FirestoreResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(FirestoreError::config("project id cannot be empty"));
        }
        if self.database_id.trim().is_empty() {
            return Err(FirestoreError::config("database id cannot be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(FirestoreError::config(format!(
                "base URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(FirestoreError::config("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Root path of this database's documents, relative to the base URL.
    #[must_use]
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }
}
