//! Service-account authentication for Google APIs.
//!
//! Signs an RS256 JWT assertion with a service-account key, exchanges it
//! at the OAuth2 token endpoint, and caches the resulting bearer token
//! until shortly before expiry. The provider is an explicit, injected
//! handle; there is no process-global SDK state anywhere in this crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use pingfence_gcp_auth::{AuthConfig, TokenProvider};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::from_env()?; // GOOGLE_APPLICATION_CREDENTIALS
//! let provider = TokenProvider::from_config(&config)?;
//!
//! let bearer = provider.bearer_token().await?;
//! println!("authorization: Bearer {bearer}");
//! # Ok(())
//! # }
//! ```

mod config;
mod credentials;
mod error;
mod provider;

pub use config::{AuthConfig, CREDENTIALS_ENV, DEFAULT_SCOPE};
pub use credentials::ServiceAccountKey;
pub use error::{AuthError, AuthResult};
pub use provider::TokenProvider;
