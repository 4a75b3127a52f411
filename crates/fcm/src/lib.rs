//! Firebase Cloud Messaging sender for Pingfence.
//!
//! Implements the `PushSender` port from `pingfence-core` over the FCM
//! HTTP v1 API. The proximity alert is fixed product copy; the only
//! per-dispatch variable is the target device token.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pingfence_core::stores::PushSender;
//! use pingfence_fcm::{FcmConfig, FcmSender};
//! use pingfence_gcp_auth::{AuthConfig, TokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = Arc::new(TokenProvider::from_config(&AuthConfig::from_env()?)?);
//!     let sender = FcmSender::new(FcmConfig::from_env()?, auth)?;
//!
//!     sender.send_proximity_alert("device-token", "u1").await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod message;
pub mod sender;

pub use config::FcmConfig;
pub use error::{FcmError, FcmResult};
pub use message::{ALERT_BODY, ALERT_TITLE};
pub use sender::FcmSender;
