//! Firestore adapter for Pingfence's storage ports.
//!
//! This crate talks to the Firestore REST API and implements the store
//! traits from `pingfence-core` over three collections: schedules,
//! device tokens and notification history.
//!
//! # Features
//!
//! - **Bearer auth**: access tokens come from `pingfence-gcp-auth` and
//!   are attached per request
//! - **Typed documents**: the REST value envelope is decoded into a
//!   typed map before any field is read
//! - **Field aliasing**: stored field names differ from the service's
//!   wire names; the translation lives in one module
//! - **Request correlation**: every call carries a unique request ID
//!   and logs its timing
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pingfence_core::stores::ScheduleStore;
//! use pingfence_firestore::{FirestoreClient, FirestoreConfig};
//! use pingfence_gcp_auth::{AuthConfig, TokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = Arc::new(TokenProvider::from_config(&AuthConfig::from_env()?)?);
//!     let client = FirestoreClient::new(FirestoreConfig::from_env()?, auth)?;
//!
//!     let schedules = client.schedules();
//!     for schedule in schedules.list_for_owner("u1").await? {
//!         println!("{}: {}", schedule.id, schedule.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod stores;

pub use client::FirestoreClient;
pub use config::FirestoreConfig;
pub use error::{FirestoreError, FirestoreResult};
pub use stores::{FirestoreHistoryStore, FirestoreScheduleStore, FirestoreTokenStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::FirestoreClient;
    pub use crate::config::FirestoreConfig;
    pub use crate::error::{FirestoreError, FirestoreResult};
    pub use crate::stores::{FirestoreHistoryStore, FirestoreScheduleStore, FirestoreTokenStore};
}
