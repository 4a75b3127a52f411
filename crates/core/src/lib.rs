//! Domain core for the Pingfence backend.
//!
//! This crate pulls together everything the service decides on its own:
//!
//! - **Models**: schedules, location pings, device tokens
//! - **Ports**: traits for the schedule/token/history stores and the
//!   push sender, consumed as injected `Arc<dyn …>` handles
//! - **Proximity flow**: the check that turns one location ping into at
//!   most one push notification, with a 100 m radius and a 10 minute
//!   per-(owner, schedule) cooldown
//! - **In-memory stores**: map-backed implementations for tests and
//!   credential-less local runs
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pingfence_core::memory::{
//!     MemoryHistoryStore, MemoryScheduleStore, MemoryTokenStore, RecordingPushSender,
//! };
//! use pingfence_core::stores::SystemClock;
//! use pingfence_core::{LocationUpdate, ProximityChecker};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let checker = ProximityChecker::new(
//!     Arc::new(MemoryScheduleStore::new()),
//!     Arc::new(MemoryTokenStore::new()),
//!     Arc::new(MemoryHistoryStore::new()),
//!     Arc::new(RecordingPushSender::new()),
//!     Arc::new(SystemClock),
//! );
//!
//! let ping = LocationUpdate {
//!     owner_id: "u1".to_string(),
//!     latitude: 37.0,
//!     longitude: 127.0,
//! };
//! let outcome = checker.check(&ping).await;
//! assert!(!outcome.notification_sent); // no schedules seeded yet
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod memory;
pub mod models;
pub mod proximity;
pub mod stores;

pub use error::{PushError, StoreError, StoreResult};
pub use models::{
    Coordinate, FcmToken, LocationUpdate, Schedule, ScheduleDraft, ScheduleUpdate,
};
pub use proximity::{
    CheckOutcome, CheckReason, ProximityChecker, COOLDOWN_MINUTES, PROXIMITY_RADIUS_M,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PushError, StoreError, StoreResult};
    pub use crate::models::{
        Coordinate, FcmToken, LocationUpdate, Schedule, ScheduleDraft, ScheduleUpdate,
    };
    pub use crate::proximity::{CheckOutcome, CheckReason, ProximityChecker};
    pub use crate::stores::{
        Clock, HistoryStore, PushSender, ScheduleStore, SystemClock, TokenStore,
    };
}
