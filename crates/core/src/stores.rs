//! Collaborator ports.
//!
//! Each external system the service talks to sits behind one of these
//! traits. Handles are injected as `Arc<dyn …>` at construction; nothing
//! in this crate reaches for ambient global clients.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{PushError, StoreResult};
use crate::models::{FcmToken, Schedule, ScheduleDraft, ScheduleUpdate};

/// Persistence for schedule records.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Store a new record. The store assigns the id and returns the
    /// persisted schedule including it.
    async fn create(&self, draft: ScheduleDraft) -> StoreResult<Schedule>;

    /// Point read by id.
    async fn get(&self, id: &str) -> StoreResult<Option<Schedule>>;

    /// All schedules owned by `owner_id`, in store-native order.
    async fn list_for_owner(&self, owner_id: &str) -> StoreResult<Vec<Schedule>>;

    /// Partial update. Fields absent from the patch keep their stored
    /// values; a half-supplied coordinate merges against the stored half.
    /// Returns `None` when the id is absent.
    async fn update(&self, id: &str, patch: ScheduleUpdate) -> StoreResult<Option<Schedule>>;

    /// Delete by id. Returns `false` when the id was already absent.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

/// Lookup of push-notification device tokens.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// The token record for `owner_id`, or `None` when no record exists.
    /// A record whose token string is blank is still returned; the caller
    /// decides what a blank token means.
    async fn token_for_owner(&self, owner_id: &str) -> StoreResult<Option<FcmToken>>;
}

/// Last-send bookkeeping per (owner, schedule) pair.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Timestamp of the last successful send for the pair, if any.
    async fn last_sent(&self, owner_id: &str, schedule_id: &str)
        -> StoreResult<Option<DateTime<Utc>>>;

    /// Record a successful send. Upsert: creates the entry or overwrites
    /// the previous timestamp.
    async fn record_sent(
        &self,
        owner_id: &str,
        schedule_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()>;
}

/// Outbound push-notification dispatch.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Send the fixed proximity alert to `token`. `owner_id` is carried
    /// for logging and correlation only.
    async fn send_proximity_alert(&self, token: &str, owner_id: &str)
        -> std::result::Result<(), PushError>;
}

/// Wall-clock source. Injected so cooldown logic can be tested against
/// a pinned instant.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
