//! In-memory store implementations.
//!
//! These back the test suites and the server's `--memory-store` mode,
//! which runs the full API without Google credentials. State lives for
//! the lifetime of the process and is lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{PushError, StoreError, StoreResult};
use crate::models::{Coordinate, FcmToken, Schedule, ScheduleDraft, ScheduleUpdate};
use crate::stores::{Clock, HistoryStore, PushSender, ScheduleStore, TokenStore};

/// Vec-backed schedule store.
///
/// Records keep insertion order, which is the "store-native order" the
/// proximity flow's first-match rule observes.
#[derive(Debug, Default)]
pub struct MemoryScheduleStore {
    records: RwLock<Vec<Schedule>>,
}

impl MemoryScheduleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record, bypassing id generation.
    ///
    /// Seeding hook: lets tests and local runs plant records in shapes
    /// `create` never produces, such as a schedule without coordinates.
    pub fn insert(&self, schedule: Schedule) -> StoreResult<()> {
        let mut records = self.write_lock()?;
        records.push(schedule);
        Ok(())
    }

    fn read_lock(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Vec<Schedule>>> {
        self.records
            .read()
            .map_err(|_| StoreError::unavailable("schedule store lock poisoned"))
    }

    fn write_lock(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Vec<Schedule>>> {
        self.records
            .write()
            .map_err(|_| StoreError::unavailable("schedule store lock poisoned"))
    }
}

#[async_trait]
impl ScheduleStore for MemoryScheduleStore {
    async fn create(&self, draft: ScheduleDraft) -> StoreResult<Schedule> {
        let schedule = Schedule {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            owner_id: draft.owner_id,
            coordinate: Some(Coordinate::new(draft.latitude, draft.longitude)),
            description: draft.description,
            scheduled_at: draft.scheduled_at,
        };

        let mut records = self.write_lock()?;
        records.push(schedule.clone());
        Ok(schedule)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Schedule>> {
        let records = self.read_lock()?;
        Ok(records.iter().find(|s| s.id == id).cloned())
    }

    async fn list_for_owner(&self, owner_id: &str) -> StoreResult<Vec<Schedule>> {
        let records = self.read_lock()?;
        Ok(records
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, patch: ScheduleUpdate) -> StoreResult<Option<Schedule>> {
        let mut records = self.write_lock()?;
        let Some(record) = records.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        patch.apply_to(record);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut records = self.write_lock()?;
        let before = records.len();
        records.retain(|s| s.id != id);
        Ok(records.len() < before)
    }
}

/// Map-backed token store, keyed by owner id.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the token for an owner. Last write wins.
    pub fn set_token(&self, owner_id: impl Into<String>, token: impl Into<String>) -> StoreResult<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| StoreError::unavailable("token store lock poisoned"))?;
        tokens.insert(owner_id.into(), token.into());
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn token_for_owner(&self, owner_id: &str) -> StoreResult<Option<FcmToken>> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| StoreError::unavailable("token store lock poisoned"))?;
        Ok(tokens.get(owner_id).map(|token| FcmToken {
            owner_id: owner_id.to_string(),
            token: token.clone(),
        }))
    }
}

/// Map-backed notification history, keyed by (owner, schedule) pair.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<HashMap<(String, String), DateTime<Utc>>>,
}

impl MemoryHistoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn last_sent(
        &self,
        owner_id: &str,
        schedule_id: &str,
    ) -> StoreResult<Option<DateTime<Utc>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::unavailable("history store lock poisoned"))?;
        Ok(entries
            .get(&(owner_id.to_string(), schedule_id.to_string()))
            .copied())
    }

    async fn record_sent(
        &self,
        owner_id: &str,
        schedule_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::unavailable("history store lock poisoned"))?;
        entries.insert((owner_id.to_string(), schedule_id.to_string()), at);
        Ok(())
    }
}

/// Push sender that records dispatches instead of delivering them.
///
/// Doubles as the sender for `--memory-store` runs and as the test fake;
/// `set_failing` flips it into a sender whose every dispatch fails.
#[derive(Debug, Default)]
pub struct RecordingPushSender {
    sent: RwLock<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingPushSender {
    /// Create a sender that accepts every dispatch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent dispatches fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every (token, owner_id) pair dispatched so far.
    pub fn dispatched(&self) -> Vec<(String, String)> {
        self.sent.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of dispatches so far.
    #[must_use]
    pub fn dispatch_count(&self) -> usize {
        self.sent.read().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl PushSender for RecordingPushSender {
    async fn send_proximity_alert(
        &self,
        token: &str,
        owner_id: &str,
    ) -> std::result::Result<(), PushError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PushError::dispatch("recording sender set to fail"));
        }
        if let Ok(mut sent) = self.sent.write() {
            sent.push((token.to_string(), owner_id.to_string()));
        }
        tracing::debug!(owner_id, "recorded push dispatch");
        Ok(())
    }
}

/// Clock pinned to a fixed instant, for cooldown tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(owner_id: &str, latitude: f64, longitude: f64) -> ScheduleDraft {
        ScheduleDraft {
            name: "Gym".to_string(),
            owner_id: owner_id.to_string(),
            latitude,
            longitude,
            description: None,
            scheduled_at: Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids_and_keeps_order() {
        let store = MemoryScheduleStore::new();

        let first = store.create(draft("u1", 37.0, 127.0)).await.unwrap();
        let second = store.create(draft("u1", 38.0, 128.0)).await.unwrap();
        let other = store.create(draft("u2", 39.0, 129.0)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(second.id, other.id);

        let listed = store.list_for_owner("u1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_id() {
        let store = MemoryScheduleStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let store = MemoryScheduleStore::new();
        let created = store.create(draft("u1", 37.0, 127.0)).await.unwrap();

        let patch = ScheduleUpdate {
            latitude: Some(38.0),
            ..ScheduleUpdate::default()
        };
        let updated = store.update(&created.id, patch).await.unwrap().unwrap();

        let coordinate = updated.coordinate.unwrap();
        assert_eq!(coordinate.latitude, 38.0);
        assert_eq!(coordinate.longitude, 127.0);
        assert_eq!(updated.name, "Gym");

        let patch = ScheduleUpdate {
            name: Some("Office".to_string()),
            ..ScheduleUpdate::default()
        };
        let updated = store.update(&created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "Office");
        assert_eq!(updated.coordinate.unwrap().latitude, 38.0);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryScheduleStore::new();
        let result = store
            .update("missing", ScheduleUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_half_pair_patch_never_creates_dangling_coordinate() {
        let store = MemoryScheduleStore::new();
        store
            .insert(Schedule {
                id: "bare".to_string(),
                name: "No fence".to_string(),
                owner_id: "u1".to_string(),
                coordinate: None,
                description: None,
                scheduled_at: Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap(),
            })
            .unwrap();

        let patch = ScheduleUpdate {
            latitude: Some(37.0),
            ..ScheduleUpdate::default()
        };
        let updated = store.update("bare", patch).await.unwrap().unwrap();

        assert!(updated.coordinate.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryScheduleStore::new();
        let created = store.create(draft("u1", 37.0, 127.0)).await.unwrap();

        assert!(store.delete(&created.id).await.unwrap());
        assert!(!store.delete(&created.id).await.unwrap());
        assert!(store.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_store_roundtrip() {
        let store = MemoryTokenStore::new();
        store.set_token("u1", "device-token").unwrap();

        let record = store.token_for_owner("u1").await.unwrap().unwrap();
        assert_eq!(record.owner_id, "u1");
        assert_eq!(record.token, "device-token");

        assert!(store.token_for_owner("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_last_write_wins() {
        let store = MemoryTokenStore::new();
        store.set_token("u1", "old").unwrap();
        store.set_token("u1", "new").unwrap();

        let record = store.token_for_owner("u1").await.unwrap().unwrap();
        assert_eq!(record.token, "new");
    }

    #[tokio::test]
    async fn test_history_upsert_overwrites() {
        let store = MemoryHistoryStore::new();
        let earlier = Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        assert!(store.last_sent("u1", "s1").await.unwrap().is_none());

        store.record_sent("u1", "s1", earlier).await.unwrap();
        store.record_sent("u1", "s1", later).await.unwrap();

        assert_eq!(store.last_sent("u1", "s1").await.unwrap(), Some(later));
        assert!(store.last_sent("u1", "s2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recording_sender_logs_and_fails_on_demand() {
        let sender = RecordingPushSender::new();

        sender.send_proximity_alert("tok", "u1").await.unwrap();
        assert_eq!(sender.dispatch_count(), 1);
        assert_eq!(
            sender.dispatched(),
            vec![("tok".to_string(), "u1".to_string())]
        );

        sender.set_failing(true);
        assert!(sender.send_proximity_alert("tok", "u1").await.is_err());
        assert_eq!(sender.dispatch_count(), 1);
    }
}
