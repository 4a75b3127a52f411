//! Schedule collection adapter.

use async_trait::async_trait;
use pingfence_core::stores::ScheduleStore;
use pingfence_core::{
    Coordinate, Schedule, ScheduleDraft, ScheduleUpdate, StoreError, StoreResult,
};
use tracing::warn;
use uuid::Uuid;

use crate::client::FirestoreClient;
use crate::document::{schedule_from_document, schedule_to_fields, FIELD_USER_ID};

/// Firestore collection holding schedules
pub const SCHEDULES_COLLECTION: &str = "schedule";

/// `ScheduleStore` backed by the `schedule` collection.
#[derive(Clone)]
pub struct FirestoreScheduleStore {
    client: FirestoreClient,
}

impl FirestoreScheduleStore {
    /// Create a new schedule store over the given client
    pub(crate) fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScheduleStore for FirestoreScheduleStore {
    async fn create(&self, draft: ScheduleDraft) -> StoreResult<Schedule> {
        let schedule = Schedule {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            owner_id: draft.owner_id,
            coordinate: Some(Coordinate::new(draft.latitude, draft.longitude)),
            description: draft.description,
            scheduled_at: draft.scheduled_at,
        };

        self.client
            .create_document(
                SCHEDULES_COLLECTION,
                &schedule.id,
                schedule_to_fields(&schedule),
            )
            .await
            .map_err(StoreError::from)?;
        Ok(schedule)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Schedule>> {
        match self
            .client
            .get_document(SCHEDULES_COLLECTION, id)
            .await
            .map_err(StoreError::from)?
        {
            Some(doc) => Ok(Some(
                schedule_from_document(&doc).map_err(StoreError::from)?,
            )),
            None => Ok(None),
        }
    }

    async fn list_for_owner(&self, owner_id: &str) -> StoreResult<Vec<Schedule>> {
        let docs = self
            .client
            .query_equal(SCHEDULES_COLLECTION, FIELD_USER_ID, owner_id)
            .await
            .map_err(StoreError::from)?;

        let mut schedules = Vec::with_capacity(docs.len());
        for doc in &docs {
            match schedule_from_document(doc) {
                Ok(schedule) => schedules.push(schedule),
                Err(err) => {
                    warn!(owner_id, error = %err, "skipping malformed schedule document");
                }
            }
        }
        Ok(schedules)
    }

    async fn update(&self, id: &str, patch: ScheduleUpdate) -> StoreResult<Option<Schedule>> {
        let Some(mut schedule) = self.get(id).await? else {
            return Ok(None);
        };

        patch.apply_to(&mut schedule);

        // Read-merge-write; a concurrent delete between the read and the
        // write surfaces here as a missing document.
        match self
            .client
            .patch_document_if_exists(SCHEDULES_COLLECTION, id, schedule_to_fields(&schedule))
            .await
            .map_err(StoreError::from)?
        {
            Some(_) => Ok(Some(schedule)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.client
            .delete_document(SCHEDULES_COLLECTION, id)
            .await
            .map_err(StoreError::from)
    }
}
