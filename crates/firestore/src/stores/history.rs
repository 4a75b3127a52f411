//! Notification history collection adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pingfence_core::stores::HistoryStore;
use pingfence_core::{StoreError, StoreResult};
use tracing::warn;

use crate::client::FirestoreClient;
use crate::document::FirestoreValue;

/// Firestore collection holding per-pair notification history
pub const HISTORY_COLLECTION: &str = "notification_history";

/// Stored field holding the last dispatch time
pub const FIELD_LAST_SENT_AT: &str = "last_sent_at";

/// `HistoryStore` backed by the `notification_history` collection.
///
/// One document per (owner, schedule) pair, its id the two ids joined
/// with an underscore. Each send overwrites the single timestamp field,
/// so history never grows per pair.
#[derive(Clone)]
pub struct FirestoreHistoryStore {
    client: FirestoreClient,
}

impl FirestoreHistoryStore {
    /// Create a new history store over the given client
    pub(crate) fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

fn pair_doc_id(owner_id: &str, schedule_id: &str) -> String {
    format!("{owner_id}_{schedule_id}")
}

#[async_trait]
impl HistoryStore for FirestoreHistoryStore {
    async fn last_sent(
        &self,
        owner_id: &str,
        schedule_id: &str,
    ) -> StoreResult<Option<DateTime<Utc>>> {
        let id = pair_doc_id(owner_id, schedule_id);
        let Some(doc) = self
            .client
            .get_document(HISTORY_COLLECTION, &id)
            .await
            .map_err(StoreError::from)?
        else {
            return Ok(None);
        };

        let at = doc.get_timestamp(FIELD_LAST_SENT_AT);
        if at.is_none() {
            // Treated as no history: the worst outcome is one early resend.
            warn!(owner_id, schedule_id, "history document lacks a usable timestamp");
        }
        Ok(at)
    }

    async fn record_sent(
        &self,
        owner_id: &str,
        schedule_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let id = pair_doc_id(owner_id, schedule_id);
        let mut fields = BTreeMap::new();
        fields.insert(
            FIELD_LAST_SENT_AT.to_string(),
            FirestoreValue::TimestampValue(at),
        );

        self.client
            .upsert_document(HISTORY_COLLECTION, &id, fields)
            .await
            .map_err(StoreError::from)?;
        Ok(())
    }
}
