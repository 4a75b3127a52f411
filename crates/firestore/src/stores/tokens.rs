//! Device token collection adapter.

use async_trait::async_trait;
use pingfence_core::stores::TokenStore;
use pingfence_core::{FcmToken, StoreError, StoreResult};

use crate::client::FirestoreClient;

/// Firestore collection holding device tokens, keyed by owner id
pub const TOKENS_COLLECTION: &str = "fcm_token";

/// Stored field holding the registration token
pub const FIELD_TOKEN: &str = "token";

/// `TokenStore` backed by the `fcm_token` collection.
///
/// The document id is the owner id, so a lookup is a single point read.
#[derive(Clone)]
pub struct FirestoreTokenStore {
    client: FirestoreClient,
}

impl FirestoreTokenStore {
    /// Create a new token store over the given client
    pub(crate) fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenStore for FirestoreTokenStore {
    async fn token_for_owner(&self, owner_id: &str) -> StoreResult<Option<FcmToken>> {
        let doc = self
            .client
            .get_document(TOKENS_COLLECTION, owner_id)
            .await
            .map_err(StoreError::from)?;

        // A document without a usable token field still counts as a
        // record; the notification flow reports it differently from a
        // missing document.
        Ok(doc.map(|doc| FcmToken {
            owner_id: owner_id.to_string(),
            token: doc.get_str(FIELD_TOKEN).unwrap_or_default().to_string(),
        }))
    }
}
