//! Firestore REST client.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use pingfence_gcp_auth::TokenProvider;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::FirestoreConfig;
use crate::document::{Document, FirestoreValue};
use crate::error::{FirestoreError, FirestoreResult};
use crate::stores::{FirestoreHistoryStore, FirestoreScheduleStore, FirestoreTokenStore};

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Thin client over the Firestore REST API.
///
/// Wraps `reqwest` and adds bearer auth from the token provider, request
/// correlation IDs and timing logs. Calls are single-shot; the
/// notification flow absorbs failures rather than retrying them.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Client,
    config: Arc<FirestoreConfig>,
    auth: Arc<TokenProvider>,
}

impl FirestoreClient {
    /// Create a client with the given configuration and token provider.
    pub fn new(config: FirestoreConfig, auth: Arc<TokenProvider>) -> FirestoreResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static("pingfence-firestore/1.0"),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(FirestoreError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            auth,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Collection store accessors
    // -------------------------------------------------------------------------

    /// Access the schedule collection
    #[must_use]
    pub fn schedules(&self) -> FirestoreScheduleStore {
        FirestoreScheduleStore::new(self.clone())
    }

    /// Access the device token collection
    #[must_use]
    pub fn tokens(&self) -> FirestoreTokenStore {
        FirestoreTokenStore::new(self.clone())
    }

    /// Access the notification history collection
    #[must_use]
    pub fn history(&self) -> FirestoreHistoryStore {
        FirestoreHistoryStore::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Document operations
    // -------------------------------------------------------------------------

    /// Fetch a document by id. A missing document is `None`, not an error.
    #[instrument(skip(self))]
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> FirestoreResult<Option<Document>> {
        let url = doc_url(&self.config, collection, id);
        match self.execute(Method::GET, &url, Option::<&()>::None).await {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a document under a caller-chosen id.
    #[instrument(skip(self, fields))]
    pub async fn create_document(
        &self,
        collection: &str,
        id: &str,
        fields: BTreeMap<String, FirestoreValue>,
    ) -> FirestoreResult<Document> {
        let url = format!(
            "{}?documentId={id}",
            collection_url(&self.config, collection)
        );
        self.execute(Method::POST, &url, Some(&Document::from_fields(fields)))
            .await
    }

    /// Replace an existing document's fields. `None` when the document
    /// vanished since it was read.
    #[instrument(skip(self, fields))]
    pub async fn patch_document_if_exists(
        &self,
        collection: &str,
        id: &str,
        fields: BTreeMap<String, FirestoreValue>,
    ) -> FirestoreResult<Option<Document>> {
        let url = format!(
            "{}?currentDocument.exists=true",
            doc_url(&self.config, collection, id)
        );
        match self
            .execute(Method::PATCH, &url, Some(&Document::from_fields(fields)))
            .await
        {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write a document's fields, creating the document if needed.
    #[instrument(skip(self, fields))]
    pub async fn upsert_document(
        &self,
        collection: &str,
        id: &str,
        fields: BTreeMap<String, FirestoreValue>,
    ) -> FirestoreResult<Document> {
        let url = doc_url(&self.config, collection, id);
        self.execute(Method::PATCH, &url, Some(&Document::from_fields(fields)))
            .await
    }

    /// Delete a document. `true` when it existed, `false` when it was
    /// already gone.
    #[instrument(skip(self))]
    pub async fn delete_document(&self, collection: &str, id: &str) -> FirestoreResult<bool> {
        let url = format!(
            "{}?currentDocument.exists=true",
            doc_url(&self.config, collection, id)
        );
        match self
            .execute::<serde_json::Value, ()>(Method::DELETE, &url, None)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Run an equality query over one collection.
    ///
    /// No ordering clause is sent, so results come back in Firestore's
    /// default document-name order. That order is what the notification
    /// flow's first-match rule observes.
    #[instrument(skip(self))]
    pub async fn query_equal(
        &self,
        collection: &str,
        field_path: &str,
        equals: &str,
    ) -> FirestoreResult<Vec<Document>> {
        let url = query_url(&self.config);
        let body = equality_query(collection, field_path, equals);
        let results: Vec<QueryResult> = self.execute(Method::POST, &url, Some(&body)).await?;
        Ok(results.into_iter().filter_map(|r| r.document).collect())
    }

    // -------------------------------------------------------------------------
    // Request plumbing
    // -------------------------------------------------------------------------

    async fn execute<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> FirestoreResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let token = self.auth.bearer_token().await?;

        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, &request_id)
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = body {
            request = request.json(body);
        }

        let start = Instant::now();
        let response = request.send().await?;
        let result = self.handle_response(response).await;
        debug!(
            request_id = %request_id,
            url = %url,
            elapsed_ms = start.elapsed().as_millis(),
            ok = result.is_ok(),
            "Firestore request finished"
        );
        result
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> FirestoreResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(FirestoreError::Request)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(FirestoreError::api(status.as_u16(), message))
        }
    }
}

/// One entry of a `runQuery` response. Entries carrying only a read
/// timestamp have no document.
#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    document: Option<Document>,
}

fn collection_url(config: &FirestoreConfig, collection: &str) -> String {
    format!(
        "{}/{}/{collection}",
        config.base_url.trim_end_matches('/'),
        config.documents_root()
    )
}

fn doc_url(config: &FirestoreConfig, collection: &str, id: &str) -> String {
    format!("{}/{id}", collection_url(config, collection))
}

fn query_url(config: &FirestoreConfig) -> String {
    format!(
        "{}/{}:runQuery",
        config.base_url.trim_end_matches('/'),
        config.documents_root()
    )
}

fn equality_query(collection: &str, field_path: &str, equals: &str) -> serde_json::Value {
    json!({
        "structuredQuery": {
            "from": [{"collectionId": collection}],
            "where": {
                "fieldFilter": {
                    "field": {"fieldPath": field_path},
                    "op": "EQUAL",
                    "value": {"stringValue": equals}
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FirestoreConfig {
        FirestoreConfig::new("demo-project")
    }

    #[test]
    fn test_url_building() {
        let config = test_config();

        assert_eq!(
            collection_url(&config, "schedule"),
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents/schedule"
        );
        assert_eq!(
            doc_url(&config, "fcm_token", "u1"),
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents/fcm_token/u1"
        );
        assert_eq!(
            query_url(&config),
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents:runQuery"
        );
    }

    #[test]
    fn test_url_building_trims_trailing_slash() {
        let config = test_config().with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            doc_url(&config, "schedule", "s1"),
            "http://localhost:8080/v1/projects/demo-project/databases/(default)/documents/schedule/s1"
        );
    }

    #[test]
    fn test_equality_query_shape() {
        let body = equality_query("schedule", "userId", "u1");

        assert_eq!(
            body,
            json!({
                "structuredQuery": {
                    "from": [{"collectionId": "schedule"}],
                    "where": {
                        "fieldFilter": {
                            "field": {"fieldPath": "userId"},
                            "op": "EQUAL",
                            "value": {"stringValue": "u1"}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_query_result_tolerates_documentless_entries() {
        let results: Vec<QueryResult> = serde_json::from_value(json!([
            {"readTime": "2025-06-01T12:00:00Z"},
            {
                "document": {
                    "name": "projects/p/databases/d/documents/schedule/s1",
                    "fields": {"title": {"stringValue": "Gym"}}
                },
                "readTime": "2025-06-01T12:00:00Z"
            }
        ]))
        .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].document.is_none());
        assert_eq!(
            results[1].document.as_ref().and_then(Document::id),
            Some("s1")
        );
    }
}
