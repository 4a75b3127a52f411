//! The push sender implementation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use pingfence_core::stores::PushSender;
use pingfence_core::PushError;
use pingfence_gcp_auth::TokenProvider;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::FcmConfig;
use crate::error::{FcmError, FcmResult};
use crate::message::{proximity_alert, SendRequest, SendResponse};

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// `PushSender` backed by the FCM HTTP v1 API.
///
/// Sends are single-shot: a failed dispatch is reported to the caller,
/// which absorbs it into the check outcome instead of retrying.
#[derive(Clone)]
pub struct FcmSender {
    inner: Client,
    config: Arc<FcmConfig>,
    auth: Arc<TokenProvider>,
}

impl FcmSender {
    /// Create a sender with the given configuration and token provider.
    pub fn new(config: FcmConfig, auth: Arc<TokenProvider>) -> FcmResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("pingfence-fcm/1.0"));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(FcmError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            auth,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &FcmConfig {
        &self.config
    }

    async fn dispatch(&self, request: &SendRequest) -> FcmResult<SendResponse> {
        let request_id = Uuid::new_v4().to_string();
        let token = self.auth.bearer_token().await?;
        let url = self.config.send_url();

        let start = Instant::now();
        let response = self
            .inner
            .post(&url)
            .header(X_REQUEST_ID, &request_id)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let result = if status.is_success() {
            response.json().await.map_err(FcmError::Request)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(FcmError::api(status.as_u16(), message))
        };

        debug!(
            request_id = %request_id,
            elapsed_ms = start.elapsed().as_millis(),
            ok = result.is_ok(),
            "FCM send finished"
        );
        result
    }
}

#[async_trait]
impl PushSender for FcmSender {
    #[instrument(skip(self, token))]
    async fn send_proximity_alert(&self, token: &str, owner_id: &str) -> Result<(), PushError> {
        let request = proximity_alert(token);
        let response = self.dispatch(&request).await.map_err(PushError::from)?;

        info!(owner_id, message = %response.name, "dispatched proximity alert");
        Ok(())
    }
}
