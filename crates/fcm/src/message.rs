//! FCM HTTP v1 message envelope.
//!
//! See: <https://firebase.google.com/docs/reference/fcm/rest/v1/projects.messages#Message>

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Title of the proximity alert, fixed product copy ("Schedule Notification")
pub const ALERT_TITLE: &str = "일정 알림";

/// Body of the proximity alert, fixed product copy ("There is a schedule nearby!")
pub const ALERT_BODY: &str = "주변에 설정된 일정이 있습니다!";

/// Visible notification text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
}

/// One message addressed to a single device token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Target device registration token
    pub token: String,
    /// Visible notification; absent for data-only messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    /// Custom key-value payload; the proximity alert carries none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
}

/// Request body for `messages:send`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRequest {
    /// The message to dispatch
    pub message: Message,
}

/// Response body for a successful `messages:send`
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    /// Resource name of the dispatched message, `projects/*/messages/{id}`
    pub name: String,
}

/// Build the proximity alert for one device token.
///
/// The text is fixed: every proximity push looks the same regardless of
/// which schedule triggered it.
#[must_use]
pub fn proximity_alert(token: &str) -> SendRequest {
    SendRequest {
        message: Message {
            token: token.to_string(),
            notification: Some(Notification {
                title: ALERT_TITLE.to_string(),
                body: ALERT_BODY.to_string(),
            }),
            data: None,
        },
    }
}
