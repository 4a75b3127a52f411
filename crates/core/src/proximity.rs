//! The proximity notification flow.
//!
//! One location ping in, at most one push notification out. The checker
//! walks the owner's schedules in store order, matches the first one
//! within [`PROXIMITY_RADIUS_M`], applies the per-(owner, schedule)
//! cooldown, and dispatches through the injected [`PushSender`].
//!
//! Pings are frequent and best-effort: a collaborator failure never
//! escapes [`ProximityChecker::check`]. It is logged and folded into a
//! non-sent [`CheckOutcome`] so the HTTP surface can keep answering 200.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info, warn};

use pingfence_geo::geodesic_distance_meters;

use crate::error::StoreError;
use crate::models::{LocationUpdate, Schedule};
use crate::stores::{Clock, HistoryStore, PushSender, ScheduleStore, TokenStore};

/// Radius within which a schedule matches a ping. Inclusive: a schedule
/// at exactly this distance matches.
pub const PROXIMITY_RADIUS_M: f64 = 100.0;

/// Minimum gap between notifications for the same (owner, schedule) pair.
pub const COOLDOWN_MINUTES: i64 = 10;

/// Coarse classification of a check result.
///
/// The wire response carries only `notification_sent` and `detail`;
/// callers and tests branch on this instead of parsing free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckReason {
    /// Notification dispatched and recorded
    Sent,
    /// No schedule within the radius
    NoMatch,
    /// A schedule matched but the cooldown has not elapsed
    CooldownActive,
    /// No token record exists for the owner
    NoToken,
    /// A token record exists but its token string is blank
    TokenMissing,
    /// The push sender refused or failed the dispatch
    SendFailed,
    /// A store call failed; the flow was abandoned
    CollaboratorError,
}

/// Decision record for one location ping.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    /// Whether a notification went out for this ping
    pub notification_sent: bool,
    /// Free-text explanation. Human-readable, not a machine contract.
    pub detail: String,
    /// Coarse classification, not serialized
    #[serde(skip)]
    pub reason: CheckReason,
}

impl CheckOutcome {
    /// Notification dispatched and recorded.
    #[must_use]
    pub fn sent() -> Self {
        Self {
            notification_sent: true,
            detail: "sent".to_string(),
            reason: CheckReason::Sent,
        }
    }

    /// No schedule within the radius.
    #[must_use]
    pub fn no_match() -> Self {
        Self {
            notification_sent: false,
            detail: "no proximate schedule".to_string(),
            reason: CheckReason::NoMatch,
        }
    }

    /// Cooldown still running; `remaining` until it elapses.
    #[must_use]
    pub fn cooldown(remaining: Duration) -> Self {
        // Stable equivalent of `i64::div_ceil(secs, 60)` (unstable on this
        // toolchain): truncating division plus one when a positive remainder
        // was discarded.
        let secs = remaining.num_seconds();
        let minutes = secs / 60 + i64::from(secs % 60 > 0);
        Self {
            notification_sent: false,
            detail: format!("cooldown active, remaining \u{2248} {minutes} minutes"),
            reason: CheckReason::CooldownActive,
        }
    }

    /// No token record for the owner.
    #[must_use]
    pub fn no_token() -> Self {
        Self {
            notification_sent: false,
            detail: "no token found".to_string(),
            reason: CheckReason::NoToken,
        }
    }

    /// Token record present but blank.
    #[must_use]
    pub fn token_missing() -> Self {
        Self {
            notification_sent: false,
            detail: "token missing".to_string(),
            reason: CheckReason::TokenMissing,
        }
    }

    /// Push dispatch failed; history untouched so the next ping retries.
    #[must_use]
    pub fn send_failed() -> Self {
        Self {
            notification_sent: false,
            detail: "send failed".to_string(),
            reason: CheckReason::SendFailed,
        }
    }

    /// A collaborator failed; the flow was abandoned.
    #[must_use]
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            notification_sent: false,
            detail: format!("error: {message}"),
            reason: CheckReason::CollaboratorError,
        }
    }
}

/// Orchestrates the proximity check for incoming location pings.
///
/// Holds injected collaborator handles; construct once at startup and
/// share behind an `Arc`.
pub struct ProximityChecker {
    schedules: Arc<dyn ScheduleStore>,
    tokens: Arc<dyn TokenStore>,
    history: Arc<dyn HistoryStore>,
    push: Arc<dyn PushSender>,
    clock: Arc<dyn Clock>,
}

impl ProximityChecker {
    /// Create a checker over the given collaborator handles.
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        tokens: Arc<dyn TokenStore>,
        history: Arc<dyn HistoryStore>,
        push: Arc<dyn PushSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schedules,
            tokens,
            history,
            push,
            clock,
        }
    }

    /// Run the full flow for one ping.
    ///
    /// Never fails: collaborator errors are logged here and returned as
    /// a non-sent outcome with the message embedded in `detail`.
    #[tracing::instrument(skip_all, fields(owner_id = %update.owner_id))]
    pub async fn check(&self, update: &LocationUpdate) -> CheckOutcome {
        match self.try_check(update).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "proximity check aborted by collaborator failure");
                CheckOutcome::error(err)
            }
        }
    }

    async fn try_check(&self, update: &LocationUpdate) -> Result<CheckOutcome, StoreError> {
        let schedules = self.schedules.list_for_owner(&update.owner_id).await?;

        let Some(matched) = first_match(update, &schedules) else {
            debug!(candidates = schedules.len(), "no schedule within radius");
            return Ok(CheckOutcome::no_match());
        };
        info!(schedule_id = %matched.id, "schedule within proximity radius");

        let now = self.clock.now();
        if let Some(last_sent) = self.history.last_sent(&update.owner_id, &matched.id).await? {
            let elapsed = now - last_sent;
            if elapsed < Duration::minutes(COOLDOWN_MINUTES) {
                let remaining = Duration::minutes(COOLDOWN_MINUTES) - elapsed;
                debug!(
                    schedule_id = %matched.id,
                    remaining_secs = remaining.num_seconds(),
                    "cooldown active, suppressing"
                );
                return Ok(CheckOutcome::cooldown(remaining));
            }
        }

        let Some(record) = self.tokens.token_for_owner(&update.owner_id).await? else {
            info!("no token record, cannot notify");
            return Ok(CheckOutcome::no_token());
        };
        if record.token.trim().is_empty() {
            warn!("token record present but blank");
            return Ok(CheckOutcome::token_missing());
        }

        match self
            .push
            .send_proximity_alert(&record.token, &update.owner_id)
            .await
        {
            Ok(()) => {
                // A failed history write after a successful send leaves the
                // pair eligible again; accepted, not rolled back.
                self.history
                    .record_sent(&update.owner_id, &matched.id, now)
                    .await?;
                info!(schedule_id = %matched.id, "proximity notification sent");
                Ok(CheckOutcome::sent())
            }
            Err(err) => {
                warn!(schedule_id = %matched.id, error = %err, "push dispatch failed");
                Ok(CheckOutcome::send_failed())
            }
        }
    }
}

/// First schedule in store order within the radius.
///
/// Records without a coherent coordinate pair are skipped with a warning.
/// Deliberately order-dependent: the store's native ordering breaks ties,
/// not distance.
fn first_match<'a>(update: &LocationUpdate, schedules: &'a [Schedule]) -> Option<&'a Schedule> {
    let ping = update.coordinate();
    schedules.iter().find(|schedule| {
        let Some(centre) = schedule.coordinate else {
            warn!(schedule_id = %schedule.id, "schedule has no coordinate pair, skipping");
            return false;
        };
        let distance = geodesic_distance_meters(&ping, &centre);
        debug!(schedule_id = %schedule.id, distance_m = distance, "distance to schedule");
        distance <= PROXIMITY_RADIUS_M
    })
}
