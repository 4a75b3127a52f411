//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use pingfence_core::stores::{Clock, HistoryStore, PushSender, ScheduleStore, TokenStore};
use pingfence_core::ProximityChecker;

/// Handle to the shared state, cloned into every handler.
pub type AppState = Arc<State>;

/// Injected collaborators and process-level data.
///
/// Built once at startup from either the Firestore/FCM stack or the
/// in-memory stack; handlers never construct collaborators themselves.
pub struct State {
    /// Schedule CRUD store
    pub schedules: Arc<dyn ScheduleStore>,
    /// The proximity notification flow
    pub checker: ProximityChecker,
    /// Process start, for the health endpoint's uptime
    pub started_at: Instant,
}

impl State {
    /// Assemble state from collaborator handles.
    ///
    /// The checker gets its own clones of the store handles; `schedules`
    /// additionally backs the CRUD surface directly.
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        tokens: Arc<dyn TokenStore>,
        history: Arc<dyn HistoryStore>,
        push: Arc<dyn PushSender>,
        clock: Arc<dyn Clock>,
    ) -> AppState {
        Arc::new(Self {
            schedules: schedules.clone(),
            checker: ProximityChecker::new(schedules, tokens, history, push, clock),
            started_at: Instant::now(),
        })
    }
}
