//! Per-collection store implementations.
//!
//! Each module adapts one Firestore collection to the matching store
//! trait from `pingfence-core`.
//!
//! | Module | Collection | Trait |
//! |--------|-----------|-------|
//! | `schedules` | `schedule` | `ScheduleStore` |
//! | `tokens` | `fcm_token` | `TokenStore` |
//! | `history` | `notification_history` | `HistoryStore` |

pub mod history;
pub mod schedules;
pub mod tokens;

pub use history::FirestoreHistoryStore;
pub use schedules::FirestoreScheduleStore;
pub use tokens::FirestoreTokenStore;
