//! Route modules.
//!
//! Each module exposes a `routes()` function returning its own
//! `Router<AppState>`; the lib-level builder nests them.
//!
//! | Module | Mounted at | Endpoints |
//! |--------|-----------|-----------|
//! | `health` | `/health` | liveness and build info |
//! | `locations` | `/api/v1/locations` | location ping intake |
//! | `schedules` | `/api/v1/schedules` | schedule CRUD |

pub mod health;
pub mod locations;
pub mod schedules;
