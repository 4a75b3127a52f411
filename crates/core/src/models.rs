//! Domain models shared across the service.
//!
//! Wire naming follows the API surface (`owner_id`, `scheduled_at`); the
//! storage layer's own field names are translated at the adapter boundary,
//! never here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use pingfence_geo::Coordinate;

/// An incoming location ping.
///
/// Transient: the notification flow reads it, decides, and drops it.
/// Nothing in this service persists pings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// User submitting the ping
    pub owner_id: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl LocationUpdate {
    /// Coordinate view of the ping.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A geofenced schedule owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Store-generated document id
    pub id: String,
    /// Display name
    pub name: String,
    /// Owning user id
    pub owner_id: String,
    /// Geofence centre. Stored records can lack a coherent coordinate
    /// pair; those are excluded from proximity evaluation but still
    /// readable through the CRUD surface.
    #[serde(flatten)]
    pub coordinate: Option<Coordinate>,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the schedule is due
    pub scheduled_at: DateTime<Utc>,
}

/// Client-supplied fields for creating a schedule.
///
/// The id is assigned by the store; both coordinates are required so a
/// fresh record always enters proximity evaluation with a full pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDraft {
    /// Display name
    pub name: String,
    /// Owning user id
    pub owner_id: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// When the schedule is due
    pub scheduled_at: DateTime<Utc>,
}

impl ScheduleDraft {
    /// Coordinate view of the draft.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Partial update for a schedule. Absent fields keep their stored values.
///
/// Supplying only one half of the coordinate pair merges against the
/// stored half; the store never persists a dangling latitude or longitude.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New latitude in degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// New longitude in degrees
    #[serde(default)]
    pub longitude: Option<f64>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New due time
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl ScheduleUpdate {
    /// Merge this patch into `schedule`. Unsupplied fields keep their
    /// current values.
    ///
    /// The coordinate rule: a patched half merges against the stored
    /// half, and when no complete pair can be formed the stored value
    /// stays untouched. Every store implementation routes through here
    /// so the rule holds everywhere.
    pub fn apply_to(&self, schedule: &mut Schedule) {
        if let Some(name) = &self.name {
            schedule.name = name.clone();
        }
        if let Some(description) = &self.description {
            schedule.description = Some(description.clone());
        }
        if let Some(scheduled_at) = self.scheduled_at {
            schedule.scheduled_at = scheduled_at;
        }
        if self.latitude.is_some() || self.longitude.is_some() {
            let current = schedule.coordinate;
            let latitude = self.latitude.or(current.map(|c| c.latitude));
            let longitude = self.longitude.or(current.map(|c| c.longitude));
            if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
                schedule.coordinate = Some(Coordinate::new(latitude, longitude));
            }
        }
    }
}

/// A user's push-notification device token.
///
/// One per user, keyed by `owner_id`; last write wins; no expiry tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FcmToken {
    /// Owning user id, which doubles as the storage key
    pub owner_id: String,
    /// Device registration token. Can be blank if the client stored one;
    /// the notification flow treats blank as unusable.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_schedule(coordinate: Option<Coordinate>) -> Schedule {
        Schedule {
            id: "s1".to_string(),
            name: "Gym".to_string(),
            owner_id: "u1".to_string(),
            coordinate,
            description: None,
            scheduled_at: Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_schedule_serializes_flat_coordinates() {
        let schedule = sample_schedule(Some(Coordinate::new(37.0, 127.0)));
        let json = serde_json::to_value(&schedule).unwrap();

        assert_eq!(json["latitude"], 37.0);
        assert_eq!(json["longitude"], 127.0);
        assert_eq!(json["id"], "s1");
        assert_eq!(json["owner_id"], "u1");
    }

    #[test]
    fn test_schedule_without_coordinates_omits_them() {
        let schedule = sample_schedule(None);
        let json = serde_json::to_value(&schedule).unwrap();

        assert!(json.get("latitude").is_none());
        assert!(json.get("longitude").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_schedule_round_trips_through_json() {
        let schedule = sample_schedule(Some(Coordinate::new(37.0, 127.0)));
        let json = serde_json::to_string(&schedule).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, schedule.id);
        assert_eq!(back.coordinate, schedule.coordinate);
        assert_eq!(back.scheduled_at, schedule.scheduled_at);
    }

    #[test]
    fn test_draft_deserializes_without_description() {
        let draft: ScheduleDraft = serde_json::from_str(
            r#"{
                "name": "Gym",
                "owner_id": "u1",
                "latitude": 37.0,
                "longitude": 127.0,
                "scheduled_at": "2025-06-01T18:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(draft.owner_id, "u1");
        assert!(draft.description.is_none());
        assert_eq!(draft.coordinate(), Coordinate::new(37.0, 127.0));
    }

    #[test]
    fn test_update_defaults_to_all_absent() {
        let patch: ScheduleUpdate = serde_json::from_str("{}").unwrap();

        assert!(patch.name.is_none());
        assert!(patch.latitude.is_none());
        assert!(patch.longitude.is_none());
        assert!(patch.description.is_none());
        assert!(patch.scheduled_at.is_none());
    }

    #[test]
    fn test_apply_to_merges_half_coordinate_against_stored_pair() {
        let mut schedule = sample_schedule(Some(Coordinate::new(37.0, 127.0)));
        let patch = ScheduleUpdate {
            latitude: Some(38.5),
            ..ScheduleUpdate::default()
        };

        patch.apply_to(&mut schedule);

        assert_eq!(schedule.coordinate, Some(Coordinate::new(38.5, 127.0)));
        assert_eq!(schedule.name, "Gym");
    }

    #[test]
    fn test_apply_to_keeps_bare_schedule_bare_on_half_pair() {
        let mut schedule = sample_schedule(None);
        let patch = ScheduleUpdate {
            longitude: Some(127.0),
            ..ScheduleUpdate::default()
        };

        patch.apply_to(&mut schedule);

        assert!(schedule.coordinate.is_none());
    }

    #[test]
    fn test_apply_to_full_pair_sets_coordinate_on_bare_schedule() {
        let mut schedule = sample_schedule(None);
        let patch = ScheduleUpdate {
            latitude: Some(37.0),
            longitude: Some(127.0),
            description: Some("weekly".to_string()),
            ..ScheduleUpdate::default()
        };

        patch.apply_to(&mut schedule);

        assert_eq!(schedule.coordinate, Some(Coordinate::new(37.0, 127.0)));
        assert_eq!(schedule.description.as_deref(), Some("weekly"));
    }

    #[test]
    fn test_location_update_deserializes() {
        let ping: LocationUpdate = serde_json::from_str(
            r#"{"owner_id": "u1", "latitude": 37.5, "longitude": 127.1}"#,
        )
        .unwrap();

        assert_eq!(ping.owner_id, "u1");
        assert_eq!(ping.coordinate(), Coordinate::new(37.5, 127.1));
    }
}
