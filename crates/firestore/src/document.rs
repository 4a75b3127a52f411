//! Firestore REST document shapes and the schedule field mapping.
//!
//! Firestore's REST API wraps every field in a typed value object, e.g.
//! `{"stringValue": "gym"}`. The stored field names also differ from the
//! service's wire names for historical reasons; the two translation
//! functions in this module are the only place that mapping lives.
//!
//! | Service name   | Stored name |
//! |----------------|-------------|
//! | `name`         | `title`     |
//! | `owner_id`     | `userId`    |
//! | `description`  | `content`   |
//! | `scheduled_at` | `datetime`  |
//! | coordinate     | `geoPoint`  |

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pingfence_core::{Coordinate, Schedule};
use serde::{Deserialize, Serialize};

use crate::error::{FirestoreError, FirestoreResult};

/// Stored field holding a schedule's display name
pub const FIELD_TITLE: &str = "title";
/// Stored field holding the owning user id
pub const FIELD_USER_ID: &str = "userId";
/// Stored field holding the free-text description
pub const FIELD_CONTENT: &str = "content";
/// Stored field holding the due timestamp
pub const FIELD_DATETIME: &str = "datetime";
/// Stored field holding the geofence centre
pub const FIELD_GEO_POINT: &str = "geoPoint";

/// A `geoPointValue` payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPointValue {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Nested fields of a `mapValue`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFields {
    /// Field map; absent on the wire when the map is empty
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

/// Elements of an `arrayValue`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayValues {
    /// Element list; absent on the wire when the array is empty
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

/// One typed Firestore value.
///
/// Externally tagged serde matches the wire exactly: the variant name in
/// camel case is the single JSON key. Kinds this service never writes are
/// still listed so any stored document decodes without error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    /// UTF-8 string
    StringValue(String),
    /// 64-bit float
    DoubleValue(f64),
    /// 64-bit integer, carried as a decimal string on the wire
    IntegerValue(String),
    /// Boolean
    BooleanValue(bool),
    /// RFC 3339 timestamp
    TimestampValue(DateTime<Utc>),
    /// Latitude/longitude pair
    GeoPointValue(GeoPointValue),
    /// Explicit null
    NullValue(()),
    /// Nested document
    MapValue(MapFields),
    /// Ordered list
    ArrayValue(ArrayValues),
    /// Path to another document
    ReferenceValue(String),
    /// Base64-encoded bytes
    BytesValue(String),
}

/// A Firestore document: resource name plus typed fields.
///
/// Serialized without a name it doubles as the write body for create and
/// patch calls. Read-only response metadata like `createTime` is ignored
/// on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Full resource name; the last path segment is the document id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Typed field map
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

impl Document {
    /// Build a write body from a field map.
    #[must_use]
    pub fn from_fields(fields: BTreeMap<String, FirestoreValue>) -> Self {
        Self { name: None, fields }
    }

    /// Document id, the last segment of the resource name.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.name.as_deref().and_then(|name| name.rsplit('/').next())
    }

    /// String field, if present with the expected kind.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(FirestoreValue::StringValue(s)) => Some(s),
            _ => None,
        }
    }

    /// Timestamp field, if present with the expected kind.
    #[must_use]
    pub fn get_timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(field) {
            Some(FirestoreValue::TimestampValue(at)) => Some(*at),
            _ => None,
        }
    }

    /// Geo-point field, if present with the expected kind.
    #[must_use]
    pub fn get_geo_point(&self, field: &str) -> Option<GeoPointValue> {
        match self.fields.get(field) {
            Some(FirestoreValue::GeoPointValue(point)) => Some(*point),
            _ => None,
        }
    }
}

/// Encode a schedule into its stored field map.
///
/// The id is not stored as a field; Firestore carries it in the document
/// name. An absent description or coordinate is omitted entirely rather
/// than written as null.
#[must_use]
pub fn schedule_to_fields(schedule: &Schedule) -> BTreeMap<String, FirestoreValue> {
    let mut fields = BTreeMap::new();
    fields.insert(
        FIELD_TITLE.to_string(),
        FirestoreValue::StringValue(schedule.name.clone()),
    );
    fields.insert(
        FIELD_USER_ID.to_string(),
        FirestoreValue::StringValue(schedule.owner_id.clone()),
    );
    if let Some(description) = &schedule.description {
        fields.insert(
            FIELD_CONTENT.to_string(),
            FirestoreValue::StringValue(description.clone()),
        );
    }
    fields.insert(
        FIELD_DATETIME.to_string(),
        FirestoreValue::TimestampValue(schedule.scheduled_at),
    );
    if let Some(coordinate) = schedule.coordinate {
        fields.insert(
            FIELD_GEO_POINT.to_string(),
            FirestoreValue::GeoPointValue(GeoPointValue {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            }),
        );
    }
    fields
}

/// Decode a stored document into a schedule.
///
/// A missing or wrongly-typed `geoPoint` yields a schedule without a
/// coordinate, never an error; such records sit outside proximity
/// evaluation but remain readable. Missing required scalars make the
/// document malformed.
pub fn schedule_from_document(doc: &Document) -> FirestoreResult<Schedule> {
    let id = doc
        .id()
        .ok_or_else(|| FirestoreError::malformed("schedule document has no resource name"))?
        .to_string();

    let name = doc
        .get_str(FIELD_TITLE)
        .ok_or_else(|| missing_field(&id, FIELD_TITLE))?
        .to_string();
    let owner_id = doc
        .get_str(FIELD_USER_ID)
        .ok_or_else(|| missing_field(&id, FIELD_USER_ID))?
        .to_string();
    let scheduled_at = doc
        .get_timestamp(FIELD_DATETIME)
        .ok_or_else(|| missing_field(&id, FIELD_DATETIME))?;

    let description = doc.get_str(FIELD_CONTENT).map(str::to_string);
    let coordinate = doc
        .get_geo_point(FIELD_GEO_POINT)
        .map(|point| Coordinate::new(point.latitude, point.longitude));

    Ok(Schedule {
        id,
        name,
        owner_id,
        coordinate,
        description,
        scheduled_at,
    })
}

fn missing_field(id: &str, field: &str) -> FirestoreError {
    FirestoreError::malformed(format!(
        "schedule {id}: missing or wrongly-typed field '{field}'"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_schedule() -> Schedule {
        Schedule {
            id: "s1".to_string(),
            name: "Gym".to_string(),
            owner_id: "u1".to_string(),
            coordinate: Some(Coordinate::new(37.0, 127.0)),
            description: Some("weekly workout".to_string()),
            scheduled_at: Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_value_wire_shapes() {
        assert_eq!(
            serde_json::to_value(FirestoreValue::StringValue("gym".into())).unwrap(),
            json!({"stringValue": "gym"})
        );
        assert_eq!(
            serde_json::to_value(FirestoreValue::DoubleValue(37.5)).unwrap(),
            json!({"doubleValue": 37.5})
        );
        assert_eq!(
            serde_json::to_value(FirestoreValue::IntegerValue("42".into())).unwrap(),
            json!({"integerValue": "42"})
        );
        assert_eq!(
            serde_json::to_value(FirestoreValue::GeoPointValue(GeoPointValue {
                latitude: 37.0,
                longitude: 127.0,
            }))
            .unwrap(),
            json!({"geoPointValue": {"latitude": 37.0, "longitude": 127.0}})
        );
        assert_eq!(
            serde_json::to_value(FirestoreValue::TimestampValue(
                Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap()
            ))
            .unwrap(),
            json!({"timestampValue": "2025-06-01T18:00:00Z"})
        );
        assert_eq!(
            serde_json::to_value(FirestoreValue::NullValue(())).unwrap(),
            json!({"nullValue": null})
        );
    }

    #[test]
    fn test_value_decodes_fractional_timestamp() {
        let value: FirestoreValue =
            serde_json::from_value(json!({"timestampValue": "2025-06-01T18:00:00.123456Z"}))
                .unwrap();
        let FirestoreValue::TimestampValue(at) = value else {
            panic!("expected timestamp");
        };
        assert_eq!(at.timestamp(), 1_748_800_800);
    }

    #[test]
    fn test_document_id_is_last_name_segment() {
        let doc = Document {
            name: Some(
                "projects/demo/databases/(default)/documents/schedule/abc-123".to_string(),
            ),
            fields: BTreeMap::new(),
        };
        assert_eq!(doc.id(), Some("abc-123"));

        let bare = Document::from_fields(BTreeMap::new());
        assert!(bare.id().is_none());
    }

    #[test]
    fn test_write_body_has_only_fields() {
        let doc = Document::from_fields(schedule_to_fields(&sample_schedule()));
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json.get("name").is_none());
        assert!(json.get("fields").is_some());
    }

    #[test]
    fn test_schedule_fields_use_stored_names() {
        let fields = schedule_to_fields(&sample_schedule());

        assert_eq!(
            fields.get(FIELD_TITLE),
            Some(&FirestoreValue::StringValue("Gym".into()))
        );
        assert_eq!(
            fields.get(FIELD_USER_ID),
            Some(&FirestoreValue::StringValue("u1".into()))
        );
        assert_eq!(
            fields.get(FIELD_CONTENT),
            Some(&FirestoreValue::StringValue("weekly workout".into()))
        );
        assert!(fields.contains_key(FIELD_DATETIME));
        assert!(fields.contains_key(FIELD_GEO_POINT));

        // the service-side names never reach storage, nor does the id
        assert!(!fields.contains_key("name"));
        assert!(!fields.contains_key("owner_id"));
        assert!(!fields.contains_key("scheduled_at"));
        assert!(!fields.contains_key("id"));
    }

    #[test]
    fn test_schedule_fields_omit_absent_optionals() {
        let mut schedule = sample_schedule();
        schedule.description = None;
        schedule.coordinate = None;

        let fields = schedule_to_fields(&schedule);
        assert!(!fields.contains_key(FIELD_CONTENT));
        assert!(!fields.contains_key(FIELD_GEO_POINT));
    }

    #[test]
    fn test_schedule_round_trips_through_document() {
        let schedule = sample_schedule();
        let doc = Document {
            name: Some(format!(
                "projects/demo/databases/(default)/documents/schedule/{}",
                schedule.id
            )),
            fields: schedule_to_fields(&schedule),
        };

        let back = schedule_from_document(&doc).unwrap();
        assert_eq!(back.id, schedule.id);
        assert_eq!(back.name, schedule.name);
        assert_eq!(back.owner_id, schedule.owner_id);
        assert_eq!(back.coordinate, schedule.coordinate);
        assert_eq!(back.description, schedule.description);
        assert_eq!(back.scheduled_at, schedule.scheduled_at);
    }

    #[test]
    fn test_decodes_real_response_shape() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/demo/databases/(default)/documents/schedule/s9",
            "fields": {
                "title": {"stringValue": "Dentist"},
                "userId": {"stringValue": "u7"},
                "content": {"stringValue": "cleaning"},
                "datetime": {"timestampValue": "2025-07-01T09:30:00.000000Z"},
                "geoPoint": {"geoPointValue": {"latitude": 37.49, "longitude": 127.02}}
            },
            "createTime": "2025-06-01T10:00:00.000001Z",
            "updateTime": "2025-06-02T10:00:00.000001Z"
        }))
        .unwrap();

        let schedule = schedule_from_document(&doc).unwrap();
        assert_eq!(schedule.id, "s9");
        assert_eq!(schedule.name, "Dentist");
        assert_eq!(schedule.owner_id, "u7");
        assert_eq!(schedule.coordinate, Some(Coordinate::new(37.49, 127.02)));
    }

    #[test]
    fn test_missing_geopoint_is_not_an_error() {
        let mut fields = schedule_to_fields(&sample_schedule());
        fields.remove(FIELD_GEO_POINT);
        let doc = Document {
            name: Some("projects/p/databases/d/documents/schedule/s1".to_string()),
            fields,
        };

        let schedule = schedule_from_document(&doc).unwrap();
        assert!(schedule.coordinate.is_none());
    }

    #[test]
    fn test_wrongly_typed_geopoint_is_tolerated() {
        let mut fields = schedule_to_fields(&sample_schedule());
        fields.insert(
            FIELD_GEO_POINT.to_string(),
            FirestoreValue::StringValue("37.0,127.0".into()),
        );
        let doc = Document {
            name: Some("projects/p/databases/d/documents/schedule/s1".to_string()),
            fields,
        };

        let schedule = schedule_from_document(&doc).unwrap();
        assert!(schedule.coordinate.is_none());
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let mut fields = schedule_to_fields(&sample_schedule());
        fields.remove(FIELD_TITLE);
        let doc = Document {
            name: Some("projects/p/databases/d/documents/schedule/s1".to_string()),
            fields,
        };

        let err = schedule_from_document(&doc).unwrap_err();
        assert!(matches!(err, FirestoreError::MalformedDocument(_)));
        assert!(err.to_string().contains(FIELD_TITLE));
    }

    #[test]
    fn test_missing_datetime_is_malformed() {
        let mut fields = schedule_to_fields(&sample_schedule());
        fields.remove(FIELD_DATETIME);
        let doc = Document {
            name: Some("projects/p/databases/d/documents/schedule/s1".to_string()),
            fields,
        };

        assert!(schedule_from_document(&doc).is_err());
    }

    #[test]
    fn test_unknown_field_kinds_decode_and_are_ignored() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/d/documents/schedule/s1",
            "fields": {
                "title": {"stringValue": "Gym"},
                "userId": {"stringValue": "u1"},
                "datetime": {"timestampValue": "2025-06-01T18:00:00Z"},
                "legacy": {"mapValue": {"fields": {"v": {"integerValue": "1"}}}},
                "tags": {"arrayValue": {"values": [{"stringValue": "a"}]}},
                "ref": {"referenceValue": "projects/p/databases/d/documents/other/x"}
            }
        }))
        .unwrap();

        let schedule = schedule_from_document(&doc).unwrap();
        assert_eq!(schedule.name, "Gym");
        assert!(schedule.coordinate.is_none());
    }
}
