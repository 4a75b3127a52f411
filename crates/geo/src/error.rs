//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or NaN
    #[error("Invalid latitude: {0} (expected -90 to 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or NaN
    #[error("Invalid longitude: {0} (expected -180 to 180)")]
    InvalidLongitude(f64),
}
