//! Geospatial primitives for Pingfence.
//!
//! This crate provides:
//! - The `Coordinate` type with range validation
//! - Geodesic (WGS-84 ellipsoid) distance calculation
//!
//! Proximity decisions ride on sub-100-metre thresholds, so distances are
//! computed on the ellipsoid rather than a sphere. Haversine drifts by up
//! to ~0.5% against the ellipsoid, which is enough to flip a boundary case.
//!
//! # Example
//!
//! ```
//! use pingfence_geo::{geodesic_distance_meters, Coordinate};
//!
//! let berlin = Coordinate::new(52.5200, 13.4050);
//! let paris = Coordinate::new(48.8566, 2.3522);
//!
//! let distance = geodesic_distance_meters(&berlin, &paris);
//! assert!((distance - 879_699.0).abs() < 50.0); // ~879.7 km
//! ```

mod error;
mod geodesic;

pub use error::{GeoError, Result};
pub use geodesic::{
    geodesic_distance_meters, WGS84_FLATTENING, WGS84_SEMI_MAJOR_M, WGS84_SEMI_MINOR_M,
};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate after validating both components.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Validates a latitude in degrees (-90 to 90, NaN rejected).
pub fn validate_latitude(latitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
        return Err(GeoError::InvalidLatitude(latitude));
    }
    Ok(())
}

/// Validates a longitude in degrees (-180 to 180, NaN rejected).
pub fn validate_longitude(longitude: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
        return Err(GeoError::InvalidLongitude(longitude));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(52.5200, 13.4050);
        assert_eq!(coord.latitude, 52.5200);
        assert_eq!(coord.longitude, 13.4050);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(Coordinate::try_new(37.0, 127.0).is_ok());
        assert!(matches!(
            Coordinate::try_new(95.0, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::try_new(0.0, -200.0),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (52.5200, 13.4050).into();
        assert_eq!(coord.latitude, 52.5200);
    }

    #[test]
    fn test_axis_validators() {
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.000_1).is_err());
        assert!(validate_latitude(f64::NAN).is_err());

        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(-180.000_1).is_err());
        assert!(validate_longitude(f64::NAN).is_err());
    }
}
