//! Geodesic distance on the WGS-84 ellipsoid.
//!
//! Implements Vincenty's inverse formulae, which solve for the shortest
//! path between two points on an oblate spheroid. Accurate to well under a
//! millimetre for non-antipodal pairs, which is what a fixed proximity
//! radius needs a few orders of magnitude below its threshold.

use crate::Coordinate;

/// WGS-84 semi-major axis in meters.
pub const WGS84_SEMI_MAJOR_M: f64 = 6_378_137.0;

/// WGS-84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// WGS-84 semi-minor axis in meters, derived from the semi-major axis and
/// flattening.
pub const WGS84_SEMI_MINOR_M: f64 = WGS84_SEMI_MAJOR_M * (1.0 - WGS84_FLATTENING);

/// Convergence threshold for the longitude iteration, in radians.
const CONVERGENCE: f64 = 1e-12;

/// Iteration cap. Nearly-antipodal pairs may never reach `CONVERGENCE`;
/// after this many rounds the final iterate is used as-is, which stays
/// within tens of metres on a ~20,000 km geodesic.
const MAX_ITERATIONS: usize = 100;

/// Calculates the geodesic distance between two coordinates in meters.
///
/// Uses Vincenty's inverse method on the WGS-84 ellipsoid.
///
/// # Arguments
/// * `from` - Starting coordinate
/// * `to` - Ending coordinate
///
/// # Returns
/// Distance in meters. Coincident points return exactly 0.0. The function
/// is total over valid coordinate ranges; out-of-range input is the
/// caller's problem (see [`Coordinate::try_new`](crate::Coordinate::try_new)).
///
/// # Example
/// ```
/// use pingfence_geo::{geodesic_distance_meters, Coordinate};
///
/// let gym = Coordinate::new(37.0, 127.0);
/// let nearby = Coordinate::new(37.000901, 127.0);
///
/// let distance = geodesic_distance_meters(&gym, &nearby);
/// assert!((distance - 99.99).abs() < 0.01);
/// ```
pub fn geodesic_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    if from.latitude == to.latitude && from.longitude == to.longitude {
        return 0.0;
    }

    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let l = lon2 - lon1;

    // Reduced latitudes on the auxiliary sphere.
    let u1 = ((1.0 - WGS84_FLATTENING) * lat1.tan()).atan();
    let u2 = ((1.0 - WGS84_FLATTENING) * lat2.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 0.0;
    let mut cos_2sigma_m = 0.0;

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        // Coincident on the auxiliary sphere.
        if sin_sigma == 0.0 {
            return 0.0;
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // Equatorial geodesics have cos²α = 0; the C term vanishes with it.
        cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = WGS84_FLATTENING / 16.0
            * cos_sq_alpha
            * (4.0 + WGS84_FLATTENING * (4.0 - 3.0 * cos_sq_alpha));

        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_FLATTENING
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < CONVERGENCE {
            break;
        }
    }

    let u_sq = cos_sq_alpha * (WGS84_SEMI_MAJOR_M * WGS84_SEMI_MAJOR_M
        - WGS84_SEMI_MINOR_M * WGS84_SEMI_MINOR_M)
        / (WGS84_SEMI_MINOR_M * WGS84_SEMI_MINOR_M);

    let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let delta_sigma = b
        * sin_sigma
        * (cos_2sigma_m
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    WGS84_SEMI_MINOR_M * a * (sigma - delta_sigma)
}
