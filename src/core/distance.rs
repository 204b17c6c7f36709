use crate::core::constants::{
    ARC_MINUTES_PER_DEGREE, METERS_PER_STATUTE_MILE, STATUTE_MILES_PER_NAUTICAL_MILE,
};
use crate::util::coord::Coordinate;

/// Planar distance between two latitude/longitude pairs, in degrees.
///
/// Not a physical distance: a degree of longitude shrinks towards the poles. It is only
/// used to rank candidates that already sit in a small grid neighbourhood of the query.
/// Even there it can misrank two candidates whose real distances are within a factor of
/// `1 / cos(latitude)` of each other.
#[inline]
pub fn relative_distance(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = lat_a - lat_b;
    let d_lon = lon_a - lon_b;
    (d_lat * d_lat + d_lon * d_lon).sqrt()
}

/// Great-circle distance in meters on a spherical earth (spherical law of cosines).
///
/// The central angle is converted to arc-minutes, each taken as one nautical mile of
/// 1.1515 statute miles.
pub fn real_distance(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    // acos is ill-conditioned at 1: a cosine of 1 - 1ulp is already ~0.1 m.
    if lat_a == lat_b && lon_a == lon_b {
        return 0.0;
    }

    let phi_a = lat_a.to_radians();
    let phi_b = lat_b.to_radians();
    let d_lambda = (lon_a - lon_b).to_radians();

    // Rounding can push the cosine just past 1 for nearly coincident points.
    let cos_angle =
        (phi_a.sin() * phi_b.sin() + phi_a.cos() * phi_b.cos() * d_lambda.cos()).clamp(-1.0, 1.0);

    cos_angle.acos().to_degrees()
        * ARC_MINUTES_PER_DEGREE
        * STATUTE_MILES_PER_NAUTICAL_MILE
        * METERS_PER_STATUTE_MILE
}

/// [`relative_distance`] between any two [`Coordinate`]s.
#[inline]
pub fn relative_between<A: Coordinate, B: Coordinate>(a: &A, b: &B) -> f64 {
    relative_distance(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}

/// [`real_distance`] between any two [`Coordinate`]s.
pub fn real_between<A: Coordinate, B: Coordinate>(a: &A, b: &B) -> f64 {
    real_distance(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}
