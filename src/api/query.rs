use crate::core::constants::DEFAULT_QUERY_POINTS;
use crate::error::NearestError;
use crate::util::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// A fixed position for which the nearest entity is sought.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub latitude: f32,
    pub longitude: f32,
}

impl QueryPoint {
    pub fn new(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The ten reference positions, in their reporting order.
    pub fn defaults() -> Vec<QueryPoint> {
        DEFAULT_QUERY_POINTS
            .iter()
            .map(|&(lat, lon)| QueryPoint::new(lat, lon))
            .collect()
    }
}

impl From<(f32, f32)> for QueryPoint {
    fn from((latitude, longitude): (f32, f32)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl Coordinate for QueryPoint {
    fn latitude(&self) -> f64 {
        self.latitude as f64
    }
    fn longitude(&self) -> f64 {
        self.longitude as f64
    }
}

/// Checks that a query list is non-empty and every point is finite.
pub(crate) fn validate_query_points(points: &[QueryPoint]) -> Result<(), NearestError> {
    if points.is_empty() {
        return Err(NearestError::EmptyQueryPoints);
    }
    if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(NearestError::NonFiniteCoordinate {
            index,
            latitude: p.latitude,
            longitude: p.longitude,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_order() {
        let points = QueryPoint::defaults();
        assert_eq!(points.len(), 10);
        assert_eq!(points[0], QueryPoint::new(34.544909, -102.100843));
        assert_eq!(points[9], QueryPoint::new(32.234235, -100.222222));
    }

    #[test]
    fn test_from_tuple() {
        let p: QueryPoint = (1.5, -2.5).into();
        assert_eq!(p.latitude(), 1.5);
        assert_eq!(p.longitude(), -2.5);
    }

    #[test]
    fn test_validate_query_points() {
        assert_eq!(validate_query_points(&[]), Err(NearestError::EmptyQueryPoints));
        assert!(validate_query_points(&QueryPoint::defaults()).is_ok());

        let bad = [QueryPoint::new(1.0, 1.0), QueryPoint::new(1.0, f32::NAN)];
        assert!(matches!(
            validate_query_points(&bad),
            Err(NearestError::NonFiniteCoordinate { index: 1, .. })
        ));
    }
}
