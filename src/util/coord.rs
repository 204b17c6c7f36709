use geo_types::Point;

/// Trait for types that carry a latitude/longitude pair.
///
/// Implemented for `(f32, f32)` and `(f64, f64)` tuples in `(latitude, longitude)` order,
/// for `geo_types::Point<f64>` (x = longitude, y = latitude), and for the crate's
/// [`Entity`](crate::Entity) and [`QueryPoint`](crate::QueryPoint).
/// Values are widened to `f64` so grid and distance arithmetic is done at one precision.
pub trait Coordinate {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;

    /// Returns `true` when both components are finite.
    fn is_finite(&self) -> bool {
        self.latitude().is_finite() && self.longitude().is_finite()
    }

    /// The coordinate as a `geo_types::Point` with x = longitude, y = latitude.
    fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude(), self.latitude())
    }
}

impl Coordinate for (f32, f32) {
    fn latitude(&self) -> f64 {
        self.0 as f64
    }
    fn longitude(&self) -> f64 {
        self.1 as f64
    }
}

impl Coordinate for (f64, f64) {
    fn latitude(&self) -> f64 {
        self.0
    }
    fn longitude(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn latitude(&self) -> f64 {
        Point::y(*self)
    }
    fn longitude(&self) -> f64 {
        Point::x(*self)
    }
}

impl<C: Coordinate + ?Sized> Coordinate for &C {
    fn latitude(&self) -> f64 {
        (**self).latitude()
    }
    fn longitude(&self) -> f64 {
        (**self).longitude()
    }
}
