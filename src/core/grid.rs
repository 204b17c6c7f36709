use crate::error::NearestError;
use crate::util::coord::Coordinate;
use geo::BoundingRect;
use geo_types::{MultiPoint, Point, Rect};
use std::fmt;

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Rows of the grid run along latitude (`cell_x`).
    Latitude,
    /// Columns of the grid run along longitude (`cell_y`).
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// How the coordinate-space zero of each axis is derived from that axis' minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginPolicy {
    /// A positive minimum is negated before use; a zero or negative minimum is used as is.
    ///
    /// This reproduces the reference tool's cell assignment exactly. For an all-positive
    /// axis it stretches the grid to cover `[-min, max]`, so the data only occupies the
    /// upper part of the cell range.
    #[default]
    NegatedPositiveMinimum,
    /// The minimum itself is the origin, so the data spans cells `0..=resolution`.
    RawMinimum,
}

impl OriginPolicy {
    pub fn origin(&self, min: f64) -> f64 {
        match self {
            OriginPolicy::NegatedPositiveMinimum if min > 0.0 => -min,
            _ => min,
        }
    }
}

/// Largest cell index magnitude a search will start from. Every integer up to this is
/// exact in an `f64`, and doubling half-windows still reach past it without overflow.
pub const MAX_CELL_INDEX: i64 = 1 << 52;

/// Integer cell address. Not clamped: points outside the indexed bounds map outside
/// `0..=resolution`, including negative cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoordinate {
    pub cell_x: i64,
    pub cell_y: i64,
}

impl GridCoordinate {
    pub fn new(cell_x: i64, cell_y: i64) -> Self {
        Self { cell_x, cell_y }
    }
}

/// Latitude/longitude extent of everything a grid must be able to address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GridBounds {
    /// Bounds over every coordinate yielded, or `None` when there are none.
    pub fn from_coordinates<I, C>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = C>,
        C: Coordinate,
    {
        let points: MultiPoint<f64> = coords
            .into_iter()
            .map(|c| c.to_point())
            .collect::<Vec<Point<f64>>>()
            .into();
        points.bounding_rect().map(Self::from)
    }

    pub fn contains<C: Coordinate>(&self, coord: &C) -> bool {
        let (lat, lon) = (coord.latitude(), coord.longitude());
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            geo_types::coord! { x: self.min_lon, y: self.min_lat },
            geo_types::coord! { x: self.max_lon, y: self.max_lat },
        )
    }
}

impl From<Rect<f64>> for GridBounds {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lon: rect.min().x,
            max_lon: rect.max().x,
        }
    }
}

/// Fixed cell layout of a grid: per-axis origin and cell extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    bounds: GridBounds,
    resolution: usize,
    origin_lat: f64,
    origin_lon: f64,
    cell_width: f64,
    cell_height: f64,
}

impl GridGeometry {
    /// Derives origins and cell extents from `bounds`.
    ///
    /// Fails with [`NearestError::DegenerateBounds`] when an axis ends up with a zero or
    /// non-finite cell extent. The check is made on the extent, not the raw span: under
    /// [`OriginPolicy::NegatedPositiveMinimum`] a constant positive axis still has width.
    pub fn new(
        bounds: GridBounds,
        resolution: usize,
        policy: OriginPolicy,
    ) -> Result<Self, NearestError> {
        if resolution == 0 {
            return Err(NearestError::InvalidResolution(resolution));
        }

        let origin_lat = policy.origin(bounds.min_lat);
        let origin_lon = policy.origin(bounds.min_lon);

        let cell_width = (bounds.max_lat - origin_lat).abs() / resolution as f64;
        let cell_height = (bounds.max_lon - origin_lon).abs() / resolution as f64;

        if !(cell_width.is_finite() && cell_width > 0.0) {
            return Err(NearestError::DegenerateBounds(Axis::Latitude));
        }
        if !(cell_height.is_finite() && cell_height > 0.0) {
            return Err(NearestError::DegenerateBounds(Axis::Longitude));
        }

        Ok(Self {
            bounds,
            resolution,
            origin_lat,
            origin_lon,
            cell_width,
            cell_height,
        })
    }

    /// Cell containing `coord`, rounding half to even.
    pub fn cell_of<C: Coordinate>(&self, coord: &C) -> GridCoordinate {
        let x = ((coord.latitude() - self.origin_lat) / self.cell_width).round_ties_even();
        let y = ((coord.longitude() - self.origin_lon) / self.cell_height).round_ties_even();
        GridCoordinate::new(x as i64, y as i64)
    }

    /// Like [`cell_of`](Self::cell_of), but `None` for a non-finite coordinate or one whose
    /// cell lies more than [`MAX_CELL_INDEX`] cells from the origin.
    pub fn checked_cell_of<C: Coordinate>(&self, coord: &C) -> Option<GridCoordinate> {
        let x = ((coord.latitude() - self.origin_lat) / self.cell_width).round_ties_even();
        let y = ((coord.longitude() - self.origin_lon) / self.cell_height).round_ties_even();
        let limit = MAX_CELL_INDEX as f64;
        (x.abs() <= limit && y.abs() <= limit).then(|| GridCoordinate::new(x as i64, y as i64))
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_lat, self.origin_lon)
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> GridBounds {
        GridBounds {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    #[test]
    fn test_bounds_from_coordinates() {
        let b = GridBounds::from_coordinates([(34.5_f64, -102.1_f64), (32.3, -95.3), (35.2, -99.0)])
            .unwrap();
        assert_eq!(b, bounds(32.3, 35.2, -102.1, -95.3));
        assert!(b.contains(&(33.0_f64, -100.0_f64)));
        assert!(!b.contains(&(36.0_f64, -100.0_f64)));
    }

    #[test]
    fn test_bounds_from_no_coordinates() {
        let empty: Vec<(f64, f64)> = Vec::new();
        assert!(GridBounds::from_coordinates(empty).is_none());
    }

    #[test]
    fn test_bounds_rect_round_trip() {
        let b = bounds(31.0, 36.0, -103.0, -94.0);
        assert_eq!(GridBounds::from(b.to_rect()), b);
    }

    #[test]
    fn test_origin_policies() {
        assert_eq!(OriginPolicy::NegatedPositiveMinimum.origin(31.5), -31.5);
        assert_eq!(OriginPolicy::NegatedPositiveMinimum.origin(-102.0), -102.0);
        assert_eq!(OriginPolicy::NegatedPositiveMinimum.origin(0.0), 0.0);
        assert_eq!(OriginPolicy::RawMinimum.origin(31.5), 31.5);
        assert_eq!(OriginPolicy::RawMinimum.origin(-102.0), -102.0);
    }

    #[test]
    fn test_literal_origin_cell_extents() -> Result<(), NearestError> {
        let g = GridGeometry::new(
            bounds(30.0, 40.0, -110.0, -90.0),
            10,
            OriginPolicy::NegatedPositiveMinimum,
        )?;
        // Latitude origin -30: extent |40 - -30| / 10
        assert!((g.cell_width() - 7.0).abs() < 1e-12);
        // Longitude origin -110: extent |-90 - -110| / 10
        assert!((g.cell_height() - 2.0).abs() < 1e-12);
        assert_eq!(g.origin(), (-30.0, -110.0));
        Ok(())
    }

    #[test]
    fn test_raw_origin_maps_bounds_to_full_range() -> Result<(), NearestError> {
        let g = GridGeometry::new(bounds(30.0, 40.0, -110.0, -90.0), 10, OriginPolicy::RawMinimum)?;
        assert_eq!(g.cell_of(&(30.0_f64, -110.0_f64)), GridCoordinate::new(0, 0));
        assert_eq!(g.cell_of(&(40.0_f64, -90.0_f64)), GridCoordinate::new(10, 10));
        assert_eq!(g.cell_of(&(35.0_f64, -100.0_f64)), GridCoordinate::new(5, 5));
        Ok(())
    }

    #[test]
    fn test_cell_of_rounds_half_to_even() -> Result<(), NearestError> {
        let g = GridGeometry::new(bounds(0.0, 10.0, 0.0, 10.0), 10, OriginPolicy::RawMinimum)?;
        assert_eq!(g.cell_of(&(2.5_f64, 3.5_f64)), GridCoordinate::new(2, 4));
        Ok(())
    }

    #[test]
    fn test_cell_of_outside_bounds_is_unclamped() -> Result<(), NearestError> {
        let g = GridGeometry::new(bounds(0.0, 10.0, 0.0, 10.0), 10, OriginPolicy::RawMinimum)?;
        assert_eq!(g.cell_of(&(-3.0_f64, 14.0_f64)), GridCoordinate::new(-3, 14));
        Ok(())
    }

    #[test]
    fn test_checked_cell_of_rejects_out_of_domain() -> Result<(), NearestError> {
        let g = GridGeometry::new(bounds(0.0, 10.0, 0.0, 10.0), 10, OriginPolicy::RawMinimum)?;
        assert_eq!(
            g.checked_cell_of(&(-3.0_f64, 14.0_f64)),
            Some(GridCoordinate::new(-3, 14))
        );
        assert_eq!(g.checked_cell_of(&(f64::NAN, 1.0_f64)), None);
        assert_eq!(g.checked_cell_of(&(1.0_f64, f64::INFINITY)), None);
        assert_eq!(g.checked_cell_of(&(1e30_f64, 1e30_f64)), None);
        Ok(())
    }

    #[test]
    fn test_cell_of_is_monotonic() -> Result<(), NearestError> {
        for policy in [OriginPolicy::NegatedPositiveMinimum, OriginPolicy::RawMinimum] {
            let g = GridGeometry::new(bounds(31.8, 35.2, -102.1, -94.7), 1000, policy)?;
            let mut last = g.cell_of(&(31.8_f64, -102.1_f64));
            for step in 1..=500 {
                let t = step as f64 / 500.0;
                let cell = g.cell_of(&(31.8 + 3.4 * t, -102.1 + 7.4 * t));
                assert!(cell.cell_x >= last.cell_x);
                assert!(cell.cell_y >= last.cell_y);
                last = cell;
            }
        }
        Ok(())
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let result = GridGeometry::new(bounds(0.0, 1.0, 0.0, 1.0), 0, OriginPolicy::RawMinimum);
        assert_eq!(result, Err(NearestError::InvalidResolution(0)));
    }

    #[test]
    fn test_constant_positive_axis_under_literal_origin_is_not_degenerate() -> Result<(), NearestError>
    {
        let g = GridGeometry::new(
            bounds(10.0, 10.0, -102.0, -95.0),
            100,
            OriginPolicy::NegatedPositiveMinimum,
        )?;
        assert!((g.cell_width() - 0.2).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_constant_axis_under_raw_origin_is_degenerate() {
        let result = GridGeometry::new(bounds(10.0, 10.0, -102.0, -95.0), 100, OriginPolicy::RawMinimum);
        assert_eq!(result, Err(NearestError::DegenerateBounds(Axis::Latitude)));
    }

    #[test]
    fn test_constant_non_positive_axis_is_degenerate_under_both_policies() {
        for policy in [OriginPolicy::NegatedPositiveMinimum, OriginPolicy::RawMinimum] {
            let result = GridGeometry::new(bounds(30.0, 35.0, -99.0, -99.0), 100, policy);
            assert_eq!(result, Err(NearestError::DegenerateBounds(Axis::Longitude)));
        }
    }
}
