//! # nearest-position
//!
//! Finds, for a fixed list of query points, the closest of possibly millions of entities
//! carrying a latitude/longitude.
//!
//! Entities are bucketed into a uniform grid over the bounding box of the data and the
//! query points. Each query starts at its own cell and doubles a square search window
//! until it holds candidates; the candidates are ranked by planar distance and the winner
//! is reported with its great-circle distance in meters.
//!
//! ### 1. `NearestFinder` - Batch Search
//!
//! ```
//! use nearest_position::{Entity, EntityStore, GridConfig, NearestFinder, QueryPoint};
//!
//! # fn main() -> Result<(), nearest_position::NearestError> {
//! let store = EntityStore::from_entities(vec![
//!     Entity::new(1, "AAA111", 34.544909, -102.100843, 0),
//!     Entity::new(2, "BBB222", 34.6, -102.0, 0),
//! ])?;
//! let finder = NearestFinder::new(store, QueryPoint::defaults(), &GridConfig::default())?;
//!
//! for row in finder.report(&finder.find_all()) {
//!     if let Some(label) = row.label {
//!         println!("{}: {} at {:.3} m", row.position, label, row.distance_meters.unwrap_or(0.0));
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `SpatialGrid` - Candidate Lookup
//!
//! ```
//! use nearest_position::{
//!     Entity, EntityStore, OriginPolicy, QueryPoint, SpatialGrid, TerminationPolicy,
//! };
//!
//! # fn main() -> Result<(), nearest_position::NearestError> {
//! let store = EntityStore::from_entities(vec![Entity::new(1, "A", 5.0, 5.0, 0)])?;
//! let queries = [QueryPoint::new(0.0, 0.0), QueryPoint::new(10.0, 10.0)];
//!
//! let grid = SpatialGrid::builder()
//!     .resolution(10)
//!     .origin_policy(OriginPolicy::RawMinimum)
//!     .termination_policy(TerminationPolicy::AllEdges)
//!     .build(&store, &queries)?;
//!
//! let outcome = grid.search(&queries[0]).expect("query point is in the grid's domain");
//! assert_eq!(outcome.candidates.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. Record Files
//!
//! ```no_run
//! use nearest_position::{EntityStore, read_entities};
//!
//! let store = EntityStore::from_entities(read_entities("VehiclePositions.dat").unwrap()).unwrap();
//! println!("{} entities", store.len());
//! ```

pub mod api;
pub mod core;
pub mod error;
pub mod index;
pub mod io;
pub mod util;

pub use api::{
    Entity, EntityIndex, EntityStore, NearestFinder, NearestMatch, QueryPoint, QueryResult,
    ReportRow, select_nearest,
};
pub use core::{
    Axis, DEFAULT_QUERY_POINTS, DEFAULT_RESOLUTION, GridBounds, GridCoordinate, GridGeometry,
    INITIAL_HALF_WINDOW, MAX_CELL_INDEX, OriginPolicy, real_between, real_distance,
    relative_between, relative_distance,
};
pub use error::NearestError;
pub use index::{GridConfig, SearchOutcome, SpatialGrid, SpatialGridBuilder, TerminationPolicy};
pub use io::{
    RecordReader, decode_entities, encode_entities, read_entities, read_query_points_csv,
    results_to_geojson, write_entities, write_results_csv, write_results_geojson,
};
pub use util::Coordinate;

pub use geo_types;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn two_entities() -> Vec<Entity> {
        vec![
            Entity::new(1, "AAA111", 34.544909, -102.100843, 0),
            Entity::new(2, "BBB222", 34.6, -102.0, 0),
        ]
    }

    #[test]
    fn test_end_to_end_from_record_file() -> Result<(), NearestError> {
        let dir = tempdir()?;
        let path = dir.path().join("VehiclePositions.dat");
        write_entities(&path, &two_entities())?;

        let store = EntityStore::from_entities(read_entities(&path)?)?;
        let finder = NearestFinder::new(
            store,
            vec![QueryPoint::new(34.544909, -102.100843)],
            &GridConfig::new(10),
        )?;

        let results = finder.find_all();
        assert_eq!(results.len(), 1);
        let nearest = results[0].nearest.unwrap();
        assert_eq!(nearest.entity, EntityIndex(0));
        assert!(nearest.distance_meters.abs() < 1e-6);

        let rows = finder.report(&results);
        assert_eq!(rows[0].label.as_deref(), Some("AAA111"));

        let csv_path = dir.path().join("results.csv");
        write_results_csv(&rows, &csv_path)?;
        assert!(csv_path.exists());
        Ok(())
    }

    #[test]
    fn test_default_queries_against_synthetic_fleet() -> Result<(), NearestError> {
        // Vehicles on a regular lattice over the reference area.
        let mut entities = Vec::new();
        let mut id = 0;
        for i in 0..60 {
            for j in 0..120 {
                entities.push(Entity::new(
                    id,
                    format!("FLEET{:05}", id),
                    31.8 + i as f32 * 0.06,
                    -102.2 + j as f32 * 0.065,
                    0,
                ));
                id += 1;
            }
        }
        let store = EntityStore::from_entities(entities)?;
        let finder = NearestFinder::new(store, QueryPoint::defaults(), &GridConfig::default())?;

        for result in finder.find_all() {
            let nearest = result.nearest.unwrap();
            // Lattice spacing bounds how far the nearest vehicle can be.
            assert!(nearest.relative_distance < 0.1);
            assert!(nearest.distance_meters < 8_000.0);
        }
        Ok(())
    }

    #[test]
    fn test_zero_entities_yield_no_results() -> Result<(), NearestError> {
        let finder = NearestFinder::new(
            EntityStore::from_entities(decode_entities(&[])?)?,
            QueryPoint::defaults(),
            &GridConfig::default(),
        )?;
        let rows = finder.report(&finder.find_all());
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.entity_id.is_none()));
        Ok(())
    }

    #[test]
    fn test_shared_positive_latitude_is_not_degenerate_by_default() -> Result<(), NearestError> {
        let store = EntityStore::from_entities(vec![
            Entity::new(1, "W", 10.0, -100.0, 0),
            Entity::new(2, "E", 10.0, -99.0, 0),
        ])?;
        let queries = vec![QueryPoint::new(10.0, -99.2)];

        let finder = NearestFinder::new(store.clone(), queries.clone(), &GridConfig::new(100))?;
        let nearest = finder.find(0)?.nearest.unwrap();
        assert_eq!(nearest.entity, EntityIndex(1));

        let raw = NearestFinder::new(
            store,
            queries,
            &GridConfig {
                origin_policy: OriginPolicy::RawMinimum,
                ..GridConfig::new(100)
            },
        );
        assert!(matches!(
            raw,
            Err(NearestError::DegenerateBounds(Axis::Latitude))
        ));
        Ok(())
    }

    #[test]
    fn test_geojson_export_of_results() -> Result<(), NearestError> {
        let finder = NearestFinder::new(
            EntityStore::from_entities(two_entities())?,
            vec![QueryPoint::new(34.6, -102.0), QueryPoint::new(34.5, -102.1)],
            &GridConfig::new(10),
        )?;
        let collection = results_to_geojson(&finder.report(&finder.find_all()))?;
        assert_eq!(collection.features.len(), 2);
        Ok(())
    }
}
