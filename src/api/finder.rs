use crate::api::entity::{Entity, EntityIndex, EntityStore};
use crate::api::query::{QueryPoint, validate_query_points};
use crate::core::distance::{real_between, relative_between};
use crate::error::NearestError;
use crate::index::spatial_grid::{GridConfig, SpatialGrid};
use crate::util::coord::Coordinate;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;

/// The entity chosen for one query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestMatch {
    pub entity: EntityIndex,
    /// Planar distance in degrees, used for ranking
    pub relative_distance: f64,
    /// Great-circle distance in meters, computed for the winner only
    pub distance_meters: f64,
}

/// Outcome for one query point; `nearest` is `None` when no candidate was found.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub query_index: usize,
    pub query_point: QueryPoint,
    pub nearest: Option<NearestMatch>,
}

/// Flattened result row: what gets printed or exported for one query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// One-based position in the query list
    pub position: usize,
    pub query_latitude: f32,
    pub query_longitude: f32,
    pub entity_id: Option<i32>,
    pub label: Option<String>,
    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
    pub distance_meters: Option<f64>,
}

/// Answers "which entity is closest?" for a fixed, ordered list of query points.
///
/// Owns the entity arena and the grid built over it. An empty arena is not an error:
/// every query point then reports no match.
///
/// # Example
///
/// ```
/// use nearest_position::{Entity, EntityStore, GridConfig, NearestFinder, QueryPoint};
///
/// # fn main() -> Result<(), nearest_position::NearestError> {
/// let store = EntityStore::from_entities(vec![
///     Entity::new(1, "AAA111", 34.544909, -102.100843, 0),
///     Entity::new(2, "BBB222", 34.6, -102.0, 0),
/// ])?;
/// let finder = NearestFinder::new(
///     store,
///     vec![QueryPoint::new(34.544909, -102.100843)],
///     &GridConfig::new(10),
/// )?;
///
/// let results = finder.find_all();
/// let nearest = results[0].nearest.unwrap();
/// assert_eq!(finder.entity(&nearest).label_str(), "AAA111");
/// assert!(nearest.distance_meters.abs() < 1e-6);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NearestFinder {
    store: EntityStore,
    query_points: Vec<QueryPoint>,
    grid: Option<SpatialGrid>,
}

impl NearestFinder {
    pub fn new(
        store: EntityStore,
        query_points: Vec<QueryPoint>,
        config: &GridConfig,
    ) -> Result<Self, NearestError> {
        validate_query_points(&query_points)?;

        let grid = if store.is_empty() {
            warn!("No entities to index; every query point will report no match");
            None
        } else {
            Some(SpatialGrid::build(&store, &query_points, config)?)
        };

        Ok(Self {
            store,
            query_points,
            grid,
        })
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn query_points(&self) -> &[QueryPoint] {
        &self.query_points
    }

    /// The grid, or `None` when there are no entities.
    pub fn grid(&self) -> Option<&SpatialGrid> {
        self.grid.as_ref()
    }

    pub fn entity(&self, nearest: &NearestMatch) -> &Entity {
        &self.store[nearest.entity]
    }

    /// Nearest entity for the query point at `query_index`.
    pub fn find(&self, query_index: usize) -> Result<QueryResult, NearestError> {
        let query_point = *self
            .query_points
            .get(query_index)
            .ok_or(NearestError::QueryIndexOutOfRange(query_index))?;

        Ok(QueryResult {
            query_index,
            query_point,
            nearest: self.nearest_to(&query_point),
        })
    }

    /// Nearest entity for an arbitrary point, using the same grid.
    ///
    /// `None` when there are no entities, when the search ends empty, or when `point` is
    /// not finite or lies too far off the grid to be placed on it.
    pub fn nearest_to<C: Coordinate>(&self, point: &C) -> Option<NearestMatch> {
        let grid = self.grid.as_ref()?;
        let candidates = grid.candidates_near(point);
        debug!(
            "{} candidates near ({}, {})",
            candidates.len(),
            point.latitude(),
            point.longitude()
        );
        select_nearest(&self.store, &candidates, point)
    }

    /// Results for every query point, in list order.
    pub fn find_all(&self) -> Vec<QueryResult> {
        self.query_points
            .iter()
            .enumerate()
            .map(|(query_index, &query_point)| QueryResult {
                query_index,
                query_point,
                nearest: self.nearest_to(&query_point),
            })
            .collect()
    }

    /// Same as [`find_all`](Self::find_all), with query points spread across the rayon pool.
    pub fn par_find_all(&self) -> Vec<QueryResult> {
        self.query_points
            .par_iter()
            .enumerate()
            .map(|(query_index, &query_point)| QueryResult {
                query_index,
                query_point,
                nearest: self.nearest_to(&query_point),
            })
            .collect()
    }

    /// Flattens results into printable rows, resolving entity labels.
    pub fn report(&self, results: &[QueryResult]) -> Vec<ReportRow> {
        results
            .iter()
            .map(|r| {
                let entity = r.nearest.as_ref().map(|m| self.entity(m));
                ReportRow {
                    position: r.query_index + 1,
                    query_latitude: r.query_point.latitude,
                    query_longitude: r.query_point.longitude,
                    entity_id: entity.map(|e| e.id),
                    label: entity.map(|e| e.label_str().into_owned()),
                    latitude: entity.map(|e| e.latitude),
                    longitude: entity.map(|e| e.longitude),
                    distance_meters: r.nearest.map(|m| m.distance_meters),
                }
            })
            .collect()
    }
}

/// Picks the candidate with the smallest relative distance to `point`.
///
/// Candidates are visited in the given order and only a strictly smaller distance
/// replaces the current best, so the earliest candidate wins a tie.
pub fn select_nearest<C: Coordinate>(
    store: &EntityStore,
    candidates: &[EntityIndex],
    point: &C,
) -> Option<NearestMatch> {
    let mut best: Option<(EntityIndex, f64)> = None;
    for &index in candidates {
        let Some(entity) = store.get(index) else {
            continue;
        };
        let d = relative_between(entity, point);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((index, d)),
        }
    }

    best.map(|(index, relative_distance)| NearestMatch {
        entity: index,
        relative_distance,
        distance_meters: real_between(&store[index], point),
    })
}
