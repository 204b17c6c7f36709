use crate::api::entity::{EntityIndex, EntityStore};
use crate::api::query::QueryPoint;
use crate::core::constants::{DEFAULT_RESOLUTION, INITIAL_HALF_WINDOW};
use crate::core::grid::{GridBounds, GridCoordinate, GridGeometry, OriginPolicy};
use crate::error::NearestError;
use crate::util::coord::Coordinate;
use log::{debug, warn};
use std::collections::HashMap;

/// When an expanding-ring search that has found nothing gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminationPolicy {
    /// Stop only once the window overflows all four grid edges at the same time.
    ///
    /// Matches the reference tool. A non-empty grid always yields candidates for any
    /// query, since by then the window covers every indexed cell.
    #[default]
    AllEdges,
    /// Stop as soon as the window overflows any grid edge.
    ///
    /// Cheaper near the border, but a query close to an edge can come back empty while
    /// entities exist further inside the grid.
    AnyEdge,
}

impl TerminationPolicy {
    pub fn should_stop(&self, center: GridCoordinate, half_window: i64, resolution: i64) -> bool {
        let below_x = center.cell_x.saturating_sub(half_window) < 0;
        let above_x = center.cell_x.saturating_add(half_window) > resolution;
        let below_y = center.cell_y.saturating_sub(half_window) < 0;
        let above_y = center.cell_y.saturating_add(half_window) > resolution;

        match self {
            TerminationPolicy::AllEdges => below_x && above_x && below_y && above_y,
            TerminationPolicy::AnyEdge => below_x || above_x || below_y || above_y,
        }
    }
}

/// Settings for building a [`SpatialGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub resolution: usize,
    pub origin_policy: OriginPolicy,
    pub termination_policy: TerminationPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            origin_policy: OriginPolicy::default(),
            termination_policy: TerminationPolicy::default(),
        }
    }
}

impl GridConfig {
    /// Default policies at `resolution` cells per axis.
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }
}

/// Result of one expanding-ring search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Cell of the query point
    pub center: GridCoordinate,
    /// Entities in the last window searched, in ascending index order
    pub candidates: Vec<EntityIndex>,
    /// Half-width of the last window searched
    pub half_window: i64,
    /// How many times the window was doubled
    pub expansions: u32,
}

/// Uniform grid over entities and query points, built once and read-only afterwards.
///
/// # Example
///
/// ```
/// use nearest_position::{Entity, EntityIndex, EntityStore, QueryPoint, SpatialGrid};
///
/// # fn main() -> Result<(), nearest_position::NearestError> {
/// let store = EntityStore::from_entities(vec![
///     Entity::new(1, "AAA111", 34.544909, -102.100843, 0),
///     Entity::new(2, "BBB222", 34.6, -102.0, 0),
/// ])?;
/// let queries = [QueryPoint::new(34.544909, -102.100843)];
///
/// let grid = SpatialGrid::builder().resolution(10).build(&store, &queries)?;
/// let candidates = grid.candidates_near(&queries[0]);
/// assert!(candidates.contains(&EntityIndex(0)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    geometry: GridGeometry,
    termination: TerminationPolicy,
    assignments: Vec<GridCoordinate>,
    cells: HashMap<GridCoordinate, Vec<EntityIndex>>,
}

impl SpatialGrid {
    pub fn builder() -> SpatialGridBuilder {
        SpatialGridBuilder::new()
    }

    /// Indexes every entity of `store`.
    ///
    /// Bounds cover the entities and `query_points` together, so every query point is
    /// addressable even when it lies outside the entities' own bounding box.
    pub fn build(
        store: &EntityStore,
        query_points: &[QueryPoint],
        config: &GridConfig,
    ) -> Result<Self, NearestError> {
        if store.is_empty() {
            return Err(NearestError::EmptyEntitySet);
        }
        if let Some((index, p)) = query_points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(NearestError::NonFiniteCoordinate {
                index,
                latitude: p.latitude,
                longitude: p.longitude,
            });
        }

        let bounds = GridBounds::from_coordinates(
            store
                .entities()
                .iter()
                .map(|e| (e.latitude(), e.longitude()))
                .chain(query_points.iter().map(|q| (q.latitude(), q.longitude()))),
        )
        .ok_or(NearestError::EmptyEntitySet)?;

        let geometry = GridGeometry::new(bounds, config.resolution, config.origin_policy)?;

        let mut assignments = Vec::with_capacity(store.len());
        let mut cells: HashMap<GridCoordinate, Vec<EntityIndex>> = HashMap::new();
        for (index, entity) in store.iter() {
            let cell = geometry.cell_of(entity);
            assignments.push(cell);
            cells.entry(cell).or_default().push(index);
        }

        debug!(
            "Indexed {} entities into {} cells (resolution {}, cell {:.6} x {:.6} deg)",
            assignments.len(),
            cells.len(),
            geometry.resolution(),
            geometry.cell_width(),
            geometry.cell_height()
        );

        Ok(Self {
            geometry,
            termination: config.termination_policy,
            assignments,
            cells,
        })
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn resolution(&self) -> usize {
        self.geometry.resolution()
    }

    pub fn termination_policy(&self) -> TerminationPolicy {
        self.termination
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of cells holding at least one entity.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_of<C: Coordinate>(&self, coord: &C) -> GridCoordinate {
        self.geometry.cell_of(coord)
    }

    /// Cell the entity was assigned to at build time.
    pub fn cell_of_entity(&self, index: EntityIndex) -> Option<GridCoordinate> {
        self.assignments.get(index.get()).copied()
    }

    /// Entities assigned to `cell`, in index order.
    pub fn entities_in_cell(&self, cell: GridCoordinate) -> &[EntityIndex] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entities near `point`, in index order. Empty when the search gave up or `point`
    /// is outside the searchable domain.
    pub fn candidates_near<C: Coordinate>(&self, point: &C) -> Vec<EntityIndex> {
        self.search(point)
            .map(|outcome| outcome.candidates)
            .unwrap_or_default()
    }

    /// Expanding-ring search around the cell of `point`.
    ///
    /// Starts with a half-window of 2 and keeps every entity whose cell lies strictly
    /// inside `(center - w, center + w)` on both axes. While nothing is found and the
    /// termination policy allows it, the half-window doubles.
    ///
    /// Any finite point whose cell lies within
    /// [`MAX_CELL_INDEX`](crate::core::grid::MAX_CELL_INDEX) of the origin can be searched,
    /// including points outside the indexed bounds. Returns `None` for a non-finite point
    /// or one further away than that.
    pub fn search<C: Coordinate>(&self, point: &C) -> Option<SearchOutcome> {
        let Some(center) = self.geometry.checked_cell_of(point) else {
            warn!(
                "Point ({}, {}) cannot be placed on the grid",
                point.latitude(),
                point.longitude()
            );
            return None;
        };
        if !self.geometry.bounds().contains(point) {
            warn!(
                "Point ({}, {}) lies outside the indexed bounds, searching from cell ({}, {})",
                point.latitude(),
                point.longitude(),
                center.cell_x,
                center.cell_y
            );
        }
        let resolution = self.geometry.resolution() as i64;
        let mut half_window = INITIAL_HALF_WINDOW;
        let mut expansions = 0;

        loop {
            let candidates = self.collect_window(center, half_window);

            if !candidates.is_empty() || self.termination.should_stop(center, half_window, resolution)
            {
                if candidates.is_empty() {
                    warn!(
                        "Search around cell ({}, {}) ended empty at half-window {}",
                        center.cell_x, center.cell_y, half_window
                    );
                }
                return Some(SearchOutcome {
                    center,
                    candidates,
                    half_window,
                    expansions,
                });
            }

            match half_window.checked_mul(2) {
                Some(next) => {
                    half_window = next;
                    expansions += 1;
                    debug!(
                        "Widening search around cell ({}, {}) to half-window {}",
                        center.cell_x, center.cell_y, half_window
                    );
                }
                None => {
                    warn!(
                        "Search around cell ({}, {}) exhausted the half-window range",
                        center.cell_x, center.cell_y
                    );
                    return Some(SearchOutcome {
                        center,
                        candidates,
                        half_window,
                        expansions,
                    });
                }
            }
        }
    }

    /// Entities strictly inside the window, sorted by index.
    ///
    /// Probes window cells while the window is smaller than the set of occupied cells,
    /// otherwise filters the occupied cells.
    fn collect_window(&self, center: GridCoordinate, half_window: i64) -> Vec<EntityIndex> {
        let side = 2 * half_window as u128 - 1;
        let mut found = if side * side <= self.cells.len() as u128 {
            self.probe_window(center, half_window)
        } else {
            self.scan_window(center, half_window)
        };
        found.sort_unstable();
        found
    }

    fn probe_window(&self, center: GridCoordinate, half_window: i64) -> Vec<EntityIndex> {
        let reach = half_window - 1;
        let mut found = Vec::new();
        for x in center.cell_x.saturating_sub(reach)..=center.cell_x.saturating_add(reach) {
            for y in center.cell_y.saturating_sub(reach)..=center.cell_y.saturating_add(reach) {
                if let Some(members) = self.cells.get(&GridCoordinate::new(x, y)) {
                    found.extend_from_slice(members);
                }
            }
        }
        found
    }

    fn scan_window(&self, center: GridCoordinate, half_window: i64) -> Vec<EntityIndex> {
        let inside = |cell: &GridCoordinate| {
            cell.cell_x > center.cell_x.saturating_sub(half_window)
                && cell.cell_x < center.cell_x.saturating_add(half_window)
                && cell.cell_y > center.cell_y.saturating_sub(half_window)
                && cell.cell_y < center.cell_y.saturating_add(half_window)
        };
        self.cells
            .iter()
            .filter(|(cell, _)| inside(cell))
            .flat_map(|(_, members)| members.iter().copied())
            .collect()
    }
}

/// Builder for [`SpatialGrid`]; unset options fall back to [`GridConfig::default`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialGridBuilder {
    config: GridConfig,
}

impl SpatialGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution(mut self, resolution: usize) -> Self {
        self.config.resolution = resolution;
        self
    }

    pub fn origin_policy(mut self, policy: OriginPolicy) -> Self {
        self.config.origin_policy = policy;
        self
    }

    pub fn termination_policy(mut self, policy: TerminationPolicy) -> Self {
        self.config.termination_policy = policy;
        self
    }

    pub fn build(
        self,
        store: &EntityStore,
        query_points: &[QueryPoint],
    ) -> Result<SpatialGrid, NearestError> {
        SpatialGrid::build(store, query_points, &self.config)
    }
}
