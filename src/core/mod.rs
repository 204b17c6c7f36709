pub mod constants;
pub mod distance;
pub mod grid;

pub use constants::{DEFAULT_QUERY_POINTS, DEFAULT_RESOLUTION, INITIAL_HALF_WINDOW};
pub use distance::{real_between, real_distance, relative_between, relative_distance};
pub use grid::{Axis, GridBounds, GridCoordinate, GridGeometry, MAX_CELL_INDEX, OriginPolicy};
