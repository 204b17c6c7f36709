pub mod spatial_grid;

pub use spatial_grid::{
    GridConfig, SearchOutcome, SpatialGrid, SpatialGridBuilder, TerminationPolicy,
};
