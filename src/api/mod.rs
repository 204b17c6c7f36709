pub mod entity;
pub mod finder;
pub mod query;

pub use entity::{Entity, EntityIndex, EntityStore};
pub use finder::{NearestFinder, NearestMatch, QueryResult, ReportRow, select_nearest};
pub use query::QueryPoint;
