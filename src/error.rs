use crate::core::grid::Axis;

/// Error type for nearest-position operations.
#[derive(Debug, PartialEq)]
pub enum NearestError {
    /// A grid was requested over an empty entity set.
    EmptyEntitySet,
    /// No query points were supplied.
    EmptyQueryPoints,
    /// The grid resolution must be at least one cell per axis.
    InvalidResolution(usize),
    /// The bounding box collapses to a zero (or non-finite) cell extent on this axis.
    DegenerateBounds(Axis),
    /// An entity or query point carries a NaN or infinite coordinate.
    NonFiniteCoordinate {
        index: usize,
        latitude: f32,
        longitude: f32,
    },
    /// The requested query point does not exist.
    QueryIndexOutOfRange(usize),
    /// A record ended before the named field could be read.
    TruncatedRecord { offset: usize, field: &'static str },
    /// A label ran to the end of the buffer without a NUL terminator.
    UnterminatedLabel { offset: usize },
    /// A label cannot be encoded because it contains a NUL byte.
    LabelContainsNul { id: i32 },
    /// File I/O error.
    IoError(String),
    /// CSV writing error.
    CsvError(String),
    /// GeoJSON serialization error.
    GeoJsonError(String),
}

impl std::fmt::Display for NearestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NearestError::EmptyEntitySet => write!(f, "Entity set is empty"),
            NearestError::EmptyQueryPoints => write!(f, "No query points supplied"),
            NearestError::InvalidResolution(r) => write!(f, "Invalid grid resolution: {}", r),
            NearestError::DegenerateBounds(axis) => {
                write!(f, "Degenerate bounds: zero cell extent on the {} axis", axis)
            }
            NearestError::NonFiniteCoordinate {
                index,
                latitude,
                longitude,
            } => write!(
                f,
                "Non-finite coordinate at index {}: ({}, {})",
                index, latitude, longitude
            ),
            NearestError::QueryIndexOutOfRange(i) => {
                write!(f, "Query point index out of range: {}", i)
            }
            NearestError::TruncatedRecord { offset, field } => {
                write!(f, "Truncated record at offset {} while reading {}", offset, field)
            }
            NearestError::UnterminatedLabel { offset } => {
                write!(f, "Unterminated label starting at offset {}", offset)
            }
            NearestError::LabelContainsNul { id } => {
                write!(f, "Label of entity {} contains a NUL byte", id)
            }
            NearestError::IoError(msg) => write!(f, "IO error: {}", msg),
            NearestError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            NearestError::GeoJsonError(msg) => write!(f, "GeoJSON error: {}", msg),
        }
    }
}

impl std::error::Error for NearestError {}

impl From<std::io::Error> for NearestError {
    fn from(e: std::io::Error) -> Self {
        NearestError::IoError(e.to_string())
    }
}
