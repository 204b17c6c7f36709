use crate::api::finder::ReportRow;
use crate::api::query::QueryPoint;
use crate::error::NearestError;
use std::fs::File;
use std::path::Path;

/// Writes one row per query point; unmatched points leave the entity columns empty.
pub fn write_results_csv(rows: &[ReportRow], path: impl AsRef<Path>) -> Result<(), NearestError> {
    let file = File::create(path).map_err(|e| NearestError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(file);

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| NearestError::CsvError(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| NearestError::CsvError(e.to_string()))?;
    Ok(())
}

/// Reads query points from a CSV file with `latitude` and `longitude` columns.
///
/// Other columns are ignored. Row order is kept.
pub fn read_query_points_csv(path: impl AsRef<Path>) -> Result<Vec<QueryPoint>, NearestError> {
    let file = File::open(path).map_err(|e| NearestError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    reader
        .deserialize()
        .map(|record| record.map_err(|e| NearestError::CsvError(e.to_string())))
        .collect()
}
