use crate::api::finder::ReportRow;
use crate::error::NearestError;
use crate::util::coord::Coordinate;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use std::path::Path;

/// One point feature per matched query, placed at the matched entity.
///
/// Properties carry the whole report row, so the query position and distance travel
/// with the feature. Query points without a match are left out.
pub fn results_to_geojson(rows: &[ReportRow]) -> Result<FeatureCollection, NearestError> {
    let mut features = Vec::with_capacity(rows.len());

    for row in rows {
        let (Some(lat), Some(lon)) = (row.latitude, row.longitude) else {
            continue;
        };

        let properties = match serde_json::to_value(row)
            .map_err(|e| NearestError::GeoJsonError(e.to_string()))?
        {
            serde_json::Value::Object(map) => map,
            _ => JsonObject::new(),
        };

        let point = (lat, lon).to_point();
        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(&point))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

pub fn write_results_geojson(
    rows: &[ReportRow],
    path: impl AsRef<Path>,
) -> Result<(), NearestError> {
    let collection = results_to_geojson(rows)?;
    std::fs::write(path, collection.to_string())
        .map_err(|e| NearestError::IoError(e.to_string()))?;
    Ok(())
}
