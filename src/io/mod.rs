pub mod csv;
pub mod decoder;
pub mod geojson;

pub use csv::{read_query_points_csv, write_results_csv};
pub use decoder::{
    RecordReader, decode_entities, encode_entities, encode_entity, read_entities, write_entities,
};
pub use geojson::{results_to_geojson, write_results_geojson};
