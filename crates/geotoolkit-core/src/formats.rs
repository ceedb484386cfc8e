//! Exchange-format adapters.

pub mod geojson;

pub use geojson::{read_feature_collection, write_feature_collection, GeoJsonDataset};
