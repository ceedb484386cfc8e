//! Spatial algorithms: geometry primitives, indexing, queries, and transforms.

pub mod analysis;
pub mod convert;
pub mod index;
pub mod knn;
pub mod query;
pub mod transform;
pub mod validation;

pub use analysis::{
    area, bbox, buffer, centroid, clip, clip_geometry, contains, covers, envelope, length,
    nearest, NearestResult,
};
pub use convert::{from_geo_geometry, to_geo_geometry, GeometryExt};
pub use index::SpatialIndex;
pub use knn::{knn, KnnParams};
pub use query::{
    filter_points_within, nearest_in_collection, tag_points_within, ContainmentMode, NearestMatch,
};
pub use transform::{reproject_feature, reproject_feature_collection, reproject_geometry};
pub use validation::{ensure_valid, validate_geometry, ValidationError, ValidationResult};
