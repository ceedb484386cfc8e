//! Canonical data model: geometries, features, and feature collections.

pub mod feature;
pub mod geometry;

pub use feature::{Feature, FeatureCollection};
pub use geometry::{Crs, Geometry, GeometryType};
