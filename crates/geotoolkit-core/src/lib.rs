//! Geotoolkit Core - geometry model, spatial index, and query engine
//!
//! This crate contains the geometry representation, the R-tree backed spatial
//! index, the query algorithms built on it (nearest, containment tagging,
//! k-nearest-neighbor), CRS reprojection, GeoJSON I/O, and raster sampling.
//!
//! Distance and area results are expressed in the units of the input
//! coordinate system: callers must reproject into a metric CRS (for example
//! EPSG:3857 or a UTM zone) before any distance-based operation. This is a
//! documented precondition, not something the library enforces.

pub mod config;
pub mod error;
pub mod formats;
pub mod geo;
pub mod models;
pub mod raster;

pub use error::{GeotoolkitError, Result};
pub use models::{Crs, Feature, FeatureCollection, Geometry, GeometryType};
