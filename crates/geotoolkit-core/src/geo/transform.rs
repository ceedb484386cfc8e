//! CRS reprojection.
//!
//! Distance and area operations elsewhere in this crate assume a metric
//! CRS; this module is how callers get there. A transformer is created per
//! call and applied to every coordinate of the input, producing newly
//! allocated output.

use proj::Proj;

use crate::error::{GeotoolkitError, Result};
use crate::models::{Crs, Feature, FeatureCollection, Geometry};

fn transformer(from: &Crs, to: &Crs) -> Result<Proj> {
    Proj::new_known_crs(&format!("EPSG:{}", from.epsg), &format!("EPSG:{}", to.epsg), None)
        .map_err(|e| GeotoolkitError::Projection {
            from: from.epsg,
            to: to.epsg,
            reason: e.to_string(),
        })
}

fn project_position(proj: &Proj, from: &Crs, to: &Crs, position: &[f64; 2]) -> Result<[f64; 2]> {
    proj.convert((position[0], position[1])).map(|(x, y)| [x, y]).map_err(|e| {
        GeotoolkitError::Projection { from: from.epsg, to: to.epsg, reason: e.to_string() }
    })
}

fn project_line(
    proj: &Proj,
    from: &Crs,
    to: &Crs,
    line: &[[f64; 2]],
) -> Result<Vec<[f64; 2]>> {
    line.iter().map(|c| project_position(proj, from, to, c)).collect()
}

/// Reproject a geometry from one CRS to another.
///
/// A no-op clone when source and target are the same CRS.
pub fn reproject_geometry(geometry: &Geometry, from: &Crs, to: &Crs) -> Result<Geometry> {
    if from.epsg == to.epsg {
        return Ok(geometry.clone());
    }
    let proj = transformer(from, to)?;
    apply(&proj, from, to, geometry)
}

fn apply(proj: &Proj, from: &Crs, to: &Crs, geometry: &Geometry) -> Result<Geometry> {
    Ok(match geometry {
        Geometry::Point { coordinates } => {
            Geometry::Point { coordinates: project_position(proj, from, to, coordinates)? }
        }
        Geometry::LineString { coordinates } => {
            Geometry::LineString { coordinates: project_line(proj, from, to, coordinates)? }
        }
        Geometry::Polygon { coordinates } => Geometry::Polygon {
            coordinates: coordinates
                .iter()
                .map(|ring| project_line(proj, from, to, ring))
                .collect::<Result<_>>()?,
        },
        Geometry::MultiPoint { coordinates } => {
            Geometry::MultiPoint { coordinates: project_line(proj, from, to, coordinates)? }
        }
        Geometry::MultiLineString { coordinates } => Geometry::MultiLineString {
            coordinates: coordinates
                .iter()
                .map(|line| project_line(proj, from, to, line))
                .collect::<Result<_>>()?,
        },
        Geometry::MultiPolygon { coordinates } => Geometry::MultiPolygon {
            coordinates: coordinates
                .iter()
                .map(|poly| {
                    poly.iter()
                        .map(|ring| project_line(proj, from, to, ring))
                        .collect::<Result<_>>()
                })
                .collect::<Result<_>>()?,
        },
    })
}

/// Reproject a feature, deep-copying its properties
pub fn reproject_feature(feature: &Feature, from: &Crs, to: &Crs) -> Result<Feature> {
    Ok(Feature {
        id: feature.id.clone(),
        properties: feature.properties.clone(),
        geometry: reproject_geometry(&feature.geometry, from, to)?,
    })
}

/// Reproject every feature of a collection.
///
/// One transformer is created and reused across the whole collection.
pub fn reproject_feature_collection(
    collection: &FeatureCollection,
    from: &Crs,
    to: &Crs,
) -> Result<FeatureCollection> {
    if from.epsg == to.epsg {
        return Ok(collection.clone());
    }
    let proj = transformer(from, to)?;
    collection
        .iter()
        .map(|feature| {
            Ok(Feature {
                id: feature.id.clone(),
                properties: feature.properties.clone(),
                geometry: apply(&proj, from, to, &feature.geometry)?,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(FeatureCollection::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_crs_is_identity() {
        let geom = Geometry::point(115.0, -8.5);
        let out = reproject_geometry(&geom, &Crs::wgs84(), &Crs::wgs84()).unwrap();
        assert_eq!(geom, out);
    }

    #[test]
    fn test_wgs84_to_web_mercator_origin() {
        let origin = Geometry::point(0.0, 0.0);
        let projected =
            reproject_geometry(&origin, &Crs::wgs84(), &Crs::web_mercator()).unwrap();
        let coords = projected.as_point().unwrap();
        assert!(coords[0].abs() < 1e-6);
        assert!(coords[1].abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip_preserves_coordinates() {
        let fc = FeatureCollection::new(vec![
            Feature::new(Geometry::point(115.2625, -8.5069)).property("name", "sample"),
            Feature::new(Geometry::rectangle(115.0, -9.0, 116.0, -8.0)),
        ]);

        let metric =
            reproject_feature_collection(&fc, &Crs::wgs84(), &Crs::web_mercator()).unwrap();
        let back =
            reproject_feature_collection(&metric, &Crs::web_mercator(), &Crs::wgs84()).unwrap();

        // compare coordinates, not object identity
        let p0 = fc.features[0].geometry.as_point().unwrap();
        let p1 = back.features[0].geometry.as_point().unwrap();
        assert!((p0[0] - p1[0]).abs() < 1e-5);
        assert!((p0[1] - p1[1]).abs() < 1e-5);
        assert_eq!(back.features[0].properties, fc.features[0].properties);
    }
}
