//! GeoJSON file reading and writing.

use std::fs;
use std::path::Path;

use crate::error::{GeotoolkitError, Result};
use crate::models::{Crs, Feature, FeatureCollection, Geometry};

/// A feature collection read from disk, with the CRS the file declared
/// (or WGS 84 when it declared none).
#[derive(Debug, Clone)]
pub struct GeoJsonDataset {
    pub collection: FeatureCollection,
    pub crs: Crs,
}

/// Read a GeoJSON file into a feature collection.
///
/// Accepts a FeatureCollection, a bare Feature, or a bare Geometry; the
/// latter two are wrapped into a single-feature collection. A `crs` foreign
/// member is honored when it names an EPSG code, otherwise WGS 84 is
/// assumed.
pub fn read_feature_collection<P: AsRef<Path>>(path: P) -> Result<GeoJsonDataset> {
    let content = fs::read_to_string(path.as_ref())?;

    let geojson: geojson::GeoJson = content.parse().map_err(|e| {
        GeotoolkitError::Serialization(format!("Failed to parse GeoJSON: {}", e))
    })?;

    match geojson {
        geojson::GeoJson::FeatureCollection(fc) => {
            let crs = fc
                .foreign_members
                .as_ref()
                .and_then(|fm| fm.get("crs"))
                .and_then(extract_epsg_from_crs)
                .map(Crs::from_epsg)
                .unwrap_or_default();

            let features = fc
                .features
                .iter()
                .enumerate()
                .map(|(idx, feature)| convert_feature(feature, idx))
                .collect::<Result<Vec<_>>>()?;

            Ok(GeoJsonDataset { collection: FeatureCollection::new(features), crs })
        }
        geojson::GeoJson::Feature(feature) => {
            let converted = convert_feature(&feature, 0)?;
            Ok(GeoJsonDataset {
                collection: FeatureCollection::new(vec![converted]),
                crs: Crs::default(),
            })
        }
        geojson::GeoJson::Geometry(geometry) => {
            let converted = convert_geometry(&geometry)?;
            Ok(GeoJsonDataset {
                collection: FeatureCollection::new(vec![Feature::new(converted)]),
                crs: Crs::default(),
            })
        }
    }
}

/// Write a feature collection to a GeoJSON file
pub fn write_feature_collection<P: AsRef<Path>>(
    path: P,
    collection: &FeatureCollection,
) -> Result<()> {
    let features = collection
        .iter()
        .map(|feature| {
            let geometry: geojson::Geometry =
                serde_json::from_value(feature.geometry.to_geojson()).map_err(|e| {
                    GeotoolkitError::Serialization(format!("Invalid geometry: {}", e))
                })?;
            Ok(geojson::Feature {
                bbox: None,
                geometry: Some(geometry),
                id: feature.id.clone().map(geojson::feature::Id::String),
                properties: Some(feature.properties.clone()),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let fc = geojson::FeatureCollection { bbox: None, features, foreign_members: None };

    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path.as_ref(), geojson::GeoJson::FeatureCollection(fc).to_string())?;
    Ok(())
}

fn convert_geometry(geometry: &geojson::Geometry) -> Result<Geometry> {
    let value = serde_json::to_value(geometry)
        .map_err(|e| GeotoolkitError::Serialization(e.to_string()))?;
    Geometry::from_geojson(&value).ok_or_else(|| {
        GeotoolkitError::invalid_geometry(format!(
            "unsupported GeoJSON geometry: {}",
            geometry.value.type_name()
        ))
    })
}

fn convert_feature(feature: &geojson::Feature, idx: usize) -> Result<Feature> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| {
            GeotoolkitError::invalid_geometry(format!("feature {} has no geometry", idx))
        })
        .and_then(convert_geometry)?;

    let id = feature.id.as_ref().map(|id| match id {
        geojson::feature::Id::String(s) => s.clone(),
        geojson::feature::Id::Number(n) => n.to_string(),
    });

    Ok(Feature { id, properties: feature.properties.clone().unwrap_or_default(), geometry })
}

/// Extract an EPSG code from a GeoJSON `crs` member.
///
/// Handles the `EPSG:4326` and `urn:ogc:def:crs:EPSG::4326` spellings.
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    let name = crs.get("properties")?.get("name")?.as_str()?;
    name.rsplit(':').find(|part| !part.is_empty())?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_feature_collection() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("sample.geojson");

        let content = r#"{
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::32632"}},
            "features": [
                {
                    "type": "Feature",
                    "id": "f1",
                    "geometry": {"type": "Point", "coordinates": [1.5, 2.5]},
                    "properties": {"name": "sample point"}
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
                    },
                    "properties": {}
                }
            ]
        }"#;
        fs::write(&file_path, content).unwrap();

        let dataset = read_feature_collection(&file_path).unwrap();

        assert_eq!(dataset.crs.epsg, 32632);
        assert_eq!(dataset.collection.len(), 2);
        assert_eq!(dataset.collection.features[0].id.as_deref(), Some("f1"));
        assert_eq!(
            dataset.collection.features[0].geometry,
            Geometry::point(1.5, 2.5)
        );
        assert_eq!(
            dataset.collection.features[0].properties["name"],
            "sample point"
        );
    }

    #[test]
    fn test_read_bare_geometry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("geom.geojson");
        fs::write(&file_path, r#"{"type": "Point", "coordinates": [3.0, 4.0]}"#).unwrap();

        let dataset = read_feature_collection(&file_path).unwrap();
        assert_eq!(dataset.crs, Crs::wgs84());
        assert_eq!(dataset.collection.len(), 1);
        assert_eq!(dataset.collection.features[0].geometry, Geometry::point(3.0, 4.0));
    }

    #[test]
    fn test_read_invalid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("bad.geojson");
        fs::write(&file_path, "not valid json").unwrap();

        assert!(read_feature_collection(&file_path).is_err());
    }

    #[test]
    fn test_roundtrip_preserves_features() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("out/roundtrip.geojson");

        let fc = FeatureCollection::new(vec![
            Feature::new(Geometry::point(115.2625, -8.5069))
                .id("p1")
                .property("name", "sample"),
            Feature::new(Geometry::rectangle(0.0, 0.0, 10.0, 10.0)).property("kind", "square"),
        ]);

        write_feature_collection(&file_path, &fc).unwrap();
        let back = read_feature_collection(&file_path).unwrap();

        assert_eq!(back.collection, fc);
    }

    #[test]
    fn test_extract_epsg_variants() {
        let urn: serde_json::Value = serde_json::json!({
            "type": "name",
            "properties": {"name": "urn:ogc:def:crs:EPSG::32632"}
        });
        assert_eq!(extract_epsg_from_crs(&urn), Some(32632));

        let plain: serde_json::Value = serde_json::json!({
            "type": "name",
            "properties": {"name": "EPSG:4326"}
        });
        assert_eq!(extract_epsg_from_crs(&plain), Some(4326));

        let junk: serde_json::Value = serde_json::json!({"type": "name", "properties": {}});
        assert_eq!(extract_epsg_from_crs(&junk), None);
    }
}
