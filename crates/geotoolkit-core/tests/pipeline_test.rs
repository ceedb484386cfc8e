//! End-to-end workflow: load, reproject, buffer, clip, measure, sample.

use geotoolkit_core::formats::{read_feature_collection, write_feature_collection};
use geotoolkit_core::geo::{
    area, buffer, clip, contains, nearest, reproject_feature_collection,
};
use geotoolkit_core::models::{Crs, Feature, FeatureCollection, Geometry};
use geotoolkit_core::raster::{sample_at_points, GridRaster};

fn sample_collection() -> FeatureCollection {
    FeatureCollection::new(vec![
        Feature::new(Geometry::polygon(vec![vec![
            [115.26, -8.51],
            [115.28, -8.51],
            [115.28, -8.49],
            [115.26, -8.49],
            [115.26, -8.51],
        ]]))
        .property("name", "parcel"),
        Feature::new(Geometry::point(115.27, -8.50)).property("name", "site"),
        Feature::new(Geometry::point(115.50, -8.50)).property("name", "far away"),
    ])
}

fn first_geometry<'a>(fc: &'a FeatureCollection, name: &str) -> &'a Geometry {
    &fc.iter().find(|f| f.properties["name"] == name).unwrap().geometry
}

#[test]
fn test_buffer_clip_nearest_workflow() {
    let fc = sample_collection();
    let fc_m =
        reproject_feature_collection(&fc, &Crs::wgs84(), &Crs::web_mercator()).unwrap();

    let polygon = first_geometry(&fc_m, "parcel").clone();
    let site = first_geometry(&fc_m, "site").clone();

    // Buffer the parcel by 500 meters
    let buffered = buffer(&polygon, 500.0).unwrap();
    assert!(area(&buffered) > area(&polygon));
    assert!(contains(&buffered, &site));

    // Clip the collection to the buffer: parcel and site survive, the far
    // point is dropped
    let clipped = clip(&fc_m, &buffered).unwrap();
    let names: Vec<&str> =
        clipped.iter().map(|f| f.properties["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["parcel", "site"]);

    // The site is inside the parcel, so its nearest distance is zero; the
    // far point is a couple of dozen kilometers out
    let inside = nearest(&site, &polygon).unwrap();
    assert_eq!(inside.distance, 0.0);

    let far = first_geometry(&fc_m, "far away");
    let outside = nearest(far, &polygon).unwrap();
    assert!(outside.distance > 10_000.0);
}

#[test]
fn test_geojson_roundtrip_through_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("sample.geojson");

    let fc = sample_collection();
    write_feature_collection(&path, &fc).unwrap();
    let back = read_feature_collection(&path).unwrap();

    assert_eq!(back.collection, fc);
    assert_eq!(back.crs, Crs::wgs84());
}

#[test]
fn test_reprojection_roundtrip_is_idempotent() {
    let fc = sample_collection();
    let there = reproject_feature_collection(&fc, &Crs::wgs84(), &Crs::web_mercator()).unwrap();
    let back =
        reproject_feature_collection(&there, &Crs::web_mercator(), &Crs::wgs84()).unwrap();

    for (original, round_tripped) in fc.iter().zip(back.iter()) {
        match (&original.geometry, &round_tripped.geometry) {
            (Geometry::Point { coordinates: a }, Geometry::Point { coordinates: b }) => {
                assert!((a[0] - b[0]).abs() < 1e-5);
                assert!((a[1] - b[1]).abs() < 1e-5);
            }
            (Geometry::Polygon { coordinates: a }, Geometry::Polygon { coordinates: b }) => {
                for (ring_a, ring_b) in a.iter().zip(b.iter()) {
                    for (ca, cb) in ring_a.iter().zip(ring_b.iter()) {
                        assert!((ca[0] - cb[0]).abs() < 1e-5);
                        assert!((ca[1] - cb[1]).abs() < 1e-5);
                    }
                }
            }
            other => panic!("geometry kind changed in round trip: {:?}", other),
        }
    }
}

#[test]
fn test_raster_join_on_query_results() {
    // Sample a synthetic surface at clipped point locations, in one metric CRS
    let fc = sample_collection();
    let fc_m =
        reproject_feature_collection(&fc, &Crs::wgs84(), &Crs::web_mercator()).unwrap();

    let polygon = first_geometry(&fc_m, "parcel").clone();
    let buffered = buffer(&polygon, 500.0).unwrap();
    let clipped = clip(&fc_m, &buffered).unwrap();

    let bounds = geotoolkit_core::geo::bbox(&buffered).unwrap();
    let raster = GridRaster::synthetic_gradient(bounds, 10.0).unwrap();
    let sampled = sample_at_points(&clipped, &raster);

    let site = sampled.iter().find(|f| f.properties["name"] == "site").unwrap();
    assert!(site.properties["raster_value"].is_number());

    // polygon features pass through without a sample
    let parcel = sampled.iter().find(|f| f.properties["name"] == "parcel").unwrap();
    assert!(!parcel.properties.contains_key("raster_value"));
}
