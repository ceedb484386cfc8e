//! Indexed and brute-force query paths must produce identical results.

use proptest::prelude::*;

use geotoolkit_core::geo::{
    knn, nearest_in_collection, tag_points_within, ContainmentMode, KnnParams,
};
use geotoolkit_core::models::{Feature, FeatureCollection, Geometry};

fn collection(coords: &[(f64, f64)]) -> FeatureCollection {
    coords
        .iter()
        .enumerate()
        .map(|(i, (x, y))| Feature::new(Geometry::point(*x, *y)).property("id", i as i64))
        .collect()
}

fn ids(fc: &FeatureCollection) -> Vec<i64> {
    fc.iter().map(|f| f.properties["id"].as_i64().unwrap()).collect()
}

fn coords_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 1..60)
}

proptest! {
    #[test]
    fn nearest_indexed_matches_brute_force(
        coords in coords_strategy(),
        qx in -1000.0f64..1000.0,
        qy in -1000.0f64..1000.0,
    ) {
        let fc = collection(&coords);
        let query = Geometry::point(qx, qy);

        let brute = nearest_in_collection(&query, &fc, false).unwrap().unwrap();
        let indexed = nearest_in_collection(&query, &fc, true).unwrap().unwrap();

        prop_assert!((brute.distance - indexed.distance).abs() < 1e-6);
        prop_assert_eq!(brute.position, indexed.position);
    }

    #[test]
    fn containment_tags_agree(coords in coords_strategy()) {
        let fc = collection(&coords);
        let polygon = Geometry::rectangle(-250.0, -250.0, 250.0, 250.0);

        for mode in [ContainmentMode::Contains, ContainmentMode::Covers] {
            let brute = tag_points_within(&fc, &polygon, "inside", mode, false).unwrap();
            let indexed = tag_points_within(&fc, &polygon, "inside", mode, true).unwrap();

            let brute_tags: Vec<bool> =
                brute.iter().map(|f| f.properties["inside"].as_bool().unwrap()).collect();
            let indexed_tags: Vec<bool> =
                indexed.iter().map(|f| f.properties["inside"].as_bool().unwrap()).collect();
            prop_assert_eq!(brute_tags, indexed_tags);
        }
    }

    #[test]
    fn knn_ranking_agrees_and_is_sorted(
        coords in coords_strategy(),
        k in 1usize..12,
        qx in -1000.0f64..1000.0,
        qy in -1000.0f64..1000.0,
    ) {
        let fc = collection(&coords);
        let target = Geometry::point(qx, qy);
        let params = KnnParams::default();

        let brute = knn(&fc, &target, k, false, &params).unwrap();
        let indexed = knn(&fc, &target, k, true, &params).unwrap();

        prop_assert_eq!(brute.len(), k.min(coords.len()));
        prop_assert_eq!(ids(&brute), ids(&indexed));

        let dists: Vec<f64> = indexed
            .iter()
            .map(|f| f.properties["distance_m"].as_f64().unwrap())
            .collect();
        prop_assert!(dists.windows(2).all(|w| w[0] <= w[1]));

        let ranks: Vec<u64> = indexed
            .iter()
            .map(|f| f.properties["knn_rank"].as_u64().unwrap())
            .collect();
        prop_assert_eq!(ranks, (1..=dists.len() as u64).collect::<Vec<_>>());
    }
}
