//! K-nearest-neighbor search over point collections.

use crate::error::{GeotoolkitError, Result};
use crate::geo::index::SpatialIndex;
use crate::models::{FeatureCollection, Geometry};

/// Tuning for the indexed candidate search.
///
/// The indexed path grows a search window around the target until it holds
/// at least k candidates. Both the starting size and the growth rate are
/// dataset-scale choices, so they are parameters rather than constants; the
/// round budget bounds the loop and is mandatory for termination.
#[derive(Debug, Clone, Copy)]
pub struct KnnParams {
    /// Half-width of the first search window, in CRS units
    pub initial_radius: f64,
    /// Window growth per round; must be greater than 1
    pub growth_factor: f64,
    /// Rounds before falling back to a full scan
    pub max_rounds: u32,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self { initial_radius: 50.0, growth_factor: 2.0, max_rounds: 8 }
    }
}

impl KnnParams {
    fn validate(&self) -> Result<()> {
        if !self.initial_radius.is_finite() || self.initial_radius <= 0.0 {
            return Err(GeotoolkitError::invalid_parameter(
                "initial_radius",
                "must be positive and finite",
            ));
        }
        if !self.growth_factor.is_finite() || self.growth_factor <= 1.0 {
            return Err(GeotoolkitError::invalid_parameter(
                "growth_factor",
                "must be greater than 1",
            ));
        }
        Ok(())
    }
}

fn point_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Return the k points of `points` closest to `target`, ascending by
/// distance.
///
/// Every result feature carries its distance (`distance_m`) and 1-based rank
/// (`knn_rank`); ties are broken by original input order. Fewer than k
/// points yields all of them, ranked. Only Point features participate.
///
/// The indexed path collects candidates from a growing window and is exact:
/// after enough candidates are found the window is widened once to the
/// provisional k-th distance, so no closer point outside the window can be
/// missed, and the ranked result equals the brute-force result.
pub fn knn(
    points: &FeatureCollection,
    target: &Geometry,
    k: usize,
    use_index: bool,
    params: &KnnParams,
) -> Result<FeatureCollection> {
    if k == 0 {
        return Err(GeotoolkitError::invalid_parameter("k", "must be at least 1"));
    }
    let Some(target_point) = target.as_point() else {
        return Err(GeotoolkitError::unsupported("knn", target.geometry_type().as_str()));
    };
    params.validate()?;

    let point_features = points.point_features();
    let coordinates: Vec<[f64; 2]> =
        point_features.iter().filter_map(|f| f.geometry.as_point()).collect();

    let candidates: Vec<usize> = if use_index {
        collect_candidates(&coordinates, target_point, k, params)
    } else {
        (0..coordinates.len()).collect()
    };

    let mut ranked: Vec<(f64, usize)> = candidates
        .into_iter()
        .map(|i| (point_distance(target_point, coordinates[i]), i))
        .collect();
    ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));
    ranked.truncate(k);

    Ok(ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (dist, i))| {
            point_features[i]
                .tagged("distance_m", dist)
                .tagged("knn_rank", (rank + 1) as u64)
        })
        .collect())
}

/// Expanding-window candidate selection.
///
/// A window of half-width r contains every point within Euclidean distance
/// r of the target, so once the provisional k-th distance fits inside the
/// final window the candidate set is complete. Exhausting the round budget
/// falls back to all points, which is still exact, just not pruned.
fn collect_candidates(
    coordinates: &[[f64; 2]],
    target: [f64; 2],
    k: usize,
    params: &KnnParams,
) -> Vec<usize> {
    let geometries: Vec<Geometry> =
        coordinates.iter().map(|c| Geometry::point(c[0], c[1])).collect();
    let index = SpatialIndex::build(&geometries);

    let mut radius = params.initial_radius;
    let mut candidates: Vec<usize> = Vec::new();
    let mut enough = false;

    for _ in 0..params.max_rounds {
        candidates = index.range_query(&window(target, radius));
        if candidates.len() >= k {
            enough = true;
            break;
        }
        radius *= params.growth_factor;
    }

    if !enough {
        tracing::debug!(
            rounds = params.max_rounds,
            "knn window budget exhausted, scanning all points"
        );
        return (0..coordinates.len()).collect();
    }

    // The k-th nearest candidate may sit beyond the window that produced
    // it; widen once to that distance so nothing closer is missed.
    let mut dists: Vec<f64> = candidates
        .iter()
        .map(|&i| point_distance(target, coordinates[i]))
        .collect();
    dists.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let kth = dists[k - 1];
    if kth > radius {
        candidates = index.range_query(&window(target, kth));
    }
    candidates
}

fn window(center: [f64; 2], radius: f64) -> Geometry {
    Geometry::rectangle(
        center[0] - radius,
        center[1] - radius,
        center[0] + radius,
        center[1] + radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Feature;

    fn points_fc(coords: &[(f64, f64)]) -> FeatureCollection {
        coords
            .iter()
            .enumerate()
            .map(|(i, (x, y))| {
                Feature::new(Geometry::point(*x, *y)).property("id", (i + 1) as i64)
            })
            .collect()
    }

    fn ids(fc: &FeatureCollection) -> Vec<i64> {
        fc.iter().map(|f| f.properties["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_knn_basic_ranking() {
        let fc = points_fc(&[(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)]);
        let target = Geometry::point(0.0, 0.0);

        let top2 = knn(&fc, &target, 2, true, &KnnParams::default()).unwrap();

        assert_eq!(top2.len(), 2);
        assert_eq!(ids(&top2), vec![1, 2]);
        assert_eq!(top2.features[0].properties["distance_m"].as_f64().unwrap(), 0.0);
        assert_eq!(top2.features[1].properties["distance_m"].as_f64().unwrap(), 1.0);
        assert_eq!(top2.features[0].properties["knn_rank"].as_u64().unwrap(), 1);
        assert_eq!(top2.features[1].properties["knn_rank"].as_u64().unwrap(), 2);
    }

    #[test]
    fn test_knn_rejects_zero_k() {
        let fc = points_fc(&[(0.0, 0.0)]);
        assert!(knn(&fc, &Geometry::point(0.0, 0.0), 0, false, &KnnParams::default()).is_err());
    }

    #[test]
    fn test_knn_rejects_non_point_target() {
        let fc = points_fc(&[(0.0, 0.0)]);
        let square = Geometry::rectangle(0.0, 0.0, 1.0, 1.0);
        assert!(knn(&fc, &square, 1, false, &KnnParams::default()).is_err());
    }

    #[test]
    fn test_knn_with_fewer_points_than_k() {
        let fc = points_fc(&[(0.0, 0.0), (3.0, 4.0)]);
        let result = knn(&fc, &Geometry::point(0.0, 0.0), 10, true, &KnnParams::default()).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_knn_on_empty_collection() {
        let fc = FeatureCollection::empty();
        let result = knn(&fc, &Geometry::point(0.0, 0.0), 3, true, &KnnParams::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_knn_tie_break_by_input_order() {
        // Two points at the same distance from the target.
        let fc = points_fc(&[(2.0, 0.0), (-2.0, 0.0), (1.0, 0.0)]);
        let result = knn(&fc, &Geometry::point(0.0, 0.0), 3, false, &KnnParams::default()).unwrap();
        assert_eq!(ids(&result), vec![3, 1, 2]);
    }

    #[test]
    fn test_indexed_and_brute_force_agree() {
        let coords: Vec<(f64, f64)> = (0..200)
            .map(|i| (((i * 37) % 500) as f64, ((i * 91) % 500) as f64))
            .collect();
        let fc = points_fc(&coords);
        let target = Geometry::point(250.0, 250.0);

        for k in [1, 5, 23, 200, 500] {
            let plain = knn(&fc, &target, k, false, &KnnParams::default()).unwrap();
            let indexed = knn(&fc, &target, k, true, &KnnParams::default()).unwrap();
            assert_eq!(ids(&plain), ids(&indexed), "k = {}", k);
        }
    }

    #[test]
    fn test_tiny_window_budget_still_exact() {
        let coords: Vec<(f64, f64)> = (0..50)
            .map(|i| ((i as f64) * 1000.0, 0.0))
            .collect();
        let fc = points_fc(&coords);
        let target = Geometry::point(49_000.0, 0.0);

        // Window never reaches the data; the fallback must still rank exactly.
        let params = KnnParams { initial_radius: 0.001, growth_factor: 1.5, max_rounds: 2 };
        let plain = knn(&fc, &target, 5, false, &params).unwrap();
        let indexed = knn(&fc, &target, 5, true, &params).unwrap();
        assert_eq!(ids(&plain), ids(&indexed));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let fc = points_fc(&[(0.0, 0.0)]);
        let target = Geometry::point(0.0, 0.0);

        let bad_radius = KnnParams { initial_radius: 0.0, ..KnnParams::default() };
        assert!(knn(&fc, &target, 1, true, &bad_radius).is_err());

        let bad_growth = KnnParams { growth_factor: 1.0, ..KnnParams::default() };
        assert!(knn(&fc, &target, 1, true, &bad_growth).is_err());
    }
}
