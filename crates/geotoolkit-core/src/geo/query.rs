//! Containment tagging/filtering and collection-level nearest search.
//!
//! Every operation here has a brute-force path and an index-accelerated
//! path producing identical results: the index only prunes which exact
//! predicates get evaluated, it never changes the answer.

use std::collections::HashSet;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{GeotoolkitError, Result};
use crate::geo::analysis::{contains, covers, distance_between};
use crate::geo::index::SpatialIndex;
use crate::geo::validation::ensure_valid;
use crate::models::{FeatureCollection, Geometry};

/// Property name used internally by [`filter_points_within`]
const FILTER_TAG: &str = "__within";

/// Containment semantics for point-in-polygon tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainmentMode {
    /// Strict: a point exactly on the polygon boundary is outside
    #[default]
    Contains,
    /// Inclusive: a point exactly on the polygon boundary is inside
    Covers,
}

impl ContainmentMode {
    /// Evaluate the predicate for a container/content pair
    pub fn evaluate(&self, container: &Geometry, content: &Geometry) -> bool {
        match self {
            ContainmentMode::Contains => contains(container, content),
            ContainmentMode::Covers => covers(container, content),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainmentMode::Contains => "contains",
            ContainmentMode::Covers => "covers",
        }
    }
}

impl FromStr for ContainmentMode {
    type Err = GeotoolkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "contains" => Ok(ContainmentMode::Contains),
            "covers" => Ok(ContainmentMode::Covers),
            other => Err(GeotoolkitError::invalid_parameter(
                "mode",
                format!("'{}' is not a containment mode; use contains or covers", other),
            )),
        }
    }
}

impl std::fmt::Display for ContainmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn ensure_polygonal(operation: &str, geometry: &Geometry) -> Result<()> {
    if geometry.is_polygonal() {
        Ok(())
    } else {
        Err(GeotoolkitError::unsupported(operation, geometry.geometry_type().as_str()))
    }
}

/// Tag each Point feature with a boolean property recording whether the
/// polygon contains it.
///
/// Only Point features are kept in the output; their properties are copied
/// and the tag added, never mutated in place. With `use_index` an index is
/// built over the points and the exact predicate runs only on bounding-box
/// candidates; everything outside the polygon's bounding box is tagged
/// false, which is sound because a point outside the bounding box cannot be
/// inside the polygon. Both paths produce identical tags for both modes.
pub fn tag_points_within(
    points: &FeatureCollection,
    polygon: &Geometry,
    prop: &str,
    mode: ContainmentMode,
    use_index: bool,
) -> Result<FeatureCollection> {
    ensure_polygonal("tag_points_within", polygon)?;
    ensure_valid(polygon)?;

    let point_features = points.point_features();

    if !use_index {
        return Ok(point_features
            .iter()
            .map(|f| f.tagged(prop, mode.evaluate(polygon, &f.geometry)))
            .collect());
    }

    let geometries: Vec<Geometry> =
        point_features.iter().map(|f| f.geometry.clone()).collect();
    let index = SpatialIndex::build(&geometries);
    let candidates: HashSet<usize> = index.range_query(polygon).into_iter().collect();

    Ok(point_features
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let inside = candidates.contains(&i) && mode.evaluate(polygon, &f.geometry);
            f.tagged(prop, inside)
        })
        .collect())
}

/// Keep only the Point features the polygon contains.
///
/// Delegates to [`tag_points_within`] with an internal tag, then strips the
/// tag again: the output property set equals the input property set.
pub fn filter_points_within(
    points: &FeatureCollection,
    polygon: &Geometry,
    mode: ContainmentMode,
    use_index: bool,
) -> Result<FeatureCollection> {
    let tagged = tag_points_within(points, polygon, FILTER_TAG, mode, use_index)?;

    Ok(tagged
        .features
        .into_iter()
        .filter(|f| f.properties.get(FILTER_TAG) == Some(&Value::Bool(true)))
        .map(|mut f| {
            f.properties.remove(FILTER_TAG);
            f
        })
        .collect())
}

/// Nearest member of a collection to a query geometry
#[derive(Debug, Clone, PartialEq)]
pub struct NearestMatch {
    /// Position of the match in the input collection
    pub position: usize,
    /// True distance in CRS units
    pub distance: f64,
    pub geometry: Geometry,
}

/// Find the member of `collection` nearest to `query`.
///
/// The indexed path builds a [`SpatialIndex`] over the collection's
/// geometries and prunes candidates by envelope distance; the brute-force
/// path computes every pairwise distance. Both return the same match
/// (distance ties broken by lowest position). `Ok(None)` when the
/// collection is empty or no member has coordinates; never an error for
/// emptiness.
pub fn nearest_in_collection(
    query: &Geometry,
    collection: &FeatureCollection,
    use_index: bool,
) -> Result<Option<NearestMatch>> {
    if use_index {
        let index = SpatialIndex::from_collection(collection);
        return Ok(index.nearest(query).map(|(position, distance)| NearestMatch {
            position,
            distance,
            geometry: collection.features[position].geometry.clone(),
        }));
    }

    let mut best: Option<(usize, f64)> = None;
    for (position, feature) in collection.iter().enumerate() {
        let dist = distance_between(query, &feature.geometry);
        if !dist.is_finite() {
            continue;
        }
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((position, dist));
        }
    }
    Ok(best.map(|(position, distance)| NearestMatch {
        position,
        distance,
        geometry: collection.features[position].geometry.clone(),
    }))
}
