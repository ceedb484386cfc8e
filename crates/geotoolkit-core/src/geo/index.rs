//! R-tree backed spatial index over a fixed geometry sequence.
//!
//! The index is a one-time bulk construction over a snapshot of geometries,
//! each entry keyed by its 0-based position in the input. It is immutable
//! after construction: any change to the underlying geometry set requires
//! building a new index. Once built it is read-only and freely shareable.

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use crate::geo::analysis::distance_between;
use crate::geo::convert::GeometryExt;
use crate::models::{FeatureCollection, Geometry};

/// Rounds of envelope doubling before a non-point nearest query falls back
/// to a full scan
const NEAREST_MAX_ROUNDS: u32 = 8;

/// Indexed geometry keyed by input position
#[derive(Debug, Clone, PartialEq)]
struct IndexedGeometry {
    position: usize,
    geometry: Geometry,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedGeometry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for IndexedGeometry {
    /// Squared distance from a point to the envelope: a lower bound of the
    /// true geometry distance, which is what the nearest-neighbor walk
    /// prunes with.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope.distance_2(point)
    }
}

/// Spatial index for pruning geometric queries via bounding boxes.
///
/// Candidate sets returned by [`SpatialIndex::range_query`] are supersets of
/// the true matches: bounding-box overlap does not imply geometry overlap,
/// so callers must always follow with an exact predicate.
pub struct SpatialIndex {
    tree: RTree<IndexedGeometry>,
}

impl SpatialIndex {
    /// Bulk-load an index over an ordered snapshot of geometries.
    ///
    /// Entries keep their input position as the query result key. Geometries
    /// without coordinates are skipped: they can never satisfy a geometric
    /// predicate, so leaving them out keeps every query answer exact.
    pub fn build(geometries: &[Geometry]) -> Self {
        let indexed: Vec<IndexedGeometry> = geometries
            .iter()
            .enumerate()
            .filter_map(|(position, geometry)| {
                geometry.bounding_box().map(|(minx, miny, maxx, maxy)| IndexedGeometry {
                    position,
                    geometry: geometry.clone(),
                    envelope: AABB::from_corners([minx, miny], [maxx, maxy]),
                })
            })
            .collect();

        tracing::debug!(entries = indexed.len(), total = geometries.len(), "built spatial index");
        Self { tree: RTree::bulk_load(indexed) }
    }

    /// Index the geometries of a feature collection, keyed by feature position
    pub fn from_collection(collection: &FeatureCollection) -> Self {
        let geometries: Vec<Geometry> =
            collection.iter().map(|f| f.geometry.clone()).collect();
        Self::build(&geometries)
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// True when nothing was indexed
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions of all entries whose bounding box intersects the query
    /// geometry's bounding box, in ascending position order.
    ///
    /// Never misses a true geometric intersection; may include entries that
    /// do not actually intersect. An empty or degenerate query yields an
    /// empty candidate set.
    pub fn range_query(&self, query: &Geometry) -> Vec<usize> {
        let Some((minx, miny, maxx, maxy)) = query.bounding_box() else {
            return Vec::new();
        };
        let envelope = AABB::from_corners([minx, miny], [maxx, maxy]);

        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Position and true distance of a globally nearest entry.
    ///
    /// Exact: the result always matches a brute-force scan (ties broken by
    /// lowest position). `None` only when the index or the query is empty.
    pub fn nearest(&self, query: &Geometry) -> Option<(usize, f64)> {
        if let Some(point) = query.as_point() {
            return self.nearest_to_point(point);
        }
        self.nearest_expanding(query)
    }

    /// Point fast path: walk entries ordered by envelope distance and stop
    /// once the envelope lower bound exceeds the best exact distance found.
    fn nearest_to_point(&self, point: [f64; 2]) -> Option<(usize, f64)> {
        let query = Geometry::point(point[0], point[1]);
        let mut best: Option<(usize, f64)> = None;

        for (entry, envelope_d2) in self.tree.nearest_neighbor_iter_with_distance_2(&point) {
            if let Some((_, best_dist)) = best {
                if envelope_d2 > best_dist * best_dist {
                    break;
                }
            }
            let dist = distance_between(&query, &entry.geometry);
            best = match best {
                Some((pos, d)) if d < dist || (d == dist && pos < entry.position) => {
                    Some((pos, d))
                }
                _ => Some((entry.position, dist)),
            };
        }
        best.filter(|(_, d)| d.is_finite())
    }

    /// General path: query a window inflated around the query bbox, doubling
    /// the inflation each round. An entry outside the window is farther than
    /// the inflation radius, so a best candidate within the radius is the
    /// global minimum. Falls back to a full scan when the round budget runs
    /// out without such a candidate.
    fn nearest_expanding(&self, query: &Geometry) -> Option<(usize, f64)> {
        if self.is_empty() {
            return None;
        }
        let (minx, miny, maxx, maxy) = query.bounding_box()?;

        let diagonal = ((maxx - minx).powi(2) + (maxy - miny).powi(2)).sqrt();
        let mut radius = (diagonal / 2.0).max(1.0);

        for _ in 0..NEAREST_MAX_ROUNDS {
            let window =
                AABB::from_corners([minx - radius, miny - radius], [maxx + radius, maxy + radius]);
            let best = self.best_among(self.tree.locate_in_envelope_intersecting(&window), query);
            if let Some((position, dist)) = best {
                if dist <= radius {
                    return Some((position, dist));
                }
            }
            radius *= 2.0;
        }

        tracing::debug!("nearest window budget exhausted, scanning all entries");
        self.best_among(self.tree.iter(), query)
    }

    fn best_among<'a>(
        &self,
        entries: impl Iterator<Item = &'a IndexedGeometry>,
        query: &Geometry,
    ) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for entry in entries {
            let dist = distance_between(query, &entry.geometry);
            if !dist.is_finite() {
                continue;
            }
            best = match best {
                Some((pos, d)) if d < dist || (d == dist && pos < entry.position) => {
                    Some((pos, d))
                }
                _ => Some((entry.position, dist)),
            };
        }
        best
    }
}
