//! Geometric operations: measures, predicates, buffering, clipping, and
//! nearest point pairs.
//!
//! Distance and area based operations require a metric CRS (e.g. EPSG:3857
//! or UTM); results in a geographic CRS are angular and meaningless. The
//! functions here do not validate units.

use geo::algorithm::bool_ops::BooleanOps;
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::line_measures::LengthMeasurable;
use geo::{Area, Euclidean, Intersects, Relate};

use crate::error::{GeotoolkitError, Result};
use crate::geo::convert::{to_geo_geometry, GeometryExt};
use crate::geo::validation::ensure_valid;
use crate::models::{Feature, FeatureCollection, Geometry};

/// Vertices per full circle when approximating round buffer joins
const CIRCLE_SEGMENTS: usize = 32;

/// Unsigned area of a geometry (zero for points and lines)
pub fn area(geometry: &Geometry) -> f64 {
    to_geo_geometry(geometry).unsigned_area()
}

/// Length of a line geometry, or perimeter of a polygonal one
pub fn length(geometry: &Geometry) -> f64 {
    fn ring_length(ring: &[[f64; 2]]) -> f64 {
        let ls = geo::LineString::new(
            ring.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect(),
        );
        ls.length(&Euclidean)
    }

    match geometry {
        Geometry::Point { .. } | Geometry::MultiPoint { .. } => 0.0,
        Geometry::LineString { coordinates } => ring_length(coordinates),
        Geometry::MultiLineString { coordinates } => coordinates.iter().map(|l| ring_length(l)).sum(),
        Geometry::Polygon { coordinates } => coordinates.iter().map(|r| ring_length(r)).sum(),
        Geometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .flat_map(|poly| poly.iter())
            .map(|r| ring_length(r))
            .sum(),
    }
}

/// Centroid of a geometry, if defined
pub fn centroid(geometry: &Geometry) -> Option<Geometry> {
    geometry.centroid_coords().map(|c| Geometry::point(c[0], c[1]))
}

/// Axis-aligned bounding box `(minx, miny, maxx, maxy)`
pub fn bbox(geometry: &Geometry) -> Option<(f64, f64, f64, f64)> {
    geometry.bounding_box()
}

/// Minimum bounding rectangle as a closed Polygon
pub fn envelope(geometry: &Geometry) -> Option<Geometry> {
    bbox(geometry).map(|(minx, miny, maxx, maxy)| Geometry::rectangle(minx, miny, maxx, maxy))
}

/// Strict containment: boundary points of `container` are outside
pub fn contains(container: &Geometry, content: &Geometry) -> bool {
    use geo::Contains;
    to_geo_geometry(container).contains(&to_geo_geometry(content))
}

/// Inclusive containment: boundary points of `container` are inside
pub fn covers(container: &Geometry, content: &Geometry) -> bool {
    to_geo_geometry(container).relate(&to_geo_geometry(content)).is_covers()
}

/// Minimum distance between two geometries with one witnessing point pair
#[derive(Debug, Clone, PartialEq)]
pub struct NearestResult {
    /// Distance in CRS units; 0 iff the geometries intersect
    pub distance: f64,
    pub point_on_a: Geometry,
    pub point_on_b: Geometry,
}

/// Compute the minimum Euclidean distance between two geometries and a point
/// pair achieving it.
///
/// The pair is not unique when the geometries are tangent or overlapping;
/// any valid minimal pair is returned. Both inputs must carry coordinates.
pub fn nearest(a: &Geometry, b: &Geometry) -> Result<NearestResult> {
    if a.is_empty() || b.is_empty() {
        return Err(GeotoolkitError::invalid_geometry(
            "nearest requires non-empty geometries",
        ));
    }

    let geo_a = to_geo_geometry(a);
    let geo_b = to_geo_geometry(b);

    if geo_a.intersects(&geo_b) {
        let witness = shared_point(a, b, &geo_a, &geo_b);
        return Ok(NearestResult {
            distance: 0.0,
            point_on_a: Geometry::point(witness[0], witness[1]),
            point_on_b: Geometry::point(witness[0], witness[1]),
        });
    }

    let (d2, pa, pb) = min_element_distance2(a, b);
    Ok(NearestResult {
        distance: d2.sqrt(),
        point_on_a: Geometry::point(pa[0], pa[1]),
        point_on_b: Geometry::point(pb[0], pb[1]),
    })
}

/// Minimum distance only, with infinity for empty inputs.
///
/// Used by the index and query layers, where an empty geometry must prune
/// to "no result" rather than fail.
pub(crate) fn distance_between(a: &Geometry, b: &Geometry) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    if to_geo_geometry(a).intersects(&to_geo_geometry(b)) {
        return 0.0;
    }
    min_element_distance2(a, b).0.sqrt()
}

/// A point both geometries share, for the intersecting case.
///
/// Checked in order: a vertex of one covered by the other, then a proper
/// edge crossing. Non-degenerate intersecting inputs always hit one of the
/// two; the final fallback only fires for pathological inputs.
fn shared_point(
    a: &Geometry,
    b: &Geometry,
    geo_a: &geo::Geometry,
    geo_b: &geo::Geometry,
) -> [f64; 2] {
    for v in vertices(b) {
        if geo_a.relate(&geo::Point::new(v[0], v[1])).is_covers() {
            return v;
        }
    }
    for v in vertices(a) {
        if geo_b.relate(&geo::Point::new(v[0], v[1])).is_covers() {
            return v;
        }
    }
    for sa in segments(a) {
        let la = geo::Line::new(
            geo::Coord { x: sa[0][0], y: sa[0][1] },
            geo::Coord { x: sa[1][0], y: sa[1][1] },
        );
        for sb in segments(b) {
            let lb = geo::Line::new(
                geo::Coord { x: sb[0][0], y: sb[0][1] },
                geo::Coord { x: sb[1][0], y: sb[1][1] },
            );
            match line_intersection(la, lb) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    return [intersection.x, intersection.y];
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    return [intersection.start.x, intersection.start.y];
                }
                None => {}
            }
        }
    }
    vertices(a).next().unwrap_or([0.0, 0.0])
}

/// All vertices of a geometry, in coordinate order
fn vertices(geometry: &Geometry) -> Box<dyn Iterator<Item = [f64; 2]> + '_> {
    match geometry {
        Geometry::Point { coordinates } => Box::new(std::iter::once(*coordinates)),
        Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
            Box::new(coordinates.iter().copied())
        }
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
            Box::new(coordinates.iter().flat_map(|r| r.iter().copied()))
        }
        Geometry::MultiPolygon { coordinates } => Box::new(
            coordinates
                .iter()
                .flat_map(|poly| poly.iter())
                .flat_map(|r| r.iter().copied()),
        ),
    }
}

/// All boundary elements as segments; isolated points degenerate to
/// zero-length segments.
fn segments(geometry: &Geometry) -> Vec<[[f64; 2]; 2]> {
    fn line_segments(line: &[[f64; 2]], out: &mut Vec<[[f64; 2]; 2]>) {
        if line.len() == 1 {
            out.push([line[0], line[0]]);
        }
        for pair in line.windows(2) {
            out.push([pair[0], pair[1]]);
        }
    }

    let mut out = Vec::new();
    match geometry {
        Geometry::Point { coordinates } => out.push([*coordinates, *coordinates]),
        Geometry::MultiPoint { coordinates } => {
            out.extend(coordinates.iter().map(|c| [*c, *c]));
        }
        Geometry::LineString { coordinates } => line_segments(coordinates, &mut out),
        Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
            for line in coordinates {
                line_segments(line, &mut out);
            }
        }
        Geometry::MultiPolygon { coordinates } => {
            for poly in coordinates {
                for ring in poly {
                    line_segments(ring, &mut out);
                }
            }
        }
    }
    out
}

fn d2(p: [f64; 2], q: [f64; 2]) -> f64 {
    let dx = p[0] - q[0];
    let dy = p[1] - q[1];
    dx * dx + dy * dy
}

/// Closest point to `p` on segment `[a, b]`; handles zero-length segments
fn closest_point_on_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    let abx = b[0] - a[0];
    let aby = b[1] - a[1];
    let len2 = abx * abx + aby * aby;
    if len2 == 0.0 {
        return a;
    }
    let t = (((p[0] - a[0]) * abx + (p[1] - a[1]) * aby) / len2).clamp(0.0, 1.0);
    [a[0] + t * abx, a[1] + t * aby]
}

/// Minimum squared distance between the boundary elements of two disjoint
/// geometries, with the achieving point pair.
///
/// For non-intersecting segments the minimum always involves an endpoint of
/// one segment, so projecting each endpoint onto the opposite segment covers
/// every case.
fn min_element_distance2(a: &Geometry, b: &Geometry) -> (f64, [f64; 2], [f64; 2]) {
    let segs_a = segments(a);
    let segs_b = segments(b);

    let mut best = (f64::INFINITY, [0.0, 0.0], [0.0, 0.0]);
    for sa in &segs_a {
        for sb in &segs_b {
            for &(pa, pb) in &[
                (sa[0], closest_point_on_segment(sa[0], sb[0], sb[1])),
                (sa[1], closest_point_on_segment(sa[1], sb[0], sb[1])),
                (closest_point_on_segment(sb[0], sa[0], sa[1]), sb[0]),
                (closest_point_on_segment(sb[1], sa[0], sa[1]), sb[1]),
            ] {
                let dist2 = d2(pa, pb);
                if dist2 < best.0 {
                    best = (dist2, pa, pb);
                }
            }
        }
    }
    best
}

/// Dilate a geometry by `dist` with round joins.
///
/// The result is built from per-segment quads and per-vertex circle fans
/// unioned together (and with the input itself for polygonal inputs), an
/// approximation of the true offset curve with `CIRCLE_SEGMENTS` vertices
/// per full circle. Only positive distances are supported.
pub fn buffer(geometry: &Geometry, dist: f64) -> Result<Geometry> {
    if !dist.is_finite() || dist <= 0.0 {
        return Err(GeotoolkitError::invalid_parameter(
            "dist",
            "buffer distance must be positive and finite",
        ));
    }
    if geometry.is_empty() {
        return Err(GeotoolkitError::invalid_geometry("cannot buffer an empty geometry"));
    }
    ensure_valid(geometry)?;

    let mut parts: Vec<geo::Polygon> = Vec::new();

    for v in vertices(geometry) {
        parts.push(circle(v, dist));
    }
    for seg in segments(geometry) {
        if let Some(quad) = segment_quad(seg[0], seg[1], dist) {
            parts.push(quad);
        }
    }
    match to_geo_geometry(geometry) {
        geo::Geometry::Polygon(p) => parts.push(p),
        geo::Geometry::MultiPolygon(mp) => parts.extend(mp.0),
        _ => {}
    }

    let unioned = geo::unary_union(parts.iter());
    Ok(multi_polygon_to_geometry(unioned))
}

fn circle(center: [f64; 2], radius: f64) -> geo::Polygon {
    let mut ring: Vec<geo::Coord> = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (CIRCLE_SEGMENTS as f64);
            geo::Coord {
                x: center[0] + radius * theta.cos(),
                y: center[1] + radius * theta.sin(),
            }
        })
        .collect();
    ring.push(ring[0]);
    geo::Polygon::new(geo::LineString::new(ring), vec![])
}

/// Rectangle covering a segment inflated sideways by `radius`; None for a
/// zero-length segment (its vertex circle already covers it)
fn segment_quad(p: [f64; 2], q: [f64; 2], radius: f64) -> Option<geo::Polygon> {
    let dx = q[0] - p[0];
    let dy = q[1] - p[1];
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }
    let nx = -dy / len * radius;
    let ny = dx / len * radius;
    let ring = vec![
        geo::Coord { x: p[0] + nx, y: p[1] + ny },
        geo::Coord { x: q[0] + nx, y: q[1] + ny },
        geo::Coord { x: q[0] - nx, y: q[1] - ny },
        geo::Coord { x: p[0] - nx, y: p[1] - ny },
        geo::Coord { x: p[0] + nx, y: p[1] + ny },
    ];
    Some(geo::Polygon::new(geo::LineString::new(ring), vec![]))
}

fn multi_polygon_to_geometry(mp: geo::MultiPolygon) -> Geometry {
    use crate::geo::convert::from_geo_geometry;
    if mp.0.len() == 1 {
        from_geo_geometry(&geo::Geometry::Polygon(mp.0.into_iter().next().unwrap()))
    } else {
        from_geo_geometry(&geo::Geometry::MultiPolygon(mp))
    }
}

fn clipper_to_multi_polygon(clipper: &Geometry) -> Result<geo::MultiPolygon> {
    ensure_valid(clipper)?;
    match to_geo_geometry(clipper) {
        geo::Geometry::Polygon(p) => Ok(geo::MultiPolygon::new(vec![p])),
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        _ => Err(GeotoolkitError::unsupported(
            "clip",
            clipper.geometry_type().as_str(),
        )),
    }
}

/// Intersection of a geometry with a polygonal clipper.
///
/// Returns `None` when nothing remains. Points survive when covered by the
/// clipper (boundary included), lines are cut to the covered portions,
/// polygons are intersected.
pub fn clip_geometry(geometry: &Geometry, clipper: &Geometry) -> Result<Option<Geometry>> {
    use crate::geo::convert::from_geo_geometry;

    let clip_mp = clipper_to_multi_polygon(clipper)?;

    match geometry {
        Geometry::Point { coordinates } => {
            let p = geo::Point::new(coordinates[0], coordinates[1]);
            Ok(clip_mp.intersects(&p).then(|| geometry.clone()))
        }
        Geometry::MultiPoint { coordinates } => {
            let kept: Vec<[f64; 2]> = coordinates
                .iter()
                .filter(|c| clip_mp.intersects(&geo::Point::new(c[0], c[1])))
                .copied()
                .collect();
            Ok(match kept.len() {
                0 => None,
                1 => Some(Geometry::point(kept[0][0], kept[0][1])),
                _ => Some(Geometry::MultiPoint { coordinates: kept }),
            })
        }
        Geometry::LineString { .. } | Geometry::MultiLineString { .. } => {
            let lines = match to_geo_geometry(geometry) {
                geo::Geometry::LineString(ls) => geo::MultiLineString::new(vec![ls]),
                geo::Geometry::MultiLineString(mls) => mls,
                _ => unreachable!(),
            };
            let clipped = clip_mp.clip(&lines, false);
            let kept: Vec<geo::LineString> =
                clipped.0.into_iter().filter(|ls| !ls.0.is_empty()).collect();
            Ok(match kept.len() {
                0 => None,
                1 => Some(from_geo_geometry(&geo::Geometry::LineString(
                    kept.into_iter().next().unwrap(),
                ))),
                _ => Some(from_geo_geometry(&geo::Geometry::MultiLineString(
                    geo::MultiLineString::new(kept),
                ))),
            })
        }
        Geometry::Polygon { .. } | Geometry::MultiPolygon { .. } => {
            let subject = match to_geo_geometry(geometry) {
                geo::Geometry::Polygon(p) => geo::MultiPolygon::new(vec![p]),
                geo::Geometry::MultiPolygon(mp) => mp,
                _ => unreachable!(),
            };
            let inter = subject.intersection(&clip_mp);
            if inter.0.is_empty() {
                Ok(None)
            } else {
                Ok(Some(multi_polygon_to_geometry(inter)))
            }
        }
    }
}

/// Clip every feature of a collection by a polygonal clipper.
///
/// Features whose geometry does not intersect the clipper are dropped; the
/// rest keep their properties and identity. The return type is always a
/// FeatureCollection, empty when nothing intersects.
pub fn clip(collection: &FeatureCollection, clipper: &Geometry) -> Result<FeatureCollection> {
    let mut out = FeatureCollection::empty();
    for feature in collection.iter() {
        if let Some(geometry) = clip_geometry(&feature.geometry, clipper)? {
            out.push(Feature {
                id: feature.id.clone(),
                properties: feature.properties.clone(),
                geometry,
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::rectangle(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_square_measures() {
        let square = square();
        assert!((area(&square) - 100.0).abs() < 1e-9);
        assert!((length(&square) - 40.0).abs() < 1e-9);
        assert_eq!(bbox(&square), Some((0.0, 0.0, 10.0, 10.0)));

        let c = centroid(&square).unwrap();
        assert_eq!(c.as_point(), Some([5.0, 5.0]));
    }

    #[test]
    fn test_envelope_is_closed_polygon() {
        let line = Geometry::line_string(vec![[0.0, 0.0], [4.0, 2.0]]);
        let env = envelope(&line).unwrap();
        assert_eq!(env, Geometry::rectangle(0.0, 0.0, 4.0, 2.0));
    }

    #[test]
    fn test_contains_vs_covers_boundary() {
        let square = square();
        let boundary_point = Geometry::point(0.0, 5.0);
        let inner_point = Geometry::point(5.0, 5.0);

        assert!(!contains(&square, &boundary_point));
        assert!(covers(&square, &boundary_point));
        assert!(contains(&square, &inner_point));
        assert!(covers(&square, &inner_point));
    }

    #[test]
    fn test_centroid_of_convex_polygon_is_inside() {
        let triangle =
            Geometry::polygon(vec![vec![[0.0, 0.0], [8.0, 0.0], [4.0, 6.0], [0.0, 0.0]]]);
        let c = centroid(&triangle).unwrap();
        assert!(contains(&triangle, &c));
    }

    #[test]
    fn test_nearest_point_to_square() {
        let result = nearest(&Geometry::point(15.0, 5.0), &square()).unwrap();
        assert!((result.distance - 5.0).abs() < 1e-9);
        assert_eq!(result.point_on_a.as_point(), Some([15.0, 5.0]));
        assert_eq!(result.point_on_b.as_point(), Some([10.0, 5.0]));
    }

    #[test]
    fn test_nearest_intersecting_is_zero() {
        let result = nearest(&Geometry::point(5.0, 5.0), &square()).unwrap();
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.point_on_a, result.point_on_b);
    }

    #[test]
    fn test_nearest_segment_pair() {
        let a = Geometry::line_string(vec![[0.0, 0.0], [0.0, 10.0]]);
        let b = Geometry::line_string(vec![[3.0, 2.0], [8.0, 2.0]]);
        let result = nearest(&a, &b).unwrap();
        assert!((result.distance - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_rejects_empty() {
        let empty = Geometry::LineString { coordinates: vec![] };
        assert!(nearest(&empty, &square()).is_err());
    }

    #[test]
    fn test_buffer_grows_area_and_covers_original() {
        let square = square();
        let buffered = buffer(&square, 5.0).unwrap();

        assert!(area(&buffered) > area(&square));
        assert!(area(&buffered) > 100.0);
        assert!(covers(&buffered, &square));
    }

    #[test]
    fn test_buffer_point_is_disc() {
        let disc = buffer(&Geometry::point(0.0, 0.0), 1.0).unwrap();
        let a = area(&disc);
        // 32-gon area approaches pi from below
        assert!(a > 3.1 && a < std::f64::consts::PI);
        assert!(covers(&disc, &Geometry::point(0.9, 0.0)));
    }

    #[test]
    fn test_buffer_rejects_nonpositive_distance() {
        assert!(buffer(&square(), 0.0).is_err());
        assert!(buffer(&square(), -1.0).is_err());
    }

    #[test]
    fn test_buffer_rejects_unclosed_ring() {
        let open = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
        assert!(buffer(&open, 1.0).is_err());
    }

    #[test]
    fn test_clip_keeps_covered_points_and_properties() {
        let fc = FeatureCollection::new(vec![
            Feature::new(Geometry::point(5.0, 5.0)).property("id", 1),
            Feature::new(Geometry::point(20.0, 20.0)).property("id", 2),
        ]);
        let clipped = clip(&fc, &square()).unwrap();
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped.features[0].properties["id"], 1);
    }

    #[test]
    fn test_clip_polygon_intersection() {
        let other = Geometry::rectangle(5.0, 5.0, 15.0, 15.0);
        let fc = FeatureCollection::new(vec![Feature::new(other)]);
        let clipped = clip(&fc, &square()).unwrap();
        assert_eq!(clipped.len(), 1);
        assert!((area(&clipped.features[0].geometry) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_nothing_intersects_returns_empty() {
        let fc = FeatureCollection::new(vec![Feature::new(Geometry::point(50.0, 50.0))]);
        let clipped = clip(&fc, &square()).unwrap();
        assert!(clipped.is_empty());
    }

    #[test]
    fn test_clip_rejects_non_polygonal_clipper() {
        let fc = FeatureCollection::new(vec![Feature::new(Geometry::point(0.0, 0.0))]);
        let line = Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]]);
        assert!(clip(&fc, &line).is_err());
    }
}
