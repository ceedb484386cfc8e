//! Conversions between the canonical geometry enum and `geo` crate types.

use geo::Geometry as GeoGeometry;

use crate::models::Geometry;

fn ring_to_line_string(ring: &[[f64; 2]]) -> geo::LineString {
    geo::LineString::new(ring.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
}

fn rings_to_polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    if rings.is_empty() {
        return geo::Polygon::new(geo::LineString::new(vec![]), vec![]);
    }
    let exterior = ring_to_line_string(&rings[0]);
    let interiors = rings[1..].iter().map(|r| ring_to_line_string(r)).collect();
    geo::Polygon::new(exterior, interiors)
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => {
            GeoGeometry::LineString(ring_to_line_string(coordinates))
        }
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(rings_to_polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(geo::MultiPoint::new(
            coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
        )),
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|l| ring_to_line_string(l)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(geo::MultiPolygon::new(
            coordinates.iter().map(|p| rings_to_polygon(p)).collect(),
        )),
    }
}

fn line_string_to_ring(ls: &geo::LineString) -> Vec<[f64; 2]> {
    ls.coords().map(|c| [c.x, c.y]).collect()
}

fn polygon_to_rings(p: &geo::Polygon) -> Vec<Vec<[f64; 2]>> {
    let mut rings = vec![line_string_to_ring(p.exterior())];
    rings.extend(p.interiors().iter().map(line_string_to_ring));
    rings
}

/// Convert a geo::Geometry to a canonical Geometry
pub fn from_geo_geometry(geom: &GeoGeometry) -> Geometry {
    match geom {
        GeoGeometry::Point(p) => Geometry::Point { coordinates: [p.x(), p.y()] },
        GeoGeometry::Line(l) => Geometry::LineString {
            coordinates: vec![[l.start.x, l.start.y], [l.end.x, l.end.y]],
        },
        GeoGeometry::LineString(ls) => Geometry::LineString { coordinates: line_string_to_ring(ls) },
        GeoGeometry::Polygon(p) => Geometry::Polygon { coordinates: polygon_to_rings(p) },
        GeoGeometry::MultiPoint(mp) => Geometry::MultiPoint {
            coordinates: mp.iter().map(|p| [p.x(), p.y()]).collect(),
        },
        GeoGeometry::MultiLineString(mls) => Geometry::MultiLineString {
            coordinates: mls.iter().map(line_string_to_ring).collect(),
        },
        GeoGeometry::MultiPolygon(mp) => Geometry::MultiPolygon {
            coordinates: mp.iter().map(polygon_to_rings).collect(),
        },
        GeoGeometry::GeometryCollection(gc) => {
            // Collections collapse to their polygonal members when present,
            // otherwise to the first member.
            let polygons: Vec<geo::Polygon> = gc
                .iter()
                .filter_map(|g| match g {
                    GeoGeometry::Polygon(p) => Some(vec![p.clone()]),
                    GeoGeometry::MultiPolygon(mp) => Some(mp.0.clone()),
                    _ => None,
                })
                .flatten()
                .collect();
            if !polygons.is_empty() {
                Geometry::MultiPolygon {
                    coordinates: polygons.iter().map(polygon_to_rings).collect(),
                }
            } else {
                gc.iter()
                    .next()
                    .map(from_geo_geometry)
                    .unwrap_or(Geometry::MultiPolygon { coordinates: vec![] })
            }
        }
        GeoGeometry::Rect(r) => from_geo_geometry(&GeoGeometry::Polygon(r.to_polygon())),
        GeoGeometry::Triangle(t) => from_geo_geometry(&GeoGeometry::Polygon(t.to_polygon())),
    }
}

/// Extension trait for canonical geometries backed by geo-crate algorithms
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry;

    /// Centroid coordinates, if defined for this geometry
    fn centroid_coords(&self) -> Option<[f64; 2]>;

    /// Axis-aligned bounding box `(minx, miny, maxx, maxy)`
    fn bounding_box(&self) -> Option<(f64, f64, f64, f64)>;
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self)
    }

    fn centroid_coords(&self) -> Option<[f64; 2]> {
        use geo::algorithm::centroid::Centroid;
        self.to_geo().centroid().map(|p| [p.x(), p.y()])
    }

    fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        use geo::algorithm::bounding_rect::BoundingRect;
        self.to_geo().bounding_rect().map(|r| {
            let min = r.min();
            let max = r.max();
            (min.x, min.y, max.x, max.y)
        })
    }
}
