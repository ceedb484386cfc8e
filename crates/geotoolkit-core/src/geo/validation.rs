//! Structural geometry validation.

use crate::error::{GeotoolkitError, Result};
use crate::models::Geometry;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    pub fn add_error(&mut self, location: impl Into<String>, reason: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(ValidationError { location: location.into(), reason: reason.into() });
    }
}

/// Validate a geometry's structure: finite coordinates, minimum position
/// counts, and closed polygon rings.
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    let mut result = ValidationResult::valid();
    match geometry {
        Geometry::Point { coordinates } => {
            check_position("Point", coordinates, &mut result);
        }
        Geometry::LineString { coordinates } => {
            validate_line("LineString", coordinates, &mut result);
        }
        Geometry::Polygon { coordinates } => {
            validate_rings("Polygon", coordinates, &mut result);
        }
        Geometry::MultiPoint { coordinates } => {
            for (i, c) in coordinates.iter().enumerate() {
                check_position(format!("MultiPoint[{}]", i), c, &mut result);
            }
        }
        Geometry::MultiLineString { coordinates } => {
            for (i, line) in coordinates.iter().enumerate() {
                validate_line(format!("MultiLineString[{}]", i), line, &mut result);
            }
        }
        Geometry::MultiPolygon { coordinates } => {
            for (i, rings) in coordinates.iter().enumerate() {
                validate_rings(format!("MultiPolygon[{}]", i), rings, &mut result);
            }
        }
    }
    result
}

fn check_position(location: impl Into<String>, position: &[f64; 2], result: &mut ValidationResult) {
    if !position[0].is_finite() || !position[1].is_finite() {
        result.add_error(location, "Coordinates must be finite");
    }
}

fn validate_line(
    location: impl Into<String>,
    line: &[[f64; 2]],
    result: &mut ValidationResult,
) {
    let location = location.into();
    if line.len() < 2 {
        result.add_error(
            location.clone(),
            format!("LineString must have at least 2 positions, found {}", line.len()),
        );
        return;
    }
    for (i, c) in line.iter().enumerate() {
        check_position(format!("{}[{}]", location, i), c, result);
    }
}

fn validate_rings(
    location: impl Into<String>,
    rings: &[Vec<[f64; 2]>],
    result: &mut ValidationResult,
) {
    let location = location.into();
    if rings.is_empty() {
        result.add_error(location.clone(), "Polygon must have an exterior ring");
        return;
    }
    for (i, ring) in rings.iter().enumerate() {
        let ring_name = if i == 0 {
            format!("{} exterior", location)
        } else {
            format!("{} interior[{}]", location, i - 1)
        };

        if ring.len() < 4 {
            result.add_error(
                ring_name.clone(),
                format!("Ring must have at least 4 positions, found {}", ring.len()),
            );
            continue;
        }
        if ring.first() != ring.last() {
            result.add_error(
                ring_name.clone(),
                "Ring must be closed (first position == last position)",
            );
        }
        for (j, c) in ring.iter().enumerate() {
            check_position(format!("{}[{}]", ring_name, j), c, result);
        }
    }
}

/// Validate and convert a failure into a typed error
pub fn ensure_valid(geometry: &Geometry) -> Result<()> {
    let validation = validate_geometry(geometry);
    if validation.is_valid {
        Ok(())
    } else {
        let first = &validation.errors[0];
        Err(GeotoolkitError::InvalidGeometry {
            reason: format!("{}: {}", first.location, first.reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_square() {
        let square = Geometry::rectangle(0.0, 0.0, 10.0, 10.0);
        assert!(validate_geometry(&square).is_valid);
        assert!(ensure_valid(&square).is_ok());
    }

    #[test]
    fn test_unclosed_ring_rejected() {
        let open = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
        let result = validate_geometry(&open);
        assert!(!result.is_valid);
        assert!(result.errors[0].reason.contains("closed"));
        assert!(ensure_valid(&open).is_err());
    }

    #[test]
    fn test_ring_below_triangle_minimum_rejected() {
        let degenerate = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]);
        let result = validate_geometry(&degenerate);
        assert!(!result.is_valid);
        assert!(result.errors[0].reason.contains("at least 4"));
    }

    #[test]
    fn test_nonfinite_coordinates_rejected() {
        let bad = Geometry::point(f64::NAN, 0.0);
        assert!(!validate_geometry(&bad).is_valid);
    }

    #[test]
    fn test_interior_ring_checked() {
        let holed = Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[4.0, 4.0], [6.0, 4.0], [4.0, 4.0]],
        ]);
        let result = validate_geometry(&holed);
        assert!(!result.is_valid);
        assert!(result.errors[0].location.contains("interior"));
    }
}
