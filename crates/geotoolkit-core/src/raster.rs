//! Raster point-sampling.
//!
//! The query layer treats raster access as an external point-value lookup:
//! anything that can answer "what value lies at (x, y)" plugs in through
//! [`PointSampler`]. The built-in [`GridRaster`] is an in-memory single-band
//! north-up grid, enough for joining query results with surface data and
//! for generating synthetic test surfaces.

use serde_json::Value;

use crate::error::{GeotoolkitError, Result};
use crate::models::{FeatureCollection, Geometry};

/// Property attached to sampled point features
const RASTER_VALUE_PROP: &str = "raster_value";

/// A point-value lookup over some surface
pub trait PointSampler {
    /// Value at `(x, y)` in the raster's CRS, or `None` outside coverage /
    /// on no-data cells
    fn sample(&self, x: f64, y: f64) -> Option<f64>;
}

/// In-memory single-band raster on a regular north-up grid.
///
/// Cell `(0, 0)` is the north-west corner; `origin` is the grid's
/// south-west corner in CRS units.
#[derive(Debug, Clone)]
pub struct GridRaster {
    origin: [f64; 2],
    resolution: f64,
    width: usize,
    height: usize,
    data: Vec<f64>,
    nodata: Option<f64>,
}

impl GridRaster {
    /// Build a raster by evaluating `f` at every cell center
    pub fn from_fn(
        bounds: (f64, f64, f64, f64),
        resolution: f64,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Self> {
        let (minx, miny, maxx, maxy) = bounds;
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GeotoolkitError::invalid_parameter(
                "resolution",
                "must be positive and finite",
            ));
        }
        if maxx <= minx || maxy <= miny {
            return Err(GeotoolkitError::invalid_parameter(
                "bounds",
                "max corner must exceed min corner",
            ));
        }

        let width = (((maxx - minx) / resolution).ceil() as usize).max(1);
        let height = (((maxy - miny) / resolution).ceil() as usize).max(1);

        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let x = minx + (col as f64 + 0.5) * resolution;
                let y = maxy - (row as f64 + 0.5) * resolution;
                data.push(f(x, y));
            }
        }

        Ok(Self { origin: [minx, miny], resolution, width, height, data, nodata: None })
    }

    /// Synthetic test surface: a diagonal gradient `Z = X + Y` scaled to
    /// 0..=200 over the padded bounds
    pub fn synthetic_gradient(bounds: (f64, f64, f64, f64), resolution: f64) -> Result<Self> {
        let pad = 100.0;
        let (minx, miny, maxx, maxy) =
            (bounds.0 - pad, bounds.1 - pad, bounds.2 + pad, bounds.3 + pad);

        let spanx = maxx - minx;
        let spany = maxy - miny;
        Self::from_fn((minx, miny, maxx, maxy), resolution, move |x, y| {
            (x - minx) / spanx * 100.0 + (y - miny) / spany * 100.0
        })
    }

    /// Mark a value as no-data: cells holding it sample as `None`
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

impl PointSampler for GridRaster {
    fn sample(&self, x: f64, y: f64) -> Option<f64> {
        let maxy = self.origin[1] + self.height as f64 * self.resolution;
        let col = ((x - self.origin[0]) / self.resolution).floor();
        let row = ((maxy - y) / self.resolution).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        let value = self.data[row * self.width + col];
        match self.nodata {
            Some(nodata) if value == nodata => None,
            _ => Some(value),
        }
    }
}

/// Attach a `raster_value` property to every Point feature.
///
/// Non-point features pass through untouched; no-data samples become JSON
/// null. Properties are copied, never mutated in place.
pub fn sample_at_points(
    collection: &FeatureCollection,
    sampler: &impl PointSampler,
) -> FeatureCollection {
    collection
        .iter()
        .map(|feature| match feature.geometry {
            Geometry::Point { coordinates } => {
                let value = sampler
                    .sample(coordinates[0], coordinates[1])
                    .map_or(Value::Null, Value::from);
                feature.tagged(RASTER_VALUE_PROP, value)
            }
            _ => feature.clone(),
        })
        .collect()
}
