use anyhow::{Context, Result};
use serde::Serialize;

use geotoolkit_core::formats::read_feature_collection;
use geotoolkit_core::geo::nearest_in_collection;
use geotoolkit_core::models::Geometry;

use crate::cli::NearestArgs;
use crate::commands::load_geometry_arg;
use crate::output::OutputWriter;

#[derive(Serialize)]
struct NearestReport {
    position: usize,
    distance: f64,
    geometry: Geometry,
}

pub fn execute(args: NearestArgs, output: &OutputWriter) -> Result<()> {
    let dataset = read_feature_collection(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let query = load_geometry_arg(&args.query)?;

    match nearest_in_collection(&query, &dataset.collection, !args.brute_force)? {
        Some(found) => {
            output.kv("distance", format!("{:.6}", found.distance));
            output.result(&NearestReport {
                position: found.position,
                distance: found.distance,
                geometry: found.geometry,
            })?;
        }
        None => {
            output.kv("distance", "none (empty collection)");
        }
    }
    Ok(())
}
