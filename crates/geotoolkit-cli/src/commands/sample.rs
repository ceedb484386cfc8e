use anyhow::{bail, Context, Result};

use geotoolkit_core::formats::{read_feature_collection, write_feature_collection};
use geotoolkit_core::geo::GeometryExt;
use geotoolkit_core::models::FeatureCollection;
use geotoolkit_core::raster::{sample_at_points, GridRaster};

use crate::cli::SampleArgs;
use crate::output::OutputWriter;

pub fn execute(args: SampleArgs, output: &OutputWriter) -> Result<()> {
    let dataset = read_feature_collection(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let Some(bounds) = collection_bounds(&dataset.collection) else {
        bail!("{} contains no coordinates to sample at", args.input.display());
    };

    let raster = GridRaster::synthetic_gradient(bounds, args.resolution)?;
    let sampled = sample_at_points(&dataset.collection, &raster);
    write_feature_collection(&args.output, &sampled)?;

    output.success(format!(
        "Sampled a {}x{} synthetic surface at {} features into {}",
        raster.width(),
        raster.height(),
        sampled.len(),
        args.output.display()
    ));
    Ok(())
}

fn collection_bounds(collection: &FeatureCollection) -> Option<(f64, f64, f64, f64)> {
    collection
        .iter()
        .filter_map(|f| f.geometry.bounding_box())
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
}
