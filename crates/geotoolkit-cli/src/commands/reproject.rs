use anyhow::{Context, Result};

use geotoolkit_core::formats::{read_feature_collection, write_feature_collection};
use geotoolkit_core::geo::reproject_feature_collection;
use geotoolkit_core::models::Crs;

use crate::cli::ReprojectArgs;
use crate::output::OutputWriter;

pub fn execute(args: ReprojectArgs, output: &OutputWriter) -> Result<()> {
    let dataset = read_feature_collection(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let from = args.from.map(Crs::from_epsg).unwrap_or(dataset.crs);
    let to = Crs::from_epsg(args.to);

    let reprojected = reproject_feature_collection(&dataset.collection, &from, &to)?;
    write_feature_collection(&args.output, &reprojected)?;

    output.success(format!(
        "Reprojected {} features from EPSG:{} to EPSG:{} into {}",
        reprojected.len(),
        from.epsg,
        to.epsg,
        args.output.display()
    ));
    Ok(())
}
