use anyhow::{Context, Result};

use geotoolkit_core::formats::{read_feature_collection, write_feature_collection};
use geotoolkit_core::geo::clip;

use crate::cli::ClipArgs;
use crate::commands::load_polygon;
use crate::output::OutputWriter;

pub fn execute(args: ClipArgs, output: &OutputWriter) -> Result<()> {
    let dataset = read_feature_collection(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let clipper = load_polygon(&args.clipper)?;

    let clipped = clip(&dataset.collection, &clipper)?;
    write_feature_collection(&args.output, &clipped)?;

    output.success(format!(
        "Clipped {} of {} features into {}",
        clipped.len(),
        dataset.collection.len(),
        args.output.display()
    ));
    Ok(())
}
