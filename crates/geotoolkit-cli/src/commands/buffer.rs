use anyhow::{Context, Result};

use geotoolkit_core::formats::{read_feature_collection, write_feature_collection};
use geotoolkit_core::geo::{area, buffer};
use geotoolkit_core::models::{Feature, FeatureCollection};

use crate::cli::BufferArgs;
use crate::output::OutputWriter;

pub fn execute(args: BufferArgs, output: &OutputWriter) -> Result<()> {
    let dataset = read_feature_collection(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let mut buffered = FeatureCollection::empty();
    let mut total_area = 0.0;
    for feature in dataset.collection.iter() {
        let geometry = buffer(&feature.geometry, args.dist)?;
        total_area += area(&geometry);
        buffered.push(Feature {
            id: feature.id.clone(),
            properties: feature.properties.clone(),
            geometry,
        });
    }

    write_feature_collection(&args.output, &buffered)?;

    output.success(format!(
        "Buffered {} features by {} into {}",
        buffered.len(),
        args.dist,
        args.output.display()
    ));
    output.kv("total buffered area", format!("{:.2}", total_area));
    Ok(())
}
