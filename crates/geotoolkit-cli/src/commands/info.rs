use std::collections::BTreeMap;

use anyhow::{Context, Result};

use geotoolkit_core::formats::read_feature_collection;
use geotoolkit_core::geo::GeometryExt;

use crate::cli::InfoArgs;
use crate::output::OutputWriter;

pub fn execute(args: InfoArgs, output: &OutputWriter) -> Result<()> {
    let dataset = read_feature_collection(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    output.kv("file", args.input.display());
    output.kv("crs", format!("EPSG:{} ({})", dataset.crs.epsg, dataset.crs.name));
    output.kv("features", dataset.collection.len());

    let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
    for feature in dataset.collection.iter() {
        *kinds.entry(feature.geometry.geometry_type().as_str()).or_default() += 1;
    }
    for (kind, count) in kinds {
        output.kv(kind, count);
    }

    let bounds = dataset
        .collection
        .iter()
        .filter_map(|f| f.geometry.bounding_box())
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)));
    match bounds {
        Some((minx, miny, maxx, maxy)) => output.kv(
            "bbox",
            format!("({:.6}, {:.6}, {:.6}, {:.6})", minx, miny, maxx, maxy),
        ),
        None => output.kv("bbox", "none"),
    }
    Ok(())
}
