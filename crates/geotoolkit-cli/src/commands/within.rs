use anyhow::{Context, Result};

use geotoolkit_core::formats::{read_feature_collection, write_feature_collection};
use geotoolkit_core::geo::{filter_points_within, tag_points_within, ContainmentMode};

use crate::cli::WithinArgs;
use crate::commands::load_polygon;
use crate::output::OutputWriter;

pub fn execute(args: WithinArgs, output: &OutputWriter) -> Result<()> {
    let dataset = read_feature_collection(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let polygon = load_polygon(&args.polygon)?;
    let mode: ContainmentMode = args.mode.parse()?;
    let use_index = !args.brute_force;

    let result = if args.filter {
        filter_points_within(&dataset.collection, &polygon, mode, use_index)?
    } else {
        tag_points_within(&dataset.collection, &polygon, &args.prop, mode, use_index)?
    };

    write_feature_collection(&args.output, &result)?;

    if args.filter {
        output.success(format!(
            "Kept {} points inside the polygon ({}) into {}",
            result.len(),
            mode,
            args.output.display()
        ));
    } else {
        let inside = result
            .iter()
            .filter(|f| f.properties.get(&args.prop).and_then(|v| v.as_bool()) == Some(true))
            .count();
        output.success(format!(
            "Tagged {} points ({} inside, mode {}) into {}",
            result.len(),
            inside,
            mode,
            args.output.display()
        ));
    }
    Ok(())
}
