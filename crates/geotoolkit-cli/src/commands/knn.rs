use anyhow::{Context, Result};
use serde::Serialize;
use tabled::Tabled;

use geotoolkit_core::config::LayeredConfig;
use geotoolkit_core::formats::{read_feature_collection, write_feature_collection};
use geotoolkit_core::geo::knn;

use crate::cli::KnnArgs;
use crate::commands::load_geometry_arg;
use crate::output::OutputWriter;

#[derive(Tabled, Serialize)]
struct KnnRow {
    #[tabled(rename = "rank")]
    rank: u64,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "x")]
    x: f64,
    #[tabled(rename = "y")]
    y: f64,
    #[tabled(rename = "distance")]
    distance: f64,
}

pub fn execute(args: KnnArgs, output: &OutputWriter, config: &LayeredConfig) -> Result<()> {
    let dataset = read_feature_collection(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let target = load_geometry_arg(&args.target)?;

    let ranked = knn(
        &dataset.collection,
        &target,
        args.k,
        !args.brute_force,
        &config.knn_params(),
    )?;

    let rows: Vec<KnnRow> = ranked
        .iter()
        .map(|f| {
            let coords = f.geometry.as_point().unwrap_or([f64::NAN, f64::NAN]);
            KnnRow {
                rank: f.properties["knn_rank"].as_u64().unwrap_or(0),
                id: f.id.clone().unwrap_or_else(|| "-".to_string()),
                x: coords[0],
                y: coords[1],
                distance: f.properties["distance_m"].as_f64().unwrap_or(f64::NAN),
            }
        })
        .collect();
    output.table(rows);

    if let Some(path) = &args.output {
        write_feature_collection(path, &ranked)?;
        output.success(format!("Wrote {} neighbors to {}", ranked.len(), path.display()));
    }
    Ok(())
}
