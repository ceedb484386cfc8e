//! Command implementations

mod buffer;
mod clip;
mod info;
mod knn;
mod nearest;
mod reproject;
mod sample;
mod within;

use std::path::Path;

use anyhow::{bail, Context, Result};

use geotoolkit_core::config::LayeredConfig;
use geotoolkit_core::formats::read_feature_collection;
use geotoolkit_core::models::Geometry;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = &cli.config {
        config = config
            .load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?;
    }
    let config = config.load_from_env();

    match cli.command {
        Commands::Reproject(args) => reproject::execute(args, &output),
        Commands::Buffer(args) => buffer::execute(args, &output),
        Commands::Clip(args) => clip::execute(args, &output),
        Commands::Nearest(args) => nearest::execute(args, &output),
        Commands::Within(args) => within::execute(args, &output),
        Commands::Knn(args) => knn::execute(args, &output, &config),
        Commands::Sample(args) => sample::execute(args, &output),
        Commands::Info(args) => info::execute(args, &output),
    }
}

/// Parse a geometry argument: inline GeoJSON first, then a file path whose
/// first feature provides the geometry.
pub(crate) fn load_geometry_arg(arg: &str) -> Result<Geometry> {
    if arg.trim_start().starts_with('{') {
        let value: serde_json::Value =
            serde_json::from_str(arg).context("parsing inline GeoJSON geometry")?;
        return Geometry::from_geojson(&value)
            .ok_or_else(|| anyhow::anyhow!("not a GeoJSON geometry: {}", arg));
    }

    let dataset = read_feature_collection(Path::new(arg))
        .with_context(|| format!("reading geometry from {}", arg))?;
    match dataset.collection.features.into_iter().next() {
        Some(feature) => Ok(feature.geometry),
        None => bail!("{} contains no features", arg),
    }
}

/// First polygonal geometry in a GeoJSON file
pub(crate) fn load_polygon(path: &Path) -> Result<Geometry> {
    let dataset = read_feature_collection(path)
        .with_context(|| format!("reading polygon from {}", path.display()))?;
    dataset
        .collection
        .features
        .into_iter()
        .map(|f| f.geometry)
        .find(|g| g.is_polygonal())
        .ok_or_else(|| anyhow::anyhow!("{} contains no polygonal feature", path.display()))
}
