use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Geotoolkit - geospatial analysis toolkit
#[derive(Parser, Debug)]
#[command(name = "geotoolkit")]
#[command(about = "Geospatial analysis over GeoJSON data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reproject a GeoJSON file between coordinate systems
    Reproject(ReprojectArgs),

    /// Buffer every feature by a distance
    Buffer(BufferArgs),

    /// Clip features by a polygon
    Clip(ClipArgs),

    /// Find the feature nearest to a query geometry
    Nearest(NearestArgs),

    /// Tag or filter points by polygon containment
    Within(WithinArgs),

    /// K-nearest-neighbor search around a target point
    Knn(KnnArgs),

    /// Sample a synthetic raster surface at point locations
    Sample(SampleArgs),

    /// Show dataset statistics
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
pub struct ReprojectArgs {
    /// Input GeoJSON file
    pub input: PathBuf,

    /// Source EPSG code (defaults to the CRS declared in the file)
    #[arg(long)]
    pub from: Option<u32>,

    /// Target EPSG code
    #[arg(long)]
    pub to: u32,

    /// Output GeoJSON file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct BufferArgs {
    /// Input GeoJSON file (in a metric CRS)
    pub input: PathBuf,

    /// Buffer distance in CRS units
    #[arg(long)]
    pub dist: f64,

    /// Output GeoJSON file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ClipArgs {
    /// Input GeoJSON file
    pub input: PathBuf,

    /// GeoJSON file providing the clip polygon (first polygonal feature)
    #[arg(long)]
    pub clipper: PathBuf,

    /// Output GeoJSON file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct NearestArgs {
    /// Input GeoJSON file (the collection searched)
    pub input: PathBuf,

    /// Query geometry: inline GeoJSON or a path to a GeoJSON file
    #[arg(long)]
    pub query: String,

    /// Scan every feature instead of using the spatial index
    #[arg(long)]
    pub brute_force: bool,
}

#[derive(Parser, Debug)]
pub struct WithinArgs {
    /// Input GeoJSON file (point features)
    pub input: PathBuf,

    /// GeoJSON file providing the polygon (first polygonal feature)
    #[arg(long)]
    pub polygon: PathBuf,

    /// Containment semantics (contains or covers)
    #[arg(long, default_value = "contains")]
    pub mode: String,

    /// Property name for the containment tag
    #[arg(long, default_value = "inside")]
    pub prop: String,

    /// Keep only the contained points instead of tagging all of them
    #[arg(long)]
    pub filter: bool,

    /// Evaluate the predicate on every point instead of using the index
    #[arg(long)]
    pub brute_force: bool,

    /// Output GeoJSON file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct KnnArgs {
    /// Input GeoJSON file (point features, in a metric CRS)
    pub input: PathBuf,

    /// Target point: inline GeoJSON or a path to a GeoJSON file
    #[arg(long)]
    pub target: String,

    /// Number of neighbors to return
    #[arg(long, short = 'k', default_value = "10")]
    pub k: usize,

    /// Compute every distance instead of using the spatial index
    #[arg(long)]
    pub brute_force: bool,

    /// Optional output GeoJSON file for the ranked neighbors
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// Input GeoJSON file (point features)
    pub input: PathBuf,

    /// Raster cell size in CRS units
    #[arg(long, default_value = "10.0")]
    pub resolution: f64,

    /// Output GeoJSON file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Input GeoJSON file
    pub input: PathBuf,
}
