//! Layered configuration: defaults < file < environment < CLI.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{GeotoolkitError, Result};
use crate::geo::knn::KnnParams;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    Default,
    File,
    Environment,
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered toolkit configuration
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// CRS assumed for input data without an explicit one
    pub crs: ConfigValue<u32>,
    /// Metric CRS used when distance work needs a reprojection target
    pub metric_crs: ConfigValue<u32>,
    /// First k-NN search window half-width, in CRS units
    pub knn_initial_radius: ConfigValue<f64>,
    /// k-NN window growth per round
    pub knn_growth_factor: ConfigValue<f64>,
    /// k-NN rounds before the full-scan fallback
    pub knn_max_rounds: ConfigValue<u32>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let knn = KnnParams::default();
        Self {
            crs: ConfigValue::new(4326, ConfigSource::Default),
            metric_crs: ConfigValue::new(3857, ConfigSource::Default),
            knn_initial_radius: ConfigValue::new(knn.initial_radius, ConfigSource::Default),
            knn_growth_factor: ConfigValue::new(knn.growth_factor, ConfigSource::Default),
            knn_max_rounds: ConfigValue::new(knn.max_rounds, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeotoolkitError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeotoolkitError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(crs) = file_config.crs {
            self.crs.update(crs, ConfigSource::File);
        }
        if let Some(metric_crs) = file_config.metric_crs {
            self.metric_crs.update(metric_crs, ConfigSource::File);
        }
        if let Some(radius) = file_config.knn_initial_radius {
            self.knn_initial_radius.update(radius, ConfigSource::File);
        }
        if let Some(growth) = file_config.knn_growth_factor {
            self.knn_growth_factor.update(growth, ConfigSource::File);
        }
        if let Some(rounds) = file_config.knn_max_rounds {
            self.knn_max_rounds.update(rounds, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(crs_str) = env::var("GEOTOOLKIT_CRS") {
            match crs_str.parse::<u32>() {
                Ok(crs) => self.crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOTOOLKIT_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        if let Ok(crs_str) = env::var("GEOTOOLKIT_METRIC_CRS") {
            match crs_str.parse::<u32>() {
                Ok(crs) => self.metric_crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOTOOLKIT_METRIC_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        if let Ok(radius_str) = env::var("GEOTOOLKIT_KNN_INITIAL_RADIUS") {
            match radius_str.parse::<f64>() {
                Ok(radius) => self.knn_initial_radius.update(radius, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOTOOLKIT_KNN_INITIAL_RADIUS value '{}': expected number",
                    radius_str
                ),
            }
        }

        if let Ok(growth_str) = env::var("GEOTOOLKIT_KNN_GROWTH_FACTOR") {
            match growth_str.parse::<f64>() {
                Ok(growth) => self.knn_growth_factor.update(growth, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOTOOLKIT_KNN_GROWTH_FACTOR value '{}': expected number",
                    growth_str
                ),
            }
        }

        if let Ok(rounds_str) = env::var("GEOTOOLKIT_KNN_MAX_ROUNDS") {
            match rounds_str.parse::<u32>() {
                Ok(rounds) => self.knn_max_rounds.update(rounds, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOTOOLKIT_KNN_MAX_ROUNDS value '{}': expected integer",
                    rounds_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(crs) = overrides.crs {
            self.crs.update(crs, ConfigSource::Cli);
        }
        if let Some(metric_crs) = overrides.metric_crs {
            self.metric_crs.update(metric_crs, ConfigSource::Cli);
        }
        if let Some(radius) = overrides.knn_initial_radius {
            self.knn_initial_radius.update(radius, ConfigSource::Cli);
        }
        if let Some(growth) = overrides.knn_growth_factor {
            self.knn_growth_factor.update(growth, ConfigSource::Cli);
        }
        if let Some(rounds) = overrides.knn_max_rounds {
            self.knn_max_rounds.update(rounds, ConfigSource::Cli);
        }
    }

    /// The k-NN search parameters this configuration describes
    pub fn knn_params(&self) -> KnnParams {
        KnnParams {
            initial_radius: self.knn_initial_radius.value,
            growth_factor: self.knn_growth_factor.value,
            max_rounds: self.knn_max_rounds.value,
        }
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    crs: Option<u32>,
    metric_crs: Option<u32>,
    knn_initial_radius: Option<f64>,
    knn_growth_factor: Option<f64>,
    knn_max_rounds: Option<u32>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub crs: Option<u32>,
    pub metric_crs: Option<u32>,
    pub knn_initial_radius: Option<f64>,
    pub knn_growth_factor: Option<f64>,
    pub knn_max_rounds: Option<u32>,
}
