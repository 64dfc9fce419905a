//! Run configuration, deserialised from TOML.
//!
//! Every section and field is optional, missing values fall back to the parameters of
//! Röthlisberger et al. (2018):
//!
//! ```toml
//! [band]
//! kmin = 4
//! kmax = 15
//!
//! [hovmoller]
//! lat_min = 35.0
//! lat_max = 65.0
//!
//! [smoothing]
//! window = 57
//!
//! [output]
//! directory = "."
//! file_name = "R_metric.npz"
//! fill_value = -999.0
//! write_metadata = true
//! variable = "V"
//! ```

use crate::data_container::WaveBand;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialise config: {0}")]
    Serialise(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RMetricConfig {
    #[serde(default)]
    pub band: WaveBand,
    #[serde(default)]
    pub hovmoller: HovmollerConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Latitude band averaged into the Hovmöller field, in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HovmollerConfig {
    #[serde(default = "default_lat_min")]
    pub lat_min: f64,
    #[serde(default = "default_lat_max")]
    pub lat_max: f64,
}

impl Default for HovmollerConfig {
    fn default() -> Self {
        HovmollerConfig {
            lat_min: default_lat_min(),
            lat_max: default_lat_max(),
        }
    }
}

fn default_lat_min() -> f64 {
    35.0
}
fn default_lat_max() -> f64 {
    65.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Rolling mean length in time steps. 57 = 14 days of 6-hourly data, centred.
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig {
            window: default_window(),
        }
    }
}

fn default_window() -> usize {
    57
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_fill_value")]
    pub fill_value: f64,
    #[serde(default = "default_true")]
    pub write_metadata: bool,
    /// Name of the velocity array inside the input archive.
    #[serde(default = "default_variable")]
    pub variable: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: default_directory(),
            file_name: default_file_name(),
            fill_value: default_fill_value(),
            write_metadata: default_true(),
            variable: default_variable(),
        }
    }
}

fn default_directory() -> String {
    ".".into()
}
fn default_file_name() -> String {
    "R_metric.npz".into()
}
fn default_fill_value() -> f64 {
    -999.0
}
fn default_true() -> bool {
    true
}
fn default_variable() -> String {
    "V".into()
}

impl RMetricConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load a configuration file, or the defaults if no path is given.
pub fn load_config(path: Option<&Path>) -> Result<RMetricConfig, ConfigError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let config = RMetricConfig::from_toml_str(&text)?;
            log::info!("loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(RMetricConfig::default()),
    }
}
