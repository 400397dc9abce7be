//! TOML configuration file support.
//!
//! Pipeline sections sit at the top level; `[input]` and `[output]` describe the
//! CSV files around it:
//!
//! ```toml
//! # wellpeak.toml
//! [plate]
//! rows = 15
//! columns = 24
//! droplets_per_well = 2
//!
//! [heatmap]
//! channels = ["Isomer 57"]
//!
//! [input]
//! time_column = "Time (min)"
//! internal_standard_column = "IS"
//! marker_column = "Marker"
//! channel_prefix = "Isomer"
//!
//! [output]
//! fields = ["peak_number", "peak_center", "duration", "fraction:Isomer 57", "yield", "well"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use wellpeak::config::PipelineConfig;
use wellpeak::report::OutputField;

/// Root configuration structure for wellpeak.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Pipeline sections (`[detection]`, `[anomaly]`, `[plate]`, ...).
    #[serde(flatten)]
    pub pipeline: PipelineConfig,

    /// Input CSV layout.
    #[serde(default)]
    pub input: InputConfig,

    /// Output selection.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Column names of the input CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Time axis column.
    pub time_column: String,

    /// Internal-standard column.
    pub internal_standard_column: String,

    /// Row-marker column; used only if the file has it.
    pub marker_column: String,

    /// Columns starting with this prefix are analyte channels.
    pub channel_prefix: String,

    /// Explicit analyte channels; overrides the prefix when not empty.
    pub channels: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            time_column: "Time (min)".to_string(),
            internal_standard_column: "IS".to_string(),
            marker_column: "Marker".to_string(),
            channel_prefix: "Isomer".to_string(),
            channels: Vec::new(),
        }
    }
}

/// Output file selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Peak table columns; empty selects the default layout.
    pub fields: Vec<OutputField>,

    /// Peak table file name inside the output directory.
    pub peaks_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            peaks_file: "peaks.csv".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
