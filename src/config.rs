//! Pipeline configuration.
//!
//! Every section has documented defaults, so an empty TOML document or
//! `PipelineConfig::default()` gives a 96-well plate analysed with the stock
//! detection and anomaly parameters:
//!
//! ```toml
//! [detection]
//! threshold_fraction = 0.25
//!
//! [anomaly]
//! merged_factor = 1.5
//! split_factor = 0.55
//!
//! [plate]
//! rows = 8
//! columns = 12
//! droplets_per_well = 1
//!
//! [calibration]
//! enabled = true
//!
//! [heatmap]
//! channels = ["Isomer 57"]
//! representative_droplet = 1
//!
//! [window]
//! start = 0.5
//! end = 12.0
//! ```

use serde::{Deserialize, Serialize};

use crate::anomaly::AnomalyThresholds;
use crate::plate::PlateLayout;
use crate::segment::DEFAULT_THRESHOLD_FRACTION;

/// Invalid configuration, detected before any processing happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// More plate rows than addressable row letters
    #[error("plate has {rows} rows but at most {max} row letters are available")]
    TooManyRows {
        /// Requested rows
        rows: usize,
        /// Maximum supported rows
        max: usize,
    },

    /// A count parameter was zero
    #[error("{parameter} must be at least 1")]
    NonPositive {
        /// Name of the offending parameter
        parameter: &'static str,
    },

    /// A multiplier or fraction outside its valid range
    #[error("invalid {parameter}: {value}")]
    InvalidFactor {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Plate dimensions whose droplet count cannot be represented
    #[error(
        "plate of {rows} rows, {columns} columns and {droplets_per_well} droplets per well is too large"
    )]
    PlateTooLarge {
        /// Requested rows
        rows: usize,
        /// Requested columns
        columns: usize,
        /// Requested droplets per well
        droplets_per_well: usize,
    },

    /// Time window whose start lies after its end
    #[error("invalid time window: start {start} is after end {end}")]
    InvalidWindow {
        /// Window start
        start: f64,
        /// Window end
        end: f64,
    },
}

/// Droplet detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Fraction of the internal-standard mean used as the noise floor.
    pub threshold_fraction: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold_fraction: DEFAULT_THRESHOLD_FRACTION,
        }
    }
}

/// Baseline calibration switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Subtract per-channel minima from peak intensities.
    pub enabled: bool,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Heatmap generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Channels to render; empty disables heatmaps.
    pub channels: Vec<String>,
    /// Droplet within each well's block whose value represents the well.
    /// Taken modulo `droplets_per_well`.
    pub representative_droplet: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            representative_droplet: 1,
        }
    }
}

/// Acquisition time window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// First retained time.
    pub start: f64,
    /// Last retained time.
    pub end: f64,
}

impl TimeWindow {
    /// Reject NaN bounds and reversed windows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start.is_nan() || self.end.is_nan() || self.start > self.end {
            return Err(ConfigError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Droplet detection.
    pub detection: DetectionConfig,
    /// Duration anomaly factors.
    pub anomaly: AnomalyThresholds,
    /// Plate geometry.
    pub plate: PlateLayout,
    /// Baseline calibration.
    pub calibration: CalibrationConfig,
    /// Heatmap channels.
    pub heatmap: HeatmapConfig,
    /// Optional time window applied before detection.
    pub window: Option<TimeWindow>,
}

impl PipelineConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.detection.threshold_fraction;
        if !(fraction.is_finite() && fraction > 0.0) {
            return Err(ConfigError::InvalidFactor {
                parameter: "threshold_fraction",
                value: fraction,
            });
        }
        self.anomaly.validate()?;
        self.plate.validate()?;
        if let Some(window) = &self.window {
            window.validate()?;
        }
        Ok(())
    }
}
