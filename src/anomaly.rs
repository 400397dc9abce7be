//! Duration anomaly classification.
//!
//! A droplet whose run lasts much longer than the average is a candidate for two
//! droplets fused together; one that is much shorter is a candidate for a droplet
//! split by noise dipping under the threshold. Both comparisons are strict, so a
//! duration exactly at a factor boundary is not flagged.

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::peak::{Peak, RunTotals};

/// Default multiplier of the mean duration above which a peak is a merged candidate.
pub const DEFAULT_MERGED_FACTOR: f64 = 1.5;

/// Default multiplier of the mean duration below which a peak is a split candidate.
pub const DEFAULT_SPLIT_FACTOR: f64 = 0.55;

/// No run was detected, so the mean duration is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no peaks detected: internal standard never rose above the noise floor")]
pub struct NoPeaksError;

/// Multipliers of the mean duration used to flag anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    /// Peaks longer than `merged_factor * mean` are merged candidates.
    pub merged_factor: f64,
    /// Peaks shorter than `split_factor * mean` are split candidates.
    pub split_factor: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            merged_factor: DEFAULT_MERGED_FACTOR,
            split_factor: DEFAULT_SPLIT_FACTOR,
        }
    }
}

impl AnomalyThresholds {
    /// Check that both factors are positive and finite and do not overlap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("merged_factor", self.merged_factor),
            ("split_factor", self.split_factor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidFactor {
                    parameter: name,
                    value,
                });
            }
        }
        if self.split_factor >= self.merged_factor {
            return Err(ConfigError::InvalidFactor {
                parameter: "split_factor",
                value: self.split_factor,
            });
        }
        Ok(())
    }
}

/// Merged and split candidates for one run set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationAnomalies {
    /// Mean duration over all peaks.
    pub mean_duration: f64,
    /// Peak numbers of merged candidates, ascending.
    pub merged: Vec<usize>,
    /// Peak numbers of split candidates, ascending.
    pub split: Vec<usize>,
}

impl DurationAnomalies {
    /// Total number of flagged peaks.
    pub fn flagged_count(&self) -> usize {
        self.merged.len() + self.split.len()
    }
}

/// Classify peaks against the mean duration carried in `totals`.
pub fn classify(
    peaks: &[Peak],
    totals: &RunTotals,
    thresholds: &AnomalyThresholds,
) -> Result<DurationAnomalies, NoPeaksError> {
    let mean_duration = totals.mean_duration().ok_or(NoPeaksError)?;
    let merged_limit = thresholds.merged_factor * mean_duration;
    let split_limit = thresholds.split_factor * mean_duration;

    let mut merged = Vec::new();
    let mut split = Vec::new();
    for peak in peaks {
        if peak.duration > merged_limit {
            merged.push(peak.peak_number);
        } else if peak.duration < split_limit {
            split.push(peak.peak_number);
        }
    }

    info!(
        "Mean duration {:.4}: {} merged candidates, {} split candidates",
        mean_duration,
        merged.len(),
        split.len()
    );

    Ok(DurationAnomalies {
        mean_duration,
        merged,
        split,
    })
}
