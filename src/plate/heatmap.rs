use log::{debug, warn};
use serde::Serialize;

use crate::config::ConfigError;

use super::layout::PlateLayout;

/// Whether a heatmap carries measured values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeatmapStatus {
    /// Every well has a value.
    Complete,
    /// Too few peaks to fill the plate; all values are zero.
    InsufficientData {
        /// Peaks needed for a full plate
        required: usize,
        /// Peaks available
        available: usize,
    },
}

/// Per-well values of one channel.
///
/// `values[r][c]` belongs to the well in row letter `r` and column `c + 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    /// Channel the values come from.
    pub channel: String,
    /// Matrix rows.
    pub rows: usize,
    /// Matrix columns.
    pub cols: usize,
    /// Row-major values.
    pub values: Vec<Vec<f64>>,
    /// Data completeness.
    pub status: HeatmapStatus,
}

impl Heatmap {
    fn zeros(channel: &str, rows: usize, cols: usize, status: HeatmapStatus) -> Self {
        Self {
            channel: channel.to_string(),
            rows,
            cols,
            values: vec![vec![0.0; cols]; rows],
            status,
        }
    }

    /// Value at a zero-based row and column.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|line| line.get(col)).copied()
    }

    /// Returns true if the matrix was built from measured values.
    pub fn is_complete(&self) -> bool {
        self.status == HeatmapStatus::Complete
    }

    /// Column-major view, `cols × rows`.
    pub fn transposed(&self) -> Vec<Vec<f64>> {
        (0..self.cols)
            .map(|c| self.values.iter().map(|line| line[c]).collect())
            .collect()
    }
}

/// Builds a plate heatmap from per-peak values.
#[derive(Debug, Clone, Copy)]
pub struct HeatmapBuilder {
    layout: PlateLayout,
    representative_droplet: usize,
}

impl HeatmapBuilder {
    /// Create a builder for a validated layout.
    pub fn new(layout: PlateLayout, representative_droplet: usize) -> Result<Self, ConfigError> {
        layout.validate()?;
        Ok(Self {
            layout,
            representative_droplet,
        })
    }

    /// Offset of the droplet used for each well, within its droplet block.
    pub fn droplet_offset(&self) -> usize {
        self.representative_droplet % self.layout.droplets_per_well
    }

    /// Arrange per-peak `values` (in peak order) into a plate matrix.
    ///
    /// Peaks arrive from the last well to `A1`, so the values are walked in reverse.
    /// Only the last `rows * cols * droplets_per_well` peaks are used.
    pub fn build(&self, channel: &str, values: &[f64]) -> Heatmap {
        let PlateLayout {
            rows,
            columns,
            droplets_per_well,
        } = self.layout;
        let required = self.layout.droplet_capacity();

        if values.len() < required {
            warn!(
                "Heatmap for {channel}: {} peaks available, {required} required; returning zeros",
                values.len()
            );
            return Heatmap::zeros(
                channel,
                rows,
                columns,
                HeatmapStatus::InsufficientData {
                    required,
                    available: values.len(),
                },
            );
        }

        let offset = self.droplet_offset();
        let reversed: Vec<f64> = values.iter().rev().take(required).copied().collect();
        let grid: Vec<Vec<f64>> = reversed
            .chunks(columns * droplets_per_well)
            .map(|line| {
                line.chunks(droplets_per_well)
                    .map(|droplets| droplets[offset])
                    .collect()
            })
            .collect();

        debug!("Heatmap for {channel}: {rows}x{columns} from {required} peaks");
        Heatmap {
            channel: channel.to_string(),
            rows,
            cols: columns,
            values: grid,
            status: HeatmapStatus::Complete,
        }
    }
}
