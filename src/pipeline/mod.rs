//! # Pipeline
//!
//! Runs the full analysis over one [`SampleSeries`]:
//!
//! ```text
//! window -> segment -> aggregate -> classify -> calibrate -> map wells -> heatmaps
//! ```
//!
//! Each run owns a fresh [`RunTotals`], so repeated runs over the same series give
//! identical results.
//!
//! ## Usage
//!
//! ```rust
//! use wellpeak::config::PipelineConfig;
//! use wellpeak::pipeline::PeakPipeline;
//! use wellpeak::series::SampleSeries;
//!
//! let series = SampleSeries::builder(
//!     vec![0.0, 0.1, 0.2, 0.3, 0.4],
//!     vec![0.0, 8.0, 9.0, 0.0, 0.0],
//! )
//! .channel("Isomer 57", vec![0.0, 4.0, 6.0, 0.0, 0.0])
//! .build()?;
//!
//! let output = PeakPipeline::new(PipelineConfig::default())?.run(&series)?;
//! assert_eq!(output.peaks.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod stats;

#[cfg(test)]
mod tests;

pub use error::PipelineError;
pub use stats::PipelineStats;

use log::info;
use serde::Serialize;

use crate::anomaly::{self, DurationAnomalies};
use crate::calibration::{self, Baselines};
use crate::config::{ConfigError, PipelineConfig};
use crate::peak::{Aggregator, Peak, RunTotals};
use crate::plate::{Heatmap, HeatmapBuilder, HeatmapStatus, WellCoordinate, WellMapper};
use crate::segment::{Segmentation, Segmenter};
use crate::series::SampleSeries;

/// Everything produced by one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Peaks in discovery order, calibrated if enabled.
    pub peaks: Vec<Peak>,
    /// Threshold and runs found on the internal standard.
    pub segmentation: Segmentation,
    /// Running totals accumulated during aggregation.
    pub totals: RunTotals,
    /// Merged and split candidates.
    pub anomalies: DurationAnomalies,
    /// One well per peak; `None` without a row-marker trace.
    pub wells: Option<Vec<WellCoordinate>>,
    /// Removed baselines; `None` when calibration is disabled.
    pub baselines: Option<Baselines>,
    /// One heatmap per configured channel, in configuration order.
    pub heatmaps: Vec<Heatmap>,
    /// Run counters.
    pub stats: PipelineStats,
}

impl PipelineOutput {
    /// Heatmap for a channel, if one was requested.
    pub fn heatmap(&self, channel: &str) -> Option<&Heatmap> {
        self.heatmaps.iter().find(|h| h.channel == channel)
    }

    /// Well assigned to a 1-based peak number.
    pub fn well(&self, peak_number: usize) -> Option<WellCoordinate> {
        let wells = self.wells.as_ref()?;
        peak_number.checked_sub(1).and_then(|i| wells.get(i)).copied()
    }
}

/// Per-invocation state.
#[derive(Debug, Default)]
struct RunContext {
    totals: RunTotals,
    stats: PipelineStats,
}

/// Configured pipeline, reusable across series.
#[derive(Debug, Clone)]
pub struct PeakPipeline {
    config: PipelineConfig,
    segmenter: Segmenter,
    mapper: WellMapper,
    heatmap_builder: HeatmapBuilder,
}

impl PeakPipeline {
    /// Validate the configuration and prepare every stage.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let segmenter = Segmenter::new(config.detection.threshold_fraction);
        let mapper = WellMapper::new(config.plate)?;
        let heatmap_builder =
            HeatmapBuilder::new(config.plate, config.heatmap.representative_droplet)?;
        Ok(Self {
            config,
            segmenter,
            mapper,
            heatmap_builder,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over `series`.
    pub fn run(&self, series: &SampleSeries) -> Result<PipelineOutput, PipelineError> {
        for channel in &self.config.heatmap.channels {
            if series.channel(channel).is_none() {
                return Err(PipelineError::UnknownChannel(channel.clone()));
            }
        }

        let windowed;
        let series = match self.config.window {
            Some(window) => {
                windowed = series.restrict_to_window(window.start, window.end)?;
                info!(
                    "Restricted to [{}, {}]: {} of {} samples",
                    window.start,
                    window.end,
                    windowed.len(),
                    series.len()
                );
                &windowed
            }
            None => series,
        };

        let mut context = RunContext::default();
        context.stats.samples = series.len();

        let segmentation = self.segmenter.segment(series.internal_standard());
        context.stats.threshold = segmentation.threshold;
        context.stats.samples_above_threshold = segmentation.above_count;

        let mut peaks = Aggregator::new(series).aggregate(&segmentation.runs, &mut context.totals);
        let anomalies = anomaly::classify(&peaks, &context.totals, &self.config.anomaly)?;

        let baselines = self
            .config
            .calibration
            .enabled
            .then(|| calibration::calibrate(&mut peaks));

        let wells = series.row_marker().map(|_| self.mapper.map(&peaks));

        let heatmaps: Vec<Heatmap> = self
            .config
            .heatmap
            .channels
            .iter()
            .map(|channel| {
                let values: Vec<f64> = peaks
                    .iter()
                    .map(|peak| peak.intensity(channel).unwrap_or(f64::NAN))
                    .collect();
                self.heatmap_builder.build(channel, &values)
            })
            .collect();

        let stats = &mut context.stats;
        stats.peaks = peaks.len();
        stats.mean_duration = anomalies.mean_duration;
        stats.merged_candidates = anomalies.merged.len();
        stats.split_candidates = anomalies.split.len();
        stats.row_starts = peaks.iter().filter(|p| p.is_row_start).count();
        stats.off_plate_wells = wells.as_ref().map_or(0, |wells| {
            wells
                .iter()
                .filter(|w| !w.is_on_plate(self.mapper.layout()))
                .count()
        });
        for heatmap in &heatmaps {
            match heatmap.status {
                HeatmapStatus::Complete => stats.complete_heatmaps += 1,
                HeatmapStatus::InsufficientData { .. } => stats.insufficient_heatmaps += 1,
            }
        }

        info!("{}", context.stats);

        Ok(PipelineOutput {
            peaks,
            segmentation,
            totals: context.totals,
            anomalies,
            wells,
            baselines,
            heatmaps,
            stats: context.stats,
        })
    }
}
