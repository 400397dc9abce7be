use log::debug;
use serde::Serialize;

use crate::segment::RunBounds;
use crate::series::{nan_mean, SampleSeries};

use super::types::{ChannelIntensities, Peak};

/// Running totals accumulated while peaks are aggregated.
///
/// Scoped to one pipeline invocation; the anomaly classifier reads the mean
/// duration from here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunTotals {
    /// Number of peaks aggregated.
    pub peak_count: usize,
    /// Sum of all peak durations.
    pub total_duration: f64,
}

impl RunTotals {
    /// Account for one aggregated peak.
    pub fn record(&mut self, duration: f64) {
        self.peak_count += 1;
        self.total_duration += duration;
    }

    /// Mean peak duration, `None` when no peak was recorded.
    pub fn mean_duration(&self) -> Option<f64> {
        (self.peak_count > 0).then(|| self.total_duration / self.peak_count as f64)
    }
}

/// Builds one [`Peak`] per run from the raw series.
#[derive(Debug)]
pub struct Aggregator<'a> {
    series: &'a SampleSeries,
    marker_mean: Option<f64>,
}

impl<'a> Aggregator<'a> {
    /// Prepare an aggregator; the global row-marker mean is computed once here.
    pub fn new(series: &'a SampleSeries) -> Self {
        let marker_mean = series.row_marker().map(nan_mean);
        Self {
            series,
            marker_mean,
        }
    }

    /// Global NaN-skipping row-marker mean, if a marker channel exists.
    pub fn marker_mean(&self) -> Option<f64> {
        self.marker_mean
    }

    /// Aggregate every run into a peak, numbered from 1 in run order.
    pub fn aggregate(&self, runs: &[RunBounds], totals: &mut RunTotals) -> Vec<Peak> {
        let time = self.series.time();
        let internal_standard = self.series.internal_standard();
        let channel_means = self.channel_means(runs);

        let mut peaks = Vec::with_capacity(runs.len());
        for (k, &run) in runs.iter().enumerate() {
            let first = time[run.start];
            let last = time[run.end];
            let duration = last - first;
            totals.record(duration);

            let channel_intensities: ChannelIntensities = self
                .series
                .channel_names()
                .zip(&channel_means)
                .map(|(name, means)| (name, means[k]))
                .collect();

            let is_row_start = match (self.series.row_marker(), self.marker_mean) {
                (Some(marker), Some(mean)) => run_mean(marker, run) > mean,
                _ => false,
            };

            peaks.push(Peak {
                peak_number: k + 1,
                center_time: (first + last) / 2.0,
                duration,
                channel_intensities,
                internal_standard: run_mean(internal_standard, run),
                is_row_start,
                bounds: run,
            });
        }

        debug!(
            "Aggregated {} peaks over {} channels",
            peaks.len(),
            channel_means.len()
        );
        peaks
    }

    /// Per-channel run means, indexed `[channel][run]`.
    fn channel_means(&self, runs: &[RunBounds]) -> Vec<Vec<f64>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.series
                .channels()
                .par_iter()
                .map(|channel| runs.iter().map(|&run| run_mean(&channel.values, run)).collect())
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.series
                .channels()
                .iter()
                .map(|channel| runs.iter().map(|&run| run_mean(&channel.values, run)).collect())
                .collect()
        }
    }
}

/// Arithmetic mean of `values` over an inclusive run.
pub fn run_mean(values: &[f64], run: RunBounds) -> f64 {
    let sum: f64 = values[run.start..=run.end].iter().sum();
    sum / run.sample_count() as f64
}
