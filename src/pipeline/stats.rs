use std::fmt;

use serde::Serialize;

/// Counters collected during one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    /// Samples analysed after the time window was applied
    pub samples: usize,

    /// Samples above the detection threshold
    pub samples_above_threshold: usize,

    /// Detection threshold on the internal standard
    pub threshold: f64,

    /// Peaks aggregated
    pub peaks: usize,

    /// Mean peak duration
    pub mean_duration: f64,

    /// Merged candidates
    pub merged_candidates: usize,

    /// Split candidates
    pub split_candidates: usize,

    /// Peaks flagged as row starts
    pub row_starts: usize,

    /// Wells assigned outside the plate's columns
    pub off_plate_wells: usize,

    /// Heatmaps built from measured values
    pub complete_heatmaps: usize,

    /// Heatmaps replaced by zeros for lack of peaks
    pub insufficient_heatmaps: usize,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pipeline: {} samples, {} peaks (mean duration {:.3}), {} merged, {} split, {} row starts",
            self.samples,
            self.peaks,
            self.mean_duration,
            self.merged_candidates,
            self.split_candidates,
            self.row_starts
        )
    }
}
