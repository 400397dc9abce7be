//! # Run Segmentation
//!
//! Splits the internal-standard trace into droplet runs. A sample is "above" when it
//! exceeds a fixed fraction of the trace's NaN-skipping mean; a run is a maximal block
//! of above samples.
//!
//! Run discovery inspects both neighbours of a sample, so only indices `1..=N-2` can
//! start or end a run. A run touching sample 0 or sample N-1 is never reported. This
//! is a known edge bias: keep droplets away from the first and last sample of an
//! acquisition.

use log::debug;
use serde::Serialize;

use crate::series::nan_mean;

/// Default fraction of the mean internal-standard level used as the noise floor.
pub const DEFAULT_THRESHOLD_FRACTION: f64 = 0.25;

/// Inclusive sample-index bounds of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RunBounds {
    /// First sample of the run.
    pub start: usize,
    /// Last sample of the run.
    pub end: usize,
}

impl RunBounds {
    /// Number of samples in the run.
    pub fn sample_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Segmentation state while scanning the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not inside a run.
    Outside,
    /// Inside a run that began at `start`.
    Inside {
        /// First sample of the open run.
        start: usize,
    },
}

/// Edge event observed at a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEdge {
    /// Sample is above and its predecessor is not.
    Rising,
    /// Sample is above and its successor is not.
    Falling,
}

impl RunEdge {
    /// Edge events at interior index `i`, rising before falling.
    ///
    /// A single-sample run produces both events at the same index.
    pub fn at(mask: &[bool], i: usize) -> impl Iterator<Item = RunEdge> {
        let here = mask[i];
        let rising = here && !mask[i - 1];
        let falling = here && !mask[i + 1];
        [
            rising.then_some(RunEdge::Rising),
            falling.then_some(RunEdge::Falling),
        ]
        .into_iter()
        .flatten()
    }
}

impl RunState {
    /// Apply one edge event at sample `index`, returning the closed run if any.
    pub fn transition(self, edge: RunEdge, index: usize) -> (RunState, Option<RunBounds>) {
        match (self, edge) {
            (RunState::Outside, RunEdge::Rising) | (RunState::Inside { .. }, RunEdge::Rising) => {
                (RunState::Inside { start: index }, None)
            }
            (RunState::Inside { start }, RunEdge::Falling) => (
                RunState::Outside,
                Some(RunBounds { start, end: index }),
            ),
            // The run began at sample 0 and has no rising edge.
            (RunState::Outside, RunEdge::Falling) => (RunState::Outside, None),
        }
    }
}

/// Noise floor for a trace: `nan_mean(values) * fraction`.
pub fn detection_threshold(values: &[f64], fraction: f64) -> f64 {
    nan_mean(values) * fraction
}

/// Boolean mask of samples strictly above `threshold`. NaN samples are never above.
pub fn above_threshold_mask(values: &[f64], threshold: f64) -> Vec<bool> {
    values.iter().map(|&v| v > threshold).collect()
}

/// Ordered run bounds for a mask. Runs touching the first or last sample are dropped.
pub fn find_runs(mask: &[bool]) -> Vec<RunBounds> {
    if mask.len() < 3 {
        return Vec::new();
    }

    let (_, runs) = (1..mask.len() - 1)
        .flat_map(|i| RunEdge::at(mask, i).map(move |edge| (i, edge)))
        .fold(
            (RunState::Outside, Vec::new()),
            |(state, mut runs), (i, edge)| {
                let (next, closed) = state.transition(edge, i);
                runs.extend(closed);
                (next, runs)
            },
        );
    runs
}

/// Result of segmenting one internal-standard trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segmentation {
    /// Noise floor that samples had to exceed.
    pub threshold: f64,
    /// Number of samples above the noise floor, edges included.
    pub above_count: usize,
    /// Runs in increasing index order.
    pub runs: Vec<RunBounds>,
}

/// Fixed-threshold segmenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segmenter {
    threshold_fraction: f64,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            threshold_fraction: DEFAULT_THRESHOLD_FRACTION,
        }
    }
}

impl Segmenter {
    /// Create a segmenter with a custom noise-floor fraction.
    pub fn new(threshold_fraction: f64) -> Self {
        Self { threshold_fraction }
    }

    /// Noise-floor fraction in use.
    pub fn threshold_fraction(&self) -> f64 {
        self.threshold_fraction
    }

    /// Segment an internal-standard trace into runs.
    pub fn segment(&self, internal_standard: &[f64]) -> Segmentation {
        let threshold = detection_threshold(internal_standard, self.threshold_fraction);
        let mask = above_threshold_mask(internal_standard, threshold);
        let runs = find_runs(&mask);
        let above_count = mask.iter().filter(|&&above| above).count();

        debug!(
            "Segmented {} samples at threshold {:.3}: {} above, {} runs",
            internal_standard.len(),
            threshold,
            above_count,
            runs.len()
        );

        Segmentation {
            threshold,
            above_count,
            runs,
        }
    }
}
