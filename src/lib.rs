//! # wellpeak - Droplet Peak Analysis for Well-Plate Mass Spectrometry
//!
//! `wellpeak` turns a multi-channel intensity time series, recorded while
//! droplets from a well plate pass a mass spectrometer, into one peak per
//! droplet with per-channel mean intensities, flags droplets whose duration looks
//! wrong, assigns each droplet to a plate well and arranges per-well values into
//! heatmaps.
//!
//! ## Key Features
//!
//! - **Threshold segmentation**: the internal-standard trace is cut into runs at a
//!   fraction of its mean, using an explicit `Outside`/`Inside` state machine.
//!
//! - **Ordered channels**: any number of analyte channels is aggregated, in the
//!   order the input supplies them.
//!
//! - **Baseline calibration**: each channel's smallest peak intensity is removed;
//!   the baselines are kept so uncalibrated values remain available.
//!
//! - **Anomaly flags**: merged and split droplet candidates relative to the mean
//!   duration, with configurable factors.
//!
//! - **Plate mapping**: row-marker edges and droplet grouping yield a well label
//!   per peak and per-channel plate heatmaps.
//!
//! ## Quick Start
//!
//! ```rust
//! use wellpeak::prelude::*;
//!
//! let series = SampleSeries::builder(
//!     vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
//!     vec![0.0, 9.0, 10.0, 0.0, 8.0, 9.0, 0.0],
//! )
//! .row_marker(vec![0.0, 4.0, 4.0, 0.0, 0.0, 0.0, 0.0])
//! .channel("Isomer 57", vec![0.0, 120.0, 140.0, 0.0, 60.0, 80.0, 0.0])
//! .build()?;
//!
//! let mut config = PipelineConfig::default();
//! config.plate = PlateLayout::new(1, 2, 1);
//!
//! let output = PeakPipeline::new(config)?.run(&series)?;
//! assert_eq!(output.peaks.len(), 2);
//!
//! let table = PeakTable::new(&output, &OutputField::default_fields(["Isomer 57"], true))?;
//! let mut csv = Vec::new();
//! table.write_csv(&mut csv)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`series`]: validated input series
//! - [`segment`]: run detection on the internal standard
//! - [`peak`]: per-run aggregation
//! - [`calibration`]: per-channel baseline removal
//! - [`anomaly`]: merged/split classification
//! - [`plate`]: well mapping and heatmaps
//! - [`pipeline`]: orchestration of all stages
//! - [`report`]: CSV export and run summaries
//! - [`config`]: configuration and its validation

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod anomaly;
pub mod calibration;
pub mod config;
pub mod peak;
pub mod pipeline;
pub mod plate;
pub mod report;
pub mod segment;
pub mod series;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::anomaly::{classify, AnomalyThresholds, DurationAnomalies, NoPeaksError};
    pub use crate::calibration::{calibrate, Baselines};
    pub use crate::config::{ConfigError, PipelineConfig, TimeWindow};
    pub use crate::peak::{Aggregator, ChannelIntensities, Peak, RunTotals};
    pub use crate::pipeline::{PeakPipeline, PipelineError, PipelineOutput, PipelineStats};
    pub use crate::plate::{
        Heatmap, HeatmapBuilder, HeatmapStatus, PlateLayout, WellCoordinate, WellMapper,
    };
    pub use crate::report::{OutputField, PeakTable, ReportError, RunSummary};
    pub use crate::segment::{RunBounds, Segmentation, Segmenter};
    pub use crate::series::{InputShapeError, SampleSeries};
}
