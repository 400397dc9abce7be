//! # Peak Aggregation
//!
//! Turns run boundaries into [`Peak`] records. One aggregator handles any number of
//! named analyte channels; channel order follows the input series so exported
//! columns are deterministic.
//!
//! For each run the aggregator reports:
//! - the mean of every analyte channel and of the internal standard,
//! - `duration = time[end] - time[start]` and the midpoint `center_time`,
//! - `is_row_start`, true when the run's mean row-marker value exceeds the global
//!   row-marker mean (always false when no marker channel was recorded).

mod aggregator;
mod types;


pub use aggregator::{run_mean, Aggregator, RunTotals};
pub use types::{ChannelIntensities, Peak};
