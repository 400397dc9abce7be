//! # Report
//!
//! Export of pipeline results: a peak table with named [`OutputField`] columns,
//! per-channel heatmap tables and a [`RunSummary`] for the terminal.
//!
//! Time-derived values and ratios are rounded to three decimals, intensities to
//! integers, both half to even.

mod fields;
mod summary;
mod table;


pub use fields::{OutputField, Rounding};
pub use summary::{HeatmapLine, RunSummary};
pub use table::{round3, round_integer, write_heatmap_csv, Cell, PeakTable};

/// Errors that can occur while exporting results
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the CSV writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output field names a channel the peaks do not carry
    #[error("Unknown channel in output field: {0}")]
    UnknownChannel(String),

    /// Output field key could not be parsed
    #[error("Invalid output field: {0}")]
    InvalidField(String),
}
