//! Plate geometry: well assignment and per-well heatmaps.
//!
//! Droplets are collected from the last well of the last row backwards to `A1`.
//! A rising row-marker edge starts a new row; within a row every
//! `droplets_per_well` consecutive peaks share a well.

mod heatmap;
mod layout;
mod wells;

pub use heatmap::{Heatmap, HeatmapBuilder, HeatmapStatus};
pub use layout::{row_letter, PlateLayout, MAX_ROWS, ROW_LETTERS};
pub use wells::{WellCoordinate, WellMapper};
