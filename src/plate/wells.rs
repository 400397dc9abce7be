use std::fmt;

use log::{debug, warn};
use serde::{Serialize, Serializer};

use crate::config::ConfigError;
use crate::peak::Peak;

use super::layout::{row_letter, PlateLayout};

/// Plate position assigned to a peak.
///
/// `column` is signed: if a row marker is missed the column counter keeps counting
/// down past 1 instead of dropping the peak. Use [`WellCoordinate::is_on_plate`] to
/// detect such assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WellCoordinate {
    /// Zero-based row index (`0` is row `A`).
    pub row_index: usize,
    /// One-based column number.
    pub column: i64,
}

impl WellCoordinate {
    /// Row letter, or `None` when the row index is past the last letter.
    pub fn row_letter(&self) -> Option<char> {
        row_letter(self.row_index)
    }

    /// True when the row exists and the column lies within `1..=columns`.
    pub fn is_on_plate(&self, layout: &PlateLayout) -> bool {
        self.row_index < layout.rows
            && self.column >= 1
            && self.column <= layout.columns as i64
    }
}

impl fmt::Display for WellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_letter() {
            Some(letter) => write!(f, "{letter}{}", self.column),
            None => write!(f, "[{}]{}", self.row_index, self.column),
        }
    }
}

impl Serialize for WellCoordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Position while walking the peak sequence.
///
/// Acquisition starts at the last row and the last column and moves toward `A1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WellCursor {
    row_index: usize,
    column: i64,
}

impl WellCursor {
    fn start(layout: &PlateLayout) -> Self {
        Self {
            row_index: layout.rows - 1,
            column: layout.columns as i64,
        }
    }

    fn next_row(&mut self, layout: &PlateLayout) {
        self.row_index = match self.row_index {
            0 => layout.rows - 1,
            row => row - 1,
        };
        self.column = layout.columns as i64;
    }

    fn next_well(&mut self) {
        self.column -= 1;
    }

    fn coordinate(&self) -> WellCoordinate {
        WellCoordinate {
            row_index: self.row_index,
            column: self.column,
        }
    }
}

/// Assigns a well to every peak from row-start edges and droplet grouping.
#[derive(Debug, Clone, Copy)]
pub struct WellMapper {
    layout: PlateLayout,
}

impl WellMapper {
    /// Create a mapper; the layout is validated before any mapping happens.
    pub fn new(layout: PlateLayout) -> Result<Self, ConfigError> {
        layout.validate()?;
        Ok(Self { layout })
    }

    /// Layout used for mapping.
    pub fn layout(&self) -> &PlateLayout {
        &self.layout
    }

    /// One well per peak, in peak order.
    pub fn map(&self, peaks: &[Peak]) -> Vec<WellCoordinate> {
        let row_starts: Vec<bool> = peaks.iter().map(|peak| peak.is_row_start).collect();
        self.map_row_starts(&row_starts)
    }

    /// One well per row-start flag.
    ///
    /// A rising edge (`true` after `false`) moves to the next row and restarts at the
    /// last column; the first peak is never treated as an edge. Otherwise every
    /// `droplets_per_well`-th peak moves one column toward column 1.
    pub fn map_row_starts(&self, row_starts: &[bool]) -> Vec<WellCoordinate> {
        let droplets = self.layout.droplets_per_well;
        let mut cursor = WellCursor::start(&self.layout);
        let mut wells = Vec::with_capacity(row_starts.len());

        for (i, &row_start) in row_starts.iter().enumerate() {
            let rising_edge = i > 0 && row_start && !row_starts[i - 1];
            if rising_edge {
                cursor.next_row(&self.layout);
                debug!("Peak {} starts at well {}", i + 1, cursor.coordinate());
            } else if i > 0 && i % droplets == 0 {
                cursor.next_well();
            }
            wells.push(cursor.coordinate());
        }

        let off_plate = wells
            .iter()
            .filter(|well| !well.is_on_plate(&self.layout))
            .count();
        if off_plate > 0 {
            warn!(
                "{off_plate} peaks mapped past column 1; a row marker was probably missed"
            );
        }

        wells
    }
}
