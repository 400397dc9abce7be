use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Row letters addressable on a plate, top row first.
pub const ROW_LETTERS: [char; 15] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
];

/// Maximum number of plate rows.
pub const MAX_ROWS: usize = ROW_LETTERS.len();

/// Plate geometry and droplet grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateLayout {
    /// Number of plate rows (at most [`MAX_ROWS`]).
    pub rows: usize,
    /// Number of plate columns.
    pub columns: usize,
    /// Consecutive droplets collected from each well.
    pub droplets_per_well: usize,
}

impl Default for PlateLayout {
    /// A 96-well plate sampled once per well.
    fn default() -> Self {
        Self {
            rows: 8,
            columns: 12,
            droplets_per_well: 1,
        }
    }
}

impl PlateLayout {
    /// Create a layout without validating it.
    pub fn new(rows: usize, columns: usize, droplets_per_well: usize) -> Self {
        Self {
            rows,
            columns,
            droplets_per_well,
        }
    }

    /// Fail fast on zero parameters or more rows than there are letters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (parameter, value) in [
            ("rows", self.rows),
            ("columns", self.columns),
            ("droplets_per_well", self.droplets_per_well),
        ] {
            if value == 0 {
                return Err(ConfigError::NonPositive { parameter });
            }
        }
        if self.rows > MAX_ROWS {
            return Err(ConfigError::TooManyRows {
                rows: self.rows,
                max: MAX_ROWS,
            });
        }
        let capacity = self
            .rows
            .checked_mul(self.columns)
            .and_then(|wells| wells.checked_mul(self.droplets_per_well));
        if capacity.is_none() || i64::try_from(self.columns).is_err() {
            return Err(ConfigError::PlateTooLarge {
                rows: self.rows,
                columns: self.columns,
                droplets_per_well: self.droplets_per_well,
            });
        }
        Ok(())
    }

    /// Number of wells on the plate.
    pub fn well_count(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    /// Peaks needed to fill every well with its droplets.
    pub fn droplet_capacity(&self) -> usize {
        self.well_count().saturating_mul(self.droplets_per_well)
    }
}

/// Letter for a zero-based row index, if addressable.
pub fn row_letter(row_index: usize) -> Option<char> {
    ROW_LETTERS.get(row_index).copied()
}
