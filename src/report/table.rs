use std::fmt;
use std::io::Write;

use log::debug;

use crate::peak::Peak;
use crate::pipeline::PipelineOutput;
use crate::plate::{row_letter, Heatmap};

use super::fields::{OutputField, Rounding};
use super::ReportError;

/// Round half to even at three decimals.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

/// Round half to even to the nearest integer.
pub fn round_integer(value: f64) -> f64 {
    value.round_ties_even()
}

/// One exported value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Peak number
    Count(usize),
    /// Rounded measurement
    Number(f64),
    /// Well label
    Text(String),
    /// Padding or missing value
    Empty,
}

impl Cell {
    fn number(value: f64, rounding: Rounding) -> Self {
        if value.is_nan() {
            return Cell::Empty;
        }
        Cell::Number(match rounding {
            Rounding::Decimals3 => round3(value),
            Rounding::Integer => round_integer(value),
            Rounding::None => value,
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Count(n) => write!(f, "{n}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

/// Peak table with caller-selected columns, rounded for export.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakTable {
    fields: Vec<OutputField>,
    rows: Vec<Vec<Cell>>,
}

impl PeakTable {
    /// Build the table for `fields` over a pipeline output.
    ///
    /// Every channel-specific field must name a channel carried by the peaks.
    pub fn new(output: &PipelineOutput, fields: &[OutputField]) -> Result<Self, ReportError> {
        if let Some(first) = output.peaks.first() {
            for channel in fields.iter().filter_map(OutputField::channel) {
                if first.intensity(channel).is_none() {
                    return Err(ReportError::UnknownChannel(channel.to_string()));
                }
            }
        }

        let rows = output
            .peaks
            .iter()
            .enumerate()
            .map(|(i, peak)| {
                fields
                    .iter()
                    .map(|field| {
                        let rounding = field.rounding();
                        match field {
                            OutputField::PeakNumber => Cell::Count(peak.peak_number),
                            OutputField::CenterTime => Cell::number(peak.center_time, rounding),
                            OutputField::Duration => Cell::number(peak.duration, rounding),
                            OutputField::Intensity(c) => Cell::number(intensity(peak, c), rounding),
                            OutputField::UncalibratedIntensity(c) => {
                                let calibrated = intensity(peak, c);
                                let raw = output
                                    .baselines
                                    .as_ref()
                                    .and_then(|b| b.uncalibrated(c, calibrated))
                                    .unwrap_or(calibrated);
                                Cell::number(raw, rounding)
                            }
                            OutputField::InternalStandard => {
                                Cell::number(peak.internal_standard, rounding)
                            }
                            OutputField::Fraction(c) => Cell::number(
                                intensity(peak, c) / peak.channel_intensities.total(),
                                rounding,
                            ),
                            OutputField::Yield => Cell::number(
                                peak.channel_intensities.total() / peak.internal_standard,
                                rounding,
                            ),
                            OutputField::StandardRatio(c) => {
                                Cell::number(intensity(peak, c) / peak.internal_standard, rounding)
                            }
                            OutputField::PotentialMerged => padded(&output.anomalies.merged, i),
                            OutputField::PotentialSplit => padded(&output.anomalies.split, i),
                            OutputField::Well => output
                                .wells
                                .as_ref()
                                .and_then(|wells| wells.get(i))
                                .map_or(Cell::Empty, |well| Cell::Text(well.to_string())),
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            fields: fields.to_vec(),
            rows,
        })
    }

    /// Column fields.
    pub fn fields(&self) -> &[OutputField] {
        &self.fields
    }

    /// Rows, one per peak.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at a row and field, if both exist.
    pub fn cell(&self, row: usize, field: &OutputField) -> Option<&Cell> {
        let col = self.fields.iter().position(|f| f == field)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.fields.iter().map(OutputField::header))?;
        for row in &self.rows {
            csv.write_record(row.iter().map(Cell::to_string))?;
        }
        csv.flush()?;
        debug!("Wrote {} peak rows", self.rows.len());
        Ok(())
    }
}

fn intensity(peak: &Peak, channel: &str) -> f64 {
    peak.intensity(channel).unwrap_or(f64::NAN)
}

/// Entry `i` of a candidate list, or an empty cell past its end.
fn padded(candidates: &[usize], i: usize) -> Cell {
    candidates.get(i).map_or(Cell::Empty, |&n| Cell::Count(n))
}

/// Write a heatmap as CSV: a `row` column with the row letter, then one column per
/// plate column. Values are rounded to integers.
pub fn write_heatmap_csv<W: Write>(heatmap: &Heatmap, writer: W) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["row".to_string()];
    header.extend((1..=heatmap.cols).map(|c| c.to_string()));
    csv.write_record(&header)?;

    for (r, line) in heatmap.values.iter().enumerate() {
        let mut record = vec![row_letter(r).map(String::from).unwrap_or_default()];
        record.extend(
            line.iter()
                .map(|&v| Cell::number(v, Rounding::Integer).to_string()),
        );
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}
