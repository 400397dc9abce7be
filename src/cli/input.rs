//! CSV input for the analyze command.
//!
//! The file needs a header row. Empty cells read as NaN.

use anyhow::{anyhow, bail, Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use wellpeak::series::SampleSeries;

use super::config::InputConfig;

/// Read a sample series from a CSV file.
pub fn read_series_file(path: &Path, config: &InputConfig) -> Result<SampleSeries> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    read_series(file, config).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read a sample series from CSV text.
pub fn read_series<R: Read>(reader: R, config: &InputConfig) -> Result<SampleSeries> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers().context("Failed to read CSV header")?.clone();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let time_idx = column(&config.time_column)
        .ok_or_else(|| anyhow!("Missing time column: {}", config.time_column))?;
    let is_idx = column(&config.internal_standard_column).ok_or_else(|| {
        anyhow!(
            "Missing internal standard column: {}",
            config.internal_standard_column
        )
    })?;
    let marker_idx = column(&config.marker_column);
    if marker_idx.is_none() {
        warn!(
            "No {} column; wells will not be assigned",
            config.marker_column
        );
    }

    let channel_idx: Vec<(String, usize)> = if config.channels.is_empty() {
        headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.starts_with(&config.channel_prefix))
            .map(|(i, h)| (h.to_string(), i))
            .collect()
    } else {
        config
            .channels
            .iter()
            .map(|name| {
                column(name)
                    .map(|i| (name.clone(), i))
                    .ok_or_else(|| anyhow!("Missing channel column: {name}"))
            })
            .collect::<Result<_>>()?
    };
    if channel_idx.is_empty() {
        bail!(
            "No analyte channels: no column starts with \"{}\"",
            config.channel_prefix
        );
    }

    let mut time = Vec::new();
    let mut internal_standard = Vec::new();
    let mut marker = Vec::new();
    let mut channels: Vec<Vec<f64>> = vec![Vec::new(); channel_idx.len()];

    for (row, record) in csv.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", row + 2))?;
        let value = |idx: usize| -> Result<f64> {
            let cell = record.get(idx).unwrap_or("");
            parse_cell(cell).with_context(|| {
                format!("Invalid number {cell:?} in row {}, column {}", row + 2, &headers[idx])
            })
        };

        time.push(value(time_idx)?);
        internal_standard.push(value(is_idx)?);
        if let Some(idx) = marker_idx {
            marker.push(value(idx)?);
        }
        for (values, &(_, idx)) in channels.iter_mut().zip(&channel_idx) {
            values.push(value(idx)?);
        }
    }

    info!(
        "Read {} samples with {} channels",
        time.len(),
        channel_idx.len()
    );

    let mut builder = SampleSeries::builder(time, internal_standard);
    if marker_idx.is_some() {
        builder = builder.row_marker(marker);
    }
    for ((name, _), values) in channel_idx.into_iter().zip(channels) {
        builder = builder.channel(name, values);
    }
    builder.build().context("Input does not form a valid sample series")
}

fn parse_cell(cell: &str) -> Result<f64> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    Ok(cell.parse::<f64>()?)
}
