//! Input sample series and its shape contract.
//!
//! A [`SampleSeries`] holds the parallel arrays produced by the instrument export:
//! timestamps, the internal-standard trace, an optional row-marker trace and one or
//! more named analyte channels. Every array shares the same sample index.
//!
//! Invariants (checked by [`SampleSeriesBuilder::build`]):
//! - All arrays have identical lengths and the series is not empty.
//! - At least one analyte channel is present and channel names are unique.
//! - Channel order is the insertion order and is preserved through the pipeline.

/// Errors returned when the input series violates the shape contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputShapeError {
    /// The series contains no samples.
    #[error("sample series is empty")]
    Empty,

    /// No analyte channel was supplied.
    #[error("sample series has no analyte channels")]
    NoChannels,

    /// An array does not share the time axis length.
    #[error("{name} length {found} does not match time length {expected}")]
    LengthMismatch {
        /// Name of the offending array.
        name: String,
        /// Length of the time array.
        expected: usize,
        /// Length of the offending array.
        found: usize,
    },

    /// Two analyte channels share a name.
    #[error("duplicate channel name: {0}")]
    DuplicateChannel(String),

    /// A channel required by the caller is absent.
    #[error("missing required channel: {0}")]
    MissingChannel(String),
}

/// One named analyte trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Channel name as it appears in the source export.
    pub name: String,
    /// One value per sample.
    pub values: Vec<f64>,
}

/// Validated multi-channel time series.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    time: Vec<f64>,
    internal_standard: Vec<f64>,
    row_marker: Option<Vec<f64>>,
    channels: Vec<Channel>,
}

impl SampleSeries {
    /// Start building a series from its time axis and internal-standard trace.
    pub fn builder(time: Vec<f64>, internal_standard: Vec<f64>) -> SampleSeriesBuilder {
        SampleSeriesBuilder {
            time,
            internal_standard,
            row_marker: None,
            channels: Vec::new(),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the series holds no samples (never true for a built series).
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample timestamps.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Internal-standard trace.
    pub fn internal_standard(&self) -> &[f64] {
        &self.internal_standard
    }

    /// Row-marker trace, if the acquisition recorded one.
    pub fn row_marker(&self) -> Option<&[f64]> {
        self.row_marker.as_deref()
    }

    /// Analyte channels in insertion order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Channel names in insertion order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }

    /// Look up a channel by name.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Fail with [`InputShapeError::MissingChannel`] unless every name is present.
    pub fn require_channels<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), InputShapeError> {
        for name in names {
            if self.channel(name).is_none() {
                return Err(InputShapeError::MissingChannel(name.to_string()));
            }
        }
        Ok(())
    }

    /// Keep only samples with `start <= time <= end`.
    ///
    /// The window must not cut through a droplet, otherwise the truncated run is
    /// either dropped by the edge rule or reported with a shortened duration.
    pub fn restrict_to_window(&self, start: f64, end: f64) -> Result<SampleSeries, InputShapeError> {
        let keep: Vec<usize> = self
            .time
            .iter()
            .enumerate()
            .filter(|(_, t)| **t >= start && **t <= end)
            .map(|(i, _)| i)
            .collect();

        let pick = |values: &[f64]| keep.iter().map(|&i| values[i]).collect::<Vec<f64>>();

        let mut builder = SampleSeries::builder(pick(&self.time), pick(&self.internal_standard));
        if let Some(marker) = &self.row_marker {
            builder = builder.row_marker(pick(marker));
        }
        for channel in &self.channels {
            builder = builder.channel(channel.name.clone(), pick(&channel.values));
        }
        builder.build()
    }
}

/// Builder enforcing the [`SampleSeries`] shape contract.
#[derive(Debug, Clone)]
pub struct SampleSeriesBuilder {
    time: Vec<f64>,
    internal_standard: Vec<f64>,
    row_marker: Option<Vec<f64>>,
    channels: Vec<Channel>,
}

impl SampleSeriesBuilder {
    /// Attach the row-marker trace.
    pub fn row_marker(mut self, values: Vec<f64>) -> Self {
        self.row_marker = Some(values);
        self
    }

    /// Append a named analyte channel.
    pub fn channel(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.channels.push(Channel {
            name: name.into(),
            values,
        });
        self
    }

    /// Validate the contract and produce the series.
    pub fn build(self) -> Result<SampleSeries, InputShapeError> {
        let expected = self.time.len();
        if expected == 0 {
            return Err(InputShapeError::Empty);
        }

        check_len("internal_standard", &self.internal_standard, expected)?;
        if let Some(marker) = &self.row_marker {
            check_len("row_marker", marker, expected)?;
        }

        if self.channels.is_empty() {
            return Err(InputShapeError::NoChannels);
        }
        for (i, channel) in self.channels.iter().enumerate() {
            check_len(&channel.name, &channel.values, expected)?;
            if self.channels[..i].iter().any(|c| c.name == channel.name) {
                return Err(InputShapeError::DuplicateChannel(channel.name.clone()));
            }
        }

        Ok(SampleSeries {
            time: self.time,
            internal_standard: self.internal_standard,
            row_marker: self.row_marker,
            channels: self.channels,
        })
    }
}

fn check_len(name: &str, values: &[f64], expected: usize) -> Result<(), InputShapeError> {
    if values.len() != expected {
        return Err(InputShapeError::LengthMismatch {
            name: name.to_string(),
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

/// Mean of the finite-or-infinite values, skipping NaN. Returns NaN if nothing remains.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_samples() -> SampleSeriesBuilder {
        SampleSeries::builder(vec![0.0, 0.1, 0.2], vec![1.0, 5.0, 1.0])
    }

    #[test]
    fn test_build_valid_series() {
        let series = three_samples()
            .row_marker(vec![0.0, 1.0, 0.0])
            .channel("Isomer 57", vec![10.0, 20.0, 30.0])
            .channel("Isomer 77", vec![1.0, 2.0, 3.0])
            .build()
            .unwrap();

        assert_eq!(series.len(), 3);
        assert!(series.row_marker().is_some());
        let names: Vec<&str> = series.channel_names().collect();
        assert_eq!(names, vec!["Isomer 57", "Isomer 77"]);
    }

    #[test]
    fn test_length_mismatch() {
        let result = three_samples().channel("Isomer 57", vec![1.0, 2.0]).build();
        assert_eq!(
            result,
            Err(InputShapeError::LengthMismatch {
                name: "Isomer 57".to_string(),
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn test_marker_length_mismatch() {
        let result = three_samples()
            .row_marker(vec![0.0])
            .channel("A", vec![1.0, 2.0, 3.0])
            .build();
        assert!(matches!(result, Err(InputShapeError::LengthMismatch { .. })));
    }

    #[test]
    fn test_rejects_empty_and_channelless() {
        let empty = SampleSeries::builder(vec![], vec![]).channel("A", vec![]).build();
        assert_eq!(empty, Err(InputShapeError::Empty));

        let no_channels = three_samples().build();
        assert_eq!(no_channels, Err(InputShapeError::NoChannels));
    }

    #[test]
    fn test_duplicate_channel() {
        let result = three_samples()
            .channel("A", vec![1.0, 2.0, 3.0])
            .channel("A", vec![1.0, 2.0, 3.0])
            .build();
        assert_eq!(result, Err(InputShapeError::DuplicateChannel("A".to_string())));
    }

    #[test]
    fn test_require_channels() {
        let series = three_samples().channel("A", vec![1.0, 2.0, 3.0]).build().unwrap();
        assert!(series.require_channels(["A"]).is_ok());
        assert_eq!(
            series.require_channels(["A", "B"]),
            Err(InputShapeError::MissingChannel("B".to_string()))
        );
    }

    #[test]
    fn test_restrict_to_window() {
        let series = SampleSeries::builder(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0, 4.0])
            .row_marker(vec![9.0, 8.0, 7.0, 6.0])
            .channel("A", vec![10.0, 20.0, 30.0, 40.0])
            .build()
            .unwrap();

        let window = series.restrict_to_window(1.0, 2.0).unwrap();
        assert_eq!(window.time(), &[1.0, 2.0]);
        assert_eq!(window.internal_standard(), &[2.0, 3.0]);
        assert_eq!(window.row_marker(), Some(&[8.0, 7.0][..]));
        assert_eq!(window.channel("A").unwrap().values, vec![20.0, 30.0]);

        assert_eq!(series.restrict_to_window(10.0, 20.0), Err(InputShapeError::Empty));
    }

    #[test]
    fn test_nan_mean() {
        assert_eq!(nan_mean(&[1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean(&[f64::NAN]).is_nan());
        assert!(nan_mean(&[]).is_nan());
    }
}
