use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::segment::RunBounds;

/// Per-channel values keyed by channel name, in series insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelIntensities {
    entries: Vec<(String, f64)>,
}

impl ChannelIntensities {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a channel value. New channels are appended.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value for a channel.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Mutable value for a channel.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut f64> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Channel names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no channel is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all channels.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ChannelIntensities {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for ChannelIntensities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One droplet passing the detector, aggregated from a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peak {
    /// 1-based position in discovery order.
    pub peak_number: usize,
    /// Midpoint of the run's first and last timestamps.
    pub center_time: f64,
    /// Last timestamp minus first timestamp of the run.
    pub duration: f64,
    /// Mean value per analyte channel over the run.
    pub channel_intensities: ChannelIntensities,
    /// Mean internal-standard value over the run.
    pub internal_standard: f64,
    /// Run's mean row-marker value exceeds the global row-marker mean.
    pub is_row_start: bool,
    /// Sample bounds of the run.
    pub bounds: RunBounds,
}

impl Peak {
    /// Mean intensity for a channel.
    pub fn intensity(&self, channel: &str) -> Option<f64> {
        self.channel_intensities.get(channel)
    }

    /// Number of samples that contributed to this peak.
    pub fn sample_count(&self) -> usize {
        self.bounds.sample_count()
    }
}
