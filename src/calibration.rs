//! Baseline calibration of aggregated intensities.
//!
//! Each analyte channel is shifted so its smallest peak intensity becomes zero.
//! Channels are calibrated independently. The removed baselines are returned so
//! uncalibrated values can still be reported.

use log::debug;
use serde::Serialize;

use crate::peak::{ChannelIntensities, Peak};

/// Baseline removed from each channel, in channel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Baselines(pub ChannelIntensities);

impl Baselines {
    /// Baseline removed from a channel.
    pub fn get(&self, channel: &str) -> Option<f64> {
        self.0.get(channel)
    }

    /// Undo calibration for a single calibrated value.
    pub fn uncalibrated(&self, channel: &str, calibrated: f64) -> Option<f64> {
        self.get(channel).map(|baseline| calibrated + baseline)
    }
}

/// Minimum of a channel across peaks, skipping NaN. `None` when no value is usable.
pub fn channel_minimum(peaks: &[Peak], channel: &str) -> Option<f64> {
    peaks
        .iter()
        .filter_map(|peak| peak.intensity(channel))
        .filter(|v| !v.is_nan())
        .reduce(f64::min)
}

/// Subtract the per-channel minimum from every peak.
///
/// Calling this twice is equivalent to calling it once: after the first pass every
/// channel minimum is zero.
pub fn calibrate(peaks: &mut [Peak]) -> Baselines {
    let channels: Vec<String> = match peaks.first() {
        Some(peak) => peak.channel_intensities.names().map(str::to_string).collect(),
        None => return Baselines::default(),
    };

    let mut baselines = ChannelIntensities::new();
    for channel in &channels {
        let Some(minimum) = channel_minimum(peaks, channel) else {
            continue;
        };
        for peak in peaks.iter_mut() {
            if let Some(value) = peak.channel_intensities.get_mut(channel) {
                *value -= minimum;
            }
        }
        debug!("Calibrated {channel}: baseline {minimum:.3}");
        baselines.insert(channel.as_str(), minimum);
    }

    Baselines(baselines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::RunBounds;

    fn peak(number: usize, a: f64, b: f64) -> Peak {
        Peak {
            peak_number: number,
            center_time: number as f64,
            duration: 0.1,
            channel_intensities: [("A", a), ("B", b)].into_iter().collect(),
            internal_standard: 100.0,
            is_row_start: false,
            bounds: RunBounds {
                start: number,
                end: number,
            },
        }
    }

    #[test]
    fn test_calibrate_per_channel() {
        let mut peaks = vec![peak(1, 10.0, 7.0), peak(2, 4.0, 9.0), peak(3, 6.0, 8.0)];
        let baselines = calibrate(&mut peaks);

        assert_eq!(baselines.get("A"), Some(4.0));
        assert_eq!(baselines.get("B"), Some(7.0));
        let a: Vec<f64> = peaks.iter().map(|p| p.intensity("A").unwrap()).collect();
        let b: Vec<f64> = peaks.iter().map(|p| p.intensity("B").unwrap()).collect();
        assert_eq!(a, vec![6.0, 0.0, 2.0]);
        assert_eq!(b, vec![0.0, 2.0, 1.0]);

        assert_eq!(baselines.uncalibrated("A", 2.0), Some(6.0));
        assert_eq!(baselines.uncalibrated("missing", 2.0), None);
    }

    #[test]
    fn test_calibrate_is_idempotent() {
        let mut once = vec![peak(1, 10.0, -3.0), peak(2, 4.0, 9.0)];
        calibrate(&mut once);
        let mut twice = once.clone();
        let second = calibrate(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(second.get("A"), Some(0.0));
        assert_eq!(second.get("B"), Some(0.0));
    }

    #[test]
    fn test_nan_does_not_poison_minimum() {
        let mut peaks = vec![peak(1, f64::NAN, 1.0), peak(2, 5.0, 2.0), peak(3, 3.0, 3.0)];
        let baselines = calibrate(&mut peaks);
        assert_eq!(baselines.get("A"), Some(3.0));
        assert!(peaks[0].intensity("A").unwrap().is_nan());
        assert_eq!(peaks[1].intensity("A"), Some(2.0));
    }

    #[test]
    fn test_calibrate_empty() {
        let mut peaks: Vec<Peak> = Vec::new();
        assert_eq!(calibrate(&mut peaks), Baselines::default());
    }
}
