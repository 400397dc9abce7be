use super::*;
use crate::anomaly::NoPeaksError;
use crate::config::TimeWindow;
use crate::plate::PlateLayout;

/// Series with one droplet per `(is, marker, a)` triple, separated by zero samples.
fn droplet_series(droplets: &[(f64, f64, f64)]) -> SampleSeries {
    let mut time = Vec::new();
    let mut is = Vec::new();
    let mut marker = Vec::new();
    let mut a = Vec::new();

    let mut push = |is_v: f64, marker_v: f64, a_v: f64| {
        let t = time.len() as f64 * 0.01;
        time.push(t);
        is.push(is_v);
        marker.push(marker_v);
        a.push(a_v);
    };

    push(0.0, 0.0, 0.0);
    for &(is_v, marker_v, a_v) in droplets {
        push(is_v, marker_v, a_v);
        push(is_v, marker_v, a_v);
        push(0.0, 0.0, 0.0);
    }

    SampleSeries::builder(time, is)
        .row_marker(marker)
        .channel("A", a)
        .build()
        .unwrap()
}

fn plate_config(rows: usize, columns: usize, droplets: usize) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.plate = PlateLayout::new(rows, columns, droplets);
    config
}

#[test]
fn test_full_plate_run() {
    // 2x2 plate, one droplet per well; the row marker fires on the third droplet
    let series = droplet_series(&[
        (10.0, 0.0, 40.0),
        (10.0, 0.0, 30.0),
        (10.0, 9.0, 20.0),
        (10.0, 0.0, 10.0),
    ]);
    let mut config = plate_config(2, 2, 1);
    config.heatmap.channels = vec!["A".to_string()];

    let output = PeakPipeline::new(config).unwrap().run(&series).unwrap();

    assert_eq!(output.peaks.len(), 4);
    assert_eq!(output.totals.peak_count, 4);
    let labels: Vec<String> = output
        .wells
        .as_ref()
        .unwrap()
        .iter()
        .map(|w| w.to_string())
        .collect();
    assert_eq!(labels, vec!["B2", "B1", "A2", "A1"]);
    assert_eq!(output.well(3).map(|w| w.to_string()), Some("A2".to_string()));
    assert_eq!(output.well(0), None);

    // calibrated against the minimum of 10
    let baselines = output.baselines.as_ref().unwrap();
    assert_eq!(baselines.get("A"), Some(10.0));
    let heatmap = output.heatmap("A").unwrap();
    assert!(heatmap.is_complete());
    assert_eq!(heatmap.values, vec![vec![0.0, 10.0], vec![20.0, 30.0]]);

    assert_eq!(output.stats.peaks, 4);
    assert_eq!(output.stats.row_starts, 1);
    assert_eq!(output.stats.complete_heatmaps, 1);
    assert!(output.anomalies.merged.is_empty());
    assert!(output.anomalies.split.is_empty());
}

#[test]
fn test_no_marker_skips_wells() {
    let series = SampleSeries::builder(
        vec![0.0, 0.1, 0.2, 0.3, 0.4],
        vec![0.0, 8.0, 9.0, 0.0, 0.0],
    )
    .channel("A", vec![0.0, 4.0, 6.0, 0.0, 0.0])
    .build()
    .unwrap();

    let output = PeakPipeline::new(PipelineConfig::default())
        .unwrap()
        .run(&series)
        .unwrap();
    assert_eq!(output.peaks.len(), 1);
    assert!(output.wells.is_none());
    assert_eq!(output.stats.off_plate_wells, 0);
}

#[test]
fn test_no_peaks_is_error() {
    let series = SampleSeries::builder(vec![0.0, 0.1, 0.2], vec![5.0, 5.0, 5.0])
        .channel("A", vec![1.0, 1.0, 1.0])
        .build()
        .unwrap();

    let result = PeakPipeline::new(PipelineConfig::default())
        .unwrap()
        .run(&series);
    assert_eq!(result, Err(PipelineError::NoPeaks(NoPeaksError)));
}

#[test]
fn test_unknown_heatmap_channel() {
    let series = droplet_series(&[(10.0, 0.0, 1.0)]);
    let mut config = PipelineConfig::default();
    config.heatmap.channels = vec!["Isomer 99".to_string()];

    let result = PeakPipeline::new(config).unwrap().run(&series);
    assert_eq!(
        result,
        Err(PipelineError::UnknownChannel("Isomer 99".to_string()))
    );
}

#[test]
fn test_invalid_config_fails_before_run() {
    let config = plate_config(16, 2, 1);
    assert!(matches!(
        PeakPipeline::new(config),
        Err(ConfigError::TooManyRows { .. })
    ));
}

#[test]
fn test_calibration_can_be_disabled() {
    let series = droplet_series(&[(10.0, 0.0, 5.0), (10.0, 0.0, 7.0)]);
    let mut config = PipelineConfig::default();
    config.calibration.enabled = false;

    let output = PeakPipeline::new(config).unwrap().run(&series).unwrap();
    assert!(output.baselines.is_none());
    assert_eq!(output.peaks[0].intensity("A"), Some(5.0));
    assert_eq!(output.peaks[1].intensity("A"), Some(7.0));
}

#[test]
fn test_insufficient_heatmap_counts() {
    let series = droplet_series(&[(10.0, 0.0, 5.0), (10.0, 0.0, 7.0)]);
    let mut config = PipelineConfig::default();
    config.heatmap.channels = vec!["A".to_string()];

    let output = PeakPipeline::new(config).unwrap().run(&series).unwrap();
    let heatmap = output.heatmap("A").unwrap();
    assert_eq!(heatmap.values, vec![vec![0.0; 12]; 8]);
    assert_eq!(output.stats.insufficient_heatmaps, 1);
}

#[test]
fn test_time_window_drops_droplets() {
    // droplets occupy samples 1-2, 4-5, 7-8 at 0.01 min spacing
    let series = droplet_series(&[(10.0, 0.0, 1.0), (10.0, 0.0, 2.0), (10.0, 0.0, 3.0)]);
    let mut config = PipelineConfig::default();
    config.calibration.enabled = false;
    config.window = Some(TimeWindow {
        start: 0.025,
        end: 0.095,
    });

    let output = PeakPipeline::new(config).unwrap().run(&series).unwrap();
    assert_eq!(output.stats.samples, 7);
    assert_eq!(output.peaks.len(), 2);
    assert_eq!(output.peaks[0].intensity("A"), Some(2.0));
    assert_eq!(output.peaks[1].intensity("A"), Some(3.0));
}

#[test]
fn test_repeated_runs_are_identical() {
    let series = droplet_series(&[(10.0, 0.0, 1.0), (12.0, 0.0, 2.0), (9.0, 3.0, 4.0)]);
    let pipeline = PeakPipeline::new(plate_config(2, 2, 1)).unwrap();
    assert_eq!(pipeline.run(&series).unwrap(), pipeline.run(&series).unwrap());
}
