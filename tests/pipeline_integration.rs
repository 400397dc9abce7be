//! End-to-end tests over a synthetic plate acquisition.

use wellpeak::prelude::*;

const ROWS: usize = 4;
const COLUMNS: usize = 6;
const DROPLETS: usize = 2;

/// Well value for zero-based row `r` and one-based column `c`.
fn well_value(r: usize, c: usize) -> f64 {
    100.0 + 10.0 * r as f64 + c as f64
}

/// Low-noise samples between droplets.
fn gap(sample: &mut dyn FnMut(f64, f64, f64, f64), n: usize) {
    for k in 0..n {
        sample(1.0 + (k % 2) as f64 * 0.5, 0.0, 3.0, 2.0);
    }
}

/// Acquisition of a full plate, last well first, two droplets per well.
///
/// Each droplet spans four samples separated by three low-noise samples. The row
/// marker is raised during the first droplet of every row.
fn plate_acquisition() -> SampleSeries {
    let mut time = Vec::new();
    let mut is = Vec::new();
    let mut marker = Vec::new();
    let mut a = Vec::new();
    let mut b = Vec::new();

    let mut sample = |is_v: f64, marker_v: f64, a_v: f64, b_v: f64| {
        let t = time.len() as f64 * 0.01;
        time.push(t);
        is.push(is_v);
        marker.push(marker_v);
        a.push(a_v);
        b.push(b_v);
    };
    gap(&mut sample, 3);
    for r in (0..ROWS).rev() {
        for c in (1..=COLUMNS).rev() {
            for d in 0..DROPLETS {
                let row_start = c == COLUMNS && d == 0;
                let marker_v = if row_start { 50.0 } else { 0.0 };
                for k in 0..4 {
                    sample(
                        100.0 + k as f64,
                        marker_v,
                        well_value(r, c),
                        2.0 * well_value(r, c),
                    );
                }
                gap(&mut sample, 3);
            }
        }
    }

    SampleSeries::builder(time, is)
        .row_marker(marker)
        .channel("Isomer 57", a)
        .channel("Isomer 77", b)
        .build()
        .unwrap()
}

fn plate_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.plate = PlateLayout::new(ROWS, COLUMNS, DROPLETS);
    config.heatmap.channels = vec!["Isomer 57".to_string()];
    config
}

#[test]
fn test_full_plate() {
    let series = plate_acquisition();
    let output = PeakPipeline::new(plate_config())
        .unwrap()
        .run(&series)
        .unwrap();

    assert_eq!(output.peaks.len(), ROWS * COLUMNS * DROPLETS);
    assert!(output.anomalies.merged.is_empty());
    assert!(output.anomalies.split.is_empty());
    assert_eq!(output.stats.row_starts, ROWS);
    assert_eq!(output.stats.off_plate_wells, 0);

    let wells = output.wells.as_ref().unwrap();
    for (k, well) in wells.iter().enumerate() {
        let row = ROWS - 1 - k / (COLUMNS * DROPLETS);
        let column = COLUMNS - (k % (COLUMNS * DROPLETS)) / DROPLETS;
        assert_eq!(well.row_index, row, "peak {}", k + 1);
        assert_eq!(well.column, column as i64, "peak {}", k + 1);
    }
    assert_eq!(wells[0].to_string(), "D6");
    assert_eq!(wells.last().unwrap().to_string(), "A1");

    // calibration removes the A1 value
    let baseline = well_value(0, 1);
    assert_eq!(output.baselines.as_ref().unwrap().get("Isomer 57"), Some(baseline));

    let heatmap = output.heatmap("Isomer 57").unwrap();
    assert!(heatmap.is_complete());
    for r in 0..ROWS {
        for c in 1..=COLUMNS {
            let expected = well_value(r, c) - baseline;
            let actual = heatmap.get(r, c - 1).unwrap();
            assert!((actual - expected).abs() < 1e-9, "well {r}/{c}");
        }
    }
}

#[test]
fn test_peak_table_defaults() {
    let series = plate_acquisition();
    let output = PeakPipeline::new(plate_config())
        .unwrap()
        .run(&series)
        .unwrap();

    let fields = OutputField::default_fields(series.channel_names(), true);
    let table = PeakTable::new(&output, &fields).unwrap();

    let mut buffer = Vec::new();
    table.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let mut lines = text.lines();

    assert_eq!(
        lines.next(),
        Some("peak_number,peak_center,duration,well,Isomer 57,Isomer 77,potential_merged,potential_split")
    );
    assert_eq!(lines.count(), ROWS * COLUMNS * DROPLETS);
}

#[test]
fn test_stretched_droplet_is_merged_candidate() {
    // eight droplets of four samples, one of twelve
    let mut is = vec![0.0];
    for k in 0..9 {
        let len = if k == 4 { 12 } else { 4 };
        is.extend(std::iter::repeat(100.0).take(len));
        is.extend([0.0, 0.0]);
    }
    let n = is.len();
    let series = SampleSeries::builder((0..n).map(|i| i as f64).collect(), is)
        .channel("Isomer 57", vec![1.0; n])
        .build()
        .unwrap();

    let output = PeakPipeline::new(PipelineConfig::default())
        .unwrap()
        .run(&series)
        .unwrap();

    assert_eq!(output.peaks.len(), 9);
    assert_eq!(output.anomalies.merged, vec![5]);
    assert!(output.anomalies.split.is_empty());
    assert!(output.wells.is_none());
}

#[test]
fn test_insufficient_heatmap_is_soft() {
    let series = plate_acquisition();
    let mut config = plate_config();
    config.plate = PlateLayout::new(8, 12, 2);

    let output = PeakPipeline::new(config).unwrap().run(&series).unwrap();
    let heatmap = output.heatmap("Isomer 57").unwrap();
    assert_eq!(
        heatmap.status,
        HeatmapStatus::InsufficientData {
            required: 192,
            available: 48
        }
    );
    assert!(heatmap.values.iter().flatten().all(|&v| v == 0.0));
    assert_eq!(heatmap.values.len(), 8);
}

#[test]
fn test_summary_json() {
    let series = plate_acquisition();
    let output = PeakPipeline::new(plate_config())
        .unwrap()
        .run(&series)
        .unwrap();

    let summary = RunSummary::new("synthetic", &output);
    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["peaks"], 48);
    assert_eq!(json["wells"], 48);
    assert_eq!(json["heatmaps"][0]["status"]["status"], "complete");
}
