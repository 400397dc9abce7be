#![no_main]

use libfuzzer_sys::fuzz_target;
use wellpeak::config::PipelineConfig;
use wellpeak::pipeline::PeakPipeline;
use wellpeak::plate::PlateLayout;
use wellpeak::series::SampleSeries;

fuzz_target!(|data: &[u8]| {
    // First three bytes pick the plate, the rest become (IS, marker, channel) triples
    if data.len() < 3 {
        return;
    }
    let (header, body) = data.split_at(3);
    let samples: Vec<&[u8]> = body.chunks_exact(3).collect();
    if samples.is_empty() {
        return;
    }

    let value = |b: u8| if b == 0xFF { f64::NAN } else { b as f64 };
    let series = SampleSeries::builder(
        (0..samples.len()).map(|i| i as f64).collect(),
        samples.iter().map(|s| value(s[0])).collect(),
    )
    .row_marker(samples.iter().map(|s| value(s[1])).collect())
    .channel("A", samples.iter().map(|s| value(s[2])).collect())
    .build();
    let Ok(series) = series else {
        return;
    };

    let mut config = PipelineConfig::default();
    config.plate = PlateLayout::new(
        (header[0] % 16) as usize,
        (header[1] % 24) as usize,
        (header[2] % 4) as usize,
    );
    config.heatmap.channels = vec!["A".to_string()];

    // Invalid plates and empty runs must be errors, never panics
    if let Ok(pipeline) = PeakPipeline::new(config) {
        let _ = pipeline.run(&series);
    }
});
