use anyhow::{Context, Result};
use log::info;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use wellpeak::pipeline::PeakPipeline;
use wellpeak::report::{write_heatmap_csv, OutputField, PeakTable, RunSummary};

use super::config::Config;
use super::input::read_series_file;

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub rows: Option<usize>,
    pub columns: Option<usize>,
    pub droplets: Option<usize>,
    pub threshold: Option<f64>,
    pub heatmap: Vec<String>,
    pub no_calibration: bool,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        let pipeline = &mut config.pipeline;
        if let Some(rows) = self.rows {
            pipeline.plate.rows = rows;
        }
        if let Some(columns) = self.columns {
            pipeline.plate.columns = columns;
        }
        if let Some(droplets) = self.droplets {
            pipeline.plate.droplets_per_well = droplets;
        }
        if let Some(threshold) = self.threshold {
            pipeline.detection.threshold_fraction = threshold;
        }
        if !self.heatmap.is_empty() {
            pipeline.heatmap.channels = self.heatmap;
        }
        if self.no_calibration {
            pipeline.calibration.enabled = false;
        }
    }
}

/// Analyze a CSV export and write the peak table and heatmaps
pub fn run(
    input: PathBuf,
    output_dir: PathBuf,
    config_path: Option<PathBuf>,
    overrides: Overrides,
    json: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    overrides.apply(&mut config);

    let series = read_series_file(&input, &config.input)?;
    let pipeline = PeakPipeline::new(config.pipeline).context("Invalid configuration")?;
    let output = pipeline
        .run(&series)
        .with_context(|| format!("Failed to analyze {}", input.display()))?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let fields = if config.output.fields.is_empty() {
        OutputField::default_fields(series.channel_names(), output.wells.is_some())
    } else {
        config.output.fields
    };
    let table = PeakTable::new(&output, &fields)?;
    let peaks_path = output_dir.join(&config.output.peaks_file);
    table.write_csv(create(&peaks_path)?)?;
    info!("Wrote {} peaks to {}", table.rows().len(), peaks_path.display());

    for heatmap in &output.heatmaps {
        let path = output_dir.join(heatmap_file_name(&heatmap.channel));
        write_heatmap_csv(heatmap, create(&path)?)?;
        info!("Wrote heatmap for {} to {}", heatmap.channel, path.display());
    }

    let summary = RunSummary::new(input.display().to_string(), &output);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        #[cfg(feature = "colorized_output")]
        {
            println!("{}", summary.format_colored());
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            println!("{}", summary);
        }
    }

    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// `heatmap_<channel>.csv`, with characters unsafe in file names replaced.
pub fn heatmap_file_name(channel: &str) -> String {
    let safe: String = channel
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    format!("heatmap_{safe}.csv")
}
