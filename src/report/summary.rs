use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

use crate::pipeline::PipelineOutput;
use crate::plate::HeatmapStatus;

/// Heatmap outcome shown in the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapLine {
    /// Channel name
    pub channel: String,
    /// Build status
    pub status: HeatmapStatus,
}

/// Human-readable outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Input the run was made on
    pub source: String,
    /// Samples analysed
    pub samples: usize,
    /// Peaks found
    pub peaks: usize,
    /// Mean peak duration
    pub mean_duration: f64,
    /// Merged candidate peak numbers
    pub merged: Vec<usize>,
    /// Split candidate peak numbers
    pub split: Vec<usize>,
    /// Wells assigned, if a row marker was present
    pub wells: Option<usize>,
    /// Wells outside the plate columns
    pub off_plate_wells: usize,
    /// Heatmap statuses in request order
    pub heatmaps: Vec<HeatmapLine>,
}

impl RunSummary {
    /// Summarise a pipeline output.
    pub fn new(source: impl Into<String>, output: &PipelineOutput) -> Self {
        Self {
            source: source.into(),
            samples: output.stats.samples,
            peaks: output.stats.peaks,
            mean_duration: output.stats.mean_duration,
            merged: output.anomalies.merged.clone(),
            split: output.anomalies.split.clone(),
            wells: output.wells.as_ref().map(Vec::len),
            off_plate_wells: output.stats.off_plate_wells,
            heatmaps: output
                .heatmaps
                .iter()
                .map(|h| HeatmapLine {
                    channel: h.channel.clone(),
                    status: h.status,
                })
                .collect(),
        }
    }

    /// Returns true if anything needs a second look.
    pub fn has_warnings(&self) -> bool {
        !self.merged.is_empty()
            || !self.split.is_empty()
            || self.off_plate_wells > 0
            || self
                .heatmaps
                .iter()
                .any(|h| h.status != HeatmapStatus::Complete)
    }

    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Droplet Run Summary").bold().cyan()));
            output.push_str(&format!("{}\n", style("===================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Input").bold(), self.source));

            output.push_str(&format!(
                "{}: {} ({} samples)\n",
                style("Peaks").bold(),
                style(self.peaks).green(),
                self.samples
            ));
            output.push_str(&format!(
                "{}: {:.3}\n",
                style("Mean duration").bold(),
                self.mean_duration
            ));
            output.push_str(&format!(
                "{}: {}\n",
                style("Potential merged").bold(),
                colored_list(&self.merged)
            ));
            output.push_str(&format!(
                "{}: {}\n",
                style("Potential split").bold(),
                colored_list(&self.split)
            ));

            if let Some(wells) = self.wells {
                output.push_str(&format!("{}: {}", style("Wells").bold(), wells));
                if self.off_plate_wells > 0 {
                    output.push_str(&format!(
                        " - {}: {} off plate\n",
                        style("WARNING").yellow().bold(),
                        self.off_plate_wells
                    ));
                } else {
                    output.push('\n');
                }
            }

            for line in &self.heatmaps {
                match line.status {
                    HeatmapStatus::Complete => output.push_str(&format!(
                        "{} {}: {}\n",
                        style("Heatmap").bold(),
                        line.channel,
                        style("complete").green()
                    )),
                    HeatmapStatus::InsufficientData {
                        required,
                        available,
                    } => output.push_str(&format!(
                        "{} {}: {} ({} of {} peaks)\n",
                        style("Heatmap").bold(),
                        line.channel,
                        style("insufficient data").yellow(),
                        available,
                        required
                    )),
                }
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

#[cfg(feature = "colorized_output")]
fn colored_list(numbers: &[usize]) -> String {
    if numbers.is_empty() {
        style("none").green().to_string()
    } else {
        style(join(numbers)).yellow().to_string()
    }
}

fn list_or_none(numbers: &[usize]) -> String {
    if numbers.is_empty() {
        "none".to_string()
    } else {
        join(numbers)
    }
}

fn join(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Droplet Run Summary")?;
        writeln!(f, "===================")?;
        writeln!(f, "Input: {}", self.source)?;
        writeln!(f)?;
        writeln!(f, "Peaks: {} ({} samples)", self.peaks, self.samples)?;
        writeln!(f, "Mean duration: {:.3}", self.mean_duration)?;

        writeln!(f, "Potential merged: {}", list_or_none(&self.merged))?;
        writeln!(f, "Potential split: {}", list_or_none(&self.split))?;

        if let Some(wells) = self.wells {
            write!(f, "Wells: {}", wells)?;
            if self.off_plate_wells > 0 {
                writeln!(f, " - WARNING: {} off plate", self.off_plate_wells)?;
            } else {
                writeln!(f)?;
            }
        }

        for line in &self.heatmaps {
            match line.status {
                HeatmapStatus::Complete => writeln!(f, "Heatmap {}: complete", line.channel)?,
                HeatmapStatus::InsufficientData {
                    required,
                    available,
                } => writeln!(
                    f,
                    "Heatmap {}: insufficient data ({} of {} peaks)",
                    line.channel, available, required
                )?,
            }
        }

        Ok(())
    }
}
