use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod analyze;
mod config;
mod input;

use analyze::Overrides;

/// wellpeak - Droplet peak analysis for well-plate mass spectrometry runs
#[derive(Parser)]
#[command(name = "wellpeak")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect droplets in a CSV export and map them to plate wells
    Analyze {
        /// Input CSV file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory for the peak table and heatmaps
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Plate rows (1-15)
        #[arg(long)]
        rows: Option<usize>,

        /// Plate columns
        #[arg(long)]
        columns: Option<usize>,

        /// Droplets collected per well
        #[arg(long)]
        droplets: Option<usize>,

        /// Fraction of the internal-standard mean used as the noise floor
        #[arg(long)]
        threshold: Option<f64>,

        /// Channel to render as a plate heatmap (repeatable)
        #[arg(long = "heatmap", value_name = "CHANNEL")]
        heatmap: Vec<String>,

        /// Keep raw intensities instead of subtracting channel baselines
        #[arg(long)]
        no_calibration: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            config,
            rows,
            columns,
            droplets,
            threshold,
            heatmap,
            no_calibration,
            json,
        } => analyze::run(
            input,
            output,
            config,
            Overrides {
                rows,
                columns,
                droplets,
                threshold,
                heatmap,
                no_calibration,
            },
            json,
        ),
    }
}
