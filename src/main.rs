//! # wellpeak
//!
//! Command-line front end: reads an instrument CSV export, runs the droplet
//! pipeline and writes the results.
//!
//! ## Usage
//!
//! ```bash
//! # 96-well plate, peak table and summary in ./results
//! wellpeak analyze run.csv -o results
//!
//! # 96-well plate sampled twice per well, with a heatmap
//! wellpeak analyze run.csv --rows 8 --columns 12 --droplets 2 --heatmap "Isomer 57"
//!
//! # Settings from a file
//! wellpeak analyze run.csv --config wellpeak.toml -v
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
