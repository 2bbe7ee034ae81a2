//! # domdb
//!
//! Command-line front end for the metabolomics peak database.
//!
//! ## Usage
//!
//! ```bash
//! # Load every <name>_data.csv / <name>_metadata.csv pair in a directory
//! domdb add-dir ./experiments
//!
//! # Peaks near m/z 181.0707, rt 302 s, written to CSV
//! domdb search 181.0707 302 hits.csv
//!
//! # Cross-match one experiment against all others
//! domdb --mode neg match tps4 tps4_matches.csv
//!
//! # Change a search setting (persisted in domdb.toml)
//! domdb set ppm_diff 5
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
