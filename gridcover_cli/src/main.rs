// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gridcover CLI: decompose WKT polygons into grid cells.
//!
//! Reads one geometry per line, either `WKT` or `key<TAB>WKT`, and writes one
//! line per overlapping cell.
//!
//! ```bash
//! gridcover --cell-size 1 --input parcels.tsv --format json > cells.jsonl
//! ```
//!
//! Logs go to stderr. `-v` raises the level; `RUST_LOG` overrides it.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use gridcover_decompose::{DecomposeOptions, Decomposer};
use gridcover_index::GridSpec;
use tracing_subscriber::EnvFilter;

mod convert;
mod error;
mod rows;

use crate::convert::Converter;
use crate::error::CliError;
use crate::rows::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "gridcover", version)]
#[command(about = "Decompose polygons into latitude/longitude grid cells", long_about = None)]
struct Args {
    /// Cell edge length in degrees
    #[arg(long, allow_negative_numbers = true)]
    cell_size: f64,

    /// Input file, one geometry per line (default: stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    /// Worker threads (default: one per core)
    #[arg(long)]
    jobs: Option<usize>,

    /// Skip geometry preparation before classifying cells
    #[arg(long)]
    no_accelerate: bool,

    /// Read every ring edge literally
    ///
    /// By default two successive vertices more than 180 degrees of longitude
    /// apart are joined across the antimeridian, and the polygon is split
    /// there. So `POLYGON((-100 0, 100 0, 100 10, -100 10, -100 0))` covers
    /// 100E to 100W through 180, not the band through 0. This flag keeps the
    /// band through 0.
    #[arg(long)]
    no_wrap: bool,

    /// Geometry rows held in memory and decomposed together before their
    /// records are written
    #[arg(long, default_value = "1024")]
    chunk: NonZeroUsize,

    /// Margin around each geometry's envelope, in cells
    #[arg(long, default_value_t = 1)]
    buffer_cells: u32,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> DecomposeOptions {
        DecomposeOptions::default()
            .with_buffer_cells(self.buffer_cells)
            .with_accelerate(!self.no_accelerate)
            .with_wrap_antimeridian(!self.no_wrap)
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        e.exit();
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    init_logging(args.verbose)?;

    let grid = GridSpec::new(args.cell_size)?;
    tracing::info!(
        cell_size = grid.cell_size(),
        columns = grid.max_lon_cell(),
        rows = grid.max_lat_cell(),
        "grid ready"
    );
    let decomposer = Decomposer::with_options(&grid, args.options());
    let converter = Converter {
        decomposer: &decomposer,
        format: args.format,
        chunk_size: args.chunk,
    };

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool
        .build()
        .map_err(|e| CliError::ThreadPool(e.to_string()))?;

    let mut output = BufWriter::new(io::stdout());
    pool.install(|| match &args.input {
        Some(path) => {
            let file = File::open(path).map_err(|error| CliError::Input {
                path: Some(path.clone()),
                error,
            })?;
            converter.convert(BufReader::new(file), Some(path), &mut output)
        }
        None => converter.convert(io::stdin().lock(), None, &mut output),
    })?;
    Ok(())
}

fn init_logging(verbose: u8) -> Result<(), CliError> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
