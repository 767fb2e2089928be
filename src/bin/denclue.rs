//! DENCLUE command-line driver.
//!
//! Reads a CSV point file, clusters it, and writes the cluster report.
//!
//! # Usage
//!
//! ```bash
//! denclue -d 2 -s 1.0 -x 2.0 -i points.csv -o clusters.txt
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use denclue::{io, Denclue};

#[derive(Parser, Debug)]
#[command(name = "denclue")]
#[command(about = "DENCLUE: density-based clustering of multi-dimensional point sets")]
#[command(version)]
struct Args {
    /// Number of dimensions of the dataset
    #[arg(short = 'd', long)]
    dimension: usize,

    /// Sigma: bandwidth of the Gaussian influence of a point on its neighborhood
    #[arg(short = 's', long)]
    sigma: f64,

    /// Xi: minimum density level for a cluster attractor
    #[arg(short = 'x', long)]
    xi: f64,

    /// Input file, one comma-separated point per line
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Output file for the cluster report
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.dimension == 0 {
        bail!("number of dimensions must be greater than zero");
    }
    if args.sigma <= 0.0 {
        bail!("sigma must be greater than zero");
    }
    if args.xi <= 0.0 {
        bail!("xi must be greater than zero");
    }

    let input = File::open(&args.input)
        .with_context(|| format!("opening input file {}", args.input.display()))?;
    let rows = io::read_points(BufReader::new(input), args.dimension)?;
    info!(points = rows.len(), dimension = args.dimension, "input read");

    let fit = Denclue::new(args.sigma, args.xi).fit(&rows)?;
    info!(clusters = fit.n_clusters(), "clustering finished");

    let output = File::create(&args.output)
        .with_context(|| format!("opening output file {}", args.output.display()))?;
    io::write_report(BufWriter::new(output), &fit)?;
    info!(path = %args.output.display(), "clusters written");

    Ok(())
}
