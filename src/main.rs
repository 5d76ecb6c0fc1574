//! vtk-slicer: print a summary of a structured vtk grid and plot planes of its point data.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=vtk_slicer=info` - Basic operation logging
//! - `RUST_LOG=vtk_slicer=debug` - Parsing and slicing details
//! - `RUST_LOG=trace` - Everything
//!
//! # Example
//!
//! ```bash
//! # pressure at j = 0 and density at k = 3, written to slices.svg
//! vtk-slicer NRotSphere001N000.vtk --field Pressure --slice 0 --axis y \
//!     --field Density --slice 3 --axis z
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vtk_slicer::SliceConfig;

/// vtk-slicer - plot axis aligned planes of structured vtk grids.
///
/// Every `--field` is paired with the `--slice` and `--axis` at the same position. Without
/// any of them a single `Pressure` plane at index 0 along `y` is plotted.
#[derive(Parser)]
#[command(name = "vtk-slicer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input vtk file (legacy `.vtk` or xml `.vts` / `.vtr`)
    #[arg(default_value = vtk_slicer::DEFAULT_INPUT)]
    input: PathBuf,

    /// Point data array to slice, once per panel
    #[arg(long = "field", short = 'f')]
    fields: Vec<String>,

    /// Grid index of the plane, once per panel
    #[arg(long = "slice", short = 's')]
    slices: Vec<usize>,

    /// Axis the plane is fixed along (x, y or z), once per panel
    #[arg(long = "axis", short = 'a')]
    axes: Vec<String>,

    /// SVG file the figure is written to
    #[arg(long, short, default_value = vtk_slicer::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Suppress all log output
    #[arg(long, short)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> SliceConfig {
        let config = SliceConfig::default()
            .with_input(self.input)
            .with_output(self.output);

        // keep the default request unless any part of a request was given
        if self.fields.is_empty() && self.slices.is_empty() && self.axes.is_empty() {
            config
        } else {
            config.with_requests(self.fields, self.slices, self.axes)
        }
    }
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over the -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "vtk_slicer=info",
            2 => "vtk_slicer=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn run(config: SliceConfig) -> Result<()> {
    vtk_slicer::run(&config)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli.into_config()) {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }
        std::process::exit(1);
    }
}
