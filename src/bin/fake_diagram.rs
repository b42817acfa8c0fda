//! Write a synthetic phase diagram data file with a given number of phases.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use phase_diagram::phase_grid::AxisOrder;
use phase_diagram::synthetic::{default_file_name, generate_fake_diagram, FakeDiagramConfig};

#[derive(Parser, Debug)]
#[command(name = "fake_diagram")]
#[command(about = "Generate a fake phase diagram data file")]
struct Args {
    /// Number of phases to spread over the grid
    num_phases: usize,

    /// Output path (default: fake_diagram_with_<num_phases>_phases.out)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write temperature as the outer (slow) key instead of pressure
    #[arg(long)]
    temperature_major: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut config = FakeDiagramConfig::with_phases(args.num_phases);
    if args.temperature_major {
        config.order = AxisOrder::TemperatureMajor;
    }

    let text = generate_fake_diagram(&config)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_file_name(args.num_phases)));
    fs::write(&output, text).with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "Wrote {} points ({} phases, {}) to {}",
        config.total_points(),
        config.num_phases,
        config.order,
        output.display()
    );
    Ok(())
}
