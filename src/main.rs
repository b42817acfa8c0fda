use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use phase_diagram::parser::DEFAULT_TOLERANCE;
use phase_diagram::render::MAX_CELL_SIZE;
use phase_diagram::{
    default_output_path, generate_phase_diagram, AxisOrder, DiagramConfig, ParseOptions,
    RenderOptions,
};

#[derive(Parser, Debug)]
#[command(name = "phase_diagram")]
#[command(about = "Render a temperature/pressure phase diagram data file as an image")]
struct Args {
    /// Data file with temperature, pressure, phase name and energy columns
    input: PathBuf,

    /// Output image (format from extension; default: <input>_phase_diagram.png)
    output: Option<PathBuf>,

    /// Pixels per grid cell along each side
    #[arg(short = 's', long, default_value = "1",
          value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_CELL_SIZE)))]
    cell_size: u32,

    /// Add a title, axis ranges and a legend panel
    #[arg(long)]
    annotate: bool,

    /// Also write a JSON legend next to the image
    #[arg(long)]
    legend: bool,

    /// Input lists temperature as the outer (slow) key instead of pressure
    #[arg(long)]
    temperature_major: bool,

    /// Tolerance for treating two axis values as the same grid line
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    let order = if args.temperature_major {
        AxisOrder::TemperatureMajor
    } else {
        AxisOrder::PressureMajor
    };
    let config = DiagramConfig {
        parse: ParseOptions {
            order,
            tolerance: args.tolerance,
        },
        render: RenderOptions {
            cell_size: args.cell_size,
            annotate: args.annotate,
        },
        write_legend: args.legend,
    };

    let summary = generate_phase_diagram(&args.input, &output, &config)
        .with_context(|| format!("failed to generate phase diagram from {}", args.input.display()))?;

    if summary.palette_wrapped {
        warn!("Some phases share colors; see the legend to tell them apart");
    }
    println!(
        "{} ({}x{} px, {} phases)",
        summary.output.display(),
        summary.width,
        summary.height,
        summary.phases
    );
    if let Some(legend) = summary.legend {
        println!("{}", legend.display());
    }

    Ok(())
}
