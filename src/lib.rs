//! Phase diagram rendering library
//!
//! Parses four-column (temperature, pressure, phase, energy) data files into a
//! phase grid and renders it as an image, one color per phase.

pub mod error;
pub mod font;
pub mod legend;
pub mod palette;
pub mod parser;
pub mod phase_grid;
pub mod render;
pub mod synthetic;
pub mod tilemap;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub use error::{PhaseDiagramError, Result, ShapeMismatch};
pub use legend::PhaseLegend;
pub use palette::PhaseColorMap;
pub use parser::ParseOptions;
pub use phase_grid::{AxisOrder, PhaseGrid};
pub use render::RenderOptions;

/// Everything one run of the pipeline needs besides the paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiagramConfig {
    pub parse: ParseOptions,
    pub render: RenderOptions,
    /// Also write a JSON legend next to the image
    pub write_legend: bool,
}

/// What a successful run produced.
#[derive(Clone, Debug)]
pub struct DiagramSummary {
    pub output: PathBuf,
    pub legend: Option<PathBuf>,
    pub temperatures: usize,
    pub pressures: usize,
    pub phases: usize,
    pub width: u32,
    pub height: u32,
    pub palette_wrapped: bool,
}

/// `data/run1.out` -> `data/run1_phase_diagram.png`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "phase".to_string());
    input.with_file_name(format!("{stem}_phase_diagram.png"))
}

/// Parse `input`, render it and write the image to `output`.
///
/// Parsing, rendering and serialization all finish (and fail) before anything
/// is written, so a bad input never leaves an output file behind. If the
/// legend sidecar cannot be written the image is removed again.
pub fn generate_phase_diagram(input: &Path, output: &Path, config: &DiagramConfig) -> Result<DiagramSummary> {
    config.parse.validate()?;
    config.render.validate()?;

    info!("Parsing {}", input.display());
    let grid = parser::parse_file(input, &config.parse)?;
    info!(
        "Grid: {} temperatures x {} pressures, {} phases",
        grid.columns(),
        grid.rows(),
        grid.phase_names().len()
    );

    let colors = PhaseColorMap::from_grid(&grid);
    let img = render::render(&grid, &colors, &config.render)?;

    let legend_json = if config.write_legend {
        let path = legend::legend_path_for(output);
        let json = PhaseLegend::build(&grid, &colors).to_json_for(&path)?;
        Some((path, json))
    } else {
        None
    };

    render::write_image(&img, output)?;
    info!("Exported phase diagram to {} ({}x{})", output.display(), img.width(), img.height());

    let legend = match legend_json {
        Some((path, json)) => {
            if let Err(err) = legend::write_legend_json(&path, &json) {
                if let Err(cleanup) = fs::remove_file(output) {
                    warn!("Could not remove {}: {}", output.display(), cleanup);
                }
                return Err(err);
            }
            info!("Exported legend to {}", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(DiagramSummary {
        output: output.to_path_buf(),
        legend,
        temperatures: grid.columns(),
        pressures: grid.rows(),
        phases: grid.phase_names().len(),
        width: img.width(),
        height: img.height(),
        palette_wrapped: colors.wrapped(),
    })
}
