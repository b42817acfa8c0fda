//! JSON legend written alongside a rendered diagram.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PhaseDiagramError, Result};
use crate::palette::{hex_color, PhaseColorMap};
use crate::phase_grid::PhaseGrid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub name: String,
    /// `#rrggbb`
    pub color: String,
    /// Number of grid cells where this phase is stable
    pub cells: usize,
    pub min_energy: f64,
    pub max_energy: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisSummary {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl AxisSummary {
    fn of(values: &[f64]) -> Self {
        Self {
            min: values.first().copied().unwrap_or(0.0),
            max: values.last().copied().unwrap_or(0.0),
            count: values.len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseLegend {
    pub phases: Vec<LegendEntry>,
    pub temperature: AxisSummary,
    pub pressure: AxisSummary,
    pub palette_wrapped: bool,
}

impl PhaseLegend {
    pub fn build(grid: &PhaseGrid, colors: &PhaseColorMap) -> Self {
        let counts = grid.phase_cell_counts();
        let mut ranges = vec![(f64::INFINITY, f64::NEG_INFINITY); grid.phase_names().len()];
        for (x, y, id) in grid.phase_map().iter() {
            let energy = *grid.energy_map().get(x, y);
            let (lo, hi) = &mut ranges[id.index()];
            *lo = lo.min(energy);
            *hi = hi.max(energy);
        }

        let phases = colors
            .iter()
            .enumerate()
            .map(|(i, (name, color))| LegendEntry {
                name: name.to_string(),
                color: hex_color(color),
                cells: counts[i],
                min_energy: ranges[i].0,
                max_energy: ranges[i].1,
            })
            .collect();

        Self {
            phases,
            temperature: AxisSummary::of(grid.temperatures()),
            pressure: AxisSummary::of(grid.pressures()),
            palette_wrapped: colors.wrapped(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize, reporting failures against `path`.
    pub fn to_json_for(&self, path: &Path) -> Result<String> {
        self.to_json().map_err(|source| PhaseDiagramError::Legend {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_for(path)?;
        write_legend_json(path, &json)
    }
}

/// Write already serialized legend JSON.
pub fn write_legend_json(path: &Path, json: &str) -> Result<()> {
    fs::write(path, json).map_err(|source| PhaseDiagramError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// `diagram.png` -> `diagram.json`
pub fn legend_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}
