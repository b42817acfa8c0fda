//! Phase grid: the stable phase at every sampled (temperature, pressure) point.
//!
//! Cells are indexed `[pressure_rank][temperature_rank]`, i.e. the tilemap's
//! `y` is the pressure rank and `x` is the temperature rank. Rank 0 is the
//! lowest value on each axis.

use crate::tilemap::Tilemap;

/// Phase name used for points that carry no phase information.
pub const NO_PHASE_DATA: &str = "NO_PHASE_DATA";

/// Index into a grid's phase-name table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseId(pub u16);

impl PhaseId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which axis varies slowest in the input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AxisOrder {
    /// Pressure is the outer key, temperature varies fastest
    #[default]
    PressureMajor,
    /// Temperature is the outer key, pressure varies fastest
    TemperatureMajor,
}

impl AxisOrder {
    pub fn all() -> &'static [Self] {
        &[Self::PressureMajor, Self::TemperatureMajor]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::PressureMajor => "pressure outer, temperature inner",
            Self::TemperatureMajor => "temperature outer, pressure inner",
        }
    }
}

impl std::fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PressureMajor => write!(f, "pressure-major"),
            Self::TemperatureMajor => write!(f, "temperature-major"),
        }
    }
}

/// One observation from the input file.
#[derive(Clone, Debug, PartialEq)]
pub struct DataRow {
    pub temperature: f64,
    pub pressure: f64,
    pub phase_name: String,
    /// Not used for rendering; kept for the legend summary
    pub energy: f64,
    /// 1-based line number in the source
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhaseGrid {
    temperatures: Vec<f64>,
    pressures: Vec<f64>,
    /// Distinct phase names in first-seen file order
    phase_names: Vec<String>,
    phases: Tilemap<PhaseId>,
    energies: Tilemap<f64>,
}

impl PhaseGrid {
    /// Assemble a grid from already-validated parts.
    ///
    /// `phases` and `energies` must be `temperatures.len()` wide and
    /// `pressures.len()` tall, and every id must index into `phase_names`.
    pub(crate) fn from_parts(
        temperatures: Vec<f64>,
        pressures: Vec<f64>,
        phase_names: Vec<String>,
        phases: Tilemap<PhaseId>,
        energies: Tilemap<f64>,
    ) -> Self {
        debug_assert_eq!(phases.width, temperatures.len());
        debug_assert_eq!(phases.height, pressures.len());
        debug_assert_eq!(energies.width, phases.width);
        debug_assert_eq!(energies.height, phases.height);
        Self {
            temperatures,
            pressures,
            phase_names,
            phases,
            energies,
        }
    }

    /// Distinct temperatures, ascending.
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Distinct pressures, ascending.
    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    pub fn phase_names(&self) -> &[String] {
        &self.phase_names
    }

    /// Number of pressure rows.
    pub fn rows(&self) -> usize {
        self.phases.height
    }

    /// Number of temperature columns.
    pub fn columns(&self) -> usize {
        self.phases.width
    }

    pub fn phase_id_at(&self, pressure_rank: usize, temperature_rank: usize) -> PhaseId {
        *self.phases.get(temperature_rank, pressure_rank)
    }

    pub fn phase_at(&self, pressure_rank: usize, temperature_rank: usize) -> &str {
        let id = self.phase_id_at(pressure_rank, temperature_rank);
        &self.phase_names[id.index()]
    }

    pub fn energy_at(&self, pressure_rank: usize, temperature_rank: usize) -> f64 {
        *self.energies.get(temperature_rank, pressure_rank)
    }

    pub fn phase_map(&self) -> &Tilemap<PhaseId> {
        &self.phases
    }

    pub fn energy_map(&self) -> &Tilemap<f64> {
        &self.energies
    }

    /// How many cells each phase occupies, indexed by `PhaseId`.
    pub fn phase_cell_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.phase_names.len()];
        for (_, _, id) in self.phases.iter() {
            counts[id.index()] += 1;
        }
        counts
    }

    /// Grid rows as phase names, lowest pressure first.
    pub fn name_rows(&self) -> Vec<Vec<&str>> {
        self.phases
            .rows()
            .map(|row| row.iter().map(|id| self.phase_names[id.index()].as_str()).collect())
            .collect()
    }
}
