//! Synthetic phase diagram data for demos and tests.
//!
//! Fills a regular (T, P) grid with phases `test1..testN`, switching to the
//! next phase after roughly `total_points / N` points in file order.

use std::fmt::Write as _;

use crate::error::{PhaseDiagramError, Result};
use crate::phase_grid::AxisOrder;

/// Header line written at the top of every generated file
pub const HEADER: &str = "#  T(K)        P(GPa)                   PhaseName             G(eV/atom)";

/// Inclusive, evenly spaced axis range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Number of samples from `min` to `max` inclusive.
    pub fn count(&self) -> usize {
        ((self.max - self.min) / self.step + 1.0e-9).floor() as usize + 1
    }

    /// Sample `i`, computed directly so no rounding error accumulates.
    pub fn value(&self, i: usize) -> f64 {
        self.min + i as f64 * self.step
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(PhaseDiagramError::InvalidConfig(format!(
                "{name} step must be positive, got {}",
                self.step
            )));
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(PhaseDiagramError::InvalidConfig(format!(
                "{name} range {}..{} is inverted or not finite",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Configuration for a generated diagram
#[derive(Clone, Copy, Debug)]
pub struct FakeDiagramConfig {
    pub num_phases: usize,
    pub temperature: AxisRange,
    pub pressure: AxisRange,
    pub order: AxisOrder,
}

impl Default for FakeDiagramConfig {
    fn default() -> Self {
        Self {
            num_phases: 3,
            temperature: AxisRange::new(0.0, 3000.0, 10.0),
            pressure: AxisRange::new(0.0, 100.0, 1.0),
            order: AxisOrder::PressureMajor,
        }
    }
}

impl FakeDiagramConfig {
    pub fn with_phases(num_phases: usize) -> Self {
        Self {
            num_phases,
            ..Self::default()
        }
    }

    pub fn total_points(&self) -> usize {
        self.temperature.count() * self.pressure.count()
    }
}

/// Default output file name for `num_phases` phases.
pub fn default_file_name(num_phases: usize) -> String {
    format!("fake_diagram_with_{}_phases.out", num_phases)
}

/// Generate the data file contents.
pub fn generate_fake_diagram(config: &FakeDiagramConfig) -> Result<String> {
    if config.num_phases == 0 {
        return Err(PhaseDiagramError::InvalidConfig(
            "number of phases must be at least 1".to_string(),
        ));
    }
    config.temperature.validate("temperature")?;
    config.pressure.validate("pressure")?;

    let points_per_phase = config.total_points() as f64 / config.num_phases as f64;
    let (outer, inner) = match config.order {
        AxisOrder::PressureMajor => (config.pressure, config.temperature),
        AxisOrder::TemperatureMajor => (config.temperature, config.pressure),
    };

    let mut out = String::with_capacity(config.total_points() * 32);
    out.push_str(HEADER);
    out.push('\n');

    let mut phase_index = 0usize;
    let mut point_counter = 0usize;
    for i in 0..outer.count() {
        for j in 0..inner.count() {
            if point_counter as f64 >= points_per_phase && phase_index + 1 < config.num_phases {
                phase_index += 1;
                point_counter = 0;
            }

            let (t, p) = match config.order {
                AxisOrder::PressureMajor => (inner.value(j), outer.value(i)),
                AxisOrder::TemperatureMajor => (outer.value(i), inner.value(j)),
            };
            // Writing to a String cannot fail
            let _ = writeln!(out, "{:.1}     {:.1}     test{}     {:.1}", t, p, phase_index + 1, -1.0);
            point_counter += 1;
        }
    }

    Ok(out)
}
