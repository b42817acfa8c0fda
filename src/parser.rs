//! Parser for four-column phase diagram data files.
//!
//! Each data line holds `temperature pressure phase_name energy`, separated by
//! whitespace or commas. Text after `#` is a comment. Rows must walk the
//! (T, P) grid in order: the major axis changes slowest, the minor axis
//! fastest, both ascending.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PhaseDiagramError, Point, Result, ShapeMismatch};
use crate::phase_grid::{AxisOrder, DataRow, PhaseGrid, PhaseId};
use crate::tilemap::Tilemap;

/// Default tolerance for treating two axis values as the same grid line
pub const DEFAULT_TOLERANCE: f64 = 1.0e-2;

#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    pub order: AxisOrder,
    /// Absolute tolerance when grouping axis values
    pub tolerance: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            order: AxisOrder::PressureMajor,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ParseOptions {
    /// A negative or non-finite tolerance would keep a value from matching itself.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(PhaseDiagramError::InvalidConfig(format!(
                "tolerance must be a finite number >= 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Read and parse a phase diagram file into a grid.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<PhaseGrid> {
    let text = fs::read_to_string(path).map_err(|source| PhaseDiagramError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = parse_rows(&text)?;
    if rows.is_empty() {
        return Err(PhaseDiagramError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    debug!("Read {} data rows from {}", rows.len(), path.display());
    build_grid(&rows, options)
}

/// Parse in-memory text. Empty input reports `<input>` as its path.
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<PhaseGrid> {
    let rows = parse_rows(text)?;
    if rows.is_empty() {
        return Err(PhaseDiagramError::EmptyInput {
            path: "<input>".into(),
        });
    }
    build_grid(&rows, options)
}

/// Parse every data line, in file order.
pub fn parse_rows(text: &str) -> Result<Vec<DataRow>> {
    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if let Some(row) = parse_line(raw, idx + 1)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Parse one line. Blank and comment-only lines give `Ok(None)`.
pub fn parse_line(raw: &str, line: usize) -> Result<Option<DataRow>> {
    let content = match raw.find('#') {
        Some(pos) => &raw[..pos],
        None => raw,
    }
    .trim();
    if content.is_empty() {
        return Ok(None);
    }

    let malformed = |reason: String| PhaseDiagramError::MalformedRow {
        line,
        content: content.to_string(),
        reason,
    };

    let fields: Vec<&str> = if content.contains(',') {
        content.split(',').map(str::trim).collect()
    } else {
        content.split_whitespace().collect()
    };
    if fields.len() != 4 {
        return Err(malformed(format!("expected 4 fields, found {}", fields.len())));
    }

    let number = |field: &str, name: &str| -> Result<f64> {
        match field.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(malformed(format!("{name} '{field}' is not finite"))),
            Err(_) => Err(malformed(format!("{name} '{field}' is not a number"))),
        }
    };

    let temperature = number(fields[0], "temperature")?;
    let pressure = number(fields[1], "pressure")?;
    let phase_name = fields[2];
    if phase_name.is_empty() {
        return Err(malformed("phase name is empty".to_string()));
    }
    let energy = number(fields[3], "energy")?;

    Ok(Some(DataRow {
        temperature,
        pressure,
        phase_name: phase_name.to_string(),
        energy,
        line,
    }))
}

/// Sorted distinct values, merging neighbours closer than `tolerance`.
fn distinct_sorted(values: impl Iterator<Item = f64>, tolerance: f64) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);

    let mut distinct: Vec<f64> = Vec::new();
    for v in sorted {
        match distinct.last() {
            Some(&last) if (v - last).abs() <= tolerance => {}
            _ => distinct.push(v),
        }
    }
    distinct
}

fn is_close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Arrange rows into a grid, checking that they walk it in order exactly once.
pub fn build_grid(rows: &[DataRow], options: &ParseOptions) -> Result<PhaseGrid> {
    options.validate()?;
    let tol = options.tolerance;
    let temperatures = distinct_sorted(rows.iter().map(|r| r.temperature), tol);
    let pressures = distinct_sorted(rows.iter().map(|r| r.pressure), tol);

    let expected = temperatures.len() * pressures.len();
    if rows.len() != expected {
        return Err(ShapeMismatch::RowCount {
            expected,
            actual: rows.len(),
            temperatures: temperatures.len(),
            pressures: pressures.len(),
        }
        .into());
    }

    let (outer_len, inner_len) = match options.order {
        AxisOrder::PressureMajor => (pressures.len(), temperatures.len()),
        AxisOrder::TemperatureMajor => (temperatures.len(), pressures.len()),
    };
    debug_assert_eq!(outer_len * inner_len, rows.len());

    let mut phase_names: Vec<String> = Vec::new();
    let mut lookup: HashMap<&str, PhaseId> = HashMap::new();
    let mut phases = Tilemap::new_with(temperatures.len(), pressures.len(), PhaseId::default());
    let mut energies = Tilemap::new_with(temperatures.len(), pressures.len(), 0.0f64);

    for (i, row) in rows.iter().enumerate() {
        let (outer, inner) = (i / inner_len, i % inner_len);
        let (p_rank, t_rank) = match options.order {
            AxisOrder::PressureMajor => (outer, inner),
            AxisOrder::TemperatureMajor => (inner, outer),
        };

        let want_t = temperatures[t_rank];
        let want_p = pressures[p_rank];
        if !is_close(row.temperature, want_t, tol) || !is_close(row.pressure, want_p, tol) {
            return Err(ShapeMismatch::Misplaced {
                line: row.line,
                found: Point {
                    temperature: row.temperature,
                    pressure: row.pressure,
                },
                expected: Point {
                    temperature: want_t,
                    pressure: want_p,
                },
            }
            .into());
        }

        let id = match lookup.get(row.phase_name.as_str()) {
            Some(&id) => id,
            None => {
                let id = u16::try_from(phase_names.len())
                    .map(PhaseId)
                    .map_err(|_| PhaseDiagramError::MalformedRow {
                        line: row.line,
                        content: row.phase_name.clone(),
                        reason: format!("more than {} distinct phases", u16::MAX),
                    })?;
                phase_names.push(row.phase_name.clone());
                lookup.insert(row.phase_name.as_str(), id);
                id
            }
        };

        phases.set(t_rank, p_rank, id);
        energies.set(t_rank, p_rank, row.energy);
    }

    debug!(
        "Built {}x{} grid ({}) with {} phases",
        temperatures.len(),
        pressures.len(),
        options.order.description(),
        phase_names.len()
    );

    Ok(PhaseGrid::from_parts(
        temperatures,
        pressures,
        phase_names,
        phases,
        energies,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_text(order: AxisOrder, temps: &[f64], press: &[f64], phase: impl Fn(f64, f64) -> String) -> String {
        let mut out = String::from("#  T(K)  P(GPa)  PhaseName  G(eV/atom)\n");
        match order {
            AxisOrder::PressureMajor => {
                for &p in press {
                    for &t in temps {
                        out.push_str(&format!("{t} {p} {} -1.0\n", phase(t, p)));
                    }
                }
            }
            AxisOrder::TemperatureMajor => {
                for &t in temps {
                    for &p in press {
                        out.push_str(&format!("{t} {p} {} -1.0\n", phase(t, p)));
                    }
                }
            }
        }
        out
    }

    fn by_pressure(_t: f64, p: f64) -> String {
        if p < 2.5 { "low".to_string() } else { "high".to_string() }
    }

    #[test]
    fn test_grid_shape_matches_distinct_axes() {
        let temps = [100.0, 200.0, 300.0, 400.0];
        let press = [1.0, 2.0, 3.0];
        let text = grid_text(AxisOrder::PressureMajor, &temps, &press, by_pressure);
        let grid = parse_str(&text, &ParseOptions::default()).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.temperatures(), &temps);
        assert_eq!(grid.pressures(), &press);
        assert_eq!(grid.phase_at(0, 3), "low");
        assert_eq!(grid.phase_at(2, 0), "high");
    }

    #[test]
    fn test_temperature_major_gives_same_grid() {
        let temps = [0.0, 10.0, 20.0];
        let press = [0.0, 1.0];
        let phase = |t: f64, p: f64| format!("ph{}", (t as i32 / 10) + (p as i32) * 3);

        let pm = parse_str(&grid_text(AxisOrder::PressureMajor, &temps, &press, phase), &ParseOptions::default()).unwrap();
        let options = ParseOptions {
            order: AxisOrder::TemperatureMajor,
            ..ParseOptions::default()
        };
        let tm = parse_str(&grid_text(AxisOrder::TemperatureMajor, &temps, &press, phase), &options).unwrap();

        assert_eq!(pm.name_rows(), tm.name_rows());
        assert_eq!(tm.rows(), 2);
        assert_eq!(tm.columns(), 3);
    }

    #[test]
    fn test_reparse_is_deterministic() {
        let text = grid_text(AxisOrder::PressureMajor, &[1.0, 2.0], &[5.0, 6.0, 7.0], by_pressure);
        let a = parse_str(&text, &ParseOptions::default()).unwrap();
        let b = parse_str(&text, &ParseOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_phase_names_in_first_seen_order() {
        let text = "100 1 zeta -1\n200 1 alpha -1\n100 2 zeta -1\n200 2 mu -1\n";
        let grid = parse_str(text, &ParseOptions::default()).unwrap();
        assert_eq!(grid.phase_names(), &["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_comments_blank_lines_and_commas() {
        let spaced = "100 1 A -1.5\n200 1 B -2.5\n";
        let commented = "# header\n\n100, 1, A, -1.5   # first\n   \n200,1,B,-2.5\n";
        let a = parse_str(spaced, &ParseOptions::default()).unwrap();
        let b = parse_str(commented, &ParseOptions::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.energy_at(0, 1), -2.5);
    }

    #[test]
    fn test_three_fields_is_malformed_with_line_number() {
        let text = "# header\n100 1 A -1\n200 1 B\n";
        let err = parse_str(text, &ParseOptions::default()).unwrap_err();
        match err {
            PhaseDiagramError::MalformedRow { line, ref reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("found 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_fields_are_malformed() {
        for (text, field) in [
            ("abc 1 A -1\n", "temperature"),
            ("100 x A -1\n", "pressure"),
            ("100 1 A energy\n", "energy"),
            ("100 1 A NaN\n", "energy"),
        ] {
            match parse_str(text, &ParseOptions::default()).unwrap_err() {
                PhaseDiagramError::MalformedRow { line, reason, .. } => {
                    assert_eq!(line, 1);
                    assert!(reason.contains(field), "{reason}");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_five_fields_is_malformed() {
        let err = parse_str("100 1 A -1 extra\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, PhaseDiagramError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn test_empty_phase_name_in_csv() {
        let err = parse_str("100, 1, , -1\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, PhaseDiagramError::MalformedRow { .. }));
    }

    #[test]
    fn test_missing_point_is_row_count_mismatch() {
        let temps = [100.0, 200.0, 300.0];
        let press = [1.0, 2.0, 3.0];
        let text = grid_text(AxisOrder::PressureMajor, &temps, &press, by_pressure);
        // Drop (T=200, P=2)
        let text: String = text
            .lines()
            .filter(|l| !l.starts_with("200 2 "))
            .map(|l| format!("{l}\n"))
            .collect();

        let err = parse_str(&text, &ParseOptions::default()).unwrap_err();
        match err {
            PhaseDiagramError::ShapeMismatch(ShapeMismatch::RowCount { expected, actual, .. }) => {
                assert_eq!(expected, 9);
                assert_eq!(actual, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_with_missing_is_misplaced() {
        // Right count, but (200, 1) duplicated in place of (200, 2)
        let text = "100 1 A -1\n200 1 A -1\n100 2 B -1\n200 1 B -1\n";
        let err = parse_str(text, &ParseOptions::default()).unwrap_err();
        match err {
            PhaseDiagramError::ShapeMismatch(ShapeMismatch::Misplaced { line, expected, .. }) => {
                assert_eq!(line, 4);
                assert_eq!(expected.pressure, 2.0);
                assert_eq!(expected.temperature, 200.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_axis_order_is_rejected() {
        let text = grid_text(AxisOrder::TemperatureMajor, &[1.0, 2.0], &[10.0, 20.0], by_pressure);
        let err = parse_str(&text, &ParseOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PhaseDiagramError::ShapeMismatch(ShapeMismatch::Misplaced { .. })
        ));
    }

    #[test]
    fn test_bad_tolerance_is_invalid_config() {
        let text = "100 1 A -1\n200 1 A -1\n100 2 B -1\n200 2 B -1\n";
        for tolerance in [-1.0, f64::NAN, f64::INFINITY] {
            let options = ParseOptions {
                tolerance,
                ..ParseOptions::default()
            };
            let err = parse_str(text, &options).unwrap_err();
            assert!(matches!(err, PhaseDiagramError::InvalidConfig(_)), "{tolerance}: {err}");
        }

        let exact = ParseOptions {
            tolerance: 0.0,
            ..ParseOptions::default()
        };
        assert_eq!(parse_str(text, &exact).unwrap().rows(), 2);
    }

    #[test]
    fn test_descending_input_is_rejected() {
        // The first row already sits where T=100 belongs
        let text = "200 1 A -1\n100 1 A -1\n";
        let err = parse_str(text, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_tolerance_groups_nearby_values() {
        let text = "100.000 1 A -1\n200.001 1 A -1\n100.004 2 B -1\n199.998 2 B -1\n";
        let grid = parse_str(text, &ParseOptions::default()).unwrap();
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.rows(), 2);

        let strict = ParseOptions {
            tolerance: 0.0,
            ..ParseOptions::default()
        };
        assert!(parse_str(text, &strict).is_err());
    }

    #[test]
    fn test_single_point() {
        let grid = parse_str("300 5 only -2\n", &ParseOptions::default()).unwrap();
        assert_eq!((grid.rows(), grid.columns()), (1, 1));
        assert_eq!(grid.phase_at(0, 0), "only");
    }

    #[test]
    fn test_comment_only_input_is_empty() {
        let err = parse_str("# nothing here\n\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, PhaseDiagramError::EmptyInput { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file(Path::new("/definitely/not/here.dat"), &ParseOptions::default()).unwrap_err();
        match err {
            PhaseDiagramError::FileNotFound { path, .. } => {
                assert_eq!(path, Path::new("/definitely/not/here.dat"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
