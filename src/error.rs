//! Error types for parsing, rendering and writing phase diagrams.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, PhaseDiagramError>;

/// A (temperature, pressure) coordinate as it appears in an error report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub temperature: f64,
    pub pressure: f64,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(T={}, P={})", self.temperature, self.pressure)
    }
}

/// Ways the parsed rows can fail to form a rectangular grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeMismatch {
    /// Row count is not #temperatures x #pressures.
    #[error(
        "expected {expected} rows ({temperatures} temperatures x {pressures} pressures), found {actual}"
    )]
    RowCount {
        expected: usize,
        actual: usize,
        temperatures: usize,
        pressures: usize,
    },

    /// A row does not sit at the grid slot its position in the file implies.
    #[error("line {line}: found {found}, expected {expected} at this position")]
    Misplaced {
        line: usize,
        found: Point,
        expected: Point,
    },
}

#[derive(Debug, Error)]
pub enum PhaseDiagramError {
    #[error("cannot read input file {}: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed row at line {line} ({reason}): '{content}'")]
    MalformedRow {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("no phase data found in {}", path.display())]
    EmptyInput { path: PathBuf },

    #[error("grid shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatch),

    #[error("cannot write output file {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported image format for {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to encode image for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to serialize legend for {}: {source}", path.display())]
    Legend {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PhaseDiagramError {
    /// Source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedRow { line, .. } => Some(*line),
            Self::ShapeMismatch(ShapeMismatch::Misplaced { line, .. }) => Some(*line),
            _ => None,
        }
    }
}
