//! Phase colors.
//!
//! Phases get colors from a fixed ten-color palette in first-seen order. With
//! more than ten phases the palette wraps, so two phases can share a color.
//! The `NO_PHASE_DATA` sentinel always renders white and never takes a slot.

use image::Rgb;
use tracing::warn;

use crate::phase_grid::{PhaseGrid, PhaseId, NO_PHASE_DATA};

/// Named palette, in assignment order
pub const PHASE_COLORS: [(&str, [u8; 3]); 10] = [
    ("red", [255, 0, 0]),
    ("blue", [0, 0, 255]),
    ("gray", [128, 128, 128]),
    ("brown", [165, 42, 42]),
    ("black", [0, 0, 0]),
    ("purple", [128, 0, 128]),
    ("orange", [255, 165, 0]),
    ("yellow", [255, 255, 0]),
    ("pink", [255, 192, 203]),
    ("green", [0, 128, 0]),
];

pub const NO_DATA_COLOR: [u8; 3] = [255, 255, 255];

#[derive(Clone, Debug, PartialEq)]
pub struct PhaseColorMap {
    /// Indexed by `PhaseId`
    entries: Vec<(String, Rgb<u8>)>,
    wrapped: bool,
}

impl PhaseColorMap {
    /// Assign colors to phase names, in the order given.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut entries = Vec::with_capacity(names.len());
        let mut slot = 0usize;

        for name in names {
            let name = name.as_ref();
            let color = if name == NO_PHASE_DATA {
                NO_DATA_COLOR
            } else {
                let (_, rgb) = PHASE_COLORS[slot % PHASE_COLORS.len()];
                slot += 1;
                rgb
            };
            entries.push((name.to_string(), Rgb(color)));
        }

        let wrapped = slot > PHASE_COLORS.len();
        if wrapped {
            warn!(
                "{} phases but only {} palette colors; colors repeat",
                slot,
                PHASE_COLORS.len()
            );
        }

        Self { entries, wrapped }
    }

    pub fn from_grid(grid: &PhaseGrid) -> Self {
        Self::from_names(grid.phase_names())
    }

    pub fn color(&self, id: PhaseId) -> Rgb<u8> {
        self.entries[id.index()].1
    }

    pub fn color_of(&self, name: &str) -> Option<Rgb<u8>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when more phases than palette colors were assigned.
    pub fn wrapped(&self) -> bool {
        self.wrapped
    }

    /// `(name, color)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb<u8>)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }
}

/// Format a color as `#rrggbb`.
pub fn hex_color(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
