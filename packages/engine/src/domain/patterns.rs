//! Patterns - relative cell offsets anchored on the grid
//!
//! Built-ins are compile-time tables. Offsets are (row, col) from the
//! pattern's top-left corner; insertion drops whatever lands off the grid.

use serde::{Deserialize, Serialize};

pub struct BuiltinPattern {
    pub name: &'static str,
    pub cells: &'static [(u32, u32)],
}

/// Moves (+1, +1) every 4 generations
pub const GLIDER: BuiltinPattern = BuiltinPattern {
    name: "glider",
    cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
};

/// Period 2 oscillator (horizontal phase)
pub const BLINKER: BuiltinPattern = BuiltinPattern {
    name: "blinker",
    cells: &[(0, 0), (0, 1), (0, 2)],
};

pub const BLOCK: BuiltinPattern = BuiltinPattern {
    name: "block",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
};

pub const TOAD: BuiltinPattern = BuiltinPattern {
    name: "toad",
    cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
};

pub const BEACON: BuiltinPattern = BuiltinPattern {
    name: "beacon",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
};

pub const BUILTIN_PATTERNS: &[BuiltinPattern] = &[GLIDER, BLINKER, BLOCK, TOAD, BEACON];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub cells: Vec<(u32, u32)>,
}

impl From<&BuiltinPattern> for Pattern {
    fn from(builtin: &BuiltinPattern) -> Self {
        Self {
            name: builtin.name.to_string(),
            cells: builtin.cells.to_vec(),
        }
    }
}

impl Pattern {
    pub fn new(name: impl Into<String>, cells: Vec<(u32, u32)>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        BUILTIN_PATTERNS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(Pattern::from)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounding box as (height, width)
    pub fn extent(&self) -> (u32, u32) {
        self.cells.iter().fold((0, 0), |(h, w), &(r, c)| {
            (h.max(r.saturating_add(1)), w.max(c.saturating_add(1)))
        })
    }

    /// Anchor that centers the pattern on a `rows x cols` grid
    pub fn centered_anchor(&self, rows: u32, cols: u32) -> (i64, i64) {
        let (h, w) = self.extent();
        (
            rows as i64 / 2 - h as i64 / 2,
            cols as i64 / 2 - w as i64 / 2,
        )
    }

    /// Row-major indices of the pattern cells placed at the anchor,
    /// skipping every cell that falls outside the grid.
    pub fn cells_at(&self, anchor_row: i64, anchor_col: i64, rows: u32, cols: u32) -> Vec<usize> {
        self.cells
            .iter()
            .filter_map(|&(r, c)| {
                let row = anchor_row.checked_add(r as i64)?;
                let col = anchor_col.checked_add(c as i64)?;
                (row >= 0 && row < rows as i64 && col >= 0 && col < cols as i64)
                    .then(|| row as usize * cols as usize + col as usize)
            })
            .collect()
    }
}
