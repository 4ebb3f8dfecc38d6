//! CellGrid - row-major cell storage
//!
//! One byte per cell (0 = dead, 1 = alive) in a single contiguous array.
//! `GridBuffers` pairs two of these as current/next generations.

use crate::core::rule::{Cell, ALIVE, DEAD};

mod double_buffer;
mod indexing;
mod neighbors;

pub use double_buffer::GridBuffers;
pub use neighbors::count_neighbors;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    rows: u32,
    cols: u32,
    size: usize,
    pub cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(rows: u32, cols: u32) -> Self {
        let size = rows as usize * cols as usize;
        Self {
            rows,
            cols,
            size,
            cells: vec![DEAD; size],
        }
    }

    /// Wrap an existing cell vector; `None` if the length does not match
    pub fn from_cells(rows: u32, cols: u32, cells: Vec<Cell>) -> Option<Self> {
        let size = rows as usize * cols as usize;
        (cells.len() == size).then_some(Self {
            rows,
            cols,
            size,
            cells,
        })
    }

    // === Dimensions ===
    #[inline]
    pub fn rows(&self) -> u32 { self.rows }

    #[inline]
    pub fn cols(&self) -> u32 { self.cols }

    #[inline]
    pub fn size(&self) -> usize { self.size }

    // === Cell access ===
    #[inline]
    pub fn is_alive(&self, row: u32, col: u32) -> bool {
        self.in_bounds(row as i64, col as i64) && self.cells[self.index(row, col)] != DEAD
    }

    /// Set a cell; out-of-range coordinates are ignored
    #[inline]
    pub fn set(&mut self, row: u32, col: u32, alive: bool) -> bool {
        if !self.in_bounds(row as i64, col as i64) {
            return false;
        }
        let idx = self.index(row, col);
        self.cells[idx] = if alive { ALIVE } else { DEAD };
        true
    }

    pub fn clear(&mut self) {
        self.cells.fill(DEAD);
    }

    pub fn alive_count(&self) -> u64 {
        self.cells.iter().filter(|&&c| c != DEAD).count() as u64
    }

    pub fn row(&self, row: u32) -> &[Cell] {
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Live cell coordinates in row-major order
    pub fn alive_cells(&self) -> Vec<(u32, u32)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != DEAD)
            .map(|(idx, _)| self.coords(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_ignores_out_of_range() {
        let mut grid = CellGrid::new(3, 4);
        assert!(grid.set(2, 3, true));
        assert!(!grid.set(3, 0, true));
        assert!(!grid.set(0, 4, true));
        assert_eq!(grid.alive_count(), 1);
        assert_eq!(grid.alive_cells(), vec![(2, 3)]);
    }

    #[test]
    fn from_cells_checks_length() {
        assert!(CellGrid::from_cells(2, 2, vec![0; 4]).is_some());
        assert!(CellGrid::from_cells(2, 2, vec![0; 5]).is_none());
    }

    #[test]
    fn rows_are_contiguous() {
        let mut grid = CellGrid::new(2, 3);
        grid.set(1, 0, true);
        assert_eq!(grid.row(0), &[0, 0, 0]);
        assert_eq!(grid.row(1), &[1, 0, 0]);
    }
}
