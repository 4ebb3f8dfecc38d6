use crate::core::rule::Cell;

use super::CellGrid;

const OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Live Moore neighbors of `(row, col)` in a row-major slice.
/// Neighbors off the edge count as dead (no wraparound).
#[inline]
pub fn count_neighbors(cells: &[Cell], rows: u32, cols: u32, row: u32, col: u32) -> u8 {
    let (rows, cols) = (rows as i64, cols as i64);
    let mut count = 0u8;
    for (dr, dc) in OFFSETS {
        let r = row as i64 + dr;
        let c = col as i64 + dc;
        if r >= 0 && r < rows && c >= 0 && c < cols {
            count += cells[(r * cols + c) as usize];
        }
    }
    count
}

impl CellGrid {
    #[inline]
    pub fn alive_neighbors(&self, row: u32, col: u32) -> u8 {
        count_neighbors(&self.cells, self.rows, self.cols, row, col)
    }
}
