use super::CellGrid;

impl CellGrid {
    // === Index conversion ===
    #[inline]
    pub fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    #[inline]
    pub fn coords(&self, idx: usize) -> (u32, u32) {
        let row = (idx / self.cols as usize) as u32;
        let col = (idx % self.cols as usize) as u32;
        (row, col)
    }

    // === Bounds checking ===
    #[inline]
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && row < self.rows as i64 && col >= 0 && col < self.cols as i64
    }
}
