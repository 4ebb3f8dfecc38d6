use super::CellGrid;

/// Current/next generation pair.
///
/// Readers only ever see `current`; `next` is scratch until `swap`.
#[derive(Clone, Debug)]
pub struct GridBuffers {
    current: CellGrid,
    next: CellGrid,
}

impl GridBuffers {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            current: CellGrid::new(rows, cols),
            next: CellGrid::new(rows, cols),
        }
    }

    #[inline]
    pub fn current(&self) -> &CellGrid {
        &self.current
    }

    /// Mutable access for seeding and pattern insertion between generations
    #[inline]
    pub fn current_mut(&mut self) -> &mut CellGrid {
        &mut self.current
    }

    /// Read current while writing next
    #[inline]
    pub fn split(&mut self) -> (&CellGrid, &mut CellGrid) {
        (&self.current, &mut self.next)
    }

    /// Publish `next` as the new current generation
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.next.clear();
    }
}
