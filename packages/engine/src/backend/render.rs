//! Render buffers - what the display reads between generations
//!
//! Pixels are ABGR packed (little-endian bytes RR,GG,BB,AA) so a canvas can
//! copy them without conversion.

use crate::core::rule::{Cell, DEAD};
use crate::spatial::{CellGrid, DirtyRows};

pub const ALIVE_COLOR: u32 = 0xFFFFFFFF;
pub const DEAD_COLOR: u32 = 0xFF0A0A0A;

#[inline(always)]
pub fn cell_color(cell: Cell) -> u32 {
    if cell == DEAD { DEAD_COLOR } else { ALIVE_COLOR }
}

/// Repaint one row of pixels, returning whether anything changed
#[inline]
pub fn paint_row(cells: &[Cell], pixels: &mut [u32]) -> bool {
    let mut changed = false;
    for (&cell, pixel) in cells.iter().zip(pixels.iter_mut()) {
        let color = cell_color(cell);
        if *pixel != color {
            *pixel = color;
            changed = true;
        }
    }
    changed
}

/// Read-only view of the generation currently on display
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame<'a> {
    pub pixels: &'a [u32],
    pub rows: u32,
    pub cols: u32,
    /// Generation the pixels belong to
    pub generation: u64,
}

impl RenderFrame<'_> {
    #[inline]
    pub fn pixel(&self, row: u32, col: u32) -> u32 {
        self.pixels[row as usize * self.cols as usize + col as usize]
    }

    pub fn is_alive(&self, row: u32, col: u32) -> bool {
        self.pixel(row, col) == ALIVE_COLOR
    }
}

/// Host-side render target filled by explicit copies
pub struct RenderBuffer {
    rows: u32,
    cols: u32,
    pixels: Vec<u32>,
    dirty: DirtyRows,
    generation: u64,
}

impl RenderBuffer {
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut dirty = DirtyRows::new(rows);
        dirty.mark_all();
        Self {
            rows,
            cols,
            pixels: vec![DEAD_COLOR; rows as usize * cols as usize],
            dirty,
            generation: 0,
        }
    }

    /// Copy a completed generation, marking the rows that changed
    pub fn copy_from(&mut self, grid: &CellGrid, generation: u64) {
        let cols = self.cols as usize;
        for (row, pixels) in self.pixels.chunks_mut(cols).enumerate() {
            if paint_row(grid.row(row as u32), pixels) {
                self.dirty.mark(row as u32);
            }
        }
        self.generation = generation;
    }

    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            pixels: &self.pixels,
            rows: self.rows,
            cols: self.cols,
            generation: self.generation,
        }
    }

    pub fn take_dirty_rows(&mut self) -> Vec<u32> {
        self.dirty.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_marks_only_changed_rows() {
        let mut buffer = RenderBuffer::new(3, 3);
        let mut grid = CellGrid::new(3, 3);
        buffer.copy_from(&grid, 0);
        // fresh buffers start fully dirty
        assert_eq!(buffer.take_dirty_rows(), vec![0, 1, 2]);

        grid.set(1, 2, true);
        buffer.copy_from(&grid, 1);
        assert_eq!(buffer.take_dirty_rows(), vec![1]);

        let frame = buffer.frame();
        assert_eq!(frame.generation, 1);
        assert!(frame.is_alive(1, 2));
        assert!(!frame.is_alive(0, 0));
    }
}
