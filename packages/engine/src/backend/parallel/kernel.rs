//! Generation kernel
//!
//! One task per row: each reads only `current` and writes only its own row
//! of `next` (plus its own rng states and pixels), so rows never contend.
//! Rule evaluation, virtual fill, alive counting and render mapping writes
//! are fused into this single pass.

use rayon::prelude::*;

use crate::backend::render::paint_row;
use crate::core::rule::{next_cell, Cell, ALIVE, DEAD};
use crate::spatial::grid::count_neighbors;
use crate::systems::ReseedController;

use super::device::DeviceGrid;

pub struct KernelOutput {
    pub alive: u64,
    /// Rows whose mapped pixels changed (empty when unmapped)
    pub changed_rows: Vec<u32>,
}

#[inline]
fn step_row(
    current: &[Cell],
    rows: u32,
    cols: u32,
    row: u32,
    next_row: &mut [Cell],
    rng_row: &mut [u32],
    reseed: ReseedController,
) -> u64 {
    let mut alive = 0u64;
    for (col, (out, state)) in next_row.iter_mut().zip(rng_row.iter_mut()).enumerate() {
        let idx = row as usize * cols as usize + col;
        let neighbors = count_neighbors(current, rows, cols, row, col as u32);
        let mut cell = next_cell(neighbors, current[idx]);
        if cell == DEAD && reseed.is_enabled() && reseed.roll_device(state) {
            cell = ALIVE;
        }
        *out = cell;
        alive += cell as u64;
    }
    alive
}

/// Compute `next` from `current`. The caller swaps after completion.
pub fn step_generation(grid: &mut DeviceGrid, reseed: ReseedController) -> KernelOutput {
    let (rows, cols) = (grid.rows, grid.cols);
    let width = cols as usize;
    let DeviceGrid {
        current,
        next,
        rng_states,
        mapping,
        ..
    } = grid;
    let current: &[Cell] = current;

    let per_row: Vec<(u64, bool)> = match mapping {
        Some(mapping) => next
            .par_chunks_mut(width)
            .zip(rng_states.par_chunks_mut(width))
            .zip(mapping.pixels.par_chunks_mut(width))
            .enumerate()
            .map(|(row, ((next_row, rng_row), pixels))| {
                let alive = step_row(current, rows, cols, row as u32, next_row, rng_row, reseed);
                (alive, paint_row(next_row, pixels))
            })
            .collect(),
        None => next
            .par_chunks_mut(width)
            .zip(rng_states.par_chunks_mut(width))
            .enumerate()
            .map(|(row, (next_row, rng_row))| {
                (step_row(current, rows, cols, row as u32, next_row, rng_row, reseed), false)
            })
            .collect(),
    };

    let alive = per_row.iter().map(|&(a, _)| a).sum();
    let changed_rows = per_row
        .iter()
        .enumerate()
        .filter_map(|(row, &(_, changed))| changed.then_some(row as u32))
        .collect();
    KernelOutput {
        alive,
        changed_rows,
    }
}
