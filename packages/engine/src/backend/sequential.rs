//! # Sequential Backend
//!
//! Single execution context, no locking. The renderer only sees the host
//! render buffer, refreshed by an explicit copy between generations.

use rand::rngs::SmallRng;

use crate::core::config::{check_probability, EngineConfig};
use crate::core::error::EngineResult;
use crate::core::random::{fill_cells, host_rng};
use crate::core::rule::{next_cell, ALIVE, DEAD};
use crate::domain::Pattern;
use crate::spatial::{CellGrid, GridBuffers};
use crate::systems::ReseedController;

use super::render::{RenderBuffer, RenderFrame};
use super::{BackendKind, ComputeBackend};

pub struct SequentialBackend {
    buffers: GridBuffers,
    reseed: ReseedController,
    rng: SmallRng,
    render: Option<RenderBuffer>,
    generation: u64,
}

impl SequentialBackend {
    pub fn new(config: &EngineConfig, seed: u64) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            buffers: GridBuffers::new(config.rows, config.cols),
            reseed: ReseedController::new(config.virtual_fill_prob)?,
            rng: host_rng(seed),
            render: config
                .render
                .then(|| RenderBuffer::new(config.rows, config.cols)),
            generation: 0,
        })
    }

    pub fn current(&self) -> &CellGrid {
        self.buffers.current()
    }
}

impl ComputeBackend for SequentialBackend {
    fn compute_grid(&mut self, count_alive: bool) -> EngineResult<Option<u64>> {
        let reseed = self.reseed;
        let rng = &mut self.rng;
        let (current, next) = self.buffers.split();
        let (rows, cols) = (current.rows(), current.cols());

        let mut alive = 0u64;
        for row in 0..rows {
            for col in 0..cols {
                let idx = current.index(row, col);
                let mut cell = next_cell(current.alive_neighbors(row, col), current.cells[idx]);
                // virtual fill lands in next so it joins the following generation
                if cell == DEAD && reseed.is_enabled() && reseed.roll(rng) {
                    cell = ALIVE;
                }
                next.cells[idx] = cell;
                if count_alive {
                    alive += cell as u64;
                }
            }
        }

        self.buffers.swap();
        self.generation += 1;
        Ok(count_alive.then_some(alive))
    }

    fn update_render_buffers(&mut self) {
        if let Some(render) = self.render.as_mut() {
            render.copy_from(self.buffers.current(), self.generation);
        }
    }

    fn insert_pattern(&mut self, pattern: &Pattern, row: i64, col: i64) -> EngineResult<usize> {
        let current = self.buffers.current_mut();
        let cells = pattern.cells_at(row, col, current.rows(), current.cols());
        for &idx in &cells {
            current.cells[idx] = ALIVE;
        }
        Ok(cells.len())
    }

    fn seed_random(&mut self, fill_probability: f32) -> EngineResult<()> {
        check_probability("fill_prob", fill_probability)?;
        let current = self.buffers.current_mut();
        let alive = fill_cells(&mut current.cells, fill_probability, &mut self.rng);
        tracing::debug!("Seeded {} live cells (p = {})", alive, fill_probability);
        Ok(())
    }

    fn clear(&mut self) -> EngineResult<()> {
        self.buffers.clear();
        Ok(())
    }

    fn render_frame(&self) -> Option<RenderFrame<'_>> {
        self.render.as_ref().map(RenderBuffer::frame)
    }

    fn take_dirty_rows(&mut self) -> Vec<u32> {
        self.render
            .as_mut()
            .map(RenderBuffer::take_dirty_rows)
            .unwrap_or_default()
    }

    fn snapshot(&self) -> CellGrid {
        self.buffers.current().clone()
    }

    fn alive_count(&self) -> u64 {
        self.buffers.current().alive_count()
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn rows(&self) -> u32 {
        self.buffers.current().rows()
    }

    fn cols(&self) -> u32 {
        self.buffers.current().cols()
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Sequential
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
