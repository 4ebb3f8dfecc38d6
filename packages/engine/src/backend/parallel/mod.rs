//! # Parallel Backend
//!
//! Data-parallel generations on a dedicated rayon device pool.
//!
//! - Device buffers are allocated once and never shared with the host
//! - Seeding and patterns are staged on the host and transferred
//! - Virtual fill uses per-cell device rng states (no host round-trip)
//! - With rendering on, the kernel writes pixels directly (render mapping);
//!   `update_render_buffers` only flags the rows that changed

use std::time::Duration;

use rand::rngs::SmallRng;

use crate::core::config::{check_probability, EngineConfig};
use crate::core::error::EngineResult;
use crate::core::random::{fill_cells, host_rng};
use crate::core::rule::{ALIVE, DEAD};
use crate::domain::Pattern;
use crate::spatial::{CellGrid, DirtyRows};
use crate::systems::ReseedController;

use super::render::RenderFrame;
use super::{BackendKind, ComputeBackend};

mod device;
mod kernel;

pub use device::{Device, DeviceGrid, RenderMapping};
#[cfg(target_arch = "wasm32")]
pub(crate) use device::global_pool;

pub struct ParallelBackend {
    device: Device,
    rows: u32,
    cols: u32,
    reseed: ReseedController,
    rng: SmallRng,
    generation: u64,
    /// Rows the kernel or a transfer changed since the last render update
    pending_rows: Vec<u32>,
    dirty: Option<DirtyRows>,
}

impl ParallelBackend {
    pub fn new(config: &EngineConfig, seed: u64) -> EngineResult<Self> {
        config.validate()?;
        let reseed = ReseedController::new(config.virtual_fill_prob)?;
        let device = Device::acquire(
            config.device_threads,
            Duration::from_millis(config.device_timeout_ms),
            config.rows,
            config.cols,
            seed,
            config.render,
        )?;
        let dirty = config.render.then(|| {
            let mut dirty = DirtyRows::new(config.rows);
            dirty.mark_all();
            dirty
        });
        Ok(Self {
            device,
            rows: config.rows,
            cols: config.cols,
            reseed,
            rng: host_rng(seed),
            generation: 0,
            pending_rows: Vec::new(),
            dirty,
        })
    }

    pub fn workers(&self) -> usize {
        self.device.workers()
    }

    /// Device grid for host reads; a lost device is logged and reads as empty
    fn readable_grid(&self) -> Option<&DeviceGrid> {
        match self.device.grid() {
            Ok(grid) => Some(grid),
            Err(e) => {
                tracing::warn!("Reading from an unusable device: {}", e);
                None
            }
        }
    }

    fn queue_rows(&mut self, rows: Vec<u32>) {
        if self.dirty.is_some() {
            self.pending_rows.extend(rows);
        }
    }
}

impl ComputeBackend for ParallelBackend {
    fn compute_grid(&mut self, count_alive: bool) -> EngineResult<Option<u64>> {
        let reseed = self.reseed;
        let output = self
            .device
            .launch(move |grid| kernel::step_generation(grid, reseed))?;
        self.device.grid_mut()?.swap();
        self.generation += 1;
        self.queue_rows(output.changed_rows);
        Ok(count_alive.then_some(output.alive))
    }

    fn update_render_buffers(&mut self) {
        if let Some(dirty) = self.dirty.as_mut() {
            for row in self.pending_rows.drain(..) {
                dirty.mark(row);
            }
        }
    }

    fn insert_pattern(&mut self, pattern: &Pattern, row: i64, col: i64) -> EngineResult<usize> {
        let grid = self.device.grid_mut()?;
        let cells = pattern.cells_at(row, col, grid.rows, grid.cols);
        let rows = grid.write_cells(&cells, ALIVE);
        self.queue_rows(rows);
        Ok(cells.len())
    }

    fn seed_random(&mut self, fill_probability: f32) -> EngineResult<()> {
        check_probability("fill_prob", fill_probability)?;
        let size = self.device.grid()?.size();
        let mut staging = vec![DEAD; size];
        let alive = fill_cells(&mut staging, fill_probability, &mut self.rng);
        let rows = self.device.grid_mut()?.upload(&staging);
        self.queue_rows(rows);
        tracing::debug!("Uploaded {} live cells (p = {})", alive, fill_probability);
        Ok(())
    }

    fn clear(&mut self) -> EngineResult<()> {
        let size = self.device.grid()?.size();
        let rows = self.device.grid_mut()?.upload(&vec![DEAD; size]);
        self.queue_rows(rows);
        Ok(())
    }

    fn render_frame(&self) -> Option<RenderFrame<'_>> {
        let grid = self.device.grid().ok()?;
        let mapping = grid.mapping.as_ref()?;
        Some(RenderFrame {
            pixels: &mapping.pixels,
            rows: grid.rows,
            cols: grid.cols,
            generation: self.generation,
        })
    }

    fn take_dirty_rows(&mut self) -> Vec<u32> {
        self.dirty
            .as_mut()
            .map(DirtyRows::drain)
            .unwrap_or_default()
    }

    fn snapshot(&self) -> CellGrid {
        self.readable_grid()
            .and_then(|grid| CellGrid::from_cells(grid.rows, grid.cols, grid.download()))
            .unwrap_or_else(|| CellGrid::new(self.rows, self.cols))
    }

    fn alive_count(&self) -> u64 {
        self.readable_grid().map(DeviceGrid::alive_count).unwrap_or(0)
    }

    fn is_lost(&self) -> bool {
        self.device.is_lost()
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn rows(&self) -> u32 {
        self.rows
    }

    fn cols(&self) -> u32 {
        self.cols
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Parallel
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}
