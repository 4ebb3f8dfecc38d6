//! # Compute Backends
//!
//! Two interchangeable implementations of [`ComputeBackend`]:
//! - **Sequential**: one thread walks every cell (always available)
//! - **Parallel**: a dedicated rayon device pool with its own buffers
//!   (feature `parallel`)
//!
//! The backend is chosen once by [`create_backend`] and never switched.

pub mod render;
mod sequential;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use render::{RenderBuffer, RenderFrame, ALIVE_COLOR, DEAD_COLOR};
pub use sequential::SequentialBackend;

#[cfg(feature = "parallel")]
pub use parallel::ParallelBackend;

use crate::core::config::EngineConfig;
use crate::core::error::EngineResult;
use crate::domain::Pattern;
use crate::spatial::CellGrid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Sequential,
    Parallel,
}

/// Compute contract shared by both backends.
///
/// Every method runs between generations: `compute_grid` returns only after
/// the new generation is complete and published as current.
pub trait ComputeBackend: Send {
    /// Advance one generation. With `count_alive` the live cells of the new
    /// generation are counted in the same pass.
    fn compute_grid(&mut self, count_alive: bool) -> EngineResult<Option<u64>>;

    /// Bring the render buffer up to date with the current generation
    /// (no-op when rendering is disabled)
    fn update_render_buffers(&mut self);

    /// Set the pattern's cells alive at the anchor; returns how many landed
    /// on the grid
    fn insert_pattern(&mut self, pattern: &Pattern, row: i64, col: i64) -> EngineResult<usize>;

    /// Replace the current generation with independent random cells
    fn seed_random(&mut self, fill_probability: f32) -> EngineResult<()>;

    /// Kill every cell
    fn clear(&mut self) -> EngineResult<()>;

    /// Pixels for display, `None` when rendering is disabled
    fn render_frame(&self) -> Option<RenderFrame<'_>>;

    /// Rows whose pixels changed since the last call
    fn take_dirty_rows(&mut self) -> Vec<u32>;

    /// Copy of the current generation
    fn snapshot(&self) -> CellGrid;

    fn alive_count(&self) -> u64 {
        self.snapshot().alive_count()
    }

    /// True once the backend can no longer compute (e.g. a failed kernel).
    /// Every later operation returns an error.
    fn is_lost(&self) -> bool {
        false
    }

    /// Generations computed by this backend
    fn generation(&self) -> u64;

    fn rows(&self) -> u32;

    fn cols(&self) -> u32;

    fn kind(&self) -> BackendKind;

    /// Name of this backend (for logging)
    fn name(&self) -> &'static str;
}

/// Create the backend selected by the configuration.
///
/// A parallel device that cannot be acquired falls back to the sequential
/// backend; configuration errors are returned before anything is allocated.
pub fn create_backend(config: &EngineConfig, seed: u64) -> EngineResult<Box<dyn ComputeBackend>> {
    config.validate()?;

    if config.cpu_only {
        tracing::info!("Using sequential backend ({}x{})", config.rows, config.cols);
        return Ok(Box::new(SequentialBackend::new(config, seed)?));
    }

    #[cfg(feature = "parallel")]
    {
        match ParallelBackend::new(config, seed) {
            Ok(parallel) => {
                tracing::info!(
                    "Using parallel backend ({}x{}, {} workers, render mapping: {})",
                    config.rows,
                    config.cols,
                    parallel.workers(),
                    config.render
                );
                Ok(Box::new(parallel))
            }
            Err(e) => {
                tracing::warn!("Parallel device not available ({}), falling back to sequential", e);
                Ok(Box::new(SequentialBackend::new(config, seed)?))
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        tracing::warn!("Built without the parallel feature, using sequential backend");
        Ok(Box::new(SequentialBackend::new(config, seed)?))
    }
}
