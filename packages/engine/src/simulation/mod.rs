//! Simulation - the driving loop around one compute backend
//!
//! Owns everything the loop needs (backend, iteration counter, pause and
//! stop flags, timings) so it can be driven by a window event loop, a
//! headless benchmark or a test without any global state.
//!
//! One `tick` mirrors one frame:
//! 1. optional throttle delay
//! 2. render sync (`update_render_buffers`) when rendering is on
//! 3. compute a generation unless paused (single step overrides once)
//! 4. live log / halt checks

use crate::backend::{create_backend, ComputeBackend, RenderFrame};
use crate::core::config::EngineConfig;
use crate::core::error::EngineResult;
use crate::domain::PatternLibrary;
use crate::spatial::CellGrid;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/rate.rs"]
mod rate;
mod controls;
pub mod facade;

pub use controls::StopHandle;
pub use facade::Automaton;
pub use rate::Timings;

use controls::Controls;
use perf_timer::PerfTimer;
use rate::RateMeter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// A generation was computed
    Running,
    /// Nothing computed this tick
    Paused,
    /// Max iterations reached or stop requested; ticks are now no-ops
    Halted,
}

pub struct Simulation {
    config: EngineConfig,
    backend: Box<dyn ComputeBackend>,
    library: PatternLibrary,
    controls: Controls,
    iterations: u64,
    last_alive: Option<u64>,
    halted: bool,
    rate: RateMeter,
    timings: Timings,
}

impl Simulation {
    /// Build the configured backend and seed it (random fill or the
    /// configured pattern, centered)
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let seed = config.resolve_seed();
        tracing::debug!("Simulation seed: {}", seed);
        let backend = create_backend(&config, seed)?;
        let mut sim = Self::with_backend(config, backend)?;
        sim.seed_from_config()?;
        Ok(sim)
    }

    /// Wrap an existing backend; the grid is left as the backend has it
    pub fn with_backend(config: EngineConfig, backend: Box<dyn ComputeBackend>) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            controls: Controls::new(config.start_paused),
            config,
            backend,
            library: PatternLibrary::new(),
            iterations: 0,
            last_alive: None,
            halted: false,
            rate: RateMeter::new(),
            timings: Timings::default(),
        })
    }

    fn seed_from_config(&mut self) -> EngineResult<()> {
        if self.config.uses_random_seeding() {
            self.backend.seed_random(self.config.fill_prob)
        } else {
            let pattern = self.config.pattern.clone();
            self.insert_pattern_centered(&pattern).map(|_| ())
        }
    }

    // === Seeding ===

    /// Insert a named or file pattern with its top-left at (row, col).
    /// The pattern is fully loaded before any cell is written.
    pub fn insert_pattern(&mut self, name_or_path: &str, row: i64, col: i64) -> EngineResult<usize> {
        let pattern = self.library.load(name_or_path)?;
        let written = self.backend.insert_pattern(&pattern, row, col)?;
        tracing::debug!(
            "Inserted pattern {} at ({}, {}): {}/{} cells on grid",
            pattern.name,
            row,
            col,
            written,
            pattern.len()
        );
        Ok(written)
    }

    pub fn insert_pattern_centered(&mut self, name_or_path: &str) -> EngineResult<usize> {
        let pattern = self.library.load(name_or_path)?;
        let (row, col) = pattern.centered_anchor(self.backend.rows(), self.backend.cols());
        self.backend.insert_pattern(&pattern, row, col)
    }

    pub fn seed_random(&mut self, fill_probability: f32) -> EngineResult<()> {
        self.backend.seed_random(fill_probability)
    }

    pub fn clear(&mut self) -> EngineResult<()> {
        self.backend.clear()
    }

    pub fn library_mut(&mut self) -> &mut PatternLibrary {
        &mut self.library
    }

    // === Controls ===

    pub fn pause(&mut self) {
        self.controls.set_paused(true);
    }

    pub fn resume(&mut self) {
        self.controls.set_paused(false);
    }

    pub fn toggle_pause(&mut self) {
        let paused = self.controls.is_paused();
        self.controls.set_paused(!paused);
    }

    pub fn single_step(&mut self) {
        self.controls.single_step();
    }

    pub fn request_stop(&mut self) {
        self.controls.stop_handle().request_stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.controls.stop_handle()
    }

    pub fn is_paused(&self) -> bool {
        self.controls.is_paused()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    // === Loop ===

    /// Run one loop iteration
    pub fn tick(&mut self) -> EngineResult<LoopState> {
        if self.halted {
            return Ok(LoopState::Halted);
        }
        self.throttle();

        let loop_timer = PerfTimer::start();
        let log_enabled = !self.config.benchmark_mode && self.rate.should_log(self.iterations);

        if self.config.render {
            let t0 = PerfTimer::start();
            self.backend.update_render_buffers();
            self.timings.render_sync_ns += t0.elapsed_ns();
        }

        let advanced = self.controls.take_advance();
        if advanced {
            let t0 = PerfTimer::start();
            let alive = match self.backend.compute_grid(log_enabled) {
                Ok(alive) => alive,
                Err(e) => {
                    if self.backend.is_lost() {
                        tracing::error!(
                            "{} backend lost after {} iterations, halting",
                            self.backend.name(),
                            self.iterations
                        );
                        self.halted = true;
                    }
                    return Err(e);
                }
            };
            self.timings.compute_ns += t0.elapsed_ns();
            self.iterations += 1;
            self.timings.iterations = self.iterations;
            if alive.is_some() {
                self.last_alive = alive;
            }
        }
        self.timings.loops += 1;

        self.rate.add_loop_time(loop_timer.elapsed_ns());
        if log_enabled {
            self.rate.log(self.iterations, self.last_alive);
        }

        let max = self.config.max_iterations;
        if self.controls.is_stop_requested() || (max > 0 && self.iterations >= max) {
            self.halt();
            return Ok(LoopState::Halted);
        }
        Ok(if advanced { LoopState::Running } else { LoopState::Paused })
    }

    /// Tick until halted. Needs `max_iterations` or a stop request to return.
    pub fn run(&mut self) -> EngineResult<u64> {
        while self.tick()? != LoopState::Halted {}
        Ok(self.iterations)
    }

    fn throttle(&self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if self.config.render_delay_ms > 0 {
                std::thread::sleep(std::time::Duration::from_millis(self.config.render_delay_ms));
            }
        }
    }

    fn halt(&mut self) {
        self.halted = true;
        if self.config.benchmark_mode {
            self.timings.report();
        } else {
            tracing::info!("Exiting after {} iterations.", self.iterations);
        }
    }

    // === Read access ===

    /// Completed generations since construction
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Live cells from the last generation counted by the live log
    pub fn last_alive(&self) -> Option<u64> {
        self.last_alive
    }

    pub fn alive_count(&self) -> u64 {
        self.backend.alive_count()
    }

    pub fn render_frame(&self) -> Option<RenderFrame<'_>> {
        self.backend.render_frame()
    }

    pub fn take_dirty_rows(&mut self) -> Vec<u32> {
        self.backend.take_dirty_rows()
    }

    pub fn snapshot(&self) -> CellGrid {
        self.backend.snapshot()
    }

    pub fn backend(&self) -> &dyn ComputeBackend {
        self.backend.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn timings(&self) -> Timings {
        self.timings.clone()
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
