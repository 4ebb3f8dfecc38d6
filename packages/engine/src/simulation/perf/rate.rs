use serde::Serialize;

use super::perf_timer::PerfTimer;

const LOG_INTERVAL_MS: f64 = 1000.0;

/// Once-per-second live log of iteration rate and loop time
pub(crate) struct RateMeter {
    last_print: PerfTimer,
    last_iterations: u64,
    loop_ns: u64,
}

impl RateMeter {
    pub(crate) fn new() -> Self {
        Self {
            last_print: PerfTimer::start(),
            last_iterations: 0,
            loop_ns: 0,
        }
    }

    /// Due for a log line: at least one new iteration and a second elapsed
    pub(crate) fn should_log(&self, iterations: u64) -> bool {
        iterations > self.last_iterations && self.last_print.elapsed_ms() >= LOG_INTERVAL_MS
    }

    pub(crate) fn add_loop_time(&mut self, ns: u64) {
        self.loop_ns = self.loop_ns.saturating_add(ns);
    }

    pub(crate) fn log(&mut self, iterations: u64, alive: Option<u64>) {
        let per_second = iterations.saturating_sub(self.last_iterations);
        let avg_ns = if per_second > 0 { self.loop_ns / per_second } else { 0 };
        match alive {
            Some(alive) => tracing::info!(
                "It: {} | Alive: {} | It/s: {} | Main Loop: {} ns",
                iterations,
                alive,
                per_second,
                avg_ns
            ),
            None => tracing::info!(
                "It: {} | It/s: {} | Main Loop: {} ns",
                iterations,
                per_second,
                avg_ns
            ),
        }
        self.loop_ns = 0;
        self.last_iterations = iterations;
        self.last_print = PerfTimer::start();
    }
}

/// Accumulated timings, reported at halt in benchmark mode
#[derive(Clone, Debug, Default, Serialize)]
pub struct Timings {
    pub iterations: u64,
    pub compute_ns: u64,
    pub render_sync_ns: u64,
    pub loops: u64,
}

impl Timings {
    pub fn avg_compute_ns(&self) -> u64 {
        if self.iterations == 0 { 0 } else { self.compute_ns / self.iterations }
    }

    pub fn avg_render_sync_ns(&self) -> u64 {
        if self.loops == 0 { 0 } else { self.render_sync_ns / self.loops }
    }

    pub(crate) fn report(&self) {
        tracing::info!(
            "Benchmark: {} iterations | compute {:.3} ms total, {} ns/it | render sync {} ns/loop",
            self.iterations,
            self.compute_ns as f64 / 1_000_000.0,
            self.avg_compute_ns(),
            self.avg_render_sync_ns()
        );
    }
}
