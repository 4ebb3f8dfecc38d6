//! Engine configuration
//!
//! Read once at construction and never mutated by the engine. Missing JSON
//! fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Pattern name meaning "seed the grid randomly instead"
pub const RANDOM_PATTERN: &str = "random";

const DEFAULT_ROWS: u32 = 1000;
const DEFAULT_COLS: u32 = 1000;
const DEFAULT_FILL_PROB: f32 = 0.08;
const DEFAULT_VIRTUAL_FILL_PROB: f32 = 0.0001;
const DEFAULT_DEVICE_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: u32,
    pub cols: u32,
    /// Per-cell probability of starting alive when seeding randomly
    pub fill_prob: f32,
    /// Per-dead-cell probability of spontaneous birth each generation (0 disables)
    pub virtual_fill_prob: f32,
    /// Force the sequential backend
    pub cpu_only: bool,
    /// Stop after this many generations (0 = run forever)
    pub max_iterations: u64,
    /// Keep a render buffer in sync with the current generation
    pub render: bool,

    /// RNG seed; `None` derives one from the clock
    pub seed: Option<u64>,
    pub start_paused: bool,
    /// Suppress the live log and report timings on halt
    pub benchmark_mode: bool,
    /// Fixed delay before each loop iteration (frame-rate throttle)
    pub render_delay_ms: u64,
    /// Startup pattern name or file, or `"random"`
    pub pattern: String,
    /// Worker count of the device pool (0 = one per core)
    pub device_threads: usize,
    /// Completion barrier timeout for one kernel launch
    pub device_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            fill_prob: DEFAULT_FILL_PROB,
            virtual_fill_prob: DEFAULT_VIRTUAL_FILL_PROB,
            cpu_only: false,
            max_iterations: 0,
            render: false,
            seed: None,
            start_paused: false,
            benchmark_mode: false,
            render_delay_ms: 0,
            pattern: RANDOM_PATTERN.to_string(),
            device_threads: 0,
            device_timeout_ms: DEFAULT_DEVICE_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Headless config of the given size with reseeding disabled
    pub fn with_size(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            virtual_fill_prob: 0.0,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no backend can run
    pub fn validate(&self) -> EngineResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(EngineError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        (self.rows as usize)
            .checked_mul(self.cols as usize)
            .ok_or(EngineError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            })?;
        check_probability("fill_prob", self.fill_prob)?;
        check_probability("virtual_fill_prob", self.virtual_fill_prob)?;
        Ok(())
    }

    pub fn uses_random_seeding(&self) -> bool {
        self.pattern.eq_ignore_ascii_case(RANDOM_PATTERN)
    }

    /// The configured seed, or one taken from the clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(clock_seed)
    }
}

pub(crate) fn check_probability(name: &'static str, value: f32) -> EngineResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidProbability { name, value })
    }
}

fn clock_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
