//! Automata Engine - double-buffered cellular automaton
//!
//! Game-of-Life rule (B3/S23) on a bounded grid, computed by one of two
//! interchangeable backends behind [`ComputeBackend`].
//!
//! Layout:
//! - core/       - rule, config, errors, random sources
//! - spatial/    - cell grids, double buffer, dirty rows
//! - domain/     - patterns and pattern library
//! - systems/    - virtual fill (reseed)
//! - backend/    - sequential and parallel backends, render buffers
//! - simulation/ - driving loop and JS facade

pub mod core;
pub mod spatial;
pub mod domain;
pub mod systems;
pub mod backend;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

/// Start the rayon pool the parallel backend runs on. Await the returned
/// promise before creating an `Automaton`; until it resolves the engine
/// falls back to the sequential backend.
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen(js_name = initDevicePool)]
pub fn init_device_pool(num_threads: usize) -> js_sys::Promise {
    let on_ready = Closure::once(move |_: JsValue| {
        backend::parallel::global_pool::mark_ready();
        web_sys::console::log_1(&format!("Device pool ready ({} threads)", num_threads).into());
    });
    let ready = init_thread_pool(num_threads).then(&on_ready);
    on_ready.forget();
    ready
}

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"Automata engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Names of the built-in patterns
#[wasm_bindgen]
pub fn builtin_patterns() -> Vec<String> {
    domain::BUILTIN_PATTERNS
        .iter()
        .map(|p| p.name.to_string())
        .collect()
}

// Re-export main types
pub use backend::{create_backend, BackendKind, ComputeBackend, RenderFrame, SequentialBackend};
#[cfg(feature = "parallel")]
pub use backend::ParallelBackend;
pub use core::{EngineConfig, EngineError, EngineResult};
pub use domain::{Pattern, PatternLibrary};
pub use simulation::{Automaton, LoopState, Simulation, StopHandle, Timings};
pub use spatial::{CellGrid, GridBuffers};
