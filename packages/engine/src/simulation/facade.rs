use wasm_bindgen::prelude::*;

use crate::core::config::EngineConfig;
use crate::core::error::EngineError;
use crate::domain::PatternLibrary;

use super::{LoopState, Simulation};

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn state_code(state: LoopState) -> u8 {
    match state {
        LoopState::Running => 0,
        LoopState::Paused => 1,
        LoopState::Halted => 2,
    }
}

/// JS handle to one simulation. The display reads pixels straight out of
/// wasm memory through `pixels_ptr`/`pixels_len` between `step` calls.
#[wasm_bindgen]
pub struct Automaton {
    sim: Simulation,
}

#[wasm_bindgen]
impl Automaton {
    /// Create from a JSON configuration (missing fields use defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Automaton, JsValue> {
        let config = EngineConfig::from_json(config_json).map_err(to_js)?;
        let sim = Simulation::new(config).map_err(to_js)?;
        Ok(Self { sim })
    }

    /// Rendering, randomly seeded grid with default probabilities
    #[wasm_bindgen(js_name = withSize)]
    pub fn with_size(rows: u32, cols: u32) -> Result<Automaton, JsValue> {
        let config = EngineConfig {
            rows,
            cols,
            render: true,
            ..EngineConfig::default()
        };
        let sim = Simulation::new(config).map_err(to_js)?;
        Ok(Self { sim })
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> u32 { self.sim.backend().rows() }

    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> u32 { self.sim.backend().cols() }

    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> u64 { self.sim.iterations() }

    #[wasm_bindgen(getter)]
    pub fn paused(&self) -> bool { self.sim.is_paused() }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool { self.sim.is_halted() }

    #[wasm_bindgen(getter)]
    pub fn backend(&self) -> String { self.sim.backend().name().to_string() }

    /// One loop iteration: 0 = computed, 1 = paused, 2 = halted
    pub fn step(&mut self) -> Result<u8, JsValue> {
        self.sim.tick().map(state_code).map_err(to_js)
    }

    pub fn insert_pattern(&mut self, name: &str, row: i32, col: i32) -> Result<u32, JsValue> {
        self.sim
            .insert_pattern(name, row as i64, col as i64)
            .map(|n| n as u32)
            .map_err(to_js)
    }

    pub fn insert_pattern_centered(&mut self, name: &str) -> Result<u32, JsValue> {
        self.sim
            .insert_pattern_centered(name)
            .map(|n| n as u32)
            .map_err(to_js)
    }

    /// Replace the pattern library with built-ins plus a JSON bundle
    pub fn load_pattern_bundle_json(&mut self, json: &str) -> Result<(), JsValue> {
        *self.sim.library_mut() = PatternLibrary::from_bundle_json(json).map_err(to_js)?;
        Ok(())
    }

    pub fn seed_random(&mut self, fill_probability: f32) -> Result<(), JsValue> {
        self.sim.seed_random(fill_probability).map_err(to_js)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.sim.clear().map_err(to_js)
    }

    pub fn pause(&mut self) { self.sim.pause() }

    pub fn resume(&mut self) { self.sim.resume() }

    pub fn toggle_pause(&mut self) { self.sim.toggle_pause() }

    pub fn single_step(&mut self) { self.sim.single_step() }

    pub fn request_stop(&mut self) { self.sim.request_stop() }

    pub fn alive_count(&self) -> u64 { self.sim.alive_count() }

    /// Pointer to ABGR pixels of the displayed generation (null when headless)
    pub fn pixels_ptr(&self) -> *const u32 {
        self.sim
            .render_frame()
            .map(|f| f.pixels.as_ptr())
            .unwrap_or(std::ptr::null())
    }

    pub fn pixels_len(&self) -> usize {
        self.sim.render_frame().map(|f| f.pixels.len()).unwrap_or(0)
    }

    /// Rows changed since the last call
    pub fn take_dirty_rows(&mut self) -> Vec<u32> {
        self.sim.take_dirty_rows()
    }

    pub fn timings_json(&self) -> String {
        serde_json::to_string(&self.sim.timings()).unwrap_or_default()
    }
}
