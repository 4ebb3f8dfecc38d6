#![cfg(target_arch = "wasm32")]

use automata_engine::Automaton;
use wasm_bindgen_test::*;

fn automaton(extra: &str) -> Automaton {
    let json = format!(
        r#"{{"rows": 8, "cols": 8, "cpu_only": true, "render": true, "seed": 5, "pattern": "blinker"{extra}}}"#
    );
    Automaton::new(&json).expect("valid config")
}

#[wasm_bindgen_test]
fn steps_and_exposes_pixels() {
    let mut automaton = automaton("");
    assert_eq!(automaton.rows(), 8);
    assert_eq!(automaton.pixels_len(), 64);
    assert!(!automaton.pixels_ptr().is_null());

    assert_eq!(automaton.step().expect("step"), 0);
    assert_eq!(automaton.iterations(), 1);
    assert_eq!(automaton.alive_count(), 3);
    assert!(!automaton.take_dirty_rows().is_empty());
}

#[wasm_bindgen_test]
fn pause_and_single_step() {
    let mut automaton = automaton(r#", "start_paused": true"#);
    assert_eq!(automaton.step().expect("step"), 1);
    automaton.single_step();
    assert_eq!(automaton.step().expect("step"), 0);
    assert_eq!(automaton.step().expect("step"), 1);
    assert_eq!(automaton.iterations(), 1);
}

#[wasm_bindgen_test]
fn halts_at_max_iterations() {
    let mut automaton = automaton(r#", "max_iterations": 2"#);
    assert_eq!(automaton.step().expect("step"), 0);
    assert_eq!(automaton.step().expect("step"), 2);
    assert!(automaton.halted());
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    assert!(Automaton::new(r#"{"rows": 0}"#).is_err());
    assert!(Automaton::new("not json").is_err());
}

#[wasm_bindgen_test]
fn parallel_waits_for_device_pool() {
    // no initDevicePool in this test runner, so rayon must stay untouched
    let automaton =
        Automaton::new(r#"{"rows": 8, "cols": 8, "seed": 5, "pattern": "glider"}"#).expect("config");
    assert_eq!(automaton.backend(), "sequential");
    assert_eq!(automaton.alive_count(), 5);
}
