#![cfg(feature = "parallel")]

use automata_engine::{
    create_backend, BackendKind, ComputeBackend, EngineConfig, ParallelBackend, Pattern,
    SequentialBackend,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn config(rows: u32, cols: u32) -> EngineConfig {
    let mut config = EngineConfig::with_size(rows, cols);
    config.device_threads = 4;
    config
}

/// Random soup as a pattern so both backends start from identical cells
fn soup(rows: u32, cols: u32, density: f64, seed: u64) -> Pattern {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut cells = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            if rng.gen_bool(density) {
                cells.push((r, c));
            }
        }
    }
    Pattern::new("soup", cells)
}

fn pair(rows: u32, cols: u32, start: &Pattern) -> (SequentialBackend, ParallelBackend) {
    let config = config(rows, cols);
    let mut seq = SequentialBackend::new(&config, 1).expect("sequential");
    let mut par = ParallelBackend::new(&config, 1).expect("parallel");
    seq.insert_pattern(start, 0, 0).expect("insert");
    par.insert_pattern(start, 0, 0).expect("insert");
    (seq, par)
}

#[test]
fn backends_agree_generation_by_generation() {
    let sizes = [(1, 1), (1, 17), (17, 1), (3, 3), (31, 47), (64, 64)];
    for (i, &(rows, cols)) in sizes.iter().enumerate() {
        let start = soup(rows, cols, 0.35, i as u64);
        for generations in [0usize, 1, 10, 100] {
            let (mut seq, mut par) = pair(rows, cols, &start);
            for _ in 0..generations {
                let a = seq.compute_grid(true).expect("sequential step");
                let b = par.compute_grid(true).expect("parallel step");
                assert_eq!(a, b, "alive counts differ on {rows}x{cols}");
            }
            assert_eq!(
                seq.snapshot(),
                par.snapshot(),
                "{rows}x{cols} after {generations} generations"
            );
        }
    }
}

#[test]
fn backends_agree_from_the_same_seed() {
    for &(rows, cols) in &[(1u32, 1u32), (7, 13), (40, 25), (64, 64)] {
        for generations in [0usize, 1, 10, 100] {
            let config = config(rows, cols);
            let mut seq = SequentialBackend::new(&config, 1234).expect("sequential");
            let mut par = ParallelBackend::new(&config, 1234).expect("parallel");
            seq.seed_random(0.35).expect("seed");
            par.seed_random(0.35).expect("seed");
            assert_eq!(seq.snapshot(), par.snapshot(), "{rows}x{cols} seeding");

            for _ in 0..generations {
                seq.compute_grid(false).expect("sequential step");
                par.compute_grid(false).expect("parallel step");
            }
            assert_eq!(
                seq.snapshot(),
                par.snapshot(),
                "{rows}x{cols} after {generations} generations"
            );
        }
    }
}

#[test]
fn render_frames_agree_after_update() {
    let start = soup(24, 40, 0.3, 7);
    let mut config = config(24, 40);
    config.render = true;
    let mut seq = SequentialBackend::new(&config, 1).expect("sequential");
    let mut par = ParallelBackend::new(&config, 1).expect("parallel");
    seq.insert_pattern(&start, 0, 0).expect("insert");
    par.insert_pattern(&start, 0, 0).expect("insert");

    for _ in 0..6 {
        seq.update_render_buffers();
        par.update_render_buffers();
        seq.compute_grid(false).expect("sequential step");
        par.compute_grid(false).expect("parallel step");
    }
    seq.update_render_buffers();
    par.update_render_buffers();

    let a = seq.render_frame().expect("sequential frame");
    let b = par.render_frame().expect("parallel frame");
    assert_eq!(a.generation, b.generation);
    assert_eq!(a.pixels, b.pixels);
}

#[test]
fn glider_matches_on_parallel() {
    let glider = Pattern::builtin("glider").expect("glider");
    let (mut seq, mut par) = pair(16, 16, &Pattern::new("empty", Vec::new()));
    seq.insert_pattern(&glider, 5, 5).expect("insert");
    par.insert_pattern(&glider, 5, 5).expect("insert");
    for _ in 0..8 {
        seq.compute_grid(false).expect("sequential step");
        par.compute_grid(false).expect("parallel step");
    }
    let expected: Vec<(u32, u32)> = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]
        .iter()
        .map(|&(r, c)| (r + 7, c + 7))
        .collect();
    assert_eq!(par.snapshot().alive_cells(), expected);
    assert_eq!(seq.snapshot(), par.snapshot());
}

/// Virtual fill on an empty grid: births after one generation ~ p * R * C
fn reseed_births(backend: &mut dyn ComputeBackend) -> u64 {
    backend.compute_grid(true).expect("step").unwrap_or(0)
}

#[test]
fn reseed_rate_matches_probability_on_both_backends() {
    let (rows, cols, p) = (200u32, 200u32, 0.05f32);
    let expected = p as f64 * rows as f64 * cols as f64;

    let mut config = config(rows, cols);
    config.virtual_fill_prob = p;
    let mut seq = SequentialBackend::new(&config, 42).expect("sequential");
    let mut par = ParallelBackend::new(&config, 42).expect("parallel");

    for backend in [&mut seq as &mut dyn ComputeBackend, &mut par] {
        let births = reseed_births(backend) as f64;
        assert!(
            (births - expected).abs() < expected * 0.1,
            "{}: {births} births, expected about {expected}",
            backend.name()
        );
    }
}

#[test]
fn zero_reseed_probability_never_births() {
    let mut config = config(50, 50);
    config.virtual_fill_prob = 0.0;
    let mut par = ParallelBackend::new(&config, 8).expect("parallel");
    for _ in 0..20 {
        assert_eq!(par.compute_grid(true).expect("step"), Some(0));
    }
}

#[test]
fn full_reseed_probability_fills_dead_cells() {
    let mut config = config(10, 10);
    config.virtual_fill_prob = 1.0;
    let mut seq = SequentialBackend::new(&config, 8).expect("sequential");
    assert_eq!(seq.compute_grid(true).expect("step"), Some(100));
}

#[test]
fn default_selection_is_parallel() {
    let backend = create_backend(&config(32, 32), 1).expect("backend");
    assert_eq!(backend.kind(), BackendKind::Parallel);
    assert_eq!(backend.name(), "parallel");
}

#[test]
fn seeding_is_deterministic_for_a_seed() {
    let config = config(40, 40);
    let mut a = ParallelBackend::new(&config, 77).expect("parallel");
    let mut b = ParallelBackend::new(&config, 77).expect("parallel");
    a.seed_random(0.4).expect("seed");
    b.seed_random(0.4).expect("seed");
    assert_eq!(a.snapshot(), b.snapshot());
    assert!(a.alive_count() > 0);
}
