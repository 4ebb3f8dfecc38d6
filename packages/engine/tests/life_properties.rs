use automata_engine::{
    create_backend, BackendKind, ComputeBackend, EngineConfig, EngineError, Pattern,
    SequentialBackend, Simulation,
};

fn sequential(rows: u32, cols: u32) -> SequentialBackend {
    SequentialBackend::new(&EngineConfig::with_size(rows, cols), 3).expect("valid config")
}

fn insert(backend: &mut dyn ComputeBackend, name: &str, row: i64, col: i64) -> usize {
    let pattern = Pattern::builtin(name).expect("built-in pattern");
    backend.insert_pattern(&pattern, row, col).expect("insert")
}

#[test]
fn empty_grid_stays_empty() {
    let mut backend = sequential(20, 30);
    for _ in 0..10 {
        assert_eq!(backend.compute_grid(true).expect("compute"), Some(0));
    }
}

#[test]
fn blinker_has_period_two() {
    let mut backend = sequential(7, 7);
    insert(&mut backend, "blinker", 3, 2);
    let start = backend.snapshot();

    backend.compute_grid(false).expect("compute");
    assert_eq!(backend.snapshot().alive_cells(), vec![(2, 3), (3, 3), (4, 3)]);
    backend.compute_grid(false).expect("compute");
    assert_eq!(backend.snapshot(), start);
}

#[test]
fn glider_moves_diagonally_every_four_generations() {
    let mut backend = sequential(12, 12);
    insert(&mut backend, "glider", 1, 1);
    let start = backend.snapshot().alive_cells();

    for _ in 0..4 {
        backend.compute_grid(false).expect("compute");
    }
    let moved: Vec<(u32, u32)> = start.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
    assert_eq!(backend.snapshot().alive_cells(), moved);
}

#[test]
fn single_cell_grid_dies() {
    let mut backend = sequential(1, 1);
    insert(&mut backend, "block", 0, 0);
    assert_eq!(backend.alive_count(), 1);
    assert_eq!(backend.compute_grid(true).expect("compute"), Some(0));
}

#[test]
fn insertion_clips_at_every_edge() {
    let mut backend = sequential(4, 4);
    // glider cells (0,1) (1,2) (2,0) (2,1) (2,2) shifted by (-1,-1)
    assert_eq!(insert(&mut backend, "glider", -1, -1), 3);
    assert_eq!(backend.snapshot().alive_cells(), vec![(0, 1), (1, 0), (1, 1)]);

    backend.clear().expect("clear");
    assert_eq!(insert(&mut backend, "glider", 2, 2), 2);
    assert_eq!(backend.snapshot().alive_cells(), vec![(2, 3), (3, 3)]);

    backend.clear().expect("clear");
    assert_eq!(insert(&mut backend, "blinker", 10, 10), 0);
    assert_eq!(backend.alive_count(), 0);
}

#[test]
fn insertion_at_extreme_anchors_writes_nothing() {
    let mut backend = sequential(6, 6);
    assert_eq!(insert(&mut backend, "glider", i64::MAX, i64::MAX), 0);
    assert_eq!(insert(&mut backend, "glider", i64::MIN, 0), 0);
    assert_eq!(insert(&mut backend, "blinker", 0, i64::MIN), 0);
    assert_eq!(backend.alive_count(), 0);

    let mut config = EngineConfig::with_size(6, 6);
    config.cpu_only = true;
    config.pattern = "block".to_string();
    let mut sim = Simulation::new(config).expect("simulation");
    let before = sim.snapshot();
    assert_eq!(sim.insert_pattern("glider", i64::MAX, i64::MAX).expect("insert"), 0);
    assert_eq!(sim.snapshot(), before);
}

#[test]
fn unknown_pattern_changes_nothing() {
    let mut config = EngineConfig::with_size(10, 10);
    config.cpu_only = true;
    config.pattern = "blinker".to_string();
    let mut sim = Simulation::new(config).expect("simulation");
    let before = sim.snapshot();

    let err = sim.insert_pattern("definitely-missing", 0, 0).unwrap_err();
    assert!(matches!(err, EngineError::UnknownPattern(_)));
    assert_eq!(err.to_string(), "unknown pattern: definitely-missing");
    assert_eq!(sim.snapshot(), before);
}

#[test]
fn pattern_files_are_loaded_by_path() {
    let path = std::env::temp_dir().join(format!("automata-engine-{}.cells", std::process::id()));
    std::fs::write(&path, "# diagonal\n0 0\n1 1\n2,2\n").expect("write pattern file");

    let mut config = EngineConfig::with_size(5, 5);
    config.cpu_only = true;
    config.pattern = path.to_string_lossy().into_owned();
    let sim = Simulation::new(config).expect("simulation");
    std::fs::remove_file(&path).ok();

    assert_eq!(sim.snapshot().alive_cells(), vec![(1, 1), (2, 2), (3, 3)]);
}

#[test]
fn cpu_only_selects_sequential() {
    let mut config = EngineConfig::with_size(8, 8);
    config.cpu_only = true;
    let backend = create_backend(&config, 1).expect("backend");
    assert_eq!(backend.kind(), BackendKind::Sequential);
    assert_eq!((backend.rows(), backend.cols()), (8, 8));
}

#[test]
fn invalid_configs_fail_before_any_backend() {
    assert!(matches!(
        create_backend(&EngineConfig::with_size(0, 5), 1),
        Err(EngineError::InvalidDimensions { rows: 0, cols: 5 })
    ));

    let mut config = EngineConfig::with_size(5, 5);
    config.virtual_fill_prob = 1.5;
    assert!(matches!(
        create_backend(&config, 1),
        Err(EngineError::InvalidProbability { name: "virtual_fill_prob", .. })
    ));
}

#[test]
fn max_iterations_run_reports_count() {
    let mut config = EngineConfig::with_size(32, 32);
    config.cpu_only = true;
    config.seed = Some(99);
    config.max_iterations = 25;
    config.fill_prob = 0.3;
    let mut sim = Simulation::new(config).expect("simulation");
    assert_eq!(sim.run().expect("run"), 25);
    assert!(sim.is_halted());
}
