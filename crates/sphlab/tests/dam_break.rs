//! Dam break scenario: a water column against one wall collapses under
//! gravity and spreads across the floor.

use sphlab::{presets, SolverConfig, SphSolver};

#[test]
fn column_collapses_and_spreads() {
    let config = SolverConfig {
        domain_size: [2.0, 1.0, 0.5],
        time_step: 0.00005,
        max_particles: 5_000,
        ..SolverConfig::default()
    };
    let mut solver = SphSolver::new(config).expect("config");
    // Column against the x = 0 wall, resolved at spacing = h/2.
    solver
        .add_fluid_box([0.0, 0.0, 0.0], [0.25, 0.3, 0.3], 1440, presets::water())
        .expect("inject");

    let initial = solver.snapshot();
    let initial_mean_y: f64 = initial.positions.iter().map(|p| p[1] as f64).sum::<f64>()
        / initial.len() as f64;
    let initial_max_x = initial
        .positions
        .iter()
        .map(|p| p[0])
        .fold(f32::NEG_INFINITY, f32::max);

    solver.run(0.12);

    let snap = solver.snapshot();
    let mean_y: f64 =
        snap.positions.iter().map(|p| p[1] as f64).sum::<f64>() / snap.len() as f64;
    let max_x = snap
        .positions
        .iter()
        .map(|p| p[0])
        .fold(f32::NEG_INFINITY, f32::max);

    // The column's center of mass drops as it collapses.
    assert!(
        mean_y < initial_mean_y * 0.85,
        "column did not collapse: mean y {initial_mean_y} -> {mean_y}"
    );
    // The front advances well past the original column width.
    assert!(
        max_x > initial_max_x + 0.15,
        "front did not advance: max x {initial_max_x} -> {max_x}"
    );

    // The run stays physical: contained, finite, density in a sane band.
    let stats = solver.stats();
    assert_eq!(stats.non_finite_particles, 0);
    assert!(
        stats.avg_density > 200.0 && stats.avg_density < 3000.0,
        "avg density left the physical band: {}",
        stats.avg_density
    );
    for p in &snap.positions {
        assert!(p[0] >= 0.0 && p[0] <= 2.0);
        assert!(p[1] >= 0.0 && p[1] <= 1.0);
        assert!(p[2] >= 0.0 && p[2] <= 0.5);
    }
}
