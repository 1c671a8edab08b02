//! Classic dam break: a column of water collapses and spreads across the
//! tank floor. Headless; prints periodic stats.

use sphlab::{presets, SolverConfig, SolverError, SphSolver};

fn main() -> Result<(), SolverError> {
    tracing_subscriber::fmt::init();

    let config = SolverConfig {
        domain_size: [2.0, 1.0, 1.0],
        time_step: 0.0001,
        ..SolverConfig::default()
    };
    let mut solver = SphSolver::new(config)?;
    // 0.075 m^3 over 4800 particles: lattice spacing 0.025 = h/2.
    solver.add_fluid_box([0.0, 0.0, 0.0], [0.3, 0.5, 0.5], 4800, presets::water())?;

    solver.run_with(1.2, |solver, i| {
        if (i + 1) % 2000 == 0 {
            let stats = solver.stats();
            tracing::info!(
                t = stats.time,
                avg_density = stats.avg_density,
                max_speed = stats.max_speed,
                "progress"
            );
        }
    });

    let stats = solver.stats();
    tracing::info!(
        steps = stats.step,
        particles = stats.particles,
        "dam break finished"
    );
    Ok(())
}
