//! Smoothed particle hydrodynamics solver for multi-fluid scenes.
//!
//! `sphlab` wraps the compute pieces from `sphlab-core` into a full
//! solver: configuration, a fluid preset catalog, box injection, axis
//! aligned obstacles, an external force hook, lifecycle control, and
//! diagnostics. Everything is deterministic under a fixed seed.
//!
//! ```no_run
//! use sphlab::{presets, SolverConfig, SphSolver};
//!
//! let mut solver = SphSolver::new(SolverConfig::default())?;
//! solver.add_fluid_box([0.2, 0.2, 0.2], [0.6, 1.0, 0.6], 2000, presets::water())?;
//! solver.run(0.5);
//! let stats = solver.stats();
//! println!("{} particles at t = {:.3}s", stats.particles, stats.time);
//! # Ok::<(), sphlab::SolverError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod external;
pub mod presets;
pub mod snapshot;
pub mod solver;

pub use config::SolverConfig;
pub use error::SolverError;
pub use external::{CentrifugalForce, ExternalForce};
pub use snapshot::ParticleSnapshot;
pub use solver::{SolverState, SolverStats, SphSolver};

pub use sphlab_core::{FluidProperties, GridStats, Obstacle};
