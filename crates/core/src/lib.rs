//! Core SPH building blocks.
//!
//! This crate provides the compute-focused pieces of the fluid simulation:
//! particle storage, smoothing kernels, the spatial hash grid, the SPH
//! force operators, the integrator, and boundary handling. It carries no
//! lifecycle or I/O; the `sphlab` crate wraps these into a solver.
//!
//! # Modules
//! - [`particle`] -- Struct-of-arrays particle storage and fluid property records.
//! - [`kernel`] -- Poly6 / Spiky / viscosity smoothing kernels with cached normalization.
//! - [`grid`] -- Spatial hash grid for O(N) neighbor search.
//! - [`eos`] -- Linear equation of state.
//! - [`sph`] -- Density/pressure and force passes, semi-implicit Euler integration.
//! - [`boundary`] -- Domain wall and box-obstacle collision handling.

#![warn(missing_docs)]

pub mod boundary;
pub mod eos;
pub mod grid;
pub mod kernel;
pub mod particle;
pub mod sph;

pub use boundary::Obstacle;
pub use grid::{GridStats, SpatialHashGrid};
pub use kernel::KernelSet;
pub use particle::{FluidProperties, ParticleStore, ParticleView};
