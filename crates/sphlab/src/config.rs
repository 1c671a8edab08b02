//! Solver configuration: serde-backed with field defaults and validation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SolverError;

/// Top-level solver configuration.
///
/// Every field has a default, so `SolverConfig::default()` (or an empty
/// JSON object) gives a runnable 2 m water-tank setup. Loaded configs are
/// validated before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Domain extent per axis (meters); the domain is `[0, size]` on each.
    #[serde(default = "default_domain_size")]
    pub domain_size: [f32; 3],
    /// Smoothing length `h` (meters); also the neighbor-search radius.
    #[serde(default = "default_smoothing_length")]
    pub smoothing_length: f32,
    /// Fixed integration time step (seconds).
    #[serde(default = "default_time_step")]
    pub time_step: f32,
    /// Gravitational acceleration (m/s^2).
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],
    /// Fraction of normal speed kept after a wall bounce, in `[0, 1]`.
    #[serde(default = "default_boundary_damping")]
    pub boundary_damping: f32,
    /// Hard particle limit.
    #[serde(default = "default_max_particles")]
    pub max_particles: usize,
    /// Injection lattice jitter as a fraction of particle spacing,
    /// in `[0, 0.5]`. Zero gives an exact lattice.
    #[serde(default = "default_lattice_jitter")]
    pub lattice_jitter: f32,
    /// Seed for the injection RNG; identical seeds give identical runs.
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
}

fn default_domain_size() -> [f32; 3] {
    [2.0, 2.0, 2.0]
}

fn default_smoothing_length() -> f32 {
    0.05
}

fn default_time_step() -> f32 {
    0.001
}

fn default_gravity() -> [f32; 3] {
    [0.0, -9.81, 0.0]
}

fn default_boundary_damping() -> f32 {
    0.5
}

fn default_max_particles() -> usize {
    100_000
}

fn default_lattice_jitter() -> f32 {
    0.1
}

fn default_rng_seed() -> u64 {
    42
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            domain_size: default_domain_size(),
            smoothing_length: default_smoothing_length(),
            time_step: default_time_step(),
            gravity: default_gravity(),
            boundary_damping: default_boundary_damping(),
            max_particles: default_max_particles(),
            lattice_jitter: default_lattice_jitter(),
            rng_seed: default_rng_seed(),
        }
    }
}

impl SolverConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SolverError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            SolverError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: SolverConfig = serde_json::from_str(&contents)
            .map_err(|e| SolverError::InvalidConfig(format!("failed to parse config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field; returns the first violation found.
    pub fn validate(&self) -> Result<(), SolverError> {
        let fail = |msg: &str| Err(SolverError::InvalidConfig(msg.to_string()));

        if self.domain_size.iter().any(|&d| !(d > 0.0)) {
            return fail("domain_size components must be positive");
        }
        if !(self.smoothing_length > 0.0) {
            return fail("smoothing_length must be positive");
        }
        let min_dim = self
            .domain_size
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min);
        if self.smoothing_length > min_dim {
            return fail("smoothing_length must not exceed the smallest domain dimension");
        }
        if !(self.time_step > 0.0) {
            return fail("time_step must be positive");
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return fail("gravity components must be finite");
        }
        if !(0.0..=1.0).contains(&self.boundary_damping) {
            return fail("boundary_damping must be in [0, 1]");
        }
        if self.max_particles == 0 {
            return fail("max_particles must be at least 1");
        }
        if !(0.0..=0.5).contains(&self.lattice_jitter) {
            return fail("lattice_jitter must be in [0, 0.5]");
        }
        Ok(())
    }
}
