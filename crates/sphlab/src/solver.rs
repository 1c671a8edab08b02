//! The solver facade: lifecycle, injection, stepping, diagnostics.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use sphlab_core::boundary::{apply_domain_bounds, apply_obstacles};
use sphlab_core::sph::{compute_density_pressure, compute_forces, integrate};
use sphlab_core::{
    FluidProperties, GridStats, KernelSet, Obstacle, ParticleStore, SpatialHashGrid,
};

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::external::ExternalForce;
use crate::presets;
use crate::snapshot::ParticleSnapshot;

/// Solver lifecycle state.
///
/// `Idle` means no fluid has been injected yet (or the solver was reset);
/// injection moves the solver to `Running`. `step` only advances while
/// `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolverState {
    /// No particles; stepping is a no-op.
    Idle,
    /// Actively simulating.
    Running,
    /// Suspended; stepping is a no-op until resumed.
    Paused,
}

/// Aggregate diagnostics for the current solver state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolverStats {
    /// Simulated time (seconds).
    pub time: f64,
    /// Steps taken since construction or the last reset.
    pub step: u64,
    /// Live particle count.
    pub particles: usize,
    /// Total particle mass (kg).
    pub total_mass: f64,
    /// Mean density over all particles (kg/m^3); zero when empty.
    pub avg_density: f32,
    /// Mean pressure over all particles (Pa); zero when empty.
    pub avg_pressure: f32,
    /// Mean speed over all particles (m/s); zero when empty.
    pub avg_speed: f32,
    /// Largest particle speed (m/s); zero when empty.
    pub max_speed: f32,
    /// Particles whose position or velocity is NaN or infinite. Nonzero
    /// means the run has blown up; the solver never corrects this.
    pub non_finite_particles: usize,
    /// Spatial grid occupancy from the most recent step.
    pub grid: GridStats,
}

/// Smoothed particle hydrodynamics solver over a closed box domain.
///
/// Construct with a validated [`SolverConfig`], inject fluid with
/// [`add_fluid_box`](Self::add_fluid_box), then drive it with
/// [`step`](Self::step) or [`run`](Self::run). All randomness comes from
/// the seeded injection RNG, so runs with the same config and call
/// sequence are bitwise reproducible.
pub struct SphSolver {
    config: SolverConfig,
    kernels: KernelSet,
    grid: SpatialHashGrid,
    store: ParticleStore,
    fluids: Vec<FluidProperties>,
    obstacles: Vec<Obstacle>,
    external: Option<Box<dyn ExternalForce>>,
    rng: StdRng,
    state: SolverState,
    step_count: u64,
}

impl SphSolver {
    /// Build a solver from a configuration, validating it first.
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        info!(
            domain = ?config.domain_size,
            h = config.smoothing_length,
            dt = config.time_step,
            max_particles = config.max_particles,
            "solver created"
        );
        Ok(Self {
            kernels: KernelSet::new(config.smoothing_length),
            grid: SpatialHashGrid::new(config.smoothing_length),
            store: ParticleStore::with_capacity(config.max_particles),
            fluids: Vec::new(),
            obstacles: Vec::new(),
            external: None,
            rng: StdRng::seed_from_u64(config.rng_seed),
            state: SolverState::Idle,
            step_count: 0,
            config,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Simulated time in seconds.
    ///
    /// Computed as `step_count * dt` in f64, so it carries no accumulated
    /// rounding from repeated summation.
    pub fn time(&self) -> f64 {
        self.step_count as f64 * self.config.time_step as f64
    }

    /// Steps taken since construction or the last reset.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Live particle count.
    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    /// The configuration the solver was built with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fluids registered so far, in injection order.
    pub fn fluids(&self) -> &[FluidProperties] {
        &self.fluids
    }

    /// Obstacles registered so far.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Fill a box with particles of the given fluid.
    ///
    /// `position` is the minimum corner, `size` the extent per axis. The
    /// requested count sets the lattice spacing `(volume / n)^(1/3)`; the
    /// actual number injected is the lattice fill, at most `n_particles`.
    /// Each particle gets mass `rest_density * spacing^3` and a jittered
    /// lattice position clamped into the domain. Returns the number
    /// injected.
    ///
    /// Fails without side effects if the box or fluid is invalid or the
    /// injection would exceed capacity. An `Idle` solver starts `Running`
    /// on its first successful injection.
    pub fn add_fluid_box(
        &mut self,
        position: [f32; 3],
        size: [f32; 3],
        n_particles: usize,
        fluid: FluidProperties,
    ) -> Result<usize, SolverError> {
        if size.iter().any(|&s| !(s > 0.0)) {
            return Err(SolverError::InvalidConfig(
                "fluid box size components must be positive".into(),
            ));
        }
        if n_particles == 0 {
            return Err(SolverError::InvalidConfig(
                "fluid box particle count must be at least 1".into(),
            ));
        }
        presets::validate(&fluid)?;

        let volume = size[0] * size[1] * size[2];
        let spacing = (volume / n_particles as f32).cbrt();
        let nx = ((size[0] / spacing) as usize).max(1);
        let ny = ((size[1] / spacing) as usize).max(1);
        let nz = ((size[2] / spacing) as usize).max(1);
        let planned = (nx * ny * nz).min(n_particles);

        if planned > self.store.remaining() {
            return Err(SolverError::Capacity {
                requested: planned,
                active: self.store.len(),
                capacity: self.store.capacity(),
            });
        }

        if spacing > 0.5 * self.config.smoothing_length {
            warn!(
                spacing,
                h = self.config.smoothing_length,
                "lattice spacing exceeds half the smoothing length; each \
                 particle sees few neighbors and pressures will be noisy"
            );
        }

        let fluid_id = self.fluids.len() as u32;
        let mass = fluid.rest_density * spacing * spacing * spacing;
        let jitter = self.config.lattice_jitter * spacing;
        let domain = self.config.domain_size;

        let mut count = 0;
        'fill: for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    if count >= planned {
                        break 'fill;
                    }
                    let mut pos = [
                        position[0] + i as f32 * spacing,
                        position[1] + j as f32 * spacing,
                        position[2] + k as f32 * spacing,
                    ];
                    for axis in 0..3 {
                        pos[axis] += self.rng.random_range(-1.0..=1.0_f32) * jitter;
                        pos[axis] = pos[axis].clamp(0.0, domain[axis]);
                    }
                    self.store.push_particle(pos, [0.0; 3], mass, fluid_id);
                    count += 1;
                }
            }
        }

        info!(
            fluid = %fluid.name,
            injected = count,
            spacing,
            mass,
            total = self.store.len(),
            "fluid box injected"
        );
        self.fluids.push(fluid);
        if self.state == SolverState::Idle {
            self.state = SolverState::Running;
        }
        Ok(count)
    }

    /// Register an axis-aligned box obstacle.
    ///
    /// The box must be non-degenerate. A box reaching outside the domain
    /// is clamped to the domain before registration: a face flush with or
    /// beyond a wall would otherwise push particles out of the domain on
    /// contact. A box left degenerate by the clamp (entirely outside) is
    /// rejected.
    pub fn add_obstacle(&mut self, min: [f32; 3], max: [f32; 3]) -> Result<(), SolverError> {
        if min.iter().zip(&max).any(|(lo, hi)| !(lo < hi)) {
            return Err(SolverError::InvalidConfig(
                "obstacle min must be strictly below max on every axis".into(),
            ));
        }
        let mut clamped_min = min;
        let mut clamped_max = max;
        for axis in 0..3 {
            clamped_min[axis] = min[axis].clamp(0.0, self.config.domain_size[axis]);
            clamped_max[axis] = max[axis].clamp(0.0, self.config.domain_size[axis]);
        }
        if clamped_min
            .iter()
            .zip(&clamped_max)
            .any(|(lo, hi)| !(lo < hi))
        {
            return Err(SolverError::InvalidConfig(
                "obstacle lies entirely outside the domain".into(),
            ));
        }
        if clamped_min != min || clamped_max != max {
            warn!(?min, ?max, "obstacle clamped to the domain");
        }
        self.obstacles.push(Obstacle {
            min: clamped_min,
            max: clamped_max,
        });
        Ok(())
    }

    /// Install the external force hook, replacing any previous one.
    pub fn set_external_force(&mut self, force: impl ExternalForce + 'static) {
        if self.external.is_some() {
            debug!("replacing external force");
        }
        self.external = Some(Box::new(force));
    }

    /// Remove the external force hook.
    pub fn clear_external_force(&mut self) {
        self.external = None;
    }

    /// Suspend stepping. No effect unless `Running`.
    pub fn pause(&mut self) {
        if self.state == SolverState::Running {
            info!(step = self.step_count, "paused");
            self.state = SolverState::Paused;
        }
    }

    /// Resume from `Paused`. No effect otherwise.
    pub fn resume(&mut self) {
        if self.state == SolverState::Paused {
            info!(step = self.step_count, "resumed");
            self.state = SolverState::Running;
        }
    }

    /// Drop all particles and fluids, rewind the clock, and re-seed the
    /// injection RNG. Obstacles and the external force stay registered.
    /// A reset solver re-runs a scene bitwise identically.
    pub fn reset(&mut self) {
        info!(step = self.step_count, "reset");
        self.store.clear();
        self.fluids.clear();
        self.grid = SpatialHashGrid::new(self.config.smoothing_length);
        self.rng = StdRng::seed_from_u64(self.config.rng_seed);
        self.step_count = 0;
        self.state = SolverState::Idle;
    }

    /// Advance one time step.
    ///
    /// A no-op while `Paused` or `Idle`. One step is: rebuild the grid,
    /// density/pressure pass, force pass (pressure + viscosity + gravity,
    /// then the external force), integrate, then resolve domain walls and
    /// obstacles.
    pub fn step(&mut self) {
        if self.state != SolverState::Running {
            debug!(state = ?self.state, "step skipped");
            return;
        }

        self.grid.rebuild(&self.store.x, &self.store.y, &self.store.z);
        compute_density_pressure(&mut self.store, &self.fluids, &self.grid, &self.kernels);
        compute_forces(
            &mut self.store,
            &self.fluids,
            &self.grid,
            &self.kernels,
            self.config.gravity,
        );
        if let Some(external) = self.external.as_mut() {
            let (view, forces) = self.store.split_forces();
            external.accumulate(view, forces);
        }
        integrate(&mut self.store, self.config.time_step);
        apply_domain_bounds(
            &mut self.store,
            self.config.domain_size,
            self.config.boundary_damping,
        );
        if !self.obstacles.is_empty() {
            apply_obstacles(&mut self.store, &self.obstacles, self.config.boundary_damping);
        }

        self.step_count += 1;
    }

    /// Run for a simulated duration, calling `callback(solver, i)` after
    /// each step.
    ///
    /// Executes `ceil(duration / dt)` steps, except that exact multiples
    /// of `dt` do not round up to an extra step. Stops early if the solver
    /// leaves `Running` (a callback may pause it). Returns the number of
    /// steps executed.
    pub fn run_with<F>(&mut self, duration: f32, mut callback: F) -> u64
    where
        F: FnMut(&mut Self, u64),
    {
        // Relative epsilon absorbs f32 rounding in duration/dt so exact
        // multiples of dt do not round up to an extra step.
        let ratio = duration as f64 / self.config.time_step as f64;
        let n_steps = (ratio * (1.0 - 1.0e-6)).ceil().max(0.0) as u64;
        info!(duration, n_steps, "run started");
        let mut executed = 0;
        for i in 0..n_steps {
            if self.state != SolverState::Running {
                info!(executed, "run stopped early");
                break;
            }
            self.step();
            executed += 1;
            callback(self, i);
        }
        executed
    }

    /// [`run_with`](Self::run_with) without a callback.
    pub fn run(&mut self, duration: f32) -> u64 {
        self.run_with(duration, |_, _| {})
    }

    /// Aggregate diagnostics for the current state.
    pub fn stats(&self) -> SolverStats {
        let n = self.store.len();
        let mut stats = SolverStats {
            time: self.time(),
            step: self.step_count,
            particles: n,
            total_mass: self.store.total_mass(),
            avg_density: 0.0,
            avg_pressure: 0.0,
            avg_speed: 0.0,
            max_speed: 0.0,
            non_finite_particles: 0,
            grid: self.grid.stats(),
        };
        if n == 0 {
            return stats;
        }

        let mut density_sum = 0.0_f64;
        let mut pressure_sum = 0.0_f64;
        let mut speed_sum = 0.0_f64;
        for i in 0..n {
            density_sum += self.store.density[i] as f64;
            pressure_sum += self.store.pressure[i] as f64;
            let speed = (self.store.vx[i] * self.store.vx[i]
                + self.store.vy[i] * self.store.vy[i]
                + self.store.vz[i] * self.store.vz[i])
                .sqrt();
            speed_sum += speed as f64;
            if speed > stats.max_speed {
                stats.max_speed = speed;
            }
            let finite = self.store.x[i].is_finite()
                && self.store.y[i].is_finite()
                && self.store.z[i].is_finite()
                && self.store.vx[i].is_finite()
                && self.store.vy[i].is_finite()
                && self.store.vz[i].is_finite();
            if !finite {
                stats.non_finite_particles += 1;
            }
        }
        stats.avg_density = (density_sum / n as f64) as f32;
        stats.avg_pressure = (pressure_sum / n as f64) as f32;
        stats.avg_speed = (speed_sum / n as f64) as f32;
        stats
    }

    /// Copy out the current particle state for rendering or export.
    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot::capture(&self.store, &self.fluids, self.time(), self.step_count)
    }
}
