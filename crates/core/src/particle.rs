//! Particle data structures using struct-of-arrays layout.
//!
//! All per-particle arrays are parallel: index `i` across every array refers
//! to the same particle. Separate x/y/z component arrays (rather than a
//! vector type) keep the hot loops free of struct shuffling and make the
//! layout trivial to hand to a renderer.

use serde::{Deserialize, Serialize};

/// Immutable property bundle governing one fluid type.
///
/// Particles reference a `FluidProperties` record through their `fluid_id`;
/// the bundle itself never changes after registration. Rest density and the
/// gas constant feed the equation of state, viscosity feeds the viscous
/// force, and the color is only ever read by renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidProperties {
    /// Human-readable fluid name.
    pub name: String,
    /// Rest density rho0 (kg/m^3).
    pub rest_density: f32,
    /// Dynamic viscosity mu (Pa s).
    pub viscosity: f32,
    /// Gas constant k -- pressure stiffness in P = k (rho - rho0).
    pub gas_constant: f32,
    /// Base RGB render color, each channel in [0, 1].
    pub color: [f32; 3],
}

/// Struct-of-arrays particle storage with a fixed capacity.
///
/// The store is owned by the solver loop; other components receive it by
/// reference for the duration of a single pass and never retain it.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    // ---- Positions (meters) ----
    /// X positions.
    pub x: Vec<f32>,
    /// Y positions.
    pub y: Vec<f32>,
    /// Z positions.
    pub z: Vec<f32>,

    // ---- Velocities (m/s) ----
    /// X velocities.
    pub vx: Vec<f32>,
    /// Y velocities.
    pub vy: Vec<f32>,
    /// Z velocities.
    pub vz: Vec<f32>,

    // ---- Accumulated forces (N), reset and recomputed every step ----
    /// X force components.
    pub fx: Vec<f32>,
    /// Y force components.
    pub fy: Vec<f32>,
    /// Z force components.
    pub fz: Vec<f32>,

    // ---- Scalar fields ----
    /// Particle mass (kg); constant after creation, always positive.
    pub mass: Vec<f32>,
    /// Density (kg/m^3), recomputed every step.
    pub density: Vec<f32>,
    /// Pressure (Pa), derived from density each step; may be negative.
    pub pressure: Vec<f32>,
    /// Index into the solver's registered `FluidProperties` table.
    pub fluid_id: Vec<u32>,

    capacity: usize,
}

impl ParticleStore {
    /// Create an empty store that can hold at most `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
            vx: Vec::with_capacity(capacity),
            vy: Vec::with_capacity(capacity),
            vz: Vec::with_capacity(capacity),
            fx: Vec::with_capacity(capacity),
            fy: Vec::with_capacity(capacity),
            fz: Vec::with_capacity(capacity),
            mass: Vec::with_capacity(capacity),
            density: Vec::with_capacity(capacity),
            pressure: Vec::with_capacity(capacity),
            fluid_id: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// `true` if there are no particles.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Maximum number of particles the store accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remaining headroom before the capacity bound is hit.
    pub fn remaining(&self) -> usize {
        self.capacity - self.len()
    }

    /// Append a single particle.
    ///
    /// Force, density, and pressure start at zero; they are filled in by the
    /// next step's passes. The caller is responsible for staying within
    /// capacity and for `mass > 0`.
    pub fn push_particle(
        &mut self,
        position: [f32; 3],
        velocity: [f32; 3],
        mass: f32,
        fluid_id: u32,
    ) {
        assert!(self.len() < self.capacity, "particle store capacity exceeded");
        assert!(mass > 0.0, "particle mass must be positive");
        self.x.push(position[0]);
        self.y.push(position[1]);
        self.z.push(position[2]);
        self.vx.push(velocity[0]);
        self.vy.push(velocity[1]);
        self.vz.push(velocity[2]);
        self.fx.push(0.0);
        self.fy.push(0.0);
        self.fz.push(0.0);
        self.mass.push(mass);
        self.density.push(0.0);
        self.pressure.push(0.0);
        self.fluid_id.push(fluid_id);
    }

    /// Remove every particle, keeping the allocations.
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
        self.vx.clear();
        self.vy.clear();
        self.vz.clear();
        self.fx.clear();
        self.fy.clear();
        self.fz.clear();
        self.mass.clear();
        self.density.clear();
        self.pressure.clear();
        self.fluid_id.clear();
    }

    /// Total mass of all live particles, summed in f64 for stability.
    pub fn total_mass(&self) -> f64 {
        self.mass.iter().map(|&m| m as f64).sum()
    }

    /// Borrow the non-force fields read-only while handing out the force
    /// arrays mutably. Used to let force callbacks read particle state while
    /// accumulating into `fx`/`fy`/`fz`.
    pub fn split_forces(&mut self) -> (ParticleView<'_>, [&mut [f32]; 3]) {
        let view = ParticleView {
            x: &self.x,
            y: &self.y,
            z: &self.z,
            vx: &self.vx,
            vy: &self.vy,
            vz: &self.vz,
            mass: &self.mass,
            density: &self.density,
            pressure: &self.pressure,
            fluid_id: &self.fluid_id,
        };
        (view, [&mut self.fx, &mut self.fy, &mut self.fz])
    }
}

/// Read-only view of particle state, minus the force accumulators.
///
/// Handed to external force callbacks so they can inspect the full particle
/// state without being able to mutate it mid-step.
#[derive(Debug, Clone, Copy)]
pub struct ParticleView<'a> {
    /// X positions.
    pub x: &'a [f32],
    /// Y positions.
    pub y: &'a [f32],
    /// Z positions.
    pub z: &'a [f32],
    /// X velocities.
    pub vx: &'a [f32],
    /// Y velocities.
    pub vy: &'a [f32],
    /// Z velocities.
    pub vz: &'a [f32],
    /// Particle masses.
    pub mass: &'a [f32],
    /// Densities.
    pub density: &'a [f32],
    /// Pressures.
    pub pressure: &'a [f32],
    /// Fluid table indices.
    pub fluid_id: &'a [u32],
}

impl ParticleView<'_> {
    /// Number of particles in the view.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// `true` if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
