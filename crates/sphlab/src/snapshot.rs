//! Read-only particle snapshots for renderers and exporters.

use serde::Serialize;
use sphlab_core::{FluidProperties, ParticleStore};

/// One frame of particle state, copied out of the solver.
///
/// Arrays are parallel per particle. Colors come from each particle's
/// fluid, so a renderer needs nothing but the snapshot. Serializes to
/// JSON for offline tooling.
#[derive(Debug, Clone, Serialize)]
pub struct ParticleSnapshot {
    /// Simulation time (seconds) the frame was taken at.
    pub time: f64,
    /// Step count at capture.
    pub step: u64,
    /// Particle positions.
    pub positions: Vec<[f32; 3]>,
    /// Particle velocities.
    pub velocities: Vec<[f32; 3]>,
    /// Particle densities.
    pub densities: Vec<f32>,
    /// Particle pressures.
    pub pressures: Vec<f32>,
    /// Per-particle RGB colors resolved from the fluid table.
    pub colors: Vec<[f32; 3]>,
    /// Per-particle index into the solver's fluid table, in injection
    /// order.
    pub fluid_ids: Vec<u32>,
}

impl ParticleSnapshot {
    pub(crate) fn capture(
        store: &ParticleStore,
        fluids: &[FluidProperties],
        time: f64,
        step: u64,
    ) -> Self {
        let n = store.len();
        let mut positions = Vec::with_capacity(n);
        let mut velocities = Vec::with_capacity(n);
        let mut colors = Vec::with_capacity(n);
        for i in 0..n {
            positions.push([store.x[i], store.y[i], store.z[i]]);
            velocities.push([store.vx[i], store.vy[i], store.vz[i]]);
            colors.push(fluids[store.fluid_id[i] as usize].color);
        }
        Self {
            time,
            step,
            positions,
            velocities,
            densities: store.density.clone(),
            pressures: store.pressure.clone(),
            colors,
            fluid_ids: store.fluid_id.clone(),
        }
    }

    /// Number of particles in the frame.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` if the frame has no particles.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
