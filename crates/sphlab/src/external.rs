//! External force extension point.
//!
//! The solver accepts at most one external force, applied after pressure,
//! viscosity, and gravity in every step's force pass. Implementations add
//! into the force accumulators; they must not replace what is already
//! there.

use sphlab_core::ParticleView;

/// Per-step hook that adds custom forces to every particle.
pub trait ExternalForce {
    /// Add this force's contribution into `forces` (`[fx, fy, fz]`
    /// component slices, parallel to the view's arrays).
    fn accumulate(&mut self, particles: ParticleView<'_>, forces: [&mut [f32]; 3]);
}

impl<F> ExternalForce for F
where
    F: FnMut(ParticleView<'_>, [&mut [f32]; 3]),
{
    fn accumulate(&mut self, particles: ParticleView<'_>, forces: [&mut [f32]; 3]) {
        self(particles, forces)
    }
}

/// Centrifugal force about a vertical (y) axis, for rotating-tank scenes.
///
/// Each particle receives `m * omega^2 * r` directed radially outward from
/// the axis in the xz plane. A particle on the axis gets no force.
#[derive(Debug, Clone, Copy)]
pub struct CentrifugalForce {
    /// Point the rotation axis passes through; only x and z are used.
    pub center: [f32; 3],
    /// Angular speed (rad/s).
    pub angular_velocity: f32,
}

impl ExternalForce for CentrifugalForce {
    fn accumulate(&mut self, particles: ParticleView<'_>, forces: [&mut [f32]; 3]) {
        let [fx, _, fz] = forces;
        let omega_sq = self.angular_velocity * self.angular_velocity;
        for i in 0..particles.len() {
            let dx = particles.x[i] - self.center[0];
            let dz = particles.z[i] - self.center[2];
            let scale = particles.mass[i] * omega_sq;
            fx[i] += scale * dx;
            fz[i] += scale * dz;
        }
    }
}
