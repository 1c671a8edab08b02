//! Domain walls and box obstacles.
//!
//! The simulation domain is the axis-aligned box `[0, domain_size]` per
//! axis. Both the walls and obstacles use the same clamp-and-reflect rule:
//! the particle is moved to the violated surface and the velocity component
//! normal to that surface is reflected with a damping factor, leaving the
//! tangential components untouched.

use serde::{Deserialize, Serialize};

use crate::particle::ParticleStore;

/// Axis-aligned box obstacle inside the domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Obstacle {
    /// Create an obstacle from two corners; each `min` component must be
    /// strictly below the matching `max` component.
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        assert!(
            min[0] < max[0] && min[1] < max[1] && min[2] < max[2],
            "obstacle min must be strictly below max on every axis"
        );
        Self { min, max }
    }

    /// Whether a point lies strictly inside the box.
    pub fn contains(&self, p: [f32; 3]) -> bool {
        p[0] > self.min[0]
            && p[0] < self.max[0]
            && p[1] > self.min[1]
            && p[1] < self.max[1]
            && p[2] > self.min[2]
            && p[2] < self.max[2]
    }
}

/// Clamp every particle into `[0, domain_size]` and reflect velocities.
///
/// For each axis independently: a particle below the lower wall is placed
/// exactly on it and its velocity component is set to `+|v| * damping`;
/// above the upper wall, exactly on it with `-|v| * damping`. `damping`
/// in `[0, 1]` is the fraction of normal speed kept after a bounce.
pub fn apply_domain_bounds(store: &mut ParticleStore, domain_size: [f32; 3], damping: f32) {
    for i in 0..store.len() {
        reflect_axis(&mut store.x[i], &mut store.vx[i], domain_size[0], damping);
        reflect_axis(&mut store.y[i], &mut store.vy[i], domain_size[1], damping);
        reflect_axis(&mut store.z[i], &mut store.vz[i], domain_size[2], damping);
    }
}

#[inline]
fn reflect_axis(p: &mut f32, v: &mut f32, size: f32, damping: f32) {
    if *p < 0.0 {
        *p = 0.0;
        *v = v.abs() * damping;
    } else if *p > size {
        *p = size;
        *v = -v.abs() * damping;
    }
}

/// Push particles out of every obstacle, reflecting along one axis.
///
/// A particle found inside a box is expelled through the face it
/// penetrated least deeply, mirroring the wall rule: position clamped to
/// that face, normal velocity component reflected with `damping`, other
/// components untouched.
pub fn apply_obstacles(store: &mut ParticleStore, obstacles: &[Obstacle], damping: f32) {
    for obstacle in obstacles {
        for i in 0..store.len() {
            let p = [store.x[i], store.y[i], store.z[i]];
            if !obstacle.contains(p) {
                continue;
            }
            // Penetration depth through each of the six faces.
            let depths = [
                p[0] - obstacle.min[0],
                obstacle.max[0] - p[0],
                p[1] - obstacle.min[1],
                obstacle.max[1] - p[1],
                p[2] - obstacle.min[2],
                obstacle.max[2] - p[2],
            ];
            let mut face = 0;
            for (k, &d) in depths.iter().enumerate().skip(1) {
                if d < depths[face] {
                    face = k;
                }
            }
            match face {
                0 => {
                    store.x[i] = obstacle.min[0];
                    store.vx[i] = -store.vx[i].abs() * damping;
                }
                1 => {
                    store.x[i] = obstacle.max[0];
                    store.vx[i] = store.vx[i].abs() * damping;
                }
                2 => {
                    store.y[i] = obstacle.min[1];
                    store.vy[i] = -store.vy[i].abs() * damping;
                }
                3 => {
                    store.y[i] = obstacle.max[1];
                    store.vy[i] = store.vy[i].abs() * damping;
                }
                4 => {
                    store.z[i] = obstacle.min[2];
                    store.vz[i] = -store.vz[i].abs() * damping;
                }
                _ => {
                    store.z[i] = obstacle.max[2];
                    store.vz[i] = store.vz[i].abs() * damping;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_particle(pos: [f32; 3], vel: [f32; 3]) -> ParticleStore {
        let mut store = ParticleStore::with_capacity(1);
        store.push_particle(pos, vel, 0.02, 0);
        store
    }

    #[test]
    fn lower_wall_clamps_and_reflects() {
        let mut store = one_particle([-0.05, 0.5, 0.5], [-2.0, 1.0, 0.0]);
        apply_domain_bounds(&mut store, [2.0; 3], 0.5);
        assert_eq!(store.x[0], 0.0);
        assert!((store.vx[0] - 1.0).abs() < 1.0e-6, "vx = {}", store.vx[0]);
        // Tangential components untouched
        assert_eq!(store.vy[0], 1.0);
        assert_eq!(store.y[0], 0.5);
    }

    #[test]
    fn upper_wall_clamps_and_reflects() {
        let mut store = one_particle([0.5, 2.3, 0.5], [0.0, 3.0, 0.0]);
        apply_domain_bounds(&mut store, [2.0; 3], 0.5);
        assert_eq!(store.y[0], 2.0);
        assert!((store.vy[0] + 1.5).abs() < 1.0e-6, "vy = {}", store.vy[0]);
    }

    #[test]
    fn reflection_points_inward_regardless_of_velocity_sign() {
        // A particle below the floor but already moving up must keep
        // moving up, not be flipped back out.
        let mut store = one_particle([0.5, -0.01, 0.5], [0.0, 4.0, 0.0]);
        apply_domain_bounds(&mut store, [2.0; 3], 0.5);
        assert!((store.vy[0] - 2.0).abs() < 1.0e-6, "vy = {}", store.vy[0]);
    }

    #[test]
    fn interior_particle_untouched() {
        let mut store = one_particle([1.0, 1.0, 1.0], [0.3, -0.2, 0.1]);
        apply_domain_bounds(&mut store, [2.0; 3], 0.5);
        assert_eq!(store.x[0], 1.0);
        assert_eq!(store.vx[0], 0.3);
        assert_eq!(store.vy[0], -0.2);
    }

    #[test]
    fn corner_violation_reflects_both_axes() {
        let mut store = one_particle([-0.1, 2.1, 0.5], [-1.0, 1.0, 0.0]);
        apply_domain_bounds(&mut store, [2.0; 3], 0.5);
        assert_eq!(store.x[0], 0.0);
        assert_eq!(store.y[0], 2.0);
        assert!(store.vx[0] > 0.0);
        assert!(store.vy[0] < 0.0);
    }

    #[test]
    fn zero_damping_kills_normal_velocity() {
        let mut store = one_particle([0.5, -0.1, 0.5], [0.0, -3.0, 0.0]);
        apply_domain_bounds(&mut store, [2.0; 3], 0.0);
        assert_eq!(store.vy[0], 0.0);
        assert_eq!(store.y[0], 0.0);
    }

    #[test]
    fn obstacle_contains_is_strict() {
        let obstacle = Obstacle::new([0.5, 0.5, 0.5], [1.0, 1.0, 1.0]);
        assert!(obstacle.contains([0.75, 0.75, 0.75]));
        assert!(!obstacle.contains([0.5, 0.75, 0.75]));
        assert!(!obstacle.contains([0.2, 0.75, 0.75]));
    }

    #[test]
    fn obstacle_expels_through_nearest_face() {
        let obstacle = Obstacle::new([0.5, 0.5, 0.5], [1.5, 1.5, 1.5]);
        // Just inside the min-x face, falling downward.
        let mut store = one_particle([0.52, 1.0, 1.0], [0.5, -1.0, 0.0]);
        apply_obstacles(&mut store, &[obstacle], 0.5);
        assert_eq!(store.x[0], 0.5);
        assert!((store.vx[0] + 0.25).abs() < 1.0e-6, "vx = {}", store.vx[0]);
        // Only the normal axis is altered.
        assert_eq!(store.vy[0], -1.0);
        assert_eq!(store.y[0], 1.0);
    }

    #[test]
    fn obstacle_ignores_outside_particles() {
        let obstacle = Obstacle::new([0.5, 0.5, 0.5], [1.0, 1.0, 1.0]);
        let mut store = one_particle([0.2, 0.2, 0.2], [1.0, 1.0, 1.0]);
        apply_obstacles(&mut store, &[obstacle], 0.5);
        assert_eq!(store.x[0], 0.2);
        assert_eq!(store.vx[0], 1.0);
    }

    #[test]
    #[should_panic(expected = "strictly below")]
    fn degenerate_obstacle_rejected() {
        let _ = Obstacle::new([1.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    }
}
