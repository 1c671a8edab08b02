//! SPH smoothing kernel functions.
//!
//! Three kernels from the classic Mueller et al. (2003) interactive SPH
//! formulation, each a pure function of separation distance `r` and the
//! smoothing length `h`, identically zero outside the support radius `h`:
//!
//! - Poly6 for density summation,
//! - the Spiky gradient for pressure forces (non-vanishing gradient as
//!   r -> 0, which prevents close-range pressure collapse),
//! - the viscosity Laplacian for viscous forces (positive everywhere
//!   inside the support, giving a purely diffusive operator).
//!
//! Normalization constants depend only on `h`, which is fixed for a run, so
//! [`KernelSet`] precomputes them once at construction.

use std::f32::consts::PI;

/// Minimum separation below which the Spiky gradient direction is undefined.
const MIN_GRADIENT_SEPARATION: f32 = 1.0e-6;

/// Precomputed kernel evaluator for a fixed smoothing length.
///
/// Construct one per solver run; rebuild it if `h` ever changes.
#[derive(Debug, Clone, Copy)]
pub struct KernelSet {
    h: f32,
    h2: f32,
    /// 315 / (64 pi h^9)
    poly6_coef: f32,
    /// -45 / (pi h^6)
    spiky_grad_coef: f32,
    /// 45 / (pi h^6)
    visc_lap_coef: f32,
}

impl KernelSet {
    /// Create a kernel set for smoothing length `h` (must be positive).
    pub fn new(h: f32) -> Self {
        assert!(h > 0.0, "smoothing length must be positive");
        let h6 = h.powi(6);
        let h9 = h6 * h.powi(3);
        Self {
            h,
            h2: h * h,
            poly6_coef: 315.0 / (64.0 * PI * h9),
            spiky_grad_coef: -45.0 / (PI * h6),
            visc_lap_coef: 45.0 / (PI * h6),
        }
    }

    /// The smoothing length this set was built for.
    pub fn h(&self) -> f32 {
        self.h
    }

    /// Poly6 density kernel.
    ///
    /// ```text
    /// W(r, h) = 315 / (64 pi h^9) * (h^2 - r^2)^3    for r <= h
    /// W(r, h) = 0                                    for r >  h
    /// ```
    pub fn poly6(&self, r: f32) -> f32 {
        if r > self.h {
            return 0.0;
        }
        let d = self.h2 - r * r;
        self.poly6_coef * d * d * d
    }

    /// Gradient of the Spiky pressure kernel.
    ///
    /// ```text
    /// grad W(r_vec, h) = -45 / (pi h^6) * (h - r)^2 * r_vec / |r_vec|    for r <= h
    /// ```
    ///
    /// `(dx, dy, dz)` is the displacement from neighbor to particle and `r`
    /// its precomputed length. Returns zero beyond the support radius and
    /// for (near-)coincident particles, where the direction is undefined.
    pub fn spiky_gradient(&self, dx: f32, dy: f32, dz: f32, r: f32) -> (f32, f32, f32) {
        if r > self.h || r < MIN_GRADIENT_SEPARATION {
            return (0.0, 0.0, 0.0);
        }
        let hr = self.h - r;
        let scale = self.spiky_grad_coef * hr * hr / r;
        (scale * dx, scale * dy, scale * dz)
    }

    /// Laplacian of the viscosity kernel.
    ///
    /// ```text
    /// lap W(r, h) = 45 / (pi h^6) * (h - r)    for r <= h
    /// ```
    ///
    /// Valid only as the diffusive operator in the viscosity force; it is
    /// not a normalized interpolation kernel.
    pub fn viscosity_laplacian(&self, r: f32) -> f32 {
        if r > self.h {
            return 0.0;
        }
        self.visc_lap_coef * (self.h - r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poly6_at_zero_distance() {
        let h = 0.05_f32;
        let k = KernelSet::new(h);
        // W(0) = 315 / (64 pi h^9) * h^6 = 315 / (64 pi h^3)
        let expected = 315.0 / (64.0 * PI * h.powi(3));
        let w = k.poly6(0.0);
        assert!((w - expected).abs() / expected < 1.0e-5, "w={w}, expected={expected}");
    }

    #[test]
    fn all_kernels_zero_beyond_support() {
        let k = KernelSet::new(0.1);
        assert_eq!(k.poly6(0.11), 0.0);
        assert_eq!(k.viscosity_laplacian(0.2), 0.0);
        let (gx, gy, gz) = k.spiky_gradient(0.15, 0.0, 0.0, 0.15);
        assert_eq!((gx, gy, gz), (0.0, 0.0, 0.0));
    }

    #[test]
    fn kernels_zero_exactly_at_support_edge() {
        let h = 0.1_f32;
        let k = KernelSet::new(h);
        assert!(k.poly6(h).abs() < 1.0e-12);
        assert!(k.viscosity_laplacian(h).abs() < 1.0e-12);
    }

    #[test]
    fn poly6_positive_inside_support() {
        let h = 0.1_f32;
        let k = KernelSet::new(h);
        for i in 0..10 {
            let r = (i as f32) * 0.01;
            assert!(k.poly6(r) > 0.0, "poly6 should be positive at r={r}");
        }
    }

    #[test]
    fn spiky_gradient_points_toward_neighbor() {
        // Displacement from neighbor to particle along +x: the kernel
        // decreases away from the neighbor, so the gradient points in -x.
        let k = KernelSet::new(0.1);
        let (gx, gy, gz) = k.spiky_gradient(0.05, 0.0, 0.0, 0.05);
        assert!(gx < 0.0, "gradient x should be negative, got {gx}");
        assert_eq!(gy, 0.0);
        assert_eq!(gz, 0.0);
    }

    #[test]
    fn spiky_gradient_zero_at_coincident_points() {
        let k = KernelSet::new(0.1);
        assert_eq!(k.spiky_gradient(0.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0));
    }

    #[test]
    fn spiky_gradient_magnitude_grows_toward_center() {
        // Unlike Poly6, the Spiky gradient magnitude must not vanish as
        // r -> 0; that is the whole point of using it for pressure.
        let k = KernelSet::new(0.1);
        let near = k.spiky_gradient(0.001, 0.0, 0.0, 0.001).0.abs();
        let far = k.spiky_gradient(0.05, 0.0, 0.0, 0.05).0.abs();
        assert!(near > far, "near={near}, far={far}");
    }

    #[test]
    fn viscosity_laplacian_positive_and_linear() {
        let h = 0.1_f32;
        let k = KernelSet::new(h);
        let a = k.viscosity_laplacian(0.02);
        let b = k.viscosity_laplacian(0.06);
        assert!(a > b && b > 0.0);
        // Linear in (h - r)
        let ratio = a / b;
        assert!((ratio - (h - 0.02) / (h - 0.06)).abs() < 1.0e-4);
    }

    #[test]
    fn poly6_normalization_numerical() {
        // Riemann sum of the kernel over its support cube; the integral of
        // a normalized interpolation kernel must be close to 1.
        let h = 0.1_f32;
        let k = KernelSet::new(h);
        let n = 100;
        let cell = 2.0 * h / (n as f32);
        let dv = (cell * cell * cell) as f64;
        let mut integral = 0.0_f64;
        for ix in 0..n {
            let x = -h + (ix as f32 + 0.5) * cell;
            for iy in 0..n {
                let y = -h + (iy as f32 + 0.5) * cell;
                for iz in 0..n {
                    let z = -h + (iz as f32 + 0.5) * cell;
                    let r = (x * x + y * y + z * z).sqrt();
                    integral += k.poly6(r) as f64 * dv;
                }
            }
        }
        assert!(
            (integral - 1.0).abs() < 0.02,
            "poly6 integral = {integral}, expected ~1.0"
        );
    }
}
