//! Linear (weakly compressible) equation of state.

/// Fraction of rest density used as the density floor.
///
/// Sparse neighborhoods (an isolated particle sees only its own self
/// contribution) can produce densities far below rest; flooring at 1% of
/// the fluid's rest density keeps the later `1 / density` divisions finite
/// without visibly changing well-sampled regions.
pub const DENSITY_FLOOR_FRACTION: f32 = 0.01;

/// Pressure from density: `P = k (rho - rho0)`.
///
/// Negative when the fluid is stretched below rest density; the resulting
/// mild attraction is part of this EOS family and is left in place.
#[inline]
pub fn linear_eos(density: f32, rest_density: f32, gas_constant: f32) -> f32 {
    gas_constant * (density - rest_density)
}
