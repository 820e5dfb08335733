/// Smallest separation or normalizing length used in force expressions.
pub const MIN_DISTANCE: f64 = 1e-8;

/// Lennard-Jones 12-6 energy and its radial derivative `dV/dr`.
#[inline]
pub fn lennard_jones_12_6(dist: f64, sigma: f64, epsilon: f64) -> (f64, f64) {
    let r = dist.max(MIN_DISTANCE);
    let sr6 = (sigma / r).powi(6);
    let sr12 = sr6 * sr6;
    let energy = 4.0 * epsilon * (sr12 - sr6);
    let derivative = -24.0 * epsilon * (2.0 * sr12 - sr6) / r;
    (energy, derivative)
}

/// Shifted-force Lennard-Jones: both energy and force go to zero at `cutoff`.
///
/// `V_sf(r) = V(r) - V(rc) - (r - rc) * V'(rc)` for `r < rc`, zero beyond.
#[inline]
pub fn lennard_jones_shifted_force(dist: f64, sigma: f64, epsilon: f64, cutoff: f64) -> (f64, f64) {
    if dist >= cutoff {
        return (0.0, 0.0);
    }
    let (v, dv) = lennard_jones_12_6(dist, sigma, epsilon);
    let (v_c, dv_c) = lennard_jones_12_6(cutoff, sigma, epsilon);
    (v - v_c - (dist - cutoff) * dv_c, dv - dv_c)
}

/// Harmonic restraint `0.5 * k * (x - x0)^2` and its derivative.
#[inline]
pub fn harmonic(value: f64, equilibrium: f64, stiffness: f64) -> (f64, f64) {
    let delta = value - equilibrium;
    (0.5 * stiffness * delta * delta, stiffness * delta)
}

/// Periodic torsion `0.5 * barrier * (1 + cos(n * phi - phase))` and `dV/dphi`.
#[inline]
pub fn periodic_torsion(phi: f64, barrier: f64, periodicity: u32, phase: f64) -> (f64, f64) {
    let n = f64::from(periodicity);
    let arg = n * phi - phase;
    (0.5 * barrier * (1.0 + arg.cos()), -0.5 * barrier * n * arg.sin())
}
