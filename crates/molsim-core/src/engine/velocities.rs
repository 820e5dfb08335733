use super::config::ConfigError;
use crate::core::models::particle::Particle;
use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Draws Maxwell-Boltzmann velocities at temperature `k_B T = temperature`.
///
/// Each component of a movable particle is sampled from `N(0, sqrt(T / m))`.
/// With two or more movable particles the center-of-mass velocity is removed
/// afterwards, so the system does not drift. Fixed particles are untouched.
pub fn assign_thermal_velocities<R: Rng + ?Sized>(
    particles: &mut [Particle],
    temperature: f64,
    rng: &mut R,
) -> Result<(), ConfigError> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(ConfigError::InvalidValue {
            name: "temperature",
            reason: format!("must be a finite non-negative number, got {temperature}"),
        });
    }

    let mut momentum = Vector3::zeros();
    let mut total_mass = 0.0;
    let mut movable = 0usize;

    for particle in particles.iter_mut() {
        let mass = particle.mass;
        let normal = Normal::new(0.0, (temperature / mass).sqrt()).map_err(|e| {
            ConfigError::InvalidValue {
                name: "mass",
                reason: e.to_string(),
            }
        })?;
        if let Some(velocity) = particle.velocity_mut() {
            *velocity = Vector3::new(
                normal.sample(rng),
                normal.sample(rng),
                normal.sample(rng),
            );
            momentum += *velocity * mass;
            total_mass += mass;
            movable += 1;
        }
    }

    if movable >= 2 {
        let drift = momentum / total_mass;
        for velocity in particles.iter_mut().filter_map(Particle::velocity_mut) {
            *velocity -= drift;
        }
    }
    Ok(())
}
