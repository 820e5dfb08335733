use super::config::MolecularContainer;
use crate::core::models::particle::Particle;

/// Reflects velocities of particles touching the container walls.
///
/// A particle of radius `sigma / 2` touches the wall on an axis when its surface
/// crosses `±half_extent`. The offending velocity component is pointed back
/// inward; positions are left untouched and fixed particles are ignored.
pub fn apply_boundary(container: &MolecularContainer, particles: &mut [Particle]) {
    let half = container.half_extents();
    for particle in particles.iter_mut() {
        let radius = 0.5 * particle.sigma;
        let position = particle.position;
        let Some(velocity) = particle.velocity_mut() else {
            continue;
        };
        for axis in 0..3 {
            if position[axis] + radius > half[axis] {
                velocity[axis] = -velocity[axis].abs();
            } else if position[axis] - radius < -half[axis] {
                velocity[axis] = velocity[axis].abs();
            }
        }
    }
}
