use super::accumulator::ForceBuffer;
use super::potentials::{self, MIN_DISTANCE};
use crate::core::models::particle::Particle;
use crate::core::utils::geometry;

/// Bond stretch between two particles: `V = 0.5 * k * (r - r0)^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialBond {
    pub i: usize,
    pub j: usize,
    pub length: f64,
    pub stiffness: f64,
}

impl RadialBond {
    pub fn new(i: usize, j: usize, length: f64, stiffness: f64) -> Self {
        Self {
            i,
            j,
            length,
            stiffness,
        }
    }

    /// Accumulates equal and opposite forces along the bond axis and returns the energy.
    pub fn compute(&self, particles: &[Particle], forces: &mut ForceBuffer) -> f64 {
        let r_ij = particles[self.i].position - particles[self.j].position;
        let dist = r_ij.norm();
        let (energy, d_energy) = potentials::harmonic(dist, self.length, self.stiffness);
        let force_on_i = r_ij * (-d_energy / dist.max(MIN_DISTANCE));
        forces.add_pair(self.i, self.j, force_on_i);
        energy
    }
}

/// Angle bend around `vertex` between particles `i` and `k`:
/// `V = 0.5 * k * (theta - theta0)^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularBond {
    pub i: usize,
    pub vertex: usize,
    pub k: usize,
    /// Equilibrium angle in radians.
    pub angle: f64,
    pub stiffness: f64,
}

impl AngularBond {
    pub fn new(i: usize, vertex: usize, k: usize, angle: f64, stiffness: f64) -> Self {
        Self {
            i,
            vertex,
            k,
            angle,
            stiffness,
        }
    }

    /// Accumulates bending forces on all three particles and returns the energy.
    ///
    /// The outer forces are perpendicular to their own bond and the vertex takes
    /// minus their sum, so neither net force nor net torque is introduced.
    pub fn compute(&self, particles: &[Particle], forces: &mut ForceBuffer) -> f64 {
        let vertex = &particles[self.vertex].position;
        let a = particles[self.i].position - vertex;
        let b = particles[self.k].position - vertex;
        let len_a = a.norm().max(MIN_DISTANCE);
        let len_b = b.norm().max(MIN_DISTANCE);

        let cos_theta = (a.dot(&b) / (len_a * len_b)).clamp(-1.0, 1.0);
        let theta = cos_theta.acos();
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt().max(MIN_DISTANCE);

        let (energy, d_energy) = potentials::harmonic(theta, self.angle, self.stiffness);

        // F = -dV/dtheta * dtheta/dx = dV/dtheta / sin(theta) * dcos(theta)/dx
        let scale = d_energy / sin_theta;
        let f_i = (b / (len_a * len_b) - a * (cos_theta / (len_a * len_a))) * scale;
        let f_k = (a / (len_a * len_b) - b * (cos_theta / (len_b * len_b))) * scale;

        forces.add(self.i, f_i);
        forces.add(self.k, f_k);
        forces.add(self.vertex, -(f_i + f_k));
        energy
    }
}

/// Dihedral rotation about the `j-k` axis of the chain `i-j-k-l`:
/// `V = 0.5 * barrier * (1 + cos(n * phi - phase))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsionalBond {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub l: usize,
    pub barrier: f64,
    pub periodicity: u32,
    /// Phase in radians.
    pub phase: f64,
}

impl TorsionalBond {
    pub fn new(
        [i, j, k, l]: [usize; 4],
        barrier: f64,
        periodicity: u32,
        phase: f64,
    ) -> Self {
        Self {
            i,
            j,
            k,
            l,
            barrier,
            periodicity,
            phase,
        }
    }

    /// Current dihedral angle of the four particles.
    pub fn angle(&self, particles: &[Particle]) -> f64 {
        geometry::dihedral_angle(
            &particles[self.i].position,
            &particles[self.j].position,
            &particles[self.k].position,
            &particles[self.l].position,
        )
    }

    /// Accumulates torsional forces on all four particles and returns the energy.
    pub fn compute(&self, particles: &[Particle], forces: &mut ForceBuffer) -> f64 {
        let x_i = &particles[self.i].position;
        let x_j = &particles[self.j].position;
        let x_k = &particles[self.k].position;
        let x_l = &particles[self.l].position;

        let r_ij = x_i - x_j;
        let r_kj = x_k - x_j;
        let r_kl = x_k - x_l;
        let m = r_ij.cross(&r_kj);
        let n = r_kj.cross(&r_kl);

        let phi = geometry::signed_angle(&m, &n, &r_ij);
        let (energy, d_energy) =
            potentials::periodic_torsion(phi, self.barrier, self.periodicity, self.phase);

        let min_sq = MIN_DISTANCE * MIN_DISTANCE;
        let m_sq = m.norm_squared().max(min_sq);
        let n_sq = n.norm_squared().max(min_sq);
        let r_kj_sq = r_kj.norm_squared().max(min_sq);
        let r_kj_len = r_kj_sq.sqrt();

        let f_i = m * (-d_energy * r_kj_len / m_sq);
        let f_l = n * (d_energy * r_kj_len / n_sq);

        let p = r_ij.dot(&r_kj) / r_kj_sq;
        let q = r_kl.dot(&r_kj) / r_kj_sq;
        let s = f_i * p - f_l * q;
        let f_j = f_i - s;
        let f_k = f_l + s;

        forces.add(self.i, f_i);
        forces.add(self.j, -f_j);
        forces.add(self.k, -f_k);
        forces.add(self.l, f_l);
        energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use std::f64::consts::PI;

    fn particle(x: f64, y: f64, z: f64) -> Particle {
        Particle::movable(Point3::new(x, y, z), Vector3::zeros(), 1.0, 1.0, 0.0)
    }

    /// Central-difference gradient of `energy` with respect to every coordinate.
    fn numeric_forces(
        particles: &[Particle],
        energy: impl Fn(&[Particle]) -> f64,
    ) -> Vec<Vector3<f64>> {
        let h = 1e-6;
        let mut result = vec![Vector3::zeros(); particles.len()];
        for (index, slot) in result.iter_mut().enumerate() {
            for axis in 0..3 {
                let mut plus = particles.to_vec();
                let mut minus = particles.to_vec();
                plus[index].position[axis] += h;
                minus[index].position[axis] -= h;
                slot[axis] = -(energy(&plus) - energy(&minus)) / (2.0 * h);
            }
        }
        result
    }

    fn assert_forces_close(analytic: &ForceBuffer, numeric: &[Vector3<f64>]) {
        for (index, expected) in numeric.iter().enumerate() {
            let diff = (analytic[index] - expected).norm();
            assert!(
                diff < 1e-5,
                "particle {index}: analytic {:?} vs numeric {:?}",
                analytic[index],
                expected
            );
        }
    }

    #[test]
    fn radial_bond_at_equilibrium_has_no_energy_or_force() {
        let particles = vec![particle(0.0, 0.0, 0.0), particle(1.5, 0.0, 0.0)];
        let bond = RadialBond::new(0, 1, 1.5, 10.0);
        let mut forces = ForceBuffer::new(2);
        let energy = bond.compute(&particles, &mut forces);
        assert!(energy.abs() < 1e-12);
        assert!(forces[0].norm() < 1e-12);
    }

    #[test]
    fn stretched_radial_bond_pulls_particles_together() {
        let particles = vec![particle(0.0, 0.0, 0.0), particle(2.0, 0.0, 0.0)];
        let bond = RadialBond::new(0, 1, 1.5, 10.0);
        let mut forces = ForceBuffer::new(2);
        let energy = bond.compute(&particles, &mut forces);

        assert!((energy - 0.5 * 10.0 * 0.25).abs() < 1e-12);
        assert!((forces[0] - Vector3::new(5.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((forces[1] - Vector3::new(-5.0, 0.0, 0.0)).norm() < 1e-12);
        assert!(forces.net().norm() < 1e-12);
    }

    #[test]
    fn radial_bond_forces_match_energy_gradient() {
        let particles = vec![particle(0.1, -0.2, 0.3), particle(1.2, 0.7, -0.4)];
        let bond = RadialBond::new(0, 1, 1.1, 7.0);
        let mut forces = ForceBuffer::new(2);
        bond.compute(&particles, &mut forces);
        let numeric = numeric_forces(&particles, |p| bond.compute(p, &mut ForceBuffer::new(2)));
        assert_forces_close(&forces, &numeric);
    }

    #[test]
    fn radial_bond_with_coincident_particles_stays_finite() {
        let particles = vec![particle(1.0, 1.0, 1.0), particle(1.0, 1.0, 1.0)];
        let bond = RadialBond::new(0, 1, 1.0, 5.0);
        let mut forces = ForceBuffer::new(2);
        let energy = bond.compute(&particles, &mut forces);
        assert!(energy.is_finite());
        assert!(forces[0].iter().all(|c| c.is_finite()));
    }

    #[test]
    fn angular_bond_forces_match_energy_gradient() {
        let particles = vec![
            particle(1.0, 0.1, 0.0),
            particle(0.0, 0.0, 0.0),
            particle(-0.3, 1.1, 0.2),
        ];
        let bond = AngularBond::new(0, 1, 2, 100f64.to_radians(), 3.0);
        let mut forces = ForceBuffer::new(3);
        let energy = bond.compute(&particles, &mut forces);
        assert!(energy > 0.0);

        let numeric = numeric_forces(&particles, |p| bond.compute(p, &mut ForceBuffer::new(3)));
        assert_forces_close(&forces, &numeric);
    }

    #[test]
    fn angular_bond_introduces_no_net_force_or_torque() {
        let particles = vec![
            particle(1.0, 0.2, 0.3),
            particle(0.1, 0.0, -0.1),
            particle(-0.5, 0.9, 0.4),
        ];
        let bond = AngularBond::new(0, 1, 2, 2.0, 4.0);
        let mut forces = ForceBuffer::new(3);
        bond.compute(&particles, &mut forces);

        assert!(forces.net().norm() < 1e-10);
        let torque: Vector3<f64> = particles
            .iter()
            .enumerate()
            .map(|(index, p)| p.position.coords.cross(&forces[index]))
            .sum();
        assert!(torque.norm() < 1e-10);
    }

    #[test]
    fn straight_angular_bond_stays_finite() {
        let particles = vec![
            particle(-1.0, 0.0, 0.0),
            particle(0.0, 0.0, 0.0),
            particle(1.0, 0.0, 0.0),
        ];
        let bond = AngularBond::new(0, 1, 2, 2.0, 4.0);
        let mut forces = ForceBuffer::new(3);
        let energy = bond.compute(&particles, &mut forces);
        assert!(energy.is_finite());
        assert!(forces.iter().all(|f| f.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn torsional_bond_forces_match_energy_gradient() {
        let particles = vec![
            particle(0.0, 1.0, 0.2),
            particle(0.0, 0.0, 0.0),
            particle(1.5, 0.0, 0.0),
            particle(1.7, 0.6, 0.9),
        ];
        let bond = TorsionalBond::new([0, 1, 2, 3], 1.2, 3, 0.3);
        let mut forces = ForceBuffer::new(4);
        bond.compute(&particles, &mut forces);

        let numeric = numeric_forces(&particles, |p| bond.compute(p, &mut ForceBuffer::new(4)));
        assert_forces_close(&forces, &numeric);
        assert!(forces.net().norm() < 1e-10);
    }

    #[test]
    fn torsional_energy_follows_dihedral_angle() {
        let trans = vec![
            particle(0.0, 1.0, 0.0),
            particle(0.0, 0.0, 0.0),
            particle(1.0, 0.0, 0.0),
            particle(1.0, -1.0, 0.0),
        ];
        let bond = TorsionalBond::new([0, 1, 2, 3], 2.0, 1, 0.0);
        assert!((bond.angle(&trans).abs() - PI).abs() < 1e-12);

        let energy = bond.compute(&trans, &mut ForceBuffer::new(4));
        assert!(energy.abs() < 1e-12);
    }

    #[test]
    fn degenerate_torsions_stay_finite() {
        let collinear = vec![
            particle(-1.0, 0.0, 0.0),
            particle(0.0, 0.0, 0.0),
            particle(1.5, 0.0, 0.0),
            particle(2.5, 0.0, 0.0),
        ];
        let coincident = vec![
            particle(0.0, 1.0, 0.0),
            particle(0.5, 0.5, 0.5),
            particle(0.5, 0.5, 0.5),
            particle(1.0, -1.0, 0.3),
        ];
        let bond = TorsionalBond::new([0, 1, 2, 3], 1.5, 3, 0.2);

        for particles in [collinear, coincident] {
            let mut forces = ForceBuffer::new(4);
            let energy = bond.compute(&particles, &mut forces);
            assert!(energy.is_finite());
            assert!(forces.iter().all(|f| f.iter().all(|c| c.is_finite())));
        }
    }
}
