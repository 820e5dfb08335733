use super::accumulator::ForceBuffer;
use super::neighbor::NeighborList;
use super::potentials::{self, MIN_DISTANCE};
use crate::core::models::particle::Particle;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
const PAIR_CHUNK: usize = 4096;

/// A short-range, radially symmetric pair interaction.
pub trait PairPotential: Send + Sync {
    /// Distance beyond which the interaction is exactly zero.
    fn cutoff(&self) -> f64;

    /// Energy and `dV/dr` of the pair `a`-`b` at separation `dist < cutoff()`.
    fn evaluate(&self, a: &Particle, b: &Particle, dist: f64) -> (f64, f64);
}

/// Shifted-force Lennard-Jones 12-6 with Lorentz-Berthelot mixing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJones {
    pub cutoff: f64,
}

impl LennardJones {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    #[inline]
    pub fn mix(a: &Particle, b: &Particle) -> (f64, f64) {
        (0.5 * (a.sigma + b.sigma), (a.epsilon * b.epsilon).sqrt())
    }
}

impl PairPotential for LennardJones {
    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    fn evaluate(&self, a: &Particle, b: &Particle, dist: f64) -> (f64, f64) {
        let (sigma, epsilon) = Self::mix(a, b);
        potentials::lennard_jones_shifted_force(dist, sigma, epsilon, self.cutoff)
    }
}

/// Non-bonded interactions over a periodically refreshed neighbor list.
#[derive(Debug, Clone)]
pub struct NonBondedInteractions<P = LennardJones> {
    potential: P,
    neighbors: NeighborList,
}

impl<P: PairPotential> NonBondedInteractions<P> {
    pub fn new(potential: P, skin: f64, interval: u64) -> Self {
        let neighbors = NeighborList::new(potential.cutoff(), skin, interval);
        Self {
            potential,
            neighbors,
        }
    }

    /// Excludes the given particle pairs (typically bonded 1-2 and 1-3 pairs).
    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.neighbors = self.neighbors.with_exclusions(exclusions);
        self
    }

    pub fn potential(&self) -> &P {
        &self.potential
    }

    pub fn neighbor_list(&self) -> &NeighborList {
        &self.neighbors
    }

    /// Rebuilds the neighbor list if it is due at `step`; returns whether it did.
    pub fn check_neighbor_list(&mut self, particles: &[Particle], step: u64) -> bool {
        self.neighbors.update(particles, step)
    }

    /// Rebuilds the neighbor list now, outside the step cadence.
    pub fn rebuild_neighbor_list(&mut self, particles: &[Particle]) {
        self.neighbors.build(particles);
    }

    /// Accumulates pair forces over the cached neighbor list and returns the
    /// raw energy sum.
    pub fn compute(&self, particles: &[Particle], forces: &mut ForceBuffer) -> f64 {
        #[cfg(not(feature = "parallel"))]
        {
            self.compute_pairs(self.neighbors.pairs(), particles, forces)
        }

        #[cfg(feature = "parallel")]
        {
            let len = particles.len();
            let (energy, partial) = self
                .neighbors
                .pairs()
                .par_chunks(PAIR_CHUNK)
                .map(|chunk| {
                    let mut local = ForceBuffer::new(len);
                    let energy = self.compute_pairs(chunk, particles, &mut local);
                    (energy, local)
                })
                .reduce(
                    || (0.0, ForceBuffer::new(len)),
                    |(energy_a, mut forces_a), (energy_b, forces_b)| {
                        forces_a.merge(&forces_b);
                        (energy_a + energy_b, forces_a)
                    },
                );
            forces.merge(&partial);
            energy
        }
    }

    fn compute_pairs(
        &self,
        pairs: &[(usize, usize)],
        particles: &[Particle],
        forces: &mut ForceBuffer,
    ) -> f64 {
        let cutoff = self.potential.cutoff();
        let mut energy = 0.0;
        for &(i, j) in pairs {
            let (a, b) = (&particles[i], &particles[j]);
            if a.is_fixed() && b.is_fixed() {
                continue;
            }
            let r_ij = a.position - b.position;
            let dist = r_ij.norm();
            if dist >= cutoff {
                continue;
            }
            let (pair_energy, d_energy) = self.potential.evaluate(a, b, dist);
            energy += pair_energy;
            forces.add_pair(i, j, r_ij * (-d_energy / dist.max(MIN_DISTANCE)));
        }
        energy
    }
}
