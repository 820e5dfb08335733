use crate::core::models::particle::Particle;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Candidate interaction pairs `(i, j)` with `i < j`, gathered within
/// `cutoff + skin` and refreshed on a fixed step cadence.
///
/// Excluded pairs (bonded 1-2 and 1-3 neighbors) never enter the list.
#[derive(Debug, Clone)]
pub struct NeighborList {
    pairs: Vec<(usize, usize)>,
    exclusions: HashSet<(usize, usize)>,
    cutoff: f64,
    skin: f64,
    interval: u64,
    build_positions: Vec<Point3<f64>>,
    build_count: u64,
    last_build_step: Option<u64>,
}

impl NeighborList {
    pub fn new(cutoff: f64, skin: f64, interval: u64) -> Self {
        Self {
            pairs: Vec::new(),
            exclusions: HashSet::new(),
            cutoff,
            skin,
            interval: interval.max(1),
            build_positions: Vec::new(),
            build_count: 0,
            last_build_step: None,
        }
    }

    /// Replaces the excluded pairs; each is stored as `(min, max)`.
    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.exclusions = exclusions
            .into_iter()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        self
    }

    #[inline]
    pub fn is_excluded(&self, i: usize, j: usize) -> bool {
        self.exclusions.contains(&(i.min(j), i.max(j)))
    }

    #[inline]
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    pub fn skin(&self) -> f64 {
        self.skin
    }

    #[inline]
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Number of rebuilds performed so far.
    #[inline]
    pub fn build_count(&self) -> u64 {
        self.build_count
    }

    #[inline]
    pub fn last_build_step(&self) -> Option<u64> {
        self.last_build_step
    }

    /// Whether the list must be rebuilt before computing forces at `step`.
    pub fn is_due(&self, particles: &[Particle], step: u64) -> bool {
        self.last_build_step.is_none()
            || self.build_positions.len() != particles.len()
            || step % self.interval == 0
    }

    /// Largest displacement of any particle since the last rebuild.
    pub fn max_displacement(&self, particles: &[Particle]) -> f64 {
        self.build_positions
            .iter()
            .zip(particles)
            .map(|(last, p)| (p.position - last).norm())
            .fold(0.0, f64::max)
    }

    /// Rebuilds the list if it is due at `step`. Returns whether a rebuild happened.
    pub fn update(&mut self, particles: &[Particle], step: u64) -> bool {
        if !self.is_due(particles, step) {
            return false;
        }
        if self.build_positions.len() == particles.len() {
            let moved = self.max_displacement(particles);
            if moved > 0.5 * self.skin {
                warn!(
                    step,
                    moved,
                    skin = self.skin,
                    "Particles moved more than half the skin since the last rebuild; pairs may have been missed."
                );
            }
        }
        self.build(particles);
        self.last_build_step = Some(step);
        true
    }

    /// Rebuilds the pair list from the current positions.
    pub fn build(&mut self, particles: &[Particle]) {
        self.pairs.clear();
        self.build_positions.clear();
        self.build_positions
            .extend(particles.iter().map(|p| p.position));
        self.build_count += 1;

        if particles.len() < 2 {
            return;
        }

        let points: Vec<[f64; 3]> = particles
            .iter()
            .map(|p| [p.position.x, p.position.y, p.position.z])
            .collect();
        let tree: KdTree<f64, 3> = (&points).into();
        let search_sq = (self.cutoff + self.skin).powi(2);

        for (i, point) in points.iter().enumerate() {
            for neighbour in tree.within_unsorted::<SquaredEuclidean>(point, search_sq) {
                let j = neighbour.item as usize;
                if j > i && !self.exclusions.contains(&(i, j)) {
                    self.pairs.push((i, j));
                }
            }
        }
        self.pairs.sort_unstable();

        debug!(
            particles = particles.len(),
            pairs = self.pairs.len(),
            "Rebuilt neighbor list."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn particle_at(x: f64, y: f64, z: f64) -> Particle {
        Particle::movable(Point3::new(x, y, z), Vector3::zeros(), 1.0, 1.0, 0.1)
    }

    #[test]
    fn build_collects_pairs_within_cutoff_plus_skin() {
        let particles = vec![
            particle_at(0.0, 0.0, 0.0),
            particle_at(1.0, 0.0, 0.0),
            particle_at(5.0, 0.0, 0.0),
            particle_at(0.0, 2.2, 0.0),
        ];
        let mut list = NeighborList::new(2.0, 0.5, 10);
        list.build(&particles);

        assert_eq!(list.pairs(), &[(0, 1), (0, 3), (1, 3)]);
        assert_eq!(list.build_count(), 1);
    }

    #[test]
    fn pairs_are_ordered_and_unique() {
        let particles: Vec<Particle> = (0..6)
            .map(|n| particle_at(f64::from(n) * 0.5, f64::from(n % 2), 0.0))
            .collect();
        let mut list = NeighborList::new(3.0, 1.0, 10);
        list.build(&particles);

        assert!(list.pairs().iter().all(|&(i, j)| i < j));
        assert_eq!(list.pairs().len(), 15);
    }

    #[test]
    fn excluded_pairs_never_enter_the_list() {
        let particles = vec![
            particle_at(0.0, 0.0, 0.0),
            particle_at(1.0, 0.0, 0.0),
            particle_at(2.0, 0.0, 0.0),
        ];
        let mut list = NeighborList::new(3.0, 0.5, 10).with_exclusions([(1, 0), (0, 2)]);
        list.build(&particles);

        assert_eq!(list.pairs(), &[(1, 2)]);
        assert!(list.is_excluded(2, 0));
        assert!(!list.is_excluded(1, 2));
    }

    #[test]
    fn single_particle_yields_no_pairs() {
        let mut list = NeighborList::new(2.0, 0.5, 10);
        list.build(&[particle_at(0.0, 0.0, 0.0)]);
        assert!(list.pairs().is_empty());
    }

    #[test]
    fn update_rebuilds_only_on_interval_steps() {
        let particles = vec![particle_at(0.0, 0.0, 0.0), particle_at(1.0, 0.0, 0.0)];
        let mut list = NeighborList::new(2.0, 0.5, 10);

        let rebuilt: Vec<u64> = (1..=25)
            .filter(|&step| list.update(&particles, step))
            .collect();

        // First call always builds; afterwards only multiples of the interval.
        assert_eq!(rebuilt, vec![1, 10, 20]);
        assert_eq!(list.build_count(), 3);
        assert_eq!(list.last_build_step(), Some(20));
    }

    #[test]
    fn update_rebuilds_when_particle_count_changes() {
        let mut particles = vec![particle_at(0.0, 0.0, 0.0), particle_at(1.0, 0.0, 0.0)];
        let mut list = NeighborList::new(2.0, 0.5, 10);
        assert!(list.update(&particles, 1));
        assert!(!list.update(&particles, 2));

        particles.push(particle_at(0.0, 1.0, 0.0));
        assert!(list.update(&particles, 3));
        assert_eq!(list.pairs().len(), 3);
    }

    #[test]
    fn max_displacement_tracks_motion_since_build() {
        let mut particles = vec![particle_at(0.0, 0.0, 0.0), particle_at(1.0, 0.0, 0.0)];
        let mut list = NeighborList::new(2.0, 0.5, 10);
        list.build(&particles);
        assert_eq!(list.max_displacement(&particles), 0.0);

        particles[1].position.y += 0.3;
        assert!((list.max_displacement(&particles) - 0.3).abs() < 1e-12);
    }
}
