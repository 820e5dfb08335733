use super::boundary::apply_boundary;
use super::config::{MolecularContainer, SimulationConfig};
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::forcefield::accumulator::ForceBuffer;
use crate::core::forcefield::bonded::{AngularBond, RadialBond, TorsionalBond};
use crate::core::forcefield::nonbonded::{LennardJones, NonBondedInteractions, PairPotential};
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::energy::EnergySnapshot;
use crate::core::models::particle::Particle;
use nalgebra::Point3;
use tracing::{debug, trace};

/// Bonded terms of a simulation, each referring to particles by arena index.
#[derive(Debug, Clone, Default)]
pub struct BondedTerms {
    pub radial: Vec<RadialBond>,
    pub angular: Vec<AngularBond>,
    pub torsional: Vec<TorsionalBond>,
}

impl BondedTerms {
    pub fn is_empty(&self) -> bool {
        self.radial.is_empty() && self.angular.is_empty() && self.torsional.is_empty()
    }

    fn validate(&self, len: usize) -> Result<(), EngineError> {
        let check = |kind: &str, indices: &[usize]| {
            if let Some(&bad) = indices.iter().find(|&&index| index >= len) {
                return Err(EngineError::DegenerateTopology(format!(
                    "{kind} term refers to particle {bad}, but only {len} particles exist"
                )));
            }
            let mut sorted = indices.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() != indices.len() {
                return Err(EngineError::DegenerateTopology(format!(
                    "{kind} term {indices:?} repeats a particle"
                )));
            }
            Ok(())
        };
        for bond in &self.radial {
            check("radial", &[bond.i, bond.j])?;
        }
        for bond in &self.angular {
            check("angular", &[bond.i, bond.vertex, bond.k])?;
        }
        for bond in &self.torsional {
            check("torsional", &[bond.i, bond.j, bond.k, bond.l])?;
        }
        Ok(())
    }
}

/// Accumulates every force contribution into `forces`, in the order
/// non-bonded, radial, angular, torsional, and returns the raw energies.
fn accumulate_forces<P: PairPotential>(
    particles: &[Particle],
    nonbonded: &NonBondedInteractions<P>,
    bonded: &BondedTerms,
    forces: &mut ForceBuffer,
) -> EnergyTerm {
    forces.reset(particles.len());
    let non_bonded = nonbonded.compute(particles, forces);
    let radial = bonded
        .radial
        .iter()
        .map(|bond| bond.compute(particles, forces))
        .sum();
    let angular = bonded
        .angular
        .iter()
        .map(|bond| bond.compute(particles, forces))
        .sum();
    let torsional = bonded
        .torsional
        .iter()
        .map(|bond| bond.compute(particles, forces))
        .sum();
    EnergyTerm::new(non_bonded, radial, angular, torsional)
}

/// Molecular dynamics engine: owns the particle arena and every force term
/// and advances them one step at a time.
///
/// Reported energies are per atom. Because velocities are completed only once
/// the forces at the current positions are known, the snapshot after a step
/// describes the positions the step started from, one step behind
/// [`positions`](Self::positions).
pub struct MolecularDynamics<P = LennardJones> {
    particles: Vec<Particle>,
    bonded: BondedTerms,
    nonbonded: NonBondedInteractions<P>,
    container: MolecularContainer,
    time_step: f64,
    report_interval: u64,
    max_kinetic_energy: Option<f64>,
    forces: ForceBuffer,
    step_index: u64,
    movable_count: usize,
    energies: EnergySnapshot,
    energy_terms: EnergyTerm,
}

impl MolecularDynamics<LennardJones> {
    /// Creates an engine with the default shifted-force Lennard-Jones pair potential.
    pub fn new(particles: Vec<Particle>, config: &SimulationConfig) -> Self {
        Self::with_potential(particles, LennardJones::new(config.cutoff), config)
    }
}

impl<P: PairPotential> MolecularDynamics<P> {
    pub fn with_potential(particles: Vec<Particle>, potential: P, config: &SimulationConfig) -> Self {
        let nonbonded =
            NonBondedInteractions::new(potential, config.skin, config.neighbor_list_interval);
        let movable_count = particles.iter().filter(|p| !p.is_fixed()).count();
        let forces = ForceBuffer::new(particles.len());
        Self {
            particles,
            bonded: BondedTerms::default(),
            nonbonded,
            container: config.container,
            time_step: config.time_step,
            report_interval: config.report_interval,
            max_kinetic_energy: config.max_kinetic_energy,
            forces,
            step_index: 0,
            movable_count,
            energies: EnergySnapshot::default(),
            energy_terms: EnergyTerm::default(),
        }
    }

    /// Installs the bonded terms after checking that every index is valid.
    pub fn with_bonded_terms(mut self, bonded: BondedTerms) -> Result<Self, EngineError> {
        bonded.validate(self.particles.len())?;
        self.bonded = bonded;
        Ok(self)
    }

    /// Excludes particle pairs from non-bonded interactions.
    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.nonbonded = self.nonbonded.with_exclusions(exclusions);
        self
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the arena for re-seeding velocities. Call
    /// [`count_movables`](Self::count_movables) after changing which particles are fixed.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.particles.iter().map(|p| &p.position)
    }

    pub fn bonded_terms(&self) -> &BondedTerms {
        &self.bonded
    }

    pub fn nonbonded(&self) -> &NonBondedInteractions<P> {
        &self.nonbonded
    }

    pub fn container(&self) -> &MolecularContainer {
        &self.container
    }

    /// Energies after the most recent step.
    pub fn energies(&self) -> EnergySnapshot {
        self.energies
    }

    /// Raw energy breakdown of the most recent step.
    pub fn energy_terms(&self) -> EnergyTerm {
        self.energy_terms
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn movable_count(&self) -> usize {
        self.movable_count
    }

    /// Recounts the particles that take part in integration.
    pub fn count_movables(&mut self) -> usize {
        self.movable_count = self.particles.iter().filter(|p| !p.is_fixed()).count();
        self.movable_count
    }

    /// Un-normalized energy breakdown at the current geometry, without
    /// integrating. The neighbor list is rebuilt from the current positions.
    pub fn single_point_energy(&mut self) -> EnergyTerm {
        self.nonbonded.rebuild_neighbor_list(&self.particles);
        let mut scratch = ForceBuffer::new(self.particles.len());
        accumulate_forces(&self.particles, &self.nonbonded, &self.bonded, &mut scratch)
    }

    /// Advances the simulation by one time step.
    ///
    /// With no movable particle this is a no-op. Otherwise every force is
    /// accumulated before any particle moves; the step then fails with
    /// [`EngineError::Divergence`] if the resulting energies are not finite or
    /// exceed the configured kinetic energy limit.
    pub fn step(&mut self, reporter: &ProgressReporter) -> Result<(), EngineError> {
        if self.movable_count == 0 {
            return Ok(());
        }

        if self
            .nonbonded
            .check_neighbor_list(&self.particles, self.step_index)
        {
            trace!(step = self.step_index, "Neighbor list refreshed.");
        }

        let dt = self.time_step;
        let dt2 = dt * dt;
        let half_dt = 0.5 * dt;
        let atom_count = self.particles.len() as f64;

        let terms = accumulate_forces(
            &self.particles,
            &self.nonbonded,
            &self.bonded,
            &mut self.forces,
        );
        let potential = terms.total() / atom_count;

        let mut kinetic = 0.0;
        for (particle, force) in self.particles.iter_mut().zip(self.forces.iter()) {
            particle.apply_force(force);
            particle.predict(dt, dt2);
            particle.correct(half_dt);
            kinetic += particle.kinetic_energy();
        }
        let kinetic = kinetic / atom_count;

        apply_boundary(&self.container, &mut self.particles);

        self.step_index += 1;
        self.energy_terms = terms;
        self.energies = EnergySnapshot::new(self.step_index, kinetic, potential);

        if self.report_interval > 0 && self.step_index % self.report_interval == 0 {
            debug!(
                step = self.step_index,
                kinetic = self.energies.kinetic,
                potential = self.energies.potential,
                total = self.energies.total,
                "Energy report."
            );
            reporter.report(Progress::Energy(self.energies));
        }

        self.check_divergence()
    }

    fn check_divergence(&self) -> Result<(), EngineError> {
        if !self.energies.is_finite() {
            return Err(EngineError::Divergence {
                step: self.step_index,
                reason: format!(
                    "non-finite energy (kinetic {}, potential {})",
                    self.energies.kinetic, self.energies.potential
                ),
            });
        }
        if let Some(limit) = self.max_kinetic_energy {
            if self.energies.kinetic > limit {
                return Err(EngineError::Divergence {
                    step: self.step_index,
                    reason: format!(
                        "kinetic energy {} exceeds the limit {limit}",
                        self.energies.kinetic
                    ),
                });
            }
        }
        Ok(())
    }

    /// Runs `steps` steps, stopping at the first error.
    pub fn run(&mut self, steps: u64, reporter: &ProgressReporter) -> Result<EnergySnapshot, EngineError> {
        reporter.report(Progress::TaskStart { total_steps: steps });
        for _ in 0..steps {
            self.step(reporter)?;
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);
        Ok(self.energies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::sync::Mutex;

    const BOX: f64 = 100.0;

    fn config_with(interval: u64, dt: f64) -> SimulationConfig {
        SimulationConfig::builder()
            .container(MolecularContainer::new(BOX, BOX, BOX).unwrap())
            .neighbor_list_interval(interval)
            .time_step(dt)
            .cutoff(5.0)
            .skin(1.0)
            .build()
            .unwrap()
    }

    fn movable(x: f64, y: f64, z: f64, velocity: Vector3<f64>) -> Particle {
        Particle::movable(Point3::new(x, y, z), velocity, 1.0, 0.5, 0.0)
    }

    /// Every pair within range contributes a constant energy and no force.
    struct ConstantPair;

    impl PairPotential for ConstantPair {
        fn cutoff(&self) -> f64 {
            50.0
        }

        fn evaluate(&self, _: &Particle, _: &Particle, _: f64) -> (f64, f64) {
            (2.0, 0.0)
        }
    }

    fn bonded_pair(separation: f64, velocity: f64) -> MolecularDynamics {
        let particles = vec![
            movable(-0.5 * separation, 0.0, 0.0, Vector3::new(-velocity, 0.0, 0.0)),
            movable(0.5 * separation, 0.0, 0.0, Vector3::new(velocity, 0.0, 0.0)),
        ];
        MolecularDynamics::new(particles, &config_with(10, 0.01))
            .with_exclusions([(0, 1)])
            .with_bonded_terms(BondedTerms {
                radial: vec![RadialBond::new(0, 1, 1.0, 10.0)],
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn potential_energy_is_normalized_by_atom_count() {
        let particles = vec![
            movable(0.0, 0.0, 0.0, Vector3::zeros()),
            movable(1.0, 0.0, 0.0, Vector3::zeros()),
            movable(0.0, 1.0, 0.0, Vector3::zeros()),
            movable(0.0, 0.0, 1.0, Vector3::zeros()),
        ];
        let mut md = MolecularDynamics::with_potential(particles, ConstantPair, &config_with(10, 0.1));
        let reporter = ProgressReporter::new();
        md.run(4, &reporter).unwrap();

        // Six pairs at 2.0 each give a raw sum of 12.0 over four atoms.
        assert_eq!(md.energy_terms().non_bonded, 12.0);
        assert_eq!(md.energies().potential, 3.0);
        assert_eq!(md.step_index(), 4);
    }

    #[test]
    fn neighbor_list_rebuilds_on_fixed_cadence() {
        let particles = vec![
            movable(0.0, 0.0, 0.0, Vector3::new(0.01, 0.0, 0.0)),
            movable(2.0, 0.0, 0.0, Vector3::zeros()),
        ];
        let mut md = MolecularDynamics::new(particles, &config_with(10, 0.1));
        let reporter = ProgressReporter::new();

        let mut builds = Vec::new();
        for _ in 0..25 {
            let before = md.nonbonded().neighbor_list().build_count();
            let step = md.step_index();
            md.step(&reporter).unwrap();
            if md.nonbonded().neighbor_list().build_count() > before {
                builds.push(step);
            }
        }
        assert_eq!(builds, vec![0, 10, 20]);
    }

    #[test]
    fn total_energy_is_conserved_for_a_vibrating_bond() {
        let mut md = bonded_pair(1.2, 0.0);
        let reporter = ProgressReporter::new();

        md.step(&reporter).unwrap();
        let initial = md.energies().total;
        assert!(initial > 0.0);

        for _ in 0..1000 {
            md.step(&reporter).unwrap();
        }
        let drift = (md.energies().total - initial).abs() / initial;
        assert!(drift < 0.01, "relative drift {drift}");
    }

    #[test]
    fn center_of_mass_of_an_isolated_bonded_pair_stays_put() {
        let mut md = bonded_pair(1.0, 0.3);
        let reporter = ProgressReporter::new();
        let center = |md: &MolecularDynamics| {
            md.positions().fold(Vector3::zeros(), |acc, p| acc + p.coords) / 2.0
        };
        let start = center(&md);

        for _ in 0..500 {
            md.step(&reporter).unwrap();
            assert!((center(&md) - start).norm() < 1e-10);
        }
    }

    #[test]
    fn fixed_particles_never_move_and_carry_no_kinetic_energy() {
        let anchor = Point3::new(0.0, 0.0, 0.0);
        let particles = vec![
            Particle::fixed(anchor, 1.0, 1.0, 1.0),
            Particle::movable(Point3::new(1.05, 0.0, 0.0), Vector3::new(0.0, 0.2, 0.0), 1.0, 1.0, 1.0),
        ];
        let mut md = MolecularDynamics::new(particles, &config_with(10, 0.005));
        assert_eq!(md.movable_count(), 1);
        let reporter = ProgressReporter::new();

        for _ in 0..200 {
            md.step(&reporter).unwrap();
            assert_eq!(md.particles()[0].position, anchor);
            assert_eq!(md.particles()[0].kinetic_energy(), 0.0);
        }
        assert_ne!(md.particles()[1].position, Point3::new(1.05, 0.0, 0.0));
    }

    #[test]
    fn all_fixed_system_is_a_no_op() {
        let particles = vec![
            Particle::fixed(Point3::new(0.0, 0.0, 0.0), 1.0, 1.0, 1.0),
            Particle::fixed(Point3::new(1.0, 0.0, 0.0), 1.0, 1.0, 1.0),
        ];
        let mut md = MolecularDynamics::new(particles, &config_with(10, 0.1));
        let reporter = ProgressReporter::new();
        let before = md.energies();

        for _ in 0..5 {
            md.step(&reporter).unwrap();
        }
        assert_eq!(md.energies(), before);
        assert_eq!(md.step_index(), 0);
        assert_eq!(md.nonbonded().neighbor_list().build_count(), 0);
    }

    #[test]
    fn empty_system_is_a_no_op() {
        let mut md = MolecularDynamics::new(Vec::new(), &config_with(10, 0.1));
        assert!(md.run(3, &ProgressReporter::new()).is_ok());
        assert_eq!(md.step_index(), 0);
    }

    #[test]
    fn particle_at_wall_is_reflected() {
        let half = 0.5 * BOX;
        let particles = vec![Particle::movable(
            Point3::new(half - 0.1, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            1.0,
            1.0,
            0.0,
        )];
        let mut md = MolecularDynamics::new(particles, &config_with(10, 0.01));
        md.step(&ProgressReporter::new()).unwrap();

        let velocity = md.particles()[0].velocity().copied().unwrap();
        assert_eq!(velocity, Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn energy_reports_follow_report_interval() {
        let mut md = bonded_pair(1.1, 0.0);
        let steps = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Energy(snapshot) = event {
                steps.lock().unwrap().push(snapshot.step);
            }
        }));
        md.run(35, &reporter).unwrap();
        drop(reporter);
        assert_eq!(steps.into_inner().unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn exceeding_kinetic_limit_is_reported_as_divergence() {
        let config = SimulationConfig::builder()
            .container(MolecularContainer::new(BOX, BOX, BOX).unwrap())
            .max_kinetic_energy(0.1)
            .build()
            .unwrap();
        let particles = vec![movable(0.0, 0.0, 0.0, Vector3::new(5.0, 0.0, 0.0))];
        let mut md = MolecularDynamics::new(particles, &config);

        let result = md.step(&ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Divergence { step: 1, .. })));
    }

    #[test]
    fn out_of_range_bonded_index_is_rejected() {
        let particles = vec![movable(0.0, 0.0, 0.0, Vector3::zeros())];
        let result = MolecularDynamics::new(particles, &config_with(10, 0.1)).with_bonded_terms(
            BondedTerms {
                radial: vec![RadialBond::new(0, 3, 1.0, 1.0)],
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(EngineError::DegenerateTopology(_))));
    }

    #[test]
    fn single_point_energy_matches_first_step_terms() {
        let mut md = bonded_pair(1.3, 0.0);
        let single = md.single_point_energy();
        md.step(&ProgressReporter::new()).unwrap();
        assert!((single.radial - 0.5 * 10.0 * 0.09).abs() < 1e-12);
        assert_eq!(single, md.energy_terms());
    }
}
