use crate::core::forcefield::bonded::{AngularBond, RadialBond, TorsionalBond};
use crate::core::forcefield::params::Forcefield;
use crate::core::forcefield::potentials::MIN_DISTANCE;
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::energy::EnergySnapshot;
use crate::core::models::ids::AtomId;
use crate::core::models::particle::Particle;
use crate::core::models::system::MolecularSystem;
use crate::core::topology::perception;
use crate::core::utils::geometry;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::integrator::{BondedTerms, MolecularDynamics};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::velocities;
use rand::Rng;
use slotmap::SecondaryMap;
use tracing::{info, instrument, warn};

/// A parameterized molecular system ready to be integrated.
///
/// Keeps the mapping from arena indices back to the [`AtomId`]s of the source
/// system so that results can be written back with [`Simulation::sync_positions`].
pub struct Simulation {
    engine: MolecularDynamics,
    atom_ids: Vec<AtomId>,
}

impl Simulation {
    /// Flattens `system` into a particle arena and derives every bonded term.
    ///
    /// Equilibrium lengths and angles are taken from the input geometry; bond
    /// stiffness is scaled by bond order.
    ///
    /// # Errors
    ///
    /// Fails for atoms whose element has no parameters and for bonds whose
    /// atoms coincide.
    #[instrument(skip_all, name = "simulation_build")]
    pub fn build(
        system: &MolecularSystem,
        forcefield: &Forcefield,
        config: &SimulationConfig,
    ) -> Result<Self, EngineError> {
        let mut atom_ids = Vec::with_capacity(system.atom_count());
        let mut index_of: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut particles = Vec::with_capacity(system.atom_count());

        for (id, atom) in system.atoms_iter() {
            let params = forcefield.element_params(&atom.element)?;
            index_of.insert(id, particles.len());
            atom_ids.push(id);
            particles.push(if atom.fixed {
                Particle::fixed(atom.position, params.mass, params.sigma, params.epsilon)
            } else {
                Particle::movable(
                    atom.position,
                    atom.velocity,
                    params.mass,
                    params.sigma,
                    params.epsilon,
                )
            });
        }

        let topology = perception::perceive(system);
        let globals = &forcefield.globals;
        let mut bonded = BondedTerms::default();

        for bond in system.bonds() {
            let (i, j) = (index_of[bond.atom1_id], index_of[bond.atom2_id]);
            let length = (particles[i].position - particles[j].position).norm();
            if length < MIN_DISTANCE {
                return Err(EngineError::DegenerateTopology(format!(
                    "bonded atoms {i} and {j} occupy the same position"
                )));
            }
            bonded.radial.push(RadialBond::new(
                i,
                j,
                length,
                globals.bond_stiffness * bond.order.stiffness_scale(),
            ));
        }

        for [a, vertex, b] in &topology.angles {
            let (i, v, k) = (index_of[*a], index_of[*vertex], index_of[*b]);
            let angle = geometry::bond_angle(
                &particles[i].position,
                &particles[v].position,
                &particles[k].position,
            );
            bonded
                .angular
                .push(AngularBond::new(i, v, k, angle, globals.angle_stiffness));
        }

        let phase = globals.torsion_phase.to_radians();
        for &[i, j, k, l] in &topology.torsions {
            bonded.torsional.push(TorsionalBond::new(
                [index_of[i], index_of[j], index_of[k], index_of[l]],
                globals.torsion_barrier,
                globals.torsion_periodicity,
                phase,
            ));
        }

        let exclusions: Vec<(usize, usize)> = topology
            .exclusions
            .iter()
            .map(|&(a, b)| (index_of[a], index_of[b]))
            .collect();

        info!(
            atoms = particles.len(),
            radial = bonded.radial.len(),
            angular = bonded.angular.len(),
            torsional = bonded.torsional.len(),
            exclusions = exclusions.len(),
            "Built simulation from molecular system."
        );

        if let Some(limit) = stable_time_step(&particles, &bonded.radial) {
            if config.time_step > limit {
                warn!(
                    time_step = config.time_step,
                    limit,
                    "Time step exceeds the stability limit of the stiffest bond; the run may diverge."
                );
            }
        }

        let engine = MolecularDynamics::new(particles, config)
            .with_exclusions(exclusions)
            .with_bonded_terms(bonded)?;
        Ok(Self { engine, atom_ids })
    }

    /// Largest time step the integrator can take before the stiffest radial
    /// bond becomes unstable, or `None` without a bond between movable atoms.
    pub fn stable_time_step(&self) -> Option<f64> {
        stable_time_step(self.engine.particles(), &self.engine.bonded_terms().radial)
    }

    /// Replaces the velocities of all movable particles with a
    /// Maxwell-Boltzmann draw at `temperature`.
    pub fn thermalize<R: Rng + ?Sized>(
        &mut self,
        temperature: f64,
        rng: &mut R,
    ) -> Result<(), EngineError> {
        velocities::assign_thermal_velocities(self.engine.particles_mut(), temperature, rng)?;
        info!(temperature, "Assigned thermal velocities.");
        Ok(())
    }

    #[instrument(skip_all, name = "simulation_run", fields(steps = steps))]
    pub fn run(
        &mut self,
        steps: u64,
        reporter: &ProgressReporter,
    ) -> Result<EnergySnapshot, EngineError> {
        reporter.report(Progress::PhaseStart { name: "Dynamics" });
        info!(
            steps,
            movable = self.engine.movable_count(),
            "Starting molecular dynamics."
        );
        let energies = self.engine.run(steps, reporter)?;
        reporter.report(Progress::PhaseFinish);
        info!(
            step = energies.step,
            total = energies.total,
            "Molecular dynamics finished."
        );
        Ok(energies)
    }

    pub fn step(&mut self, reporter: &ProgressReporter) -> Result<(), EngineError> {
        self.engine.step(reporter)
    }

    pub fn single_point_energy(&mut self) -> EnergyTerm {
        self.engine.single_point_energy()
    }

    pub fn energies(&self) -> EnergySnapshot {
        self.engine.energies()
    }

    pub fn engine(&self) -> &MolecularDynamics {
        &self.engine
    }

    /// Writes current positions and velocities back into `system`.
    ///
    /// Atoms that were removed from `system` since the build are skipped.
    pub fn sync_positions(&self, system: &mut MolecularSystem) {
        for (particle, &id) in self.engine.particles().iter().zip(&self.atom_ids) {
            if let Some(atom) = system.atom_mut(id) {
                atom.position = particle.position;
                if let Some(velocity) = particle.velocity() {
                    atom.velocity = *velocity;
                }
            }
        }
    }
}

/// `2 / omega_max`, with `omega = sqrt(k / mu)` over the reduced mass of each bond.
/// A fixed end pins the bond, leaving the movable mass alone.
fn stable_time_step(particles: &[Particle], radial: &[RadialBond]) -> Option<f64> {
    radial
        .iter()
        .filter_map(|bond| {
            let (a, b) = (&particles[bond.i], &particles[bond.j]);
            let reduced_mass = match (a.is_fixed(), b.is_fixed()) {
                (true, true) => return None,
                (true, false) => b.mass,
                (false, true) => a.mass,
                (false, false) => a.mass * b.mass / (a.mass + b.mass),
            };
            Some((bond.stiffness / reduced_mass).sqrt())
        })
        .filter(|omega| *omega > 0.0)
        .reduce(f64::max)
        .map(|omega_max| 2.0 / omega_max)
}
