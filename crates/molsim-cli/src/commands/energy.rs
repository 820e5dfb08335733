use super::{container_from_metadata, enclosing_container, load_forcefield, load_system};
use crate::cli::EnergyArgs;
use crate::config::DefaultsConfig;
use crate::error::{CliError, Result};
use molsim::core::forcefield::params::Forcefield;
use molsim::core::forcefield::term::EnergyTerm;
use molsim::core::io::system_file::SystemMetadata;
use molsim::core::models::system::MolecularSystem;
use molsim::engine::config::SimulationConfig;
use molsim::workflows::simulate::Simulation;
use tracing::info;

pub fn run(args: EnergyArgs) -> Result<()> {
    let (system, metadata) = load_system(&args.input)?;
    let forcefield = load_forcefield(args.forcefield.as_deref())?;
    let terms = evaluate(&system, &metadata, &forcefield, args.cutoff)?;

    let atoms = system.atom_count();
    let per_atom = if atoms > 0 { atoms as f64 } else { 1.0 };
    println!("Single-point energy of {} atom(s):", atoms);
    println!("  {:<12} {:>16.6}", "non-bonded", terms.non_bonded);
    println!("  {:<12} {:>16.6}", "radial", terms.radial);
    println!("  {:<12} {:>16.6}", "angular", terms.angular);
    println!("  {:<12} {:>16.6}", "torsional", terms.torsional);
    println!("  {:<12} {:>16.6}", "total", terms.total());
    println!("  {:<12} {:>16.6}", "per atom", terms.total() / per_atom);
    Ok(())
}

fn evaluate(
    system: &MolecularSystem,
    metadata: &SystemMetadata,
    forcefield: &Forcefield,
    cutoff: Option<f64>,
) -> Result<EnergyTerm> {
    let defaults = DefaultsConfig::default();
    let container = match container_from_metadata(metadata)? {
        Some(container) => container,
        None => enclosing_container(system, defaults.container_margin)?,
    };
    let config = SimulationConfig::builder()
        .cutoff(cutoff.unwrap_or(defaults.cutoff))
        .container(container)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let mut simulation = Simulation::build(system, forcefield, &config)?;
    let terms = simulation.single_point_energy();
    info!(total = terms.total(), "Computed single-point energy.");
    Ok(terms)
}
