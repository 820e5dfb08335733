pub mod energy;
pub mod run;

use crate::error::{CliError, Result};
use molsim::core::forcefield::params::Forcefield;
use molsim::core::io::system_file::{SystemFile, SystemMetadata};
use molsim::core::io::traits::MolecularFile;
use molsim::core::models::system::MolecularSystem;
use molsim::engine::config::MolecularContainer;
use std::path::Path;
use tracing::info;

fn load_system(path: &Path) -> Result<(MolecularSystem, SystemMetadata)> {
    info!("Loading input system from {:?}", path);
    SystemFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn load_forcefield(path: Option<&Path>) -> Result<Forcefield> {
    match path {
        Some(path) => {
            info!("Loading force-field parameters from {:?}", path);
            Forcefield::load(path).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })
        }
        None => {
            info!("No force-field file given, using built-in parameters.");
            Ok(Forcefield::default())
        }
    }
}

fn container_from_metadata(metadata: &SystemMetadata) -> Result<Option<MolecularContainer>> {
    metadata
        .container
        .as_ref()
        .map(|c| MolecularContainer::new(c.lx, c.ly, c.lz))
        .transpose()
        .map_err(|e| CliError::Config(format!("Invalid container in system file: {}", e)))
}

/// Smallest origin-centered box holding every atom, padded by `margin` on each side.
fn enclosing_container(system: &MolecularSystem, margin: f64) -> Result<MolecularContainer> {
    let extent = system
        .atoms_iter()
        .fold([0.0f64; 3], |acc, (_, atom)| {
            let p = atom.position;
            [
                acc[0].max(p.x.abs()),
                acc[1].max(p.y.abs()),
                acc[2].max(p.z.abs()),
            ]
        });
    MolecularContainer::new(
        2.0 * (extent[0] + margin),
        2.0 * (extent[1] + margin),
        2.0 * (extent[2] + margin),
    )
    .map_err(|e| CliError::Config(e.to_string()))
}
