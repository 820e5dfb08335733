use super::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Side lengths of the simulation box as written in a system file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerRecord {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemMetadata {
    pub container: Option<ContainerRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtomRecord {
    element: String,
    position: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    velocity: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    fixed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondRecord {
    atoms: [usize; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SystemDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    container: Option<ContainerRecord>,
    #[serde(default)]
    atoms: Vec<AtomRecord>,
    #[serde(default)]
    bonds: Vec<BondRecord>,
}

#[derive(Debug, Error)]
pub enum SystemFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Bond {bond} refers to atom index {index}, but only {count} atoms are defined")]
    UnknownAtomIndex {
        bond: usize,
        index: usize,
        count: usize,
    },
    #[error("Bond {bond} has invalid order '{value}'")]
    InvalidBondOrder { bond: usize, value: String },
    #[error("Bond {bond} connects atom {index} to itself")]
    SelfBond { bond: usize, index: usize },
}

/// TOML description of atoms, bonds and an optional container box.
///
/// ```toml
/// [container]
/// lx = 20.0
/// ly = 20.0
/// lz = 20.0
///
/// [[atoms]]
/// element = "C"
/// position = [0.0, 0.0, 0.0]
/// velocity = [0.1, 0.0, 0.0]   # optional
/// fixed = false                # optional
///
/// [[bonds]]
/// atoms = [0, 1]               # zero-based atom indices
/// order = "double"             # optional, defaults to single
/// ```
pub struct SystemFile;

impl MolecularFile for SystemFile {
    type Metadata = SystemMetadata;
    type Error = SystemFileError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let document: SystemDocument = toml::from_str(&content)?;

        let mut system = MolecularSystem::new();
        let ids: Vec<AtomId> = document
            .atoms
            .into_iter()
            .map(|record| {
                let mut atom = Atom::new(&record.element, Point3::from(record.position));
                if let Some(velocity) = record.velocity {
                    atom.velocity = Vector3::from(velocity);
                }
                atom.fixed = record.fixed;
                system.add_atom(atom)
            })
            .collect();

        for (bond_index, record) in document.bonds.into_iter().enumerate() {
            let [a, b] = record.atoms;
            let lookup = |index: usize| {
                ids.get(index)
                    .copied()
                    .ok_or(SystemFileError::UnknownAtomIndex {
                        bond: bond_index,
                        index,
                        count: ids.len(),
                    })
            };
            let (id_a, id_b) = (lookup(a)?, lookup(b)?);
            let order = match record.order {
                Some(value) => value
                    .parse::<BondOrder>()
                    .map_err(|_| SystemFileError::InvalidBondOrder {
                        bond: bond_index,
                        value,
                    })?,
                None => BondOrder::default(),
            };
            system
                .add_bond(id_a, id_b, order)
                .ok_or(SystemFileError::SelfBond {
                    bond: bond_index,
                    index: a,
                })?;
        }

        Ok((
            system,
            SystemMetadata {
                container: document.container,
            },
        ))
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let mut index_of: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut atoms = Vec::with_capacity(system.atom_count());
        for (index, (id, atom)) in system.atoms_iter().enumerate() {
            index_of.insert(id, index);
            atoms.push(AtomRecord {
                element: atom.element.clone(),
                position: [atom.position.x, atom.position.y, atom.position.z],
                velocity: (atom.velocity != Vector3::zeros())
                    .then(|| [atom.velocity.x, atom.velocity.y, atom.velocity.z]),
                fixed: atom.fixed,
            });
        }

        let bonds = system
            .bonds()
            .iter()
            .filter_map(|bond| {
                let a = *index_of.get(bond.atom1_id)?;
                let b = *index_of.get(bond.atom2_id)?;
                Some(BondRecord {
                    atoms: [a, b],
                    order: (bond.order != BondOrder::Single)
                        .then(|| bond.order.to_string().to_lowercase()),
                })
            })
            .collect();

        let document = SystemDocument {
            container: metadata.container,
            atoms,
            bonds,
        };
        writer.write_all(toml::to_string_pretty(&document)?.as_bytes())?;
        Ok(())
    }
}
