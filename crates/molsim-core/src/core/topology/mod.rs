//! # Topology Module
//!
//! Perception of bonded interactions from the covalent bond graph.
//!
//! Given a [`MolecularSystem`](crate::core::models::system::MolecularSystem), the
//! [`perception`] module walks the bond adjacency to enumerate every angle triplet
//! and proper torsion, and collects the 1-2 and 1-3 pairs that are excluded from
//! non-bonded interactions.
//!
//! ```ignore
//! use molsim::core::topology::perception::perceive;
//!
//! let topology = perceive(&system);
//! println!("{} angles, {} torsions", topology.angles.len(), topology.torsions.len());
//! ```

pub mod perception;
