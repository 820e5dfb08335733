//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent molecular
//! systems and their simulated counterparts.
//!
//! ## Overview
//!
//! Two views of the same molecule live here:
//!
//! - **Topology view** - [`atom::Atom`]s and [`topology::Bond`]s held in a
//!   [`system::MolecularSystem`], as produced by a structure reader.
//! - **Simulation view** - [`particle::Particle`]s in a flat arena, carrying the
//!   kinematic state advanced by the integrator.
//!
//! ## Key Components
//!
//! - [`atom`] - Element, coordinates, initial velocity and fixed flag of an atom
//! - [`energy`] - Per-atom energy snapshot reported after each step
//! - [`ids`] - Stable identifiers for atoms in a system
//! - [`particle`] - Per-particle kinematics and the predictor/corrector step
//! - [`system`] - Atoms plus bond connectivity with an adjacency cache
//! - [`topology`] - Bond and bond-order types
//!
//! ## Usage
//!
//! ```ignore
//! use molsim::core::models::{atom::Atom, system::MolecularSystem, topology::BondOrder};
//!
//! let mut system = MolecularSystem::new();
//! let c = system.add_atom(Atom::new("C", Point3::new(0.0, 0.0, 0.0)));
//! let o = system.add_atom(Atom::new("O", Point3::new(1.2, 0.0, 0.0)));
//! system.add_bond(c, o, BondOrder::Double);
//! ```

pub mod atom;
pub mod energy;
pub mod ids;
pub mod particle;
pub mod system;
pub mod topology;
