//! # Force Field Module
//!
//! Energy and force evaluation for molecular dynamics: pure potential
//! functions, bonded terms, non-bonded pair interactions over a neighbor list,
//! and the parameter tables that feed them.
//!
//! ## Key Components
//!
//! - [`potentials`] - Lennard-Jones, harmonic and periodic torsion functions with derivatives
//! - [`bonded`] - Radial, angular and torsional terms indexed into the particle arena
//! - [`nonbonded`] - The [`nonbonded::PairPotential`] seam and neighbor-list driven pair forces
//! - [`neighbor`] - k-d tree backed candidate pair list with a fixed refresh cadence
//! - [`accumulator`] - Per-particle force buffer written during the accumulate phase
//! - [`params`] / [`elements`] - Bonded constants and per-element Lennard-Jones parameters
//! - [`term`] - Energy breakdown by contributor
//!
//! ## Usage
//!
//! Every force term follows the same contract: read particles, add forces into a
//! [`accumulator::ForceBuffer`], return the raw energy.
//!
//! ```ignore
//! use molsim::core::forcefield::{accumulator::ForceBuffer, bonded::RadialBond};
//!
//! let mut forces = ForceBuffer::new(particles.len());
//! let energy = RadialBond::new(0, 1, 1.5, 20.0).compute(&particles, &mut forces);
//! ```

pub mod accumulator;
pub mod bonded;
pub mod elements;
pub mod neighbor;
pub mod nonbonded;
pub mod params;
pub mod potentials;
pub mod term;
