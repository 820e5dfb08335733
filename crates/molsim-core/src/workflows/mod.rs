//! # Workflows Module
//!
//! High-level entry points that turn a [`MolecularSystem`](crate::core::models::system::MolecularSystem)
//! into a running simulation.
//!
//! - **Simulation Workflow** ([`simulate`]) - Parameterization from a
//!   [`Forcefield`](crate::core::forcefield::params::Forcefield), topology perception,
//!   thermal initialization, stepping, and write-back of the final state.

pub mod simulate;
