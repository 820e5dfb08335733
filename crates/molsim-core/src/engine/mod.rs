//! # Engine Module
//!
//! The stateful simulation machinery: configuration, the molecular dynamics
//! integrator and everything it drives each step.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Time step, neighbor-list cadence, cutoff and the container box
//! - **Integration** ([`integrator`]) - The [`integrator::MolecularDynamics`] step loop and energy bookkeeping
//! - **Boundaries** ([`boundary`]) - Elastic velocity reflection at the container walls
//! - **Initial Conditions** ([`velocities`]) - Maxwell-Boltzmann velocity assignment
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress and energy reporting
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Step Structure
//!
//! Each step first accumulates every force contribution into a separate
//! buffer while particles are read-only, then integrates all particles, then
//! applies the boundary model. No particle moves before every force is known.

pub mod boundary;
pub mod config;
pub mod error;
pub mod integrator;
pub mod progress;
pub mod velocities;
