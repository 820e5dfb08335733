//! # molsim Core Library
//!
//! A classical molecular dynamics engine: particles advanced by a
//! predictor/corrector integrator under bonded and non-bonded force fields,
//! inside a reflecting box.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`, `Particle`),
//!   pure potentials and force terms, the neighbor list, topology perception and file I/O.
//!
//! - **[`engine`]: The Logic Core.** The stateful `MolecularDynamics` integrator with its
//!   configuration, boundary model, progress reporting and error types.
//!
//! - **[`workflows`]: The Public API.** `Simulation` ties `engine` and `core` together:
//!   parameterize a system, run it and write the result back.

pub mod core;
pub mod engine;
pub mod workflows;
