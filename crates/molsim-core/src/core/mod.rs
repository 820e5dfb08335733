//! # Core Module
//!
//! The stateless foundation of the library: data models, force-field math,
//! topology perception and file I/O.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, systems and simulation particles
//! - **Energy Calculations** ([`forcefield`]) - Potentials, bonded and non-bonded force terms, parameters
//! - **Structural Knowledge** ([`topology`]) - Angle, torsion and exclusion perception from bonds
//! - **File I/O** ([`io`]) - System files and energy logs
//! - **Geometry** ([`utils`]) - Angle and dihedral helpers shared by the above

pub mod forcefield;
pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
