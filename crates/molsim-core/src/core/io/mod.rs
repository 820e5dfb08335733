//! # I/O Module
//!
//! Reading and writing of the files a simulation consumes and produces.
//!
//! - [`traits`] - The [`traits::MolecularFile`] interface with path-based helpers
//! - [`system_file`] - TOML system description: atoms, bonds and the container box
//! - [`energy_log`] - CSV log of per-step energy snapshots

pub mod energy_log;
pub mod system_file;
pub mod traits;
