use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::params::{ParamLoadError, UnknownElementError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Parameter loading failed: {source}")]
    Params {
        #[from]
        source: ParamLoadError,
    },

    #[error("Parameterization failed: {source}")]
    UnknownElement {
        #[from]
        source: UnknownElementError,
    },

    #[error("Degenerate topology: {0}")]
    DegenerateTopology(String),

    #[error("Simulation diverged at step {step}: {reason}")]
    Divergence { step: u64, reason: String },
}
