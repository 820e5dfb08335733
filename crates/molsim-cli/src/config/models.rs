use molsim::engine::config::SimulationConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub steps: u64,
    /// Velocities are redrawn at this temperature; input velocities are kept when unset.
    pub temperature: Option<f64>,
    pub seed: Option<u64>,
    pub forcefield_path: Option<PathBuf>,
    pub simulation: SimulationConfig,
}
