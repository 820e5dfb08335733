use molsim::engine::config::SimulationConfig;

/// Fallback values for settings that neither the CLI nor the config file provide.
pub struct DefaultsConfig {
    pub steps: u64,
    pub time_step: f64,
    pub report_interval: u64,
    pub neighbor_list_interval: u64,
    pub cutoff: f64,
    pub skin: f64,
    /// Margin added around the atoms when the system has no container.
    pub container_margin: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            time_step: SimulationConfig::DEFAULT_TIME_STEP,
            report_interval: SimulationConfig::DEFAULT_REPORT_INTERVAL,
            neighbor_list_interval: SimulationConfig::DEFAULT_NEIGHBOR_LIST_INTERVAL,
            cutoff: SimulationConfig::DEFAULT_CUTOFF,
            skin: SimulationConfig::DEFAULT_SKIN,
            container_margin: 10.0,
        }
    }
}
