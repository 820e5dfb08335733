use nalgebra::Vector3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: format!("must be a finite positive number, got {value}"),
        })
    }
}

/// Axis-aligned box centered at the origin that particles bounce off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MolecularContainer {
    lx: f64,
    ly: f64,
    lz: f64,
}

impl MolecularContainer {
    pub fn new(lx: f64, ly: f64, lz: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            lx: require_positive("container.lx", lx)?,
            ly: require_positive("container.ly", ly)?,
            lz: require_positive("container.lz", lz)?,
        })
    }

    pub fn lengths(&self) -> Vector3<f64> {
        Vector3::new(self.lx, self.ly, self.lz)
    }

    /// `(lx/2, ly/2, lz/2)`: the walls sit at `±half_extent` on each axis.
    pub fn half_extents(&self) -> Vector3<f64> {
        self.lengths() * 0.5
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub time_step: f64,
    pub neighbor_list_interval: u64,
    pub report_interval: u64,
    pub cutoff: f64,
    pub skin: f64,
    /// Per-atom kinetic energy above which a step is reported as diverged.
    pub max_kinetic_energy: Option<f64>,
    pub container: MolecularContainer,
}

impl SimulationConfig {
    pub const DEFAULT_TIME_STEP: f64 = 0.05;
    pub const DEFAULT_NEIGHBOR_LIST_INTERVAL: u64 = 10;
    pub const DEFAULT_REPORT_INTERVAL: u64 = 10;
    pub const DEFAULT_CUTOFF: f64 = 8.0;
    pub const DEFAULT_SKIN: f64 = 1.0;

    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    time_step: Option<f64>,
    neighbor_list_interval: Option<u64>,
    report_interval: Option<u64>,
    cutoff: Option<f64>,
    skin: Option<f64>,
    max_kinetic_energy: Option<f64>,
    container: Option<MolecularContainer>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_step(mut self, dt: f64) -> Self {
        self.time_step = Some(dt);
        self
    }
    pub fn neighbor_list_interval(mut self, steps: u64) -> Self {
        self.neighbor_list_interval = Some(steps);
        self
    }
    pub fn report_interval(mut self, steps: u64) -> Self {
        self.report_interval = Some(steps);
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn skin(mut self, skin: f64) -> Self {
        self.skin = Some(skin);
        self
    }
    pub fn max_kinetic_energy(mut self, limit: f64) -> Self {
        self.max_kinetic_energy = Some(limit);
        self
    }
    pub fn container(mut self, container: MolecularContainer) -> Self {
        self.container = Some(container);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let time_step = require_positive(
            "time_step",
            self.time_step.unwrap_or(SimulationConfig::DEFAULT_TIME_STEP),
        )?;
        let cutoff = require_positive(
            "cutoff",
            self.cutoff.unwrap_or(SimulationConfig::DEFAULT_CUTOFF),
        )?;
        let skin = self.skin.unwrap_or(SimulationConfig::DEFAULT_SKIN);
        if !skin.is_finite() || skin < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "skin",
                reason: format!("must be a finite non-negative number, got {skin}"),
            });
        }
        let neighbor_list_interval = self
            .neighbor_list_interval
            .unwrap_or(SimulationConfig::DEFAULT_NEIGHBOR_LIST_INTERVAL);
        if neighbor_list_interval == 0 {
            return Err(ConfigError::InvalidValue {
                name: "neighbor_list_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        let max_kinetic_energy = self
            .max_kinetic_energy
            .map(|limit| require_positive("max_kinetic_energy", limit))
            .transpose()?;

        Ok(SimulationConfig {
            time_step,
            neighbor_list_interval,
            report_interval: self
                .report_interval
                .unwrap_or(SimulationConfig::DEFAULT_REPORT_INTERVAL),
            cutoff,
            skin,
            max_kinetic_energy,
            container: self
                .container
                .ok_or(ConfigError::MissingParameter("container"))?,
        })
    }
}
