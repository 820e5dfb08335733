use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileIntegratorConfig {
    #[serde(rename = "time-step")]
    pub time_step: Option<f64>,
    pub steps: Option<u64>,
    pub temperature: Option<f64>,
    pub seed: Option<u64>,
    #[serde(rename = "report-interval")]
    pub report_interval: Option<u64>,
    #[serde(rename = "max-kinetic-energy")]
    pub max_kinetic_energy: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileNeighborListConfig {
    pub interval: Option<u64>,
    pub cutoff: Option<f64>,
    pub skin: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileContainerConfig {
    pub lx: Option<f64>,
    pub ly: Option<f64>,
    pub lz: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileForcefieldConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub integrator: Option<FileIntegratorConfig>,
    #[serde(rename = "neighbor-list")]
    pub neighbor_list: Option<FileNeighborListConfig>,
    pub container: Option<FileContainerConfig>,
    pub forcefield: Option<FileForcefieldConfig>,
}

impl FileConfig {
    /// Loads a config file. A relative force-field path is resolved against
    /// the directory containing the config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        if let (Some(ff_path), Some(base)) = (
            config.forcefield.as_mut().and_then(|ff| ff.path.as_mut()),
            path.parent(),
        ) {
            if ff_path.is_relative() {
                *ff_path = base.join(&*ff_path);
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_all_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [integrator]
            time-step = 0.01
            steps = 200
            temperature = 1.5
            seed = 9
            report-interval = 5
            max-kinetic-energy = 1e4

            [neighbor-list]
            interval = 20
            cutoff = 6.0
            skin = 0.8

            [container]
            lx = 30.0
            ly = 40.0
            lz = 50.0

            [forcefield]
            path = "params/ff.toml"
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let integrator = config.integrator.unwrap();
        assert_eq!(integrator.time_step, Some(0.01));
        assert_eq!(integrator.steps, Some(200));
        assert_eq!(integrator.seed, Some(9));
        assert_eq!(integrator.max_kinetic_energy, Some(1e4));
        assert_eq!(config.neighbor_list.unwrap().interval, Some(20));
        assert_eq!(config.container.unwrap().ly, Some(40.0));
        assert_eq!(
            config.forcefield.unwrap().path,
            Some(dir.path().join("params/ff.toml"))
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[integrator]\ntimestep = 0.1\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
