use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileContainerConfig};
use super::models::AppConfig;
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use molsim::engine::config::{MolecularContainer, SimulationConfig};
use std::str::FromStr;

/// Merges, in increasing priority, built-in defaults, the config file,
/// `--set` overrides and dedicated CLI flags.
///
/// `fallback_container`, typically the one stored in the input system file,
/// is used when no container is configured and fills any axis a partial
/// `[container]` section or `--set container.*` override leaves out.
pub fn build_config(
    args: &RunArgs,
    fallback_container: Option<MolecularContainer>,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let integrator = file_config.integrator.take().unwrap_or_default();
    let neighbor_list = file_config.neighbor_list.take().unwrap_or_default();
    let forcefield = file_config.forcefield.take().unwrap_or_default();

    let container = match file_config.container.take() {
        Some(partial) => merge_container(partial, fallback_container)?,
        None => fallback_container.ok_or_else(|| {
            CliError::Config(
                "No container given. Add a `[container]` section to the config or system file."
                    .to_string(),
            )
        })?,
    };

    let mut builder = SimulationConfig::builder()
        .time_step(
            args.time_step
                .or(integrator.time_step)
                .unwrap_or(defaults.time_step),
        )
        .report_interval(integrator.report_interval.unwrap_or(defaults.report_interval))
        .neighbor_list_interval(
            neighbor_list
                .interval
                .unwrap_or(defaults.neighbor_list_interval),
        )
        .cutoff(neighbor_list.cutoff.unwrap_or(defaults.cutoff))
        .skin(neighbor_list.skin.unwrap_or(defaults.skin))
        .container(container);
    if let Some(limit) = integrator.max_kinetic_energy {
        builder = builder.max_kinetic_energy(limit);
    }
    let simulation = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let temperature = args.temperature.or(integrator.temperature);
    if let Some(t) = temperature {
        if !t.is_finite() || t < 0.0 {
            return Err(CliError::Config(format!(
                "Temperature must be a finite non-negative number, got {}",
                t
            )));
        }
    }

    Ok(AppConfig {
        steps: args.steps.or(integrator.steps).unwrap_or(defaults.steps),
        temperature,
        seed: args.seed.or(integrator.seed),
        forcefield_path: args.forcefield.clone().or(forcefield.path),
        simulation,
    })
}

/// Axes missing from `partial` are taken from `fallback`.
fn merge_container(
    partial: FileContainerConfig,
    fallback: Option<MolecularContainer>,
) -> Result<MolecularContainer> {
    let fallback = fallback.map(|container| container.lengths());
    let require = |value: Option<f64>, fallback: Option<f64>, axis: &str| {
        value.or(fallback).ok_or_else(|| {
            CliError::Config(format!(
                "`container` requires `{}` (no fallback container to take it from)",
                axis
            ))
        })
    };
    MolecularContainer::new(
        require(partial.lx, fallback.map(|l| l.x), "lx")?,
        require(partial.ly, fallback.map(|l| l.y), "ly")?,
        require(partial.lz, fallback.map(|l| l.z), "lz")?,
    )
    .map_err(|e| CliError::Config(e.to_string()))
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "integrator.time-step" => {
                let value = parse_value(key, value_str, "float")?;
                config.integrator.get_or_insert_with(Default::default).time_step = Some(value);
            }
            "integrator.steps" => {
                let value = parse_value(key, value_str, "integer")?;
                config.integrator.get_or_insert_with(Default::default).steps = Some(value);
            }
            "integrator.temperature" => {
                let value = parse_value(key, value_str, "float")?;
                config.integrator.get_or_insert_with(Default::default).temperature = Some(value);
            }
            "integrator.seed" => {
                let value = parse_value(key, value_str, "integer")?;
                config.integrator.get_or_insert_with(Default::default).seed = Some(value);
            }
            "integrator.report-interval" => {
                let value = parse_value(key, value_str, "integer")?;
                config
                    .integrator
                    .get_or_insert_with(Default::default)
                    .report_interval = Some(value);
            }
            "integrator.max-kinetic-energy" => {
                let value = parse_value(key, value_str, "float")?;
                config
                    .integrator
                    .get_or_insert_with(Default::default)
                    .max_kinetic_energy = Some(value);
            }
            "neighbor-list.interval" => {
                let value = parse_value(key, value_str, "integer")?;
                config.neighbor_list.get_or_insert_with(Default::default).interval = Some(value);
            }
            "neighbor-list.cutoff" => {
                let value = parse_value(key, value_str, "float")?;
                config.neighbor_list.get_or_insert_with(Default::default).cutoff = Some(value);
            }
            "neighbor-list.skin" => {
                let value = parse_value(key, value_str, "float")?;
                config.neighbor_list.get_or_insert_with(Default::default).skin = Some(value);
            }
            "container.lx" => {
                let value = parse_value(key, value_str, "float")?;
                config.container.get_or_insert_with(Default::default).lx = Some(value);
            }
            "container.ly" => {
                let value = parse_value(key, value_str, "float")?;
                config.container.get_or_insert_with(Default::default).ly = Some(value);
            }
            "container.lz" => {
                let value = parse_value(key, value_str, "float")?;
                config.container.get_or_insert_with(Default::default).lz = Some(value);
            }
            "forcefield.path" => {
                config.forcefield.get_or_insert_with(Default::default).path =
                    Some(value_str.into());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn base_run_args() -> RunArgs {
        RunArgs {
            input: PathBuf::from("in.toml"),
            config: None,
            output: None,
            energies: None,
            steps: None,
            time_step: None,
            temperature: None,
            seed: None,
            forcefield: None,
            set_values: vec![],
        }
    }

    fn cube(side: f64) -> MolecularContainer {
        MolecularContainer::new(side, side, side).unwrap()
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        let app = build_config(&base_run_args(), Some(cube(20.0))).unwrap();
        let defaults = DefaultsConfig::default();

        assert_eq!(app.steps, defaults.steps);
        assert_eq!(app.simulation.time_step, defaults.time_step);
        assert_eq!(app.simulation.neighbor_list_interval, defaults.neighbor_list_interval);
        assert_eq!(app.simulation.cutoff, defaults.cutoff);
        assert_eq!(app.simulation.skin, defaults.skin);
        assert_eq!(app.simulation.container, cube(20.0));
        assert!(app.temperature.is_none());
        assert!(app.seed.is_none());
        assert!(app.forcefield_path.is_none());
    }

    #[test]
    fn file_values_are_merged() {
        let dir = tempdir().unwrap();
        let mut args = base_run_args();
        args.config = Some(write_config(
            dir.path(),
            r#"
            [integrator]
            time-step = 0.02
            steps = 300
            temperature = 0.8
            report-interval = 25

            [neighbor-list]
            interval = 5
            cutoff = 4.0
            skin = 0.5

            [container]
            lx = 10.0
            ly = 11.0
            lz = 12.0
            "#,
        ));

        let app = build_config(&args, Some(cube(99.0))).unwrap();
        assert_eq!(app.steps, 300);
        assert_eq!(app.temperature, Some(0.8));
        assert_eq!(app.simulation.time_step, 0.02);
        assert_eq!(app.simulation.report_interval, 25);
        assert_eq!(app.simulation.neighbor_list_interval, 5);
        assert_eq!(app.simulation.cutoff, 4.0);
        assert_eq!(app.simulation.skin, 0.5);
        assert_eq!(
            app.simulation.container,
            MolecularContainer::new(10.0, 11.0, 12.0).unwrap()
        );
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let dir = tempdir().unwrap();
        let mut args = base_run_args();
        args.config = Some(write_config(
            dir.path(),
            "[integrator]\ntime-step = 0.02\nsteps = 300\n",
        ));
        args.set_values = vec![
            "integrator.time-step=0.03".to_string(),
            "integrator.steps=400".to_string(),
            "neighbor-list.skin=1.5".to_string(),
        ];
        args.time_step = Some(0.04);

        let app = build_config(&args, Some(cube(20.0))).unwrap();
        assert_eq!(app.simulation.time_step, 0.04);
        assert_eq!(app.steps, 400);
        assert_eq!(app.simulation.skin, 1.5);
    }

    #[test]
    fn set_values_can_describe_the_container() {
        let mut args = base_run_args();
        args.set_values = vec![
            "container.lx=5".to_string(),
            "container.ly=6".to_string(),
            "container.lz=7".to_string(),
        ];
        let app = build_config(&args, None).unwrap();
        assert_eq!(
            app.simulation.container,
            MolecularContainer::new(5.0, 6.0, 7.0).unwrap()
        );
    }

    #[test]
    fn missing_container_is_an_error() {
        let result = build_config(&base_run_args(), None);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("container")));
    }

    #[test]
    fn partial_container_fills_missing_axes_from_fallback() {
        let mut args = base_run_args();
        args.set_values = vec!["container.lx=30".to_string()];
        let app = build_config(&args, Some(cube(20.0))).unwrap();
        assert_eq!(
            app.simulation.container,
            MolecularContainer::new(30.0, 20.0, 20.0).unwrap()
        );
    }

    #[test]
    fn partial_container_without_fallback_is_an_error() {
        let mut args = base_run_args();
        args.set_values = vec!["container.lx=5".to_string(), "container.lz=5".to_string()];
        let result = build_config(&args, None);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("`ly`")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut args = base_run_args();
        args.set_values = vec!["integrator.time-step=fast".to_string()];
        assert!(matches!(
            build_config(&args, Some(cube(20.0))),
            Err(CliError::Config(msg)) if msg.contains("float")
        ));

        let mut args = base_run_args();
        args.set_values = vec!["integrator.time-step".to_string()];
        assert!(build_config(&args, Some(cube(20.0))).is_err());

        let mut args = base_run_args();
        args.set_values = vec!["integrator.friction=1".to_string()];
        assert!(build_config(&args, Some(cube(20.0))).is_err());

        let mut args = base_run_args();
        args.time_step = Some(-1.0);
        assert!(build_config(&args, Some(cube(20.0))).is_err());

        let mut args = base_run_args();
        args.temperature = Some(-3.0);
        assert!(build_config(&args, Some(cube(20.0))).is_err());
    }
}
