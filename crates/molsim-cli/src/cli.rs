use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "molsim contributors",
    version,
    about = "molsim CLI - Molecular dynamics with bonded and non-bonded force fields, neighbor lists and box boundaries.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel force evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Integrate the equations of motion of a molecular system.
    Run(RunArgs),
    /// Print the single-point energy breakdown of a molecular system.
    Energy(EnergyArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to the input system file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the simulation configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path for the final system file. Nothing is written if omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write reported energies as CSV to this path.
    #[arg(long, value_name = "PATH")]
    pub energies: Option<PathBuf>,

    // --- Integrator Overrides ---
    /// Override the number of integration steps.
    #[arg(short = 'n', long, value_name = "INT")]
    pub steps: Option<u64>,

    /// Override the integration time step.
    #[arg(long, value_name = "FLOAT")]
    pub time_step: Option<f64>,

    /// Draw initial velocities at this temperature (k_B T, energy units).
    #[arg(long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Seed for the velocity generator.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Path to a force-field parameter file (TOML).
    #[arg(long, value_name = "PATH")]
    pub forcefield: Option<PathBuf>,

    // --- Generic Override ---
    /// Set a configuration value, overriding the file (e.g., -S neighbor-list.skin=1.5)
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `energy` subcommand.
#[derive(Args, Debug, Clone)]
pub struct EnergyArgs {
    /// Path to the input system file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a force-field parameter file (TOML).
    #[arg(long, value_name = "PATH")]
    pub forcefield: Option<PathBuf>,

    /// Non-bonded cutoff distance.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,
}
