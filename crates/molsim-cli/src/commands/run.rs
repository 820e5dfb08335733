use super::{container_from_metadata, load_forcefield, load_system};
use crate::cli::RunArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::DynamicsProgressBar;
use molsim::{
    core::io::{
        energy_log::{EnergyLog, EnergyLogError},
        system_file::{ContainerRecord, SystemFile},
        traits::MolecularFile,
    },
    core::models::energy::EnergySnapshot,
    engine::progress::{Progress, ProgressReporter},
    workflows::simulate::Simulation,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::sync::Mutex;
use tracing::{info, warn};

/// Forwards energy reports to an optional CSV log, remembering the first
/// write failure so it can be surfaced after the run.
struct EnergyRecorder {
    log: Option<Mutex<EnergyLog<File>>>,
    failure: Mutex<Option<EnergyLogError>>,
}

impl EnergyRecorder {
    fn new(log: Option<EnergyLog<File>>) -> Self {
        Self {
            log: log.map(Mutex::new),
            failure: Mutex::new(None),
        }
    }

    fn record(&self, snapshot: &EnergySnapshot) {
        let Some(log) = &self.log else {
            return;
        };
        let Ok(mut log) = log.lock() else {
            warn!("Energy log mutex was poisoned. Dropping report.");
            return;
        };
        if let Err(e) = log.record(snapshot) {
            warn!("Failed to write energy report for step {}: {}", snapshot.step, e);
            if let Ok(mut failure) = self.failure.lock() {
                failure.get_or_insert(e);
            }
        }
    }

    /// Flushes the log and returns the number of rows written.
    fn finish(self) -> Result<usize> {
        if let Ok(Some(e)) = self.failure.into_inner() {
            return Err(e.into());
        }
        let Some(log) = self.log else {
            return Ok(0);
        };
        let mut log = log
            .into_inner()
            .map_err(|_| CliError::Other(anyhow::anyhow!("Energy log mutex was poisoned")))?;
        log.flush()?;
        Ok(log.rows())
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let (mut system, mut metadata) = load_system(&args.input)?;

    info!("Merging configuration from file and CLI arguments...");
    let app = config::build_config(&args, container_from_metadata(&metadata)?)?;
    let forcefield = load_forcefield(app.forcefield_path.as_deref())?;

    let mut simulation = Simulation::build(&system, &forcefield, &app.simulation)?;
    if let Some(temperature) = app.temperature {
        let mut rng = match app.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        simulation.thermalize(temperature, &mut rng)?;
    }

    let energy_log = args
        .energies
        .as_deref()
        .map(EnergyLog::create)
        .transpose()?;
    let recorder = EnergyRecorder::new(energy_log);

    println!(
        "Starting molecular dynamics: {} atoms, {} steps...",
        system.atom_count(),
        app.steps
    );

    let final_energies = {
        let progress_bar = DynamicsProgressBar::new();
        let progress_callback = progress_bar.get_callback();
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            if let Progress::Energy(snapshot) = &event {
                recorder.record(snapshot);
            }
            progress_callback(event);
        }));
        simulation.run(app.steps, &reporter)?
    };

    let rows = recorder.finish()?;
    if let Some(path) = &args.energies {
        info!("Wrote {} energy report(s) to {:?}", rows, path);
        println!("Energy log ({} rows) written to: {}", rows, path.display());
    }

    println!(
        "✓ Step {}: kinetic {:.6}, potential {:.6}, total {:.6} (per atom)",
        final_energies.step, final_energies.kinetic, final_energies.potential, final_energies.total
    );

    if let Some(output) = &args.output {
        simulation.sync_positions(&mut system);
        let lengths = app.simulation.container.lengths();
        metadata.container = Some(ContainerRecord {
            lx: lengths.x,
            ly: lengths.y,
            lz: lengths.z,
        });
        info!("Writing final system to {:?}", output);
        SystemFile::write_to_path(&system, &metadata, output).map_err(|e| {
            CliError::FileParsing {
                path: output.clone(),
                source: e.into(),
            }
        })?;
        println!("Final system written to: {}", output.display());
    }

    Ok(())
}
