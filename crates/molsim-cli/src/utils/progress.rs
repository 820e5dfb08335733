use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use molsim::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

const BAR_TEMPLATE: &str =
    "{prefix:<10} [{bar:40.cyan/blue}] {pos}/{len} steps ({per_sec}, {eta}) {msg}";

struct BarState {
    pb: ProgressBar,
    /// Total energy of the first report of the current run, the drift reference.
    reference_total: Option<f64>,
}

impl BarState {
    fn energy_message(&mut self, total: f64) -> String {
        let reference = *self.reference_total.get_or_insert(total);
        format!("E = {:.5}  dE = {:+.2e}", total, total - reference)
    }
}

/// Step counter for a dynamics run, annotated with the latest reported
/// total energy and its drift since the first report.
#[derive(Clone)]
pub struct DynamicsProgressBar {
    state: Arc<Mutex<BarState>>,
}

impl DynamicsProgressBar {
    pub fn new() -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        pb.set_style(Self::bar_style());
        Self {
            state: Arc::new(Mutex::new(BarState {
                pb,
                reference_total: None,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    state.pb.set_prefix(name);
                }
                Progress::TaskStart { total_steps } => {
                    state.reference_total = None;
                    state.pb.reset();
                    state.pb.set_length(total_steps);
                    state.pb.set_message("");
                }
                Progress::TaskIncrement => state.pb.inc(1),
                Progress::Energy(snapshot) => {
                    let message = state.energy_message(snapshot.total);
                    state.pb.set_message(message);
                }
                Progress::TaskFinish => {
                    if let Some(len) = state.pb.length() {
                        state.pb.set_position(len);
                    }
                }
                Progress::PhaseFinish => state.pb.finish(),
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for DynamicsProgressBar {
    fn default() -> Self {
        Self::new()
    }
}
