use espsurf::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow [`Progress`] events as a single stderr spinner/bar and keeps every
/// [`Progress::Message`] so the command can summarize them once the surface is written.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
    notices: Arc<Mutex<Vec<String>>>,
}

impl CliProgressHandler {
    /// Creates a handler drawing to stderr, or drawing nothing when `visible` is false.
    /// Notices are recorded either way.
    pub fn new(visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        bar.finish_and_clear();

        Self {
            bar: Arc::new(Mutex::new(bar)),
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Messages the workflow reported so far, in arrival order.
    pub fn notices(&self) -> Vec<String> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);
        let notices = Arc::clone(&self.notices);

        Box::new(move |progress: Progress| {
            if let Progress::Message(message) = &progress {
                if let Ok(mut notices) = notices.lock() {
                    notices.push(message.clone());
                }
            }

            let Ok(bar) = bar.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            Self::apply(&bar, progress);
        })
    }

    fn apply(bar: &ProgressBar, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                bar.reset();
                bar.set_length(0);
                bar.set_style(Self::spinner_style());
                bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                bar.set_message(name);
            }
            Progress::PhaseFinish => {
                bar.disable_steady_tick();
                let phase = bar.message();
                bar.finish_with_message(format!("✓ {}", phase));
            }
            // Slabs and smoothing sweeps are counted on the same bar as the phase spinner.
            Progress::TaskStart { total_steps } => {
                bar.disable_steady_tick();
                bar.reset();
                bar.set_length(total_steps);
                bar.set_position(0);
                bar.set_style(Self::bar_style());
            }
            Progress::TaskIncrement => bar.inc(1),
            Progress::TaskFinish => {
                let length = bar.length().unwrap_or(0);
                if bar.position() < length {
                    bar.set_position(length);
                }
            }
            Progress::Message(message) => bar.println(format!("  ⚠ {}", message)),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new(true)
    }
}
