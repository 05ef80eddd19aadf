//! Terminal spinner driven by pipeline phase notifications

use crate::pipeline::{Phase, PhaseObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner that shows the running audit phase
///
/// Draws to stderr, so stdout stays clean for `--json`.
///
/// # Examples
///
/// ```no_run
/// use perf_audit::cmd::progress::PhaseSpinner;
/// use perf_audit::config::ConfigFile;
/// use perf_audit::pipeline::{AuditPipeline, PipelineOptions};
///
/// let spinner = PhaseSpinner::new(false);
/// let outcome = AuditPipeline::new(".", ConfigFile::default(), PipelineOptions::default())
///     .run(&spinner)?;
/// spinner.finish();
/// # Ok::<(), perf_audit::pipeline::PipelineError>(())
/// ```
pub struct PhaseSpinner {
    pb: ProgressBar,
}

impl PhaseSpinner {
    /// Create a spinner, drawing nothing when `hidden` is set
    pub fn new(hidden: bool) -> Self {
        if hidden {
            return Self {
                pb: ProgressBar::hidden(),
            };
        }

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒", "●"]);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Clear the spinner line
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }

    /// Whether the spinner draws anything
    pub fn is_hidden(&self) -> bool {
        self.pb.is_hidden()
    }
}

impl PhaseObserver for PhaseSpinner {
    fn phase_started(&self, phase: Phase) {
        self.pb.set_message(phase.message());
    }

    fn phase_finished(&self, phase: Phase, elapsed: Duration) {
        log::debug!("{} took {:?}", phase, elapsed);
    }
}
