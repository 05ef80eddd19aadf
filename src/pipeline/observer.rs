//! Phase progress notifications
//!
//! The pipeline reports phase boundaries to a [`PhaseObserver`] so front ends
//! can drive spinners or collect timings without the pipeline printing
//! anything itself.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

/// Audit phases in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Manifest inspection
    Manifest,
    /// Project walk and code pattern scan
    CodeScan,
    /// Build output inspection
    BuildOutput,
    /// Chunking analysis
    Chunking,
    /// Compression inspection
    Compression,
    /// Recommendation rules and score
    Recommendations,
}

impl Phase {
    /// Stable name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::CodeScan => "code-scan",
            Self::BuildOutput => "build-output",
            Self::Chunking => "chunking",
            Self::Compression => "compression",
            Self::Recommendations => "recommendations",
        }
    }

    /// Progress message shown while the phase runs
    pub fn message(&self) -> &'static str {
        match self {
            Self::Manifest => "Inspecting package.json...",
            Self::CodeScan => "Scanning source files...",
            Self::BuildOutput => "Measuring build output...",
            Self::Chunking => "Checking code splitting...",
            Self::Compression => "Checking compression...",
            Self::Recommendations => "Generating recommendations...",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives phase boundaries
pub trait PhaseObserver {
    /// A phase is about to run
    fn phase_started(&self, phase: Phase);

    /// A phase finished after `elapsed`
    fn phase_finished(&self, phase: Phase, elapsed: Duration) {
        let _ = (phase, elapsed);
    }
}

/// Observer that ignores every notification
pub struct NoOpObserver;

impl PhaseObserver for NoOpObserver {
    fn phase_started(&self, _phase: Phase) {}
}

/// In-memory observer for testing
#[derive(Default)]
pub struct RecordingObserver {
    started: Mutex<Vec<Phase>>,
    finished: Mutex<Vec<Phase>>,
}

impl RecordingObserver {
    /// Phases started, in order
    pub fn started(&self) -> Vec<Phase> {
        self.started.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Phases finished, in order
    pub fn finished(&self) -> Vec<Phase> {
        self.finished.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl PhaseObserver for RecordingObserver {
    fn phase_started(&self, phase: Phase) {
        if let Ok(mut started) = self.started.lock() {
            started.push(phase);
        }
    }

    fn phase_finished(&self, phase: Phase, _elapsed: Duration) {
        if let Ok(mut finished) = self.finished.lock() {
            finished.push(phase);
        }
    }
}
