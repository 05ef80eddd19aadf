//! Audit pipeline orchestration module
//!
//! Implements the linear audit flow:
//! 1. Detect: manifest inspection
//! 2. Collect: code scan, build output, chunking, compression
//! 3. Score: recommendation rules and score
//!
//! Rendering and persistence live in [`crate::report`].

pub mod context;
pub mod error;
pub mod executor;
pub mod observer;

pub use context::{AnalysisContext, PhaseTiming, Section};
pub use error::PipelineError;
pub use executor::{AuditOutcome, AuditPipeline, PipelineOptions};
pub use observer::{NoOpObserver, Phase, PhaseObserver, RecordingObserver};
