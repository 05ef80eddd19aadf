//! Command handlers for perf-audit CLI
//!
//! This module contains all command implementations, organized by functionality.
//! Each submodule handles a specific CLI command.

pub mod audit;
pub mod completions;
pub mod progress;

// Re-export command functions for convenient access
pub use audit::{cmd_audit, AuditArgs};
pub use completions::cmd_completions;
pub use progress::PhaseSpinner;
