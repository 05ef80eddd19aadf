#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! perf-audit library
//!
//! This library provides static performance analysis for web projects:
//! manifest inspection, source pattern scanning, build output measurement,
//! recommendations and report rendering. It can be used programmatically in
//! addition to the CLI interface.
//!
//! # Basic Example
//!
//! Creating and validating configuration:
//!
//! ```
//! use perf_audit::config::ConfigFile;
//!
//! let config = ConfigFile {
//!     large_file_kb: 64,
//!     top_recommendations: 5,
//!     ..ConfigFile::default()
//! };
//! assert!(config.validate().is_ok());
//!
//! // Oversized files cannot be larger than split candidates
//! let inverted = ConfigFile {
//!     oversized_file_kb: 900,
//!     split_candidate_kb: 100,
//!     ..ConfigFile::default()
//! };
//! assert!(inverted.validate().is_err());
//! ```
//!
//! # Advanced Example: Auditing a Project
//!
//! Running every phase and rendering the result:
//!
//! ```
//! use perf_audit::config::ConfigFile;
//! use perf_audit::pipeline::{AuditPipeline, NoOpObserver, PipelineOptions};
//! use perf_audit::report::{render, AuditReport, RenderOptions, ReportFormat};
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let project = TempDir::new().unwrap();
//! fs::write(
//!     project.path().join("package.json"),
//!     r#"{"dependencies": {"react": "18.2.0", "moment": "2.30.0"}}"#,
//! )
//! .unwrap();
//! fs::create_dir_all(project.path().join("dist")).unwrap();
//! fs::write(project.path().join("dist/main.js"), "console.log(1)").unwrap();
//!
//! let outcome = AuditPipeline::new(project.path(), ConfigFile::default(), PipelineOptions::default())
//!     .run(&NoOpObserver)
//!     .unwrap();
//! assert!(outcome.score < 100);
//!
//! let report = AuditReport::from_outcome(&outcome);
//! let text = render(&report, ReportFormat::Console, &RenderOptions::default()).unwrap();
//! assert!(text.contains("Recommendations"));
//! ```

/// Project analyzers and recommendation rules
pub mod analyzer;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file loading and validation
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Audit pipeline orchestration
pub mod pipeline;
/// Report model, renderers and persistence
pub mod report;
