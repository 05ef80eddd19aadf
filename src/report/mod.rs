//! Audit report model, renderers and persistence
//!
//! [`AuditReport`] is the complete result of a run. It renders as console
//! text, pretty JSON or a self-contained HTML page, and [`ReportWriter`]
//! persists the JSON and HTML forms.

pub mod console;
pub mod html;
pub mod json;
pub mod writer;

pub use writer::{ReportWriter, HTML_REPORT_FILE, JSON_REPORT_FILE};

use crate::analyzer::build_output::BuildReport;
use crate::analyzer::chunking::ChunkingReport;
use crate::analyzer::compression::CompressionReport;
use crate::analyzer::manifest::ManifestReport;
use crate::analyzer::patterns::CodeScanReport;
use crate::analyzer::recommendations::Recommendation;
use crate::analyzer::walker::serialize_lossy_path;
use crate::pipeline::{AuditOutcome, PhaseTiming, Section};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Tool name recorded in reports
pub const TOOL_NAME: &str = "perf-audit";

/// Errors rendering or persisting a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON serialization failed
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A report file could not be written
    #[error("Failed to write report to {path}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Styled terminal text
    Console,
    /// Pretty-printed JSON
    Json,
    /// Self-contained HTML page
    Html,
}

/// Presentation options shared by the console and HTML renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Number of recommendations shown
    pub top: usize,
    /// ASCII markers instead of emoji
    pub plain: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            top: 10,
            plain: false,
        }
    }
}

/// Complete result of an audit run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Tool name
    pub tool: String,
    /// Tool version
    pub version: String,
    /// Generation time (RFC 3339)
    pub generated_at: DateTime<Utc>,
    /// Audited project root
    #[serde(serialize_with = "serialize_lossy_path")]
    pub project_root: PathBuf,
    /// Package name, or the root directory name
    pub project_name: String,
    /// Score in [0, 100]
    pub score: u8,
    /// Manifest section
    pub manifest: Section<ManifestReport>,
    /// Code scan section
    pub code: Section<CodeScanReport>,
    /// Build output section
    pub build: Section<BuildReport>,
    /// Chunking section
    pub chunking: Section<ChunkingReport>,
    /// Compression section
    pub compression: Section<CompressionReport>,
    /// Recommendations in rule order
    pub recommendations: Vec<Recommendation>,
    /// Warnings in the order they occurred
    pub warnings: Vec<String>,
    /// Phase durations
    pub phases: Vec<PhaseTiming>,
}

impl AuditReport {
    /// Build a report stamped with the current time
    pub fn from_outcome(outcome: &AuditOutcome) -> Self {
        Self::from_outcome_at(outcome, Utc::now())
    }

    /// Build a report with an explicit timestamp
    pub fn from_outcome_at(outcome: &AuditOutcome, generated_at: DateTime<Utc>) -> Self {
        let ctx = &outcome.context;
        let project_root = ctx.project_root().to_path_buf();
        let project_name = ctx
            .manifest()
            .and_then(|m| m.name.clone())
            .or_else(|| {
                project_root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| project_root.display().to_string());

        Self {
            tool: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at,
            project_root,
            project_name,
            score: outcome.score,
            manifest: ctx.manifest_section(),
            code: ctx.code_section(),
            build: ctx.build_section(),
            chunking: ctx.chunking_section(),
            compression: ctx.compression_section(),
            recommendations: outcome.recommendations.clone(),
            warnings: ctx.warnings().to_vec(),
            phases: ctx.phases().to_vec(),
        }
    }
}

/// Render a report in the requested format
///
/// # Examples
///
/// ```no_run
/// use perf_audit::config::ConfigFile;
/// use perf_audit::pipeline::{AuditPipeline, NoOpObserver, PipelineOptions};
/// use perf_audit::report::{render, AuditReport, RenderOptions, ReportFormat};
///
/// let outcome = AuditPipeline::new(".", ConfigFile::default(), PipelineOptions::default())
///     .run(&NoOpObserver)?;
/// let report = AuditReport::from_outcome(&outcome);
/// println!("{}", render(&report, ReportFormat::Console, &RenderOptions::default())?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render(
    report: &AuditReport,
    format: ReportFormat,
    options: &RenderOptions,
) -> Result<String, ReportError> {
    match format {
        ReportFormat::Console => Ok(console::render_console(report, options)),
        ReportFormat::Json => Ok(json::to_json(report)?),
        ReportFormat::Html => Ok(html::render_html(report, options)),
    }
}
