//! Analysis context threaded through the audit phases

use crate::analyzer::build_output::BuildReport;
use crate::analyzer::chunking::ChunkingReport;
use crate::analyzer::compression::CompressionReport;
use crate::analyzer::manifest::ManifestReport;
use crate::analyzer::patterns::CodeScanReport;
use crate::config::ConfigFile;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Outcome of one analysis component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "kebab-case")]
pub enum Section<T> {
    /// The component produced results
    Available(T),
    /// The component ran but had nothing usable to report
    Unavailable {
        /// Why the section is missing
        reason: String,
    },
    /// The component was excluded by a command-line flag
    Skipped,
}

impl<T> Section<T> {
    /// Create an unavailable section
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Results, if available
    pub fn available(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            _ => None,
        }
    }

    /// Whether results are available
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Wall-clock duration of one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTiming {
    /// Phase name
    pub phase: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Shared state of one audit run
///
/// Each section slot is written once by the phase that owns it.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    project_root: PathBuf,
    config: ConfigFile,
    manifest: Option<Section<ManifestReport>>,
    code: Option<Section<CodeScanReport>>,
    build: Option<Section<BuildReport>>,
    chunking: Option<Section<ChunkingReport>>,
    compression: Option<Section<CompressionReport>>,
    warnings: Vec<String>,
    phases: Vec<PhaseTiming>,
}

fn fill<T>(slot: &mut Option<Section<T>>, name: &str, section: Section<T>) -> bool {
    if slot.is_some() {
        warn!("Section '{}' already recorded, keeping the first result", name);
        return false;
    }
    *slot = Some(section);
    true
}

fn available<T>(slot: &Option<Section<T>>) -> Option<&T> {
    slot.as_ref().and_then(Section::available)
}

fn settled<T: Clone>(slot: &Option<Section<T>>) -> Section<T> {
    slot.clone().unwrap_or(Section::Skipped)
}

impl AnalysisContext {
    /// Create an empty context
    pub fn new(project_root: impl Into<PathBuf>, config: ConfigFile) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            manifest: None,
            code: None,
            build: None,
            chunking: None,
            compression: None,
            warnings: Vec::new(),
            phases: Vec::new(),
        }
    }

    /// Project root
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Resolved configuration
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Record the manifest section; false if already recorded
    pub fn set_manifest(&mut self, section: Section<ManifestReport>) -> bool {
        fill(&mut self.manifest, "manifest", section)
    }

    /// Record the code scan section; false if already recorded
    pub fn set_code(&mut self, section: Section<CodeScanReport>) -> bool {
        fill(&mut self.code, "code", section)
    }

    /// Record the build output section; false if already recorded
    pub fn set_build(&mut self, section: Section<BuildReport>) -> bool {
        fill(&mut self.build, "build", section)
    }

    /// Record the chunking section; false if already recorded
    pub fn set_chunking(&mut self, section: Section<ChunkingReport>) -> bool {
        fill(&mut self.chunking, "chunking", section)
    }

    /// Record the compression section; false if already recorded
    pub fn set_compression(&mut self, section: Section<CompressionReport>) -> bool {
        fill(&mut self.compression, "compression", section)
    }

    /// Manifest results, if available
    pub fn manifest(&self) -> Option<&ManifestReport> {
        available(&self.manifest)
    }

    /// Code scan results, if available
    pub fn code(&self) -> Option<&CodeScanReport> {
        available(&self.code)
    }

    /// Build output results, if available
    pub fn build(&self) -> Option<&BuildReport> {
        available(&self.build)
    }

    /// Chunking results, if available
    pub fn chunking(&self) -> Option<&ChunkingReport> {
        available(&self.chunking)
    }

    /// Compression results, if available
    pub fn compression(&self) -> Option<&CompressionReport> {
        available(&self.compression)
    }

    /// Manifest section; unrecorded sections read as skipped
    pub fn manifest_section(&self) -> Section<ManifestReport> {
        settled(&self.manifest)
    }

    /// Code scan section; unrecorded sections read as skipped
    pub fn code_section(&self) -> Section<CodeScanReport> {
        settled(&self.code)
    }

    /// Build output section; unrecorded sections read as skipped
    pub fn build_section(&self) -> Section<BuildReport> {
        settled(&self.build)
    }

    /// Chunking section; unrecorded sections read as skipped
    pub fn chunking_section(&self) -> Section<ChunkingReport> {
        settled(&self.chunking)
    }

    /// Compression section; unrecorded sections read as skipped
    pub fn compression_section(&self) -> Section<CompressionReport> {
        settled(&self.compression)
    }

    /// Record a warning and emit it through the logger
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Record warnings already emitted by a component
    pub fn extend_warnings(&mut self, warnings: impl IntoIterator<Item = String>) {
        self.warnings.extend(warnings);
    }

    /// Accumulated warnings in the order they occurred
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Record a phase duration
    pub fn record_phase(&mut self, timing: PhaseTiming) {
        self.phases.push(timing);
    }

    /// Phase durations in execution order
    pub fn phases(&self) -> &[PhaseTiming] {
        &self.phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> AnalysisContext {
        AnalysisContext::new("/project", ConfigFile::default())
    }

    #[test]
    fn test_section_slot_is_written_once() {
        let mut ctx = context();

        assert!(ctx.set_build(Section::unavailable("no build output found")));
        assert!(!ctx.set_build(Section::Available(BuildReport::default())));

        assert!(ctx.build().is_none());
        assert_eq!(
            ctx.build_section(),
            Section::unavailable("no build output found")
        );
    }

    #[test]
    fn test_unrecorded_section_reads_as_skipped() {
        let ctx = context();
        assert_eq!(ctx.chunking_section(), Section::Skipped);
        assert!(ctx.code().is_none());
    }

    #[test]
    fn test_available_section_is_readable() {
        let mut ctx = context();
        ctx.set_code(Section::Available(CodeScanReport {
            files_scanned: 4,
            ..CodeScanReport::default()
        }));

        assert_eq!(ctx.code().map(|c| c.files_scanned), Some(4));
        assert!(ctx.code_section().is_available());
    }

    #[test]
    fn test_warnings_keep_order() {
        let mut ctx = context();
        ctx.warn("first");
        ctx.extend_warnings(vec!["second".to_string(), "third".to_string()]);
        assert_eq!(ctx.warnings(), ["first", "second", "third"]);
    }

    #[test]
    fn test_section_serializes_with_status_tag() {
        let skipped: Section<BuildReport> = Section::Skipped;
        assert_eq!(
            serde_json::to_string(&skipped).unwrap(),
            r#"{"status":"skipped"}"#
        );

        let missing: Section<BuildReport> = Section::unavailable("no build output found");
        let json = serde_json::to_string(&missing).unwrap();
        assert!(json.contains(r#""status":"unavailable""#));
        let parsed: Section<BuildReport> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, missing);
    }
}
