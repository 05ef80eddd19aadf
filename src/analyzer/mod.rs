//! Static analysis of a web project
//!
//! Provides the inspectors that make up an audit:
//! - File enumeration with exclusion rules
//! - Manifest inspection (framework, bundler, heavy and duplicate dependencies)
//! - Line-based code pattern scanning
//! - Build output, chunking and compression inspection
//! - Recommendation rules and scoring

pub mod build_output;
pub mod chunking;
pub mod compression;
pub mod detection;
pub mod known_deps;
pub mod manifest;
pub mod patterns;
pub mod recommendations;
pub mod walker;

// Public exports for common analyzer types
pub use build_output::{BuildArtifactSummary, BuildOutputInspector, BuildReport};
pub use chunking::{ChunkingAnalyzer, ChunkingReport};
pub use compression::{CompressionInspector, CompressionReport};
pub use detection::{Bundler, Confidence, ProjectType};
pub use manifest::{DependencyFinding, ManifestInspector, ManifestReport};
pub use patterns::{CodeIssue, CodePatternScanner, CodeScanReport, IssueKind};
pub use recommendations::{Priority, Recommendation, RecommendationEngine};
pub use walker::{FileRecord, FileWalker};

/// Inspector output plus the non-fatal problems met while producing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection<T> {
    /// Inspection results
    pub report: T,
    /// Warnings, one message each
    pub warnings: Vec<String>,
}
