//! Code-splitting heuristics over build output scripts

use super::build_output::{BuildFile, BuildReport};
use crate::config::ConfigFile;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Name fragments bundlers use for split chunks
pub const CHUNK_NAME_MARKERS: [&str; 3] = ["chunk", "vendor", "common"];

/// Content-hashed file names (`main.3f2a9c1b.js`)
static CONTENT_HASH_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn content_hash_re() -> Option<&'static Regex> {
    CONTENT_HASH_RE
        .get_or_init(|| Regex::new(r"\.[0-9a-fA-F]{8,}\.[A-Za-z0-9]+$").ok())
        .as_ref()
}

/// Whether a script file name looks like an emitted chunk
///
/// # Examples
///
/// ```
/// use perf_audit::analyzer::chunking::is_chunk_name;
///
/// assert!(is_chunk_name("vendors~main.js"));
/// assert!(is_chunk_name("main.3f2a9c1b.js"));
/// assert!(!is_chunk_name("main.js"));
/// ```
pub fn is_chunk_name(file_name: &str) -> bool {
    CHUNK_NAME_MARKERS.iter().any(|m| file_name.contains(m))
        || content_hash_re().is_some_and(|re| re.is_match(file_name))
}

/// Chunking analysis results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingReport {
    /// Scripts that look like split chunks
    pub chunk_files: Vec<BuildFile>,
    /// True when at least one chunk was found
    pub code_splitting_detected: bool,
    /// Large scripts that are not chunks, largest first
    pub split_candidates: Vec<BuildFile>,
}

/// Classifies build scripts as chunks or split candidates
pub struct ChunkingAnalyzer<'a> {
    config: &'a ConfigFile,
}

impl<'a> ChunkingAnalyzer<'a> {
    /// Create an analyzer using the configured thresholds
    pub fn new(config: &'a ConfigFile) -> Self {
        Self { config }
    }

    /// Analyze the scripts of a build report
    pub fn analyze(&self, build: &BuildReport) -> ChunkingReport {
        let threshold = self.config.split_candidate_bytes();
        let mut report = ChunkingReport::default();

        for script in build.scripts() {
            if is_chunk_name(script.file_name()) {
                report.chunk_files.push(script.clone());
            } else if script.size_bytes > threshold {
                report.split_candidates.push(script.clone());
            }
        }

        super::build_output::sort_by_size_desc(&mut report.split_candidates);
        report.code_splitting_detected = !report.chunk_files.is_empty();

        debug!(
            "Chunking: {} chunks, {} split candidates",
            report.chunk_files.len(),
            report.split_candidates.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::build_output::BuildArtifactSummary;
    use crate::analyzer::walker::{ExtensionCategory, FileRecord};
    use std::path::PathBuf;

    fn build(files: &[(&str, u64)]) -> BuildReport {
        let records: Vec<FileRecord> = files
            .iter()
            .map(|(name, size)| FileRecord {
                path: PathBuf::from(name),
                size_bytes: *size,
                category: ExtensionCategory::from_path(PathBuf::from(name).as_path()),
            })
            .collect();
        let summary = BuildArtifactSummary::from_records("dist", &records, 100 * 1024);
        BuildReport {
            total_size_bytes: summary.total_size_bytes,
            directories: vec![summary],
        }
    }

    #[test]
    fn test_chunk_name_markers() {
        for name in [
            "chunk-vendors.js",
            "vendor.bundle.js",
            "commons.js",
            "251.chunk.js",
            "index.a1b2c3d4.js",
            "app.DEADBEEF12.mjs",
        ] {
            assert!(is_chunk_name(name), "{}", name);
        }
        for name in ["main.js", "index.abc123.js", "bundle.min.js"] {
            assert!(!is_chunk_name(name), "{}", name);
        }
    }

    #[test]
    fn test_analyze_detects_code_splitting() {
        let report = ChunkingAnalyzer::new(&ConfigFile::default()).analyze(&build(&[
            ("main.js", 10_000),
            ("vendor.js", 900_000),
            ("styles.css", 5_000),
        ]));

        assert!(report.code_splitting_detected);
        assert_eq!(report.chunk_files.len(), 1);
        assert_eq!(report.chunk_files[0].file_name(), "vendor.js");
        assert!(report.split_candidates.is_empty());
    }

    #[test]
    fn test_analyze_large_monolith_is_split_candidate() {
        let report = ChunkingAnalyzer::new(&ConfigFile::default())
            .analyze(&build(&[("bundle.js", 600 * 1024), ("small.js", 100)]));

        assert!(!report.code_splitting_detected);
        assert_eq!(report.split_candidates.len(), 1);
        assert_eq!(report.split_candidates[0].display_path(), "dist/bundle.js");
    }

    #[test]
    fn test_analyze_large_chunk_is_not_a_candidate() {
        let report = ChunkingAnalyzer::new(&ConfigFile::default())
            .analyze(&build(&[("vendor.1a2b3c4d.js", 2 * 1024 * 1024)]));

        assert!(report.split_candidates.is_empty());
        assert_eq!(report.chunk_files.len(), 1);
    }

    #[test]
    fn test_analyze_empty_build() {
        let report = ChunkingAnalyzer::new(&ConfigFile::default()).analyze(&BuildReport::default());
        assert_eq!(report, ChunkingReport::default());
    }
}
