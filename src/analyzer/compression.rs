//! Pre-compression and minification checks on build output

use super::build_output::{BuildFile, BuildReport};
use super::detection::Confidence;
use super::walker::serialize_lossy_path;
use super::Inspection;
use crate::config::ConfigFile;
use crate::infra::{FileSystem, RealFileSystem};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading minification samples
#[derive(Error, Debug)]
pub enum CompressionError {
    /// A sampled script could not be read
    #[error("Failed to read sample {path}: {source}")]
    SampleUnreadable {
        /// Script path
        path: PathBuf,
        /// I/O error
        #[source]
        source: io::Error,
    },
}

/// Average line length of one sampled script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinificationSample {
    /// Script path relative to the project root
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: PathBuf,
    /// Characters per line (integer division)
    pub average_line_length: u64,
    /// Whether the average is above the minified threshold
    pub minified: bool,
}

/// Minification verdict over the sampled scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinificationCheck {
    /// Samples that could be read, largest script first
    pub samples: Vec<MinificationSample>,
    /// Majority vote of the samples
    pub likely_minified: bool,
    /// Medium when every sample agrees, otherwise low
    pub confidence: Confidence,
}

impl MinificationCheck {
    /// Combine per-sample verdicts
    pub fn from_samples(samples: Vec<MinificationSample>) -> Self {
        let minified = samples.iter().filter(|s| s.minified).count();
        let unanimous = !samples.is_empty() && (minified == 0 || minified == samples.len());

        Self {
            likely_minified: minified * 2 > samples.len(),
            confidence: if unanimous {
                Confidence::Medium
            } else {
                Confidence::Low
            },
            samples,
        }
    }
}

/// Compression analysis results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionReport {
    /// `.gz` files in the build output
    pub gzip_files: Vec<BuildFile>,
    /// `.br` files in the build output
    pub brotli_files: Vec<BuildFile>,
    /// Minification heuristic
    pub minification: MinificationCheck,
}

impl CompressionReport {
    /// Whether any gzip sibling exists
    pub fn has_gzip(&self) -> bool {
        !self.gzip_files.is_empty()
    }

    /// Whether any brotli sibling exists
    pub fn has_brotli(&self) -> bool {
        !self.brotli_files.is_empty()
    }
}

/// Average characters per line
///
/// # Examples
///
/// ```
/// use perf_audit::analyzer::compression::average_line_length;
///
/// assert_eq!(average_line_length("abcd\nef\n"), 3);
/// assert_eq!(average_line_length(""), 0);
/// ```
pub fn average_line_length(content: &str) -> u64 {
    let chars = content.chars().filter(|c| *c != '\n').count() as u64;
    let lines = content.lines().count().max(1) as u64;
    chars / lines
}

/// Inspects build output for compressed siblings and minification
pub struct CompressionInspector<'a, FS: FileSystem = RealFileSystem> {
    project_root: PathBuf,
    config: &'a ConfigFile,
    fs: FS,
}

impl<'a> CompressionInspector<'a, RealFileSystem> {
    /// Create an inspector for the given project root
    pub fn new(project_root: impl Into<PathBuf>, config: &'a ConfigFile) -> Self {
        Self::with_fs(project_root, config, RealFileSystem)
    }
}

impl<'a, FS: FileSystem> CompressionInspector<'a, FS> {
    /// Create an inspector with a custom filesystem implementation
    pub fn with_fs(project_root: impl Into<PathBuf>, config: &'a ConfigFile, fs: FS) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            fs,
        }
    }

    /// Inspect the files of a build report
    ///
    /// Unreadable samples become warnings and are left out of the vote.
    pub fn inspect(&self, build: &BuildReport) -> Inspection<CompressionReport> {
        let mut gzip_files = Vec::new();
        let mut brotli_files = Vec::new();
        for file in build.assets() {
            match file.path.extension().and_then(|e| e.to_str()) {
                Some("gz") => gzip_files.push(file.clone()),
                Some("br") => brotli_files.push(file.clone()),
                _ => {}
            }
        }

        let mut largest: Vec<BuildFile> = build.scripts().cloned().collect();
        super::build_output::sort_by_size_desc(&mut largest);

        let mut warnings = Vec::new();
        let mut samples = Vec::new();
        for script in largest.iter().take(self.config.minification_samples) {
            match self.sample(script) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    let message = e.to_string();
                    warn!("{}", message);
                    warnings.push(message);
                }
            }
        }

        let minification = MinificationCheck::from_samples(samples);
        debug!(
            "Compression: {} gzip, {} brotli, minified={} ({:?})",
            gzip_files.len(),
            brotli_files.len(),
            minification.likely_minified,
            minification.confidence
        );

        Inspection {
            report: CompressionReport {
                gzip_files,
                brotli_files,
                minification,
            },
            warnings,
        }
    }

    fn sample(&self, script: &BuildFile) -> Result<MinificationSample, CompressionError> {
        let path = self.project_root.join(&script.path);
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|source| CompressionError::SampleUnreadable { path, source })?;

        let average = average_line_length(&content);
        Ok(MinificationSample {
            path: script.path.clone(),
            average_line_length: average,
            minified: average > self.config.minified_line_length,
        })
    }
}
