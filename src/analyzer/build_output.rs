//! Build output size inspection
//!
//! Walks each configured build directory that exists and summarizes it by
//! file class. Sizes are on-disk sizes of whatever the bundler emitted.

use super::walker::{display_path, serialize_lossy_path, FileRecord, FileWalker, WalkError};
use super::Inspection;
use crate::config::ConfigFile;
use crate::infra::{FileSystem, RealFileSystem};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from build output inspection
#[derive(Error, Debug)]
pub enum BuildOutputError {
    /// None of the candidate directories exist
    #[error("no build output found (looked for {})", .candidates.join(", "))]
    NoBuildOutput {
        /// Directories probed
        candidates: Vec<String>,
    },

    /// No existing build directory could be walked
    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// A file in a build directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFile {
    /// Path relative to the project root
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
}

impl BuildFile {
    /// Final path component
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Relative path with forward slashes
    pub fn display_path(&self) -> String {
        display_path(&self.path)
    }
}

/// Coarse class of a build file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFileClass {
    /// `js`, `mjs`, `cjs`
    Script,
    /// `css`
    Style,
    /// Everything else, including `.gz`/`.br` siblings and source maps
    Asset,
}

impl BuildFileClass {
    /// Classify by the file's final extension
    pub fn of(record: &FileRecord) -> Self {
        match record.extension().as_deref() {
            Some("js" | "mjs" | "cjs") => Self::Script,
            Some("css") => Self::Style,
            _ => Self::Asset,
        }
    }
}

/// Size summary of one build directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArtifactSummary {
    /// Directory relative to the project root
    pub directory: String,
    /// Sum of every discovered file size
    pub total_size_bytes: u64,
    /// Number of discovered files
    pub file_count: usize,
    /// Scripts, largest first
    pub script_files: Vec<BuildFile>,
    /// Stylesheets, largest first
    pub style_files: Vec<BuildFile>,
    /// Other files, largest first
    pub asset_files: Vec<BuildFile>,
    /// Files above the oversized threshold, largest first
    pub oversized_files: Vec<BuildFile>,
}

impl BuildArtifactSummary {
    /// Summarize walked records of `directory`
    ///
    /// Every list is sorted by descending size; ties keep walk order.
    pub fn from_records(directory: &str, records: &[FileRecord], oversized_bytes: u64) -> Self {
        let mut summary = Self {
            directory: directory.to_string(),
            total_size_bytes: 0,
            file_count: records.len(),
            script_files: Vec::new(),
            style_files: Vec::new(),
            asset_files: Vec::new(),
            oversized_files: Vec::new(),
        };

        for record in records {
            let file = BuildFile {
                path: PathBuf::from(directory).join(&record.path),
                size_bytes: record.size_bytes,
            };
            summary.total_size_bytes += file.size_bytes;

            if file.size_bytes > oversized_bytes {
                summary.oversized_files.push(file.clone());
            }
            match BuildFileClass::of(record) {
                BuildFileClass::Script => summary.script_files.push(file),
                BuildFileClass::Style => summary.style_files.push(file),
                BuildFileClass::Asset => summary.asset_files.push(file),
            }
        }

        for list in [
            &mut summary.script_files,
            &mut summary.style_files,
            &mut summary.asset_files,
            &mut summary.oversized_files,
        ] {
            sort_by_size_desc(list);
        }

        summary
    }
}

/// Stable sort, largest first
pub fn sort_by_size_desc(files: &mut [BuildFile]) {
    files.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
}

/// Build output across every discovered build directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// One summary per existing build directory, in candidate order
    pub directories: Vec<BuildArtifactSummary>,
    /// Sum over all directories
    pub total_size_bytes: u64,
}

impl BuildReport {
    /// Every script across all directories
    pub fn scripts(&self) -> impl Iterator<Item = &BuildFile> {
        self.directories.iter().flat_map(|d| d.script_files.iter())
    }

    /// Every non-script, non-style file across all directories
    pub fn assets(&self) -> impl Iterator<Item = &BuildFile> {
        self.directories.iter().flat_map(|d| d.asset_files.iter())
    }

    /// Every oversized file across all directories, largest first
    pub fn oversized_files(&self) -> Vec<BuildFile> {
        let mut files: Vec<BuildFile> = self
            .directories
            .iter()
            .flat_map(|d| d.oversized_files.iter().cloned())
            .collect();
        sort_by_size_desc(&mut files);
        files
    }

    /// Total number of files
    pub fn file_count(&self) -> usize {
        self.directories.iter().map(|d| d.file_count).sum()
    }
}

/// Inspects build output directories
///
/// # Examples
///
/// ```no_run
/// use perf_audit::analyzer::BuildOutputInspector;
/// use perf_audit::config::ConfigFile;
///
/// let config = ConfigFile::default();
/// let inspection = BuildOutputInspector::new(".", &config).inspect()?;
/// for dir in &inspection.report.directories {
///     println!("{}: {} bytes", dir.directory, dir.total_size_bytes);
/// }
/// # Ok::<(), perf_audit::analyzer::build_output::BuildOutputError>(())
/// ```
pub struct BuildOutputInspector<'a, FS: FileSystem = RealFileSystem> {
    project_root: PathBuf,
    config: &'a ConfigFile,
    fs: FS,
}

impl<'a> BuildOutputInspector<'a, RealFileSystem> {
    /// Create an inspector for the given project root
    pub fn new(project_root: impl Into<PathBuf>, config: &'a ConfigFile) -> Self {
        Self::with_fs(project_root, config, RealFileSystem)
    }
}

impl<'a, FS: FileSystem> BuildOutputInspector<'a, FS> {
    /// Create an inspector with a custom filesystem implementation
    pub fn with_fs(project_root: impl Into<PathBuf>, config: &'a ConfigFile, fs: FS) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            fs,
        }
    }

    /// Candidate directories that exist as directories
    pub fn existing_build_dirs(&self) -> Vec<&'a str> {
        self.config
            .build_dirs
            .iter()
            .map(String::as_str)
            .filter(|dir| {
                self.fs
                    .metadata(&self.project_root.join(dir))
                    .map(|m| m.is_dir())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Walk and summarize every existing build directory
    ///
    /// A directory that fails to walk is skipped with a warning; the walk
    /// error is returned only when no directory could be summarized.
    pub fn inspect(&self) -> Result<Inspection<BuildReport>, BuildOutputError> {
        let dirs = self.existing_build_dirs();
        if dirs.is_empty() {
            return Err(BuildOutputError::NoBuildOutput {
                candidates: self.config.build_dirs.clone(),
            });
        }

        let mut report = BuildReport::default();
        let mut warnings = Vec::new();
        let mut first_error = None;

        for dir in dirs {
            let outcome = match FileWalker::with_fs(self.project_root.join(dir), &self.fs).walk() {
                Ok(outcome) => outcome,
                Err(e) => {
                    let message = format!("Skipping build directory {}: {}", dir, e);
                    warn!("{}", message);
                    warnings.push(message);
                    first_error.get_or_insert(e);
                    continue;
                }
            };
            let summary = BuildArtifactSummary::from_records(
                dir,
                &outcome.files,
                self.config.oversized_file_bytes(),
            );
            debug!(
                "Build dir {}: {} files, {} bytes",
                dir, summary.file_count, summary.total_size_bytes
            );

            report.total_size_bytes += summary.total_size_bytes;
            report.directories.push(summary);
            warnings.extend(outcome.warnings);
        }

        match first_error {
            Some(e) if report.directories.is_empty() => Err(e.into()),
            _ => Ok(Inspection { report, warnings }),
        }
    }
}
