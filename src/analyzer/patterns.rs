//! Line-based anti-pattern scanning of project source files.
//!
//! Matching is literal substring search per line. Comments and string
//! literals are not recognized, so they can produce false positives.

use super::walker::{serialize_lossy_path, FileRecord, FileWalker, WalkError};
use super::Inspection;
use crate::config::ConfigFile;
use crate::fmt::format_bytes;
use crate::infra::{FileSystem, RealFileSystem};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Longest snippet kept per issue, in characters
const SNIPPET_MAX_CHARS: usize = 120;

/// Errors from the code pattern scan
#[derive(Error, Debug)]
pub enum PatternScanError {
    /// A source file could not be read as UTF-8 text
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// I/O error
        #[source]
        source: io::Error,
    },
}

/// Kind of code issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Source file above the large-file threshold
    LargeFile,
    /// JSX inline style object
    InlineStyle,
    /// Debug print left in source
    ConsoleStatement,
    /// Direct DOM query inside component code
    DomQueryInComponent,
}

impl IssueKind {
    /// Line-level kinds in the order they are checked on each line
    pub const LINE_KINDS: [IssueKind; 3] = [
        IssueKind::InlineStyle,
        IssueKind::ConsoleStatement,
        IssueKind::DomQueryInComponent,
    ];

    /// Literal needles; any one of them on a line yields an issue
    pub fn needles(&self) -> &'static [&'static str] {
        match self {
            Self::LargeFile => &[],
            Self::InlineStyle => &["style={{"],
            Self::ConsoleStatement => &[
                "console.log",
                "console.debug",
                "console.info",
                "console.trace",
            ],
            Self::DomQueryInComponent => &[
                "document.getElementById",
                "document.querySelector",
                "document.getElementsBy",
            ],
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::LargeFile => "large file",
            Self::InlineStyle => "inline style",
            Self::ConsoleStatement => "console statement",
            Self::DomQueryInComponent => "DOM query in component",
        }
    }

    fn matches(&self, line: &str) -> bool {
        self.needles().iter().any(|needle| line.contains(needle))
    }
}

/// A code anti-pattern occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeIssue {
    /// File path relative to the project root
    #[serde(serialize_with = "serialize_lossy_path")]
    pub file: PathBuf,
    /// 1-based line number, absent for file-level issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Issue kind
    pub kind: IssueKind,
    /// Offending line (trimmed) or a file-level description
    pub snippet: String,
}

/// Issue totals per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    /// Large source files
    pub large_files: usize,
    /// Inline style lines
    pub inline_styles: usize,
    /// Debug print lines
    pub console_statements: usize,
    /// DOM query lines
    pub dom_queries: usize,
}

impl IssueCounts {
    /// Count for one kind
    pub fn get(&self, kind: IssueKind) -> usize {
        match kind {
            IssueKind::LargeFile => self.large_files,
            IssueKind::InlineStyle => self.inline_styles,
            IssueKind::ConsoleStatement => self.console_statements,
            IssueKind::DomQueryInComponent => self.dom_queries,
        }
    }

    fn record(&mut self, kind: IssueKind) {
        match kind {
            IssueKind::LargeFile => self.large_files += 1,
            IssueKind::InlineStyle => self.inline_styles += 1,
            IssueKind::ConsoleStatement => self.console_statements += 1,
            IssueKind::DomQueryInComponent => self.dom_queries += 1,
        }
    }
}

/// Code scan results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeScanReport {
    /// Number of source files read
    pub files_scanned: usize,
    /// Issues in file order, then line order
    pub issues: Vec<CodeIssue>,
    /// Totals per kind
    pub counts: IssueCounts,
}

impl CodeScanReport {
    /// Issues of one kind
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &CodeIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// Distinct files with at least one issue of `kind`, in scan order
    pub fn files_with(&self, kind: IssueKind) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        for issue in self.issues_of(kind) {
            if !files.contains(&issue.file) {
                files.push(issue.file.clone());
            }
        }
        files
    }
}

/// Scans project source files for performance anti-patterns
///
/// # Examples
///
/// ```no_run
/// use perf_audit::analyzer::CodePatternScanner;
/// use perf_audit::config::ConfigFile;
///
/// let config = ConfigFile::default();
/// let inspection = CodePatternScanner::new(".", &config).scan_project()?;
/// println!("{} issues", inspection.report.issues.len());
/// # Ok::<(), perf_audit::analyzer::walker::WalkError>(())
/// ```
pub struct CodePatternScanner<'a, FS: FileSystem = RealFileSystem> {
    project_root: PathBuf,
    config: &'a ConfigFile,
    fs: FS,
}

impl<'a> CodePatternScanner<'a, RealFileSystem> {
    /// Create a scanner for the given project root
    pub fn new(project_root: impl Into<PathBuf>, config: &'a ConfigFile) -> Self {
        Self::with_fs(project_root, config, RealFileSystem)
    }
}

impl<'a, FS: FileSystem + Sync> CodePatternScanner<'a, FS> {
    /// Create a scanner with a custom filesystem implementation
    pub fn with_fs(project_root: impl Into<PathBuf>, config: &'a ConfigFile, fs: FS) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            fs,
        }
    }

    /// Walk the project root and scan every source file found
    ///
    /// Walk warnings come first, followed by per-file scan warnings. Fails
    /// only when the project root itself cannot be walked.
    pub fn scan_project(&self) -> Result<Inspection<CodeScanReport>, WalkError> {
        let walk = FileWalker::with_fs(&self.project_root, &self.fs)
            .excluding(self.config.excluded_dirs.iter().cloned())
            .walk()?;

        let mut inspection = self.scan(&walk.files);
        let mut warnings = walk.warnings;
        warnings.append(&mut inspection.warnings);
        inspection.warnings = warnings;
        Ok(inspection)
    }

    /// Scan the source files among `files` (paths relative to the project root)
    pub fn scan(&self, files: &[FileRecord]) -> Inspection<CodeScanReport> {
        let sources: Vec<&FileRecord> = files.iter().filter(|f| self.is_scannable(f)).collect();
        debug!("Scanning {} source files", sources.len());

        // Indexed parallel collect keeps walk order
        let results: Vec<Result<Vec<CodeIssue>, PatternScanError>> =
            sources.par_iter().map(|file| self.scan_file(file)).collect();

        let mut report = CodeScanReport::default();
        let mut warnings = Vec::new();

        for result in results {
            match result {
                Ok(issues) => {
                    report.files_scanned += 1;
                    for issue in issues {
                        report.counts.record(issue.kind);
                        report.issues.push(issue);
                    }
                }
                Err(e) => {
                    let message = format!("Skipping source file: {}", e);
                    warn!("{}", message);
                    warnings.push(message);
                }
            }
        }

        Inspection { report, warnings }
    }

    fn is_scannable(&self, file: &FileRecord) -> bool {
        let is_source = file
            .extension()
            .is_some_and(|ext| self.config.is_source_extension(&ext));
        let in_build_dir = self
            .config
            .build_dirs
            .iter()
            .any(|dir| file.path.starts_with(Path::new(dir)));

        is_source && !in_build_dir
    }

    fn scan_file(&self, file: &FileRecord) -> Result<Vec<CodeIssue>, PatternScanError> {
        let path = self.project_root.join(&file.path);
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|source| PatternScanError::Read { path, source })?;

        let mut issues = Vec::new();

        if file.size_bytes > self.config.large_file_bytes() {
            issues.push(CodeIssue {
                file: file.path.clone(),
                line: None,
                kind: IssueKind::LargeFile,
                snippet: format!(
                    "{} exceeds the {} KB source file threshold",
                    format_bytes(file.size_bytes),
                    self.config.large_file_kb
                ),
            });
        }

        issues.extend(scan_lines(&file.path, &content));
        Ok(issues)
    }
}

/// Scan text line by line, at most one issue per (line, kind)
///
/// # Examples
///
/// ```
/// use perf_audit::analyzer::patterns::{scan_lines, IssueKind};
/// use std::path::Path;
///
/// let issues = scan_lines(Path::new("app.js"), "console.log(1);\nrender();\n");
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues[0].kind, IssueKind::ConsoleStatement);
/// assert_eq!(issues[0].line, Some(1));
/// ```
pub fn scan_lines(file: &Path, content: &str) -> Vec<CodeIssue> {
    let mut issues = Vec::new();

    for (index, line) in content.lines().enumerate() {
        for kind in IssueKind::LINE_KINDS {
            if kind.matches(line) {
                issues.push(CodeIssue {
                    file: file.to_path_buf(),
                    line: Some(index + 1),
                    kind,
                    snippet: snippet(line),
                });
            }
        }
    }

    issues
}

fn snippet(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.chars().count() <= SNIPPET_MAX_CHARS {
        trimmed.to_string()
    } else {
        let mut cut: String = trimmed.chars().take(SNIPPET_MAX_CHARS - 3).collect();
        cut.push_str("...");
        cut
    }
}
