//! Recursive file enumeration with exclusion rules.
//!
//! The walker never leaves its root, never follows symlinked directories and
//! skips hidden directories plus the configured dependency-cache names. Entries
//! are visited in file-name order so repeated walks of an unchanged tree
//! produce identical sequences.

use crate::infra::{FileSystem, RealFileSystem};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize, Serializer};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors that abort a walk
///
/// Problems below the root never abort; they become warnings.
#[derive(Error, Debug)]
pub enum WalkError {
    /// Root directory does not exist
    #[error("Directory not found: {0}")]
    RootNotFound(PathBuf),

    /// Root exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Root directory could not be read
    #[error("Cannot read directory {path}: {source}")]
    RootUnreadable {
        /// Root path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Coarse file classification by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionCategory {
    /// JavaScript and TypeScript sources or bundles
    Script,
    /// Stylesheets
    Style,
    /// HTML and component templates
    Markup,
    /// Raster and vector images
    Image,
    /// Web fonts
    Font,
    /// Pre-compressed siblings (.gz, .br)
    Compressed,
    /// Source maps
    SourceMap,
    /// JSON, text and other data
    Data,
    /// Anything else
    Other,
}

impl ExtensionCategory {
    /// Classify a path by its (case-insensitive) extension
    ///
    /// # Examples
    ///
    /// ```
    /// use perf_audit::analyzer::walker::ExtensionCategory;
    /// use std::path::Path;
    ///
    /// assert_eq!(ExtensionCategory::from_path(Path::new("app.tsx")), ExtensionCategory::Script);
    /// assert_eq!(ExtensionCategory::from_path(Path::new("app.js.map")), ExtensionCategory::SourceMap);
    /// assert_eq!(ExtensionCategory::from_path(Path::new("app.js.gz")), ExtensionCategory::Compressed);
    /// ```
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("js" | "mjs" | "cjs" | "jsx" | "ts" | "tsx" | "mts" | "cts") => Self::Script,
            Some("css" | "scss" | "sass" | "less") => Self::Style,
            Some("html" | "htm" | "vue" | "svelte") => Self::Markup,
            Some("png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" | "ico") => Self::Image,
            Some("woff" | "woff2" | "ttf" | "otf" | "eot") => Self::Font,
            Some("gz" | "br") => Self::Compressed,
            Some("map") => Self::SourceMap,
            Some("json" | "txt" | "xml" | "csv" | "wasm") => Self::Data,
            _ => Self::Other,
        }
    }
}

/// A discovered file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the walk root
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: PathBuf,
    /// Size in bytes (symlink target size for symlinked files)
    pub size_bytes: u64,
    /// Extension category
    pub category: ExtensionCategory,
}

impl FileRecord {
    /// Lower-cased extension without the dot
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Final path component
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Relative path with forward slashes, for reports
    pub fn display_path(&self) -> String {
        display_path(&self.path)
    }
}

/// Render a path with forward slashes regardless of platform
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Serialize a path as a string, replacing invalid UTF-8 with U+FFFD
pub fn serialize_lossy_path<P, S>(path: &P, serializer: S) -> Result<S::Ok, S::Error>
where
    P: AsRef<Path>,
    S: Serializer,
{
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

/// Files found by a walk plus the non-fatal problems met along the way
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Discovered files in walk order
    pub files: Vec<FileRecord>,
    /// Skipped entries, one message each
    pub warnings: Vec<String>,
}

impl WalkOutcome {
    /// Sum of all discovered file sizes
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }
}

/// Recursive directory walker
///
/// # Examples
///
/// ```no_run
/// use perf_audit::analyzer::FileWalker;
///
/// let outcome = FileWalker::new("dist").walk()?;
/// println!("{} files, {} bytes", outcome.files.len(), outcome.total_size());
/// # Ok::<(), perf_audit::analyzer::walker::WalkError>(())
/// ```
pub struct FileWalker<FS: FileSystem = RealFileSystem> {
    root: PathBuf,
    excluded: Vec<String>,
    fs: FS,
}

impl FileWalker<RealFileSystem> {
    /// Create a walker rooted at `root` excluding `node_modules`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, RealFileSystem)
    }
}

impl<FS: FileSystem> FileWalker<FS> {
    /// Create a walker with a custom filesystem implementation
    pub fn with_fs(root: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            root: root.into(),
            excluded: vec!["node_modules".to_string()],
            fs,
        }
    }

    /// Replace the excluded directory names
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = names.into_iter().map(Into::into).collect();
        self
    }

    /// Walk root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree
    ///
    /// Fails only when the root itself is missing or unreadable.
    pub fn walk(&self) -> Result<WalkOutcome, WalkError> {
        self.check_root()?;

        let mut outcome = WalkOutcome::default();
        let entries = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for entry in entries {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        continue;
                    }
                    if let Some(record) = self.record(&entry, &mut outcome.warnings) {
                        trace!("Found {} ({} bytes)", record.display_path(), record.size_bytes);
                        outcome.files.push(record);
                    }
                }
                Err(err) if err.depth() == 0 => {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop at root"));
                    return Err(WalkError::RootUnreadable {
                        path: self.root.clone(),
                        source,
                    });
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<unknown>".to_string());
                    push_warning(
                        &mut outcome.warnings,
                        format!("Skipping unreadable path {}: {}", path, err),
                    );
                }
            }
        }

        debug!(
            "Walked {}: {} files, {} warnings",
            self.root.display(),
            outcome.files.len(),
            outcome.warnings.len()
        );
        Ok(outcome)
    }

    /// Check that the root exists and is a directory without walking it
    pub fn check_root(&self) -> Result<(), WalkError> {
        match self.fs.metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(WalkError::NotADirectory(self.root.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(WalkError::RootNotFound(self.root.clone()))
            }
            Err(source) => Err(WalkError::RootUnreadable {
                path: self.root.clone(),
                source,
            }),
        }
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.excluded.iter().any(|ex| *ex == name)
    }

    fn record(&self, entry: &DirEntry, warnings: &mut Vec<String>) -> Option<FileRecord> {
        let size_bytes = if entry.path_is_symlink() {
            match self.fs.metadata(entry.path()) {
                Ok(meta) if meta.is_file() => meta.len(),
                Ok(_) => {
                    debug!("Not following symlinked directory {}", entry.path().display());
                    return None;
                }
                Err(e) => {
                    push_warning(
                        warnings,
                        format!(
                            "Skipping unresolvable symlink {}: {}",
                            entry.path().display(),
                            e
                        ),
                    );
                    return None;
                }
            }
        } else {
            match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    push_warning(
                        warnings,
                        format!("Skipping {}: {}", entry.path().display(), e),
                    );
                    return None;
                }
            }
        };

        let path = entry
            .path()
            .strip_prefix(&self.root)
            .unwrap_or(entry.path())
            .to_path_buf();
        let category = ExtensionCategory::from_path(&path);

        Some(FileRecord {
            path,
            size_bytes,
            category,
        })
    }
}

fn push_warning(warnings: &mut Vec<String>, message: String) {
    warn!("{}", message);
    warnings.push(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, bytes: usize) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![b'a'; bytes]).unwrap();
    }

    fn paths(outcome: &WalkOutcome) -> Vec<String> {
        outcome.files.iter().map(|f| f.display_path()).collect()
    }

    #[test]
    fn test_walk_skips_hidden_and_dependency_dirs() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/index.js", 10);
        write(temp.path(), ".git/config", 10);
        write(temp.path(), "node_modules/react/index.js", 10);
        write(temp.path(), "src/.cache/tmp.js", 10);
        write(temp.path(), ".env", 3);

        let outcome = FileWalker::new(temp.path()).walk().unwrap();

        assert_eq!(paths(&outcome), vec![".env", "src/index.js"]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_walk_custom_exclusions_replace_defaults() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "vendor/lib.js", 1);
        write(temp.path(), "node_modules/x/index.js", 1);

        let outcome = FileWalker::new(temp.path())
            .excluding(["vendor"])
            .walk()
            .unwrap();

        assert_eq!(paths(&outcome), vec!["node_modules/x/index.js"]);
    }

    #[test]
    fn test_walk_order_is_stable_and_sorted() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.js", 1);
        write(temp.path(), "a/z.js", 1);
        write(temp.path(), "a/b.js", 1);
        write(temp.path(), "c.css", 1);

        let walker = FileWalker::new(temp.path());
        let first = paths(&walker.walk().unwrap());
        let second = paths(&walker.walk().unwrap());

        assert_eq!(first, vec!["a/b.js", "a/z.js", "b.js", "c.css"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_walk_includes_zero_byte_files_and_sums_sizes() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "empty.js", 0);
        write(temp.path(), "app.js", 2048);
        write(temp.path(), "styles/app.css", 512);

        let outcome = FileWalker::new(temp.path()).walk().unwrap();

        assert_eq!(outcome.files.len(), 3);
        assert_eq!(outcome.total_size(), 2560);
    }

    #[test]
    fn test_walk_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = FileWalker::new(temp.path().join("missing"))
            .walk()
            .unwrap_err();
        assert!(matches!(err, WalkError::RootNotFound(_)));
    }

    #[test]
    fn test_walk_file_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "file.js", 1);
        let err = FileWalker::new(temp.path().join("file.js"))
            .walk()
            .unwrap_err();
        assert!(matches!(err, WalkError::NotADirectory(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_symlinked_file_reports_target_size() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "real/app.js", 300);
        std::os::unix::fs::symlink(
            temp.path().join("real/app.js"),
            temp.path().join("link.js"),
        )
        .unwrap();

        let outcome = FileWalker::new(temp.path()).walk().unwrap();
        let link = outcome
            .files
            .iter()
            .find(|f| f.display_path() == "link.js")
            .unwrap();
        assert_eq!(link.size_bytes, 300);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_dangling_symlink_becomes_warning() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "app.js", 5);
        std::os::unix::fs::symlink(temp.path().join("gone.js"), temp.path().join("dangling.js"))
            .unwrap();

        let outcome = FileWalker::new(temp.path()).walk().unwrap();

        assert_eq!(paths(&outcome), vec!["app.js"]);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("dangling.js"));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_follow_symlinked_directories() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "real/app.js", 5);
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();

        let outcome = FileWalker::new(temp.path()).walk().unwrap();

        assert_eq!(paths(&outcome), vec!["real/app.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_non_utf8_name_is_recorded_and_serializes_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"bad\xff.js");
        fs::write(temp.path().join(name), b"x").unwrap();

        let outcome = FileWalker::new(temp.path()).walk().unwrap();
        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].category, ExtensionCategory::Script);

        let json = serde_json::to_string(&outcome.files[0]).unwrap();
        assert!(json.contains("bad\u{FFFD}.js"));
    }

    #[test]
    fn test_extension_category_classification() {
        let cases = [
            ("a.js", ExtensionCategory::Script),
            ("a.MJS", ExtensionCategory::Script),
            ("a.css", ExtensionCategory::Style),
            ("index.html", ExtensionCategory::Markup),
            ("logo.svg", ExtensionCategory::Image),
            ("font.woff2", ExtensionCategory::Font),
            ("a.js.br", ExtensionCategory::Compressed),
            ("a.css.map", ExtensionCategory::SourceMap),
            ("manifest.json", ExtensionCategory::Data),
            ("LICENSE", ExtensionCategory::Other),
        ];
        for (name, expected) in cases {
            assert_eq!(ExtensionCategory::from_path(Path::new(name)), expected, "{}", name);
        }
    }
}
