//! Report persistence

use super::{html, json, AuditReport, RenderOptions, ReportError};
use crate::infra::{FileSystem, RealFileSystem};
use log::info;
use std::path::{Path, PathBuf};

/// File name of the persisted JSON report
pub const JSON_REPORT_FILE: &str = "performance-report.json";

/// File name of the persisted HTML report
pub const HTML_REPORT_FILE: &str = "performance-report.html";

/// Writes report files into an output directory
pub struct ReportWriter<FS: FileSystem = RealFileSystem> {
    output_dir: PathBuf,
    fs: FS,
}

impl ReportWriter<RealFileSystem> {
    /// Create a writer for the given output directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(output_dir, RealFileSystem)
    }
}

impl<FS: FileSystem> ReportWriter<FS> {
    /// Create a writer with a custom filesystem implementation
    pub fn with_fs(output_dir: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            output_dir: output_dir.into(),
            fs,
        }
    }

    /// Directory the reports are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the pretty JSON report and return its path
    pub fn write_json(&self, report: &AuditReport) -> Result<PathBuf, ReportError> {
        let content = json::to_json(report)?;
        self.write_file(JSON_REPORT_FILE, &content)
    }

    /// Write the HTML report and return its path
    pub fn write_html(
        &self,
        report: &AuditReport,
        options: &RenderOptions,
    ) -> Result<PathBuf, ReportError> {
        let content = html::render_html(report, options);
        self.write_file(HTML_REPORT_FILE, &content)
    }

    fn write_file(&self, file_name: &str, content: &str) -> Result<PathBuf, ReportError> {
        let path = self.output_dir.join(file_name);
        let to_error = |source| ReportError::Write {
            path: path.clone(),
            source,
        };

        self.fs.create_dir_all(&self.output_dir).map_err(to_error)?;
        self.fs.write(&path, content).map_err(to_error)?;

        info!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_report;
    use std::io;
    use tempfile::TempDir;

    struct ReadOnlyFileSystem;

    impl FileSystem for ReadOnlyFileSystem {
        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }

        fn metadata(&self, _path: &Path) -> io::Result<std::fs::Metadata> {
            unimplemented!()
        }

        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            unimplemented!()
        }

        fn write(&self, _path: &Path, _contents: impl AsRef<[u8]>) -> io::Result<()> {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            ))
        }
    }

    #[test]
    fn test_write_json_report() {
        let temp = TempDir::new().unwrap();
        let writer = ReportWriter::new(temp.path());

        let path = writer.write_json(&sample_report()).unwrap();

        assert_eq!(path, temp.path().join(JSON_REPORT_FILE));
        let parsed = json::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, sample_report());
    }

    #[test]
    fn test_write_html_creates_output_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("reports").join("perf");
        let writer = ReportWriter::new(&out);

        let path = writer
            .write_html(&sample_report(), &RenderOptions::default())
            .unwrap();

        assert_eq!(path, out.join(HTML_REPORT_FILE));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_write_failure_names_destination() {
        let writer = ReportWriter::with_fs("/reports", ReadOnlyFileSystem);

        let err = writer.write_json(&sample_report()).unwrap_err();

        match err {
            ReportError::Write { path, source } => {
                assert_eq!(path, Path::new("/reports").join(JSON_REPORT_FILE));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
