//! Top-level error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes
//! - Documentation links
//! - Proper exit codes for CI/CD
//!
//! # Examples
//!
//! ```no_run
//! use perf_audit::config::ConfigFile;
//! use perf_audit::error::AuditError;
//! use perf_audit::pipeline::{AuditPipeline, NoOpObserver, PipelineOptions};
//!
//! let pipeline = AuditPipeline::new("./web", ConfigFile::default(), PipelineOptions::default());
//!
//! match pipeline.run(&NoOpObserver) {
//!     Ok(outcome) => println!("Score: {}/100", outcome.score),
//!     Err(e) => {
//!         let error = AuditError::from(e);
//!         eprintln!("Audit failed: {}", error);
//!         std::process::exit(error.exit_code());
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::config::CONFIG_FILE_NAME;
use crate::pipeline::PipelineError;
use crate::report::ReportError;

/// Audit errors with contextual suggestions
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration file failed to parse or validate
    #[error("Invalid configuration in {path}: {message}")]
    InvalidConfig {
        /// Path to config file
        path: PathBuf,
        /// Parse or validation message
        message: String,
    },

    /// A report file could not be written
    #[error("Failed to write report to {path}")]
    ReportWrite {
        /// Destination path
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Report could not be serialized
    #[error("Failed to serialize report")]
    ReportSerialize(#[source] serde_json::Error),

    /// Audit pipeline aborted
    #[error("audit failed: {0}")]
    Pipeline(#[from] PipelineError),
}

impl From<ReportError> for AuditError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Write { path, source } => Self::ReportWrite { path, source },
            ReportError::Serialize(source) => Self::ReportSerialize(source),
        }
    }
}

impl AuditError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use perf_audit::error::AuditError;
    /// use perf_audit::pipeline::PipelineError;
    /// use std::path::PathBuf;
    ///
    /// let error = AuditError::from(PipelineError::RootNotFound(PathBuf::from("./web")));
    ///
    /// let suggestion = error.suggestion();
    /// assert!(suggestion.unwrap().contains("--root"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidConfig { path, .. } => Some(format!(
                "Fix or remove {} (keys are kebab-case, e.g. large-file-kb = 100)",
                path.display()
            )),
            Self::ReportWrite { .. } => Some(
                "Choose a writable directory with --output-dir, or skip files with --no-report"
                    .to_string(),
            ),
            Self::ReportSerialize(_) => None,
            Self::Pipeline(e) => match e {
                PipelineError::RootNotFound(_) => Some(
                    "Pass the project directory with --root, or run from the project root"
                        .to_string(),
                ),
                PipelineError::NotADirectory(path) => Some(format!(
                    "Point --root at the directory containing {}, not at a file",
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "package.json".to_string())
                )),
                PipelineError::RootUnreadable { path, .. } => Some(format!(
                    "Check that {} is readable by the current user",
                    path.display()
                )),
            },
        }
    }

    /// Get documentation URL for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use perf_audit::error::AuditError;
    /// use std::path::PathBuf;
    ///
    /// let error = AuditError::InvalidConfig {
    ///     path: PathBuf::from(".perf-audit.toml"),
    ///     message: "expected an integer".to_string(),
    /// };
    ///
    /// assert_eq!(error.docs_url(), Some("https://toml.io/en/v1.0.0"));
    /// ```
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::InvalidConfig { .. } => Some("https://toml.io/en/v1.0.0"),
            Self::Pipeline(PipelineError::NotADirectory(_)) => {
                Some("https://docs.npmjs.com/cli/configuring-npm/package-json")
            }
            _ => None,
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes based on the error type, following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use perf_audit::error::AuditError;
    /// use perf_audit::pipeline::PipelineError;
    /// use std::path::PathBuf;
    ///
    /// let missing = AuditError::from(PipelineError::RootNotFound(PathBuf::from("./web")));
    /// assert_eq!(missing.exit_code(), 66);
    ///
    /// let config = AuditError::InvalidConfig {
    ///     path: PathBuf::from(".perf-audit.toml"),
    ///     message: "bad".to_string(),
    /// };
    /// assert_eq!(config.exit_code(), 65);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig { .. } => 65, // EX_DATAERR
            Self::ReportWrite { .. } => 74,   // EX_IOERR
            Self::ReportSerialize(_) => 70,   // EX_SOFTWARE
            Self::Pipeline(e) => match e {
                PipelineError::RootNotFound(_) => 66,     // EX_NOINPUT
                PipelineError::NotADirectory(_) => 66,    // EX_NOINPUT
                PipelineError::RootUnreadable { .. } => 74, // EX_IOERR
            },
        }
    }

    /// Build an [`AuditError::InvalidConfig`] for the config file in `root`
    pub fn invalid_config(root: &std::path::Path, error: &anyhow::Error) -> Self {
        Self::InvalidConfig {
            path: root.join(CONFIG_FILE_NAME),
            message: format!("{:#}", error),
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions and documentation links
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        // Main error message
        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(audit_error) = error.downcast_ref::<AuditError>() {
            if let Some(suggestion) = audit_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }

            if let Some(docs) = audit_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(audit_error) = error.downcast_ref::<AuditError>() {
            audit_error.exit_code()
        } else {
            1 // Generic error
        }
    }
}
