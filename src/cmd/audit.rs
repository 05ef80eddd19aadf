//! Audit command implementation
//!
//! Thin presentation layer for the default command.
//! Business logic lives in `pipeline::AuditPipeline`.

use anyhow::Result;
use console::{style, Term};
use std::path::{Path, PathBuf};

use crate::cmd::progress::PhaseSpinner;
use crate::config::{ConfigFile, ConfigLoader};
use crate::error::AuditError;
use crate::fmt::{marker, CHECKMARK};
use crate::pipeline::{AuditPipeline, PhaseObserver, PipelineOptions};
use crate::report::console::render_console;
use crate::report::json::to_json;
use crate::report::{AuditReport, RenderOptions, ReportWriter};

/// Options of the audit command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditArgs {
    /// Project root
    pub root: PathBuf,
    /// Report directory, defaults to the project root
    pub output_dir: Option<PathBuf>,
    /// Print JSON instead of console text
    pub json: bool,
    /// Also write the HTML report
    pub html: bool,
    /// Skip build output analysis
    pub performance_only: bool,
    /// Skip manifest and code pattern analysis
    pub bundle_only: bool,
    /// Write no report files
    pub no_report: bool,
    /// Recommendations shown, overrides the config
    pub top: Option<usize>,
    /// ASCII markers instead of emoji
    pub no_emoji: bool,
}

impl AuditArgs {
    /// Arguments for auditing `root` with every default
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            skip_build: self.performance_only,
            skip_source: self.bundle_only,
        }
    }

    fn render_options(&self, config: &ConfigFile) -> RenderOptions {
        RenderOptions {
            top: self.top.unwrap_or(config.top_recommendations),
            plain: self.no_emoji,
        }
    }

    fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.root)
    }
}

/// Load configuration for the project
///
/// # Errors
/// Returns [`AuditError::InvalidConfig`] when `.perf-audit.toml` exists but
/// cannot be read, parsed or validated.
pub fn load_config(root: &Path) -> Result<ConfigFile, AuditError> {
    ConfigLoader::load(root).map_err(|e| AuditError::invalid_config(root, &e))
}

/// Run the audit and build the report without printing anything
///
/// # Examples
///
/// ```no_run
/// use perf_audit::cmd::audit::{audit_report, AuditArgs};
/// use perf_audit::pipeline::NoOpObserver;
///
/// let report = audit_report(&AuditArgs::for_root("./web"), &NoOpObserver)?;
/// println!("Score: {}/100", report.score);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn audit_report(args: &AuditArgs, observer: &dyn PhaseObserver) -> Result<AuditReport> {
    let config = load_config(&args.root)?;
    let outcome = AuditPipeline::new(&args.root, config, args.pipeline_options())
        .run(observer)
        .map_err(AuditError::from)?;

    Ok(AuditReport::from_outcome(&outcome))
}

/// Write the requested report files and return their paths
pub fn write_reports(
    args: &AuditArgs,
    report: &AuditReport,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>, AuditError> {
    if args.no_report {
        return Ok(Vec::new());
    }

    let writer = ReportWriter::new(args.output_dir());
    let mut written = vec![writer.write_json(report)?];
    if args.html {
        written.push(writer.write_html(report, options)?);
    }
    Ok(written)
}

/// Main audit command handler (presentation layer)
///
/// # Examples
///
/// ```no_run
/// use perf_audit::cmd::audit::{cmd_audit, AuditArgs};
///
/// // Console report plus performance-report.json in the project root
/// cmd_audit(&AuditArgs::for_root("."))?;
///
/// // JSON on stdout for CI/CD, no files
/// cmd_audit(&AuditArgs {
///     json: true,
///     no_report: true,
///     ..AuditArgs::for_root(".")
/// })?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_audit(args: &AuditArgs) -> Result<()> {
    let config = load_config(&args.root)?;
    let options = args.render_options(&config);

    let spinner = PhaseSpinner::new(args.json || !Term::stderr().is_term());
    let result = AuditPipeline::new(&args.root, config, args.pipeline_options()).run(&spinner);
    spinner.finish();
    let outcome = result.map_err(AuditError::from)?;
    let report = AuditReport::from_outcome(&outcome);

    if args.json {
        let json = to_json(&report).map_err(AuditError::ReportSerialize)?;
        println!("{}", json);
    } else {
        print!("{}", render_console(&report, &options));
    }

    let written = write_reports(args, &report, &options)?;
    if !args.json {
        for path in written {
            println!(
                "\n{} Report written to {}",
                marker(CHECKMARK, options.plain),
                style(path.display()).bold()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{NoOpObserver, Section};
    use crate::report::{HTML_REPORT_FILE, JSON_REPORT_FILE};
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name": "storefront", "dependencies": {"vue": "3.4.0", "moment": "2.30.0"}}"#,
        )
        .unwrap();
        fs::create_dir_all(temp.path().join("dist")).unwrap();
        fs::write(temp.path().join("dist/app.js"), "var a=1;").unwrap();
        temp
    }

    #[test]
    fn test_audit_report_uses_package_name() {
        let temp = project();
        let report = audit_report(&AuditArgs::for_root(temp.path()), &NoOpObserver).unwrap();

        assert_eq!(report.project_name, "storefront");
        assert!(report.manifest.is_available());
        assert!(report.build.is_available());
    }

    #[test]
    fn test_flags_map_to_pipeline_options() {
        let temp = project();
        let args = AuditArgs {
            performance_only: true,
            ..AuditArgs::for_root(temp.path())
        };

        let report = audit_report(&args, &NoOpObserver).unwrap();
        assert_eq!(report.build, Section::Skipped);
        assert!(report.manifest.is_available());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp = project();
        fs::write(temp.path().join(".perf-audit.toml"), "large-file-kb = 0\n").unwrap();

        let err = audit_report(&AuditArgs::for_root(temp.path()), &NoOpObserver).unwrap_err();
        let audit_error = err.downcast_ref::<AuditError>().unwrap();
        assert_eq!(audit_error.exit_code(), 65);
    }

    #[test]
    fn test_missing_root_exit_code() {
        let temp = TempDir::new().unwrap();
        let args = AuditArgs::for_root(temp.path().join("missing"));

        let err = audit_report(&args, &NoOpObserver).unwrap_err();
        assert_eq!(crate::error::ErrorFormatter::exit_code(&err), 66);
    }

    #[test]
    fn test_write_reports_respects_flags() {
        let temp = project();
        let report = audit_report(&AuditArgs::for_root(temp.path()), &NoOpObserver).unwrap();
        let options = RenderOptions::default();

        let out = temp.path().join("reports");
        let args = AuditArgs {
            html: true,
            output_dir: Some(out.clone()),
            ..AuditArgs::for_root(temp.path())
        };
        let written = write_reports(&args, &report, &options).unwrap();
        assert_eq!(written, vec![out.join(JSON_REPORT_FILE), out.join(HTML_REPORT_FILE)]);

        let args = AuditArgs {
            no_report: true,
            html: true,
            ..AuditArgs::for_root(temp.path())
        };
        assert!(write_reports(&args, &report, &options).unwrap().is_empty());
        assert!(!temp.path().join(JSON_REPORT_FILE).exists());
    }

    #[test]
    fn test_top_flag_overrides_config() {
        let args = AuditArgs {
            top: Some(3),
            no_emoji: true,
            ..AuditArgs::for_root("/web")
        };
        let options = args.render_options(&ConfigFile::default());
        assert_eq!(options.top, 3);
        assert!(options.plain);

        let defaults = AuditArgs::for_root("/web").render_options(&ConfigFile::default());
        assert_eq!(defaults.top, ConfigFile::default().top_recommendations);
    }
}
