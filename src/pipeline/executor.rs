//! Audit pipeline executor
//!
//! Runs the analysis phases in a fixed order:
//! 1. Manifest inspection
//! 2. Project walk and code pattern scan
//! 3. Build output inspection
//! 4. Chunking and compression analysis of the build output
//! 5. Recommendation rules and score
//!
//! Phases run sequentially. A failing component degrades its section to
//! unavailable and the run continues; only a missing or unreadable project
//! root aborts.

use super::context::{AnalysisContext, PhaseTiming, Section};
use super::error::PipelineError;
use super::observer::{Phase, PhaseObserver};
use crate::analyzer::build_output::BuildOutputInspector;
use crate::analyzer::chunking::ChunkingAnalyzer;
use crate::analyzer::compression::CompressionInspector;
use crate::analyzer::manifest::ManifestInspector;
use crate::analyzer::patterns::CodePatternScanner;
use crate::analyzer::recommendations::{score, Recommendation, RecommendationEngine};
use crate::analyzer::walker::FileWalker;
use crate::config::ConfigFile;
use crate::infra::{FileSystem, RealFileSystem};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Which parts of the audit to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Skip build output, chunking and compression analysis
    pub skip_build: bool,
    /// Skip manifest and code pattern analysis
    pub skip_source: bool,
}

/// Result of a complete audit run
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    /// Every section, warning and phase timing
    pub context: AnalysisContext,
    /// Recommendations in rule order
    pub recommendations: Vec<Recommendation>,
    /// Score in [0, 100]
    pub score: u8,
}

/// Main audit orchestrator
///
/// # Examples
///
/// ```no_run
/// use perf_audit::config::ConfigFile;
/// use perf_audit::pipeline::{AuditPipeline, NoOpObserver, PipelineOptions};
///
/// let pipeline = AuditPipeline::new(".", ConfigFile::default(), PipelineOptions::default());
/// let outcome = pipeline.run(&NoOpObserver)?;
/// println!("Score: {}/100", outcome.score);
/// # Ok::<(), perf_audit::pipeline::PipelineError>(())
/// ```
pub struct AuditPipeline<FS: FileSystem = RealFileSystem> {
    project_root: PathBuf,
    config: ConfigFile,
    options: PipelineOptions,
    fs: FS,
}

impl AuditPipeline<RealFileSystem> {
    /// Create a pipeline for the given project root
    pub fn new(project_root: impl Into<PathBuf>, config: ConfigFile, options: PipelineOptions) -> Self {
        Self::with_fs(project_root, config, options, RealFileSystem)
    }
}

impl<FS: FileSystem + Sync> AuditPipeline<FS> {
    /// Create a pipeline with a custom filesystem implementation
    pub fn with_fs(
        project_root: impl Into<PathBuf>,
        config: ConfigFile,
        options: PipelineOptions,
        fs: FS,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            options,
            fs,
        }
    }

    /// Run every enabled phase
    ///
    /// # Errors
    /// Returns an error only if the project root is missing, not a directory
    /// or unreadable.
    pub fn run(&self, observer: &dyn PhaseObserver) -> Result<AuditOutcome, PipelineError> {
        FileWalker::with_fs(&self.project_root, &self.fs).check_root()?;

        let mut ctx = AnalysisContext::new(&self.project_root, self.config.clone());

        if self.options.skip_source {
            ctx.set_manifest(Section::Skipped);
            ctx.set_code(Section::Skipped);
        } else {
            self.timed(&mut ctx, observer, Phase::Manifest, |ctx| self.inspect_manifest(ctx));
            self.timed(&mut ctx, observer, Phase::CodeScan, |ctx| self.scan_code(ctx))?;
        }

        if self.options.skip_build {
            ctx.set_build(Section::Skipped);
            ctx.set_chunking(Section::Skipped);
            ctx.set_compression(Section::Skipped);
        } else {
            self.timed(&mut ctx, observer, Phase::BuildOutput, |ctx| self.inspect_build(ctx));
            self.timed(&mut ctx, observer, Phase::Chunking, |ctx| self.analyze_chunking(ctx));
            self.timed(&mut ctx, observer, Phase::Compression, |ctx| {
                self.inspect_compression(ctx)
            });
        }

        let recommendations = self.timed(&mut ctx, observer, Phase::Recommendations, |ctx| {
            RecommendationEngine::new(&self.config).evaluate(ctx)
        });
        let score = score(&recommendations);
        info!(
            "Audit finished: score {}, {} recommendations, {} warnings",
            score,
            recommendations.len(),
            ctx.warnings().len()
        );

        Ok(AuditOutcome {
            context: ctx,
            recommendations,
            score,
        })
    }

    fn timed<T>(
        &self,
        ctx: &mut AnalysisContext,
        observer: &dyn PhaseObserver,
        phase: Phase,
        run: impl FnOnce(&mut AnalysisContext) -> T,
    ) -> T {
        observer.phase_started(phase);
        let start = Instant::now();
        let output = run(ctx);
        let elapsed = start.elapsed();

        info!("Phase {} finished in {} ms", phase, elapsed.as_millis());
        ctx.record_phase(PhaseTiming {
            phase: phase.name().to_string(),
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
        observer.phase_finished(phase, elapsed);
        output
    }

    fn inspect_manifest(&self, ctx: &mut AnalysisContext) {
        let section = match ManifestInspector::with_fs(&self.project_root, &self.fs).inspect() {
            Ok(inspection) => {
                ctx.extend_warnings(inspection.warnings);
                Section::Available(inspection.report)
            }
            Err(e) => {
                ctx.warn(format!("Manifest analysis unavailable: {}", e));
                Section::unavailable(e.to_string())
            }
        };
        ctx.set_manifest(section);
    }

    fn scan_code(&self, ctx: &mut AnalysisContext) -> Result<(), PipelineError> {
        let inspection =
            CodePatternScanner::with_fs(&self.project_root, &self.config, &self.fs).scan_project()?;
        ctx.extend_warnings(inspection.warnings);
        ctx.set_code(Section::Available(inspection.report));
        Ok(())
    }

    fn inspect_build(&self, ctx: &mut AnalysisContext) {
        let inspector = BuildOutputInspector::with_fs(&self.project_root, &self.config, &self.fs);
        let section = match inspector.inspect() {
            Ok(inspection) => {
                ctx.extend_warnings(inspection.warnings);
                Section::Available(inspection.report)
            }
            Err(e) => {
                ctx.warn(format!("Build analysis unavailable: {}", e));
                Section::unavailable(e.to_string())
            }
        };
        ctx.set_build(section);
    }

    fn analyze_chunking(&self, ctx: &mut AnalysisContext) {
        let section = match ctx.build() {
            Some(build) => Section::Available(ChunkingAnalyzer::new(&self.config).analyze(build)),
            None => Section::unavailable("requires build output"),
        };
        ctx.set_chunking(section);
    }

    fn inspect_compression(&self, ctx: &mut AnalysisContext) {
        let inspection = ctx.build().map(|build| {
            CompressionInspector::with_fs(&self.project_root, &self.config, &self.fs)
                .inspect(build)
        });

        let section = match inspection {
            Some(inspection) => {
                ctx.extend_warnings(inspection.warnings);
                Section::Available(inspection.report)
            }
            None => Section::unavailable("requires build output"),
        };
        ctx.set_compression(section);
    }
}
