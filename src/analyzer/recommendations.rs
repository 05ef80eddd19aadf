//! Recommendation rules and scoring
//!
//! Rules are independent and evaluated in a fixed order. A rule whose input
//! section is not available is skipped rather than guessed.

use super::build_output::{sort_by_size_desc, BuildFile};
use super::patterns::IssueKind;
use super::walker::display_path;
use crate::config::ConfigFile;
use crate::fmt::format_bytes;
use crate::pipeline::AnalysisContext;
use log::debug;
use serde::{Deserialize, Serialize};

/// Largest scripts reported by the per-file code-splitting rule
const CODE_SPLIT_FILE_LIMIT: usize = 3;

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Large measurable impact
    High,
    /// Worth fixing
    Medium,
    /// Nice to have
    Low,
}

impl Priority {
    /// Sort rank, lower first
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Score penalty
    pub fn penalty(&self) -> u32 {
        match self {
            Self::High => 15,
            Self::Medium => 10,
            Self::Low => 5,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// An optimization recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Category, e.g. "Bundle Size"
    pub category: String,
    /// Priority
    pub priority: Priority,
    /// What was found
    pub issue: String,
    /// What to do about it
    pub solution: String,
    /// Expected effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// Size involved, when the finding is about bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Files involved
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl Recommendation {
    /// Create a recommendation without impact, size or files
    pub fn new(
        category: impl Into<String>,
        priority: Priority,
        issue: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            priority,
            issue: issue.into(),
            solution: solution.into(),
            impact: None,
            size_bytes: None,
            files: Vec::new(),
        }
    }

    /// Set the expected impact
    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    /// Set the size involved
    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    /// Set the files involved
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }
}

/// Score from a recommendation list: 100 minus penalties, floored at 0
///
/// # Examples
///
/// ```
/// use perf_audit::analyzer::recommendations::{score, Priority, Recommendation};
///
/// assert_eq!(score(&[]), 100);
/// let high = Recommendation::new("Bundle Size", Priority::High, "big", "split");
/// assert_eq!(score(&[high]), 85);
/// ```
pub fn score(recommendations: &[Recommendation]) -> u8 {
    let penalty: u32 = recommendations.iter().map(|r| r.priority.penalty()).sum();
    // Bounded by the saturating subtraction
    100u32.saturating_sub(penalty) as u8
}

/// The `n` most important recommendations; equal priorities keep rule order
pub fn top_recommendations(recommendations: &[Recommendation], n: usize) -> Vec<&Recommendation> {
    let mut sorted: Vec<&Recommendation> = recommendations.iter().collect();
    sorted.sort_by_key(|r| r.priority.rank());
    sorted.truncate(n);
    sorted
}

/// Evaluates the fixed rule table against an analysis context
pub struct RecommendationEngine<'a> {
    config: &'a ConfigFile,
}

impl<'a> RecommendationEngine<'a> {
    /// Create an engine using the configured thresholds
    pub fn new(config: &'a ConfigFile) -> Self {
        Self { config }
    }

    /// Run every rule in order
    ///
    /// # Examples
    ///
    /// ```
    /// use perf_audit::analyzer::RecommendationEngine;
    /// use perf_audit::config::ConfigFile;
    /// use perf_audit::pipeline::AnalysisContext;
    ///
    /// let config = ConfigFile::default();
    /// let ctx = AnalysisContext::new(".", config.clone());
    /// // Nothing analyzed, nothing to recommend
    /// assert!(RecommendationEngine::new(&config).evaluate(&ctx).is_empty());
    /// ```
    pub fn evaluate(&self, ctx: &AnalysisContext) -> Vec<Recommendation> {
        let mut recs = Vec::new();

        self.bundle_size(ctx, &mut recs);
        self.oversized_scripts(ctx, &mut recs);
        self.tree_shaking(ctx, &mut recs);
        self.compression(ctx, &mut recs);
        self.bundler(ctx, &mut recs);
        self.heavy_dependencies(ctx, &mut recs);
        self.duplicate_dependencies(ctx, &mut recs);
        self.large_source_files(ctx, &mut recs);
        self.inline_styles(ctx, &mut recs);
        self.console_statements(ctx, &mut recs);
        self.dom_queries(ctx, &mut recs);
        self.framework(ctx, &mut recs);

        debug!("Generated {} recommendations", recs.len());
        recs
    }

    fn bundle_size(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(build) = ctx.build() else { return };
        if build.total_size_bytes <= self.config.total_budget_bytes() {
            return;
        }

        recs.push(
            Recommendation::new(
                "Bundle Size",
                Priority::High,
                format!(
                    "Total build output is {} (budget {})",
                    format_bytes(build.total_size_bytes),
                    format_bytes(self.config.total_budget_bytes())
                ),
                "Split vendor code, lazy-load routes and remove unused dependencies",
            )
            .with_impact("Faster initial load and less data transferred")
            .with_size(build.total_size_bytes),
        );
    }

    fn oversized_scripts(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(build) = ctx.build() else { return };

        let threshold = self.config.code_split_file_bytes();
        let mut large: Vec<BuildFile> = build
            .scripts()
            .filter(|s| s.size_bytes > threshold)
            .cloned()
            .collect();
        sort_by_size_desc(&mut large);

        for script in large.iter().take(CODE_SPLIT_FILE_LIMIT) {
            recs.push(
                Recommendation::new(
                    "Code Splitting",
                    Priority::High,
                    format!(
                        "{} is {}",
                        script.display_path(),
                        format_bytes(script.size_bytes)
                    ),
                    "Split this bundle with dynamic import() at route or feature boundaries",
                )
                .with_impact("Smaller initial chunk; code loads when needed")
                .with_size(script.size_bytes)
                .with_files([script.display_path()]),
            );
        }
    }

    fn tree_shaking(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(manifest) = ctx.manifest() else {
            return;
        };
        if manifest.tree_shaking.detected {
            return;
        }

        recs.push(
            Recommendation::new(
                "Tree Shaking",
                Priority::Medium,
                "No tree-shaking configuration found",
                "Add \"sideEffects\": false to package.json (or list files with side effects) and enable usedExports in the bundler",
            )
            .with_impact("Unused exports are dropped from the bundle"),
        );
    }

    fn compression(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        if ctx.build().is_none() {
            return;
        }
        let Some(compression) = ctx.compression() else {
            return;
        };

        if !compression.has_gzip() {
            recs.push(
                Recommendation::new(
                    "Compression",
                    Priority::Medium,
                    "No gzip-compressed assets found in build output",
                    "Pre-compress assets at build time (compression-webpack-plugin, vite-plugin-compression) or enable gzip on the server",
                )
                .with_impact("Text assets typically shrink by 60-80%"),
            );
        }

        if !compression.has_brotli() {
            recs.push(
                Recommendation::new(
                    "Compression",
                    Priority::Low,
                    "No brotli-compressed assets found in build output",
                    "Emit .br files alongside gzip and serve them to clients that accept br",
                )
                .with_impact("Brotli is typically 15-25% smaller than gzip"),
            );
        }
    }

    fn bundler(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(detection) = ctx.manifest().and_then(|m| m.bundler.as_ref()) else {
            return;
        };

        let (issue, solution) = detection.bundler.advice();
        recs.push(Recommendation::new("Bundler", Priority::Low, issue, solution));
    }

    fn heavy_dependencies(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(manifest) = ctx.manifest() else {
            return;
        };

        for finding in &manifest.heavy_dependencies {
            recs.push(
                Recommendation::new(
                    "Dependencies",
                    Priority::High,
                    format!("Heavy dependency: {}", finding.name),
                    finding.size_savings_hint.clone(),
                )
                .with_files(finding.packages.iter().cloned()),
            );
        }
    }

    fn duplicate_dependencies(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(manifest) = ctx.manifest() else {
            return;
        };

        for finding in &manifest.duplicate_dependencies {
            recs.push(
                Recommendation::new(
                    "Dependencies",
                    Priority::Medium,
                    format!(
                        "Multiple {}: {}",
                        finding.name,
                        finding.packages.join(", ")
                    ),
                    finding.size_savings_hint.clone(),
                )
                .with_files(finding.packages.iter().cloned()),
            );
        }
    }

    fn large_source_files(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(code) = ctx.code() else { return };
        let files = code.files_with(IssueKind::LargeFile);
        if files.is_empty() {
            return;
        }

        recs.push(
            Recommendation::new(
                "Code Splitting",
                Priority::High,
                format!(
                    "{} source file(s) larger than {} KB",
                    files.len(),
                    self.config.large_file_kb
                ),
                "Break large modules into smaller ones and lazy-load rarely used parts",
            )
            .with_files(files.iter().map(|f| display_path(f))),
        );
    }

    fn inline_styles(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(code) = ctx.code() else { return };
        let count = code.counts.inline_styles;
        if count <= self.config.inline_style_limit {
            return;
        }

        let files = code.files_with(IssueKind::InlineStyle);
        recs.push(
            Recommendation::new(
                "Styling",
                Priority::Medium,
                format!("{} inline style objects found", count),
                "Move styles to CSS modules or a stylesheet; inline objects are recreated on every render",
            )
            .with_files(files.iter().map(|f| display_path(f))),
        );
    }

    fn console_statements(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(code) = ctx.code() else { return };
        let count = code.counts.console_statements;
        if count == 0 {
            return;
        }

        let files = code.files_with(IssueKind::ConsoleStatement);
        recs.push(
            Recommendation::new(
                "Production",
                Priority::Medium,
                format!("{} console statement(s) left in source", count),
                "Remove debug logging or strip it in production builds (drop_console in terser)",
            )
            .with_files(files.iter().map(|f| display_path(f))),
        );
    }

    fn dom_queries(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(code) = ctx.code() else { return };
        let count = code.counts.dom_queries;
        if count == 0 {
            return;
        }

        let files = code.files_with(IssueKind::DomQueryInComponent);
        recs.push(
            Recommendation::new(
                "Framework Usage",
                Priority::Low,
                format!("{} direct DOM quer(ies) in component code", count),
                "Use framework refs instead of querying the document",
            )
            .with_files(files.iter().map(|f| display_path(f))),
        );
    }

    fn framework(&self, ctx: &AnalysisContext, recs: &mut Vec<Recommendation>) {
        let Some(manifest) = ctx.manifest() else {
            return;
        };
        let Some((issue, solution)) = manifest.project_type.advice() else {
            return;
        };

        recs.push(Recommendation::new("Framework", Priority::Low, issue, solution));
    }
}
