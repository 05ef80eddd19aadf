//! Console report rendering

use super::{AuditReport, RenderOptions};
use crate::analyzer::recommendations::{top_recommendations, Priority};
use crate::fmt::{
    format_bytes, marker, truncate_start, BULB, CHART, CHECKMARK, MICROSCOPE, PACKAGE, ROCKET,
    WARNING,
};
use crate::pipeline::Section;
use console::style;

/// Width of the score bar in cells
pub const SCORE_BAR_WIDTH: usize = 20;

/// Oversized build files listed in the console
const OVERSIZED_SHOWN: usize = 3;

/// Files listed per recommendation
const FILES_SHOWN: usize = 5;

/// Longest path shown before truncation
const PATH_WIDTH: usize = 60;

/// Render a score as a fixed-width bar
///
/// # Examples
///
/// ```
/// use perf_audit::report::console::score_bar;
///
/// assert_eq!(score_bar(50, true), "[##########..........]");
/// assert_eq!(score_bar(100, true), "[####################]");
/// ```
pub fn score_bar(score: u8, plain: bool) -> String {
    let filled = (usize::from(score.min(100)) * SCORE_BAR_WIDTH) / 100;
    let (full, empty) = if plain { ("#", ".") } else { ("█", "░") };

    format!(
        "[{}{}]",
        full.repeat(filled),
        empty.repeat(SCORE_BAR_WIDTH - filled)
    )
}

fn styled_score(score: u8) -> String {
    let text = format!("{}/100", score);
    match score {
        80..=100 => style(text).green().bold().to_string(),
        50..=79 => style(text).yellow().bold().to_string(),
        _ => style(text).red().bold().to_string(),
    }
}

fn styled_priority(priority: Priority) -> String {
    let label = format!("[{}]", priority.label());
    match priority {
        Priority::High => style(label).red().bold().to_string(),
        Priority::Medium => style(label).yellow().to_string(),
        Priority::Low => style(label).cyan().to_string(),
    }
}

/// One line describing a section that has no results
fn section_note<T>(section: &Section<T>) -> Option<String> {
    match section {
        Section::Available(_) => None,
        Section::Unavailable { reason } => Some(format!("   unavailable: {}\n", reason)),
        Section::Skipped => Some("   skipped\n".to_string()),
    }
}

/// Render the full console report
pub fn render_console(report: &AuditReport, options: &RenderOptions) -> String {
    let plain = options.plain;
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} Performance Report\n",
        marker(ROCKET, plain),
        style(&report.tool).bold()
    ));
    out.push_str(&format!(
        "   Project: {} ({})\n",
        report.project_name,
        report.project_root.display()
    ));
    out.push_str(&format!("   Generated: {}\n\n", report.generated_at.to_rfc3339()));

    out.push_str(&format!(
        "{} Score: {} {}\n",
        marker(CHART, plain),
        styled_score(report.score),
        score_bar(report.score, plain)
    ));

    render_project(report, plain, &mut out);
    render_code(report, plain, &mut out);
    render_build(report, plain, &mut out);
    render_recommendations(report, options, &mut out);
    render_warnings(report, plain, &mut out);

    out
}

fn render_project(report: &AuditReport, plain: bool, out: &mut String) {
    out.push_str(&format!("\n{} {}\n", marker(PACKAGE, plain), style("Project").bold()));
    let manifest = match &report.manifest {
        Section::Available(manifest) => manifest,
        other => {
            out.push_str(&format!(
                "   Framework: {}\n",
                crate::analyzer::ProjectType::Unknown.label()
            ));
            out.extend(section_note(other));
            return;
        }
    };

    out.push_str(&format!("   Framework: {}\n", manifest.project_type.label()));
    match &manifest.bundler {
        Some(detection) => out.push_str(&format!(
            "   Bundler: {}{}\n",
            detection.bundler.label(),
            detection
                .config_file
                .as_ref()
                .map(|c| format!(" ({})", c))
                .unwrap_or_default()
        )),
        None => out.push_str("   Bundler: not detected\n"),
    }

    let shaking = &manifest.tree_shaking;
    if shaking.detected {
        out.push_str(&format!(
            "   Tree shaking: configured via {} ({} confidence)\n",
            shaking.source.as_deref().unwrap_or("unknown source"),
            confidence_label(shaking.confidence)
        ));
    } else {
        out.push_str(&format!(
            "   Tree shaking: no signal found ({} confidence)\n",
            confidence_label(shaking.confidence)
        ));
    }

    out.push_str(&format!(
        "   Dependencies: {} (+{} dev)\n",
        manifest.dependency_count, manifest.dev_dependency_count
    ));
    for finding in &manifest.heavy_dependencies {
        out.push_str(&format!("   {} heavy: {}\n", marker(WARNING, plain), finding.name));
    }
    for finding in &manifest.duplicate_dependencies {
        out.push_str(&format!(
            "   {} duplicate {}: {}\n",
            marker(WARNING, plain),
            finding.name,
            finding.packages.join(", ")
        ));
    }
}

fn confidence_label(confidence: crate::analyzer::Confidence) -> &'static str {
    match confidence {
        crate::analyzer::Confidence::Low => "low",
        crate::analyzer::Confidence::Medium => "medium",
    }
}

fn render_code(report: &AuditReport, plain: bool, out: &mut String) {
    out.push_str(&format!(
        "\n{} {}\n",
        marker(MICROSCOPE, plain),
        style("Code patterns").bold()
    ));
    let Section::Available(code) = &report.code else {
        out.extend(section_note(&report.code));
        return;
    };

    out.push_str(&format!("   Files scanned: {}\n", code.files_scanned));
    out.push_str(&format!(
        "   Large files: {}  Inline styles: {}  Console statements: {}  DOM queries: {}\n",
        code.counts.large_files,
        code.counts.inline_styles,
        code.counts.console_statements,
        code.counts.dom_queries
    ));
}

fn render_build(report: &AuditReport, plain: bool, out: &mut String) {
    out.push_str(&format!(
        "\n{} {}\n",
        marker(PACKAGE, plain),
        style("Build output").bold()
    ));
    let Section::Available(build) = &report.build else {
        out.extend(section_note(&report.build));
        return;
    };

    for dir in &build.directories {
        out.push_str(&format!(
            "   {}: {} in {} files ({} scripts, {} styles, {} other)\n",
            dir.directory,
            format_bytes(dir.total_size_bytes),
            dir.file_count,
            dir.script_files.len(),
            dir.style_files.len(),
            dir.asset_files.len()
        ));
    }
    if build.directories.len() > 1 {
        out.push_str(&format!("   Total: {}\n", format_bytes(build.total_size_bytes)));
    }

    let oversized = build.oversized_files();
    if !oversized.is_empty() {
        out.push_str(&format!("   Largest files ({} oversized):\n", oversized.len()));
        for file in oversized.iter().take(OVERSIZED_SHOWN) {
            out.push_str(&format!(
                "     {:<width$} {}\n",
                truncate_start(&file.display_path(), PATH_WIDTH),
                style(format_bytes(file.size_bytes)).yellow(),
                width = PATH_WIDTH
            ));
        }
    }

    match &report.chunking {
        Section::Available(chunking) if chunking.code_splitting_detected => {
            out.push_str(&format!(
                "   Code splitting: detected ({} chunks)\n",
                chunking.chunk_files.len()
            ));
        }
        Section::Available(_) => out.push_str("   Code splitting: not detected\n"),
        _ => {}
    }
    if let Section::Available(chunking) = &report.chunking {
        for candidate in &chunking.split_candidates {
            out.push_str(&format!(
                "     split candidate: {} ({})\n",
                candidate.display_path(),
                format_bytes(candidate.size_bytes)
            ));
        }
    }

    if let Section::Available(compression) = &report.compression {
        out.push_str(&format!(
            "   Compression: {} gzip, {} brotli\n",
            compression.gzip_files.len(),
            compression.brotli_files.len()
        ));
        let check = &compression.minification;
        if !check.samples.is_empty() {
            out.push_str(&format!(
                "   Minified: {} ({} confidence, {} sampled)\n",
                if check.likely_minified { "likely" } else { "unlikely" },
                confidence_label(check.confidence),
                check.samples.len()
            ));
        }
    }
}

fn render_recommendations(report: &AuditReport, options: &RenderOptions, out: &mut String) {
    let plain = options.plain;
    out.push_str(&format!(
        "\n{} {}\n",
        marker(BULB, plain),
        style("Recommendations").bold()
    ));

    if report.recommendations.is_empty() {
        out.push_str(&format!("   {} No issues found\n", marker(CHECKMARK, plain)));
        return;
    }

    let top = top_recommendations(&report.recommendations, options.top);
    if top.len() < report.recommendations.len() {
        out.push_str(&format!(
            "   Showing {} of {}\n",
            top.len(),
            report.recommendations.len()
        ));
    }

    for (index, rec) in top.iter().enumerate() {
        out.push_str(&format!(
            "\n   {}. {} {}: {}\n",
            index + 1,
            styled_priority(rec.priority),
            style(&rec.category).bold(),
            rec.issue
        ));
        out.push_str(&format!("      {} {}\n", style("fix:").green(), rec.solution));
        if let Some(impact) = &rec.impact {
            out.push_str(&format!("      impact: {}\n", impact));
        }
        if !rec.files.is_empty() {
            let shown: Vec<&str> = rec.files.iter().take(FILES_SHOWN).map(String::as_str).collect();
            let more = rec.files.len().saturating_sub(FILES_SHOWN);
            out.push_str(&format!("      files: {}", shown.join(", ")));
            if more > 0 {
                out.push_str(&format!(" (+{} more)", more));
            }
            out.push('\n');
        }
    }
}

fn render_warnings(report: &AuditReport, plain: bool, out: &mut String) {
    if report.warnings.is_empty() {
        return;
    }

    out.push_str(&format!(
        "\n{} {} ({})\n",
        marker(WARNING, plain),
        style("Warnings").yellow().bold(),
        report.warnings.len()
    ));
    for warning in &report.warnings {
        out.push_str(&format!("   - {}\n", warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_report;

    fn plain() -> RenderOptions {
        RenderOptions {
            top: 10,
            plain: true,
        }
    }

    #[test]
    fn test_score_bar_cells() {
        assert_eq!(score_bar(0, true), "[....................]");
        assert_eq!(score_bar(85, true), "[#################...]");
        assert_eq!(score_bar(100, false).chars().count(), SCORE_BAR_WIDTH + 2);
    }

    #[test]
    fn test_console_report_sections() {
        let text = render_console(&sample_report(), &plain());

        assert!(text.contains("60/100"));
        assert!(text.contains("Framework: React"));
        assert!(text.contains("Bundler: Vite (vite.config.ts)"));
        assert!(text.contains("Tree shaking: no signal found (low confidence)"));
        assert!(text.contains("Console statements: 1"));
        assert!(text.contains("dist/assets/index.js"));
        assert!(text.contains("Code splitting: not detected"));
        assert!(text.contains("Compression: 0 gzip, 0 brotli"));
        assert!(text.contains("Skipping unreadable path src/locked"));
    }

    #[test]
    fn test_console_recommendations_sorted_by_priority() {
        let text = render_console(&sample_report(), &plain());

        let high = text.find("[HIGH]").unwrap();
        let low = text.find("[LOW]").unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_console_top_limits_recommendations() {
        let options = RenderOptions {
            top: 1,
            plain: true,
        };
        let text = render_console(&sample_report(), &options);

        assert!(text.contains("Showing 1 of 2"));
        assert!(!text.contains("[LOW]"));
    }

    #[test]
    fn test_console_empty_recommendations() {
        let mut report = sample_report();
        report.recommendations.clear();

        let text = render_console(&report, &plain());
        assert!(text.contains("No issues found"));
    }

    #[test]
    fn test_console_unavailable_sections() {
        let mut report = sample_report();
        report.manifest = Section::unavailable("package.json not found at /work/shop/package.json");
        report.build = Section::Skipped;

        let text = render_console(&report, &plain());
        assert!(text.contains("Framework: Unknown"));
        assert!(text.contains("unavailable: package.json not found"));
        assert!(text.contains("skipped"));
    }

    #[test]
    fn test_plain_console_uses_ascii_markers() {
        let text = render_console(&sample_report(), &plain());
        assert!(!text.contains('🚀'));
        assert!(text.starts_with('>'));
    }
}
