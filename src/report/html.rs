//! Self-contained HTML report
//!
//! The page carries its own stylesheet and no scripts, so it can be opened
//! straight from disk or attached to a CI run.

use super::{AuditReport, RenderOptions};
use crate::analyzer::recommendations::{top_recommendations, Priority};
use crate::analyzer::ProjectType;
use crate::fmt::format_bytes;
use crate::pipeline::Section;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 0; background: #f5f6f8; color: #1f2328; }
main { max-width: 960px; margin: 0 auto; padding: 32px 24px; }
h1 { margin-bottom: 4px; }
.meta { color: #656d76; font-size: 14px; }
.score { display: flex; align-items: center; gap: 16px; margin: 24px 0; }
.score-value { font-size: 40px; font-weight: 700; }
.score-good { color: #1a7f37; }
.score-fair { color: #9a6700; }
.score-poor { color: #cf222e; }
.bar { flex: 1; height: 12px; background: #d0d7de; border-radius: 6px; overflow: hidden; }
.bar-fill { height: 100%; background: currentColor; }
section { background: #fff; border: 1px solid #d0d7de; border-radius: 8px; padding: 16px 20px; margin-bottom: 16px; }
h2 { font-size: 18px; margin-top: 0; }
table { border-collapse: collapse; width: 100%; font-size: 14px; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #eaeef2; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.note { color: #656d76; font-style: italic; }
.rec { border-left: 4px solid #d0d7de; padding: 8px 12px; margin: 12px 0; }
.rec-high { border-color: #cf222e; }
.rec-medium { border-color: #9a6700; }
.rec-low { border-color: #0969da; }
.badge { font-size: 12px; font-weight: 600; padding: 2px 6px; border-radius: 4px; background: #eaeef2; }
code { font-family: ui-monospace, SFMono-Regular, Menlo, monospace; font-size: 13px; }
"#;

/// Escape text for HTML element content and attribute values
///
/// # Examples
///
/// ```
/// use perf_audit::report::html::html_escape;
///
/// assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn html_escape(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

fn score_class(score: u8) -> &'static str {
    match score {
        80..=100 => "score-good",
        50..=79 => "score-fair",
        _ => "score-poor",
    }
}

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "rec-high",
        Priority::Medium => "rec-medium",
        Priority::Low => "rec-low",
    }
}

fn section_note<T>(section: &Section<T>, html: &mut String) {
    match section {
        Section::Available(_) => {}
        Section::Unavailable { reason } => html.push_str(&format!(
            "<p class=\"note\">Unavailable: {}</p>\n",
            html_escape(reason)
        )),
        Section::Skipped => html.push_str("<p class=\"note\">Skipped</p>\n"),
    }
}

/// Render the report as a complete HTML document
pub fn render_html(report: &AuditReport, options: &RenderOptions) -> String {
    let title = format!("Performance Report: {}", report.project_name);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(&title)));
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<main>\n");

    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} {} &middot; {} &middot; generated {}</p>\n",
        html_escape(&report.tool),
        html_escape(&report.version),
        html_escape(&report.project_root.display().to_string()),
        html_escape(&report.generated_at.to_rfc3339())
    ));

    html.push_str(&format!(
        "<div class=\"score {}\"><span class=\"score-value\">{}/100</span>\
         <div class=\"bar\"><div class=\"bar-fill\" style=\"width: {}%\"></div></div></div>\n",
        score_class(report.score),
        report.score,
        report.score.min(100)
    ));

    render_recommendations(report, options, &mut html);
    render_project(report, &mut html);
    render_code(report, &mut html);
    render_build(report, &mut html);
    render_warnings(report, &mut html);

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_recommendations(report: &AuditReport, options: &RenderOptions, html: &mut String) {
    html.push_str("<section>\n<h2>Recommendations</h2>\n");
    if report.recommendations.is_empty() {
        html.push_str("<p>No issues found</p>\n</section>\n");
        return;
    }

    for rec in top_recommendations(&report.recommendations, options.top) {
        html.push_str(&format!(
            "<div class=\"rec {}\">\n<p><span class=\"badge\">{}</span> <strong>{}</strong>: {}</p>\n",
            priority_class(rec.priority),
            rec.priority.label(),
            html_escape(&rec.category),
            html_escape(&rec.issue)
        ));
        html.push_str(&format!("<p>Fix: {}</p>\n", html_escape(&rec.solution)));
        if let Some(impact) = &rec.impact {
            html.push_str(&format!("<p>Impact: {}</p>\n", html_escape(impact)));
        }
        if !rec.files.is_empty() {
            html.push_str("<ul>\n");
            for file in &rec.files {
                html.push_str(&format!("<li><code>{}</code></li>\n", html_escape(file)));
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");
}

fn render_project(report: &AuditReport, html: &mut String) {
    html.push_str("<section>\n<h2>Project</h2>\n");
    let Section::Available(manifest) = &report.manifest else {
        html.push_str(&format!(
            "<p>Framework: {}</p>\n",
            ProjectType::Unknown.label()
        ));
        section_note(&report.manifest, html);
        html.push_str("</section>\n");
        return;
    };

    html.push_str("<table>\n");
    html.push_str(&format!(
        "<tr><th>Framework</th><td>{}</td></tr>\n",
        manifest.project_type.label()
    ));
    let bundler = manifest
        .bundler
        .as_ref()
        .map(|b| b.bundler.label())
        .unwrap_or("not detected");
    html.push_str(&format!("<tr><th>Bundler</th><td>{}</td></tr>\n", bundler));
    let shaking = if manifest.tree_shaking.detected {
        format!(
            "configured via {}",
            manifest.tree_shaking.source.as_deref().unwrap_or("unknown source")
        )
    } else {
        "no signal found".to_string()
    };
    html.push_str(&format!(
        "<tr><th>Tree shaking</th><td>{}</td></tr>\n",
        html_escape(&shaking)
    ));
    html.push_str(&format!(
        "<tr><th>Dependencies</th><td>{} (+{} dev)</td></tr>\n",
        manifest.dependency_count, manifest.dev_dependency_count
    ));
    html.push_str("</table>\n");

    let findings: Vec<_> = manifest
        .heavy_dependencies
        .iter()
        .chain(&manifest.duplicate_dependencies)
        .collect();
    if !findings.is_empty() {
        html.push_str("<ul>\n");
        for finding in findings {
            html.push_str(&format!(
                "<li><code>{}</code>: {}</li>\n",
                html_escape(&finding.name),
                html_escape(&finding.packages.join(", "))
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");
}

fn render_code(report: &AuditReport, html: &mut String) {
    html.push_str("<section>\n<h2>Code patterns</h2>\n");
    let Section::Available(code) = &report.code else {
        section_note(&report.code, html);
        html.push_str("</section>\n");
        return;
    };

    html.push_str(&format!("<p>{} files scanned</p>\n", code.files_scanned));
    if code.issues.is_empty() {
        html.push_str("</section>\n");
        return;
    }

    html.push_str("<table>\n<tr><th>File</th><th>Line</th><th>Issue</th><th>Snippet</th></tr>\n");
    for issue in &code.issues {
        html.push_str(&format!(
            "<tr><td><code>{}</code></td><td class=\"num\">{}</td><td>{}</td><td><code>{}</code></td></tr>\n",
            html_escape(&issue.file.display().to_string()),
            issue.line.map(|l| l.to_string()).unwrap_or_default(),
            issue.kind.label(),
            html_escape(&issue.snippet)
        ));
    }
    html.push_str("</table>\n</section>\n");
}

fn render_build(report: &AuditReport, html: &mut String) {
    html.push_str("<section>\n<h2>Build output</h2>\n");
    let Section::Available(build) = &report.build else {
        section_note(&report.build, html);
        html.push_str("</section>\n");
        return;
    };

    html.push_str("<table>\n<tr><th>Directory</th><th>Files</th><th>Size</th></tr>\n");
    for dir in &build.directories {
        html.push_str(&format!(
            "<tr><td><code>{}</code></td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n",
            html_escape(&dir.directory),
            dir.file_count,
            format_bytes(dir.total_size_bytes)
        ));
    }
    html.push_str("</table>\n");

    let oversized = build.oversized_files();
    if !oversized.is_empty() {
        html.push_str("<h3>Oversized files</h3>\n<table>\n");
        for file in oversized {
            html.push_str(&format!(
                "<tr><td><code>{}</code></td><td class=\"num\">{}</td></tr>\n",
                html_escape(&file.display_path()),
                format_bytes(file.size_bytes)
            ));
        }
        html.push_str("</table>\n");
    }

    if let Section::Available(chunking) = &report.chunking {
        html.push_str(&format!(
            "<p>Code splitting: {}</p>\n",
            if chunking.code_splitting_detected {
                format!("detected ({} chunks)", chunking.chunk_files.len())
            } else {
                "not detected".to_string()
            }
        ));
    }
    if let Section::Available(compression) = &report.compression {
        html.push_str(&format!(
            "<p>Compression: {} gzip, {} brotli</p>\n",
            compression.gzip_files.len(),
            compression.brotli_files.len()
        ));
    }
    html.push_str("</section>\n");
}

fn render_warnings(report: &AuditReport, html: &mut String) {
    if report.warnings.is_empty() {
        return;
    }

    html.push_str("<section>\n<h2>Warnings</h2>\n<ul>\n");
    for warning in &report.warnings {
        html.push_str(&format!("<li>{}</li>\n", html_escape(warning)));
    }
    html.push_str("</ul>\n</section>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_report;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("plain"), "plain");
        assert_eq!(html_escape("it's"), "it&#39;s");
        assert_eq!(html_escape("a && b"), "a &amp;&amp; b");
    }

    #[test]
    fn test_html_document_is_self_contained() {
        let html = render_html(&sample_report(), &RenderOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("<link"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_html_escapes_report_text() {
        let html = render_html(&sample_report(), &RenderOptions::default());

        assert!(html.contains("shop &lt;web&gt;"));
        assert!(!html.contains("shop <web>"));
        assert!(html.contains("console.log(&quot;&lt;b&gt;&quot;)"));
    }

    #[test]
    fn test_html_lists_recommendations_and_sizes() {
        let html = render_html(&sample_report(), &RenderOptions::default());

        assert!(html.contains("60/100"));
        assert!(html.contains("Code Splitting"));
        assert!(html.contains("2.00 MB"));
        let high = html.find("rec-high\"").unwrap();
        let low = html.find("rec-low\"").unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_html_empty_recommendations() {
        let mut report = sample_report();
        report.recommendations.clear();

        let html = render_html(&report, &RenderOptions::default());
        assert!(html.contains("No issues found"));
    }

    #[test]
    fn test_html_unavailable_section() {
        let mut report = sample_report();
        report.build = Section::unavailable("no build output found (looked for dist, build)");

        let html = render_html(&report, &RenderOptions::default());
        assert!(html.contains("Unavailable: no build output found"));
    }
}
