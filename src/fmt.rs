//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Rocket emoji for launch/start operations
pub const ROCKET: Emoji = Emoji("🚀", ">");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Package emoji for bundle/build output sections
pub const PACKAGE: Emoji = Emoji("📦", "#");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Microscope emoji for analysis/inspection
pub const MICROSCOPE: Emoji = Emoji("🔍", ">>");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️", "!");

/// Light bulb emoji for suggestions
pub const BULB: Emoji = Emoji("💡", "->");

/// Pick the emoji or its ASCII fallback.
///
/// `console::Emoji` already falls back when the terminal cannot render
/// unicode; `plain` forces the fallback (for `--no-emoji` and CI logs).
///
/// # Examples
///
/// ```
/// use perf_audit::fmt::{marker, CHECKMARK};
///
/// assert_eq!(marker(CHECKMARK, true), "[OK]");
/// ```
pub fn marker(emoji: Emoji<'static, 'static>, plain: bool) -> String {
    if plain {
        emoji.1.to_string()
    } else {
        emoji.to_string()
    }
}

/// Format bytes with appropriate unit (B, KB, MB, GB)
///
/// # Examples
///
/// ```
/// use perf_audit::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Truncate string with a leading ellipsis if it exceeds max length
///
/// Paths keep their most specific (trailing) part visible.
///
/// # Examples
///
/// ```
/// use perf_audit::fmt::truncate_start;
///
/// assert_eq!(truncate_start("dist/app.js", 20), "dist/app.js");
/// assert_eq!(truncate_start("dist/assets/js/vendor.js", 12), "...vendor.js");
/// ```
pub fn truncate_start(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let tail: String = s.chars().skip(len - keep).collect();
    format!("...{}", tail)
}
