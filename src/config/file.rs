//! Configuration file data structures

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".perf-audit.toml";

/// Build output directories probed when the config does not list any
pub const DEFAULT_BUILD_DIRS: &[&str] = &["dist", "build", "out", ".next"];

/// Directory names never descended into
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules"];

/// Extensions treated as scannable source code
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] =
    &["js", "jsx", "ts", "tsx", "mjs", "cjs", "vue", "svelte"];

/// Largest KB threshold whose byte value fits in a `u64`
pub const MAX_THRESHOLD_KB: u64 = u64::MAX / 1024;

/// perf-audit configuration file structure
///
/// Every key is optional; missing keys take the documented default.
///
/// # Examples
///
/// ```
/// use perf_audit::config::ConfigFile;
///
/// let config: ConfigFile = toml_edit::de::from_str("large-file-kb = 250").unwrap();
/// assert_eq!(config.large_file_kb, 250);
/// assert_eq!(config.oversized_file_kb, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConfigFile {
    /// Source files above this size (KB) are reported as large
    pub large_file_kb: u64,

    /// Build files above this size (KB) are reported as oversized
    pub oversized_file_kb: u64,

    /// Non-chunk scripts above this size (KB) are code-splitting candidates
    pub split_candidate_kb: u64,

    /// Scripts above this size (KB) trigger a code-splitting recommendation
    pub code_split_file_kb: u64,

    /// Total build output above this size (KB) triggers a bundle-size recommendation
    pub total_budget_kb: u64,

    /// Inline style occurrences tolerated before recommending extraction
    pub inline_style_limit: usize,

    /// Average line length above which a script counts as minified
    pub minified_line_length: u64,

    /// Number of largest scripts sampled for the minification heuristic
    pub minification_samples: usize,

    /// Number of recommendations shown in console and HTML output
    pub top_recommendations: usize,

    /// Candidate build output directories, relative to the project root
    pub build_dirs: Vec<String>,

    /// Directory names skipped while walking
    pub excluded_dirs: Vec<String>,

    /// File extensions (without dot) scanned for code patterns
    pub source_extensions: Vec<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            large_file_kb: 100,
            oversized_file_kb: 100,
            split_candidate_kb: 500,
            code_split_file_kb: 1024,
            total_budget_kb: 5 * 1024,
            inline_style_limit: 10,
            minified_line_length: 500,
            minification_samples: 3,
            top_recommendations: 10,
            build_dirs: to_strings(DEFAULT_BUILD_DIRS),
            excluded_dirs: to_strings(DEFAULT_EXCLUDED_DIRS),
            source_extensions: to_strings(DEFAULT_SOURCE_EXTENSIONS),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ConfigFile {
    /// Validate thresholds
    ///
    /// Ensures: all size thresholds are non-zero, KB thresholds are at most
    /// [`MAX_THRESHOLD_KB`], oversized <= split-candidate <= code-split, and
    /// at least one source extension is configured.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("large-file-kb", self.large_file_kb),
            ("oversized-file-kb", self.oversized_file_kb),
            ("split-candidate-kb", self.split_candidate_kb),
            ("code-split-file-kb", self.code_split_file_kb),
            ("total-budget-kb", self.total_budget_kb),
            ("minified-line-length", self.minified_line_length),
        ];
        for (key, value) in thresholds {
            if value == 0 {
                anyhow::bail!("{} must be greater than zero", key);
            }
            if key.ends_with("-kb") && value > MAX_THRESHOLD_KB {
                anyhow::bail!("{} ({}) must not exceed {}", key, value, MAX_THRESHOLD_KB);
            }
        }

        if self.oversized_file_kb > self.split_candidate_kb {
            anyhow::bail!(
                "oversized-file-kb ({} KB) cannot exceed split-candidate-kb ({} KB)",
                self.oversized_file_kb,
                self.split_candidate_kb
            );
        }

        if self.split_candidate_kb > self.code_split_file_kb {
            anyhow::bail!(
                "split-candidate-kb ({} KB) cannot exceed code-split-file-kb ({} KB)",
                self.split_candidate_kb,
                self.code_split_file_kb
            );
        }

        if self.source_extensions.is_empty() {
            anyhow::bail!("source-extensions must list at least one extension");
        }

        Ok(())
    }

    /// Byte threshold for large source files
    pub fn large_file_bytes(&self) -> u64 {
        self.large_file_kb.saturating_mul(1024)
    }

    /// Byte threshold for oversized build files
    pub fn oversized_file_bytes(&self) -> u64 {
        self.oversized_file_kb.saturating_mul(1024)
    }

    /// Byte threshold for code-splitting candidates
    pub fn split_candidate_bytes(&self) -> u64 {
        self.split_candidate_kb.saturating_mul(1024)
    }

    /// Byte threshold for the per-script code-splitting rule
    pub fn code_split_file_bytes(&self) -> u64 {
        self.code_split_file_kb.saturating_mul(1024)
    }

    /// Byte threshold for the total bundle-size rule
    pub fn total_budget_bytes(&self) -> u64 {
        self.total_budget_kb.saturating_mul(1024)
    }

    /// Whether the extension (without dot, any case) is a source extension
    pub fn is_source_extension(&self, ext: &str) -> bool {
        self.source_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}
