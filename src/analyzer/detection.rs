//! Framework, bundler and tree-shaking detection
//!
//! Detection is a set of ordered decision tables: each row pairs a predicate
//! with a label and the first matching row wins.

use super::manifest::PackageManifest;
use crate::infra::FileSystem;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Confidence attached to heuristic signals
///
/// Heuristics never claim certainty, so there is no "high" level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Weak or conflicting evidence
    Low,
    /// Consistent evidence from a heuristic
    Medium,
}

/// Project type inferred from declared dependencies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    /// React
    React,
    /// Vue
    Vue,
    /// Angular
    Angular,
    /// Svelte
    Svelte,
    /// Next.js
    NextJs,
    /// Nuxt
    Nuxt,
    /// Gatsby
    Gatsby,
    /// Preact
    Preact,
    /// SolidJS
    SolidJs,
    /// No known framework declared
    #[default]
    Unknown,
}

/// Framework decision table, evaluated top to bottom
///
/// UI frameworks come before meta-frameworks.
pub const FRAMEWORK_TABLE: &[(&str, ProjectType)] = &[
    ("react", ProjectType::React),
    ("vue", ProjectType::Vue),
    ("@angular/core", ProjectType::Angular),
    ("svelte", ProjectType::Svelte),
    ("next", ProjectType::NextJs),
    ("nuxt", ProjectType::Nuxt),
    ("gatsby", ProjectType::Gatsby),
    ("preact", ProjectType::Preact),
    ("solid-js", ProjectType::SolidJs),
];

impl ProjectType {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::React => "React",
            Self::Vue => "Vue",
            Self::Angular => "Angular",
            Self::Svelte => "Svelte",
            Self::NextJs => "Next.js",
            Self::Nuxt => "Nuxt",
            Self::Gatsby => "Gatsby",
            Self::Preact => "Preact",
            Self::SolidJs => "SolidJS",
            Self::Unknown => "Unknown (plain JavaScript)",
        }
    }

    /// Framework-specific advice as (issue, solution)
    pub fn advice(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::React => Some((
                "React components may re-render or load eagerly",
                "Use React.lazy() with Suspense for route-level splitting and React.memo for hot components",
            )),
            Self::Vue => Some((
                "Vue components may be registered globally",
                "Use defineAsyncComponent() for heavy components and register components locally",
            )),
            Self::Angular => Some((
                "Angular modules may be eagerly loaded",
                "Use lazy-loaded routes (loadChildren/loadComponent) and OnPush change detection",
            )),
            Self::Svelte => Some((
                "Svelte routes may ship in a single bundle",
                "Use dynamic import() for rarely visited routes",
            )),
            Self::NextJs => Some((
                "Next.js pages may import heavy client-side modules",
                "Use next/dynamic for heavy client components and next/image for images",
            )),
            Self::Nuxt => Some((
                "Nuxt components may be hydrated eagerly",
                "Use lazy component prefixes (<LazyFoo>) and nuxt/image",
            )),
            Self::Gatsby => Some((
                "Gatsby sites may ship large page bundles",
                "Use gatsby-plugin-image and loadable-components for heavy sections",
            )),
            Self::Preact => Some((
                "Preact apps may pull React compat code",
                "Avoid preact/compat unless a dependency requires it",
            )),
            Self::SolidJs => Some((
                "SolidJS routes may load eagerly",
                "Use lazy() from solid-js for route components",
            )),
            Self::Unknown => None,
        }
    }
}

/// Detect the project type from the manifest
///
/// # Examples
///
/// ```
/// use perf_audit::analyzer::detection::{detect_framework, ProjectType};
/// use perf_audit::analyzer::manifest::PackageManifest;
///
/// let manifest: PackageManifest =
///     serde_json::from_str(r#"{"dependencies": {"vue": "^3.4.0"}}"#).unwrap();
/// assert_eq!(detect_framework(&manifest), ProjectType::Vue);
/// ```
pub fn detect_framework(manifest: &PackageManifest) -> ProjectType {
    FRAMEWORK_TABLE
        .iter()
        .find(|(package, _)| manifest.declares(package))
        .map(|(_, project_type)| *project_type)
        .unwrap_or_default()
}

/// Build tool producing the bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bundler {
    /// Webpack (including Create React App)
    Webpack,
    /// Vite
    Vite,
    /// Rollup
    Rollup,
}

impl Bundler {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Webpack => "Webpack",
            Self::Vite => "Vite",
            Self::Rollup => "Rollup",
        }
    }

    /// Bundler-specific advice as (issue, solution)
    pub fn advice(&self) -> (&'static str, &'static str) {
        match self {
            Self::Webpack => (
                "Webpack build may not split vendor code",
                "Enable optimization.splitChunks with chunks: 'all' and set mode: 'production'",
            ),
            Self::Vite => (
                "Vite build may emit a single large vendor chunk",
                "Configure build.rollupOptions.output.manualChunks and check output with rollup-plugin-visualizer",
            ),
            Self::Rollup => (
                "Rollup output may not be minified or split",
                "Add @rollup/plugin-terser and use output.manualChunks for vendor code",
            ),
        }
    }
}

struct BundlerRule {
    bundler: Bundler,
    config_files: &'static [&'static str],
    packages: &'static [&'static str],
}

const BUNDLER_TABLE: &[BundlerRule] = &[
    BundlerRule {
        bundler: Bundler::Webpack,
        config_files: &[
            "webpack.config.js",
            "webpack.config.ts",
            "webpack.config.mjs",
            "webpack.config.cjs",
        ],
        packages: &["webpack", "react-scripts"],
    },
    BundlerRule {
        bundler: Bundler::Vite,
        config_files: &[
            "vite.config.js",
            "vite.config.ts",
            "vite.config.mjs",
            "vite.config.mts",
        ],
        packages: &["vite"],
    },
    BundlerRule {
        bundler: Bundler::Rollup,
        config_files: &["rollup.config.js", "rollup.config.mjs", "rollup.config.ts"],
        packages: &["rollup"],
    },
];

/// Detected bundler and, if present, its config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlerDetection {
    /// Bundler
    pub bundler: Bundler,
    /// Config file name relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
}

/// Detect the bundler from config files and declared packages
pub fn detect_bundler<FS: FileSystem>(
    root: &Path,
    manifest: &PackageManifest,
    fs: &FS,
) -> Option<BundlerDetection> {
    BUNDLER_TABLE.iter().find_map(|rule| {
        let config_file = rule
            .config_files
            .iter()
            .find(|name| fs.exists(&root.join(name)))
            .map(|name| name.to_string());
        let declared = rule.packages.iter().any(|p| manifest.declares(p));

        if config_file.is_some() || declared {
            debug!("Detected bundler {:?} (config: {:?})", rule.bundler, config_file);
            Some(BundlerDetection {
                bundler: rule.bundler,
                config_file,
            })
        } else {
            None
        }
    })
}

/// Literal substrings in a bundler config that indicate tree shaking is configured
pub const TREE_SHAKING_MARKERS: [&str; 2] = ["sideEffects", "usedExports"];

/// Evidence that dead-code elimination is configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeShakingSignal {
    /// Whether a signal was found
    pub detected: bool,
    /// Where the signal was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Heuristic confidence
    pub confidence: Confidence,
}

/// Look for a tree-shaking signal in the manifest, then in the bundler config
///
/// Config read failures are pushed onto `warnings`.
pub fn detect_tree_shaking<FS: FileSystem>(
    root: &Path,
    manifest: &PackageManifest,
    bundler: Option<&BundlerDetection>,
    fs: &FS,
    warnings: &mut Vec<String>,
) -> TreeShakingSignal {
    if manifest.side_effects.is_some() {
        return TreeShakingSignal {
            detected: true,
            source: Some("package.json sideEffects".to_string()),
            confidence: Confidence::Medium,
        };
    }

    if let Some(config_file) = bundler.and_then(|b| b.config_file.as_deref()) {
        match fs.read_to_string(&root.join(config_file)) {
            Ok(content) => {
                if let Some(marker) = TREE_SHAKING_MARKERS.iter().find(|m| content.contains(*m)) {
                    return TreeShakingSignal {
                        detected: true,
                        source: Some(format!("{} ({})", config_file, marker)),
                        confidence: Confidence::Medium,
                    };
                }
            }
            Err(e) => {
                let message = format!("Failed to read {}: {}", config_file, e);
                warn!("{}", message);
                warnings.push(message);
            }
        }
    }

    TreeShakingSignal {
        detected: false,
        source: None,
        confidence: Confidence::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::RealFileSystem;
    use tempfile::TempDir;

    fn manifest(json: &str) -> PackageManifest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_detect_framework_first_match_wins() {
        let m = manifest(r#"{"dependencies": {"next": "14.0.0", "react": "18.2.0"}}"#);
        assert_eq!(detect_framework(&m), ProjectType::React);
    }

    #[test]
    fn test_detect_framework_meta_framework_alone() {
        let m = manifest(r#"{"dependencies": {"nuxt": "^3.0.0"}}"#);
        assert_eq!(detect_framework(&m), ProjectType::Nuxt);
    }

    #[test]
    fn test_detect_framework_reads_dev_dependencies() {
        let m = manifest(r#"{"devDependencies": {"svelte": "^4.0.0"}}"#);
        assert_eq!(detect_framework(&m), ProjectType::Svelte);
    }

    #[test]
    fn test_detect_framework_without_framework_is_unknown() {
        let m = manifest(r#"{"dependencies": {"express": "^4.18.0", "react-icons": "^5.0.0"}}"#);
        assert_eq!(detect_framework(&m), ProjectType::Unknown);
        assert!(ProjectType::Unknown.advice().is_none());
    }

    #[test]
    fn test_detect_bundler_from_config_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("vite.config.ts"), "export default {}").unwrap();
        let m = manifest("{}");

        let detection = detect_bundler(temp.path(), &m, &RealFileSystem).unwrap();
        assert_eq!(detection.bundler, Bundler::Vite);
        assert_eq!(detection.config_file.as_deref(), Some("vite.config.ts"));
    }

    #[test]
    fn test_detect_bundler_from_declared_package() {
        let temp = TempDir::new().unwrap();
        let m = manifest(r#"{"dependencies": {"react-scripts": "5.0.1"}}"#);

        let detection = detect_bundler(temp.path(), &m, &RealFileSystem).unwrap();
        assert_eq!(detection.bundler, Bundler::Webpack);
        assert!(detection.config_file.is_none());
    }

    #[test]
    fn test_detect_bundler_none() {
        let temp = TempDir::new().unwrap();
        assert!(detect_bundler(temp.path(), &manifest("{}"), &RealFileSystem).is_none());
    }

    #[test]
    fn test_tree_shaking_from_manifest_side_effects() {
        let temp = TempDir::new().unwrap();
        let m = manifest(r#"{"sideEffects": false}"#);
        let mut warnings = Vec::new();

        let signal = detect_tree_shaking(temp.path(), &m, None, &RealFileSystem, &mut warnings);
        assert!(signal.detected);
        assert_eq!(signal.confidence, Confidence::Medium);
    }

    #[test]
    fn test_tree_shaking_from_bundler_config_marker() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("webpack.config.js"),
            "module.exports = { optimization: { usedExports: true } };",
        )
        .unwrap();
        let m = manifest(r#"{"devDependencies": {"webpack": "^5.0.0"}}"#);
        let bundler = detect_bundler(temp.path(), &m, &RealFileSystem);
        let mut warnings = Vec::new();

        let signal = detect_tree_shaking(
            temp.path(),
            &m,
            bundler.as_ref(),
            &RealFileSystem,
            &mut warnings,
        );
        assert!(signal.detected);
        assert!(signal.source.unwrap().contains("usedExports"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_tree_shaking_absent_is_low_confidence() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("rollup.config.js"), "export default {};").unwrap();
        let m = manifest("{}");
        let bundler = detect_bundler(temp.path(), &m, &RealFileSystem);
        let mut warnings = Vec::new();

        let signal = detect_tree_shaking(
            temp.path(),
            &m,
            bundler.as_ref(),
            &RealFileSystem,
            &mut warnings,
        );
        assert!(!signal.detected);
        assert_eq!(signal.confidence, Confidence::Low);
    }
}
