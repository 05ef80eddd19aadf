//! Package manifest inspection
//!
//! Reads `package.json`, classifies declared dependencies against the known
//! heavy-package database and the duplicate-purpose groups, and runs the
//! framework, bundler and tree-shaking detection tables.

use super::detection::{
    detect_bundler, detect_framework, detect_tree_shaking, BundlerDetection, ProjectType,
    TreeShakingSignal,
};
use super::known_deps::{heavy_package_info, DUPLICATE_GROUPS};
use super::Inspection;
use crate::infra::{FileSystem, RealFileSystem};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest file name
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Errors reading the manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No manifest in the project root
    #[error("package.json not found at {0}")]
    Missing(PathBuf),

    /// Manifest exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        /// Manifest path
        path: PathBuf,
        /// I/O error
        #[source]
        source: io::Error,
    },

    /// Manifest is not a valid package.json object
    #[error("Malformed {path}: {source}")]
    Malformed {
        /// Manifest path
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },
}

/// The parts of `package.json` the audit reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,
    /// Package version
    #[serde(default)]
    pub version: Option<String>,
    /// Runtime dependencies (name -> version range)
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Development dependencies (name -> version range)
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    /// npm scripts
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    /// `sideEffects` hint for bundlers (boolean or file list)
    #[serde(default)]
    pub side_effects: Option<serde_json::Value>,
}

impl PackageManifest {
    /// Whether the package appears in dependencies or devDependencies
    pub fn declares(&self, package: &str) -> bool {
        self.dependencies.contains_key(package) || self.dev_dependencies.contains_key(package)
    }

    /// Every package named in dependencies or devDependencies, in name order
    pub fn declared_packages(&self) -> BTreeSet<&str> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .map(String::as_str)
            .collect()
    }
}

/// Kind of dependency finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    /// Known heavy package
    Heavy,
    /// Several packages with the same purpose
    DuplicateGroup,
}

/// A dependency classification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFinding {
    /// Declared package name (heavy) or group label (duplicate-group)
    pub name: String,
    /// Finding kind
    pub category: FindingCategory,
    /// Declared packages involved
    pub packages: Vec<String>,
    /// How to reduce the cost
    pub size_savings_hint: String,
}

/// Manifest analysis results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestReport {
    /// Package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Package version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Detected framework
    pub project_type: ProjectType,
    /// Detected bundler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundler: Option<BundlerDetection>,
    /// Tree-shaking evidence
    pub tree_shaking: TreeShakingSignal,
    /// Number of runtime dependencies
    pub dependency_count: usize,
    /// Number of development dependencies
    pub dev_dependency_count: usize,
    /// npm script names
    pub scripts: Vec<String>,
    /// Known heavy declared dependencies
    pub heavy_dependencies: Vec<DependencyFinding>,
    /// Duplicate-purpose declared dependency groups
    pub duplicate_dependencies: Vec<DependencyFinding>,
}

/// Reads and classifies the project manifest
pub struct ManifestInspector<FS: FileSystem = RealFileSystem> {
    project_root: PathBuf,
    fs: FS,
}

impl ManifestInspector<RealFileSystem> {
    /// Create an inspector for the given project root
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_fs(project_root, RealFileSystem)
    }
}

impl<FS: FileSystem> ManifestInspector<FS> {
    /// Create an inspector with a custom filesystem implementation
    pub fn with_fs(project_root: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            project_root: project_root.into(),
            fs,
        }
    }

    /// Read and parse `package.json`
    pub fn read_manifest(&self) -> Result<PackageManifest, ManifestError> {
        let path = self.project_root.join(MANIFEST_FILE_NAME);
        let contents = match self.fs.read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ManifestError::Missing(path));
            }
            Err(source) => return Err(ManifestError::Unreadable { path, source }),
        };

        serde_json::from_str(&contents).map_err(|source| ManifestError::Malformed { path, source })
    }

    /// Inspect the manifest
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use perf_audit::analyzer::ManifestInspector;
    ///
    /// let inspection = ManifestInspector::new(".").inspect()?;
    /// println!("Framework: {}", inspection.report.project_type.label());
    /// # Ok::<(), perf_audit::analyzer::manifest::ManifestError>(())
    /// ```
    pub fn inspect(&self) -> Result<Inspection<ManifestReport>, ManifestError> {
        let manifest = self.read_manifest()?;
        Ok(self.classify(&manifest))
    }

    /// Classify an already parsed manifest
    pub fn classify(&self, manifest: &PackageManifest) -> Inspection<ManifestReport> {
        let mut warnings = Vec::new();

        let project_type = detect_framework(manifest);
        let bundler = detect_bundler(&self.project_root, manifest, &self.fs);
        let tree_shaking = detect_tree_shaking(
            &self.project_root,
            manifest,
            bundler.as_ref(),
            &self.fs,
            &mut warnings,
        );

        let heavy_dependencies = find_heavy_dependencies(manifest);
        let duplicate_dependencies = find_duplicate_groups(manifest);

        debug!(
            "Manifest: {:?}, bundler {:?}, {} heavy, {} duplicate groups",
            project_type,
            bundler.as_ref().map(|b| b.bundler),
            heavy_dependencies.len(),
            duplicate_dependencies.len()
        );

        Inspection {
            report: ManifestReport {
                name: manifest.name.clone(),
                version: manifest.version.clone(),
                project_type,
                bundler,
                tree_shaking,
                dependency_count: manifest.dependencies.len(),
                dev_dependency_count: manifest.dev_dependencies.len(),
                scripts: manifest.scripts.keys().cloned().collect(),
                heavy_dependencies,
                duplicate_dependencies,
            },
            warnings,
        }
    }

    /// Project root
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

/// Declared packages found in the heavy-package database, in name order
pub fn find_heavy_dependencies(manifest: &PackageManifest) -> Vec<DependencyFinding> {
    manifest
        .declared_packages()
        .into_iter()
        .filter_map(|name| {
            heavy_package_info(name).map(|info| DependencyFinding {
                name: name.to_string(),
                category: FindingCategory::Heavy,
                packages: vec![name.to_string()],
                size_savings_hint: format!(
                    "{} (~{}-{} KB gzipped). {}",
                    info.reason, info.size_kb.0, info.size_kb.1, info.savings_hint
                ),
            })
        })
        .collect()
}

/// Duplicate-purpose groups with two or more declared members
pub fn find_duplicate_groups(manifest: &PackageManifest) -> Vec<DependencyFinding> {
    DUPLICATE_GROUPS
        .iter()
        .filter_map(|group| {
            let declared: Vec<String> = group
                .members
                .iter()
                .filter(|m| manifest.declares(m))
                .map(|m| m.to_string())
                .collect();

            (declared.len() >= 2).then(|| DependencyFinding {
                name: group.label.to_string(),
                category: FindingCategory::DuplicateGroup,
                packages: declared,
                size_savings_hint: group.savings_hint.to_string(),
            })
        })
        .collect()
}
