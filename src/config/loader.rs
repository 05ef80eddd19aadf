//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .perf-audit.toml in the given directory
    ///
    /// Returns the default configuration when the file does not exist.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use perf_audit::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("Large file threshold: {} KB", config.large_file_kb);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(project_root: &Path) -> Result<ConfigFile> {
        Self::load_with_fs(project_root, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(project_root: &Path, fs: &FS) -> Result<ConfigFile> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(e).context("Failed to read .perf-audit.toml");
            }
        };

        let config: ConfigFile =
            toml_edit::de::from_str(&contents).context("Failed to parse .perf-audit.toml")?;

        config
            .validate()
            .context("Invalid threshold configuration")?;

        debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct MockFileSystem {
        file_content: Option<String>,
        should_fail_read: bool,
    }

    impl MockFileSystem {
        fn with_content(content: &str) -> Self {
            Self {
                file_content: Some(content.to_string()),
                should_fail_read: false,
            }
        }

        fn with_read_error() -> Self {
            Self {
                file_content: None,
                should_fail_read: true,
            }
        }
    }

    impl FileSystem for MockFileSystem {
        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            if self.should_fail_read {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "permission denied",
                ));
            }
            self.file_content
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "file not found"))
        }

        fn write(&self, _path: &Path, _contents: impl AsRef<[u8]>) -> io::Result<()> {
            unimplemented!()
        }

        fn metadata(&self, _path: &Path) -> io::Result<std::fs::Metadata> {
            unimplemented!()
        }

        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            unimplemented!()
        }
    }

    #[test]
    fn test_loader_missing_file_returns_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load(temp.path()).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_loader_loads_from_valid_toml() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"
large-file-kb = 64
top-recommendations = 5
source-extensions = ["ts", "tsx"]
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(temp.path()).unwrap();
        assert_eq!(config.large_file_kb, 64);
        assert_eq!(config.top_recommendations, 5);
        assert_eq!(config.source_extensions, vec!["ts", "tsx"]);
    }

    #[test]
    fn test_loader_invalid_toml_returns_parse_error() {
        let fs = MockFileSystem::with_content("large-file-kb = [not valid");
        let err = ConfigLoader::load_with_fs(Path::new("/project"), &fs).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_loader_invalid_thresholds_rejected() {
        let fs = MockFileSystem::with_content("split-candidate-kb = 4096");
        let err = ConfigLoader::load_with_fs(Path::new("/project"), &fs).unwrap_err();
        assert!(err.to_string().contains("Invalid threshold configuration"));
    }

    #[test]
    fn test_loader_rejects_threshold_too_large_for_bytes() {
        let fs = MockFileSystem::with_content("total-budget-kb = 18014398509481984");
        let err = ConfigLoader::load_with_fs(Path::new("/project"), &fs).unwrap_err();
        assert!(format!("{:#}", err).contains("total-budget-kb"));
    }

    #[test]
    fn test_loader_read_error_propagates() {
        let fs = MockFileSystem::with_read_error();
        let err = ConfigLoader::load_with_fs(Path::new("/project"), &fs).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
