//! Configuration management for perf-audit
//!
//! This module provides:
//! - `.perf-audit.toml` config file support
//! - Threshold defaults and validation

pub mod file;
pub mod loader;

pub use file::{ConfigFile, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name_constant_is_correct() {
        assert_eq!(CONFIG_FILE_NAME, ".perf-audit.toml");
    }
}
