//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Project fixture builders
//! - Report parsing helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures::ProjectFixture;
//!
//! fn test_react_project() {
//!     let project = ProjectFixture::new()
//!         .manifest(r#"{"dependencies": {"react": "18.2.0"}}"#)
//!         .file("src/App.jsx", "console.log('hi')\n");
//! }
//! ```

pub mod fixtures;

/// Parse a performance-report.json file
#[allow(dead_code)]
pub fn read_report_json(path: &std::path::Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("invalid JSON in {}: {}", path.display(), e))
}
