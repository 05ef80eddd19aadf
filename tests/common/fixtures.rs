//! Test fixture helpers for creating web projects
//!
//! Provides a builder for realistic project trees with package.json, source
//! files and build output directories.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary project directory, removed on drop
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Empty project directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Project root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write package.json
    pub fn manifest(self, json: &str) -> Self {
        self.file("package.json", json)
    }

    /// Write a file, creating parent directories
    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write fixture file");
        self
    }

    /// Write a file of `size` bytes
    pub fn sized_file(self, rel: &str, size: usize) -> Self {
        let content = "a".repeat(size);
        self.file(rel, &content)
    }
}

/// React project built with Vite, with a few source findings and a dist folder
pub fn react_vite_project() -> ProjectFixture {
    ProjectFixture::new()
        .manifest(
            r#"{
  "name": "storefront",
  "version": "1.0.0",
  "scripts": {"build": "vite build", "dev": "vite"},
  "dependencies": {"react": "18.2.0", "react-dom": "18.2.0", "moment": "2.30.0", "date-fns": "3.6.0"},
  "devDependencies": {"vite": "5.2.0"}
}"#,
        )
        .file("vite.config.ts", "export default { build: { minify: true } }\n")
        .file(
            "src/App.jsx",
            "export function App() {\n  console.log(\"render\");\n  return <div style={{color: 'red'}} />;\n}\n",
        )
        .file("src/main.jsx", "import { App } from './App';\n")
        .file("dist/index.html", "<!doctype html><div id=root></div>")
        .file("dist/assets/index-4f3a9c2b.js", "var a=1;var b=2;")
        .file("dist/assets/index-9d8e7f6a.css", "body{margin:0}")
}

/// Project with only package.json and sources, no build output
pub fn source_only_project() -> ProjectFixture {
    ProjectFixture::new()
        .manifest(r#"{"name": "plain-site", "dependencies": {}}"#)
        .file("src/index.js", "document.getElementById('x');\n")
}
