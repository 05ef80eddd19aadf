//! CLI interface tests
//!
//! Runs the perf-audit binary against fixture projects and checks flags,
//! output streams, report files and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;

mod common;
use common::fixtures;

/// Helper to get the perf-audit binary command
fn get_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_perf-audit"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag_displays_usage_information() {
    get_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Static performance audit"))
        .stdout(predicate::str::contains("--bundle-only"));
}

#[test]
fn test_cli_version_flag_displays_version_number() {
    get_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("perf-audit"));
}

#[test]
fn test_bundle_only_conflicts_with_performance_only() {
    let project = fixtures::react_vite_project();

    get_bin()
        .args(["--bundle-only", "--performance-only", "--no-report"])
        .arg("--root")
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_console_report_and_json_file() {
    let project = fixtures::react_vite_project();

    get_bin()
        .args(["--no-emoji", "--root"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Score:"))
        .stdout(predicate::str::contains("Framework: React"))
        .stdout(predicate::str::contains("Report written to"));

    let report = common::read_report_json(&project.path().join("performance-report.json"));
    assert_eq!(report["project_name"], "storefront");
    assert!(!project.path().join("performance-report.html").exists());
}

#[test]
fn test_json_flag_prints_parseable_json_only() {
    let project = fixtures::react_vite_project();

    let output = get_bin()
        .args(["--json", "--no-report", "--root"])
        .arg(project.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {stdout}"));
    assert_eq!(value["tool"], "perf-audit");
    assert_eq!(value["manifest"]["status"], "available");
    assert!(!value["recommendations"].as_array().unwrap().is_empty());
}

#[test]
fn test_no_report_writes_no_files() {
    let project = fixtures::react_vite_project();

    get_bin()
        .args(["--no-report", "--html", "--root"])
        .arg(project.path())
        .assert()
        .success();

    assert!(!project.path().join("performance-report.json").exists());
    assert!(!project.path().join("performance-report.html").exists());
}

#[test]
fn test_html_flag_writes_html_into_output_dir() {
    let project = fixtures::react_vite_project();
    let out = tempfile::TempDir::new().unwrap();

    get_bin()
        .args(["--html", "--root"])
        .arg(project.path())
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success();

    let html = std::fs::read_to_string(out.path().join("performance-report.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(!html.contains("<script"));
    assert!(out.path().join("performance-report.json").exists());
    assert!(!project.path().join("performance-report.json").exists());
}

#[test]
fn test_performance_only_skips_build_sections() {
    let project = fixtures::react_vite_project();

    let output = get_bin()
        .args(["--json", "--no-report", "--performance-only", "--root"])
        .arg(project.path())
        .output()
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["build"]["status"], "skipped");
    assert_eq!(value["compression"]["status"], "skipped");
    assert_eq!(value["code"]["status"], "available");
}

#[test]
fn test_missing_root_exits_with_noinput() {
    let temp = tempfile::TempDir::new().unwrap();

    get_bin()
        .arg("--root")
        .arg(temp.path().join("missing"))
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Project root not found"))
        .stderr(predicate::str::contains("help:"));
}

#[test]
fn test_invalid_config_exits_with_dataerr() {
    let project = fixtures::source_only_project()
        .file(".perf-audit.toml", "oversized-file-kb = 900\nsplit-candidate-kb = 100\n");

    get_bin()
        .args(["--no-report", "--root"])
        .arg(project.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains(".perf-audit.toml"));
}

#[test]
fn test_missing_build_output_is_not_fatal() {
    let project = fixtures::source_only_project();

    get_bin()
        .args(["--no-report", "--no-emoji", "--root"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("unavailable: no build output found"));
}

#[test]
fn test_completions_generate_script() {
    get_bin()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("perf-audit"))
        .stdout(predicate::str::contains("--performance-only"));
}
