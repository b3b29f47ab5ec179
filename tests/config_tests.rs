// SPDX-License-Identifier: PMPL-1.0-or-later

//! Analyzer configuration loading

use codesift::{Analyzer, AnalyzerConfig, Language};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = AnalyzerConfig::default();
    assert_eq!(config.default_language, Language::JavaScript);
    assert_eq!(config.nesting_threshold, 4);
    assert_eq!(config.function_length_warn, 25);
    assert_eq!(config.function_length_fail, 40);
    assert_eq!(config.cache_capacity, 128);
    assert!(config.gateway_url.is_none());
    assert!(config.is_allowed_number(100.0));
    assert!(!config.is_allowed_number(42.0));
    assert!(config.is_detector_enabled("dead-code"));
}

#[test]
fn test_partial_json_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codesift.json");
    fs::write(
        &path,
        r#"{ "nesting_threshold": 2, "disabled_detectors": ["magic-numbers"] }"#,
    )
    .unwrap();

    let config = AnalyzerConfig::load(&path).unwrap();
    assert_eq!(config.nesting_threshold, 2);
    assert!(!config.is_detector_enabled("magic-numbers"));
    assert_eq!(config.max_parameters, 5);
    assert_eq!(config.duplicate_window, 3);
}

#[test]
fn test_yaml_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codesift.yml");
    fs::write(
        &path,
        "default_language: go\ncache_capacity: 0\ngateway_timeout_ms: 250\n",
    )
    .unwrap();

    let config = AnalyzerConfig::load(&path).unwrap();
    assert_eq!(config.default_language, Language::Go);
    assert_eq!(config.cache_capacity, 0);
    assert_eq!(config.gateway_timeout().as_millis(), 250);
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codesift.toml");
    fs::write(&path, "nesting_threshold = 3\n").unwrap();

    let err = AnalyzerConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("unsupported"));
}

#[test]
fn test_malformed_json_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ nesting_threshold: ").unwrap();

    let err = AnalyzerConfig::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(AnalyzerConfig::load(&dir.path().join("absent.json")).is_err());
}

#[test]
fn test_configured_analyzer_uses_thresholds() {
    let code = "function f(a, b, c) {\n  return a + b + c;\n}\n";
    let strict = AnalyzerConfig {
        max_parameters: 2,
        ..AnalyzerConfig::default()
    };
    let analyzer = Analyzer::new(strict).unwrap();
    let result = analyzer.analyze(code, "javascript");
    assert!(result
        .violations
        .line_references
        .iter()
        .any(|i| i.kind == "long-parameter-list"));

    let relaxed = Analyzer::new(AnalyzerConfig::default()).unwrap();
    let result = relaxed.analyze(code, "javascript");
    assert!(result.violations.line_references.is_empty());
}
