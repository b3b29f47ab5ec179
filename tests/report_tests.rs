// SPDX-License-Identifier: PMPL-1.0-or-later

//! Exported report formats

use codesift::report::{save_report, ReportOutputFormat};
use codesift::types::AnalysisResult;
use codesift::analyze;
use std::fs;
use tempfile::TempDir;

const CODE: &str = "function load(x) {\n  return JSON.parse(x);\n}\n";

#[test]
fn test_format_names_and_extensions() {
    assert_eq!(ReportOutputFormat::parse("YML"), Some(ReportOutputFormat::Yaml));
    assert_eq!(ReportOutputFormat::parse("md"), Some(ReportOutputFormat::Markdown));
    assert_eq!(ReportOutputFormat::parse("csv"), None);
    assert_eq!(ReportOutputFormat::Sarif.extension(), "sarif");
}

#[test]
fn test_json_and_yaml_round_trip() {
    let result = analyze(CODE, "javascript");

    let json = ReportOutputFormat::Json.serialize(&result, "load.js").unwrap();
    let from_json: AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(from_json.violations, result.violations);
    assert_eq!(from_json.security, result.security);
    assert_eq!(from_json.test_cases, result.test_cases);

    let yaml = ReportOutputFormat::Yaml.serialize(&result, "load.js").unwrap();
    let from_yaml: AnalysisResult = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(from_yaml.violations, result.violations);
}

#[test]
fn test_markdown_contains_violation_summary() {
    let result = analyze(CODE, "javascript");
    let md = ReportOutputFormat::Markdown.serialize(&result, "load.js").unwrap();
    assert!(md.starts_with("# codesift report: load.js"));
    assert!(md.contains("## Code Quality Violations"));
    assert!(md.contains("JSON.parse"));
}

#[test]
fn test_save_report_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let result = analyze(CODE, "javascript");

    save_report(&result, "load.js", ReportOutputFormat::Json, &path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"lineReferences\""));
}
