// SPDX-License-Identifier: PMPL-1.0-or-later

//! End-to-end analysis: empty input, caching, isolation, idempotence

use anyhow::Result;
use codesift::cache::{CacheKey, ResultCache};
use codesift::detectors::risky::RiskyOperations;
use codesift::detectors::{Detector, DetectorBattery, DetectorInput};
use codesift::patterns::PatternTables;
use codesift::types::{CodeSizeBucket, RawIssue};
use codesift::{analyze, Analyzer, AnalyzerConfig, Language};
use proptest::prelude::*;
use std::sync::{Arc, OnceLock};

const JS_CODE: &str = "function load(x) {\n  return JSON.parse(x);\n}\n";

fn shared() -> &'static Analyzer {
    static ANALYZER: OnceLock<Analyzer> = OnceLock::new();
    ANALYZER.get_or_init(|| Analyzer::new(AnalyzerConfig::default()).unwrap())
}

#[test]
fn test_empty_input_yields_empty_result() {
    let result = analyze("", "auto");
    assert_eq!(result.detection.confidence, 0);
    assert_eq!(result.detection.language, Language::JavaScript);
    assert_eq!(result.issue_count(), 0);
    assert!(result.violations.line_references.is_empty());
    assert!(result.code_smells.is_empty());
    assert!(result.security.findings.is_empty());
    assert!(result.test_cases.is_empty());
    assert_eq!(result.metadata.code_size, CodeSizeBucket::Tiny);
    assert!(!result.metadata.ai_analysis_used);
}

#[test]
fn test_empty_input_keeps_declared_or_extension_language() {
    assert_eq!(analyze("  \n", "python").metadata.language, Language::Python);

    let named = shared().analyze_named("", "auto", Some("lib.rs"));
    assert_eq!(named.metadata.language, Language::Rust);
    assert_eq!(named.detection.confidence, 0);
}

#[test]
fn test_declared_language_is_trusted() {
    let result = analyze(JS_CODE, "js");
    assert_eq!(result.detection.language, Language::JavaScript);
    assert_eq!(result.detection.confidence, 100);
    assert_eq!(result.detection.reason, "declared language");
}

#[test]
fn test_auto_and_unknown_ids_classify_from_content() {
    let python = "import sys\n\ndef main():\n    print(sys.argv)\n\nif __name__ == '__main__':\n    main()\n";
    for id in ["auto", "klingon"] {
        let result = analyze(python, id);
        assert_eq!(result.detection.language, Language::Python, "id {}", id);
        assert!(result.detection.confidence < 100);
    }
}

#[test]
fn test_analysis_is_idempotent_apart_from_timestamp() {
    let analyzer = Analyzer::new(AnalyzerConfig {
        cache_capacity: 0,
        ..AnalyzerConfig::default()
    })
    .unwrap();
    let first = analyzer.analyze(JS_CODE, "javascript");
    let mut second = analyzer.analyze(JS_CODE, "javascript");
    second.metadata.timestamp = first.metadata.timestamp.clone();
    assert_eq!(first, second);
}

#[test]
fn test_repeat_analysis_is_served_from_cache() {
    let analyzer = Analyzer::new(AnalyzerConfig::default()).unwrap();
    let first = analyzer.analyze(JS_CODE, "javascript");
    assert_eq!(analyzer.cache().len(), 1);

    let mut second = analyzer.analyze(JS_CODE, "javascript");
    assert_eq!(analyzer.cache().len(), 1);
    second.metadata.timestamp = first.metadata.timestamp.clone();
    assert_eq!(first, second);

    // a different language is a different entry
    analyzer.analyze(JS_CODE, "typescript");
    assert_eq!(analyzer.cache().len(), 2);
}

#[test]
fn test_cache_evicts_oldest_entry() {
    let cache = ResultCache::new(2);
    let sample = analyze(JS_CODE, "javascript");
    let keys: Vec<CacheKey> = ["a", "b", "c"]
        .iter()
        .map(|t| CacheKey::new(Language::JavaScript, t))
        .collect();
    for key in &keys {
        cache.insert(key.clone(), sample.clone());
    }
    assert_eq!(cache.len(), 2);
    assert!(cache.get(&keys[0]).is_none());
    assert!(cache.get(&keys[2]).is_some());

    cache.clear();
    assert!(cache.is_empty());
}

struct Exploding;

impl Detector for Exploding {
    fn name(&self) -> &'static str {
        "exploding"
    }

    fn detect(&self, _input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        panic!("detector bug");
    }
}

struct Failing;

impl Detector for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn detect(&self, _input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        anyhow::bail!("cannot scan")
    }
}

#[test]
fn test_failing_detectors_are_isolated() {
    let battery = DetectorBattery::with_detectors(vec![
        Box::new(Exploding),
        Box::new(Failing),
        Box::new(RiskyOperations),
    ])
    .unwrap();
    let tables = Arc::new(PatternTables::builtin().unwrap());
    let analyzer = Analyzer::with_tables(tables, AnalyzerConfig::default())
        .unwrap()
        .with_battery(battery);

    let result = analyzer.analyze(JS_CODE, "javascript");
    assert_eq!(result.violations.line_references.len(), 1);
    assert_eq!(result.violations.line_references[0].line, 2);
}

#[test]
fn test_result_sections_are_populated() {
    let code = "// parse config\nfunction load(text) {\n  const cfg = JSON.parse(text);\n  return cfg.port * 1024;\n}\n";
    let result = analyze(code, "javascript");
    assert_eq!(result.metrics.function_count, 1);
    assert_eq!(result.metrics.comment_lines, 1);
    assert!(!result.violations.summary_text.is_empty());
    assert!(!result.code_smells.is_empty());
    assert_eq!(result.suggestions.len(), result.code_smells.len());
    assert!(result.quality.score < 100.0);
    assert!(!result.test_cases.is_empty());
    assert!(result.syntax_issues.is_empty());
}

#[test]
fn test_result_serializes_with_camel_case_fields() {
    let json = serde_json::to_value(analyze(JS_CODE, "javascript")).unwrap();
    assert!(json.get("timeComplexity").is_some());
    assert!(json["metadata"].get("aiAnalysisUsed").is_some());
    assert_eq!(json["timeComplexity"]["notation"], "O(1)");
    assert_eq!(json["violations"]["lineReferences"][0]["type"], "unhandled-exception");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_analyze_never_panics(text in "[ -~\\n\\t]{0,160}", lang in "[a-z]{0,10}") {
        let result = shared().analyze(&text, &lang);
        let mut lines: Vec<usize> = result.violations.line_references.iter().map(|i| i.line).collect();
        let before = lines.len();
        lines.dedup();
        prop_assert_eq!(before, lines.len());
        prop_assert!(result.detection.confidence <= 100);
        prop_assert!(result.security.score <= 100);
    }
}
