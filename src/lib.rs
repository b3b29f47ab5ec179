// SPDX-License-Identifier: PMPL-1.0-or-later

//! codesift: heuristic, parser-free code analysis.
//!
//! Given source text and a language id, codesift produces one
//! `AnalysisResult`: language classification, size metrics, time/space
//! complexity estimates, deduplicated quality violations and code smells,
//! security signature findings and test skeletons. An optional remote
//! service can enrich the result; when it is unreachable the local
//! heuristics stand alone.
//!
//! PIPELINE:
//! 1. **Patterns**: per-language weighted tables, risky operations and
//!    vulnerability signatures, compiled once and injected everywhere.
//! 2. **Source view**: comment/string-aware line scan with block depth.
//! 3. **Detectors**: independent scans whose raw issues are aggregated to
//!    at most one issue per line.
//! 4. **Enrichment**: remote findings layered over the local ones.

pub mod aggregate;
pub mod analyzer;
pub mod cache;
pub mod classify;
pub mod complexity;
pub mod config;
pub mod detectors;
pub mod enrichment;
pub mod metrics;
pub mod patterns;
pub mod report;
pub mod security;
pub mod smells;
pub mod source;
pub mod sweep;
pub mod syntax;
pub mod testgen;
pub mod types;

pub use analyzer::Analyzer;
pub use config::AnalyzerConfig;
pub use types::{AnalysisResult, DetectionResult, Language};

use std::sync::OnceLock;

/// Analyzer over the built-in tables and default configuration, built on
/// first use and shared by every one-shot call. `None` if the tables
/// failed to compile.
fn default_analyzer() -> Option<&'static Analyzer> {
    static DEFAULT: OnceLock<Option<Analyzer>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| match Analyzer::new(AnalyzerConfig::default()) {
            Ok(analyzer) => Some(analyzer),
            Err(e) => {
                tracing::warn!(error = %e, "analyzer construction failed");
                None
            }
        })
        .as_ref()
}

/// One-shot analysis with the default configuration. Never fails; if the
/// built-in tables cannot be compiled the result is empty.
pub fn analyze(source: &str, language_id: &str) -> AnalysisResult {
    match default_analyzer() {
        Some(analyzer) => analyzer.analyze(source, language_id),
        None => {
            let language = Language::from_id(language_id).unwrap_or(Language::JavaScript);
            analyzer::empty_result(language, "analyzer unavailable")
        }
    }
}

/// One-shot language detection with the default configuration.
pub fn detect_language(source: &str, filename: Option<&str>) -> DetectionResult {
    match default_analyzer() {
        Some(analyzer) => analyzer.detect_language(source, filename),
        None => DetectionResult {
            language: Language::JavaScript,
            confidence: 0,
            alternatives: Vec::new(),
            reason: "no match: pattern tables unavailable".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheKey;

    #[test]
    fn test_one_shot_calls_share_one_analyzer() {
        let first = default_analyzer().expect("built-in tables compile");
        let second = default_analyzer().expect("built-in tables compile");
        assert!(std::ptr::eq(first, second));

        let code = "function shared(x) {\n  return JSON.parse(x);\n}\n";
        let result = analyze(code, "javascript");
        let cached = first
            .cache()
            .get(&CacheKey::new(Language::JavaScript, code))
            .expect("one-shot result is cached");
        assert_eq!(cached.violations, result.violations);

        let detected = detect_language("def f(x):\n    return x\n", Some("f.py"));
        assert_eq!(detected.language, Language::Python);
        assert_eq!(detected.confidence, 95);
    }
}
