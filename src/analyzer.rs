// SPDX-License-Identifier: PMPL-1.0-or-later

//! Analysis orchestration
//!
//! `Analyzer` owns the compiled pattern tables and every subsystem built
//! from them. `analyze` never fails: empty input, a panicking subsystem
//! and an unreachable enrichment service all end in a valid result.

use crate::aggregate::aggregate;
use crate::cache::{CacheKey, ResultCache};
use crate::classify::LanguageClassifier;
use crate::complexity::{loops, performance_advisories, ComplexityEstimator};
use crate::config::AnalyzerConfig;
use crate::detectors::DetectorBattery;
use crate::enrichment::{merge_into, Enrichment, EnrichmentGateway, HttpTransport};
use crate::metrics::MetricsExtractor;
use crate::patterns::PatternTables;
use crate::security::SecurityScanner;
use crate::smells::{code_smells, suggestions};
use crate::source::SourceView;
use crate::syntax;
use crate::testgen::TestSynthesizer;
use crate::types::*;
use anyhow::Result;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

const DECLARED_CONFIDENCE: u8 = 100;

pub struct Analyzer {
    tables: Arc<PatternTables>,
    config: AnalyzerConfig,
    battery: DetectorBattery,
    estimator: ComplexityEstimator,
    cache: ResultCache,
    gateway: Option<EnrichmentGateway>,
}

impl Analyzer {
    /// Analyzer over the built-in tables. An HTTP gateway is attached when
    /// `config.gateway_url` is set.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let tables = Arc::new(PatternTables::builtin()?);
        let mut analyzer = Self::with_tables(tables, config)?;
        if let Some(url) = analyzer.config.gateway_url.clone() {
            let timeout = analyzer.config.gateway_timeout();
            let transport = HttpTransport::new(url, timeout)?;
            analyzer.gateway = Some(EnrichmentGateway::new(Arc::new(transport), timeout));
        }
        Ok(analyzer)
    }

    pub fn with_tables(tables: Arc<PatternTables>, config: AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            tables,
            cache: ResultCache::new(config.cache_capacity),
            config,
            battery: DetectorBattery::new()?,
            estimator: ComplexityEstimator::new()?,
            gateway: None,
        })
    }

    pub fn with_gateway(mut self, gateway: EnrichmentGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_battery(mut self, battery: DetectorBattery) -> Self {
        self.battery = battery;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn tables(&self) -> &PatternTables {
        &self.tables
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn detect_language(&self, text: &str, filename: Option<&str>) -> DetectionResult {
        LanguageClassifier::new(&self.tables, self.config.default_language).detect(text, filename)
    }

    /// Analyse `text` as `language_id`; `auto` or an unknown id classifies
    /// from content.
    pub fn analyze(&self, text: &str, language_id: &str) -> AnalysisResult {
        self.analyze_named(text, language_id, None)
    }

    /// As `analyze`, letting the filename steer classification.
    pub fn analyze_named(&self, text: &str, language_id: &str, filename: Option<&str>) -> AnalysisResult {
        let declared = Language::from_id(language_id);

        if text.trim().is_empty() {
            let by_extension = filename.and_then(|name| match Language::extension_candidates(name) {
                [only] => Some(*only),
                _ => None,
            });
            let language = declared
                .or(by_extension)
                .unwrap_or(self.config.default_language);
            return empty_result(language, "no match: empty input");
        }

        let detection = match declared {
            Some(language) => DetectionResult {
                language,
                confidence: DECLARED_CONFIDENCE,
                alternatives: Vec::new(),
                reason: "declared language".to_string(),
            },
            None => self.detect_language(text, filename),
        };
        let language = detection.language;
        let key = CacheKey::new(language, text);

        let mut result = match self.cache.get(&key) {
            Some(mut cached) => {
                debug!(language = %language, "cache hit");
                cached.metadata.timestamp = timestamp();
                cached
            }
            None => {
                let local = catch_unwind(AssertUnwindSafe(|| self.local_analysis(text, language)));
                match local {
                    Ok(result) => {
                        self.cache.insert(key, result.clone());
                        result
                    }
                    Err(_) => {
                        warn!(language = %language, "local analysis panicked; returning empty result");
                        empty_result(language, "analysis aborted")
                    }
                }
            }
        };
        result.detection = detection;

        if let Some(gateway) = &self.gateway {
            match gateway.enrich(text, language) {
                Enrichment::Available(response) => merge_into(&mut result, response),
                Enrichment::Unavailable(error) => {
                    result.metadata.enrichment_note = Some(error.to_string());
                }
            }
        }

        result
    }

    fn local_analysis(&self, text: &str, language: Language) -> AnalysisResult {
        let Some(table) = self.tables.table(language) else {
            return empty_result(language, "no pattern table");
        };
        let tables = self.tables.as_ref();
        let config = &self.config;

        let view = SourceView::new(text, table);
        let extractor = MetricsExtractor::new(table);
        let functions = extractor.functions(&view);
        let metrics = extractor.extract(&view, &functions);
        debug!(language = %language, functions = functions.len(), "metrics extracted");

        let ((time, space), (raw, security)) = rayon::join(
            || self.estimator.estimate(&view, table, &functions),
            || {
                rayon::join(
                    || self.battery.run(&view, tables, table, &functions, config),
                    || SecurityScanner::new(tables).scan(text, language),
                )
            },
        );
        debug!(raw_issues = raw.len(), "detectors finished");

        let violations = aggregate(raw);
        let code_smells = code_smells(&violations);
        let suggestions = suggestions(&code_smells);
        let performance = performance_advisories(&time, &space);
        let quality = quality_score(&violations, &metrics);
        let has_loops = loops::scan(&view, table).has_loops();
        let test_cases = TestSynthesizer::new(language).synthesize(&functions, has_loops);

        AnalysisResult {
            metadata: metadata(language, metrics.lines_of_code),
            detection: DetectionResult {
                language,
                confidence: DECLARED_CONFIDENCE,
                alternatives: Vec::new(),
                reason: "declared language".to_string(),
            },
            syntax_issues: syntax::check(&view),
            metrics,
            time_complexity: time,
            space_complexity: space,
            violations,
            code_smells,
            security,
            suggestions,
            performance,
            quality,
            test_cases,
        }
    }
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn metadata(language: Language, lines: usize) -> AnalysisMetadata {
    AnalysisMetadata {
        timestamp: timestamp(),
        language,
        code_size: CodeSizeBucket::for_lines(lines),
        ai_analysis_used: false,
        enrichment_note: None,
    }
}

fn constant_estimate(kind: &str) -> ComplexityEstimate {
    ComplexityEstimate {
        notation: ComplexityClass::Constant,
        confidence: EstimateConfidence::High,
        description: format!("{} {}: nothing to analyse", kind, ComplexityClass::Constant),
        factors: Vec::new(),
    }
}

/// Valid result with nothing in it.
pub fn empty_result(language: Language, reason: &str) -> AnalysisResult {
    AnalysisResult {
        metadata: metadata(language, 0),
        detection: DetectionResult {
            language,
            confidence: 0,
            alternatives: Vec::new(),
            reason: reason.to_string(),
        },
        metrics: Metrics::default(),
        time_complexity: constant_estimate("Time"),
        space_complexity: constant_estimate("Space"),
        violations: aggregate(Vec::new()),
        code_smells: Vec::new(),
        security: SecurityReport::default(),
        syntax_issues: Vec::new(),
        suggestions: Vec::new(),
        performance: Vec::new(),
        quality: QualityScore::default(),
        test_cases: Vec::new(),
    }
}

/// 100, less 5 per major and 2 per minor violation, less every point of
/// cyclomatic complexity over 10, less 5 for a sparsely commented unit of
/// 20+ code lines.
pub fn quality_score(violations: &ViolationReport, metrics: &Metrics) -> QualityScore {
    let mut score = 100.0;
    let mut notes = Vec::new();

    if violations.major_count > 0 {
        score -= 5.0 * violations.major_count as f64;
        notes.push(format!("{} major violation(s)", violations.major_count));
    }
    if violations.minor_count > 0 {
        score -= 2.0 * violations.minor_count as f64;
        notes.push(format!("{} minor violation(s)", violations.minor_count));
    }
    if metrics.cyclomatic_complexity > 10 {
        score -= (metrics.cyclomatic_complexity - 10) as f64;
        notes.push(format!("cyclomatic complexity {}", metrics.cyclomatic_complexity));
    }
    if metrics.code_lines >= 20 && metrics.comment_percentage < 5.0 {
        score -= 5.0;
        notes.push(format!("comments cover {:.1}% of code lines", metrics.comment_percentage));
    }

    let score: f64 = score.clamp(0.0, 100.0);
    let maintainability = match score {
        s if s >= 85.0 => "excellent",
        s if s >= 70.0 => "good",
        s if s >= 50.0 => "fair",
        _ => "poor",
    };

    QualityScore {
        score,
        maintainability: maintainability.to_string(),
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_score_labels() {
        let clean = quality_score(&ViolationReport::default(), &Metrics::default());
        assert_eq!(clean.score, 100.0);
        assert_eq!(clean.maintainability, "excellent");

        let noisy = ViolationReport {
            major_count: 8,
            minor_count: 10,
            ..Default::default()
        };
        let poor = quality_score(&noisy, &Metrics::default());
        assert_eq!(poor.score, 40.0);
        assert_eq!(poor.maintainability, "poor");
    }
}
