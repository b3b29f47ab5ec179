// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language classification by weighted pattern scoring

use crate::patterns::{LanguagePatternTable, PatternTables};
use crate::source::identifiers;
use crate::types::{DetectionResult, Language, LanguageCandidate};
use std::collections::HashMap;
use tracing::debug;

const EXTENSION_CONFIDENCE: u8 = 95;
const KEYWORD_WEIGHT: f64 = 2.0;
const IMPORT_WEIGHT: f64 = 3.0;
const SYNTAX_WEIGHT: f64 = 4.0;
const SPECIFIC_WEIGHT: f64 = 5.0;
const MAX_ALTERNATIVES: usize = 3;

pub struct LanguageClassifier<'a> {
    tables: &'a PatternTables,
    default_language: Language,
}

impl<'a> LanguageClassifier<'a> {
    pub fn new(tables: &'a PatternTables, default_language: Language) -> Self {
        Self {
            tables,
            default_language,
        }
    }

    /// Detect the language of `text`, short-circuiting on an unambiguous
    /// filename extension.
    pub fn detect(&self, text: &str, filename: Option<&str>) -> DetectionResult {
        if let Some(name) = filename {
            if let [language] = Language::extension_candidates(name) {
                return DetectionResult {
                    language: *language,
                    confidence: EXTENSION_CONFIDENCE,
                    alternatives: Vec::new(),
                    reason: "extension match".to_string(),
                };
            }
        }

        if text.trim().is_empty() {
            return self.no_match("no match: empty input");
        }

        let tokens = token_counts(text);
        let mut scored: Vec<(Language, f64)> = self
            .tables
            .languages()
            .iter()
            .map(|table| (table.language, score(table, text, &tokens)))
            .filter(|(_, s)| *s > 0.0)
            .collect();

        if scored.is_empty() {
            return self.no_match("no match: no language pattern scored above zero");
        }

        // Stable sort keeps table order among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let line_count = text.lines().filter(|l| !l.trim().is_empty()).count();
        let (language, best) = scored[0];
        let alternatives = scored
            .iter()
            .skip(1)
            .take(MAX_ALTERNATIVES)
            .map(|(language, s)| LanguageCandidate {
                language: *language,
                confidence: confidence(*s, line_count),
            })
            .collect();

        debug!(%language, score = best, "language classified");

        DetectionResult {
            language,
            confidence: confidence(best, line_count),
            alternatives,
            reason: format!("pattern score {:.1}", best),
        }
    }

    fn no_match(&self, reason: &str) -> DetectionResult {
        DetectionResult {
            language: self.default_language,
            confidence: 0,
            alternatives: Vec::new(),
            reason: reason.to_string(),
        }
    }
}

fn token_counts(text: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for (_, token) in identifiers(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

fn score(table: &LanguagePatternTable, text: &str, tokens: &HashMap<&str, usize>) -> f64 {
    let keywords: usize = table
        .keywords
        .iter()
        .map(|k| tokens.get(k).copied().unwrap_or(0))
        .sum();
    let imports: usize = table.imports.iter().map(|m| text.matches(m).count()).sum();
    let syntax: usize = table.syntax.iter().map(|r| r.find_iter(text).count()).sum();
    let specific: usize = table.specific.iter().map(|r| r.find_iter(text).count()).sum();

    let raw = keywords as f64 * KEYWORD_WEIGHT
        + imports as f64 * IMPORT_WEIGHT
        + syntax as f64 * SYNTAX_WEIGHT
        + specific as f64 * SPECIFIC_WEIGHT;
    raw * table.weight
}

/// Score normalised by code length, with bonuses for strong signals.
pub fn confidence(score: f64, line_count: usize) -> u8 {
    let denominator = (line_count as f64 * 10.0).max(20.0);
    let mut pct = (score / denominator * 100.0).round().min(100.0);
    if score > 20.0 {
        pct += 15.0;
    }
    if score > 50.0 {
        pct += 10.0;
    }
    pct.clamp(0.0, 100.0) as u8
}
