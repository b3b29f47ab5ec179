// SPDX-License-Identifier: PMPL-1.0-or-later

//! Security pattern scanner
//!
//! Signature matching over the raw text, comments included. Recall is
//! preferred over precision here, so nothing is suppressed by context.

use crate::patterns::PatternTables;
use crate::types::{Language, SecurityFinding, SecurityReport, SecuritySeverity};
use std::collections::BTreeMap;
use tracing::debug;

pub struct SecurityScanner<'a> {
    tables: &'a PatternTables,
}

impl<'a> SecurityScanner<'a> {
    pub fn new(tables: &'a PatternTables) -> Self {
        Self { tables }
    }

    /// One finding per matched signature, anchored at its first match.
    pub fn scan(&self, text: &str, language: Language) -> SecurityReport {
        let mut findings = Vec::new();
        let mut compliance: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for sig in self.tables.security_for(language) {
            let mut first_line = None;
            let mut occurrences = 0;
            for (idx, line) in text.lines().enumerate() {
                let hits = sig.pattern.find_iter(line).count();
                if hits > 0 {
                    first_line.get_or_insert(idx + 1);
                    occurrences += hits;
                }
            }
            if occurrences == 0 {
                continue;
            }

            compliance
                .entry(sig.owasp.to_string())
                .or_default()
                .push(sig.id.to_string());
            findings.push(SecurityFinding {
                id: sig.id.to_string(),
                title: sig.title.to_string(),
                severity: sig.severity,
                category: sig.category.to_string(),
                cwe_id: sig.cwe_id.to_string(),
                pattern: sig.pattern.as_str().to_string(),
                suggestion: sig.suggestion.to_string(),
                example: sig.example.to_string(),
                line: first_line,
                occurrences,
            });
        }

        let severities: Vec<SecuritySeverity> = findings.iter().map(|f| f.severity).collect();
        let score = security_score(&severities);
        debug!(findings = findings.len(), score, "security scan complete");

        SecurityReport {
            findings,
            score,
            grade: grade(score),
            compliance,
        }
    }
}

/// 100 minus the severity-weighted penalties, floored at 0.
pub fn security_score(severities: &[SecuritySeverity]) -> u32 {
    let penalty: u32 = severities.iter().map(|s| s.penalty()).sum();
    100u32.saturating_sub(penalty)
}

pub fn grade(score: u32) -> char {
    match score {
        90.. => 'A',
        80..=89 => 'B',
        70..=79 => 'C',
        60..=69 => 'D',
        _ => 'F',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_bands() {
        assert_eq!(grade(100), 'A');
        assert_eq!(grade(90), 'A');
        assert_eq!(grade(89), 'B');
        assert_eq!(grade(70), 'C');
        assert_eq!(grade(60), 'D');
        assert_eq!(grade(59), 'F');
        assert_eq!(grade(0), 'F');
    }

    #[test]
    fn test_score_floors_at_zero() {
        let all_critical = vec![SecuritySeverity::Critical; 5];
        assert_eq!(security_score(&all_critical), 0);
        assert_eq!(security_score(&[SecuritySeverity::High, SecuritySeverity::Info]), 84);
    }
}
