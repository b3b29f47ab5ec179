// SPDX-License-Identifier: PMPL-1.0-or-later

//! Overlay of a remote reply onto a local analysis
//!
//! Fields the service reports replace or lead the local ones; fields it
//! omits keep the local heuristics.

use super::{EnrichmentResponse, RemoteFinding, RemoteIssue};
use crate::security::{grade, security_score};
use crate::types::{
    Advisory, AnalysisResult, ComplexityClass, ComplexityEstimate, EstimateConfidence, Issue,
    SecurityFinding, SecuritySeverity, SyntaxSeverity,
};

const REMOTE_FACTOR: &str = "reported by enrichment service";

pub fn parse_severity(text: Option<&str>) -> SecuritySeverity {
    match text.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("critical") => SecuritySeverity::Critical,
        Some("high") | Some("error") => SecuritySeverity::High,
        Some("medium") | Some("moderate") | Some("warning") => SecuritySeverity::Medium,
        Some("low") => SecuritySeverity::Low,
        _ => SecuritySeverity::Info,
    }
}

fn to_issue(remote: RemoteIssue, severity: SyntaxSeverity, category: &str) -> Issue<SyntaxSeverity> {
    Issue {
        line: remote.line,
        column: remote.column,
        message: remote.message,
        severity,
        category: category.to_string(),
        kind: remote.kind.unwrap_or_else(|| category.to_lowercase()),
    }
}

fn to_finding(index: usize, remote: RemoteFinding) -> SecurityFinding {
    SecurityFinding {
        id: format!("REMOTE{:03}", index + 1),
        title: remote.title,
        severity: parse_severity(remote.severity.as_deref()),
        category: remote.category.unwrap_or_else(|| "remote".to_string()),
        cwe_id: remote.cwe_id.unwrap_or_default(),
        pattern: String::new(),
        suggestion: remote.suggestion.unwrap_or_default(),
        example: remote.description,
        line: remote.line,
        occurrences: 1,
    }
}

fn to_advisory(remote: RemoteFinding) -> Advisory {
    Advisory {
        title: remote.title,
        severity: parse_severity(remote.severity.as_deref()),
        description: remote.description,
        line: remote.line,
        suggestion: remote.suggestion,
    }
}

fn override_estimate(estimate: &mut ComplexityEstimate, notation: Option<&str>, explanation: Option<&str>) {
    let Some(class) = notation.and_then(ComplexityClass::parse) else {
        return;
    };
    estimate.notation = class;
    estimate.confidence = EstimateConfidence::High;
    estimate.description = match explanation {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => format!("{} ({})", class, REMOTE_FACTOR),
    };
    estimate.factors.push(REMOTE_FACTOR.to_string());
}

pub fn merge_into(result: &mut AnalysisResult, response: EnrichmentResponse) {
    if response.errors.is_some() || response.warnings.is_some() {
        let mut syntax: Vec<Issue<SyntaxSeverity>> = Vec::new();
        syntax.extend(
            response
                .errors
                .into_iter()
                .flatten()
                .map(|i| to_issue(i, SyntaxSeverity::Error, "Error")),
        );
        syntax.extend(
            response
                .warnings
                .into_iter()
                .flatten()
                .map(|i| to_issue(i, SyntaxSeverity::Warning, "Warning")),
        );
        syntax.sort_by_key(|i| i.line);
        result.syntax_issues = syntax;
    }

    if let Some(suggestions) = response.suggestions {
        result.suggestions = suggestions
            .into_iter()
            .map(|i| to_issue(i, SyntaxSeverity::Info, "Suggestion"))
            .collect();
    }

    if let Some(remote) = response.security {
        let mut findings: Vec<SecurityFinding> =
            remote.into_iter().enumerate().map(|(i, f)| to_finding(i, f)).collect();
        // Local findings the service did not already report by weakness id.
        let local = std::mem::take(&mut result.security.findings);
        for finding in local {
            if !findings.iter().any(|f| !f.cwe_id.is_empty() && f.cwe_id == finding.cwe_id) {
                findings.push(finding);
            }
        }
        let severities: Vec<SecuritySeverity> = findings.iter().map(|f| f.severity).collect();
        let retained: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();
        result
            .security
            .compliance
            .retain(|_, ids| {
                ids.retain(|id| retained.contains(&id.as_str()));
                !ids.is_empty()
            });
        result.security.score = security_score(&severities);
        result.security.grade = grade(result.security.score);
        result.security.findings = findings;
    }

    if let Some(performance) = response.performance {
        result.performance = performance.into_iter().map(to_advisory).collect();
    }

    if let Some(complexity) = response.complexity {
        let explanation = complexity.explanation.as_deref();
        override_estimate(&mut result.time_complexity, complexity.time.as_deref(), explanation);
        override_estimate(&mut result.space_complexity, complexity.space.as_deref(), None);
    }

    if let Some(quality) = response.quality {
        if let Some(score) = quality.score {
            result.quality.score = score.clamp(0.0, 100.0);
        }
        if let Some(label) = quality.maintainability {
            result.quality.maintainability = label;
        }
        if !quality.notes.is_empty() {
            result.quality.notes = quality.notes;
        }
    }

    result.metadata.ai_analysis_used = true;
    result.metadata.enrichment_note = None;
}
