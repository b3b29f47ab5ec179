// SPDX-License-Identifier: PMPL-1.0-or-later

//! Aggregation and deduplication of raw detector output
//!
//! Raw issues are grouped by line, duplicates within a line collapse to
//! the most specific message (with severity escalation) and whatever
//! distinct findings remain on that line are folded into one issue.
//! After `aggregate` no two line references share a line number.

use crate::types::{Issue, RawIssue, ViolationReport, ViolationSeverity};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Canonical keyword groups; two messages that land in the same group are
/// duplicates regardless of wording.
const KEYWORD_GROUPS: &[(&str, &[&str])] = &[
    ("nesting", &["nesting", "nested"]),
    ("array", &["array", "index", "bounds", "outofbounds"]),
    ("null", &["null", "undefined", "nil", "none"]),
    ("division", &["division", "divide", "divisor", "zero"]),
];

const ERROR_HANDLING_KEYWORDS: &[&str] = &["exception", "error handling", "try"];

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Deep nesting", &["nesting", "nested"]),
    ("Division by zero risk", &["division", "divide by zero", "divisor"]),
    ("Null reference risk", &["null", "undefined"]),
    ("Array bounds risk", &["out-of-bounds", "bounds", "array access", "index"]),
    (
        "Missing error handling",
        &["exception", "error handling", "panic", "error return", "unhandled"],
    ),
    ("Magic numbers", &["magic number"]),
    ("Unused variables", &["unused"]),
    ("Duplicate code", &["duplicate"]),
    ("Dead code (unreachable)", &["unreachable", "dead code"]),
    ("Long functions", &["long function", "long method"]),
    ("Complex functions", &["complex", "cyclomatic"]),
    ("Long parameter lists", &["parameter"]),
];

pub const OTHER_CATEGORY: &str = "Other";

/// Lowercase, punctuation stripped, whitespace collapsed.
pub fn normalize_message(message: &str) -> String {
    message
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn keyword_group(normalized: &str) -> Option<&'static str> {
    KEYWORD_GROUPS
        .iter()
        .find(|(_, words)| normalized.split(' ').any(|w| words.contains(&w)))
        .map(|(group, _)| *group)
}

/// Normalized message with quoted names removed, so a variable called
/// `index` or `zero` does not pull its message into a keyword group.
fn unquoted(message: &str) -> String {
    normalize_message(&strip_quoted(&message.to_lowercase()))
}

pub fn is_duplicate(a: &str, b: &str) -> bool {
    let (na, nb) = (normalize_message(a), normalize_message(b));
    if na == nb || na.contains(&nb) || nb.contains(&na) {
        return true;
    }
    let (ua, ub) = (unquoted(a), unquoted(b));
    matches!((keyword_group(&ua), keyword_group(&ub)), (Some(x), Some(y)) if x == y)
}

/// nesting > error handling > division by zero > null reference > other
fn priority(message: &str) -> u8 {
    let normalized = unquoted(message);
    match keyword_group(&normalized) {
        Some("nesting") => 4,
        _ if ERROR_HANDLING_KEYWORDS.iter().any(|k| normalized.contains(k)) => 3,
        Some("division") => 2,
        Some("null") => 1,
        _ => 0,
    }
}

/// Whether `candidate` should replace `current` as a cluster's
/// representative.
fn outranks(candidate: &RawIssue, current: &RawIssue) -> bool {
    let (pc, pr) = (priority(&candidate.message), priority(&current.message));
    pc > pr || (pc == pr && candidate.message.len() > current.message.len())
}

/// Collapse duplicates within one line's issues.
fn dedupe_line(issues: Vec<RawIssue>) -> Vec<RawIssue> {
    let mut clusters: Vec<RawIssue> = Vec::new();
    for issue in issues {
        match clusters.iter_mut().find(|c| is_duplicate(&c.message, &issue.message)) {
            Some(cluster) => {
                let severity = cluster.severity.max(issue.severity);
                if outranks(&issue, cluster) {
                    *cluster = issue;
                }
                cluster.severity = severity;
            }
            None => clusters.push(issue),
        }
    }
    clusters
}

/// Fold distinct findings on one line into a single issue led by the
/// highest-ranked one.
fn merge_line(mut clusters: Vec<RawIssue>) -> Option<RawIssue> {
    if clusters.is_empty() {
        return None;
    }
    let lead = (0..clusters.len())
        .reduce(|best, i| if outranks(&clusters[i], &clusters[best]) { i } else { best })
        .unwrap_or(0);
    let mut primary = clusters.remove(lead);
    for other in clusters {
        primary.severity = primary.severity.max(other.severity);
        primary.message.push_str("; ");
        primary.message.push_str(&other.message);
    }
    Some(primary)
}

/// Category for a message; quoted names are ignored so an identifier like
/// `findIndex` does not steer the result.
pub fn categorize(message: &str) -> &'static str {
    let lowered = strip_quoted(&message.to_lowercase());
    CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER_CATEGORY)
}

fn strip_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quoted = false;
    for c in text.chars() {
        if c == '\'' {
            quoted = !quoted;
        } else if !quoted {
            out.push(c);
        }
    }
    out
}

pub fn aggregate(raw: Vec<RawIssue>) -> ViolationReport {
    let mut by_line: BTreeMap<usize, Vec<RawIssue>> = BTreeMap::new();
    for issue in raw {
        by_line.entry(issue.line).or_default().push(issue);
    }

    let line_references: Vec<Issue<ViolationSeverity>> = by_line
        .into_values()
        .filter_map(|issues| merge_line(dedupe_line(issues)))
        .map(|issue| Issue {
            line: issue.line,
            column: issue.column,
            category: categorize(&issue.message).to_string(),
            kind: issue.kind.as_str().to_string(),
            message: issue.message,
            severity: issue.severity,
        })
        .collect();

    let major_count = line_references
        .iter()
        .filter(|i| i.severity == ViolationSeverity::Major)
        .count();
    let minor_count = line_references.len() - major_count;

    let mut categories: BTreeMap<String, Vec<Issue<ViolationSeverity>>> = BTreeMap::new();
    for issue in &line_references {
        categories
            .entry(issue.category.clone())
            .or_default()
            .push(issue.clone());
    }

    let mut report = ViolationReport {
        major_count,
        minor_count,
        line_references,
        categories,
        summary_text: String::new(),
    };
    report.summary_text = render_summary(&report);
    report
}

pub fn render_summary(report: &ViolationReport) -> String {
    let mut out = String::from("## Code Quality Violations\n\n");
    if report.line_references.is_empty() {
        out.push_str("No violations found.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "**Major:** {} | **Minor:** {}\n",
        report.major_count, report.minor_count
    );
    for (category, issues) in &report.categories {
        let _ = writeln!(out, "### {} ({} instances)", category, issues.len());
        for issue in issues {
            let _ = writeln!(out, "- Line {}: {} ({})", issue.line, issue.message, severity_word(issue.severity));
        }
        out.push('\n');
    }
    out
}

fn severity_word(severity: ViolationSeverity) -> &'static str {
    match severity {
        ViolationSeverity::Major => "major",
        ViolationSeverity::Minor => "minor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IssueKind;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize_message("  Deep   nesting!! (depth 5) "), "deep nesting depth 5");
    }

    #[test]
    fn test_quoted_names_do_not_categorize() {
        assert_eq!(categorize("Long function 'findIndex' (50 lines, limit 40)"), "Long functions");
    }

    #[test]
    fn test_nesting_outranks_longer_message() {
        let issues = vec![
            RawIssue::new(3, IssueKind::NullReference, ViolationSeverity::Minor, "Possible null reference on a deeply nested line of code"),
            RawIssue::new(3, IssueKind::DeepNesting, ViolationSeverity::Major, "Deep nesting"),
        ];
        let report = aggregate(issues);
        assert_eq!(report.line_references.len(), 1);
        assert!(report.line_references[0].message.starts_with("Deep nesting"));
    }
}
