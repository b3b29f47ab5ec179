// SPDX-License-Identifier: PMPL-1.0-or-later

//! Aggregation: one issue per line, severity escalation, categories

use codesift::aggregate::{aggregate, categorize, is_duplicate, OTHER_CATEGORY};
use codesift::types::{IssueKind, RawIssue, ViolationSeverity};
use proptest::prelude::*;
use std::collections::HashSet;

const MESSAGES: &[(&str, IssueKind)] = &[
    ("Deep nesting detected: depth 5 exceeds threshold 4", IssueKind::DeepNesting),
    ("Nested block is too deep", IssueKind::DeepNesting),
    ("Possible out-of-bounds array access: index is not bounds-checked ('i')", IssueKind::ArrayBounds),
    ("Possible division by zero: divisor is not checked ('d')", IssueKind::DivisionByZero),
    ("Possible null reference: lookup result is dereferenced without a null check", IssueKind::NullReference),
    ("Unhandled exception risk: JSON.parse throws on malformed input", IssueKind::UnhandledException),
    ("Magic number 42 should be a named constant", IssueKind::MagicNumber),
    ("Unused variable 'tmp' is declared but never used", IssueKind::UnusedVariable),
];

fn raw(line: usize, which: usize, major: bool) -> RawIssue {
    let (message, kind) = MESSAGES[which];
    let severity = if major {
        ViolationSeverity::Major
    } else {
        ViolationSeverity::Minor
    };
    RawIssue::new(line, kind, severity, message)
}

#[test]
fn test_same_group_collapses_and_escalates() {
    let report = aggregate(vec![
        RawIssue::new(4, IssueKind::DeepNesting, ViolationSeverity::Minor, "Nested block is too deep"),
        RawIssue::new(
            4,
            IssueKind::DeepNesting,
            ViolationSeverity::Major,
            "Deep nesting detected: depth 5 exceeds threshold 4",
        ),
    ]);
    assert_eq!(report.line_references.len(), 1);
    assert_eq!(report.major_count, 1);
    assert_eq!(report.minor_count, 0);
    assert_eq!(
        report.line_references[0].message,
        "Deep nesting detected: depth 5 exceeds threshold 4"
    );
}

#[test]
fn test_distinct_findings_on_one_line_are_merged() {
    let report = aggregate(vec![raw(9, 6, false), raw(9, 5, true)]);
    assert_eq!(report.line_references.len(), 1);
    let issue = &report.line_references[0];
    assert_eq!(issue.severity, ViolationSeverity::Major);
    // error handling outranks the magic number and leads the message
    assert!(issue.message.starts_with("Unhandled exception risk"));
    assert!(issue.message.contains("; Magic number 42"));
}

#[test]
fn test_priority_beats_length() {
    let report = aggregate(vec![raw(2, 4, false), raw(2, 3, false)]);
    // division outranks null reference even though the null message is longer
    assert!(report.line_references[0].message.starts_with("Possible division by zero"));
}

#[test]
fn test_duplicate_rules() {
    assert!(is_duplicate("Magic number 42!", "magic number 42"));
    assert!(is_duplicate("unused variable", "Unused variable 'tmp' is declared but never used"));
    assert!(is_duplicate("Index out of range", "Array access may overflow"));
    assert!(!is_duplicate("Magic number 42", "Unreachable code after return statement"));
}

#[test]
fn test_quoted_names_do_not_join_keyword_groups() {
    assert!(!is_duplicate(
        "Unused variable 'index' is declared but never used",
        "Possible out-of-bounds array access: index is not bounds-checked ('k')",
    ));
    assert!(!is_duplicate(
        "Unused variable 'zero' is declared but never used",
        "Possible division by zero: divisor is not checked ('b')",
    ));

    let report = aggregate(vec![
        RawIssue::new(
            2,
            IssueKind::UnusedVariable,
            ViolationSeverity::Minor,
            "Unused variable 'zero' is declared but never used",
        ),
        RawIssue::new(
            2,
            IssueKind::DivisionByZero,
            ViolationSeverity::Major,
            "Possible division by zero: divisor is not checked ('b')",
        ),
    ]);
    assert_eq!(report.line_references.len(), 1);
    let issue = &report.line_references[0];
    assert_eq!(issue.kind, "division-by-zero");
    assert_eq!(
        issue.message,
        "Possible division by zero: divisor is not checked ('b'); Unused variable 'zero' is declared but never used"
    );
}

#[test]
fn test_categories() {
    assert_eq!(categorize("Deep nesting detected"), "Deep nesting");
    assert_eq!(categorize("Unreachable code after return statement"), "Dead code (unreachable)");
    assert_eq!(categorize("Long parameter list in 'f' (6 parameters, max 5)"), "Long parameter lists");
    assert_eq!(categorize("Something else entirely"), OTHER_CATEGORY);
}

#[test]
fn test_summary_lists_categories_with_counts() {
    let report = aggregate(vec![raw(1, 6, false), raw(5, 0, true)]);
    let summary = &report.summary_text;
    assert!(summary.starts_with("## Code Quality Violations"));
    assert!(summary.contains("**Major:** 1 | **Minor:** 1"));
    assert!(summary.contains("### Deep nesting (1 instances)"));
    assert!(summary.contains("- Line 1: Magic number 42 should be a named constant (minor)"));
}

#[test]
fn test_empty_input() {
    let report = aggregate(Vec::new());
    assert!(report.line_references.is_empty());
    assert!(report.categories.is_empty());
    assert!(report.summary_text.contains("No violations found."));
}

proptest! {
    #[test]
    fn prop_at_most_one_issue_per_line(
        specs in prop::collection::vec((1usize..30, 0usize..MESSAGES.len(), any::<bool>()), 0..60)
    ) {
        let raw_issues: Vec<RawIssue> = specs.iter().map(|&(l, w, m)| raw(l, w, m)).collect();
        let major_lines: HashSet<usize> = specs.iter().filter(|s| s.2).map(|s| s.0).collect();
        let all_lines: HashSet<usize> = specs.iter().map(|s| s.0).collect();

        let report = aggregate(raw_issues);
        let lines: Vec<usize> = report.line_references.iter().map(|i| i.line).collect();

        let mut sorted = lines.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(&sorted, &lines);
        prop_assert_eq!(lines.iter().copied().collect::<HashSet<_>>(), all_lines);
        prop_assert_eq!(report.major_count + report.minor_count, report.line_references.len());

        for issue in &report.line_references {
            let expected = if major_lines.contains(&issue.line) {
                ViolationSeverity::Major
            } else {
                ViolationSeverity::Minor
            };
            prop_assert_eq!(issue.severity, expected);
        }

        let categorised: usize = report.categories.values().map(Vec::len).sum();
        prop_assert_eq!(categorised, report.line_references.len());
    }
}
