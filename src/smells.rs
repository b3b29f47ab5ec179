// SPDX-License-Identifier: PMPL-1.0-or-later

//! Code-smell view over aggregated violations
//!
//! Smells are the refactoring-oriented subset of violations (bug risks
//! such as bounds or null checks are not smells). Runs of deeply nested
//! lines collapse to one smell at the first line of the run.

use crate::types::{CodeSmell, Issue, SmellKind, SyntaxSeverity, ViolationReport, ViolationSeverity};

fn smell_kind(kind: &str) -> Option<SmellKind> {
    match kind {
        "deep-nesting" => Some(SmellKind::DeepNesting),
        "long-function" => Some(SmellKind::LongMethod),
        "complex-function" => Some(SmellKind::ComplexMethod),
        "long-parameter-list" => Some(SmellKind::LongParameterList),
        "magic-number" => Some(SmellKind::MagicNumber),
        "unused-variable" => Some(SmellKind::UnusedVariable),
        "duplicate-code" => Some(SmellKind::DuplicateCode),
        "dead-code" => Some(SmellKind::DeadCode),
        "unhandled-exception" => Some(SmellKind::UnhandledException),
        _ => None,
    }
}

/// (suggestion, impact)
fn advice(kind: SmellKind) -> (&'static str, &'static str) {
    match kind {
        SmellKind::DeepNesting => (
            "Extract nested blocks into functions or use early returns",
            "Deeply nested code is hard to follow and to test",
        ),
        SmellKind::LongMethod => (
            "Split the function into smaller functions with one responsibility each",
            "Long functions are harder to understand and maintain",
        ),
        SmellKind::ComplexMethod => (
            "Reduce branching, for example with lookup tables or polymorphism",
            "Every extra branch is another path that needs a test",
        ),
        SmellKind::LongParameterList => (
            "Group related parameters into a struct or options object",
            "Long parameter lists make call sites error-prone",
        ),
        SmellKind::MagicNumber => (
            "Replace the literal with a named constant",
            "Unnamed literals hide intent and drift when duplicated",
        ),
        SmellKind::UnusedVariable => (
            "Remove the variable or use it",
            "Unused declarations add noise and may hide a bug",
        ),
        SmellKind::DuplicateCode => (
            "Extract the repeated block into a shared function",
            "Fixes applied to one copy are easily missed in the others",
        ),
        SmellKind::DeadCode => (
            "Remove the unreachable statements",
            "Unreachable code misleads readers about behaviour",
        ),
        SmellKind::UnhandledException => (
            "Wrap the operation in error handling or validate its input first",
            "Malformed input can crash the caller",
        ),
    }
}

/// Derive smells from an aggregated report, in line order.
pub fn code_smells(report: &ViolationReport) -> Vec<CodeSmell> {
    let mut smells = Vec::new();
    let mut last_nesting_line: Option<usize> = None;

    for issue in &report.line_references {
        let Some(kind) = smell_kind(&issue.kind) else {
            continue;
        };
        if kind == SmellKind::DeepNesting {
            let continues_run = last_nesting_line.is_some_and(|prev| issue.line == prev + 1);
            last_nesting_line = Some(issue.line);
            if continues_run {
                continue;
            }
        }
        smells.push(to_smell(kind, issue));
    }

    smells
}

/// Refactoring suggestions, one per smell, for the `suggestions` field.
pub fn suggestions(smells: &[CodeSmell]) -> Vec<Issue<SyntaxSeverity>> {
    smells
        .iter()
        .map(|smell| Issue {
            line: smell.line,
            column: None,
            message: smell.suggestion.clone(),
            severity: SyntaxSeverity::Info,
            category: "Suggestion".to_string(),
            kind: "refactoring".to_string(),
        })
        .collect()
}

fn to_smell(kind: SmellKind, issue: &Issue<ViolationSeverity>) -> CodeSmell {
    let (suggestion, impact) = advice(kind);
    CodeSmell {
        kind,
        severity: issue.severity,
        description: issue.message.clone(),
        line: issue.line,
        suggestion: suggestion.to_string(),
        impact: impact.to_string(),
    }
}
