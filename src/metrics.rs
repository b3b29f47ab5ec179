// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics extraction and function-boundary detection

use crate::patterns::LanguagePatternTable;
use crate::source::{identifiers, SourceView};
use crate::types::{Language, Metrics};

/// Names a function pattern can capture that are really control flow.
const NOT_FUNCTION_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "function", "return", "with", "sizeof", "foreach",
    "using", "lock", "synchronized", "elif", "else", "do", "try", "match", "when", "new",
    "typeof", "await", "delete", "throw", "case",
];

/// Leading words that make a line a statement rather than a declaration.
const STATEMENT_PREFIXES: &[&str] = &[
    "return", "new", "throw", "else", "case", "await", "yield", "delete", "echo", "print",
];

const RECEIVER_PARAMS: &[&str] = &["self", "&self", "&mut self", "mut self", "cls", "this"];

const DECISION_KEYWORDS: &[&str] = &[
    "if", "elif", "elsif", "for", "foreach", "while", "until", "case", "catch", "except",
    "rescue", "and", "or",
];

/// A detected function declaration and the lines its body spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan {
    pub name: String,
    /// 1-based, inclusive
    pub start_line: usize,
    pub end_line: usize,
    pub params: Vec<String>,
    pub signature: String,
    /// Byte offset on the start line where the header's parameter list
    /// ends; anything after it belongs to the body.
    pub body_offset: usize,
}

impl FunctionSpan {
    pub fn length(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}

pub struct MetricsExtractor<'a> {
    table: &'a LanguagePatternTable,
}

impl<'a> MetricsExtractor<'a> {
    pub fn new(table: &'a LanguagePatternTable) -> Self {
        Self { table }
    }

    /// Detect function declarations in line order.
    pub fn functions(&self, view: &SourceView) -> Vec<FunctionSpan> {
        let mut spans = Vec::new();

        for (idx, line) in view.lines.iter().enumerate() {
            if !line.is_code() {
                continue;
            }
            let first_word = identifiers(line.trimmed()).next().map(|(_, w)| w);
            if first_word.is_some_and(|w| STATEMENT_PREFIXES.contains(&w)) {
                continue;
            }

            let Some(caps) = self
                .table
                .functions
                .iter()
                .find_map(|re| re.captures(&line.code))
            else {
                continue;
            };
            let Some(name) = caps.name("name") else {
                continue;
            };
            if NOT_FUNCTION_NAMES.contains(&name.as_str()) {
                continue;
            }

            let params = caps
                .name("params")
                .map(|p| split_params(p.as_str()))
                .unwrap_or_default();
            let column = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let body_offset = caps.name("params").map_or(name.end(), |p| p.end());
            let end = view.block_end(idx, column);

            spans.push(FunctionSpan {
                name: name.as_str().to_string(),
                start_line: line.number,
                end_line: end + 1,
                params,
                signature: line.raw.trim().to_string(),
                body_offset,
            });
        }

        spans
    }

    pub fn extract(&self, view: &SourceView, functions: &[FunctionSpan]) -> Metrics {
        let code_lines = view.code_lines().count();
        let comment_lines = view.lines.iter().filter(|l| l.is_comment).count();

        let comment_percentage = if code_lines == 0 {
            0.0
        } else {
            round1(comment_lines as f64 / code_lines as f64 * 100.0)
        };

        let average_function_length = if functions.is_empty() {
            0.0
        } else {
            let total: usize = functions.iter().map(FunctionSpan::length).sum();
            round1(total as f64 / functions.len() as f64)
        };

        let decisions: usize = view
            .code_lines()
            .map(|l| decision_points(&l.code, view.language))
            .sum();

        Metrics {
            lines_of_code: view.lines.len(),
            code_lines,
            comment_lines,
            comment_percentage,
            function_count: functions.len(),
            average_function_length,
            max_nesting_depth: view.lines.iter().map(|l| l.peak).max().unwrap_or(0),
            cyclomatic_complexity: 1 + decisions,
        }
    }

    /// Cyclomatic complexity of a single function body.
    pub fn function_complexity(&self, view: &SourceView, span: &FunctionSpan) -> usize {
        1 + view
            .lines
            .iter()
            .filter(|l| l.is_code() && span.contains(l.number))
            .map(|l| decision_points(&l.code, view.language))
            .sum::<usize>()
    }
}

/// Decision points on one line of comment-free code.
pub fn decision_points(code: &str, language: Language) -> usize {
    let keywords = identifiers(code)
        .filter(|(_, t)| DECISION_KEYWORDS.contains(t))
        .count();
    let short_circuit = code.matches("&&").count() + code.matches("||").count();
    keywords + short_circuit + ternaries(code, language)
}

fn ternaries(code: &str, language: Language) -> usize {
    if matches!(language, Language::Rust | Language::Python | Language::Go) {
        return 0;
    }
    let bytes = code.as_bytes();
    let mut count = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'?' {
            continue;
        }
        let prev = i.checked_sub(1).map(|p| bytes[p]);
        let next = bytes.get(i + 1).copied();
        if prev == Some(b'?') || matches!(next, Some(b'?') | Some(b'.')) {
            continue;
        }
        if code[i + 1..].contains(':') {
            count += 1;
        }
    }
    count
}

/// Split a parameter list at top-level commas, dropping receivers.
pub fn split_params(params: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for c in params.chars() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth <= 0 => {
                out.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    out.push(current);

    out.into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty() && !RECEIVER_PARAMS.contains(&p.as_str()))
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_params_respects_nesting() {
        assert_eq!(
            split_params("self, a: Dict[str, int], b=(1, 2)"),
            vec!["a: Dict[str, int]", "b=(1, 2)"]
        );
        assert!(split_params("  ").is_empty());
    }

    #[test]
    fn test_ternary_ignores_optional_chaining() {
        assert_eq!(decision_points("const a = b?.c ?? d;", Language::JavaScript), 0);
        assert_eq!(decision_points("x = a ? b : c;", Language::JavaScript), 1);
        assert_eq!(decision_points("if (a && b || c) {", Language::Java), 3);
    }
}
