// SPDX-License-Identifier: PMPL-1.0-or-later

//! Local syntax sanity check
//!
//! Not a parser: a bracket stack over the comment-free, string-blanked
//! view plus the literal state the line scan already tracked.

use crate::source::SourceView;
use crate::types::{Issue, Language, SyntaxSeverity};

/// Lines longer than this draw an info note.
pub const LONG_LINE: usize = 160;

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn issue(line: usize, column: Option<usize>, severity: SyntaxSeverity, kind: &str, message: String) -> Issue<SyntaxSeverity> {
    Issue {
        line,
        column,
        message,
        severity,
        category: "Syntax".to_string(),
        kind: kind.to_string(),
    }
}

pub fn check(view: &SourceView) -> Vec<Issue<SyntaxSeverity>> {
    let mut issues = Vec::new();
    // (bracket, line, column)
    let mut stack: Vec<(char, usize, usize)> = Vec::new();
    // `case` arms in shell close a paren that was never opened
    let check_parens = view.language != Language::Shell;

    for line in &view.lines {
        if line.raw.chars().count() > LONG_LINE {
            issues.push(issue(
                line.number,
                None,
                SyntaxSeverity::Info,
                "long-line",
                format!("Line is {} characters long (over {})", line.raw.chars().count(), LONG_LINE),
            ));
        }

        for (col, c) in line.code.char_indices() {
            match c {
                '(' if !check_parens => {}
                ')' if !check_parens => {}
                '(' | '[' | '{' => stack.push((c, line.number, col + 1)),
                ')' | ']' | '}' => match stack.last() {
                    Some(&(open, _, _)) if closer_for(open) == c => {
                        stack.pop();
                    }
                    Some(&(open, open_line, _)) => {
                        issues.push(issue(
                            line.number,
                            Some(col + 1),
                            SyntaxSeverity::Error,
                            "unbalanced-bracket",
                            format!(
                                "Mismatched '{}': expected '{}' to close '{}' from line {}",
                                c,
                                closer_for(open),
                                open,
                                open_line
                            ),
                        ));
                        stack.pop();
                    }
                    None => issues.push(issue(
                        line.number,
                        Some(col + 1),
                        SyntaxSeverity::Warning,
                        "stray-closer",
                        format!("Unexpected '{}' with no matching opener", c),
                    )),
                },
                _ => {}
            }
        }
    }

    for (open, line, column) in stack {
        issues.push(issue(
            line,
            Some(column),
            SyntaxSeverity::Error,
            "unclosed-bracket",
            format!("Unclosed '{}' opened here", open),
        ));
    }

    if let Some(line) = view.unclosed_literal {
        issues.push(issue(
            line,
            None,
            SyntaxSeverity::Error,
            "unterminated-literal",
            "Unterminated string or comment starting here".to_string(),
        ));
    }

    issues.sort_by_key(|i| i.line);
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternTables;

    fn view(code: &str, language: Language) -> SourceView {
        let tables = PatternTables::builtin().unwrap();
        SourceView::new(code, tables.table(language).unwrap())
    }

    #[test]
    fn test_balanced_code_is_clean() {
        let v = view("function f(a) {\n  return [a, (a + 1)];\n}\n", Language::JavaScript);
        assert!(check(&v).is_empty());
    }

    #[test]
    fn test_unclosed_brace_is_error() {
        let v = view("function f(a) {\n  return a;\n", Language::JavaScript);
        let issues = check(&v);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, SyntaxSeverity::Error);
        assert_eq!(issues[0].line, 1);
    }

    #[test]
    fn test_brackets_inside_strings_ignored() {
        let v = view("const s = \"{[(\";\n", Language::JavaScript);
        assert!(check(&v).is_empty());
    }

    #[test]
    fn test_stray_closer_is_warning() {
        let v = view("x = 1)\n", Language::Python);
        let issues = check(&v);
        assert_eq!(issues[0].severity, SyntaxSeverity::Warning);
    }
}
