// SPDX-License-Identifier: PMPL-1.0-or-later

//! Loop-nesting scanner
//!
//! Brace languages are walked character by character: a loop keyword or
//! iterating call leaves a pending loop that is attached to the next `{`
//! (its body) or closed by a `;` at the header's paren level (a braceless
//! body). Indentation languages keep a stack of loop header indents and
//! count comprehension `for`s inline.

use crate::patterns::{BlockStyle, LanguagePatternTable};
use crate::source::{identifiers, SourceView};
use crate::types::Language;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopScan {
    pub max_depth: usize,
    /// 1-based lines that sit inside (or open) a loop
    pub loop_lines: BTreeSet<usize>,
}

impl LoopScan {
    pub fn has_loops(&self) -> bool {
        self.max_depth > 0
    }

    pub fn in_loop(&self, line: usize) -> bool {
        self.loop_lines.contains(&line)
    }
}

pub fn scan(view: &SourceView, table: &LanguagePatternTable) -> LoopScan {
    match table.block_style {
        BlockStyle::Braces => scan_braces(view, table),
        BlockStyle::Indentation => scan_indentation(view, table),
    }
}

#[derive(Default)]
struct BraceWalk {
    depth: usize,
    paren: i32,
    pending: usize,
    pending_paren: i32,
    open_loops: Vec<usize>,
    max_depth: usize,
}

impl BraceWalk {
    fn active(&self) -> usize {
        self.open_loops.len() + self.pending
    }

    fn start_loop(&mut self) {
        if self.pending == 0 {
            self.pending_paren = self.paren;
        }
        self.pending += 1;
        self.max_depth = self.max_depth.max(self.active());
    }
}

fn scan_braces(view: &SourceView, table: &LanguagePatternTable) -> LoopScan {
    let mut walk = BraceWalk::default();
    let mut loop_lines = BTreeSet::new();
    let semicolon_closes = view.language != Language::Go;

    for line in view.code_lines() {
        let code = line.code.as_str();
        let bytes = code.as_bytes();
        let mut touched = walk.active() > 0;
        let mut seen_impl = false;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];

            if b.is_ascii_alphabetic() || b == b'_' {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let word = &code[start..i];
                let after_dot = start > 0 && bytes[start - 1] == b'.';
                if word == "impl" {
                    seen_impl = true;
                }
                if !after_dot && table.is_loop_keyword(word) && !is_type_level_for(word, seen_impl, &code[i..]) {
                    walk.start_loop();
                    touched = true;
                } else if table
                    .loop_calls
                    .iter()
                    .any(|c| !c.starts_with('.') && code[start..].starts_with(c))
                {
                    walk.start_loop();
                    touched = true;
                }
                continue;
            }

            match b {
                b'.' if table.loop_calls.iter().any(|c| c.starts_with('.') && is_call_at(code, i, c)) => {
                    walk.start_loop();
                    touched = true;
                }
                b'(' => walk.paren += 1,
                b')' => walk.paren -= 1,
                b';' if semicolon_closes && walk.pending > 0 && walk.paren <= walk.pending_paren => {
                    walk.pending = 0;
                }
                b'{' => {
                    walk.depth += 1;
                    if walk.pending > 0 && walk.paren >= walk.pending_paren {
                        for _ in 0..walk.pending {
                            walk.open_loops.push(walk.depth);
                        }
                        walk.pending = 0;
                    }
                }
                b'}' => {
                    while walk.open_loops.last() == Some(&walk.depth) {
                        walk.open_loops.pop();
                    }
                    walk.depth = walk.depth.saturating_sub(1);
                }
                _ => {}
            }
            i += 1;
        }

        if touched {
            loop_lines.insert(line.number);
        }
    }

    LoopScan {
        max_depth: walk.max_depth,
        loop_lines,
    }
}

/// `impl Trait for Type` and `for<'a>` bounds are not loops.
fn is_type_level_for(word: &str, seen_impl: bool, rest: &str) -> bool {
    word == "for" && (seen_impl || rest.trim_start().starts_with('<'))
}

/// `.forEach(` style calls; entries without a trailing `(` must still end
/// at a word boundary so `.map` does not match `.mapping`.
fn is_call_at(code: &str, i: usize, call: &str) -> bool {
    let rest = &code[i..];
    if !rest.starts_with(call) {
        return false;
    }
    call.ends_with('(')
        || !rest[call.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

fn scan_indentation(view: &SourceView, table: &LanguagePatternTable) -> LoopScan {
    let mut stack: Vec<usize> = Vec::new();
    let mut max_depth = 0;
    let mut loop_lines = BTreeSet::new();

    for line in view.code_lines() {
        while stack.last().is_some_and(|&indent| indent >= line.indent) {
            stack.pop();
        }

        let mut tokens = identifiers(&line.code).map(|(_, t)| t);
        let first = tokens.next();
        let opens_loop = first.is_some_and(|w| table.is_loop_keyword(w))
            || (first == Some("async") && line.trimmed().starts_with("async for"))
            || table
                .loop_calls
                .iter()
                .any(|c| is_call_in(&line.code, c) && opens_block(&line.code));

        // Comprehension / generator `for`s that do not open the line.
        let inline_fors = if view.language == Language::Python {
            identifiers(&line.code)
                .skip(1)
                .filter(|(_, t)| *t == "for")
                .count()
        } else {
            0
        };

        if opens_loop {
            stack.push(line.indent);
        }
        let active = stack.len() + inline_fors;
        max_depth = max_depth.max(active);
        if active > 0 {
            loop_lines.insert(line.number);
        }
    }

    LoopScan {
        max_depth,
        loop_lines,
    }
}

fn is_call_in(code: &str, call: &str) -> bool {
    code.match_indices(call).any(|(i, _)| is_call_at(code, i, call))
}

/// Ruby/Lua-style iterator blocks open with `do` or `{ |x|`.
fn opens_block(code: &str) -> bool {
    identifiers(code).any(|(_, t)| t == "do") || code.contains('|')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternTables;

    fn depth(text: &str, lang: Language) -> usize {
        let tables = PatternTables::builtin().unwrap();
        let table = tables.table(lang).unwrap();
        scan(&SourceView::new(text, table), table).max_depth
    }

    #[test]
    fn test_single_line_nested_for() {
        let code = "for(i=0;i<n;i++){for(j=0;j<n;j++){total+=arr[i][j];}}";
        assert_eq!(depth(code, Language::C), 2);
    }

    #[test]
    fn test_sequential_loops_do_not_nest() {
        let code = "for (let i = 0; i < n; i++) {\n  a();\n}\nfor (let j = 0; j < n; j++) {\n  b();\n}\n";
        assert_eq!(depth(code, Language::JavaScript), 1);
    }

    #[test]
    fn test_braceless_and_callback_loops() {
        assert_eq!(depth("for (i = 0; i < n; i++) sum += i;", Language::C), 1);
        assert_eq!(
            depth("items.forEach((x) => {\n  x.parts.forEach((p) => use(p));\n});", Language::JavaScript),
            2
        );
    }

    #[test]
    fn test_rust_impl_for_is_not_a_loop() {
        assert_eq!(depth("impl Display for Thing {\n}\n", Language::Rust), 0);
    }

    #[test]
    fn test_go_for_header_with_semicolons() {
        let code = "for i := 0; i < n; i++ {\n\tfor j := 0; j < n; j++ {\n\t}\n}\n";
        assert_eq!(depth(code, Language::Go), 2);
    }

    #[test]
    fn test_python_nesting_and_comprehension() {
        let code = "for a in xs:\n    for b in ys:\n        print(a, b)\nvals = [x for x in xs]\n";
        assert_eq!(depth(code, Language::Python), 2);
        assert_eq!(depth("vals = [x for x in xs]\n", Language::Python), 1);
    }
}
