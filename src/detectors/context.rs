// SPDX-License-Identifier: PMPL-1.0-or-later

//! Variable-provenance context shared by the detectors
//!
//! One pass over the unit collects which names are loop-bounded,
//! null-checked or zero-checked (with the first line that establishes
//! it) and where try/protected blocks sit together with the identifiers
//! lexically inside them.

use crate::patterns::LanguagePatternTable;
use crate::source::{identifiers, SourceView};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};

const LOOP_BOUND_PATTERNS: &[&str] = &[
    // for (let i = 0; ...)
    r"\bfor\s*\(\s*(?:(?:let|var|const|int|long|size_t|unsigned|auto|uint|usize|short|final|register)\s+)*(?P<var>[A-Za-z_$][\w$]*)\s*=",
    // for (const x of xs) / for (k in obj)
    r"\bfor\s*\(\s*(?:(?:let|var|const|final|auto)\s+)?(?:[\w<>\[\]?]+\s+)?&?(?P<var>[A-Za-z_$][\w$]*)\s+(?:of|in)\b",
    // for (Item x : items) / for (auto& x : xs)
    r"\bfor\s*\(\s*[\w<>\[\],.?&*:\s]+?[\s&*](?P<var>[A-Za-z_]\w*)\s*:[^:]",
    r"\bforeach\s*\(\s*(?:var\s+|[\w<>\[\]]+\s+)?(?P<var>\w+)\s+in\b",
    r"\bforeach\s*\(.*?\bas\s+\$?(?P<var>\w+)(?:\s*=>\s*\$?(?P<var2>\w+))?",
    // for x in xs / for (i, x) in / for k, v in pairs(t)
    r"\bfor\s+\(?\s*(?:(?:let|var|mut)\s+)?(?P<var>[A-Za-z_]\w*)(?:\s*,\s*(?P<var2>[A-Za-z_]\w*))?\s*\)?\s+in\b",
    r"\bfor\s+(?P<var>\w+)(?:\s*,\s*(?P<var2>\w+))?\s*:=\s*range\b",
    r"\bfor\s+(?P<var>\w+)\s*:?=",
    r"\bfor\s*\(\s*(?P<var>\w+)\s*<-",
    // array callbacks: xs.forEach((x, i) => ...), xs.iter().for_each(|x| ...)
    r"\.(?:forEach|map|filter|reduce|some|every|find|findIndex|flatMap|each|each_with_index|map_with_index|for_each|times)\s*[({]?\s*(?:function\s*)?\(?\s*\|?\s*(?P<var>[A-Za-z_$][\w$]*)(?:\s*,\s*(?P<var2>[A-Za-z_$][\w$]*))?",
    r"\b(?:do|\{)\s*\|\s*(?P<var>\w+)(?:\s*,\s*(?P<var2>\w+))?\s*\|",
    // explicit bounds checks
    r"\b(?P<var>[A-Za-z_$][\w$]*)\s*<=?\s*[\w$.]*?\.?(?:length|size\(\)|size|len\(\)|count|Length|Count)\b",
    r"\b(?P<var>[A-Za-z_]\w*)\s*<=?\s*len\(",
    r"(?:length|size\(\)|len\([^)]*\)|count)\s*>=?\s*(?P<var>[A-Za-z_$][\w$]*)\b",
    r"\b(?P<var>[A-Za-z_]\w*)\s+in\s+range\(",
];

const NULL_GUARD_PATTERNS: &[&str] = &[
    r"(?P<var>[A-Za-z_$][\w$.]*)\s*(?:!==?|===?|\bis\s+not\b|\bis\b)\s*(?:null|undefined|nil|None|NULL|nullptr)\b",
    r"\b(?:null|undefined|nil|None|NULL|nullptr)\s*(?:!==?|===?)\s*(?P<var>[A-Za-z_$][\w$.]*)",
    r"(?P<var>[A-Za-z_$][\w$]*)\s*\?\.",
    r"(?P<var>[A-Za-z_$][\w$.]*)\s*\?\?",
    r"\btypeof\s+(?P<var>[\w$.]+)\s*[!=]==?",
    r"(?P<var>[\w$.]+)\s+instanceof\b",
    r"\bif\s*\(\s*!?\s*(?P<var>[A-Za-z_$][\w$.]*)\s*\)",
    r"\b(?:if|elif|elsif|unless|while)\s+(?:not\s+)?(?P<var>[A-Za-z_][\w.]*)\s*(?::|$|\bthen\b)",
    r"\b(?:Objects\.(?:nonNull|requireNonNull|isNull)|isset|is_null|empty|Array\.isArray|isinstance|Optional\.ofNullable|String\.IsNullOrEmpty|string\.IsNullOrEmpty|assert)\s*\(\s*\$?(?P<var>[A-Za-z_$][\w$.]*)",
    r"\bif\s+let\s+Some\s*\(\s*(?:ref\s+)?(?:mut\s+)?(?P<var>\w+)\s*\)\s*=\s*&?(?P<var2>[\w.]+)",
    r"\b(?:guard|if)\s+let\s+(?P<var>\w+)",
    r"(?P<var>[\w.]+)\.(?:is_some|is_none|isPresent|isEmpty|is_empty|has_value)\s*\(",
    r"(?P<var>[A-Za-z_$][\w$.]*)\s*&&",
    r"(?P<var>[\w.]+)\s*\?:",
];

const ZERO_GUARD_PATTERNS: &[&str] = &[
    r"(?P<var>[A-Za-z_$][\w$.]*)\s*(?:!==?|===?|>|<=|~=)\s*0(?:\.0+)?\b",
    r"\b0(?:\.0+)?\s*(?:!==?|===?|<|>=)\s*(?P<var>[A-Za-z_$][\w$.]*)",
    r"\bif\s*\(\s*!?\s*(?P<var>[A-Za-z_$][\w$.]*)\s*\)",
    r"\b(?:if|unless)\s+(?:not\s+)?(?P<var>[A-Za-z_]\w*)\s*(?::|$|\bthen\b)",
];

/// Words a permissive capture can pick up that are never variables.
const NOT_VARIABLES: &[&str] = &[
    "do", "function", "if", "not", "let", "var", "const", "return", "new", "true", "false",
    "in", "of", "then", "else", "and", "or",
];

/// A try/protected region and the identifiers lexically inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBlock {
    /// 1-based, inclusive
    pub start: usize,
    pub end: usize,
    pub variables: HashSet<String>,
}

impl ProtectedBlock {
    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }

    /// Whether `var` (or its root object) is in the block's scope.
    pub fn covers(&self, var: &str) -> bool {
        self.variables.contains(var) || self.variables.contains(root(var))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanContext {
    /// name -> first line establishing the fact
    pub loop_bounded: HashMap<String, usize>,
    pub null_checked: HashMap<String, usize>,
    pub zero_checked: HashMap<String, usize>,
    pub protected: Vec<ProtectedBlock>,
}

impl ScanContext {
    pub fn is_loop_bounded(&self, var: &str, line: usize) -> bool {
        established(&self.loop_bounded, var, line)
    }

    pub fn is_null_checked(&self, var: &str, line: usize) -> bool {
        established(&self.null_checked, var, line)
    }

    pub fn is_zero_checked(&self, var: &str, line: usize) -> bool {
        established(&self.zero_checked, var, line)
    }

    pub fn protecting_blocks(&self, line: usize) -> impl Iterator<Item = &ProtectedBlock> {
        self.protected.iter().filter(move |b| b.contains(line))
    }
}

fn root(var: &str) -> &str {
    var.split('.').next().unwrap_or(var)
}

fn established(map: &HashMap<String, usize>, var: &str, line: usize) -> bool {
    let var = normalize(var);
    [var, root(var)]
        .iter()
        .any(|name| map.get(*name).is_some_and(|&first| first <= line))
}

fn normalize(var: &str) -> &str {
    var.trim_start_matches('$').trim_end_matches('.')
}

pub struct ContextExtractor {
    loop_bound: Vec<Regex>,
    null_guard: Vec<Regex>,
    zero_guard: Vec<Regex>,
    throws_clause: Regex,
}

impl ContextExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            loop_bound: compile(LOOP_BOUND_PATTERNS)?,
            null_guard: compile(NULL_GUARD_PATTERNS)?,
            zero_guard: compile(ZERO_GUARD_PATTERNS)?,
            throws_clause: Regex::new(r"\)\s*throws\s+\w")?,
        })
    }

    pub fn extract(&self, view: &SourceView, table: &LanguagePatternTable) -> ScanContext {
        let mut ctx = ScanContext::default();

        for line in view.code_lines() {
            record(&self.loop_bound, &line.code, line.number, &mut ctx.loop_bounded);
            record(&self.null_guard, &line.code, line.number, &mut ctx.null_checked);
            record(&self.zero_guard, &line.code, line.number, &mut ctx.zero_checked);
        }

        ctx.protected = self.protected_blocks(view, table);
        ctx
    }

    fn protected_blocks(&self, view: &SourceView, table: &LanguagePatternTable) -> Vec<ProtectedBlock> {
        let mut blocks = Vec::new();

        for (idx, line) in view.lines.iter().enumerate() {
            if !line.is_code() {
                continue;
            }
            let opener = identifiers(&line.code)
                .find(|(_, t)| table.try_keywords.contains(t))
                .map(|(pos, _)| pos)
                .or_else(|| self.throws_clause.find(&line.code).map(|m| m.start()));
            let Some(column) = opener else {
                continue;
            };

            let end = view.block_end(idx, column);
            let variables = view.lines[idx..=end]
                .iter()
                .flat_map(|l| identifiers(&l.code).map(|(_, t)| t.to_string()))
                .collect();

            blocks.push(ProtectedBlock {
                start: line.number,
                end: end + 1,
                variables,
            });
        }

        blocks
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("compiling context pattern {:?}", p)))
        .collect()
}

fn record(patterns: &[Regex], code: &str, line: usize, into: &mut HashMap<String, usize>) {
    for re in patterns {
        for caps in re.captures_iter(code) {
            for group in ["var", "var2"] {
                let Some(m) = caps.name(group) else {
                    continue;
                };
                let name = normalize(m.as_str());
                if name.is_empty() || NOT_VARIABLES.contains(&name) {
                    continue;
                }
                into.entry(name.to_string()).or_insert(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternTables;
    use crate::types::Language;

    fn context(text: &str, lang: Language) -> ScanContext {
        let tables = PatternTables::builtin().unwrap();
        let table = tables.table(lang).unwrap();
        let view = SourceView::new(text, table);
        ContextExtractor::new().unwrap().extract(&view, table)
    }

    #[test]
    fn test_loop_variables_are_bounded() {
        let ctx = context(
            "for(i=0;i<n;i++){for(j=0;j<n;j++){total+=arr[i][j];}}",
            Language::C,
        );
        assert!(ctx.is_loop_bounded("i", 1));
        assert!(ctx.is_loop_bounded("j", 1));
        assert!(!ctx.is_loop_bounded("total", 1));
    }

    #[test]
    fn test_guards_apply_only_after_they_appear() {
        let ctx = context("let r = a / b;\nif (b !== 0) {\n  r = a / b;\n}\n", Language::JavaScript);
        assert!(!ctx.is_zero_checked("b", 1));
        assert!(ctx.is_zero_checked("b", 3));
    }

    #[test]
    fn test_try_block_span_and_scope() {
        let ctx = context(
            "function f(x) {\n  try {\n    return JSON.parse(x);\n  } catch (e) {\n    return null;\n  }\n}\n",
            Language::JavaScript,
        );
        let block = ctx.protecting_blocks(3).next().expect("line 3 is protected");
        assert_eq!((block.start, block.end), (2, 4));
        assert!(block.covers("x"));
        assert!(ctx.protecting_blocks(5).next().is_none());
    }

    #[test]
    fn test_python_null_guard() {
        let ctx = context("if data is not None:\n    process(data)\n", Language::Python);
        assert!(ctx.is_null_checked("data", 2));
    }
}
