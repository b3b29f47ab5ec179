// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pattern tables
//!
//! Static, per-language weighted definitions plus the risky-operation and
//! vulnerability-signature tables. Everything regex-based that stands in for
//! a real parser lives behind `PatternTables`; it is built once, shared
//! read-only (usually behind an `Arc`) and passed to every component.

pub mod languages;
pub mod risky;
pub mod security;

use crate::types::Language;
use anyhow::{Context, Result};
use regex::Regex;

pub use languages::LanguageSpec;
pub use risky::{GuardKind, RiskyOperation};
pub use security::VulnerabilitySignature;

/// How block structure is expressed in a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `{ ... }` delimited blocks; depth is counted from braces.
    Braces,
    /// Offside-rule or keyword-terminated blocks; depth is inferred from
    /// indentation.
    Indentation,
}

/// What a single quote starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleQuote {
    /// `'...'` is a string literal
    String,
    /// `'x'` is a character literal; anything longer (lifetimes, labels)
    /// is plain code
    CharLiteral,
    /// Single quotes carry no literal meaning
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteStyle {
    pub single: SingleQuote,
    /// Backtick strings may span lines (JS template literals, Go raw strings).
    pub backtick_multiline: bool,
    /// `"""` / `'''` strings may span lines.
    pub triple_quotes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
    pub line: &'static [&'static str],
    pub block: Option<(&'static str, &'static str)>,
}

/// Compiled pattern table for one language
#[derive(Debug, Clone)]
pub struct LanguagePatternTable {
    pub language: Language,
    pub weight: f64,
    pub keywords: &'static [&'static str],
    pub imports: &'static [&'static str],
    pub syntax: Vec<Regex>,
    pub specific: Vec<Regex>,
    /// Function-declaration patterns with `name` and (optionally) `params`
    /// capture groups, applied per line.
    pub functions: Vec<Regex>,
    pub comments: CommentStyle,
    pub quotes: QuoteStyle,
    pub block_style: BlockStyle,
    pub loop_keywords: &'static [&'static str],
    /// Method calls that iterate a collection (`.forEach(`, `.each`).
    pub loop_calls: &'static [&'static str],
    pub try_keywords: &'static [&'static str],
}

impl LanguagePatternTable {
    fn compile(spec: &LanguageSpec) -> Result<Self> {
        Ok(Self {
            language: spec.language,
            weight: spec.weight,
            keywords: spec.keywords,
            imports: spec.imports,
            syntax: compile_all(spec.language, "syntax", spec.syntax)?,
            specific: compile_all(spec.language, "specific", spec.specific)?,
            functions: compile_all(spec.language, "function", spec.functions)?,
            comments: CommentStyle {
                line: spec.line_comments,
                block: spec.block_comment,
            },
            quotes: spec.quotes,
            block_style: spec.block_style,
            loop_keywords: spec.loop_keywords,
            loop_calls: spec.loop_calls,
            try_keywords: spec.try_keywords,
        })
    }

    pub fn is_loop_keyword(&self, word: &str) -> bool {
        self.loop_keywords.contains(&word)
    }
}

fn compile_all(language: Language, kind: &str, patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).with_context(|| format!("compiling {} {} pattern {:?}", language, kind, p))
        })
        .collect()
}

/// Every pattern table the analyzer consults
#[derive(Debug, Clone)]
pub struct PatternTables {
    languages: Vec<LanguagePatternTable>,
    risky: Vec<RiskyOperation>,
    security: Vec<VulnerabilitySignature>,
}

impl PatternTables {
    /// Compile the built-in tables.
    pub fn builtin() -> Result<Self> {
        let languages = languages::LANGUAGE_SPECS
            .iter()
            .map(LanguagePatternTable::compile)
            .collect::<Result<Vec<_>>>()?;
        let risky = risky::builtin_risky_operations()?;
        let security = security::builtin_signatures()?;

        Ok(Self {
            languages,
            risky,
            security,
        })
    }

    pub fn languages(&self) -> &[LanguagePatternTable] {
        &self.languages
    }

    pub fn table(&self, language: Language) -> Option<&LanguagePatternTable> {
        self.languages.iter().find(|t| t.language == language)
    }

    pub fn risky_operations(&self) -> &[RiskyOperation] {
        &self.risky
    }

    /// Risky operations that apply to `language`.
    pub fn risky_for(&self, language: Language) -> impl Iterator<Item = &RiskyOperation> {
        self.risky
            .iter()
            .filter(move |op| op.languages.is_empty() || op.languages.contains(&language))
    }

    pub fn security_signatures(&self) -> &[VulnerabilitySignature] {
        &self.security
    }

    /// Signatures relevant to `language`, in table order.
    pub fn security_for(
        &self,
        language: Language,
    ) -> impl Iterator<Item = &VulnerabilitySignature> {
        self.security
            .iter()
            .filter(move |s| s.languages.is_empty() || s.languages.contains(&language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_compile() {
        let tables = PatternTables::builtin().expect("builtin tables compile");
        assert_eq!(tables.languages().len(), Language::all().len());
        for lang in Language::all() {
            let table = tables.table(*lang).expect("every language has a table");
            assert!(!table.functions.is_empty(), "{} has no function patterns", lang);
            assert!(table.weight > 0.0);
        }
    }

    #[test]
    fn test_risky_filtering_by_language() {
        let tables = PatternTables::builtin().unwrap();
        let js: Vec<_> = tables.risky_for(Language::JavaScript).map(|r| r.id).collect();
        assert!(js.contains(&"json-parse"));
        let py: Vec<_> = tables.risky_for(Language::Python).map(|r| r.id).collect();
        assert!(!py.contains(&"json-parse"));
    }
}
