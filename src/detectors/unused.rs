// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{Detector, DetectorInput};
use crate::source::identifiers;
use crate::types::{IssueKind, Language, RawIssue, ViolationSeverity};
use anyhow::Result;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Declared-but-never-referenced identifiers.
///
/// Declarations come from per-language patterns; usage is every other
/// whole-token occurrence of the name anywhere in the unit.
pub struct UnusedVariables {
    binding: Regex,
    typed: Regex,
    assignment: Regex,
    php_assignment: Regex,
    short_decl: Regex,
    lua_local: Regex,
}

impl UnusedVariables {
    pub fn new() -> Result<Self> {
        Ok(Self {
            binding: Regex::new(
                r"\b(?:let|const|var|val)\s+(?:mut\s+)?(?P<name>[A-Za-z_$][\w$]*)\s*(?:[:=;,]|$)",
            )?,
            typed: Regex::new(
                r"^\s*(?:(?:final|const|static|volatile|register)\s+)*(?:int|long|short|float|double|char|bool|boolean|byte|String|string|auto|size_t|unsigned(?:\s+int)?|[A-Z]\w*(?:<[^>]*>)?(?:\[\])?)(?:\s+[*&]*|\s*[*&]+\s*)(?P<name>[a-z_]\w*)\s*(?:=[^=]|;)",
            )?,
            assignment: Regex::new(r"^\s*(?P<name>[a-z_]\w*)\s*=[^=~]")?,
            php_assignment: Regex::new(r"^\s*\$(?P<name>\w+)\s*=[^=]")?,
            short_decl: Regex::new(r"(?:^|[^\w.])(?P<name>[A-Za-z_]\w*)\s*(?:,\s*[A-Za-z_]\w*\s*)?:=")?,
            lua_local: Regex::new(r"\blocal\s+(?P<name>[A-Za-z_]\w*)")?,
        })
    }

    fn patterns(&self, language: Language) -> Vec<&Regex> {
        let mut out = vec![&self.binding];
        match language {
            Language::Java | Language::C | Language::Cpp | Language::CSharp => out.push(&self.typed),
            Language::Python | Language::Ruby => out.push(&self.assignment),
            Language::Php => out.push(&self.php_assignment),
            Language::Go => out.push(&self.short_decl),
            Language::Lua => out.push(&self.lua_local),
            _ => {}
        }
        out
    }
}

impl Detector for UnusedVariables {
    fn name(&self) -> &'static str {
        "unused-variables"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        let patterns = self.patterns(input.view.language);
        let function_names: HashSet<&str> =
            input.functions.iter().map(|f| f.name.as_str()).collect();

        let mut usage: HashMap<&str, usize> = HashMap::new();
        for line in input.view.code_lines() {
            for (_, token) in identifiers(&line.code) {
                *usage.entry(token).or_insert(0) += 1;
            }
        }

        let mut declared = HashSet::new();
        let mut issues = Vec::new();

        for line in input.view.code_lines() {
            if line.code.contains("export ") {
                continue;
            }
            for re in &patterns {
                for caps in re.captures_iter(&line.code) {
                    let Some(m) = caps.name("name") else {
                        continue;
                    };
                    let name = m.as_str().trim_start_matches('$');
                    if name.is_empty()
                        || name.starts_with('_')
                        || name.chars().all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit())
                        || function_names.contains(name)
                        || !declared.insert(name.to_string())
                    {
                        continue;
                    }
                    // The declaring occurrence is the only one.
                    if usage.get(name).copied().unwrap_or(0) <= 1 {
                        issues.push(
                            RawIssue::new(
                                line.number,
                                IssueKind::UnusedVariable,
                                ViolationSeverity::Minor,
                                format!("Unused variable '{}' is declared but never used", name),
                            )
                            .at_column(m.start() + 1),
                        );
                    }
                }
            }
        }

        Ok(issues)
    }
}
