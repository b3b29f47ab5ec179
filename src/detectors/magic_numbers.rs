// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{Detector, DetectorInput};
use crate::types::{IssueKind, RawIssue, ViolationSeverity};
use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;

/// Unnamed numeric literals, reported once per numeric value (`45` and
/// `45.0` are the same number).
pub struct MagicNumbers {
    literal: Regex,
    constant_decl: Regex,
}

impl MagicNumbers {
    pub fn new() -> Result<Self> {
        Ok(Self {
            literal: Regex::new(r"(?:^|[^\w.])(?P<num>\d+(?:\.\d+)?)\b")?,
            constant_decl: Regex::new(
                r"\bconst\b|\bfinal\b|#define\b|\bconstexpr\b|\benum\b|^\s*[A-Z][A-Z0-9_]*\s*[:=]|\b(?:let|var|val|static|readonly)\s+[A-Z][A-Z0-9_]*\b",
            )?,
        })
    }
}

/// Significant digits, ignoring the leading zeros of `0.5`-style values.
fn significant_digits(literal: &str) -> usize {
    literal
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .count()
}

impl Detector for MagicNumbers {
    fn name(&self) -> &'static str {
        "magic-numbers"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        let mut seen = HashSet::new();
        let mut issues = Vec::new();

        for line in input.view.code_lines() {
            if self.constant_decl.is_match(&line.code) {
                continue;
            }
            for caps in self.literal.captures_iter(&line.code) {
                let Some(num) = caps.name("num") else {
                    continue;
                };
                let text = num.as_str();
                if significant_digits(text) < 2 {
                    continue;
                }
                let Ok(value) = text.parse::<f64>() else {
                    continue;
                };
                if input.config.is_allowed_number(value) || !seen.insert(value.to_bits()) {
                    continue;
                }
                issues.push(
                    RawIssue::new(
                        line.number,
                        IssueKind::MagicNumber,
                        ViolationSeverity::Minor,
                        format!("Magic number {} should be a named constant", text),
                    )
                    .at_column(num.start() + 1),
                );
            }
        }

        Ok(issues)
    }
}
