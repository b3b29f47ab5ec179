// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{Detector, DetectorInput};
use crate::source::identifiers;
use crate::types::{IssueKind, RawIssue, ViolationSeverity};
use anyhow::Result;
use regex::Regex;

const JUMPS: &[&str] = &["return", "break", "continue"];

/// Words that open the next branch of the enclosing construct.
const TERMINATORS: &[&str] = &[
    "end", "else", "elif", "elsif", "case", "default", "catch", "except", "finally", "fi",
    "done", "esac", "rescue", "ensure", "when", "until",
];

/// Lines directly after an unconditional `return`/`break`/`continue` in the
/// same block.
pub struct DeadCode {
    continues: Regex,
}

impl DeadCode {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // Statement carries on past the line break.
            continues: Regex::new(r"(?:[{(\[,+\-*/=&|?.\\]|\band|\bor|\bnot)\s*$")?,
        })
    }
}

impl Detector for DeadCode {
    fn name(&self) -> &'static str {
        "dead-code"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        let code: Vec<_> = input.view.code_lines().collect();
        let mut issues = Vec::new();

        for pair in code.windows(2) {
            let (line, next) = (pair[0], pair[1]);
            let trimmed = line.trimmed();
            let Some((_, first)) = identifiers(trimmed).next() else {
                continue;
            };
            if !JUMPS.contains(&first) || !trimmed.starts_with(first) {
                continue;
            }
            if self.continues.is_match(trimmed) {
                continue;
            }

            let next_trimmed = next.trimmed();
            if next_trimmed.starts_with(['}', ')', ']']) {
                continue;
            }
            if identifiers(next_trimmed)
                .next()
                .is_some_and(|(pos, w)| pos == 0 && TERMINATORS.contains(&w))
            {
                continue;
            }
            if next.depth < line.depth_after {
                continue;
            }

            issues.push(RawIssue::new(
                next.number,
                IssueKind::DeadCode,
                ViolationSeverity::Minor,
                format!("Unreachable code after {} statement", first),
            ));
        }

        Ok(issues)
    }
}
