// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{Detector, DetectorInput};
use crate::metrics::MetricsExtractor;
use crate::types::{IssueKind, RawIssue, ViolationSeverity};
use anyhow::Result;

/// Long functions, per-function cyclomatic complexity and long parameter
/// lists, all anchored at the declaration line.
pub struct FunctionShape;

impl FunctionShape {
    pub fn new() -> Self {
        Self
    }
}

impl Detector for FunctionShape {
    fn name(&self) -> &'static str {
        "function-shape"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        let config = input.config;
        let extractor = MetricsExtractor::new(input.table);
        let mut issues = Vec::new();

        for f in input.functions {
            let length = f.length();
            if length > config.function_length_fail {
                issues.push(RawIssue::new(
                    f.start_line,
                    IssueKind::LongFunction,
                    ViolationSeverity::Major,
                    format!(
                        "Long function '{}' ({} lines, limit {})",
                        f.name, length, config.function_length_fail
                    ),
                ));
            } else if length > config.function_length_warn {
                issues.push(RawIssue::new(
                    f.start_line,
                    IssueKind::LongFunction,
                    ViolationSeverity::Minor,
                    format!(
                        "Long function '{}' ({} lines, recommended {})",
                        f.name, length, config.function_length_warn
                    ),
                ));
            }

            let complexity = extractor.function_complexity(input.view, f);
            if complexity > config.function_complexity_threshold {
                issues.push(RawIssue::new(
                    f.start_line,
                    IssueKind::ComplexFunction,
                    ViolationSeverity::Minor,
                    format!(
                        "Complex function '{}' (cyclomatic complexity {}, threshold {})",
                        f.name, complexity, config.function_complexity_threshold
                    ),
                ));
            }

            if f.params.len() > config.max_parameters {
                issues.push(RawIssue::new(
                    f.start_line,
                    IssueKind::LongParameterList,
                    ViolationSeverity::Minor,
                    format!(
                        "Long parameter list in '{}' ({} parameters, max {})",
                        f.name,
                        f.params.len(),
                        config.max_parameters
                    ),
                ));
            }
        }

        Ok(issues)
    }
}
