// SPDX-License-Identifier: PMPL-1.0-or-later

use super::context::ScanContext;
use super::{Detector, DetectorInput};
use crate::patterns::{GuardKind, RiskyOperation};
use crate::types::RawIssue;
use anyhow::Result;

/// Names that show up in `[...]` as type arguments rather than indices.
const TYPE_LIKE: &[&str] = &[
    "int", "str", "float", "bool", "string", "number", "any", "u8", "u16", "u32", "u64",
    "usize", "i32", "i64", "char", "byte", "object", "T", "K", "V",
];

/// Risky-operation matches that survive context suppression.
pub struct RiskyOperations;

impl Detector for RiskyOperations {
    fn name(&self) -> &'static str {
        "unhandled-exception"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        let language = input.view.language;
        let ops: Vec<&RiskyOperation> = input.tables.risky_for(language).collect();
        let mut issues = Vec::new();

        for line in input.view.code_lines() {
            for op in &ops {
                for caps in op.pattern.captures_iter(&line.code) {
                    let Some(whole) = caps.get(0) else {
                        continue;
                    };
                    if op.postfix && !follows_expression(&line.code, whole.start()) {
                        continue;
                    }
                    let var = caps
                        .name("var")
                        .map(|m| m.as_str().trim_start_matches('$').trim_end_matches('.'));
                    if var.is_some_and(skip_variable) {
                        continue;
                    }
                    if is_suppressed(op, var, line.number, input.context) {
                        continue;
                    }

                    let message = match (op.guard, var) {
                        (GuardKind::Bounds | GuardKind::Zero, Some(v)) => {
                            format!("{} ('{}')", op.message, v)
                        }
                        _ => op.message.to_string(),
                    };
                    issues.push(
                        RawIssue::new(line.number, op.kind, op.severity, message)
                            .at_column(whole.start() + 1),
                    );
                    break;
                }
            }
        }

        Ok(issues)
    }
}

fn follows_expression(code: &str, start: usize) -> bool {
    code[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | ']' | ')' | '$'))
}

fn skip_variable(var: &str) -> bool {
    var.is_empty()
        || TYPE_LIKE.contains(&var)
        || (var.len() > 1 && var.chars().all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit()))
}

/// A match is suppressed by an enclosing protected block whose scope
/// holds the variable, or by the guard fact its operation requires.
pub fn is_suppressed(op: &RiskyOperation, var: Option<&str>, line: usize, ctx: &ScanContext) -> bool {
    let protected = ctx
        .protecting_blocks(line)
        .any(|block| var.map_or(true, |v| block.covers(v)));
    if protected {
        return true;
    }

    let Some(var) = var else {
        return false;
    };
    match op.guard {
        GuardKind::Protected => false,
        GuardKind::Null => ctx.is_null_checked(var, line),
        GuardKind::Bounds => ctx.is_loop_bounded(var, line),
        GuardKind::Zero => ctx.is_zero_checked(var, line),
    }
}
