// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{Detector, DetectorInput};
use crate::source::SourceLine;
use crate::types::{IssueKind, RawIssue, ViolationSeverity};
use anyhow::Result;

/// Flags code lines nested deeper than the configured threshold.
pub struct DeepNesting;

/// Depth a line's content sits at. A closing brace belongs to the level it
/// returns to; a block opened and closed on the same line counts at its
/// deepest point.
fn content_depth(line: &SourceLine) -> usize {
    if line.peak > line.depth.max(line.depth_after) {
        line.peak
    } else {
        line.trough
    }
}

impl Detector for DeepNesting {
    fn name(&self) -> &'static str {
        "deep-nesting"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        let threshold = input.config.nesting_threshold;

        Ok(input
            .view
            .code_lines()
            .filter_map(|line| {
                let depth = content_depth(line);
                (depth > threshold).then(|| {
                    RawIssue::new(
                        line.number,
                        IssueKind::DeepNesting,
                        ViolationSeverity::Major,
                        format!(
                            "Deep nesting detected: depth {} exceeds threshold {}",
                            depth, threshold
                        ),
                    )
                })
            })
            .collect())
    }
}
