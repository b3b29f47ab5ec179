// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{Detector, DetectorInput};
use crate::types::{IssueKind, RawIssue, ViolationSeverity};
use anyhow::Result;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Sliding-window block hashing over normalised code lines.
///
/// Overlapping windows that repeat together are merged into one run so a
/// six-line copy yields one issue, not four.
pub struct DuplicateBlocks;

struct NormalizedLine {
    number: usize,
    text: String,
    trivial: bool,
}

fn normalize(code: &str) -> String {
    code.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn window_hash(lines: &[NormalizedLine]) -> String {
    let mut hasher = Sha256::new();
    for line in lines {
        hasher.update(line.text.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

impl Detector for DuplicateBlocks {
    fn name(&self) -> &'static str {
        "duplicate-code"
    }

    fn detect(&self, input: &DetectorInput<'_>) -> Result<Vec<RawIssue>> {
        let window = input.config.duplicate_window.max(2);
        let lines: Vec<NormalizedLine> = input
            .view
            .code_lines()
            .map(|l| {
                let text = normalize(&l.code);
                let trivial = text.chars().filter(|c| c.is_alphanumeric()).count() < 3;
                NormalizedLine {
                    number: l.number,
                    text,
                    trivial,
                }
            })
            .collect();

        if lines.len() < window * 2 {
            return Ok(Vec::new());
        }

        // hash -> non-overlapping window start indices, in order
        let mut occurrences: HashMap<String, Vec<usize>> = HashMap::new();
        let mut hashes: Vec<Option<String>> = Vec::with_capacity(lines.len());
        for start in 0..=lines.len() - window {
            let slice = &lines[start..start + window];
            if slice.iter().filter(|l| !l.trivial).count() < 2 {
                hashes.push(None);
                continue;
            }
            let hash = window_hash(slice);
            let starts = occurrences.entry(hash.clone()).or_default();
            if starts.last().map_or(true, |&prev| start >= prev + window) {
                starts.push(start);
            }
            hashes.push(Some(hash));
        }

        let mut issues = Vec::new();
        let mut previous: Option<Vec<usize>> = None;
        let mut run_start: Option<(usize, Vec<usize>, usize)> = None;

        for (idx, hash) in hashes.iter().enumerate() {
            let starts = hash
                .as_ref()
                .and_then(|h| occurrences.get(h))
                .filter(|s| s.len() >= 2 && s[0] == idx)
                .cloned();

            match starts {
                Some(starts) => {
                    let continues = previous
                        .as_ref()
                        .is_some_and(|prev| prev.iter().map(|s| s + 1).eq(starts.iter().copied()));
                    if continues {
                        if let Some((_, _, windows)) = run_start.as_mut() {
                            *windows += 1;
                        }
                    } else {
                        flush(&mut issues, run_start.take(), &lines, window);
                        run_start = Some((idx, starts.clone(), 1));
                    }
                    previous = Some(starts);
                }
                None => {
                    flush(&mut issues, run_start.take(), &lines, window);
                    previous = None;
                }
            }
        }
        flush(&mut issues, run_start.take(), &lines, window);

        Ok(issues)
    }
}

fn flush(
    issues: &mut Vec<RawIssue>,
    run: Option<(usize, Vec<usize>, usize)>,
    lines: &[NormalizedLine],
    window: usize,
) {
    let Some((first, starts, windows)) = run else {
        return;
    };
    let span = window + windows - 1;
    let at: Vec<String> = starts.iter().map(|&s| lines[s].number.to_string()).collect();
    issues.push(RawIssue::new(
        lines[first].number,
        IssueKind::DuplicateCode,
        ViolationSeverity::Major,
        format!(
            "Duplicate code block ({} lines) found at lines {}",
            span,
            at.join(", ")
        ),
    ));
}
