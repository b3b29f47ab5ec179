// SPDX-License-Identifier: PMPL-1.0-or-later

//! Time and space complexity estimation
//!
//! Both estimates start at O(1) and are escalated by rules applied in a
//! fixed order. Every rule that fires appends a factor, so the factor list
//! reads as an audit trail of how the final notation was reached.

pub mod loops;

use crate::metrics::FunctionSpan;
use crate::patterns::LanguagePatternTable;
use crate::source::{identifiers, SourceView};
use crate::types::{Advisory, ComplexityClass, ComplexityEstimate, EstimateConfidence, SecuritySeverity};
use anyhow::Result;
use loops::LoopScan;
use regex::Regex;

/// Recursion profile of one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursionInfo {
    pub name: String,
    pub self_calls: usize,
    pub splits_at_midpoint: bool,
    pub permutes: bool,
}

struct Estimate {
    class: ComplexityClass,
    confidence: EstimateConfidence,
    factors: Vec<String>,
}

impl Estimate {
    fn new() -> Self {
        Self {
            class: ComplexityClass::Constant,
            confidence: EstimateConfidence::High,
            factors: Vec::new(),
        }
    }

    /// Replace the class outright.
    fn set(&mut self, class: ComplexityClass, confidence: EstimateConfidence, factor: String) {
        self.class = class;
        self.confidence = self.confidence.min(confidence);
        self.factors.push(factor);
    }

    /// Raise the class to at least `class`; records nothing if already there.
    fn raise(&mut self, class: ComplexityClass, confidence: EstimateConfidence, factor: String) {
        if class > self.class {
            self.set(class, confidence, factor);
        }
    }

    fn finish(self, kind: &str) -> ComplexityEstimate {
        let description = match self.factors.last() {
            Some(last) => format!("{} {}: {}", kind, self.class, last),
            None => format!(
                "{} {}: no loops, recursion or growing allocations detected",
                kind, self.class
            ),
        };
        ComplexityEstimate {
            notation: self.class,
            confidence: self.confidence,
            description,
            factors: self.factors,
        }
    }
}

pub struct ComplexityEstimator {
    binary_search: Regex,
    midpoint: Regex,
    sort_call: Regex,
    cubic_index: Regex,
    memoization: Regex,
    sized_allocation: Regex,
    grid_allocation: Regex,
    growth: Regex,
}

impl ComplexityEstimator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            binary_search: Regex::new(
                r"(?i)\b(?:mid|middle)\w*\b[\s\S]*\b(?:left|low|lo|start)\b[\s\S]*\b(?:right|high|hi|end)\b|\b(?:left|low|lo)\b[\s\S]*\b(?:right|high|hi)\b[\s\S]*\b(?:mid|middle)\w*\b|\bbisect\b|\bbinarySearch\b|\bbinary_search\b",
            )?,
            midpoint: Regex::new(
                r"(?i)\bmid\w*\s*:?=|/\s*2\b|>>\s*1\b|//\s*2\b|\.len\(\)\s*/\s*2|len\(\w+\)\s*//\s*2|\.length\s*/\s*2",
            )?,
            sort_call: Regex::new(
                r"\.sort(?:_by|_unstable|_by_key)?\s*\(|\bsorted\s*\(|\b(?:Arrays|Collections)\.sort\s*\(|\bstd::sort\s*\(|\bqsort\s*\(|\.OrderBy(?:Descending)?\s*\(|\b[uk]?sort\s*\(|\bsort\.(?:Slice|Ints|Strings)\s*\(",
            )?,
            cubic_index: Regex::new(r"\w\s*\[[^\[\]]+\]\s*\[[^\[\]]+\]\s*\[[^\[\]]+\]")?,
            memoization: Regex::new(
                r"(?i)\b(?:memo\w*|cache\w*|dp)\s*(?:\[|\.(?:get|has|set|put|contains\w*|setdefault|insert|entry)\s*\()|@(?:functools\.)?(?:lru_)?cache\b",
            )?,
            sized_allocation: Regex::new(
                r"\bnew\s+Array\s*\(\s*[A-Za-z_]\w*\s*\)|\bnew\s+\w+\s*\[\s*[A-Za-z_]\w*|(?:=|\(|return)\s*\[\s*[^\]]*\]\s*\*\s*[A-Za-z_]\w*|\bvec!\[[^;\]]+;\s*[A-Za-z_]\w*|\bmake\(\s*\[\][^,]+,\s*[A-Za-z_]\w*|\b(?:malloc|calloc)\s*\(\s*[A-Za-z_]\w*\s*[*,]|\bVec::with_capacity\(\s*[A-Za-z_]|\bArray\.from\(\s*\{\s*length\s*:\s*[A-Za-z_]|\.(?:slice|to_vec|concat)\s*\(",
            )?,
            grid_allocation: Regex::new(
                r"\bnew\s+\w+\s*\[[^\]]+\]\s*\[[^\]]+\]|\[\s*\[[^\]]*\]\s*\*\s*\w+\s+for\b|\bvec!\[\s*vec!\[|\bmake\(\s*\[\]\[\]|Array\.from\([^)]*\)\.map\(|\bnew\s+Array\([^)]*\)\.fill\([^)]*\)\.map\(",
            )?,
            growth: Regex::new(
                r"\.(?:push|push_back|append|add|insert|put|unshift|emplace_back|Add|concat)\s*\(|<<\s*\w|\[\s*\]\s*=",
            )?,
        })
    }

    /// Profile every detected function for self-recursion.
    pub fn recursion(&self, view: &SourceView, functions: &[FunctionSpan]) -> Vec<RecursionInfo> {
        functions
            .iter()
            .filter_map(|f| {
                // The start line contributes only what follows the header.
                let body: Vec<&str> = view
                    .lines
                    .iter()
                    .filter(|l| l.is_code() && f.contains(l.number))
                    .filter_map(|l| {
                        if l.number == f.start_line {
                            l.code.get(f.body_offset..)
                        } else {
                            Some(l.code.as_str())
                        }
                    })
                    .collect();
                let self_calls = body.iter().map(|code| count_calls(code, &f.name)).sum();
                if self_calls == 0 {
                    return None;
                }
                let joined = body.join("\n");
                let lowered = f.name.to_lowercase();
                Some(RecursionInfo {
                    name: f.name.clone(),
                    self_calls,
                    splits_at_midpoint: self.midpoint.is_match(&joined),
                    permutes: lowered.contains("permut") || lowered.contains("perms"),
                })
            })
            .collect()
    }

    pub fn estimate(
        &self,
        view: &SourceView,
        table: &LanguagePatternTable,
        functions: &[FunctionSpan],
    ) -> (ComplexityEstimate, ComplexityEstimate) {
        let loop_scan = loops::scan(view, table);
        let recursion = self.recursion(view, functions);
        let code: String = view
            .code_lines()
            .map(|l| l.code.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let time = self.time(&loop_scan, &recursion, &code);
        let space = self.space(view, &loop_scan, &recursion, &code);
        (time, space)
    }

    fn time(&self, loop_scan: &LoopScan, recursion: &[RecursionInfo], code: &str) -> ComplexityEstimate {
        use ComplexityClass::*;
        use EstimateConfidence::*;

        let mut est = Estimate::new();

        match loop_scan.max_depth {
            0 => {}
            1 => est.set(Linear, High, "single loop over the input".to_string()),
            d => est.set(
                ComplexityClass::for_loop_depth(d),
                High,
                format!("nested loop depth {}", d),
            ),
        }

        let branching: Vec<&RecursionInfo> = recursion.iter().filter(|r| r.self_calls > 1).collect();
        let mut exponential = false;
        for r in &branching {
            est.set(
                Exponential,
                Medium,
                format!(
                    "`{}` calls itself {} times per invocation; treated as exponential (heuristic: sequential branches may only be linear)",
                    r.name, r.self_calls
                ),
            );
            exponential = true;
        }
        if !exponential {
            if let Some(r) = recursion.first() {
                est.raise(Linear, Medium, format!("linear recursion in `{}`", r.name));
            }
        }

        let memoised = self.memoization.is_match(code);
        if exponential && memoised {
            est.set(Linear, Medium, "memoised recursion evaluates each subproblem once".to_string());
        }

        let divide_and_conquer = branching
            .iter()
            .find(|r| r.self_calls == 2 && r.splits_at_midpoint);
        if let Some(r) = divide_and_conquer {
            if !memoised {
                est.set(
                    Linearithmic,
                    Medium,
                    format!("`{}` recurses on two halves of its input (divide and conquer)", r.name),
                );
            }
        } else if self.binary_search.is_match(code) && (loop_scan.has_loops() || !recursion.is_empty()) {
            if est.class <= Linear {
                est.set(Logarithmic, Medium, "binary-search pattern halves the search range".to_string());
            } else if est.class == Quadratic {
                est.set(Linearithmic, Medium, "binary search inside a loop".to_string());
            }
        }

        if self.sort_call.is_match(code) && est.class <= Linear {
            est.set(Linearithmic, High, "sort invocation".to_string());
        }

        if self.cubic_index.is_match(code) {
            est.raise(Cubic, Medium, "three-dimensional indexing".to_string());
        }

        if let Some(r) = recursion.iter().find(|r| r.permutes) {
            est.set(
                Factorial,
                Low,
                format!("`{}` generates permutations recursively", r.name),
            );
        }

        est.finish("Time")
    }

    fn space(
        &self,
        view: &SourceView,
        loop_scan: &LoopScan,
        recursion: &[RecursionInfo],
        code: &str,
    ) -> ComplexityEstimate {
        use ComplexityClass::*;
        use EstimateConfidence::*;

        let mut est = Estimate::new();

        if self.sized_allocation.is_match(code) {
            est.raise(Linear, High, "allocation sized by the input".to_string());
        }

        let grows_in_loop = view
            .code_lines()
            .any(|l| loop_scan.in_loop(l.number) && self.growth.is_match(&l.code));
        if grows_in_loop {
            est.raise(Linear, High, "collection grows inside a loop".to_string());
        }

        if self.grid_allocation.is_match(code) {
            est.raise(Quadratic, High, "two-dimensional allocation".to_string());
        }

        if let Some(r) = recursion.first() {
            let halving = r.self_calls == 1 && self.binary_search.is_match(code);
            if halving {
                est.raise(
                    Logarithmic,
                    Medium,
                    format!("recursion depth of `{}` halves each call", r.name),
                );
            } else {
                est.raise(Linear, Medium, format!("call stack depth of recursive `{}`", r.name));
            }
        }

        if self.memoization.is_match(code) {
            est.raise(Linear, Medium, "memoisation table keyed by arguments".to_string());
        }

        est.finish("Space")
    }
}

/// Occurrences of `name` used as a call (`name(` or `name (`).
fn count_calls(code: &str, name: &str) -> usize {
    identifiers(code)
        .filter(|(pos, t)| {
            *t == name
                && code[pos + t.len()..]
                    .trim_start()
                    .starts_with('(')
        })
        .count()
}

/// Advisories derived from the local estimates.
pub fn performance_advisories(time: &ComplexityEstimate, space: &ComplexityEstimate) -> Vec<Advisory> {
    use ComplexityClass::*;

    let mut out = Vec::new();
    match time.notation {
        Exponential | Factorial => out.push(Advisory {
            title: format!("{} time complexity", time.notation),
            severity: SecuritySeverity::High,
            description: "Running time explodes even for modest inputs".to_string(),
            line: None,
            suggestion: Some("Memoise repeated subproblems or switch to an iterative or dynamic-programming formulation".to_string()),
        }),
        Quadratic | Cubic | Quartic => out.push(Advisory {
            title: format!("{} time complexity", time.notation),
            severity: if time.notation == Quadratic {
                SecuritySeverity::Medium
            } else {
                SecuritySeverity::High
            },
            description: "Nested iteration grows polynomially with the input".to_string(),
            line: None,
            suggestion: Some("Replace inner scans with hash lookups or pre-sorted data where possible".to_string()),
        }),
        _ => {}
    }
    if space.notation >= Quadratic {
        out.push(Advisory {
            title: format!("{} space complexity", space.notation),
            severity: SecuritySeverity::Medium,
            description: "Memory use grows faster than the input".to_string(),
            line: None,
            suggestion: Some("Stream or reuse buffers instead of materialising full grids".to_string()),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_calls_needs_paren() {
        assert_eq!(count_calls("return fib(n - 1) + fib (n - 2)", "fib"), 2);
        assert_eq!(count_calls("let fibo = fib;", "fib"), 0);
    }
}
