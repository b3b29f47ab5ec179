// SPDX-License-Identifier: PMPL-1.0-or-later

//! Violation detector battery
//!
//! Each detector sees the same read-only input and returns raw issues
//! without knowing about the others. The battery runs them in parallel,
//! isolates failures (errors and panics) per detector and returns the
//! combined output in battery order, ready for aggregation.

pub mod context;
pub mod dead_code;
pub mod duplicates;
pub mod functions;
pub mod magic_numbers;
pub mod nesting;
pub mod risky;
pub mod unused;

use crate::config::AnalyzerConfig;
use crate::metrics::FunctionSpan;
use crate::patterns::{LanguagePatternTable, PatternTables};
use crate::source::SourceView;
use crate::types::RawIssue;
use anyhow::Result;
use context::{ContextExtractor, ScanContext};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Everything a detector may look at
pub struct DetectorInput<'a> {
    pub view: &'a SourceView,
    pub table: &'a LanguagePatternTable,
    pub tables: &'a PatternTables,
    pub functions: &'a [FunctionSpan],
    pub context: &'a ScanContext,
    pub config: &'a AnalyzerConfig,
}

pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, input: &DetectorInput<'_>) -> Result<Vec<RawIssue>>;
}

pub struct DetectorBattery {
    detectors: Vec<Box<dyn Detector>>,
    context: ContextExtractor,
}

impl DetectorBattery {
    /// The built-in battery.
    pub fn new() -> Result<Self> {
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(nesting::DeepNesting),
            Box::new(functions::FunctionShape::new()),
            Box::new(magic_numbers::MagicNumbers::new()?),
            Box::new(unused::UnusedVariables::new()?),
            Box::new(duplicates::DuplicateBlocks),
            Box::new(dead_code::DeadCode::new()?),
            Box::new(risky::RiskyOperations),
        ];
        Self::with_detectors(detectors)
    }

    pub fn with_detectors(detectors: Vec<Box<dyn Detector>>) -> Result<Self> {
        Ok(Self {
            detectors,
            context: ContextExtractor::new()?,
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn context(&self, view: &SourceView, table: &LanguagePatternTable) -> ScanContext {
        self.context.extract(view, table)
    }

    pub fn run(
        &self,
        view: &SourceView,
        tables: &PatternTables,
        table: &LanguagePatternTable,
        functions: &[FunctionSpan],
        config: &AnalyzerConfig,
    ) -> Vec<RawIssue> {
        let context = self.context(view, table);
        let input = DetectorInput {
            view,
            table,
            tables,
            functions,
            context: &context,
            config,
        };

        let per_detector: Vec<Vec<RawIssue>> = self
            .detectors
            .par_iter()
            .filter(|d| config.is_detector_enabled(d.name()))
            .map(|d| run_isolated(d.as_ref(), &input))
            .collect();

        per_detector.into_iter().flatten().collect()
    }
}

fn run_isolated(detector: &dyn Detector, input: &DetectorInput<'_>) -> Vec<RawIssue> {
    match catch_unwind(AssertUnwindSafe(|| detector.detect(input))) {
        Ok(Ok(issues)) => {
            debug!(detector = detector.name(), count = issues.len(), "detector finished");
            issues
        }
        Ok(Err(err)) => {
            warn!(detector = detector.name(), error = %err, "detector failed; skipping");
            Vec::new()
        }
        Err(_) => {
            warn!(detector = detector.name(), "detector panicked; skipping");
            Vec::new()
        }
    }
}
