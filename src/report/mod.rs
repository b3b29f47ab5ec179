// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report rendering: coloured terminal output, JSON/YAML/Markdown export
//! and SARIF.

pub mod formatter;
pub mod output;
pub mod sarif;

use crate::types::AnalysisResult;
use anyhow::Result;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Save a result to file in the given format
pub fn save_report<P: AsRef<Path>>(
    result: &AnalysisResult,
    artifact: &str,
    format: ReportOutputFormat,
    path: P,
) -> Result<()> {
    ReportFormatter::new().save(result, artifact, format, path)
}

/// Print a result to the console
pub fn print_report(result: &AnalysisResult, artifact: &str) {
    ReportFormatter::new().print(result, artifact);
}
