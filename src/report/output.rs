// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for exported reports

use crate::report::sarif;
use crate::types::AnalysisResult;
use anyhow::Result;
use clap::ValueEnum;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportOutputFormat {
    Json,
    Yaml,
    Markdown,
    Sarif,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            "markdown" | "md" => Some(ReportOutputFormat::Markdown),
            "sarif" => Some(ReportOutputFormat::Sarif),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportOutputFormat::Json => "json",
            ReportOutputFormat::Yaml => "yaml",
            ReportOutputFormat::Markdown => "md",
            ReportOutputFormat::Sarif => "sarif",
        }
    }

    /// `artifact` names the analysed file in formats that carry locations.
    pub fn serialize(&self, result: &AnalysisResult, artifact: &str) -> Result<String> {
        match self {
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(result)?),
            ReportOutputFormat::Markdown => Ok(format_markdown(result, artifact)),
            ReportOutputFormat::Sarif => sarif::to_sarif_json(result, artifact),
        }
    }
}

fn format_markdown(result: &AnalysisResult, artifact: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# codesift report: {}\n", artifact);
    let _ = writeln!(
        out,
        "- Language: {} (confidence {}, {})",
        result.detection.language, result.detection.confidence, result.detection.reason
    );
    let _ = writeln!(
        out,
        "- Lines: {} ({} code, {} comment)",
        result.metrics.lines_of_code, result.metrics.code_lines, result.metrics.comment_lines
    );
    let _ = writeln!(out, "- Functions: {}", result.metrics.function_count);
    let _ = writeln!(out, "- Cyclomatic complexity: {}", result.metrics.cyclomatic_complexity);
    let _ = writeln!(out, "- {}", result.time_complexity.description);
    let _ = writeln!(out, "- {}", result.space_complexity.description);
    let _ = writeln!(
        out,
        "- Quality: {:.1} ({})",
        result.quality.score, result.quality.maintainability
    );
    let _ = writeln!(
        out,
        "- Security: {}/100 (grade {})",
        result.security.score, result.security.grade
    );
    if result.metadata.ai_analysis_used {
        out.push_str("- Enriched by remote analysis\n");
    }
    out.push('\n');

    out.push_str(&result.violations.summary_text);

    if !result.security.findings.is_empty() {
        out.push_str("\n## Security Findings\n\n");
        for finding in &result.security.findings {
            let line = finding
                .line
                .map(|l| format!("line {}", l))
                .unwrap_or_else(|| "unknown line".to_string());
            let _ = writeln!(
                out,
                "- **{}** {} [{}] at {}: {}",
                finding.severity, finding.title, finding.cwe_id, line, finding.suggestion
            );
        }
    }

    if !result.test_cases.is_empty() {
        out.push_str("\n## Suggested Tests\n\n");
        for test in &result.test_cases {
            let _ = writeln!(out, "- `{}`: `{}` -> {}", test.name, test.input, test.expected_output);
        }
    }

    out
}
