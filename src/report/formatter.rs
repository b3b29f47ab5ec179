// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terminal report formatting and file output

use crate::report::output::ReportOutputFormat;
use crate::types::*;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, result: &AnalysisResult, artifact: &str) {
        println!("\n{}", format!("=== CODESIFT: {} ===", artifact).bold().cyan());
        println!();

        self.print_overview(result);
        println!();

        self.print_violations(&result.violations);
        println!();

        self.print_security(&result.security);
        println!();

        self.print_syntax(&result.syntax_issues);
        self.print_performance(&result.performance);
        self.print_quality(&result.quality);
        println!();
    }

    fn print_overview(&self, result: &AnalysisResult) {
        println!("{}", "OVERVIEW".bold().yellow());
        println!(
            "  Language: {} (confidence {}, {})",
            result.detection.language, result.detection.confidence, result.detection.reason
        );
        if !result.detection.alternatives.is_empty() {
            let alts: Vec<String> = result
                .detection
                .alternatives
                .iter()
                .map(|c| format!("{} {}", c.language, c.confidence))
                .collect();
            println!("  Alternatives: {}", alts.join(", ").dimmed());
        }
        let m = &result.metrics;
        println!(
            "  Lines: {} total, {} code, {} comment ({:.1}%)",
            m.lines_of_code, m.code_lines, m.comment_lines, m.comment_percentage
        );
        println!(
            "  Functions: {} (average {:.1} lines)",
            m.function_count, m.average_function_length
        );
        println!("  Max nesting: {}", m.max_nesting_depth);
        println!("  Cyclomatic complexity: {}", m.cyclomatic_complexity);
        println!(
            "  Time: {}  Space: {}",
            result.time_complexity.notation.to_string().bold(),
            result.space_complexity.notation.to_string().bold()
        );
        for factor in &result.time_complexity.factors {
            println!("    {}", factor.dimmed());
        }
        if result.metadata.ai_analysis_used {
            println!("  {}", "Enriched by remote analysis".green());
        } else if let Some(note) = &result.metadata.enrichment_note {
            println!("  {} {}", "Enrichment unavailable:".yellow(), note.dimmed());
        }
    }

    fn print_violations(&self, report: &ViolationReport) {
        println!("{}", "VIOLATIONS".bold().yellow());
        if report.line_references.is_empty() {
            println!("  {}", "No violations found".green());
            return;
        }
        println!(
            "  {} major, {} minor",
            report.major_count.to_string().red().bold(),
            report.minor_count.to_string().yellow()
        );
        for (category, issues) in &report.categories {
            println!("  {} ({})", category.bold(), issues.len());
            for issue in issues {
                let severity = match issue.severity {
                    ViolationSeverity::Major => issue.severity.to_string().red(),
                    ViolationSeverity::Minor => issue.severity.to_string().yellow(),
                };
                println!("    line {:>4} [{}] {}", issue.line, severity, issue.message);
            }
        }
    }

    fn print_security(&self, report: &SecurityReport) {
        let grade_color = match report.grade {
            'A' | 'B' => "green",
            'C' | 'D' => "yellow",
            _ => "red",
        };
        println!(
            "{} {}/100 (grade {})",
            "SECURITY".bold().yellow(),
            report.score,
            report.grade.to_string().color(grade_color).bold()
        );
        for finding in &report.findings {
            let severity_color = match finding.severity {
                SecuritySeverity::Critical => "red",
                SecuritySeverity::High => "magenta",
                SecuritySeverity::Medium => "yellow",
                SecuritySeverity::Low => "blue",
                SecuritySeverity::Info => "white",
            };
            let line = finding.line.map(|l| l.to_string()).unwrap_or_else(|| "?".to_string());
            println!(
                "  [{}] {} {} (line {}, x{})",
                finding.severity.to_string().color(severity_color),
                finding.title.bold(),
                finding.cwe_id.dimmed(),
                line,
                finding.occurrences
            );
        }
    }

    fn print_syntax(&self, issues: &[Issue<SyntaxSeverity>]) {
        if issues.is_empty() {
            return;
        }
        println!("{}", "SYNTAX".bold().yellow());
        for issue in issues {
            let tag = match issue.severity {
                SyntaxSeverity::Error => "error".red(),
                SyntaxSeverity::Warning => "warning".yellow(),
                SyntaxSeverity::Info => "info".blue(),
            };
            println!("  line {:>4} [{}] {}", issue.line, tag, issue.message);
        }
        println!();
    }

    fn print_performance(&self, advisories: &[Advisory]) {
        if advisories.is_empty() {
            return;
        }
        println!("{}", "PERFORMANCE".bold().yellow());
        for advisory in advisories {
            println!("  - {}: {}", advisory.title.bold(), advisory.description);
            if let Some(suggestion) = &advisory.suggestion {
                println!("    {}", suggestion.dimmed());
            }
        }
        println!();
    }

    fn print_quality(&self, quality: &QualityScore) {
        let color = if quality.score >= 80.0 {
            "green"
        } else if quality.score >= 50.0 {
            "yellow"
        } else {
            "red"
        };
        println!(
            "{} {}/100 ({})",
            "QUALITY".bold().yellow(),
            format!("{:.1}", quality.score).color(color).bold(),
            quality.maintainability
        );
        for note in &quality.notes {
            println!("  - {}", note);
        }
    }

    pub fn save<P: AsRef<Path>>(
        &self,
        result: &AnalysisResult,
        artifact: &str,
        format: ReportOutputFormat,
        path: P,
    ) -> Result<()> {
        let rendered = format.serialize(result, artifact)?;
        fs::write(path.as_ref(), rendered)
            .with_context(|| format!("writing report {}", path.as_ref().display()))?;
        println!("Report saved to: {}", path.as_ref().display());
        Ok(())
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
