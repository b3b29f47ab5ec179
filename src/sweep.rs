// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sweep: batch analysis across a directory tree
//!
//! Walks a directory, picks every file whose extension maps to a known
//! language, analyses them in parallel and produces a summary sorted by
//! issue count (highest first).

use crate::analyzer::Analyzer;
use crate::source::decode_source;
use crate::types::{Language, ViolationSeverity};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directories that hold dependencies or build output rather than source
const SKIPPED_DIRS: &[&str] = &[
    "target", "node_modules", "vendor", "dist", "build", "__pycache__", "venv", ".venv",
];

/// Configuration for a sweep run
pub struct SweepConfig {
    pub directory: PathBuf,
    /// Minimum number of issues for a file to be listed
    pub min_issues: usize,
}

/// Results from analysing a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub path: PathBuf,
    pub language: Option<Language>,
    pub issue_count: usize,
    pub major_count: usize,
    pub minor_count: usize,
    pub security_findings: usize,
    pub security_score: u32,
    pub lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Complete sweep report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub created_at: String,
    pub directory: PathBuf,
    pub files_scanned: usize,
    pub files_with_issues: usize,
    pub total_issues: usize,
    pub total_major: usize,
    pub results: Vec<FileResult>,
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// Every recognised source file under `directory`, sorted.
pub fn discover_sources(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        anyhow::bail!("Not a directory: {}", directory.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(directory).into_iter().filter_entry(|e| !is_skipped(e)) {
        let entry = entry.with_context(|| format!("walking {}", directory.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !Language::extension_candidates(&path.to_string_lossy()).is_empty() {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn analyse_file(analyzer: &Analyzer, path: &Path) -> FileResult {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return FileResult {
                path: path.to_path_buf(),
                language: None,
                issue_count: 0,
                major_count: 0,
                minor_count: 0,
                security_findings: 0,
                security_score: 100,
                lines: 0,
                error: Some(e.to_string()),
            }
        }
    };
    let text = decode_source(&bytes);
    let name = path.to_string_lossy();
    let result = analyzer.analyze_named(&text, "auto", Some(name.as_ref()));
    debug!(path = %path.display(), issues = result.issue_count(), "file analysed");

    let major_count = result
        .violations
        .line_references
        .iter()
        .filter(|i| i.severity == ViolationSeverity::Major)
        .count();

    FileResult {
        path: path.to_path_buf(),
        language: Some(result.metadata.language),
        issue_count: result.issue_count(),
        major_count,
        minor_count: result.violations.minor_count,
        security_findings: result.security.findings.len(),
        security_score: result.security.score,
        lines: result.metrics.lines_of_code,
        error: None,
    }
}

/// Analyse every source file under the configured directory
pub fn run(analyzer: &Analyzer, config: &SweepConfig) -> Result<SweepReport> {
    let files = discover_sources(&config.directory)?;
    let mut results: Vec<FileResult> = files
        .par_iter()
        .map(|path| analyse_file(analyzer, path))
        .collect();

    // Noisiest files first; path breaks ties so output is stable.
    results.sort_by(|a, b| b.issue_count.cmp(&a.issue_count).then_with(|| a.path.cmp(&b.path)));
    if config.min_issues > 0 {
        results.retain(|r| r.issue_count >= config.min_issues);
    }

    let files_with_issues = results.iter().filter(|r| r.issue_count > 0).count();
    let total_issues: usize = results.iter().map(|r| r.issue_count).sum();
    let total_major: usize = results.iter().map(|r| r.major_count).sum();

    Ok(SweepReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        directory: config.directory.clone(),
        files_scanned: files.len(),
        files_with_issues,
        total_issues,
        total_major,
        results,
    })
}

/// Print a summary table to the terminal
pub fn print_summary(report: &SweepReport) {
    println!("\n=== SWEEP SUMMARY ===");
    println!(
        "Directory: {}  |  Files scanned: {}  |  With issues: {}",
        report.directory.display(),
        report.files_scanned,
        report.files_with_issues
    );
    println!(
        "Total issues: {}  |  Major: {}",
        report.total_issues, report.total_major
    );
    println!();

    if report.results.is_empty() {
        println!("  No files with issues.");
        return;
    }

    println!(
        "  {:<48} {:>10} {:>6} {:>6} {:>6} {:>8}",
        "File", "Language", "Issues", "Major", "Sec", "Lines"
    );
    println!("  {}", "-".repeat(90));

    for result in report.results.iter().take(20) {
        let shown = result
            .path
            .strip_prefix(&report.directory)
            .unwrap_or(&result.path)
            .display()
            .to_string();
        if let Some(err) = &result.error {
            println!("  {:<48} ERROR: {}", shown, err);
        } else {
            let language = result.language.map(|l| l.id()).unwrap_or("?");
            println!(
                "  {:<48} {:>10} {:>6} {:>6} {:>6} {:>8}",
                shown,
                language,
                result.issue_count,
                result.major_count,
                result.security_findings,
                result.lines,
            );
        }
    }

    if report.results.len() > 20 {
        println!("  ... and {} more files", report.results.len() - 20);
    }
    println!();
}

/// Write sweep report as JSON
pub fn write_report(report: &SweepReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("writing sweep report {}", path.display()))?;
    Ok(())
}
