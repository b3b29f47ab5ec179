// SPDX-License-Identifier: PMPL-1.0-or-later

//! Directory sweep tests

use codesift::sweep::{self, SweepConfig, SweepReport};
use codesift::{Analyzer, AnalyzerConfig, Language};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NOISY: &str = "function load(x) {\n  const raw = eval(x);\n  return JSON.parse(raw);\n}\n";
const CLEAN: &str = "def add(a, b):\n    return a + b\n";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn analyzer() -> Analyzer {
    Analyzer::new(AnalyzerConfig::default()).unwrap()
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        min_issues: 0,
    };
    let report = sweep::run(&analyzer(), &config).unwrap();
    assert_eq!(report.files_scanned, 0);
    assert_eq!(report.total_issues, 0);
    assert!(report.results.is_empty());
}

#[test]
fn test_discovery_skips_hidden_and_dependency_dirs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/app.js", NOISY);
    write(dir.path(), "lib/util.py", CLEAN);
    write(dir.path(), "node_modules/pkg/index.js", NOISY);
    write(dir.path(), ".git/hooks/pre-commit.py", CLEAN);
    write(dir.path(), "target/debug/build.rs", "fn main() {}\n");
    write(dir.path(), "README.md", "# readme\n");

    let files = sweep::discover_sources(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["lib/util.py", "src/app.js"]);
}

#[test]
fn test_not_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("single.js");
    fs::write(&file, NOISY).unwrap();
    assert!(sweep::discover_sources(&file).is_err());
}

#[test]
fn test_results_sorted_noisiest_first() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a_clean.py", CLEAN);
    write(dir.path(), "b_noisy.js", NOISY);

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        min_issues: 0,
    };
    let report = sweep::run(&analyzer(), &config).unwrap();

    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.results.len(), 2);
    assert!(report.results[0].path.ends_with("b_noisy.js"));
    assert_eq!(report.results[0].language, Some(Language::JavaScript));
    assert!(report.results[0].issue_count >= report.results[1].issue_count);
    assert!(report.results[0].security_findings >= 1);
    assert!(report.results[0].security_score < 100);
    assert_eq!(
        report.total_issues,
        report.results.iter().map(|r| r.issue_count).sum::<usize>()
    );
}

#[test]
fn test_min_issues_filters_listing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "clean.py", CLEAN);
    write(dir.path(), "noisy.js", NOISY);

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        min_issues: 1,
    };
    let report = sweep::run(&analyzer(), &config).unwrap();

    assert_eq!(report.files_scanned, 2);
    assert!(report.results.iter().all(|r| r.issue_count >= 1));
    assert!(report.results.iter().any(|r| r.path.ends_with("noisy.js")));
}

#[test]
fn test_write_report_round_trips() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/noisy.js", NOISY);

    let config = SweepConfig {
        directory: dir.path().join("src"),
        min_issues: 0,
    };
    let report = sweep::run(&analyzer(), &config).unwrap();

    let out = dir.path().join("reports/sweep.json");
    sweep::write_report(&report, &out).unwrap();

    let loaded: SweepReport = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(loaded.files_scanned, 1);
    assert_eq!(loaded.total_issues, report.total_issues);
    assert_eq!(loaded.results[0].path, report.results[0].path);
}
