// SPDX-License-Identifier: PMPL-1.0-or-later

//! Security signature scanning, scoring and compliance grouping

use codesift::patterns::PatternTables;
use codesift::security::{grade, security_score, SecurityScanner};
use codesift::types::SecuritySeverity;
use codesift::Language;
use proptest::prelude::*;

fn scan(text: &str, language: Language) -> codesift::types::SecurityReport {
    let tables = PatternTables::builtin().unwrap();
    SecurityScanner::new(&tables).scan(text, language)
}

#[test]
fn test_eval_is_critical_and_counted_once_per_signature() {
    let report = scan("const out = eval(userInput);\neval(more);\n", Language::JavaScript);

    assert_eq!(report.findings.len(), 1);
    let finding = &report.findings[0];
    assert_eq!(finding.id, "SEC001");
    assert_eq!(finding.severity, SecuritySeverity::Critical);
    assert_eq!(finding.cwe_id, "CWE-95");
    assert_eq!(finding.line, Some(1));
    assert_eq!(finding.occurrences, 2);

    assert_eq!(report.score, 75);
    assert_eq!(report.grade, 'C');
    assert_eq!(
        report.compliance.get("A03:2021 Injection"),
        Some(&vec!["SEC001".to_string()])
    );
}

#[test]
fn test_clean_code_scores_full_marks() {
    let report = scan("function add(a, b) {\n  return a + b;\n}\n", Language::JavaScript);
    assert!(report.findings.is_empty());
    assert_eq!(report.score, 100);
    assert_eq!(report.grade, 'A');
    assert!(report.compliance.is_empty());
}

#[test]
fn test_language_scoped_signatures() {
    // eval is not a C function; strcpy is
    let report = scan("eval(x);\nstrcpy(dst, src);\n", Language::C);
    let ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["SEC016"]);
    assert_eq!(report.findings[0].line, Some(2));
}

#[test]
fn test_comments_are_scanned() {
    let report = scan("// TODO: drop this\nlet x = 1;\n", Language::JavaScript);
    assert!(report.findings.iter().any(|f| f.id == "SEC015"));
}

#[test]
fn test_hardcoded_credentials_and_sql_concatenation() {
    let code = "api_key = \"sk_live_0123456789\"\nquery = \"SELECT * FROM users WHERE id = \" + user_id\n";
    let report = scan(code, Language::Python);
    let ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();
    assert!(ids.contains(&"SEC004"));
    assert!(ids.contains(&"SEC005"));
    // 100 - 25 - 15
    assert_eq!(report.score, 60);
    assert_eq!(report.grade, 'D');
}

#[test]
fn test_security_runs_inside_analyze() {
    let result = codesift::analyze("import os\nos.system(cmd)\n", "python");
    assert!(result.security.findings.iter().any(|f| f.cwe_id == "CWE-78"));
    assert!(result.security.score < 100);
}

fn severity() -> impl Strategy<Value = SecuritySeverity> {
    prop_oneof![
        Just(SecuritySeverity::Info),
        Just(SecuritySeverity::Low),
        Just(SecuritySeverity::Medium),
        Just(SecuritySeverity::High),
        Just(SecuritySeverity::Critical),
    ]
}

proptest! {
    #[test]
    fn prop_score_is_monotonic(
        base in prop::collection::vec(severity(), 0..12),
        extra in severity()
    ) {
        let before = security_score(&base);
        let mut more = base.clone();
        more.push(extra);
        let after = security_score(&more);
        prop_assert!(after <= before);
        prop_assert!(after <= 100);
        prop_assert!(grade(after) >= grade(before));
    }
}
