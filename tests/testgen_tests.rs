// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test-skeleton synthesis

use codesift::metrics::FunctionSpan;
use codesift::testgen::{infer_param, ParamType, TestSynthesizer};
use codesift::types::{TestCategory, TestPriority};
use codesift::{analyze, Language};

fn span(name: &str, params: &[&str]) -> FunctionSpan {
    FunctionSpan {
        name: name.to_string(),
        start_line: 1,
        end_line: 3,
        params: params.iter().map(|p| p.to_string()).collect(),
        signature: format!("function {}({})", name, params.join(", ")),
        body_offset: 0,
    }
}

#[test]
fn test_full_skeleton_set_for_collection_and_number() {
    let tests = TestSynthesizer::new(Language::JavaScript)
        .synthesize(&[span("findMax", &["items", "limit: number"])], false);

    let names: Vec<&str> = tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "test_find_max_happy_path",
            "test_find_max_boundary_values",
            "test_find_max_negative_values",
            "test_find_max_invalid_input",
            "test_find_max_large_input",
        ]
    );

    assert_eq!(tests[0].input, "findMax([1, 2, 3], 5)");
    assert_eq!(tests[0].category, TestCategory::HappyPath);
    assert_eq!(tests[0].priority, TestPriority::High);
    assert_eq!(tests[1].input, "findMax([], 0)");
    assert_eq!(tests[2].input, "findMax([1, 2, 3], -1)");
    assert_eq!(tests[3].input, "findMax(null, \"not a number\")");
    assert_eq!(tests[3].expected_output, "Raises an error for invalid input");
    assert_eq!(tests[4].category, TestCategory::Performance);
    assert_eq!(tests[4].priority, TestPriority::Low);
    assert!(tests[4].input.contains("100000"));
}

#[test]
fn test_no_function_gives_single_smoke_test() {
    let tests = TestSynthesizer::new(Language::Python).synthesize(&[], true);
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].name, "test_code_executes_without_error");
    assert_eq!(tests[0].category, TestCategory::HappyPath);
}

#[test]
fn test_parameterless_function_without_loops() {
    let tests = TestSynthesizer::new(Language::JavaScript).synthesize(&[span("run", &[])], false);
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].input, "run()");
}

#[test]
fn test_parameterless_function_with_loops_gets_performance_case() {
    let tests = TestSynthesizer::new(Language::JavaScript).synthesize(&[span("run", &[])], true);
    assert_eq!(tests.len(), 2);
    assert_eq!(tests[1].category, TestCategory::Performance);
}

#[test]
fn test_error_value_languages() {
    let tests = TestSynthesizer::new(Language::C).synthesize(&[span("toggle", &["int flag"])], false);
    let invalid = tests
        .iter()
        .find(|t| t.category == TestCategory::Invalid)
        .unwrap();
    assert_eq!(invalid.expected_output, "Returns an error value for invalid input");
}

#[test]
fn test_python_literals_through_analyze() {
    let result = analyze("def greet(name, is_formal):\n    return name\n", "python");
    let names: Vec<&str> = result.test_cases.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "test_greet_happy_path",
            "test_greet_boundary_values",
            "test_greet_invalid_input",
        ]
    );
    assert_eq!(result.test_cases[0].input, "greet(\"example\", True)");
    assert_eq!(result.test_cases[1].input, "greet(\"\", False)");
}

#[test]
fn test_param_inference() {
    assert_eq!(infer_param("hasAccess", Language::JavaScript).ty, ParamType::Boolean);
    assert_eq!(infer_param("index", Language::JavaScript).ty, ParamType::Number);
    assert_eq!(infer_param("title", Language::JavaScript).ty, ParamType::Text);
    assert_eq!(infer_param("options", Language::JavaScript).ty, ParamType::Object);
    assert_eq!(infer_param("scores: Dict[str, int]", Language::Python).ty, ParamType::Object);
    assert_eq!(infer_param("tags: List[str]", Language::Python).ty, ParamType::Collection);
    assert_eq!(infer_param("String name", Language::Java).ty, ParamType::Text);
    assert_eq!(infer_param("n uint", Language::Go).ty, ParamType::Number);
    assert_eq!(infer_param("verbose = false", Language::Python).ty, ParamType::Unknown);
}
