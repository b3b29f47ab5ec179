// SPDX-License-Identifier: PMPL-1.0-or-later

//! Time and space complexity estimation

use codesift::analyze;
use codesift::types::{ComplexityClass, EstimateConfidence};

#[test]
fn test_straight_line_code_is_constant_with_high_confidence() {
    let result = analyze("const total = price + tax;\n", "javascript");
    assert_eq!(result.time_complexity.notation, ComplexityClass::Constant);
    assert_eq!(result.time_complexity.confidence, EstimateConfidence::High);
    assert_eq!(result.space_complexity.notation, ComplexityClass::Constant);
    assert!(result.time_complexity.factors.is_empty());
}

#[test]
fn test_single_loop_is_linear() {
    let code = "function sum(xs) {\n  let t = 0;\n  for (const x of xs) {\n    t += x;\n  }\n  return t;\n}\n";
    let result = analyze(code, "javascript");
    assert_eq!(result.time_complexity.notation, ComplexityClass::Linear);
    assert_eq!(result.time_complexity.confidence, EstimateConfidence::High);
}

#[test]
fn test_nested_loop_depths() {
    let cases = [
        ("for(i=0;i<n;i++){s+=a[i];}", ComplexityClass::Linear),
        (
            "for(i=0;i<n;i++){for(j=0;j<n;j++){total+=arr[i][j];}}",
            ComplexityClass::Quadratic,
        ),
        (
            "for(i=0;i<n;i++){for(j=0;j<n;j++){for(k=0;k<n;k++){s+=a[i]+b[j]+c[k];}}}",
            ComplexityClass::Cubic,
        ),
        (
            "for(i=0;i<n;i++){for(j=0;j<n;j++){for(k=0;k<n;k++){for(l=0;l<n;l++){s+=a[l];}}}}",
            ComplexityClass::Quartic,
        ),
    ];
    for (code, expected) in cases {
        let result = analyze(code, "c");
        assert_eq!(result.time_complexity.notation, expected, "for {}", code);
    }
}

#[test]
fn test_branching_recursion_is_exponential() {
    let code = "function fib(n) {\n  if (n < 2) return n;\n  return fib(n - 1) + fib(n - 2);\n}\n";
    let result = analyze(code, "javascript");
    assert_eq!(result.time_complexity.notation, ComplexityClass::Exponential);
    assert_eq!(result.time_complexity.confidence, EstimateConfidence::Medium);
    assert!(result
        .time_complexity
        .factors
        .iter()
        .any(|f| f.contains("`fib` calls itself 2 times")));
    assert!(result
        .performance
        .iter()
        .any(|a| a.title == "O(2^n) time complexity"));
}

#[test]
fn test_one_line_recursion_is_detected() {
    let cases = [
        "function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); }\n",
        "const fib = (n) => n < 2 ? n : fib(n - 1) + fib(n - 2);\n",
    ];
    for code in cases {
        let result = analyze(code, "javascript");
        assert_eq!(result.time_complexity.notation, ComplexityClass::Exponential, "{}", code);
        assert_eq!(result.time_complexity.confidence, EstimateConfidence::Medium);
        assert!(result
            .time_complexity
            .factors
            .iter()
            .any(|f| f.contains("`fib` calls itself 2 times")));
    }

    let countdown = analyze("def down(n): return 0 if n == 0 else down(n - 1)\n", "python");
    assert_eq!(countdown.time_complexity.notation, ComplexityClass::Linear);
}

#[test]
fn test_memoised_recursion_is_linear() {
    let code = "const memo = {};\nfunction fib(n) {\n  if (memo[n]) return memo[n];\n  if (n < 2) return n;\n  memo[n] = fib(n - 1) + fib(n - 2);\n  return memo[n];\n}\n";
    let result = analyze(code, "javascript");
    assert_eq!(result.time_complexity.notation, ComplexityClass::Linear);
}

#[test]
fn test_divide_and_conquer_is_linearithmic() {
    let code = "function mergeSort(arr) {\n  if (arr.length <= 1) return arr;\n  const mid = Math.floor(arr.length / 2);\n  const left = mergeSort(arr.slice(0, mid));\n  const right = mergeSort(arr.slice(mid));\n  return merge(left, right);\n}\n";
    let result = analyze(code, "javascript");
    assert_eq!(result.time_complexity.notation, ComplexityClass::Linearithmic);
}

#[test]
fn test_binary_search_loop_is_logarithmic() {
    let code = "function search(xs, target) {\n  let lo = 0, hi = xs.length - 1;\n  while (lo <= hi) {\n    const mid = (lo + hi) >> 1;\n    if (xs[mid] === target) return mid;\n    if (xs[mid] < target) lo = mid + 1; else hi = mid - 1;\n  }\n  return -1;\n}\n";
    let result = analyze(code, "javascript");
    assert_eq!(result.time_complexity.notation, ComplexityClass::Logarithmic);
}

#[test]
fn test_sort_call_is_linearithmic() {
    let code = "function order(xs) {\n  return xs.sort((a, b) => a - b);\n}\n";
    let result = analyze(code, "javascript");
    assert_eq!(result.time_complexity.notation, ComplexityClass::Linearithmic);
    assert_eq!(result.time_complexity.confidence, EstimateConfidence::High);
}

#[test]
fn test_quadratic_time_raises_performance_advisory() {
    let result = analyze("for(i=0;i<n;i++){for(j=0;j<n;j++){total+=arr[i][j];}}", "c");
    assert!(result
        .performance
        .iter()
        .any(|a| a.title == "O(n²) time complexity"));
}

#[test]
fn test_growth_inside_loop_is_linear_space() {
    let code = "function copy(xs) {\n  const out = [];\n  for (const x of xs) {\n    out.push(x);\n  }\n  return out;\n}\n";
    let result = analyze(code, "javascript");
    assert_eq!(result.space_complexity.notation, ComplexityClass::Linear);
}

#[test]
fn test_notation_parse_is_lenient() {
    assert_eq!(ComplexityClass::parse("O(n^2)"), Some(ComplexityClass::Quadratic));
    assert_eq!(ComplexityClass::parse("o(N log N)"), Some(ComplexityClass::Linearithmic));
    assert_eq!(ComplexityClass::parse("O(2^n)"), Some(ComplexityClass::Exponential));
    assert_eq!(ComplexityClass::parse("quadratic"), None);
}
