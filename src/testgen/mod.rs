// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test-skeleton synthesis
//!
//! Picks the first detected function, infers parameter types from
//! annotations or, failing that, from parameter names, and emits one
//! skeleton per test category. Expected outputs are descriptions; nothing
//! is executed.

use crate::metrics::FunctionSpan;
use crate::types::{Language, TestCaseSkeleton, TestCategory, TestPriority};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Number,
    Text,
    Boolean,
    Collection,
    Object,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedParam {
    pub name: String,
    pub ty: ParamType,
}

/// Items in a large-input performance skeleton.
const LARGE_INPUT: usize = 100_000;

const NUMERIC_TYPES: &[&str] = &[
    "int", "float", "double", "number", "long", "short", "decimal", "usize", "isize", "i8",
    "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64", "byte", "uint", "integer",
];
const NUMERIC_NAMES: &[&str] = &[
    "count", "index", "idx", "num", "size", "len", "length", "total", "amount", "age", "limit",
    "offset", "max", "min", "width", "height", "depth", "qty", "price",
];
const SINGLE_LETTER_NUMERIC: &[&str] = &["n", "i", "j", "k", "x", "y", "z"];
const TEXT_NAMES: &[&str] = &[
    "name", "text", "str", "message", "msg", "title", "label", "path", "url", "email", "word",
    "query",
];
const COLLECTION_NAMES: &[&str] = &["list", "items", "array", "arr", "values", "nums", "elements", "vec"];
const OBJECT_NAMES: &[&str] = &["options", "opts", "config", "settings", "obj", "map", "dict", "params"];
const BOOLEAN_PREFIXES: &[&str] = &["is", "has", "should", "can", "enable", "allow"];

/// Split a raw parameter into its name and declared type, if any.
fn name_and_annotation(raw: &str, language: Language) -> (String, Option<String>) {
    let without_default = raw.split('=').next().unwrap_or(raw).trim();
    let cleaned = without_default
        .trim_start_matches("...")
        .trim_start_matches(['*', '&', '$'])
        .trim_start_matches("mut ")
        .trim();

    if let Some((name, ty)) = cleaned.split_once(':') {
        let name = name.split_whitespace().last().unwrap_or(name);
        return (clean_name(name), Some(ty.trim().to_string()));
    }

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (String::new(), None),
        [only] => (clean_name(only), None),
        [first, rest @ ..] if language == Language::Go => (clean_name(first), Some(rest.join(" "))),
        [types @ .., last] => (clean_name(last), Some(types.join(" "))),
    }
}

fn clean_name(name: &str) -> String {
    name.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_')).to_string()
}

fn type_from_annotation(annotation: &str) -> ParamType {
    let lower = annotation.to_lowercase();
    if ["map", "dict", "object", "record"].iter().any(|k| lower.contains(k)) {
        return ParamType::Object;
    }
    if lower.contains('[') || ["list", "vec", "array", "slice", "set<", "hashset", "frozenset", "iterable", "sequence"].iter().any(|k| lower.contains(k)) {
        return ParamType::Collection;
    }
    if lower.contains("bool") {
        return ParamType::Boolean;
    }
    if lower.contains("str") || lower.contains("char") {
        return ParamType::Text;
    }
    let words: Vec<&str> = lower.split(|c: char| !c.is_alphanumeric()).collect();
    if words.iter().any(|w| NUMERIC_TYPES.contains(w)) {
        return ParamType::Number;
    }
    ParamType::Unknown
}

fn type_from_name(name: &str) -> ParamType {
    let boolean_prefix = BOOLEAN_PREFIXES.iter().any(|p| {
        name.strip_prefix(p)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase() || c == '_')
    });
    if boolean_prefix {
        return ParamType::Boolean;
    }

    let lower = name.to_lowercase();
    if SINGLE_LETTER_NUMERIC.contains(&lower.as_str()) || NUMERIC_NAMES.iter().any(|k| lower.contains(k)) {
        return ParamType::Number;
    }
    if TEXT_NAMES.iter().any(|k| lower.contains(k)) {
        return ParamType::Text;
    }
    if COLLECTION_NAMES.iter().any(|k| lower.contains(k)) {
        return ParamType::Collection;
    }
    // `options`, `settings` and `params` are plural but name one object.
    if OBJECT_NAMES.iter().any(|k| lower.contains(k)) {
        return ParamType::Object;
    }
    if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
        return ParamType::Collection;
    }
    ParamType::Unknown
}

/// Annotation wins over the name when it is conclusive.
pub fn infer_param(raw: &str, language: Language) -> TypedParam {
    let (name, annotation) = name_and_annotation(raw, language);
    let from_annotation = annotation.as_deref().map(type_from_annotation);
    let ty = match from_annotation {
        Some(ty) if ty != ParamType::Unknown => ty,
        _ => type_from_name(&name),
    };
    TypedParam { name, ty }
}

struct Literals {
    null: &'static str,
    truthy: &'static str,
    falsy: &'static str,
}

fn literals(language: Language) -> Literals {
    match language {
        Language::Python => Literals { null: "None", truthy: "True", falsy: "False" },
        Language::Ruby | Language::Lua => Literals { null: "nil", truthy: "true", falsy: "false" },
        Language::Go | Language::Swift => Literals { null: "nil", truthy: "true", falsy: "false" },
        Language::Rust => Literals { null: "None", truthy: "true", falsy: "false" },
        Language::C => Literals { null: "NULL", truthy: "1", falsy: "0" },
        Language::Cpp => Literals { null: "nullptr", truthy: "true", falsy: "false" },
        Language::Shell => Literals { null: "\"\"", truthy: "true", falsy: "false" },
        _ => Literals { null: "null", truthy: "true", falsy: "false" },
    }
}

fn collection(language: Language, items: &str) -> String {
    match language {
        Language::Rust => format!("vec![{}]", items),
        Language::Go => format!("[]int{{{}}}", items),
        Language::Java => format!("new int[]{{{}}}", items),
        Language::CSharp => format!("new[] {{{}}}", items),
        Language::C | Language::Cpp | Language::Lua => format!("{{{}}}", items),
        Language::Kotlin => format!("listOf({})", items),
        Language::Scala => format!("List({})", items),
        Language::Shell => format!("({})", items.replace(',', "")),
        _ => format!("[{}]", items),
    }
}

fn large_collection(language: Language) -> String {
    match language {
        Language::Python => format!("list(range({}))", LARGE_INPUT),
        Language::JavaScript | Language::TypeScript => {
            format!("Array.from({{ length: {} }}, (_, i) => i)", LARGE_INPUT)
        }
        Language::Rust => format!("(0..{}).collect::<Vec<_>>()", LARGE_INPUT),
        Language::Ruby => format!("(0...{}).to_a", LARGE_INPUT),
        Language::Kotlin => format!("List({}) {{ it }}", LARGE_INPUT),
        _ => format!("<collection of {} elements>", LARGE_INPUT),
    }
}

#[derive(Clone, Copy)]
enum Flavor {
    Typical,
    Edge,
    Negative,
    Mismatched,
    Large,
}

fn value(ty: ParamType, flavor: Flavor, language: Language) -> String {
    let lit = literals(language);
    match (flavor, ty) {
        (Flavor::Typical, ParamType::Number) => "5".to_string(),
        (Flavor::Typical, ParamType::Text) => "\"example\"".to_string(),
        (Flavor::Typical, ParamType::Boolean) => lit.truthy.to_string(),
        (Flavor::Typical, ParamType::Collection) => collection(language, "1, 2, 3"),
        (Flavor::Typical, ParamType::Object) => "{\"key\": \"value\"}".to_string(),
        (Flavor::Typical, ParamType::Unknown) => "\"value\"".to_string(),

        (Flavor::Edge, ParamType::Number) => "0".to_string(),
        (Flavor::Edge, ParamType::Text) => "\"\"".to_string(),
        (Flavor::Edge, ParamType::Boolean) => lit.falsy.to_string(),
        (Flavor::Edge, ParamType::Collection) => collection(language, ""),
        (Flavor::Edge, ParamType::Object) => "{}".to_string(),
        (Flavor::Edge, ParamType::Unknown) => lit.null.to_string(),

        (Flavor::Negative, ParamType::Number) => "-1".to_string(),
        (Flavor::Negative, ty) => value(ty, Flavor::Typical, language),

        (Flavor::Mismatched, ParamType::Number) => "\"not a number\"".to_string(),
        (Flavor::Mismatched, ParamType::Text) => "12345".to_string(),
        (Flavor::Mismatched, ParamType::Boolean) => "\"yes\"".to_string(),
        (Flavor::Mismatched, ParamType::Object) => "\"not an object\"".to_string(),
        (Flavor::Mismatched, ParamType::Collection | ParamType::Unknown) => lit.null.to_string(),

        (Flavor::Large, ParamType::Number) => LARGE_INPUT.to_string(),
        (Flavor::Large, ParamType::Collection) => large_collection(language),
        (Flavor::Large, ty) => value(ty, Flavor::Typical, language),
    }
}

fn call(name: &str, params: &[TypedParam], flavor: Flavor, language: Language) -> String {
    let args: Vec<String> = params.iter().map(|p| value(p.ty, flavor, language)).collect();
    format!("{}({})", name, args.join(", "))
}

fn snake_case(name: &str) -> String {
    let mut out = String::new();
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub struct TestSynthesizer {
    language: Language,
}

impl TestSynthesizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Skeletons for the first function in `functions`. `has_loops` comes
    /// from the loop scan and, together with collection parameters,
    /// decides whether a performance skeleton is emitted.
    pub fn synthesize(&self, functions: &[FunctionSpan], has_loops: bool) -> Vec<TestCaseSkeleton> {
        let Some(target) = functions.first() else {
            return vec![TestCaseSkeleton {
                name: "test_code_executes_without_error".to_string(),
                description: "Top-level code runs to completion".to_string(),
                input: "(no function detected; run the unit as a whole)".to_string(),
                expected_output: "Completes without raising an error".to_string(),
                category: TestCategory::HappyPath,
                priority: TestPriority::Medium,
            }];
        };

        let language = self.language;
        let params: Vec<TypedParam> = target
            .params
            .iter()
            .map(|p| infer_param(p, language))
            .filter(|p| !p.name.is_empty())
            .collect();
        let fname = &target.name;
        let base = snake_case(fname);
        let mut tests = vec![TestCaseSkeleton {
            name: format!("test_{}_happy_path", base),
            description: format!("{} returns the expected result for typical input", fname),
            input: call(fname, &params, Flavor::Typical, language),
            expected_output: "Expected result for typical input".to_string(),
            category: TestCategory::HappyPath,
            priority: TestPriority::High,
        }];

        if params.is_empty() {
            if has_loops {
                tests.push(self.performance(fname, &base, &params));
            }
            return tests;
        }

        tests.push(TestCaseSkeleton {
            name: format!("test_{}_boundary_values", base),
            description: format!("{} handles zero and empty inputs", fname),
            input: call(fname, &params, Flavor::Edge, language),
            expected_output: "Handles empty or zero input gracefully".to_string(),
            category: TestCategory::Boundary,
            priority: TestPriority::High,
        });
        if params.iter().any(|p| p.ty == ParamType::Number) {
            tests.push(TestCaseSkeleton {
                name: format!("test_{}_negative_values", base),
                description: format!("{} handles negative numbers", fname),
                input: call(fname, &params, Flavor::Negative, language),
                expected_output: "Rejects or correctly handles negative input".to_string(),
                category: TestCategory::Boundary,
                priority: TestPriority::Medium,
            });
        }

        let failure = if language.has_exceptions() {
            "Raises an error for invalid input"
        } else {
            "Returns an error value for invalid input"
        };
        tests.push(TestCaseSkeleton {
            name: format!("test_{}_invalid_input", base),
            description: format!("{} rejects input of the wrong type", fname),
            input: call(fname, &params, Flavor::Mismatched, language),
            expected_output: failure.to_string(),
            category: TestCategory::Invalid,
            priority: TestPriority::Medium,
        });

        if has_loops || params.iter().any(|p| p.ty == ParamType::Collection) {
            tests.push(self.performance(fname, &base, &params));
        }

        tests
    }

    fn performance(&self, fname: &str, base: &str, params: &[TypedParam]) -> TestCaseSkeleton {
        TestCaseSkeleton {
            name: format!("test_{}_large_input", base),
            description: format!("{} stays within its expected time bound on large input", fname),
            input: call(fname, params, Flavor::Large, self.language),
            expected_output: format!("Completes in reasonable time for {} elements", LARGE_INPUT),
            category: TestCategory::Performance,
            priority: TestPriority::Low,
        }
    }
}
