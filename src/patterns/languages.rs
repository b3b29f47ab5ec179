// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-language weighted pattern definitions
//!
//! Keywords are matched as whole identifier tokens, import markers as plain
//! substrings, syntax and specific entries as regular expressions over the
//! raw text. Function patterns run per line over comment- and
//! string-blanked code.

use super::{BlockStyle, QuoteStyle, SingleQuote};
use crate::types::Language;

/// Uncompiled language definition
#[derive(Debug)]
pub struct LanguageSpec {
    pub language: Language,
    pub weight: f64,
    pub keywords: &'static [&'static str],
    pub imports: &'static [&'static str],
    pub syntax: &'static [&'static str],
    pub specific: &'static [&'static str],
    pub functions: &'static [&'static str],
    pub line_comments: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    pub quotes: QuoteStyle,
    pub block_style: BlockStyle,
    pub loop_keywords: &'static [&'static str],
    pub loop_calls: &'static [&'static str],
    pub try_keywords: &'static [&'static str],
}

const C_BLOCK: Option<(&str, &str)> = Some(("/*", "*/"));

const JS_QUOTES: QuoteStyle = QuoteStyle {
    single: SingleQuote::String,
    backtick_multiline: true,
    triple_quotes: false,
};

const CHAR_QUOTES: QuoteStyle = QuoteStyle {
    single: SingleQuote::CharLiteral,
    backtick_multiline: false,
    triple_quotes: false,
};

const SCRIPT_QUOTES: QuoteStyle = QuoteStyle {
    single: SingleQuote::String,
    backtick_multiline: false,
    triple_quotes: false,
};

const JS_FUNCTIONS: &[&str] = &[
    r"\bfunction\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*\((?P<params>[^)]*)\)",
    r"\b(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?function\b\s*\*?\s*\((?P<params>[^)]*)\)",
    r"\b(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::\s*[^=]+)?=\s*(?:async\s+)?\((?P<params>[^)]*)\)\s*(?::\s*[^=]+)?=>",
    r"\b(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?P<params>[A-Za-z_$][\w$]*)\s*=>",
    r"^\s*(?:(?:public|private|protected|static|async|readonly|override)\s+)*(?P<name>[A-Za-z_$][\w$]*)\s*\((?P<params>[^)]*)\)\s*(?::\s*[^{=;]+)?\{",
];

const C_FAMILY_FUNCTIONS: &[&str] = &[
    r"^\s*(?:(?:public|private|protected|internal|static|final|abstract|synchronized|virtual|override|inline|async|extern|unsafe|sealed|explicit|constexpr|native)\s+)*(?:[\w:<>\[\],?]+[\s*&]+)+(?P<name>[A-Za-z_~]\w*)\s*\((?P<params>[^)]*)\)\s*(?:const\s*)?(?:noexcept\s*)?(?:throws\s+[\w.,\s]+)?(?:\{.*)?$",
];

pub const LANGUAGE_SPECS: &[LanguageSpec] = &[
    LanguageSpec {
        language: Language::JavaScript,
        weight: 1.0,
        keywords: &[
            "function", "const", "let", "var", "undefined", "console", "require", "async",
            "await", "typeof", "prototype", "document", "window", "null", "this",
        ],
        imports: &["require(", "import ", "export ", "module.exports"],
        syntax: &[
            r"=>",
            r"===|!==",
            r"\bconsole\.(?:log|error|warn)\(",
            r"\bfunction\s*\w*\s*\(",
            r"\b(?:let|const)\s+\w+\s*=",
        ],
        specific: &[
            r"\bmodule\.exports\b",
            r"\bdocument\.\w+",
            r#"\brequire\(\s*['"]"#,
            r"\bJSON\.(?:parse|stringify)\(",
            r"\$\{[^}]*\}",
            r"\baddEventListener\(",
        ],
        functions: JS_FUNCTIONS,
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: JS_QUOTES,
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "do"],
        loop_calls: &[
            ".forEach(", ".map(", ".filter(", ".reduce(", ".some(", ".every(", ".find(",
            ".findIndex(",
        ],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::TypeScript,
        weight: 1.1,
        keywords: &[
            "interface", "implements", "readonly", "namespace", "enum", "declare", "keyof",
            "abstract", "unknown", "never", "type",
        ],
        imports: &["import type ", "export type ", "export interface "],
        syntax: &[
            r":\s*(?:string|number|boolean|any|void|unknown|never)\b",
            r"\binterface\s+\w+",
            r"\btype\s+\w+\s*=",
            r"\bReadonly<|\bPartial<|\bRecord<",
        ],
        specific: &[
            r":\s*(?:string|number|boolean)\s*[,)=;]",
            r"\bas\s+(?:string|number|any|unknown|const)\b",
            r"\b(?:private|public|readonly)\s+\w+\s*:",
            r"\bimport\s+type\b",
            r"\)\s*:\s*(?:Promise<|void\b|string\b|number\b|boolean\b)",
        ],
        functions: JS_FUNCTIONS,
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: JS_QUOTES,
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "do"],
        loop_calls: &[
            ".forEach(", ".map(", ".filter(", ".reduce(", ".some(", ".every(", ".find(",
            ".findIndex(",
        ],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::Python,
        weight: 1.0,
        keywords: &[
            "def", "elif", "self", "None", "True", "False", "lambda", "pass", "yield", "import",
            "print", "__init__", "__name__", "nonlocal", "except", "raise", "is", "not",
        ],
        imports: &["import ", "from "],
        syntax: &[
            r"(?m)^\s*def\s+\w+\s*\(.*\)\s*(?:->\s*[^:]+)?:\s*$",
            r"(?m)^\s*(?:if|elif|while|for)\s.*:\s*$",
            r"\bself\.\w+",
            r"(?m)^\s*class\s+\w+(?:\([^)]*\))?:\s*$",
        ],
        specific: &[
            r#"if\s+__name__\s*==\s*['"]__main__['"]"#,
            r"(?m)^\s*from\s+[\w.]+\s+import\s",
            r#"\bprint\(\s*f?["']"#,
            r"\bdef\s+__\w+__\s*\(",
            r"(?m)^\s*except(?:\s+\w+)?(?:\s+as\s+\w+)?\s*:",
        ],
        functions: &[r"^\s*(?:async\s+)?def\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)"],
        line_comments: &["#"],
        block_comment: None,
        quotes: QuoteStyle {
            single: SingleQuote::String,
            backtick_multiline: false,
            triple_quotes: true,
        },
        block_style: BlockStyle::Indentation,
        loop_keywords: &["for", "while"],
        loop_calls: &[],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::Java,
        weight: 1.0,
        keywords: &[
            "public", "private", "protected", "class", "static", "void", "final", "extends",
            "implements", "throws", "interface", "package", "String", "System", "boolean",
        ],
        imports: &["import java.", "import javax.", "package "],
        syntax: &[
            r"\bpublic\s+(?:static\s+)?(?:void|class|int|String|boolean)\b",
            r"\bSystem\.out\.print",
            r"\bnew\s+[A-Z]\w*\s*[(<]",
            r"@Override\b",
        ],
        specific: &[
            r"public\s+static\s+void\s+main\s*\(\s*String",
            r"System\.out\.println\(",
            r"\bimport\s+java\.",
            r"\bthrows\s+\w+Exception\b",
            r"\bArrayList<|\bHashMap<",
        ],
        functions: C_FAMILY_FUNCTIONS,
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: CHAR_QUOTES,
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "do"],
        loop_calls: &[".forEach(", ".stream("],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::C,
        weight: 0.9,
        keywords: &[
            "int", "char", "void", "struct", "typedef", "sizeof", "unsigned", "static", "NULL",
            "malloc", "free", "printf", "include", "define",
        ],
        imports: &["#include <", "#include \""],
        syntax: &[
            r#"#include\s*[<"]"#,
            r"\bprintf\s*\(",
            r"\b(?:malloc|calloc|realloc|free)\s*\(",
            r"\w->\w+",
        ],
        specific: &[
            r"#include\s*<(?:stdio|stdlib|string|unistd|stdint)\.h>",
            r"\bint\s+main\s*\(\s*(?:void|int\s+argc)",
            r"\bscanf\s*\(",
            r"#define\s+\w+",
        ],
        functions: C_FAMILY_FUNCTIONS,
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: CHAR_QUOTES,
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "do"],
        loop_calls: &[],
        try_keywords: &[],
    },
    LanguageSpec {
        language: Language::Cpp,
        weight: 1.0,
        keywords: &[
            "class", "namespace", "template", "typename", "virtual", "std", "cout", "cin",
            "endl", "nullptr", "auto", "delete", "public", "private",
        ],
        imports: &["#include <", "using namespace"],
        syntax: &[
            r"\bstd::\w+",
            r"\bcout\s*<<",
            r"\btemplate\s*<",
            r"#include\s*<\w+>",
        ],
        specific: &[
            r"using\s+namespace\s+std",
            r"std::(?:vector|string|map|cout|endl|unique_ptr|shared_ptr)",
            r"\bnullptr\b",
            r"\bvirtual\s+\w+",
        ],
        functions: C_FAMILY_FUNCTIONS,
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: CHAR_QUOTES,
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "do"],
        loop_calls: &[],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::CSharp,
        weight: 1.0,
        keywords: &[
            "namespace", "using", "public", "class", "static", "void", "var", "string", "async",
            "await", "Console", "get", "set", "override", "readonly",
        ],
        imports: &["using System", "namespace "],
        syntax: &[
            r"\bConsole\.Write(?:Line)?\(",
            r"\{\s*get;\s*set;\s*\}",
            r"\busing\s+System",
            r"\bpublic\s+(?:async\s+)?Task\b",
        ],
        specific: &[
            r"using\s+System(?:\.\w+)*;",
            r"\bConsole\.WriteLine\(",
            r"\{\s*get;",
            r"\bstatic\s+void\s+Main\s*\(",
            r"\bforeach\s*\(\s*var\s+\w+\s+in\b",
        ],
        functions: C_FAMILY_FUNCTIONS,
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: CHAR_QUOTES,
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "foreach", "while", "do"],
        loop_calls: &[".ForEach(", ".Select("],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::Go,
        weight: 1.0,
        keywords: &[
            "func", "package", "import", "defer", "go", "chan", "select", "struct", "range",
            "nil", "fmt", "err", "interface",
        ],
        imports: &["import (", "import \"", "package "],
        syntax: &[
            r":=",
            r"\bfunc\s+\w+\s*\(",
            r"\bfmt\.\w+\(",
            r"\bif\s+err\s*!=\s*nil",
        ],
        specific: &[
            r"(?m)^package\s+\w+",
            r"\bfunc\s+\([^)]*\)\s*\w+\s*\(",
            r"if\s+err\s*!=\s*nil\s*\{",
            r"\bfmt\.Print(?:ln|f)?\(",
            r"\bgo\s+func\b",
        ],
        functions: &[
            r"^\s*func\s+(?:\([^)]*\)\s*)?(?P<name>\w+)\s*(?:\[[^\]]*\])?\s*\((?P<params>[^)]*)\)",
        ],
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: QuoteStyle {
            single: SingleQuote::CharLiteral,
            backtick_multiline: true,
            triple_quotes: false,
        },
        block_style: BlockStyle::Braces,
        loop_keywords: &["for"],
        loop_calls: &[],
        try_keywords: &[],
    },
    LanguageSpec {
        language: Language::Rust,
        weight: 1.0,
        keywords: &[
            "fn", "let", "mut", "impl", "struct", "enum", "trait", "pub", "use", "mod", "match",
            "crate", "Self", "unsafe", "Some", "None", "Ok", "Err", "Vec",
        ],
        imports: &["use std::", "use crate::", "extern crate"],
        syntax: &[
            r"\bfn\s+\w+",
            r"\blet\s+mut\b",
            r"\w::\w+",
            r"\bimpl\b",
            r"->\s*\w+",
        ],
        specific: &[
            r"\bprintln!\(",
            r"\bfn\s+main\s*\(\s*\)",
            r"#\[derive\(",
            r"\buse\s+std::",
            r"\.unwrap\(\)",
            r"&mut\s",
            r"\bmatch\s+\w+\s*\{",
        ],
        functions: &[r"\bfn\s+(?P<name>\w+)\s*(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)"],
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: CHAR_QUOTES,
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "loop"],
        loop_calls: &[".for_each(", ".map(", ".filter(", ".fold("],
        try_keywords: &[],
    },
    LanguageSpec {
        language: Language::Ruby,
        weight: 1.0,
        keywords: &[
            "def", "end", "puts", "require", "module", "elsif", "unless", "attr_accessor", "nil",
            "do", "yield", "each", "lambda", "rescue",
        ],
        imports: &["require '", "require_relative", "require \""],
        syntax: &[
            r"(?m)^\s*def\s+\w+",
            r"(?m)^\s*end\s*$",
            r"\bputs\b",
            r"\.each\s+do\s*\|",
            r"@\w+",
        ],
        specific: &[
            r"\battr_(?:accessor|reader|writer)\b",
            r"\.each\s*(?:do|\{)\s*\|\w+\|",
            r"\brequire_relative\b",
            r"\belsif\b",
            r#"\bputs\s+["']"#,
        ],
        functions: &[r"^\s*def\s+(?:self\.)?(?P<name>[\w?!]+)\s*(?:\((?P<params>[^)]*)\))?"],
        line_comments: &["#"],
        block_comment: Some(("=begin", "=end")),
        quotes: SCRIPT_QUOTES,
        block_style: BlockStyle::Indentation,
        loop_keywords: &["while", "until", "for", "loop"],
        loop_calls: &[".each", ".times", ".map", ".select", ".each_with_index"],
        try_keywords: &["begin"],
    },
    LanguageSpec {
        language: Language::Php,
        weight: 1.0,
        keywords: &[
            "function", "echo", "array", "foreach", "public", "private", "namespace", "use",
            "null", "isset", "empty", "this",
        ],
        imports: &["require_once", "include_once", "namespace "],
        syntax: &[r"\$\w+", r"<\?php", r"->\w+", r"\becho\b"],
        specific: &[
            r"<\?php",
            r"\$this->",
            r"\bfunction\s+\w+\s*\(\s*\$",
            r"\bforeach\s*\(\s*\$\w+\s+as\b",
            r"\bisset\(\s*\$",
        ],
        functions: &[r"\bfunction\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)"],
        line_comments: &["//", "#"],
        block_comment: C_BLOCK,
        quotes: SCRIPT_QUOTES,
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "foreach", "while", "do"],
        loop_calls: &["array_map(", "array_filter(", "array_walk("],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::Swift,
        weight: 1.0,
        keywords: &[
            "func", "let", "var", "guard", "struct", "protocol", "extension", "import", "nil",
            "init", "inout", "weak", "some",
        ],
        imports: &["import Foundation", "import UIKit", "import SwiftUI"],
        syntax: &[
            r"\bfunc\s+\w+",
            r"\bguard\s+let\b",
            r"\bif\s+let\b",
            r"\bvar\s+\w+\s*:\s*\w+",
        ],
        specific: &[
            r"\bimport\s+(?:Foundation|UIKit|SwiftUI)\b",
            r"\bguard\s+.*\belse\s*\{",
            r#"\bprint\(\s*""#,
            r"\bfunc\s+\w+\s*\([^)]*\)\s*->\s*\w+",
        ],
        functions: &[r"\bfunc\s+(?P<name>\w+)\s*(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)"],
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: QuoteStyle {
            single: SingleQuote::Plain,
            backtick_multiline: false,
            triple_quotes: true,
        },
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "repeat"],
        loop_calls: &[".forEach", ".map", ".filter"],
        try_keywords: &["do"],
    },
    LanguageSpec {
        language: Language::Kotlin,
        weight: 1.0,
        keywords: &[
            "fun", "val", "var", "when", "data", "object", "companion", "override", "println",
            "import", "package", "null", "lateinit", "suspend",
        ],
        imports: &["import kotlin", "import android", "package "],
        syntax: &[r"\bfun\s+\w+", r"\bval\s+\w+", r"\bwhen\s*[({]", r"\?:"],
        specific: &[
            r"\bfun\s+main\s*\(",
            r"\bdata\s+class\b",
            r"\bcompanion\s+object\b",
            r"\bprintln\(",
            r"\blateinit\s+var\b",
        ],
        functions: &[
            r"\bfun\s+(?:<[^>]*>\s*)?(?:[\w.]+\.)?(?P<name>\w+)\s*\((?P<params>[^)]*)\)",
        ],
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: QuoteStyle {
            single: SingleQuote::CharLiteral,
            backtick_multiline: false,
            triple_quotes: true,
        },
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "do"],
        loop_calls: &[".forEach", ".map", ".filter"],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::Scala,
        weight: 1.0,
        keywords: &[
            "def", "val", "var", "object", "trait", "case", "match", "implicit", "extends",
            "with", "sealed", "println", "import", "package",
        ],
        imports: &["import scala.", "package "],
        syntax: &[
            r"\bdef\s+\w+",
            r"\bval\s+\w+\s*=",
            r"\bcase\s+class\b",
            r"=>",
        ],
        specific: &[
            r"\bobject\s+\w+\s+extends\s+App\b",
            r"\bcase\s+class\b",
            r"\bimplicit\s+",
            r"\bdef\s+main\s*\(\s*args\s*:\s*Array\[String\]\)",
            r"\bsealed\s+trait\b",
        ],
        functions: &[r"\bdef\s+(?P<name>\w+)\s*(?:\[[^\]]*\])?\s*\((?P<params>[^)]*)\)"],
        line_comments: &["//"],
        block_comment: C_BLOCK,
        quotes: QuoteStyle {
            single: SingleQuote::CharLiteral,
            backtick_multiline: false,
            triple_quotes: true,
        },
        block_style: BlockStyle::Braces,
        loop_keywords: &["for", "while", "do"],
        loop_calls: &[".foreach(", ".map(", ".filter("],
        try_keywords: &["try"],
    },
    LanguageSpec {
        language: Language::Lua,
        weight: 1.0,
        keywords: &[
            "local", "function", "end", "then", "elseif", "nil", "require", "pairs", "ipairs",
            "repeat", "until",
        ],
        imports: &["require(", "require \"", "require '"],
        syntax: &[r"\blocal\s+\w+", r"\bthen\b", r"\bend\b", r"~="],
        specific: &[
            r"\blocal\s+function\b",
            r"\bi?pairs\(",
            r"\belseif\b",
            r"--\[\[",
        ],
        functions: &[
            r"\bfunction\s+(?P<name>[\w.:]+)\s*\((?P<params>[^)]*)\)",
            r"\blocal\s+(?P<name>\w+)\s*=\s*function\s*\((?P<params>[^)]*)\)",
        ],
        line_comments: &["--"],
        block_comment: Some(("--[[", "]]")),
        quotes: SCRIPT_QUOTES,
        block_style: BlockStyle::Indentation,
        loop_keywords: &["for", "while", "repeat"],
        loop_calls: &[],
        try_keywords: &["pcall"],
    },
    LanguageSpec {
        language: Language::Shell,
        weight: 1.0,
        keywords: &[
            "echo", "fi", "then", "done", "esac", "elif", "export", "local", "do", "read",
        ],
        imports: &["source ", ". ./"],
        syntax: &[
            r"(?m)^#!\s*/(?:usr/)?bin/(?:env\s+)?(?:ba|z)?sh",
            r"\$\{?\w+\}?",
            r"\[\[\s",
            r"\bfi\b",
        ],
        specific: &[
            r"(?m)^#!/bin/(?:ba)?sh",
            r#"\becho\s+"?\$"#,
            r"(?m)\bdone\s*$",
            r"\besac\b",
        ],
        functions: &[
            r"^\s*(?:function\s+)?(?P<name>[A-Za-z_][\w-]*)\s*\(\)",
            r"^\s*function\s+(?P<name>[A-Za-z_][\w-]*)",
        ],
        line_comments: &["#"],
        block_comment: None,
        quotes: SCRIPT_QUOTES,
        block_style: BlockStyle::Indentation,
        loop_keywords: &["for", "while", "until"],
        loop_calls: &[],
        try_keywords: &[],
    },
];
