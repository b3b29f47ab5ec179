// SPDX-License-Identifier: PMPL-1.0-or-later

//! Risky-operation table for the unhandled-exception detector
//!
//! Each entry names the languages it applies to (empty means all) and the
//! guard that can prove it safe. A `var` capture group, when present, names
//! the value whose provenance the guard is checked against.

use crate::types::{IssueKind, Language, ViolationSeverity};
use anyhow::{Context, Result};
use regex::Regex;

/// Context that suppresses a risky-operation match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Only an enclosing try/protected block suppresses the match.
    Protected,
    /// A preceding null or type guard on the captured value.
    Null,
    /// The captured index is loop-bounded or bounds-checked.
    Bounds,
    /// The captured divisor is checked against zero.
    Zero,
}

#[derive(Debug, Clone)]
pub struct RiskyOperation {
    pub id: &'static str,
    pub message: &'static str,
    pub pattern: Regex,
    pub languages: Vec<Language>,
    pub guard: GuardKind,
    pub kind: IssueKind,
    pub severity: ViolationSeverity,
    /// The match only counts when it directly follows an expression
    /// (identifier, `]` or `)`), which separates indexing from array
    /// literals.
    pub postfix: bool,
}

struct RiskySpec {
    id: &'static str,
    message: &'static str,
    pattern: &'static str,
    languages: &'static [Language],
    guard: GuardKind,
    kind: IssueKind,
    severity: ViolationSeverity,
    postfix: bool,
}

use Language::*;

const EXCEPTION_LANGUAGES: &[Language] = &[
    JavaScript, TypeScript, Python, Java, Cpp, CSharp, Ruby, Php, Swift, Kotlin, Scala,
];

const RISKY_SPECS: &[RiskySpec] = &[
    RiskySpec {
        id: "json-parse",
        message: "Unhandled exception risk: JSON.parse throws on malformed input",
        pattern: r"\bJSON\.parse\(\s*(?P<var>[A-Za-z_$][\w$.]*)?",
        languages: &[JavaScript, TypeScript],
        guard: GuardKind::Null,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Major,
        postfix: false,
    },
    RiskySpec {
        id: "json-loads",
        message: "Unhandled exception risk: json.loads raises on malformed input",
        pattern: r"\bjson\.loads?\(\s*(?P<var>[A-Za-z_][\w.]*)?",
        languages: &[Python],
        guard: GuardKind::Null,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Major,
        postfix: false,
    },
    RiskySpec {
        id: "numeric-parse",
        message: "Unhandled exception risk: numeric parsing throws on invalid input",
        pattern: r"\b(?:Integer\.parseInt|Long\.parseLong|Double\.parseDouble|Float\.parseFloat|int\.Parse|long\.Parse|double\.Parse|Convert\.ToInt32|Convert\.ToDouble)\(\s*(?P<var>[A-Za-z_][\w.]*)?",
        languages: &[Java, CSharp, Kotlin, Scala],
        guard: GuardKind::Null,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Major,
        postfix: false,
    },
    RiskySpec {
        id: "python-conversion",
        message: "Unhandled exception risk: int()/float() conversion raises ValueError",
        pattern: r"(?:^|[^.\w])(?:int|float)\(\s*(?P<var>[A-Za-z_][\w.]*)\s*\)",
        languages: &[Python],
        guard: GuardKind::Null,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Minor,
        postfix: false,
    },
    RiskySpec {
        id: "fs-sync",
        message: "Unhandled exception risk: synchronous file I/O throws when the file is missing",
        pattern: r"\bfs\.(?:readFileSync|writeFileSync|openSync|readdirSync|statSync)\(\s*(?P<var>[A-Za-z_$][\w$.]*)?",
        languages: &[JavaScript, TypeScript],
        guard: GuardKind::Protected,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Major,
        postfix: false,
    },
    RiskySpec {
        id: "python-open",
        message: "Unhandled exception risk: open() raises when the file is missing",
        pattern: r"(?:^|[^.\w])open\(\s*(?P<var>[A-Za-z_][\w.]*)?",
        languages: &[Python],
        guard: GuardKind::Protected,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Major,
        postfix: false,
    },
    RiskySpec {
        id: "file-io",
        message: "Unhandled exception risk: raw file I/O can fail",
        pattern: r"\b(?:new\s+(?:FileReader|FileInputStream|FileWriter|FileOutputStream)|Files\.(?:readAllLines|readString|readAllBytes|newBufferedReader)|File\.(?:read|open|readlines|ReadAllText|WriteAllText|ReadAllLines|Open)|file_get_contents)\(\s*\$?(?P<var>[A-Za-z_][\w.]*)?",
        languages: &[Java, CSharp, Ruby, Php, Kotlin, Scala],
        guard: GuardKind::Protected,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Major,
        postfix: false,
    },
    RiskySpec {
        id: "array-index",
        message: "Possible out-of-bounds array access: index is not bounds-checked",
        pattern: r"\[\s*\$?(?P<var>[A-Za-z_][\w$]*)\s*\]",
        languages: &[
            JavaScript, TypeScript, Python, Java, C, Cpp, CSharp, Go, Rust, Ruby, Php, Swift,
            Kotlin, Scala, Lua,
        ],
        guard: GuardKind::Bounds,
        kind: IssueKind::ArrayBounds,
        severity: ViolationSeverity::Minor,
        postfix: true,
    },
    RiskySpec {
        id: "division",
        message: "Possible division by zero: divisor is not checked",
        pattern: r"[\w$)\]]\s*(?:/{1,2}|%)=?\s*\$?(?P<var>[A-Za-z_][\w$.]*)",
        languages: &[
            JavaScript, TypeScript, Python, Java, C, Cpp, CSharp, Go, Rust, Ruby, Php, Swift,
            Kotlin, Scala, Lua,
        ],
        guard: GuardKind::Zero,
        kind: IssueKind::DivisionByZero,
        severity: ViolationSeverity::Minor,
        postfix: false,
    },
    RiskySpec {
        id: "nullable-result",
        message: "Possible null reference: lookup result is dereferenced without a null check",
        pattern: r"\b(?:getElementById|querySelector|find|match|exec)\([^()]*\)\.\w+",
        languages: &[JavaScript, TypeScript, Java, CSharp],
        guard: GuardKind::Null,
        kind: IssueKind::NullReference,
        severity: ViolationSeverity::Minor,
        postfix: false,
    },
    RiskySpec {
        id: "explicit-throw",
        message: "Unhandled exception risk: explicit throw is not caught locally",
        pattern: r"\b(?:throw\s+(?:new\s+)?\w+|raise\s+\w+)",
        languages: EXCEPTION_LANGUAGES,
        guard: GuardKind::Protected,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Minor,
        postfix: false,
    },
    RiskySpec {
        id: "rust-unwrap",
        message: "Unhandled panic risk: unwrap()/expect() aborts on error values",
        pattern: r"\.(?:unwrap|expect)\(",
        languages: &[Rust],
        guard: GuardKind::Protected,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Minor,
        postfix: false,
    },
    RiskySpec {
        id: "go-discarded-error",
        message: "Unhandled error: error return value is discarded",
        pattern: r"\w+\s*,\s*_\s*:?=\s*[\w.]+\(",
        languages: &[Go],
        guard: GuardKind::Protected,
        kind: IssueKind::UnhandledException,
        severity: ViolationSeverity::Minor,
        postfix: false,
    },
];

pub(crate) fn builtin_risky_operations() -> Result<Vec<RiskyOperation>> {
    RISKY_SPECS
        .iter()
        .map(|spec| {
            let pattern = Regex::new(spec.pattern)
                .with_context(|| format!("compiling risky operation {}", spec.id))?;
            Ok(RiskyOperation {
                id: spec.id,
                message: spec.message,
                pattern,
                languages: spec.languages.to_vec(),
                guard: spec.guard,
                kind: spec.kind,
                severity: spec.severity,
                postfix: spec.postfix,
            })
        })
        .collect()
}
