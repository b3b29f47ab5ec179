// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for codesift
//!
//! Every entity here is created fresh per analysis call and is immutable
//! once returned. Field names serialize in camelCase because the shapes
//! are shared with the enrichment service and downstream consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
    Kotlin,
    Scala,
    Lua,
    Shell,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::JavaScript,
            Language::TypeScript,
            Language::Python,
            Language::Java,
            Language::C,
            Language::Cpp,
            Language::CSharp,
            Language::Go,
            Language::Rust,
            Language::Ruby,
            Language::Php,
            Language::Swift,
            Language::Kotlin,
            Language::Scala,
            Language::Lua,
            Language::Shell,
        ]
    }

    /// Parse a declared language id. Returns `None` for unknown ids and for
    /// `auto`, which callers treat as "classify from content".
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" | "jsx" | "node" | "mjs" => Some(Language::JavaScript),
            "typescript" | "ts" | "tsx" => Some(Language::TypeScript),
            "python" | "py" | "python3" => Some(Language::Python),
            "java" => Some(Language::Java),
            "c" => Some(Language::C),
            "cpp" | "c++" | "cxx" | "cc" => Some(Language::Cpp),
            "csharp" | "c#" | "cs" => Some(Language::CSharp),
            "go" | "golang" => Some(Language::Go),
            "rust" | "rs" => Some(Language::Rust),
            "ruby" | "rb" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            "swift" => Some(Language::Swift),
            "kotlin" | "kt" | "kts" => Some(Language::Kotlin),
            "scala" | "sc" => Some(Language::Scala),
            "lua" => Some(Language::Lua),
            "shell" | "sh" | "bash" | "zsh" => Some(Language::Shell),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::Lua => "lua",
            Language::Shell => "shell",
        }
    }

    /// Languages a filename extension may belong to. More than one entry
    /// means the extension is ambiguous and content scoring decides.
    pub fn extension_candidates(path: &str) -> &'static [Language] {
        let ext = std::path::Path::new(path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match ext {
            "js" | "mjs" | "cjs" | "jsx" => &[Language::JavaScript],
            "ts" | "tsx" | "mts" => &[Language::TypeScript],
            "py" | "pyw" => &[Language::Python],
            "java" => &[Language::Java],
            "c" => &[Language::C],
            "h" => &[Language::C, Language::Cpp],
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" => &[Language::Cpp],
            "cs" => &[Language::CSharp],
            "go" => &[Language::Go],
            "rs" => &[Language::Rust],
            "rb" => &[Language::Ruby],
            "php" => &[Language::Php],
            "swift" => &[Language::Swift],
            "kt" | "kts" => &[Language::Kotlin],
            "scala" | "sc" => &[Language::Scala],
            "lua" => &[Language::Lua],
            "sh" | "bash" | "zsh" => &[Language::Shell],
            _ => &[],
        }
    }

    /// Whether exceptions (and therefore try/catch protection) exist in
    /// the language's error model.
    pub fn has_exceptions(&self) -> bool {
        !matches!(
            self,
            Language::C | Language::Go | Language::Rust | Language::Shell
        )
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Severity vocabulary for code-quality violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    Minor,
    Major,
}

impl fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationSeverity::Major => write!(f, "MAJOR"),
            ViolationSeverity::Minor => write!(f, "MINOR"),
        }
    }
}

/// Severity vocabulary for security and advisory findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecuritySeverity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl SecuritySeverity {
    /// Points removed from the security score per finding.
    pub fn penalty(&self) -> u32 {
        match self {
            SecuritySeverity::Critical => 25,
            SecuritySeverity::High => 15,
            SecuritySeverity::Medium => 8,
            SecuritySeverity::Low => 3,
            SecuritySeverity::Info => 1,
        }
    }
}

impl fmt::Display for SecuritySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecuritySeverity::Critical => write!(f, "CRITICAL"),
            SecuritySeverity::High => write!(f, "HIGH"),
            SecuritySeverity::Medium => write!(f, "MEDIUM"),
            SecuritySeverity::Low => write!(f, "LOW"),
            SecuritySeverity::Info => write!(f, "INFO"),
        }
    }
}

/// Severity vocabulary for syntax-level findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxSeverity {
    Info,
    Warning,
    Error,
}

/// A single line-anchored finding. The severity type parameter keeps the
/// violation, advisory and syntax vocabularies from ever mixing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue<S> {
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
    pub severity: S,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// What a violation detector found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    DeepNesting,
    LongFunction,
    ComplexFunction,
    LongParameterList,
    MagicNumber,
    UnusedVariable,
    DuplicateCode,
    DeadCode,
    UnhandledException,
    ArrayBounds,
    DivisionByZero,
    NullReference,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::DeepNesting => "deep-nesting",
            IssueKind::LongFunction => "long-function",
            IssueKind::ComplexFunction => "complex-function",
            IssueKind::LongParameterList => "long-parameter-list",
            IssueKind::MagicNumber => "magic-number",
            IssueKind::UnusedVariable => "unused-variable",
            IssueKind::DuplicateCode => "duplicate-code",
            IssueKind::DeadCode => "dead-code",
            IssueKind::UnhandledException => "unhandled-exception",
            IssueKind::ArrayBounds => "array-bounds",
            IssueKind::DivisionByZero => "division-by-zero",
            IssueKind::NullReference => "null-reference",
        }
    }
}

/// Raw detector output before aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIssue {
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
    pub severity: ViolationSeverity,
    pub kind: IssueKind,
}

impl RawIssue {
    pub fn new(
        line: usize,
        kind: IssueKind,
        severity: ViolationSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column: None,
            message: message.into(),
            severity,
            kind,
        }
    }

    pub fn at_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

/// Line-oriented size and structure metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub lines_of_code: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub comment_percentage: f64,
    pub function_count: usize,
    pub average_function_length: f64,
    pub max_nesting_depth: usize,
    pub cyclomatic_complexity: usize,
}

/// Big-O classes in increasing order of growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplexityClass {
    #[serde(rename = "O(1)")]
    Constant,
    #[serde(rename = "O(log n)")]
    Logarithmic,
    #[serde(rename = "O(n)")]
    Linear,
    #[serde(rename = "O(n log n)")]
    Linearithmic,
    #[serde(rename = "O(n²)")]
    Quadratic,
    #[serde(rename = "O(n³)")]
    Cubic,
    #[serde(rename = "O(n⁴)")]
    Quartic,
    #[serde(rename = "O(2^n)")]
    Exponential,
    #[serde(rename = "O(n!)")]
    Factorial,
}

impl ComplexityClass {
    pub fn notation(&self) -> &'static str {
        match self {
            ComplexityClass::Constant => "O(1)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Linearithmic => "O(n log n)",
            ComplexityClass::Quadratic => "O(n²)",
            ComplexityClass::Cubic => "O(n³)",
            ComplexityClass::Quartic => "O(n⁴)",
            ComplexityClass::Exponential => "O(2^n)",
            ComplexityClass::Factorial => "O(n!)",
        }
    }

    /// Polynomial class for a loop nest of the given depth.
    pub fn for_loop_depth(depth: usize) -> Self {
        match depth {
            0 => ComplexityClass::Constant,
            1 => ComplexityClass::Linear,
            2 => ComplexityClass::Quadratic,
            3 => ComplexityClass::Cubic,
            _ => ComplexityClass::Quartic,
        }
    }

    /// Lenient parse of notations as written by people and remote services
    /// ("O(n^2)", "o(n log n)", "O(N²)").
    pub fn parse(text: &str) -> Option<Self> {
        let compact: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '*')
            .collect::<String>()
            .to_lowercase();
        let inner = compact
            .strip_prefix("o(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(&compact);
        match inner {
            "1" => Some(ComplexityClass::Constant),
            "logn" => Some(ComplexityClass::Logarithmic),
            "n" => Some(ComplexityClass::Linear),
            "nlogn" => Some(ComplexityClass::Linearithmic),
            "n²" | "n^2" | "n2" => Some(ComplexityClass::Quadratic),
            "n³" | "n^3" | "n3" => Some(ComplexityClass::Cubic),
            "n⁴" | "n^4" | "n4" => Some(ComplexityClass::Quartic),
            "2^n" | "2ⁿ" => Some(ComplexityClass::Exponential),
            "n!" => Some(ComplexityClass::Factorial),
            _ => None,
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateConfidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityEstimate {
    pub notation: ComplexityClass,
    pub confidence: EstimateConfidence,
    pub description: String,
    pub factors: Vec<String>,
}

/// Deduplicated violation inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationReport {
    pub major_count: usize,
    pub minor_count: usize,
    /// At most one entry per line, ordered by line.
    pub line_references: Vec<Issue<ViolationSeverity>>,
    pub categories: BTreeMap<String, Vec<Issue<ViolationSeverity>>>,
    pub summary_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmellKind {
    DeepNesting,
    LongMethod,
    ComplexMethod,
    LongParameterList,
    MagicNumber,
    UnusedVariable,
    DuplicateCode,
    DeadCode,
    UnhandledException,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSmell {
    #[serde(rename = "type")]
    pub kind: SmellKind,
    pub severity: ViolationSeverity,
    pub description: String,
    pub line: usize,
    pub suggestion: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityFinding {
    pub id: String,
    pub title: String,
    pub severity: SecuritySeverity,
    pub category: String,
    pub cwe_id: String,
    pub pattern: String,
    pub suggestion: String,
    pub example: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default)]
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    pub findings: Vec<SecurityFinding>,
    pub score: u32,
    pub grade: char,
    /// Compliance category (OWASP Top 10) to finding ids.
    pub compliance: BTreeMap<String, Vec<String>>,
}

impl Default for SecurityReport {
    fn default() -> Self {
        Self {
            findings: Vec::new(),
            score: 100,
            grade: 'A',
            compliance: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestCategory {
    HappyPath,
    Boundary,
    Invalid,
    Performance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseSkeleton {
    pub name: String,
    pub description: String,
    pub input: String,
    pub expected_output: String,
    pub category: TestCategory,
    pub priority: TestPriority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCandidate {
    pub language: Language,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub language: Language,
    pub confidence: u8,
    pub alternatives: Vec<LanguageCandidate>,
    pub reason: String,
}

/// Performance or remote advisory finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub title: String,
    #[serde(default = "Advisory::default_severity")]
    pub severity: SecuritySeverity,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Advisory {
    fn default_severity() -> SecuritySeverity {
        SecuritySeverity::Info
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScore {
    pub score: f64,
    pub maintainability: String,
    pub notes: Vec<String>,
}

impl Default for QualityScore {
    fn default() -> Self {
        Self {
            score: 100.0,
            maintainability: "excellent".to_string(),
            notes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeSizeBucket {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl CodeSizeBucket {
    pub fn for_lines(lines: usize) -> Self {
        match lines {
            0..=19 => CodeSizeBucket::Tiny,
            20..=99 => CodeSizeBucket::Small,
            100..=499 => CodeSizeBucket::Medium,
            500..=1999 => CodeSizeBucket::Large,
            _ => CodeSizeBucket::Huge,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub timestamp: String,
    pub language: Language,
    pub code_size: CodeSizeBucket,
    pub ai_analysis_used: bool,
    /// Why enrichment was not used, when it was attempted and failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_note: Option<String>,
}

/// Top-level aggregate returned by `Analyzer::analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub metadata: AnalysisMetadata,
    pub detection: DetectionResult,
    pub metrics: Metrics,
    pub time_complexity: ComplexityEstimate,
    pub space_complexity: ComplexityEstimate,
    pub violations: ViolationReport,
    pub code_smells: Vec<CodeSmell>,
    pub security: SecurityReport,
    pub syntax_issues: Vec<Issue<SyntaxSeverity>>,
    pub suggestions: Vec<Issue<SyntaxSeverity>>,
    pub performance: Vec<Advisory>,
    pub quality: QualityScore,
    pub test_cases: Vec<TestCaseSkeleton>,
}

impl AnalysisResult {
    /// Total issue count across violations and syntax findings.
    pub fn issue_count(&self) -> usize {
        self.violations.line_references.len() + self.syntax_issues.len()
    }
}
