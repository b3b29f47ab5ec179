// SPDX-License-Identifier: PMPL-1.0-or-later

//! Vulnerability signatures
//!
//! Matched over the raw text with no context suppression. Each signature
//! carries a CWE id and the OWASP Top 10 (2021) bucket used for
//! compliance grouping.

use crate::types::{Language, SecuritySeverity};
use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct VulnerabilitySignature {
    pub id: &'static str,
    pub title: &'static str,
    pub severity: SecuritySeverity,
    pub category: &'static str,
    pub cwe_id: &'static str,
    pub owasp: &'static str,
    pub pattern: Regex,
    pub suggestion: &'static str,
    pub example: &'static str,
    pub languages: Vec<Language>,
}

struct SignatureSpec {
    id: &'static str,
    title: &'static str,
    severity: SecuritySeverity,
    category: &'static str,
    cwe_id: &'static str,
    owasp: &'static str,
    pattern: &'static str,
    suggestion: &'static str,
    example: &'static str,
    languages: &'static [Language],
}

const A01: &str = "A01:2021 Broken Access Control";
const A02: &str = "A02:2021 Cryptographic Failures";
const A03: &str = "A03:2021 Injection";
const A04: &str = "A04:2021 Insecure Design";
const A05: &str = "A05:2021 Security Misconfiguration";
const A07: &str = "A07:2021 Identification and Authentication Failures";
const A08: &str = "A08:2021 Software and Data Integrity Failures";
const A09: &str = "A09:2021 Security Logging and Monitoring Failures";

use Language::*;
use SecuritySeverity::*;

const SIGNATURES: &[SignatureSpec] = &[
    SignatureSpec {
        id: "SEC001",
        title: "Dynamic code evaluation",
        severity: Critical,
        category: "injection",
        cwe_id: "CWE-95",
        owasp: A03,
        pattern: r"\beval\s*\(",
        suggestion: "Avoid eval(); parse data explicitly or use a dispatch table",
        example: "const handler = handlers[name];",
        languages: &[JavaScript, TypeScript, Python, Php, Ruby, Lua],
    },
    SignatureSpec {
        id: "SEC002",
        title: "Unsanitised HTML injection",
        severity: High,
        category: "xss",
        cwe_id: "CWE-79",
        owasp: A03,
        pattern: r"\.(?:innerHTML|outerHTML)\s*\+?=|\bdangerouslySetInnerHTML\b",
        suggestion: "Assign textContent or sanitise markup before inserting it",
        example: "element.textContent = userInput;",
        languages: &[JavaScript, TypeScript],
    },
    SignatureSpec {
        id: "SEC003",
        title: "document.write with dynamic content",
        severity: Medium,
        category: "xss",
        cwe_id: "CWE-79",
        owasp: A03,
        pattern: r"\bdocument\.write(?:ln)?\s*\(",
        suggestion: "Build DOM nodes instead of writing raw markup",
        example: "parent.appendChild(document.createTextNode(value));",
        languages: &[JavaScript, TypeScript],
    },
    SignatureSpec {
        id: "SEC004",
        title: "SQL built by string concatenation",
        severity: Critical,
        category: "injection",
        cwe_id: "CWE-89",
        owasp: A03,
        pattern: r#"(?i)["'`]\s*(?:SELECT|INSERT|UPDATE|DELETE)\b[^"'`]*["'`]\s*(?:\+|\.|%)|\b(?:SELECT|INSERT\s+INTO|UPDATE|DELETE\s+FROM)\b[^"'`\n]*\$\{"#,
        suggestion: "Use parameterised queries or prepared statements",
        example: "db.query(\"SELECT * FROM users WHERE id = ?\", [id]);",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC005",
        title: "Hardcoded credential",
        severity: High,
        category: "secrets",
        cwe_id: "CWE-798",
        owasp: A07,
        pattern: r#"(?i)(api[_-]?key|api[_-]?secret|password|passwd|secret[_-]?key|access[_-]?token|private[_-]?key)\s*[=:]\s*["'][^"']{8,}"#,
        suggestion: "Load secrets from the environment or a secret manager",
        example: "const apiKey = process.env.API_KEY;",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC006",
        title: "Weak hash algorithm",
        severity: Medium,
        category: "cryptography",
        cwe_id: "CWE-328",
        owasp: A02,
        pattern: r#"(?i)\b(?:md5|sha1)\s*\(|createHash\(\s*["'](?:md5|sha1)["']|hashlib\.(?:md5|sha1)\b|MessageDigest\.getInstance\(\s*"(?:MD5|SHA-?1)""#,
        suggestion: "Use SHA-256 or stronger; use a password hash (argon2, bcrypt) for credentials",
        example: "crypto.createHash('sha256')",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC007",
        title: "Insecure randomness",
        severity: Low,
        category: "cryptography",
        cwe_id: "CWE-338",
        owasp: A02,
        pattern: r"\bMath\.random\s*\(|\brandom\.(?:random|randint|choice)\s*\(|\bnew\s+Random\s*\(|\brand\s*\(\s*\)",
        suggestion: "Use a cryptographically secure generator for tokens and keys",
        example: "crypto.randomBytes(32)",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC008",
        title: "OS command execution",
        severity: Critical,
        category: "injection",
        cwe_id: "CWE-78",
        owasp: A03,
        pattern: r"\bchild_process\.exec(?:Sync)?\s*\(|\bexecSync\s*\(|\bos\.system\s*\(|\bsubprocess\.\w+\([^)]*shell\s*=\s*True|Runtime\.getRuntime\(\)\.exec\s*\(|\b(?:shell_exec|passthru|popen|system)\s*\(",
        suggestion: "Pass arguments as a list without a shell and validate inputs",
        example: "subprocess.run([\"ls\", path], check=True)",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC009",
        title: "Unsafe deserialisation",
        severity: High,
        category: "deserialization",
        cwe_id: "CWE-502",
        owasp: A08,
        pattern: r"\bpickle\.loads?\s*\(|\byaml\.(?:unsafe_)?load\s*\(|\bunserialize\s*\(|\bObjectInputStream\b|\bMarshal\.load\b|\bBinaryFormatter\b",
        suggestion: "Deserialise only trusted data with a safe loader",
        example: "yaml.safe_load(stream)",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC010",
        title: "Cleartext HTTP endpoint",
        severity: Medium,
        category: "transport",
        cwe_id: "CWE-319",
        owasp: A02,
        pattern: r"http://(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}",
        suggestion: "Use HTTPS for every remote endpoint",
        example: "https://api.example.com",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC011",
        title: "TLS certificate verification disabled",
        severity: High,
        category: "transport",
        cwe_id: "CWE-295",
        owasp: A02,
        pattern: r"(?i)verify\s*=\s*False|rejectUnauthorized\s*:\s*false|NODE_TLS_REJECT_UNAUTHORIZED|InsecureSkipVerify\s*:\s*true|danger_accept_invalid_certs\(\s*true",
        suggestion: "Keep certificate verification enabled",
        example: "requests.get(url, timeout=10)",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC012",
        title: "Path traversal through request data",
        severity: High,
        category: "path-traversal",
        cwe_id: "CWE-22",
        owasp: A01,
        pattern: r"\b(?:readFile|readFileSync|open|sendFile|createReadStream)\s*\([^)]*\breq(?:uest)?\.(?:params|query|body|args|GET|POST)",
        suggestion: "Normalise paths and check they stay under an allowed root",
        example: "path.resolve(root, name).startsWith(root)",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC013",
        title: "Sensitive data written to logs",
        severity: Medium,
        category: "logging",
        cwe_id: "CWE-532",
        owasp: A09,
        pattern: r"(?i)\b(?:console\.(?:log|info|debug)|print|println|logger?\.\w+|System\.out\.println)\s*\([^)]*\b(?:password|passwd|secret|token|api_?key)\b",
        suggestion: "Redact credentials and tokens before logging",
        example: "logger.info(\"login attempt for user {}\", user)",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC014",
        title: "Debug mode enabled",
        severity: Low,
        category: "configuration",
        cwe_id: "CWE-489",
        owasp: A05,
        pattern: r"(?i)\bdebug\s*[=:]\s*true\b|\bapp\.run\([^)]*debug\s*=\s*True",
        suggestion: "Disable debug mode outside development",
        example: "DEBUG = os.environ.get(\"DEBUG\") == \"1\"",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC015",
        title: "Unresolved security-relevant marker",
        severity: Info,
        category: "maintenance",
        cwe_id: "CWE-546",
        owasp: A04,
        pattern: r"\b(?:TODO|FIXME|HACK|XXX)\b",
        suggestion: "Resolve or track the marker before release",
        example: "// tracked in issue #123",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC016",
        title: "Unbounded buffer copy",
        severity: High,
        category: "memory",
        cwe_id: "CWE-120",
        owasp: A04,
        pattern: r"\b(?:strcpy|strcat|gets|sprintf)\s*\(",
        suggestion: "Use bounded variants such as strncpy, snprintf or fgets",
        example: "snprintf(buf, sizeof buf, \"%s\", src);",
        languages: &[C, Cpp],
    },
    SignatureSpec {
        id: "SEC017",
        title: "String passed to timer",
        severity: Medium,
        category: "injection",
        cwe_id: "CWE-95",
        owasp: A03,
        pattern: r#"\bset(?:Timeout|Interval)\s*\(\s*["'`]"#,
        suggestion: "Pass a function instead of a code string",
        example: "setTimeout(() => refresh(), 1000);",
        languages: &[JavaScript, TypeScript],
    },
    SignatureSpec {
        id: "SEC018",
        title: "Permissive CORS policy",
        severity: Medium,
        category: "configuration",
        cwe_id: "CWE-942",
        owasp: A05,
        pattern: r#"Access-Control-Allow-Origin["']?\s*[,:=]\s*["']\*|\borigin\s*:\s*["']\*["']"#,
        suggestion: "Restrict allowed origins to known hosts",
        example: "cors({ origin: \"https://app.example.com\" })",
        languages: &[],
    },
    SignatureSpec {
        id: "SEC019",
        title: "Unsafe block",
        severity: Low,
        category: "memory",
        cwe_id: "CWE-119",
        owasp: A04,
        pattern: r"\bunsafe\s*\{",
        suggestion: "Document the invariants the unsafe block relies on",
        example: "// SAFETY: index checked above",
        languages: &[Rust, CSharp],
    },
];

pub(crate) fn builtin_signatures() -> Result<Vec<VulnerabilitySignature>> {
    SIGNATURES
        .iter()
        .map(|spec| {
            let pattern = Regex::new(spec.pattern)
                .with_context(|| format!("compiling security signature {}", spec.id))?;
            Ok(VulnerabilitySignature {
                id: spec.id,
                title: spec.title,
                severity: spec.severity,
                category: spec.category,
                cwe_id: spec.cwe_id,
                owasp: spec.owasp,
                pattern,
                suggestion: spec.suggestion,
                example: spec.example,
                languages: spec.languages.to_vec(),
            })
        })
        .collect()
}
