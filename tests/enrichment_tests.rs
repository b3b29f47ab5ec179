// SPDX-License-Identifier: PMPL-1.0-or-later

//! Enrichment gateway failure modes and merging, with mock transports

use codesift::enrichment::{
    Enrichment, EnrichmentGateway, EnrichmentRequest, EnrichmentTransport, GatewayError,
    TransportReply,
};
use codesift::patterns::PatternTables;
use codesift::types::{ComplexityClass, EstimateConfidence, SecuritySeverity};
use codesift::{Analyzer, AnalyzerConfig, Language};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const CODE: &str = "function load(x) {\n  return JSON.parse(x);\n}\n";

struct StaticTransport {
    status: u16,
    body: String,
    seen: Mutex<Vec<EnrichmentRequest>>,
}

impl StaticTransport {
    fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl EnrichmentTransport for StaticTransport {
    fn post(&self, request: &EnrichmentRequest) -> Result<TransportReply, GatewayError> {
        self.seen.lock().push(request.clone());
        Ok(TransportReply {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

struct SlowTransport(Duration);

impl EnrichmentTransport for SlowTransport {
    fn post(&self, _request: &EnrichmentRequest) -> Result<TransportReply, GatewayError> {
        thread::sleep(self.0);
        Ok(TransportReply {
            status: 200,
            body: "{}".to_string(),
        })
    }
}

struct RefusingTransport;

impl EnrichmentTransport for RefusingTransport {
    fn post(&self, _request: &EnrichmentRequest) -> Result<TransportReply, GatewayError> {
        Err(GatewayError::Transport("connection refused".to_string()))
    }
}

fn gateway(transport: Arc<dyn EnrichmentTransport>) -> EnrichmentGateway {
    EnrichmentGateway::new(transport, Duration::from_millis(500))
}

fn analyzer_with(gateway: EnrichmentGateway) -> Analyzer {
    let tables = Arc::new(PatternTables::builtin().unwrap());
    Analyzer::with_tables(tables, AnalyzerConfig::default())
        .unwrap()
        .with_gateway(gateway)
}

#[test]
fn test_timeout_falls_back_to_local_analysis() {
    let slow = EnrichmentGateway::new(
        Arc::new(SlowTransport(Duration::from_secs(2))),
        Duration::from_millis(50),
    );
    let result = analyzer_with(slow).analyze(CODE, "javascript");

    assert!(!result.metadata.ai_analysis_used);
    assert!(result
        .metadata
        .enrichment_note
        .as_deref()
        .is_some_and(|n| n.starts_with("no reply within")));
    // local heuristics are all still there
    assert_eq!(result.violations.major_count, 1);
    assert_eq!(result.metrics.function_count, 1);
    assert!(!result.test_cases.is_empty());
}

#[test]
fn test_gateway_reports_each_failure_mode() {
    let refused = gateway(Arc::new(RefusingTransport)).enrich(CODE, Language::JavaScript);
    assert_eq!(
        refused,
        Enrichment::Unavailable(GatewayError::Transport("connection refused".to_string()))
    );

    let unavailable = gateway(StaticTransport::new(503, "{}")).enrich(CODE, Language::JavaScript);
    assert_eq!(unavailable, Enrichment::Unavailable(GatewayError::Status(503)));

    let prose = gateway(StaticTransport::new(200, "the model is warming up"))
        .enrich(CODE, Language::JavaScript);
    assert!(matches!(prose, Enrichment::Unavailable(GatewayError::Malformed(_))));
}

#[test]
fn test_request_carries_code_and_language_id() {
    let transport = StaticTransport::new(200, "{}");
    let gw = gateway(transport.clone());
    assert!(matches!(gw.enrich(CODE, Language::TypeScript), Enrichment::Available(_)));

    let seen = transport.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].code, CODE);
    assert_eq!(seen[0].language, "typescript");
}

#[test]
fn test_malformed_reply_keeps_local_result() {
    let result = analyzer_with(gateway(StaticTransport::new(200, "<html>oops</html>")))
        .analyze(CODE, "javascript");
    assert!(!result.metadata.ai_analysis_used);
    assert!(result
        .metadata
        .enrichment_note
        .as_deref()
        .is_some_and(|n| n.starts_with("malformed reply")));
    assert_eq!(result.violations.line_references.len(), 1);
}

#[test]
fn test_fenced_reply_is_salvaged() {
    let body = "```json\n{\"suggestions\": [{\"line\": 2, \"message\": \"Wrap JSON.parse in try/catch\"}]}\n```";
    let result = analyzer_with(gateway(StaticTransport::new(200, body))).analyze(CODE, "javascript");

    assert!(result.metadata.ai_analysis_used);
    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].line, 2);
    assert_eq!(result.suggestions[0].category, "Suggestion");
}

#[test]
fn test_successful_reply_is_merged() {
    let body = r#"{
        "security": [
            {"title": "SQL injection", "severity": "HIGH", "cweId": "CWE-89", "line": 2}
        ],
        "complexity": {"time": "O(n^2)"},
        "quality": {"score": 55.5, "maintainability": "fair"}
    }"#;
    let result = analyzer_with(gateway(StaticTransport::new(200, body))).analyze(CODE, "javascript");

    assert!(result.metadata.ai_analysis_used);
    assert!(result.metadata.enrichment_note.is_none());

    let remote = &result.security.findings[0];
    assert_eq!(remote.id, "REMOTE001");
    assert_eq!(remote.severity, SecuritySeverity::High);
    assert_eq!(result.security.score, 85);
    assert_eq!(result.security.grade, 'B');

    assert_eq!(result.time_complexity.notation, ComplexityClass::Quadratic);
    assert_eq!(result.time_complexity.confidence, EstimateConfidence::High);
    assert!(result
        .time_complexity
        .factors
        .iter()
        .any(|f| f == "reported by enrichment service"));

    assert_eq!(result.quality.score, 55.5);
    assert_eq!(result.quality.maintainability, "fair");

    // omitted fields keep the local heuristics
    assert_eq!(result.violations.major_count, 1);
    assert_eq!(result.space_complexity.notation, ComplexityClass::Constant);
}

#[test]
fn test_local_findings_with_same_cwe_are_not_repeated() {
    let code = "const out = eval(input);\n";
    let body = r#"{"security": [{"title": "Code injection via eval", "severity": "critical", "cweId": "CWE-95"}]}"#;
    let result = analyzer_with(gateway(StaticTransport::new(200, body))).analyze(code, "javascript");

    let cwe95: Vec<_> = result
        .security
        .findings
        .iter()
        .filter(|f| f.cwe_id == "CWE-95")
        .collect();
    assert_eq!(cwe95.len(), 1);
    assert_eq!(cwe95[0].id, "REMOTE001");
    // the compliance entry pointed at the dropped local finding
    assert!(result.security.compliance.values().all(|ids| !ids.contains(&"SEC001".to_string())));
}

#[test]
fn test_unrecognised_notation_keeps_local_estimate() {
    let body = r#"{"complexity": {"time": "pretty fast"}}"#;
    let result = analyzer_with(gateway(StaticTransport::new(200, body))).analyze(CODE, "javascript");
    assert_eq!(result.time_complexity.notation, ComplexityClass::Constant);
    assert!(result.time_complexity.factors.is_empty());
}
