// SPDX-License-Identifier: PMPL-1.0-or-later

//! External enrichment gateway
//!
//! Sends `{code, language}` to a higher-fidelity analysis service. Every
//! failure mode (transport, deadline, non-2xx status, unparseable body)
//! collapses into `Enrichment::Unavailable` and the caller keeps its local
//! results. Replies that are not clean JSON go through a salvage pass
//! before being given up on.

pub mod merge;
pub mod transport;

pub use merge::merge_into;
pub use transport::{EnrichmentTransport, HttpTransport, TransportReply};

use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("no reply within {0:?}")]
    Timeout(Duration),
    #[error("service answered with status {0}")]
    Status(u16),
    #[error("malformed reply: {0}")]
    Malformed(String),
    #[error("worker exited without replying")]
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    pub code: String,
    pub language: String,
}

/// Issue as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteIssue {
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Default for RemoteIssue {
    fn default() -> Self {
        Self {
            line: 1,
            column: None,
            message: String::new(),
            kind: None,
        }
    }
}

/// Security finding as reported by the service. Severity is kept as text
/// and mapped leniently since services disagree on casing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteFinding {
    pub title: String,
    pub severity: Option<String>,
    pub category: Option<String>,
    pub cwe_id: Option<String>,
    pub description: String,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteComplexity {
    pub time: Option<String>,
    pub space: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteQuality {
    pub score: Option<f64>,
    pub maintainability: Option<String>,
    pub notes: Vec<String>,
}

/// Structured reply. `None` means the service omitted the field, which
/// leaves the local result in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentResponse {
    pub errors: Option<Vec<RemoteIssue>>,
    pub warnings: Option<Vec<RemoteIssue>>,
    pub suggestions: Option<Vec<RemoteIssue>>,
    pub security: Option<Vec<RemoteFinding>>,
    pub performance: Option<Vec<RemoteFinding>>,
    pub complexity: Option<RemoteComplexity>,
    pub quality: Option<RemoteQuality>,
}

/// Outcome of parsing a reply body
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Parsed(EnrichmentResponse),
    Unparsed(String),
}

impl ParsedReply {
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<EnrichmentResponse>(body) {
            Ok(response) => ParsedReply::Parsed(response),
            Err(_) => ParsedReply::Unparsed(body.to_string()),
        }
    }

    /// Convert to a response, salvaging unparsed text where possible.
    pub fn recover(self) -> Result<EnrichmentResponse, GatewayError> {
        match self {
            ParsedReply::Parsed(response) => Ok(response),
            ParsedReply::Unparsed(raw) => salvage(&raw).ok_or_else(|| {
                let preview: String = raw.chars().take(80).collect();
                GatewayError::Malformed(preview)
            }),
        }
    }
}

/// Best-effort recovery of a JSON object wrapped in markdown fences or
/// surrounded by prose.
pub fn salvage(raw: &str) -> Option<EnrichmentResponse> {
    let unfenced = strip_fences(raw);
    if let Ok(response) = serde_json::from_str(unfenced) {
        return Some(response);
    }
    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&unfenced[start..=end]).ok()
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// What the analyzer gets back from the gateway
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Available(EnrichmentResponse),
    Unavailable(GatewayError),
}

pub struct EnrichmentGateway {
    transport: Arc<dyn EnrichmentTransport>,
    timeout: Duration,
}

impl EnrichmentGateway {
    pub fn new(transport: Arc<dyn EnrichmentTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask the service about `code`. Returns within the configured timeout
    /// whatever the transport does; a late reply is dropped with its worker.
    pub fn enrich(&self, code: &str, language: Language) -> Enrichment {
        let request = EnrichmentRequest {
            code: code.to_string(),
            language: language.id().to_string(),
        };
        let transport = Arc::clone(&self.transport);
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("codesift-enrichment".to_string())
            .spawn(move || {
                let _ = tx.send(transport.post(&request));
            });
        if let Err(e) = spawned {
            return self.unavailable(GatewayError::Transport(e.to_string()));
        }

        let reply = match rx.recv_timeout(self.timeout) {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return self.unavailable(e),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                return self.unavailable(GatewayError::Timeout(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return self.unavailable(GatewayError::Disconnected)
            }
        };

        if !reply.is_success() {
            return self.unavailable(GatewayError::Status(reply.status));
        }

        match ParsedReply::from_body(&reply.body).recover() {
            Ok(response) => {
                debug!("enrichment reply accepted");
                Enrichment::Available(response)
            }
            Err(e) => self.unavailable(e),
        }
    }

    fn unavailable(&self, error: GatewayError) -> Enrichment {
        warn!(error = %error, "enrichment unavailable, using local analysis");
        Enrichment::Unavailable(error)
    }
}
