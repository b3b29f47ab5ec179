// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{EnrichmentRequest, GatewayError};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

/// Raw reply from the enrichment service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

impl TransportReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Mockable transport to the enrichment service.
///
/// Implementations may block; the gateway always calls them off the
/// caller's thread and enforces its own deadline.
pub trait EnrichmentTransport: Send + Sync {
    fn post(&self, request: &EnrichmentRequest) -> Result<TransportReply, GatewayError>;
}

/// JSON-over-HTTP transport
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("codesift/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building enrichment http client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EnrichmentTransport for HttpTransport {
    fn post(&self, request: &EnrichmentRequest) -> Result<TransportReply, GatewayError> {
        debug!(endpoint = %self.endpoint, language = %request.language, "posting enrichment request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(self.timeout)
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(TransportReply { status, body })
    }
}
