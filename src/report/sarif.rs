// SPDX-License-Identifier: PMPL-1.0-or-later

//! SARIF 2.1.0 output for code-scanning integrations
//!
//! Violations become results under `CS`-prefixed rules keyed by issue
//! kind; security findings keep their signature ids as rule ids.
//! See: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::types::{AnalysisResult, SecuritySeverity, ViolationSeverity};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifTool {
    pub driver: SarifToolComponent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifToolComponent {
    pub name: String,
    pub version: String,
    pub information_uri: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: SarifMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<SarifMessage>,
    pub default_configuration: SarifConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifConfiguration {
    pub level: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<usize>,
}

/// Stable rule id for a violation kind
fn violation_rule_id(kind: &str) -> &'static str {
    match kind {
        "deep-nesting" => "CS001",
        "long-function" => "CS002",
        "complex-function" => "CS003",
        "long-parameter-list" => "CS004",
        "magic-number" => "CS005",
        "unused-variable" => "CS006",
        "duplicate-code" => "CS007",
        "dead-code" => "CS008",
        "unhandled-exception" => "CS009",
        "array-bounds" => "CS010",
        "division-by-zero" => "CS011",
        "null-reference" => "CS012",
        _ => "CS000",
    }
}

fn violation_level(severity: ViolationSeverity) -> &'static str {
    match severity {
        ViolationSeverity::Major => "warning",
        ViolationSeverity::Minor => "note",
    }
}

fn security_level(severity: SecuritySeverity) -> &'static str {
    match severity {
        SecuritySeverity::Critical | SecuritySeverity::High => "error",
        SecuritySeverity::Medium => "warning",
        SecuritySeverity::Low | SecuritySeverity::Info => "note",
    }
}

fn location(uri: &str, line: Option<usize>, column: Option<usize>) -> Vec<SarifLocation> {
    vec![SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation {
                uri: uri.to_string(),
            },
            region: line.map(|start_line| SarifRegion {
                start_line,
                start_column: column,
            }),
        },
    }]
}

/// Convert an analysis of `artifact` to a SARIF log.
pub fn to_sarif(result: &AnalysisResult, artifact: &str) -> Result<SarifLog> {
    let mut rules: BTreeMap<String, SarifRule> = BTreeMap::new();
    let mut results = Vec::new();

    for issue in &result.violations.line_references {
        let id = violation_rule_id(&issue.kind);
        rules.entry(id.to_string()).or_insert_with(|| SarifRule {
            id: id.to_string(),
            name: issue.kind.clone(),
            short_description: SarifMessage {
                text: issue.category.clone(),
            },
            help: None,
            default_configuration: SarifConfiguration {
                level: violation_level(issue.severity).to_string(),
            },
        });
        results.push(SarifResult {
            rule_id: id.to_string(),
            level: violation_level(issue.severity).to_string(),
            message: SarifMessage {
                text: issue.message.clone(),
            },
            locations: location(artifact, Some(issue.line), issue.column),
        });
    }

    for finding in &result.security.findings {
        rules.entry(finding.id.clone()).or_insert_with(|| SarifRule {
            id: finding.id.clone(),
            name: finding.category.clone(),
            short_description: SarifMessage {
                text: if finding.cwe_id.is_empty() {
                    finding.title.clone()
                } else {
                    format!("{} ({})", finding.title, finding.cwe_id)
                },
            },
            help: (!finding.suggestion.is_empty()).then(|| SarifMessage {
                text: finding.suggestion.clone(),
            }),
            default_configuration: SarifConfiguration {
                level: security_level(finding.severity).to_string(),
            },
        });
        results.push(SarifResult {
            rule_id: finding.id.clone(),
            level: security_level(finding.severity).to_string(),
            message: SarifMessage {
                text: format!("{} ({} occurrence(s))", finding.title, finding.occurrences),
            },
            locations: location(artifact, finding.line, None),
        });
    }

    Ok(SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifToolComponent {
                    name: "codesift".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://github.com/hyperpolymath/codesift".to_string(),
                    rules: rules.into_values().collect(),
                },
            },
            results,
        }],
    })
}

pub fn to_sarif_json(result: &AnalysisResult, artifact: &str) -> Result<String> {
    let log = to_sarif(result, artifact)?;
    Ok(serde_json::to_string_pretty(&log)?)
}
