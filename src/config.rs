// SPDX-License-Identifier: PMPL-1.0-or-later

//! Analyzer configuration
//!
//! Every field has a default so partial JSON/YAML files work. The core
//! only ever receives a constructed `AnalyzerConfig`; reading files is
//! left to the CLI.

use crate::types::Language;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Language assumed when classification finds no signal.
    pub default_language: Language,
    pub nesting_threshold: usize,
    pub function_length_warn: usize,
    pub function_length_fail: usize,
    pub duplicate_window: usize,
    pub max_parameters: usize,
    pub function_complexity_threshold: usize,
    pub allowed_magic_numbers: Vec<f64>,
    /// Detector names to skip (see `DetectorBattery::names`).
    pub disabled_detectors: Vec<String>,
    /// Result-cache entries; 0 disables caching.
    pub cache_capacity: usize,
    pub gateway_timeout_ms: u64,
    /// Enrichment endpoint; `None` keeps analysis local.
    pub gateway_url: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_language: Language::JavaScript,
            nesting_threshold: 4,
            function_length_warn: 25,
            function_length_fail: 40,
            duplicate_window: 3,
            max_parameters: 5,
            function_complexity_threshold: 10,
            allowed_magic_numbers: vec![0.0, 1.0, 2.0, 10.0, 100.0, 1000.0],
            disabled_detectors: Vec::new(),
            cache_capacity: 128,
            gateway_timeout_ms: 10_000,
            gateway_url: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json analyzer config {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml analyzer config {}", path.display())),
            _ => Err(anyhow!(
                "unsupported analyzer config extension for {}",
                path.display()
            )),
        }
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }

    pub fn is_detector_enabled(&self, name: &str) -> bool {
        !self.disabled_detectors.iter().any(|d| d == name)
    }

    pub fn is_allowed_number(&self, value: f64) -> bool {
        self.allowed_magic_numbers
            .iter()
            .any(|allowed| (allowed - value).abs() < f64::EPSILON)
    }
}
