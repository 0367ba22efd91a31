// src/config.rs
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::decision::{DecisionEngine, Thresholds};
use crate::error::{ConfigError, FactCheckError};
use crate::factcheck::{FactChecker, GoogleFactCheck, NoFactCheck, GOOGLE_CLAIM_SEARCH};
use crate::sources::{KnownSources, SourceDetector};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCheckSettings {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub requests_per_second: u32,
    /// Characters of normalized text sent as the claim.
    pub claim_chars: usize,
    pub language: Option<String>,
}

impl Default for FactCheckSettings {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_CLAIM_SEARCH.to_string(),
            timeout_ms: 10_000,
            requests_per_second: 1,
            claim_chars: 300,
            language: None,
        }
    }
}

/// Everything the analysis needs besides the model and the API key.
/// Every key is optional in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: Thresholds,
    pub sources: KnownSources,
    /// Only accept outlet names standing as whole words (`ap` no longer
    /// matches inside `happen`). Off by default.
    pub whole_word_sources: bool,
    pub fact_check: FactCheckSettings,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else { return Ok(Self::default()) };
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let s: Settings = toml::from_str(raw)?;
        s.thresholds.validate()?;
        Ok(s)
    }

    pub fn engine(&self) -> DecisionEngine {
        DecisionEngine::new(self.thresholds, self.fact_check.claim_chars, Duration::from_millis(self.fact_check.timeout_ms))
    }

    pub fn detector(&self) -> Result<SourceDetector, ConfigError> {
        let sources = self.sources.clone();
        let detector = if self.whole_word_sources { SourceDetector::whole_words(sources) } else { SourceDetector::new(sources) };
        Ok(detector?)
    }

    /// Google client when a key is present, otherwise a checker that never finds anything.
    pub fn fact_checker(&self, api_key: Option<String>) -> Result<Box<dyn FactChecker>, FactCheckError> {
        match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                let fc = &self.fact_check;
                Ok(Box::new(GoogleFactCheck::new(key, fc.endpoint.clone(), fc.language.clone(), fc.requests_per_second, fc.timeout_ms)?))
            }
            None => {
                tracing::warn!("no fact-check api key, lookups will find nothing");
                Ok(Box::new(NoFactCheck))
            }
        }
    }
}
