// src/pipeline.rs
use anyhow::{anyhow, Result};
use std::io::IsTerminal;

use crate::classifier::Classifier;
use crate::decision::DecisionEngine;
use crate::factcheck::FactChecker;
use crate::normalize::normalize;
use crate::report::Report;
use crate::sources::SourceDetector;
use crate::types::{ClassifierScore, SourceMatch};

/// Asked for an outlet name when detection finds nothing. `None` skips.
pub trait SourcePrompt {
    fn ask(&self) -> Option<String>;
}

pub struct NoPrompt;
impl SourcePrompt for NoPrompt {
    fn ask(&self) -> Option<String> { None }
}

/// Answer given up front, e.g. from `--source`.
pub struct FixedSource(pub String);
impl SourcePrompt for FixedSource {
    fn ask(&self) -> Option<String> { Some(self.0.clone()) }
}

pub struct TerminalPrompt;
impl SourcePrompt for TerminalPrompt {
    fn ask(&self) -> Option<String> {
        if !std::io::stdin().is_terminal() { return None; }
        let answer = dialoguer::Input::<String>::new()
            .with_prompt("No trusted source detected. Source name (blank to skip)")
            .allow_empty(true)
            .interact_text();
        match answer {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "could not read source name");
                None
            }
        }
    }
}

pub struct Analyzer {
    pub classifier: Box<dyn Classifier>,
    pub detector: SourceDetector,
    pub engine: DecisionEngine,
    pub checker: Box<dyn FactChecker>,
}

impl Analyzer {
    /// Score, attribute and decide one article's raw text.
    pub async fn analyze(&self, raw: &str, prompt: &dyn SourcePrompt) -> Result<Report> {
        let normalized = normalize(raw);
        let p = self.classifier.predict_real_probability(&normalized);
        let score = ClassifierScore::new(p).ok_or_else(|| anyhow!("classifier returned {p}, not a probability"))?;

        let source = self.attribute(raw, prompt);
        let evaluation = self.engine.evaluate(score, &source, &normalized, self.checker.as_ref()).await;
        tracing::info!(probability = p, source = source.name().unwrap_or("-"), tier = %source.tier(), decision = %evaluation.decision, "article classified");

        Ok(Report { probability: p, source, evaluation })
    }

    fn attribute(&self, raw: &str, prompt: &dyn SourcePrompt) -> SourceMatch {
        let found = self.detector.detect(raw);
        if !found.is_none() { return found; }

        let Some(entry) = prompt.ask().filter(|e| !e.trim().is_empty()) else { return found };
        let manual = self.detector.manual(&entry);
        if manual.is_none() {
            tracing::warn!(entry = entry.trim(), "unrecognized source, not trusted");
        }
        manual
    }
}
