// src/classifier.rs
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::ClassifierError;

pub trait Classifier: Send + Sync {
    /// Probability in `[0, 1]` that the (normalized) text is REAL.
    fn predict_real_probability(&self, text: &str) -> f64;
}

fn default_ngram_range() -> (usize, usize) { (1, 1) }

#[derive(Debug, Deserialize)]
struct Artifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    coef: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
}

/// TF-IDF features fed to a logistic-regression head, exported as JSON.
///
/// Tokens are whitespace-separated words of two or more characters, and
/// n-grams are joined with a single space, matching a default scikit-learn
/// `TfidfVectorizer` run on already-normalized text. Rows are L2-normalised.
#[derive(Debug)]
pub struct LinearModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    coef: Vec<f64>,
    intercept: f64,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
}

impl LinearModel {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ClassifierError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ClassifierError> {
        let a: Artifact = serde_json::from_str(raw)?;
        if a.idf.len() != a.coef.len() {
            return Err(ClassifierError::Shape(format!("idf has {} columns, coef has {}", a.idf.len(), a.coef.len())));
        }
        if let Some((term, ix)) = a.vocabulary.iter().find(|(_, ix)| **ix >= a.idf.len()) {
            return Err(ClassifierError::Shape(format!("term {term:?} maps to column {ix}, only {} columns", a.idf.len())));
        }
        let (lo, hi) = a.ngram_range;
        if lo == 0 || lo > hi {
            return Err(ClassifierError::Shape(format!("bad ngram_range ({lo}, {hi})")));
        }
        tracing::debug!(terms = a.vocabulary.len(), ngram_range = ?a.ngram_range, "classifier loaded");
        Ok(Self {
            vocabulary: a.vocabulary, idf: a.idf, coef: a.coef,
            intercept: a.intercept, ngram_range: a.ngram_range, sublinear_tf: a.sublinear_tf,
        })
    }

    fn features(&self, text: &str) -> HashMap<usize, f64> {
        let tokens: Vec<&str> = text.split_whitespace().filter(|t| t.chars().count() >= 2).collect();
        let mut counts: HashMap<usize, f64> = HashMap::new();
        let (lo, hi) = self.ngram_range;
        for n in lo..=hi {
            for gram in tokens.windows(n) {
                if let Some(&col) = self.vocabulary.get(&gram.join(" ")) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }
        }
        for (col, v) in counts.iter_mut() {
            let tf = if self.sublinear_tf { 1.0 + v.ln() } else { *v };
            *v = tf * self.idf[*col];
        }
        let norm = counts.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 { counts.values_mut().for_each(|v| *v /= norm); }
        counts
    }
}

impl Classifier for LinearModel {
    fn predict_real_probability(&self, text: &str) -> f64 {
        let z = self.features(text).iter().map(|(col, x)| self.coef[*col] * x).sum::<f64>() + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}
