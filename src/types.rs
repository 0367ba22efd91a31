use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier { Strong, Medium, Weak, Manual, None }

impl SourceTier {
    /// Tiers credible enough to turn a FAKE-leaning score into RUMOR.
    pub fn is_trusted(self) -> bool {
        matches!(self, SourceTier::Strong | SourceTier::Medium | SourceTier::Manual)
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceTier::Strong => "strong",
            SourceTier::Medium => "medium",
            SourceTier::Weak => "weak",
            SourceTier::Manual => "manual",
            SourceTier::None => "none",
        })
    }
}

/// A detected (or operator-supplied) outlet. Fields are private so that
/// `tier == None` holds exactly when `name` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMatch {
    name: Option<String>,
    tier: SourceTier,
}

impl SourceMatch {
    pub fn none() -> Self { Self { name: None, tier: SourceTier::None } }

    /// A `SourceTier::None` tier collapses to [`SourceMatch::none`].
    pub fn found(name: impl Into<String>, tier: SourceTier) -> Self {
        if tier == SourceTier::None { return Self::none(); }
        Self { name: Some(name.into()), tier }
    }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn tier(&self) -> SourceTier { self.tier }
    pub fn is_none(&self) -> bool { self.tier == SourceTier::None }
}

/// Classifier probability that the document is REAL, always inside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ClassifierScore(f64);

impl ClassifierScore {
    pub fn new(p: f64) -> Option<Self> {
        (p.is_finite() && (0.0..=1.0).contains(&p)).then_some(Self(p))
    }

    pub fn value(self) -> f64 { self.0 }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckVerdict { pub rating: String, pub publisher: String, pub url: String }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision { Real, Fake, Rumor }

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Real => "REAL",
            Decision::Fake => "FAKE",
            Decision::Rumor => "RUMOR",
        })
    }
}

/// The decision-table row that produced a [`Decision`], in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule { TrustedSourceOverride, RealBand, RumorBand, FakeBand }

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rule::TrustedSourceOverride => "trusted source with low score, held as rumor",
            Rule::RealBand => "real band",
            Rule::RumorBand => "rumor band",
            Rule::FakeBand => "fake band",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub decision: Decision,
    pub rule: Rule,
    /// Label the band suggested before any fact-check override.
    pub tentative: Decision,
    pub fact_check_queried: bool,
    pub verdict: Option<FactCheckVerdict>,
}

impl Evaluation {
    pub fn overridden(&self) -> bool { self.decision != self.tentative }
}
