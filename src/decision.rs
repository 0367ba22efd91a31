// src/decision.rs
//! Fuses the classifier score, the trusted-source tier and (for some bands)
//! a fact-check verdict into one REAL / FAKE / RUMOR label.
//!
//! The policy is an ordered table of [`Rule`]s; the first rule whose guard
//! holds decides. Fact-check lookups are best-effort: a failed or timed-out
//! lookup is the same as finding nothing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::factcheck::{top_verdict, FactChecker};
use crate::normalize::char_prefix;
use crate::types::{ClassifierScore, Decision, Evaluation, FactCheckVerdict, Rule, SourceMatch, SourceTier};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds { pub low: f64, pub mid: f64, pub high: f64 }

impl Default for Thresholds {
    fn default() -> Self { Self { low: 0.45, mid: 0.65, high: 0.90 } }
}

impl Thresholds {
    pub fn validate(self) -> Result<Self, ConfigError> {
        let ordered = 0.0 <= self.low && self.low <= self.mid && self.mid <= self.high && self.high <= 1.0;
        if ordered { Ok(self) } else {
            Err(ConfigError::Thresholds { low: self.low, mid: self.mid, high: self.high })
        }
    }
}

/// Which way a fact-check rating points. Negative markers are checked first,
/// so "True? No, false" counts as negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingPolarity { Negative, Positive, Unclear }

const NEGATIVE_MARKERS: &[&str] = &["false", "pants"];
const POSITIVE_MARKERS: &[&str] = &["true", "mixture", "mostly true"];

impl RatingPolarity {
    pub fn of(rating: &str) -> Self {
        let r = rating.to_lowercase();
        if NEGATIVE_MARKERS.iter().any(|m| r.contains(m)) {
            RatingPolarity::Negative
        } else if POSITIVE_MARKERS.iter().any(|m| r.contains(m)) {
            RatingPolarity::Positive
        } else {
            RatingPolarity::Unclear
        }
    }
}

/// Priority order of the decision table.
pub const RULES: [Rule; 4] = [Rule::TrustedSourceOverride, Rule::RealBand, Rule::RumorBand, Rule::FakeBand];

pub struct DecisionEngine {
    thresholds: Thresholds,
    claim_chars: usize,
    lookup_timeout: Duration,
}

impl DecisionEngine {
    pub fn new(thresholds: Thresholds, claim_chars: usize, lookup_timeout: Duration) -> Self {
        Self { thresholds, claim_chars, lookup_timeout }
    }

    pub fn thresholds(&self) -> Thresholds { self.thresholds }

    /// Guard of one table row.
    pub fn applies(&self, rule: Rule, score: ClassifierScore, tier: SourceTier) -> bool {
        let (s, t) = (score.value(), self.thresholds);
        match rule {
            Rule::TrustedSourceOverride => tier.is_trusted() && s < t.mid,
            Rule::RealBand => s >= t.mid,
            Rule::RumorBand => t.low <= s && s < t.mid,
            Rule::FakeBand => s < t.low,
        }
    }

    pub fn select_rule(&self, score: ClassifierScore, tier: SourceTier) -> Rule {
        RULES.iter().copied().find(|r| self.applies(*r, score, tier)).unwrap_or(Rule::FakeBand)
    }

    /// `normalized` is the normalized article text; its first `claim_chars`
    /// characters become the fact-check query.
    pub async fn evaluate(&self, score: ClassifierScore, source: &SourceMatch, normalized: &str, checker: &dyn FactChecker) -> Evaluation {
        let rule = self.select_rule(score, source.tier());
        tracing::debug!(score = score.value(), tier = %source.tier(), ?rule, "decision rule selected");

        let eval = match rule {
            Rule::TrustedSourceOverride => settled(rule, Decision::Rumor),
            Rule::RumorBand => settled(rule, Decision::Rumor),
            Rule::RealBand if score.value() >= self.thresholds.high => settled(rule, Decision::Real),
            Rule::RealBand => {
                let verdict = self.lookup(normalized, checker).await;
                let contradicted = verdict.as_ref().is_some_and(|v| RatingPolarity::of(&v.rating) == RatingPolarity::Negative);
                checked(rule, Decision::Real, if contradicted { Decision::Fake } else { Decision::Real }, verdict)
            }
            Rule::FakeBand => {
                let verdict = self.lookup(normalized, checker).await;
                let contradicted = verdict.as_ref().is_some_and(|v| RatingPolarity::of(&v.rating) == RatingPolarity::Positive);
                checked(rule, Decision::Fake, if contradicted { Decision::Real } else { Decision::Fake }, verdict)
            }
        };
        if eval.overridden() {
            tracing::info!(from = %eval.tentative, to = %eval.decision, "fact-check overrode the model");
        }
        eval
    }

    pub async fn decide(&self, score: ClassifierScore, source: &SourceMatch, normalized: &str, checker: &dyn FactChecker) -> Decision {
        self.evaluate(score, source, normalized, checker).await.decision
    }

    async fn lookup(&self, normalized: &str, checker: &dyn FactChecker) -> Option<FactCheckVerdict> {
        let claim = char_prefix(normalized, self.claim_chars);
        match tokio::time::timeout(self.lookup_timeout, checker.query(claim)).await {
            Ok(Ok(claims)) => top_verdict(&claims),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "fact-check lookup failed, continuing without a verdict");
                None
            }
            Err(_) => {
                tracing::warn!(timeout_ms = self.lookup_timeout.as_millis() as u64, "fact-check lookup timed out");
                None
            }
        }
    }
}

impl Default for DecisionEngine {
    fn default() -> Self { Self::new(Thresholds::default(), 300, Duration::from_secs(10)) }
}

fn settled(rule: Rule, decision: Decision) -> Evaluation {
    Evaluation { decision, rule, tentative: decision, fact_check_queried: false, verdict: None }
}

fn checked(rule: Rule, tentative: Decision, decision: Decision, verdict: Option<FactCheckVerdict>) -> Evaluation {
    Evaluation { decision, rule, tentative, fact_check_queried: true, verdict }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FactCheckError;
    use crate::factcheck::{Claim, ClaimReview, Publisher};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeChecker {
        rating: Option<&'static str>,
        calls: AtomicUsize,
        last_claim: Mutex<Option<String>>,
    }

    impl FakeChecker {
        fn rating(r: &'static str) -> Self { Self { rating: Some(r), calls: AtomicUsize::new(0), last_claim: Mutex::new(None) } }
        fn empty() -> Self { Self { rating: None, calls: AtomicUsize::new(0), last_claim: Mutex::new(None) } }
        fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
    }

    #[async_trait::async_trait]
    impl FactChecker for FakeChecker {
        async fn query(&self, claim: &str) -> Result<Vec<Claim>, FactCheckError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_claim.lock().unwrap() = Some(claim.to_string());
            Ok(self.rating.into_iter().map(|r| Claim {
                claim_review: vec![ClaimReview {
                    publisher: Publisher { name: "PolitiFact".into(), site: None },
                    url: "https://example.org/check".into(),
                    title: None,
                    textual_rating: r.into(),
                }],
                ..Claim::default()
            }).collect())
        }
    }

    struct FailingChecker;
    #[async_trait::async_trait]
    impl FactChecker for FailingChecker {
        async fn query(&self, _claim: &str) -> Result<Vec<Claim>, FactCheckError> {
            Err(FactCheckError::Api { status: 503, message: "unavailable".into() })
        }
    }

    struct SlowChecker;
    #[async_trait::async_trait]
    impl FactChecker for SlowChecker {
        async fn query(&self, _claim: &str) -> Result<Vec<Claim>, FactCheckError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![])
        }
    }

    fn score(p: f64) -> ClassifierScore { ClassifierScore::new(p).unwrap() }
    fn strong() -> SourceMatch { SourceMatch::found("Reuters", SourceTier::Strong) }
    fn weak() -> SourceMatch { SourceMatch::found("Cnn", SourceTier::Weak) }

    const TEXT: &str = "officials confirmed the bridge will reopen next week";

    async fn run(p: f64, src: SourceMatch, fc: &dyn FactChecker) -> Evaluation {
        DecisionEngine::default().evaluate(score(p), &src, TEXT, fc).await
    }

    #[tokio::test]
    async fn trusted_source_overrides_before_bands() {
        let fc = FakeChecker::rating("Mostly True");
        let e = run(0.40, strong(), &fc).await;
        assert_eq!(e.decision, Decision::Rumor);
        assert_eq!(e.rule, Rule::TrustedSourceOverride);
        assert_eq!(fc.calls(), 0);
    }

    #[tokio::test]
    async fn manual_and_medium_are_trusted_weak_is_not() {
        let fc = FakeChecker::empty();
        for tier in [SourceTier::Medium, SourceTier::Manual] {
            let e = run(0.3, SourceMatch::found("Bbc", tier), &fc).await;
            assert_eq!(e.decision, Decision::Rumor);
        }
        let e = run(0.3, weak(), &fc).await;
        assert_eq!(e.decision, Decision::Fake);
        assert_eq!(e.rule, Rule::FakeBand);
    }

    #[tokio::test]
    async fn trusted_source_with_high_score_uses_bands() {
        let fc = FakeChecker::empty();
        let e = run(0.7, strong(), &fc).await;
        assert_eq!(e.decision, Decision::Real);
        assert_eq!(e.rule, Rule::RealBand);
    }

    #[tokio::test]
    async fn band_boundaries() {
        let fc = FakeChecker::empty();
        assert_eq!(run(0.65, SourceMatch::none(), &fc).await.decision, Decision::Real);
        assert_eq!(run(0.6499, SourceMatch::none(), &fc).await.decision, Decision::Rumor);
        assert_eq!(run(0.45, SourceMatch::none(), &fc).await.decision, Decision::Rumor);
        assert_eq!(run(0.4499, SourceMatch::none(), &fc).await.decision, Decision::Fake);
    }

    #[tokio::test]
    async fn confident_real_skips_fact_check() {
        let fc = FakeChecker::rating("Pants on Fire");
        let e = run(0.95, SourceMatch::none(), &fc).await;
        assert_eq!(e.decision, Decision::Real);
        assert!(!e.fact_check_queried);
        assert_eq!(fc.calls(), 0);
    }

    #[tokio::test]
    async fn rumor_band_never_queries() {
        let fc = FakeChecker::rating("False");
        let e = run(0.5, SourceMatch::none(), &fc).await;
        assert_eq!(e.decision, Decision::Rumor);
        assert_eq!(fc.calls(), 0);
    }

    #[tokio::test]
    async fn real_band_contradicted() {
        let fc = FakeChecker::rating("Pants on Fire");
        let e = run(0.7, SourceMatch::none(), &fc).await;
        assert_eq!(e.decision, Decision::Fake);
        assert_eq!(e.tentative, Decision::Real);
        assert_eq!(e.verdict.as_ref().unwrap().publisher, "PolitiFact");
        assert_eq!(fc.calls(), 1);
    }

    #[tokio::test]
    async fn real_band_confirmed_or_unchecked() {
        assert_eq!(run(0.7, SourceMatch::none(), &FakeChecker::rating("True")).await.decision, Decision::Real);
        assert_eq!(run(0.7, SourceMatch::none(), &FakeChecker::empty()).await.decision, Decision::Real);
    }

    #[tokio::test]
    async fn fake_band_contradicted() {
        let fc = FakeChecker::rating("Mostly True");
        let e = run(0.2, SourceMatch::none(), &fc).await;
        assert_eq!(e.decision, Decision::Real);
        assert!(e.overridden());
        assert_eq!(run(0.2, SourceMatch::none(), &FakeChecker::rating("Mixture")).await.decision, Decision::Real);
    }

    #[tokio::test]
    async fn fake_band_confirmed_or_unchecked() {
        assert_eq!(run(0.2, SourceMatch::none(), &FakeChecker::rating("False")).await.decision, Decision::Fake);
        assert_eq!(run(0.2, SourceMatch::none(), &FakeChecker::empty()).await.decision, Decision::Fake);
    }

    #[tokio::test]
    async fn ambiguous_rating_reads_as_negative() {
        assert_eq!(RatingPolarity::of("Half true, half FALSE"), RatingPolarity::Negative);
        let e = run(0.2, SourceMatch::none(), &FakeChecker::rating("Half true, half false")).await;
        assert_eq!(e.decision, Decision::Fake);
        assert_eq!(RatingPolarity::of("Misleading"), RatingPolarity::Unclear);
    }

    #[tokio::test]
    async fn failing_fact_check_is_absorbed() {
        let e = run(0.2, SourceMatch::none(), &FailingChecker).await;
        assert_eq!(e.decision, Decision::Fake);
        assert!(e.fact_check_queried && e.verdict.is_none());
        assert_eq!(run(0.8, SourceMatch::none(), &FailingChecker).await.decision, Decision::Real);
    }

    #[tokio::test]
    async fn slow_fact_check_times_out() {
        let engine = DecisionEngine::new(Thresholds::default(), 300, Duration::from_millis(50));
        let d = engine.decide(score(0.7), &SourceMatch::none(), TEXT, &SlowChecker).await;
        assert_eq!(d, Decision::Real);
    }

    #[tokio::test]
    async fn claim_is_truncated() {
        let long = "word ".repeat(200);
        let fc = FakeChecker::empty();
        DecisionEngine::default().decide(score(0.1), &SourceMatch::none(), &long, &fc).await;
        assert_eq!(fc.last_claim.lock().unwrap().as_ref().unwrap().chars().count(), 300);
    }

    #[test]
    fn thresholds_must_be_ordered() {
        assert!(Thresholds::default().validate().is_ok());
        assert!(Thresholds { low: 0.7, mid: 0.6, high: 0.9 }.validate().is_err());
        assert!(Thresholds { low: 0.1, mid: 0.6, high: 1.5 }.validate().is_err());
    }

    #[test]
    fn alternate_thresholds_move_the_bands() {
        let engine = DecisionEngine::new(Thresholds { low: 0.2, mid: 0.5, high: 0.8 }, 300, Duration::from_secs(1));
        assert_eq!(engine.select_rule(score(0.55), SourceTier::None), Rule::RealBand);
        assert_eq!(engine.select_rule(score(0.3), SourceTier::None), Rule::RumorBand);
        assert_eq!(engine.select_rule(score(0.3), SourceTier::Strong), Rule::TrustedSourceOverride);
    }

    proptest! {
        #[test]
        fn exactly_one_rule_fires_first(p in 0.0f64..=1.0, tier_ix in 0usize..5) {
            let tiers = [SourceTier::Strong, SourceTier::Medium, SourceTier::Weak, SourceTier::Manual, SourceTier::None];
            let engine = DecisionEngine::default();
            let s = score(p);
            let firing: Vec<_> = RULES.iter().filter(|r| engine.applies(**r, s, tiers[tier_ix])).collect();
            prop_assert!(!firing.is_empty());
            prop_assert_eq!(*firing[0], engine.select_rule(s, tiers[tier_ix]));
        }

        #[test]
        fn decide_is_total(p in 0.0f64..=1.0, fails in any::<bool>()) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let fc: Box<dyn FactChecker> = if fails { Box::new(FailingChecker) } else { Box::new(FakeChecker::rating("Mostly True")) };
            let d = rt.block_on(DecisionEngine::default().decide(score(p), &SourceMatch::none(), TEXT, fc.as_ref()));
            prop_assert!(matches!(d, Decision::Real | Decision::Fake | Decision::Rumor));
        }
    }
}
