#![allow(dead_code)]
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use veracity_rs::classifier::Classifier;
use veracity_rs::error::FactCheckError;
use veracity_rs::factcheck::{Claim, ClaimReview, FactChecker, Publisher};

pub struct FakeClassifier {
  // maps normalized text to a probability
  pub handler: Box<dyn Fn(&str) -> f64 + Send + Sync>,
}

impl Classifier for FakeClassifier {
  fn predict_real_probability(&self, text: &str) -> f64 { (self.handler)(text) }
}

pub fn fixed(p: f64) -> FakeClassifier { FakeClassifier { handler: Box::new(move |_: &str| p) } }

pub struct FakeChecker {
  pub ratings: Vec<&'static str>,
  pub fail: bool,
  pub delay_ms: u64,
  pub calls: AtomicUsize,
}

impl FakeChecker {
  pub fn rating(r: &'static str) -> Self { Self { ratings: vec![r], fail: false, delay_ms: 0, calls: AtomicUsize::new(0) } }
  pub fn empty() -> Self { Self { ratings: vec![], fail: false, delay_ms: 0, calls: AtomicUsize::new(0) } }
  pub fn failing() -> Self { Self { ratings: vec![], fail: true, delay_ms: 0, calls: AtomicUsize::new(0) } }
  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl FactChecker for FakeChecker {
  async fn query(&self, _claim: &str) -> Result<Vec<Claim>, FactCheckError> {
    use tokio::time::{sleep, Duration};
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.delay_ms > 0 { sleep(Duration::from_millis(self.delay_ms)).await; }
    if self.fail { return Err(FactCheckError::Api { status: 500, message: "boom".into() }); }
    // one claim per rating, each with a single review
    Ok(self.ratings.iter().map(|r| Claim {
      claim_review: vec![ClaimReview {
        publisher: Publisher { name: format!("{r} checker"), site: None },
        url: "https://factcheck.example/1".into(),
        title: None,
        textual_rating: r.to_string(),
      }],
      ..Claim::default()
    }).collect())
  }
}

/// `FactChecker` is implemented for the shared reference so tests can keep
/// inspecting call counts after handing the checker to an `Analyzer`.
pub struct Shared(pub std::sync::Arc<FakeChecker>);

#[async_trait]
impl FactChecker for Shared {
  async fn query(&self, claim: &str) -> Result<Vec<Claim>, FactCheckError> { self.0.query(claim).await }
}
