// src/factcheck.rs
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::FactCheckError;
use crate::types::FactCheckVerdict;

pub const GOOGLE_CLAIM_SEARCH: &str = "https://factchecktools.googleapis.com/v1alpha1/claims:search";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    #[serde(default)] pub name: String,
    #[serde(default)] pub site: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReview {
    #[serde(default)] pub publisher: Publisher,
    #[serde(default)] pub url: String,
    #[serde(default)] pub title: Option<String>,
    #[serde(default)] pub textual_rating: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(default)] pub text: Option<String>,
    #[serde(default)] pub claimant: Option<String>,
    #[serde(default)] pub claim_review: Vec<ClaimReview>,
}

impl Claim {
    pub fn first_verdict(&self) -> Option<FactCheckVerdict> {
        self.claim_review.first().map(|r| FactCheckVerdict {
            rating: r.textual_rating.clone(),
            publisher: r.publisher.name.clone(),
            url: r.url.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ClaimSearchResp {
    #[serde(default)]
    claims: Vec<Claim>,
}

/// Only the first review of the first claim is ever consulted.
pub fn top_verdict(claims: &[Claim]) -> Option<FactCheckVerdict> {
    claims.first().and_then(Claim::first_verdict)
}

#[async_trait::async_trait]
pub trait FactChecker: Send + Sync {
    async fn query(&self, claim: &str) -> Result<Vec<Claim>, FactCheckError>;
}

/// Stand-in used when no API key is configured: every lookup finds nothing.
pub struct NoFactCheck;

#[async_trait::async_trait]
impl FactChecker for NoFactCheck {
    async fn query(&self, _claim: &str) -> Result<Vec<Claim>, FactCheckError> {
        tracing::debug!("fact-check disabled, no api key configured");
        Ok(Vec::new())
    }
}

pub struct GoogleFactCheck {
    http: Client,
    key: String,
    endpoint: String,
    language: Option<String>,
    limiter: DefaultDirectRateLimiter,
}

impl GoogleFactCheck {
    pub fn new(key: String, endpoint: String, language: Option<String>, qps: u32, timeout_ms: u64) -> Result<Self, FactCheckError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(FactCheckError::Client)?;
        let qps = NonZeroU32::new(qps).ok_or(FactCheckError::RateLimit(qps))?;
        let limiter = RateLimiter::direct(Quota::per_second(qps));
        Ok(Self { http, key, endpoint, language, limiter })
    }
}

#[async_trait::async_trait]
impl FactChecker for GoogleFactCheck {
    async fn query(&self, claim: &str) -> Result<Vec<Claim>, FactCheckError> {
        self.limiter.until_ready().await;
        let mut params = vec![("query", claim), ("key", self.key.as_str())];
        if let Some(lang) = &self.language { params.push(("languageCode", lang.as_str())); }

        let resp = self.http.get(&self.endpoint).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FactCheckError::Api { status: status.as_u16(), message });
        }
        let body = resp.json::<ClaimSearchResp>().await?;
        tracing::debug!(claims = body.claims.len(), "fact-check search returned");
        Ok(body.claims)
    }
}
