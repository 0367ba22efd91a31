use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactCheckError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("fact-check request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("fact-check service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid rate limit: {0} requests/s")]
    RateLimit(u32),
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("cannot read model artifact {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("inconsistent model artifact: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("{} is not valid UTF-8 text", path.display())]
    Encoding { path: PathBuf },
    #[error("{} is not a readable .docx archive: {source}", path.display())]
    Archive { path: PathBuf, #[source] source: zip::result::ZipError },
    #[error("{} has malformed document XML: {source}", path.display())]
    Markup { path: PathBuf, #[source] source: quick_xml::Error },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("thresholds must satisfy 0 <= low <= mid <= high <= 1 (got {low}, {mid}, {high})")]
    Thresholds { low: f64, mid: f64, high: f64 },
    #[error("invalid known-source pattern: {0}")]
    Sources(#[from] regex::Error),
}
