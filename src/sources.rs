// src/sources.rs
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::types::{SourceMatch, SourceTier};

/// How much of the article counts as its "top" for the medium tier.
pub const TOP_CHUNK_CHARS: usize = 600;

const DEFAULT_SOURCES: &[&str] = &[
    "new york times", "nbc news", "cnn", "reuters", "associated press", "ap",
    "bbc", "washington post", "cbs news", "bloomberg", "npr", "guardian", "abc news", "politico",
];

/// Ordered, lowercase outlet names. Order decides which outlet wins when
/// several qualify for the same tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KnownSources(Vec<String>);

impl KnownSources {
    pub fn new<I, S>(names: I) -> Self
    where I: IntoIterator<Item = S>, S: AsRef<str> {
        let mut out: Vec<String> = Vec::new();
        for n in names {
            let n = n.as_ref().trim().to_lowercase();
            if !n.is_empty() && !out.contains(&n) { out.push(n); }
        }
        Self(out)
    }

    pub fn names(&self) -> &[String] { &self.0 }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.0.iter().any(|s| *s == name)
    }
}

impl Default for KnownSources {
    fn default() -> Self { Self::new(DEFAULT_SOURCES) }
}

impl From<Vec<String>> for KnownSources {
    fn from(v: Vec<String>) -> Self { Self::new(v) }
}

impl From<KnownSources> for Vec<String> {
    fn from(k: KnownSources) -> Self { k.0 }
}

struct SourcePatterns { name: String, mention: Regex, credit: Regex }

/// Scans raw article text for known outlets, strongest evidence first:
/// byline (`by <author>, <outlet>`), then top-of-article or photo-credit
/// mentions, then a bare mention anywhere.
///
/// Names match as plain substrings, so `cnn` is found in `CNNMoney` and `ap`
/// in `happen`. [`SourceDetector::whole_words`] only accepts a name that
/// stands as its own word.
pub struct SourceDetector {
    sources: KnownSources,
    byline: Option<Regex>,
    per_source: Vec<SourcePatterns>,
}

impl SourceDetector {
    pub fn new(sources: KnownSources) -> Result<Self, regex::Error> {
        Self::build(sources, false)
    }

    pub fn whole_words(sources: KnownSources) -> Result<Self, regex::Error> {
        Self::build(sources, true)
    }

    fn build(sources: KnownSources, whole_words: bool) -> Result<Self, regex::Error> {
        let pattern = |name: &str| if whole_words { bounded(name) } else { regex::escape(name) };
        let alternation = sources.names().iter().map(|s| pattern(s)).collect::<Vec<_>>().join("|");
        let byline = if sources.names().is_empty() {
            None
        } else {
            Some(ci(&format!(r"by\s+.+?,\s*({alternation})"))?)
        };
        let per_source = sources.names().iter().map(|name| {
            let name_re = pattern(name);
            Ok::<_, regex::Error>(SourcePatterns {
                name: name.clone(),
                mention: ci(&name_re)?,
                credit: ci(&format!(r"(credit|photo|image|source).{{0,50}}{name_re}"))?,
            })
        }).collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { sources, byline, per_source })
    }

    pub fn sources(&self) -> &KnownSources { &self.sources }

    pub fn detect(&self, raw: &str) -> SourceMatch {
        let lower = raw.to_lowercase();

        if let Some(caps) = self.byline.as_ref().and_then(|re| re.captures(&lower)) {
            let outlet = &caps[1];
            tracing::debug!(outlet, "byline attribution found");
            return SourceMatch::found(title_case(outlet), SourceTier::Strong);
        }

        let top = crate::normalize::char_prefix(&lower, TOP_CHUNK_CHARS);
        for p in &self.per_source {
            if p.mention.is_match(top) || p.credit.is_match(&lower) {
                tracing::debug!(outlet = %p.name, "outlet in article head or credit line");
                return SourceMatch::found(title_case(&p.name), SourceTier::Medium);
            }
        }

        for p in &self.per_source {
            if p.mention.is_match(&lower) {
                tracing::debug!(outlet = %p.name, "incidental outlet mention");
                return SourceMatch::found(title_case(&p.name), SourceTier::Weak);
            }
        }

        SourceMatch::none()
    }

    /// Operator-typed source name. Only an exact (case-insensitive) known
    /// outlet counts; anything else, including blank, is no source.
    pub fn manual(&self, input: &str) -> SourceMatch {
        let entry = input.trim().to_lowercase();
        if !entry.is_empty() && self.sources.contains(&entry) {
            SourceMatch::found(title_case(&entry), SourceTier::Manual)
        } else {
            SourceMatch::none()
        }
    }
}

/// Escaped name with `\b` on each end that is a word character. A `\b`
/// next to punctuation (`e!`) could never match.
fn bounded(name: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(name.chars().next()) { r"\b" } else { "" };
    let trail = if is_word(name.chars().last()) { r"\b" } else { "" };
    format!("{lead}(?:{}){trail}", regex::escape(name))
}

fn ci(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Uppercase the first letter of every alphabetic run: "new york times" -> "New York Times".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha { out.extend(c.to_lowercase()) } else { out.extend(c.to_uppercase()) }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
