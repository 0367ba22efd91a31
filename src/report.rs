use serde::Serialize;
use std::fmt;

use crate::types::{Evaluation, SourceMatch};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub probability: f64,
    pub source: SourceMatch,
    pub evaluation: Evaluation,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model confidence for REAL: {:.2}", self.probability)?;
        match self.source.name() {
            Some(name) => writeln!(f, "Detected source: {} (confidence: {})", name, self.source.tier())?,
            None => writeln!(f, "Detected source: none")?,
        }
        let ev = &self.evaluation;
        match (&ev.verdict, ev.fact_check_queried) {
            (Some(v), _) => {
                writeln!(f, "Fact check rating: {} (source: {})", v.rating, v.publisher)?;
                writeln!(f, "Fact check link: {}", v.url)?;
            }
            (None, true) => writeln!(f, "Fact check: no verdict found")?,
            (None, false) => writeln!(f, "Fact check: not consulted")?,
        }
        writeln!(f, "Rule: {}", ev.rule)?;
        if ev.overridden() {
            writeln!(f, "Model suggested {}, fact check overrode it", ev.tentative)?;
        }
        write!(f, "FINAL DECISION: this article is most likely {}", ev.decision)
    }
}
