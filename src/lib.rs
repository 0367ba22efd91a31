pub mod classifier;
pub mod config;
pub mod decision;
pub mod document;
pub mod error;
pub mod factcheck;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod types;

pub use decision::{DecisionEngine, Thresholds};
pub use pipeline::Analyzer;
pub use report::Report;
pub use types::{ClassifierScore, Decision, FactCheckVerdict, SourceMatch, SourceTier};
