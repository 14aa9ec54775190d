//! Deterministic heuristic scorers.
//!
//! Both scorers are pure functions of the input text and never fail:
//! degenerate input is guarded and yields a neutral value.

pub mod formality;
pub mod sentiment;

pub use formality::{FormalityBreakdown, FormalityScorer, FormalityWeights};
pub use sentiment::{SentimentAnalyzer, SentimentVector};
