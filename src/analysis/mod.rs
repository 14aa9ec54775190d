//! Text analysis shared by the TF-IDF vectorizer and the heuristic scorers.
//!
//! A [`Tokenizer`] cuts text into [`Token`]s, each [`Filter`] rewrites the
//! lazy stream, and an [`Analyzer`] bundles both so callers only see terms:
//!
//! ```
//! use tonescope::analysis::{Analyzer, EnglishAnalyzer};
//!
//! # fn main() -> tonescope::error::Result<()> {
//! let analyzer = EnglishAnalyzer::new()?;
//! assert_eq!(analyzer.terms("Thanks for the UPDATE!")?, vec!["thanks", "update"]);
//! # Ok(())
//! # }
//! ```

pub mod filter;
pub mod pipeline;
pub mod token;
pub mod tokenizer;

pub use filter::{LowercaseFilter, StopFilter, is_english_stop_word};
pub use pipeline::{EnglishAnalyzer, PipelineAnalyzer};
pub use token::{Token, TokenStream};
pub use tokenizer::RegexTokenizer;

use crate::error::Result;

/// Splits raw text into tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    fn name(&self) -> &'static str;
}

/// Rewrites a token stream. Implementations should stay lazy and leave
/// tokens already marked as stopped untouched.
pub trait Filter: Send + Sync {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    fn name(&self) -> &'static str;
}

/// Turns text into the terms a model or scorer consumes.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Texts of the tokens that survived analysis, stopped ones excluded.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .analyze(text)?
            .filter(|token| !token.is_stopped())
            .map(|token| token.text)
            .collect())
    }
}
