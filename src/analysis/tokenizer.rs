//! Regex tokenization.

use std::sync::Arc;

use regex::Regex;

use crate::analysis::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, ToneError};

/// Runs of two or more word characters. Single letters such as "a" or "I"
/// never become vectorizer terms.
pub const TERM_PATTERN: &str = r"\b\w\w+\b";

/// Apostrophe-joined words ("don't") stay whole; any other non-space
/// character (punctuation, symbols, emoji) is a token of its own.
pub const PROSE_PATTERN: &str = r"\w+(?:['’]\w+)*|[^\w\s]";

/// Emits every match of a pattern as a token.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    regex: Arc<Regex>,
}

impl RegexTokenizer {
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| ToneError::analysis(format!("invalid token pattern {pattern:?}: {e}")))?;
        Ok(RegexTokenizer {
            regex: Arc::new(regex),
        })
    }

    /// Tokenizer for vectorizer terms.
    pub fn terms() -> Result<Self> {
        Self::with_pattern(TERM_PATTERN)
    }

    /// Tokenizer for the formality scorer, which counts punctuation.
    pub fn prose() -> Result<Self> {
        Self::with_pattern(PROSE_PATTERN)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        // matches borrow `text`, so the stream owns its tokens up front
        let tokens: Vec<Token> = self
            .regex
            .find_iter(text)
            .map(|m| Token::new(m.as_str(), m.range()))
            .collect();
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
