//! Tokens and token streams.

use std::ops::Range;

/// A piece of analyzed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,

    /// Byte range of the token in the text it was cut from. Filters that
    /// rewrite `text` keep the original range.
    pub span: Range<usize>,

    stopped: bool,
}

/// Lazily produced tokens.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;

impl Token {
    pub fn new(text: impl Into<String>, span: Range<usize>) -> Self {
        Token {
            text: text.into(),
            span,
            stopped: false,
        }
    }

    /// Replace the text, keeping the span.
    pub fn map_text(self, f: impl FnOnce(&str) -> String) -> Self {
        Token {
            text: f(&self.text),
            ..self
        }
    }

    /// Mark the token as a stop word without dropping it from the stream.
    pub fn stop(self) -> Self {
        Token {
            stopped: true,
            ..self
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_text_keeps_span_and_mark() {
        let token = Token::new("Hello", 4..9).stop().map_text(str::to_lowercase);
        assert_eq!(token.text, "hello");
        assert_eq!(token.span, 4..9);
        assert!(token.is_stopped());
    }
}
