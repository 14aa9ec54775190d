//! Analyzers built from a tokenizer and a chain of filters.

use std::fmt;
use std::sync::Arc;

use crate::analysis::filter::{LowercaseFilter, StopFilter};
use crate::analysis::token::TokenStream;
use crate::analysis::tokenizer::RegexTokenizer;
use crate::analysis::{Analyzer, Filter, Tokenizer};
use crate::error::Result;

/// A tokenizer followed by filters applied in insertion order.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    pub fn new(tokenizer: impl Tokenizer + 'static) -> Self {
        PipelineAnalyzer {
            tokenizer: Arc::new(tokenizer),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Names of the stages, tokenizer first.
    pub fn stages(&self) -> Vec<&'static str> {
        std::iter::once(self.tokenizer.name())
            .chain(self.filters.iter().map(|filter| filter.name()))
            .collect()
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens = self.tokenizer.tokenize(text)?;
        self.filters
            .iter()
            .try_fold(tokens, |tokens, filter| filter.filter(tokens))
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PipelineAnalyzer")
            .field(&self.stages().join(" > "))
            .finish()
    }
}

/// Vectorizer terms: two or more word characters, lower-cased, with
/// English stop words removed unless kept explicitly.
#[derive(Clone, Debug)]
pub struct EnglishAnalyzer {
    pipeline: PipelineAnalyzer,
}

impl EnglishAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(EnglishAnalyzer {
            pipeline: Self::base()?.filter(StopFilter::english()),
        })
    }

    /// Same terms with stop words left in.
    pub fn keeping_stop_words() -> Result<Self> {
        Ok(EnglishAnalyzer {
            pipeline: Self::base()?,
        })
    }

    fn base() -> Result<PipelineAnalyzer> {
        Ok(PipelineAnalyzer::new(RegexTokenizer::terms()?).filter(LowercaseFilter))
    }
}

impl Default for EnglishAnalyzer {
    fn default() -> Self {
        Self::new().expect("term pattern should be valid")
    }
}

impl Analyzer for EnglishAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.pipeline.analyze(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::filter::StopAction;

    #[test]
    fn test_english_terms() {
        let analyzer = EnglishAnalyzer::new().unwrap();
        assert_eq!(
            analyzer.terms("I would LOVE a Meeting with the team").unwrap(),
            vec!["love", "meeting", "team"]
        );
    }

    #[test]
    fn test_keeping_stop_words() {
        let analyzer = EnglishAnalyzer::keeping_stop_words().unwrap();
        assert_eq!(analyzer.terms("With the team").unwrap(), vec!["with", "the", "team"]);
    }

    #[test]
    fn test_filters_run_in_order() {
        // stop matching is exact, so it misses upper-case words before lowercasing
        let stop_first = PipelineAnalyzer::new(RegexTokenizer::terms().unwrap())
            .filter(StopFilter::english())
            .filter(LowercaseFilter);
        assert_eq!(stop_first.terms("THE plan").unwrap(), vec!["the", "plan"]);
        assert_eq!(stop_first.stages(), vec!["regex", "stop", "lowercase"]);
    }

    #[test]
    fn test_marked_tokens_are_excluded_from_terms() {
        let pipeline = PipelineAnalyzer::new(RegexTokenizer::terms().unwrap())
            .filter(LowercaseFilter)
            .filter(StopFilter::english().action(StopAction::Mark));

        assert_eq!(pipeline.analyze("see the plan").unwrap().count(), 3);
        assert_eq!(pipeline.terms("see the plan").unwrap(), vec!["plan"]);
        assert_eq!(format!("{pipeline:?}"), "PipelineAnalyzer(\"regex > lowercase > stop\")");
    }
}
