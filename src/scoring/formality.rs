//! Heuristic formality score in `[0, 100]`.
//!
//! Five sub-signals, each a ratio in `[0, 1]`, are weighted and summed:
//!
//! | signal                    | direction  | default weight |
//! |---------------------------|------------|----------------|
//! | average sentence length/20| as is      | 0.4            |
//! | contraction ratio         | inverted   | 0.2            |
//! | symbol and emoji ratio    | inverted   | 0.1            |
//! | all-caps word ratio       | inverted   | 0.1            |
//! | stop-word ratio           | as is      | 0.2            |
//!
//! Words are word tokens plus every punctuation or symbol character, and
//! sentences follow Unicode sentence boundaries.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::{RegexTokenizer, Tokenizer, is_english_stop_word};

static CONTRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]+['’][A-Za-z]+\b").expect("valid contraction regex"));

static SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s,]").expect("valid symbol regex"));

/// Named weights of the formality formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormalityWeights {
    /// Weight of the normalised average sentence length.
    pub sentence_length: f64,
    /// Sentence length, in words, that counts as fully formal.
    pub sentence_length_norm: f64,
    /// Weight of the inverted contraction ratio.
    pub contractions: f64,
    /// Weight of the inverted symbol and emoji ratio.
    pub symbols: f64,
    /// Weight of the inverted all-caps word ratio.
    pub shouting: f64,
    /// Weight of the stop-word ratio.
    pub stop_words: f64,
}

impl Default for FormalityWeights {
    fn default() -> Self {
        FormalityWeights {
            sentence_length: 0.4,
            sentence_length_norm: 20.0,
            contractions: 0.2,
            symbols: 0.1,
            shouting: 0.1,
            stop_words: 0.2,
        }
    }
}

/// The sub-signals behind a formality score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormalityBreakdown {
    pub sentences: usize,
    pub words: usize,
    pub average_sentence_length: f64,
    pub contraction_ratio: f64,
    pub symbol_ratio: f64,
    pub shouting_ratio: f64,
    pub stop_word_ratio: f64,
    /// Final score, rounded to two decimals.
    pub score: f64,
}

/// Computes [`FormalityBreakdown`]s with a fixed set of weights.
#[derive(Debug, Clone)]
pub struct FormalityScorer {
    weights: FormalityWeights,
    tokenizer: RegexTokenizer,
}

impl FormalityScorer {
    pub fn new(weights: FormalityWeights) -> Self {
        FormalityScorer {
            weights,
            tokenizer: RegexTokenizer::prose().expect("prose pattern should be valid"),
        }
    }

    /// Formality score of `text`, in `[0, 100]` with two decimals.
    pub fn score(&self, text: &str) -> f64 {
        self.breakdown(text).score
    }

    /// Score `text` and return every sub-signal.
    ///
    /// Text with no sentence or no word scores 0.
    pub fn breakdown(&self, text: &str) -> FormalityBreakdown {
        let words = self.words(text);
        let sentence_lengths: Vec<usize> = text
            .split_sentence_bounds()
            .filter(|sentence| !sentence.trim().is_empty())
            .map(|sentence| self.words(sentence).len())
            .collect();

        if words.is_empty() || sentence_lengths.is_empty() {
            return FormalityBreakdown::default();
        }

        let n_words = words.len() as f64;
        let average_sentence_length =
            sentence_lengths.iter().sum::<usize>() as f64 / sentence_lengths.len() as f64;

        let contraction_ratio = CONTRACTION.find_iter(text).count() as f64 / n_words;
        let symbol_ratio = SYMBOL.find_iter(text).count() as f64 / n_words;
        let shouting_ratio = words.iter().filter(|word| is_shouting(word)).count() as f64 / n_words;
        let stop_word_ratio = words
            .iter()
            .filter(|word| is_english_stop_word(&word.to_lowercase()))
            .count() as f64
            / n_words;

        let w = &self.weights;
        let raw = unit(average_sentence_length / w.sentence_length_norm) * w.sentence_length
            + (1.0 - unit(contraction_ratio)) * w.contractions
            + (1.0 - unit(symbol_ratio)) * w.symbols
            + (1.0 - unit(shouting_ratio)) * w.shouting
            + unit(stop_word_ratio) * w.stop_words;
        let score = ((raw * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0;

        FormalityBreakdown {
            sentences: sentence_lengths.len(),
            words: words.len(),
            average_sentence_length,
            contraction_ratio,
            symbol_ratio,
            shouting_ratio,
            stop_word_ratio,
            score,
        }
    }

    pub fn weights(&self) -> &FormalityWeights {
        &self.weights
    }

    fn words(&self, text: &str) -> Vec<String> {
        match self.tokenizer.tokenize(text) {
            Ok(tokens) => tokens.map(|token| token.text).collect(),
            Err(e) => {
                log::warn!("Formality tokenization failed: {e}");
                Vec::new()
            }
        }
    }
}

impl Default for FormalityScorer {
    fn default() -> Self {
        Self::new(FormalityWeights::default())
    }
}

/// A word of at least two letters, all of them upper-case. The pronoun
/// "I" does not count.
fn is_shouting(word: &str) -> bool {
    let mut letters = 0;
    for c in word.chars().filter(|c| c.is_alphabetic()) {
        if c.is_lowercase() {
            return false;
        }
        letters += 1;
    }
    letters >= 2
}

fn unit(ratio: f64) -> f64 {
    ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAL: &str = "Dear Sir, I hope this message finds you well. I would like to schedule a meeting at your convenience.";
    const INFORMAL: &str = "omg i cant believe this happened!!! 😡😡";

    #[test]
    fn test_formal_email() {
        let breakdown = FormalityScorer::default().breakdown(FORMAL);

        assert_eq!(breakdown.sentences, 2);
        assert_eq!(breakdown.words, 22);
        assert_eq!(breakdown.average_sentence_length, 11.0);
        assert_eq!(breakdown.contraction_ratio, 0.0);
        assert_eq!(breakdown.shouting_ratio, 0.0);
        assert!((breakdown.stop_word_ratio - 10.0 / 22.0).abs() < 1e-12);
        assert_eq!(breakdown.score, 70.18);
    }

    #[test]
    fn test_informal_message() {
        let breakdown = FormalityScorer::default().breakdown(INFORMAL);

        assert_eq!(breakdown.sentences, 2);
        assert_eq!(breakdown.words, 11);
        assert!((breakdown.symbol_ratio - 5.0 / 11.0).abs() < 1e-12);
        assert!(breakdown.score < 60.0);
        assert_eq!(breakdown.score, 51.91);
    }

    #[test]
    fn test_contractions_and_shouting_lower_the_score() {
        let scorer = FormalityScorer::default();
        let calm = scorer.breakdown("We would appreciate a reply");
        let loud = scorer.breakdown("We'd REALLY appreciate a reply");

        assert!(loud.contraction_ratio > 0.0);
        assert!(loud.shouting_ratio > 0.0);
        assert!(loud.score < calm.score);
    }

    #[test]
    fn test_degenerate_text_scores_zero() {
        let scorer = FormalityScorer::default();
        assert_eq!(scorer.score(""), 0.0);
        assert_eq!(scorer.score("   \n\t "), 0.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let scorer = FormalityScorer::default();
        let long = "the ".repeat(500);
        for text in [long.as_str(), "!!!!!!!!", "WHY", "a", "😡", FORMAL, INFORMAL] {
            let score = scorer.score(text);
            assert!((0.0..=100.0).contains(&score), "{text}: {score}");
            assert_eq!(score, scorer.score(text));
        }
    }

    #[test]
    fn test_is_shouting() {
        assert!(is_shouting("URGENT"));
        assert!(is_shouting("OK"));
        assert!(!is_shouting("I"));
        assert!(!is_shouting("Hello"));
        assert!(!is_shouting("!"));
    }
}
