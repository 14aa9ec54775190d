//! Lexicon and rule based sentiment scoring.
//!
//! Each token is looked up in an embedded valence lexicon and then adjusted
//! by its neighbours: intensifiers and dampeners within three words,
//! negations within three words, ALL-CAPS emphasis when the text mixes
//! case, and a contrastive "but" that halves what precedes it and boosts
//! what follows. Exclamation and question marks amplify the total. Emoji
//! are replaced by their names first, so "😡" scores like "enraged face".
//!
//! # Example
//!
//! ```
//! use tonescope::scoring::sentiment::SentimentAnalyzer;
//!
//! let scores = SentimentAnalyzer::new().polarity_scores("The launch was a great success!");
//! assert!(scores.compound > 0.5);
//! assert!((scores.negative + scores.neutral + scores.positive - 1.0).abs() < 1e-9);
//! ```

mod lexicon;

use serde::{Deserialize, Serialize};

use lexicon::{
    BOOSTER_WORDS, CAPS_INCREMENT, EMOJI_NAMES, LEXICON, NEGATION_SCALAR, is_negation,
};

/// Normalisation constant of the compound score.
const COMPOUND_ALPHA: f64 = 15.0;

/// Amplification per exclamation mark, counted up to four marks.
const EXCLAMATION_INCREMENT: f64 = 0.292;

/// Proportions of negative, neutral and positive content plus an overall
/// polarity.
///
/// `negative + neutral + positive == 1`; `compound` lies in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentVector {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

impl SentimentVector {
    /// Fully neutral vector, used for text without scorable tokens.
    pub fn neutral() -> Self {
        SentimentVector {
            negative: 0.0,
            neutral: 1.0,
            positive: 0.0,
            compound: 0.0,
        }
    }
}

impl Default for SentimentVector {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Scores text against the embedded lexicon.
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        SentimentAnalyzer
    }

    /// Compute the sentiment vector of `text`.
    pub fn polarity_scores(&self, text: &str) -> SentimentVector {
        let text = replace_emoji(text);
        let tokens = words_and_emoticons(&text);
        if tokens.is_empty() {
            return SentimentVector::neutral();
        }

        let lowered: Vec<String> = tokens.iter().map(|token| token.to_lowercase()).collect();
        let caps_differ = {
            let shouted = tokens.iter().filter(|token| is_upper(token)).count();
            shouted > 0 && shouted < tokens.len()
        };

        let mut sentiments = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            let word = lowered[i].as_str();
            let is_modifier = BOOSTER_WORDS.contains_key(word)
                || (word == "kind" && lowered.get(i + 1).is_some_and(|next| next == "of"));

            sentiments.push(if is_modifier {
                0.0
            } else {
                valence(&tokens, &lowered, i, caps_differ)
            });
        }

        but_check(&lowered, &mut sentiments);
        score_valence(&sentiments, &text)
    }
}

/// Replace every known emoji with its name, keeping words apart.
fn replace_emoji(text: &str) -> String {
    let mut replaced = String::with_capacity(text.len());
    let mut previous_space = true;
    let mut after_emoji = false;

    for c in text.chars() {
        if let Some(name) = EMOJI_NAMES.get(&c) {
            if !previous_space {
                replaced.push(' ');
            }
            replaced.push_str(name);
            previous_space = false;
            after_emoji = true;
        } else if c == '\u{fe0f}' {
            // variation selector trailing an emoji
            continue;
        } else {
            if after_emoji && !c.is_whitespace() {
                replaced.push(' ');
            }
            replaced.push(c);
            previous_space = c.is_whitespace();
            after_emoji = false;
        }
    }

    replaced
}

/// Whitespace tokens with surrounding punctuation stripped; single
/// characters are dropped. Tokens made only of punctuation, such as
/// emoticons, are kept as typed.
fn words_and_emoticons(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.is_empty() { token } else { stripped }
        })
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Has cased characters and none of them lower-case.
fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

fn valence(tokens: &[String], lowered: &[String], i: usize, caps_differ: bool) -> f64 {
    let word = lowered[i].as_str();
    let Some(&base) = LEXICON.get(word) else {
        return 0.0;
    };

    // "no" in front of a sentiment word acts as a negation, not a valence
    if word == "no" && lowered.get(i + 1).is_some_and(|next| LEXICON.contains_key(next.as_str()))
    {
        return 0.0;
    }

    let mut valence = base;
    if (i > 0 && lowered[i - 1] == "no") || (i > 1 && lowered[i - 2] == "no") {
        valence *= NEGATION_SCALAR;
    }

    if caps_differ && is_upper(&tokens[i]) {
        valence += CAPS_INCREMENT.copysign(valence);
    }

    for start in 0..3 {
        if i <= start {
            break;
        }
        let j = i - (start + 1);
        if LEXICON.contains_key(lowered[j].as_str()) {
            continue;
        }

        let mut scalar = modifier_scalar(&tokens[j], &lowered[j], valence, caps_differ);
        if start == 1 {
            scalar *= 0.95;
        } else if start == 2 {
            scalar *= 0.9;
        }
        valence += scalar;
        valence = negation_check(valence, lowered, start, i);
    }

    least_check(valence, lowered, i)
}

/// Intensity change contributed by a preceding booster or dampener.
fn modifier_scalar(token: &str, lowered: &str, valence: f64, caps_differ: bool) -> f64 {
    let Some(&increment) = BOOSTER_WORDS.get(lowered) else {
        return 0.0;
    };

    let mut scalar = if valence < 0.0 { -increment } else { increment };
    if caps_differ && is_upper(token) {
        if valence > 0.0 {
            scalar += CAPS_INCREMENT;
        } else {
            scalar -= CAPS_INCREMENT;
        }
    }
    scalar
}

fn negation_check(valence: f64, lowered: &[String], start: usize, i: usize) -> f64 {
    let word = |back: usize| lowered[i - back].as_str();

    match start {
        0 if is_negation(word(1)) => valence * NEGATION_SCALAR,
        1 => {
            if word(2) == "never" && matches!(word(1), "so" | "this") {
                valence * 1.5
            } else if word(2) == "without" && word(1) == "doubt" {
                valence
            } else if is_negation(word(2)) {
                valence * NEGATION_SCALAR
            } else {
                valence
            }
        }
        2 => {
            if word(3) == "never" && (matches!(word(2), "so" | "this") || matches!(word(1), "so" | "this")) {
                valence * 1.25
            } else if word(3) == "without" && (word(2) == "doubt" || word(1) == "doubt") {
                valence
            } else if is_negation(word(3)) {
                valence * NEGATION_SCALAR
            } else {
                valence
            }
        }
        _ => valence,
    }
}

/// "least" negates the next word unless it reads "at least" or "very least".
fn least_check(valence: f64, lowered: &[String], i: usize) -> f64 {
    if i == 0 || lowered[i - 1] != "least" {
        return valence;
    }
    if i > 1 && matches!(lowered[i - 2].as_str(), "at" | "very") {
        return valence;
    }
    valence * NEGATION_SCALAR
}

/// Halve the sentiment before the first "but" and boost what follows it.
fn but_check(lowered: &[String], sentiments: &mut [f64]) {
    let Some(but) = lowered.iter().position(|word| word == "but") else {
        return;
    };
    for (idx, sentiment) in sentiments.iter_mut().enumerate() {
        if idx < but {
            *sentiment *= 0.5;
        } else if idx > but {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * EXCLAMATION_INCREMENT;

    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * 0.18,
        _ => 0.96,
    };

    exclamations + question_emphasis
}

fn score_valence(sentiments: &[f64], text: &str) -> SentimentVector {
    let emphasis = punctuation_emphasis(text);

    let mut total: f64 = sentiments.iter().sum();
    if total > 0.0 {
        total += emphasis;
    } else if total < 0.0 {
        total -= emphasis;
    }
    let compound = (total / (total * total + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0);

    // neutral words count 1, sentiment words count 1 plus their valence
    let mut positive_sum = 0.0;
    let mut negative_sum = 0.0;
    let mut neutral_count = 0.0;
    for &sentiment in sentiments {
        if sentiment > 0.0 {
            positive_sum += sentiment + 1.0;
        } else if sentiment < 0.0 {
            negative_sum += sentiment - 1.0;
        } else {
            neutral_count += 1.0;
        }
    }

    if positive_sum > negative_sum.abs() {
        positive_sum += emphasis;
    } else if positive_sum < negative_sum.abs() {
        negative_sum -= emphasis;
    }

    let denominator = positive_sum + negative_sum.abs() + neutral_count;
    if denominator <= 0.0 {
        return SentimentVector::neutral();
    }

    SentimentVector {
        negative: negative_sum.abs() / denominator,
        neutral: neutral_count / denominator,
        positive: positive_sum / denominator,
        compound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(text: &str) -> SentimentVector {
        SentimentAnalyzer::new().polarity_scores(text)
    }

    fn assert_proportions(vector: &SentimentVector) {
        let sum = vector.negative + vector.neutral + vector.positive;
        assert!((sum - 1.0).abs() < 1e-6, "{vector:?}");
        assert!((-1.0..=1.0).contains(&vector.compound));
    }

    #[test]
    fn test_formal_email_is_positive() {
        let vector = scores(
            "Dear Sir, I hope this message finds you well. I would like to schedule a meeting at your convenience.",
        );
        assert_proportions(&vector);
        assert!((vector.compound - 0.844).abs() < 1e-3);
        assert!(vector.neutral < 0.6);
        assert_eq!(vector.negative, 0.0);
    }

    #[test]
    fn test_angry_emoji_is_negative() {
        let vector = scores("omg i cant believe this happened!!! 😡😡");
        assert_proportions(&vector);
        assert!(vector.compound < -0.8);
        assert!(vector.negative > vector.positive);
    }

    #[test]
    fn test_negation_flips_polarity() {
        assert!(scores("The results are good").compound > 0.0);
        assert!(scores("The results are not good").compound < 0.0);
        assert!(scores("The results aren't very good").compound < 0.0);
    }

    #[test]
    fn test_boosters_and_caps_intensify() {
        let plain = scores("The service was good").compound;
        let boosted = scores("The service was very good").compound;
        let shouted = scores("The service was GOOD").compound;
        let dampened = scores("The service was slightly good").compound;

        assert!(boosted > plain);
        assert!(shouted > plain);
        assert!(dampened < plain);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        let vector = scores("The food was great but the service was terrible");
        assert!(vector.compound < 0.0);
    }

    #[test]
    fn test_exclamations_amplify() {
        assert!(scores("Great work!!!").compound > scores("Great work").compound);
    }

    #[test]
    fn test_text_without_tokens_is_neutral() {
        for text in ["", "   ", "a", "I"] {
            let vector = scores(text);
            assert_eq!(vector, SentimentVector::neutral());
        }
    }

    #[test]
    fn test_emoji_replacement() {
        assert_eq!(replace_emoji("so mad😡"), "so mad enraged face");
        assert_eq!(replace_emoji("😡😡"), "enraged face enraged face");
        assert_eq!(replace_emoji("ok 👍"), "ok thumbs up");
        assert_eq!(replace_emoji("❤\u{fe0f}thanks"), "red heart thanks");
    }

    #[test]
    fn test_emoticons_are_kept() {
        assert_eq!(words_and_emoticons("Thanks, team :)"), vec!["Thanks", "team", ":)"]);
        assert!(scores("see you tomorrow :)").compound > 0.0);
    }
}
