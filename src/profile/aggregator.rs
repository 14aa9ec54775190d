//! Threshold rules that turn the raw signals into feedback, suggestions and
//! a radar vector.

use serde::{Deserialize, Serialize};

use crate::scoring::sentiment::SentimentVector;

pub const STRONG_POSITIVE_FEEDBACK: &str =
    "Your email has a strong positive sentiment, great for professional communication.";
pub const ANXIOUS_FEEDBACK: &str =
    "Your message might come across as slightly anxious. Consider using more confident language.";
pub const FORMAL_FEEDBACK: &str =
    "Your email is formal and well-structured, suitable for professional settings.";
pub const NEUTRAL_FEEDBACK: &str =
    "No specific feedback, your email looks balanced and appropriate.";

pub const POSITIVE_PHRASING_SUGGESTION: &str =
    "Consider adding more positive phrasing or appreciation.";
pub const FORMAL_STRUCTURE_SUGGESTION: &str =
    "Avoid contractions and use more formal sentence structures.";
pub const EMOTIONAL_NUANCE_SUGGESTION: &str =
    "Add more emotional nuance to connect better with the reader.";
pub const WELL_COMPOSED_SUGGESTION: &str = "No major suggestions, your email looks well-composed!";

/// Thresholds of the feedback and suggestion rules.
///
/// Comparisons are strict: a compound of exactly `strong_positive` does not
/// earn the positive feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationRules {
    /// Compound sentiment above which positive feedback is given.
    pub strong_positive: f64,
    /// Substring of the tone label, matched case-insensitively, that flags
    /// an anxious message.
    pub anxiety_marker: String,
    /// Formality score above which the message is praised as formal.
    pub formal_feedback: f64,
    /// Compound sentiment below which positive phrasing is suggested.
    pub low_compound: f64,
    /// Formality score below which more formal structure is suggested.
    pub informal_suggestion: f64,
    /// Neutral proportion above which emotional nuance is suggested.
    pub high_neutral: f64,
}

impl Default for AggregationRules {
    fn default() -> Self {
        AggregationRules {
            strong_positive: 0.5,
            anxiety_marker: "fear".to_string(),
            formal_feedback: 70.0,
            low_compound: 0.3,
            informal_suggestion: 60.0,
            high_neutral: 0.6,
        }
    }
}

/// The four raw signals of one document.
#[derive(Debug, Clone, Copy)]
pub struct Signals<'a> {
    pub sentiment: &'a SentimentVector,
    /// Carried for callers; no rule reads it, only `tone` drives feedback.
    pub emotion: &'a str,
    pub tone: &'a str,
    pub formality: f64,
}

/// Output of the rules for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Never empty.
    pub feedback: Vec<String>,
    /// Never empty.
    pub suggestions: Vec<String>,
    pub radar: RadarVector,
}

impl AggregationRules {
    /// Apply every rule to the signals.
    pub fn assess(&self, signals: &Signals<'_>) -> Assessment {
        Assessment {
            feedback: self.feedback(signals),
            suggestions: self.suggestions(signals),
            radar: RadarVector::new(signals.sentiment, signals.formality),
        }
    }

    fn feedback(&self, signals: &Signals<'_>) -> Vec<String> {
        let mut feedback = Vec::new();
        if signals.sentiment.compound > self.strong_positive {
            feedback.push(STRONG_POSITIVE_FEEDBACK.to_string());
        }
        if contains_ignore_case(signals.tone, &self.anxiety_marker) {
            feedback.push(ANXIOUS_FEEDBACK.to_string());
        }
        if signals.formality > self.formal_feedback {
            feedback.push(FORMAL_FEEDBACK.to_string());
        }
        if feedback.is_empty() {
            feedback.push(NEUTRAL_FEEDBACK.to_string());
        }
        feedback
    }

    fn suggestions(&self, signals: &Signals<'_>) -> Vec<String> {
        let mut suggestions = Vec::new();
        if signals.sentiment.compound < self.low_compound {
            suggestions.push(POSITIVE_PHRASING_SUGGESTION.to_string());
        }
        if signals.formality < self.informal_suggestion {
            suggestions.push(FORMAL_STRUCTURE_SUGGESTION.to_string());
        }
        if signals.sentiment.neutral > self.high_neutral {
            suggestions.push(EMOTIONAL_NUANCE_SUGGESTION.to_string());
        }
        if suggestions.is_empty() {
            suggestions.push(WELL_COMPOSED_SUGGESTION.to_string());
        }
        suggestions
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Five bounded axes for a radial plot.
///
/// Renderers that draw a closed polygon repeat the first value at the end
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarVector {
    pub formality: f64,
    pub positivity: f64,
    pub neutrality: f64,
    pub negativity: f64,
    pub compound: f64,
}

impl RadarVector {
    /// Axis names, in the order of [`values`](Self::values).
    pub const LABELS: [&'static str; 5] =
        ["Formality", "Positivity", "Neutrality", "Negativity", "Compound"];

    pub fn new(sentiment: &SentimentVector, formality: f64) -> Self {
        RadarVector {
            formality: unit(formality / 100.0),
            positivity: unit(sentiment.positive),
            neutrality: unit(sentiment.neutral),
            negativity: unit(sentiment.negative),
            compound: unit((sentiment.compound + 1.0) / 2.0),
        }
    }

    pub fn values(&self) -> [f64; 5] {
        [
            self.formality,
            self.positivity,
            self.neutrality,
            self.negativity,
            self.compound,
        ]
    }

    /// Pair every value with its axis name.
    pub fn axes(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::LABELS.into_iter().zip(self.values())
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment(negative: f64, neutral: f64, positive: f64, compound: f64) -> SentimentVector {
        SentimentVector {
            negative,
            neutral,
            positive,
            compound,
        }
    }

    fn assess(sentiment: &SentimentVector, tone: &str, formality: f64) -> Assessment {
        AggregationRules::default().assess(&Signals {
            sentiment,
            emotion: "joy",
            tone,
            formality,
        })
    }

    #[test]
    fn test_formal_positive_message() {
        let assessment = assess(&sentiment(0.0, 0.543, 0.457, 0.844), "neutral", 70.18);

        assert_eq!(assessment.feedback, [STRONG_POSITIVE_FEEDBACK, FORMAL_FEEDBACK]);
        assert_eq!(assessment.suggestions, [WELL_COMPOSED_SUGGESTION]);
    }

    #[test]
    fn test_informal_negative_message() {
        let assessment = assess(&sentiment(0.6, 0.4, 0.0, -0.89), "anger", 51.91);

        assert_eq!(assessment.feedback, [NEUTRAL_FEEDBACK]);
        assert_eq!(
            assessment.suggestions,
            [POSITIVE_PHRASING_SUGGESTION, FORMAL_STRUCTURE_SUGGESTION]
        );
    }

    #[test]
    fn test_anxiety_marker_is_case_insensitive() {
        let neutral = sentiment(0.0, 1.0, 0.0, 0.0);

        let assessment = assess(&neutral, "Fearful", 65.0);
        assert_eq!(assessment.feedback, [ANXIOUS_FEEDBACK]);
        assert_eq!(
            assessment.suggestions,
            [POSITIVE_PHRASING_SUGGESTION, EMOTIONAL_NUANCE_SUGGESTION]
        );

        // the degraded sentinel never reads as anxious
        let assessment = assess(&neutral, "Error", 65.0);
        assert_eq!(assessment.feedback, [NEUTRAL_FEEDBACK]);
    }

    #[test]
    fn test_emotion_label_does_not_drive_rules() {
        let neutral = sentiment(0.0, 0.5, 0.5, 0.4);
        let signals = |emotion| Signals {
            sentiment: &neutral,
            emotion,
            tone: "calm",
            formality: 65.0,
        };

        let rules = AggregationRules::default();
        assert_eq!(rules.assess(&signals("fear")), rules.assess(&signals("joy")));
        assert_eq!(rules.assess(&signals("fear")).feedback, [NEUTRAL_FEEDBACK]);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let assessment = assess(&sentiment(0.0, 0.6, 0.4, 0.5), "neutral", 70.0);
        assert_eq!(assessment.feedback, [NEUTRAL_FEEDBACK]);

        let assessment = assess(&sentiment(0.0, 0.6, 0.4, 0.3), "neutral", 60.0);
        assert_eq!(assessment.suggestions, [WELL_COMPOSED_SUGGESTION]);
    }

    #[test]
    fn test_custom_rules() {
        let rules = AggregationRules {
            formal_feedback: 50.0,
            anxiety_marker: "worry".to_string(),
            ..AggregationRules::default()
        };
        let neutral = sentiment(0.0, 0.5, 0.5, 0.4);
        let assessment = rules.assess(&Signals {
            sentiment: &neutral,
            emotion: "joy",
            tone: "worry",
            formality: 55.0,
        });

        assert_eq!(assessment.feedback, [ANXIOUS_FEEDBACK, FORMAL_FEEDBACK]);
    }

    #[test]
    fn test_radar_vector() {
        let radar = RadarVector::new(&sentiment(0.1, 0.5, 0.4, 0.5), 80.0);
        assert_eq!(radar.values(), [0.8, 0.4, 0.5, 0.1, 0.75]);

        let axes: Vec<_> = radar.axes().collect();
        assert_eq!(axes[0], ("Formality", 0.8));
        assert_eq!(axes[4], ("Compound", 0.75));
    }

    #[test]
    fn test_radar_vector_is_bounded() {
        let radar = RadarVector::new(&sentiment(0.0, 1.0, 0.0, -1.0), 0.0);
        assert_eq!(radar.values(), [0.0, 0.0, 1.0, 0.0, 0.0]);

        let radar = RadarVector::new(&sentiment(0.0, 0.0, 1.0, 1.0), 150.0);
        assert!(radar.values().iter().all(|v| (0.0..=1.0).contains(v)));

        let radar = RadarVector::new(&sentiment(0.0, 0.0, 1.0, f64::NAN), 100.0);
        assert_eq!(radar.compound, 0.0);
    }
}
