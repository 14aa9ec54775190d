use std::sync::Arc;

use tonescope::config::ToneConfig;
use tonescope::ml::classifier::{ModelKind, ModelStore, Prediction, Predictor};
use tonescope::profile::ToneProfiler;
use tonescope::scoring::{FormalityScorer, SentimentAnalyzer};
use tonescope::storage::memory::MemoryStorage;

const FORMAL: &str = "Dear Sir, I hope this message finds you well. I would like to schedule a meeting at your convenience.";
const INFORMAL: &str = "omg i cant believe this happened!!! 😡😡";

const SAMPLES: &[&str] = &[
    FORMAL,
    INFORMAL,
    "Thanks!",
    "URGENT: SERVER DOWN. CALL ME NOW!!!",
    "We regret to inform you that your application was not successful.",
    "Hey, can't make it today, sorry :(",
    "I am not happy with the delay, but the final result is excellent.",
    "???",
    "ok",
    "   The quarterly report is attached for your review.   ",
    "Ünïcödé text with accents, naïve café résumé.",
    "😀😀😀",
    "no",
];

fn profiler() -> ToneProfiler {
    let store = ModelStore::new(Arc::new(MemoryStorage::default()));
    ToneProfiler::with_store(ToneConfig::default(), store)
}

#[test]
fn test_formal_email_scenario() {
    let profile = profiler().analyze(FORMAL);

    assert!(profile.formality > 70.0);
    assert!(profile.sentiment.compound > 0.0);
    assert!(
        profile
            .feedback
            .iter()
            .any(|line| line.contains("formal and well-structured"))
    );
    assert_eq!(profile.suggestions.len(), 1);
    assert!(profile.suggestions[0].contains("well-composed"));
}

#[test]
fn test_informal_message_scenario() {
    let profile = profiler().analyze(INFORMAL);

    assert!(profile.formality < 60.0);
    assert!(profile.sentiment.compound < 0.0);
    assert!(profile.sentiment.negative > profile.sentiment.positive);
    assert!(
        profile
            .suggestions
            .iter()
            .any(|line| line.contains("Avoid contractions"))
    );
}

#[test]
fn test_formality_is_bounded_and_deterministic() {
    let scorer = FormalityScorer::default();
    for text in SAMPLES {
        let score = scorer.score(text);
        assert!((0.0..=100.0).contains(&score), "{text:?} scored {score}");
        assert_eq!(score, scorer.score(text), "{text:?} is not deterministic");
        assert_eq!(score, (score * 100.0).round() / 100.0);
    }
}

#[test]
fn test_sentiment_proportions_sum_to_one() {
    let analyzer = SentimentAnalyzer::new();
    for text in SAMPLES {
        let scores = analyzer.polarity_scores(text);
        let total = scores.negative + scores.neutral + scores.positive;
        assert!((total - 1.0).abs() < 1e-6, "{text:?} sums to {total}");
        assert!((-1.0..=1.0).contains(&scores.compound));
    }
}

#[test]
fn test_feedback_and_suggestions_never_empty() {
    let profiler = profiler();
    for text in SAMPLES {
        let profile = profiler.analyze(text);
        assert!(!profile.feedback.is_empty(), "{text:?} has no feedback");
        assert!(!profile.suggestions.is_empty(), "{text:?} has no suggestions");

        let values = profile.radar.values();
        assert_eq!(values.len(), 5);
        assert!(
            values.iter().all(|v| (0.0..=1.0).contains(v)),
            "{text:?} radar {values:?}"
        );
    }
}

#[test]
fn test_predict_without_artifact_returns_sentinel() {
    let predictor = Predictor::new(ModelStore::new(Arc::new(MemoryStorage::default())));

    for kind in ModelKind::ALL {
        let prediction = predictor.predict(kind, FORMAL);
        assert_eq!(prediction, Prediction::Unavailable { kind });
        assert_eq!(prediction.label(), "Error");
    }
}
