//! Tone profiles: the four signals of a document and what the rules make
//! of them.
//!
//! [`ToneProfiler`] runs both classifiers and both heuristic scorers on a
//! text and feeds their outputs into [`AggregationRules::assess`]. A
//! classifier that cannot predict reports the `"Error"` sentinel and the
//! reason is kept in [`ToneProfile::warnings`], so a profile is always
//! produced.
//!
//! ```
//! use std::sync::Arc;
//!
//! use tonescope::config::ToneConfig;
//! use tonescope::ml::classifier::ModelStore;
//! use tonescope::profile::ToneProfiler;
//! use tonescope::storage::memory::MemoryStorage;
//!
//! let store = ModelStore::new(Arc::new(MemoryStorage::default()));
//! let profiler = ToneProfiler::with_store(ToneConfig::default(), store);
//!
//! let profile = profiler.analyze("Thanks a lot, the report looks great!");
//! assert_eq!(profile.tone, "Error");
//! assert!(!profile.feedback.is_empty());
//! assert!(!profile.suggestions.is_empty());
//! ```

pub mod aggregator;

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use aggregator::{AggregationRules, Assessment, RadarVector, Signals};

use crate::config::ToneConfig;
use crate::error::Result;
use crate::ml::classifier::{
    ClassifierArtifact, LabeledExample, ModelKind, ModelStore, Predictor, Trainer, load_corpus,
};
use crate::scoring::formality::FormalityScorer;
use crate::scoring::sentiment::{SentimentAnalyzer, SentimentVector};

/// Everything known about one analyzed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneProfile {
    /// Emotion label, or `"Error"` when the classifier was unavailable.
    pub emotion: String,
    /// Tone label, or `"Error"` when the classifier was unavailable.
    pub tone: String,
    pub sentiment: SentimentVector,
    /// Formality score in `[0, 100]`.
    pub formality: f64,
    pub feedback: Vec<String>,
    pub suggestions: Vec<String>,
    pub radar: RadarVector,
    /// Reasons behind degraded classifier outputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ToneProfile {
    /// Whether a classifier fell back to the sentinel label.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Produces [`ToneProfile`]s and trains the classifiers behind them.
#[derive(Debug)]
pub struct ToneProfiler {
    config: ToneConfig,
    predictor: Predictor,
    sentiment: SentimentAnalyzer,
    formality: FormalityScorer,
}

impl ToneProfiler {
    /// Create a profiler reading artifacts from `config.models_dir`.
    pub fn new(config: ToneConfig) -> Result<Self> {
        let store = ModelStore::open(&config.models_dir)?;
        Ok(Self::with_store(config, store))
    }

    /// Create a profiler over an existing model store.
    pub fn with_store(config: ToneConfig, store: ModelStore) -> Self {
        let formality = FormalityScorer::new(config.formality.clone());
        ToneProfiler {
            config,
            predictor: Predictor::new(store),
            sentiment: SentimentAnalyzer::new(),
            formality,
        }
    }

    /// Profile a single document.
    ///
    /// Blank text is expected to be rejected before it gets here.
    pub fn analyze(&self, text: &str) -> ToneProfile {
        let emotion = self.predictor.predict(ModelKind::Emotion, text);
        let tone = self.predictor.predict(ModelKind::Tone, text);
        let sentiment = self.sentiment.polarity_scores(text);
        let formality = self.formality.score(text);

        let Assessment {
            feedback,
            suggestions,
            radar,
        } = self.config.rules.assess(&Signals {
            sentiment: &sentiment,
            emotion: emotion.label(),
            tone: tone.label(),
            formality,
        });

        let warnings = [&emotion, &tone]
            .into_iter()
            .filter_map(|prediction| prediction.degradation())
            .collect();

        ToneProfile {
            emotion: emotion.label().to_string(),
            tone: tone.label().to_string(),
            sentiment,
            formality,
            feedback,
            suggestions,
            radar,
            warnings,
        }
    }

    /// Profile many documents in parallel, keeping their order.
    pub fn analyze_batch(&self, texts: &[String]) -> Vec<ToneProfile> {
        texts.par_iter().map(|text| self.analyze(text)).collect()
    }

    /// Trainer for a kind, configured from this profiler's settings.
    pub fn trainer(&self, kind: ModelKind) -> Trainer {
        Trainer::new(kind, self.config.training(kind).clone())
    }

    /// Train, persist and start serving a new classifier of `kind`.
    pub fn train(&self, kind: ModelKind, corpus: Vec<LabeledExample>) -> Result<ClassifierArtifact> {
        self.train_with(&self.trainer(kind), corpus)
    }

    /// Load a corpus file and train a classifier of `kind` on it.
    pub fn train_file<P: AsRef<Path>>(&self, kind: ModelKind, path: P) -> Result<ClassifierArtifact> {
        let corpus = load_corpus(path, self.config.training(kind))?;
        self.train(kind, corpus)
    }

    /// Run a prepared trainer, for callers that hold its cancellation flag.
    pub fn train_with(
        &self,
        trainer: &Trainer,
        corpus: Vec<LabeledExample>,
    ) -> Result<ClassifierArtifact> {
        let artifact = trainer.train_into(corpus, self.predictor.store())?;
        self.predictor.invalidate(trainer.kind());
        Ok(artifact)
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    pub fn formality_scorer(&self) -> &FormalityScorer {
        &self.formality
    }

    pub fn sentiment_analyzer(&self) -> &SentimentAnalyzer {
        &self.sentiment
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::profile::aggregator::{
        ANXIOUS_FEEDBACK, FORMAL_FEEDBACK, FORMAL_STRUCTURE_SUGGESTION,
        POSITIVE_PHRASING_SUGGESTION, STRONG_POSITIVE_FEEDBACK, WELL_COMPOSED_SUGGESTION,
    };
    use crate::storage::memory::MemoryStorage;

    const FORMAL: &str = "Dear Sir, I hope this message finds you well. I would like to schedule a meeting at your convenience.";
    const INFORMAL: &str = "omg i cant believe this happened!!! 😡😡";

    fn profiler() -> ToneProfiler {
        let store = ModelStore::new(Arc::new(MemoryStorage::default()));
        ToneProfiler::with_store(ToneConfig::default(), store)
    }

    fn tone_corpus() -> Vec<LabeledExample> {
        let calm = [
            "thank you for the lovely update on the project",
            "the meeting went well and everyone was pleased",
            "happy to confirm the schedule for next week",
            "great work on the release, the team did well",
        ];
        let fear = [
            "I am worried the deadline will slip again",
            "this situation is scary and I feel anxious",
            "afraid we might lose the client after this",
            "nervous about the audit results next week",
        ];

        let mut corpus = Vec::new();
        for round in 0..8 {
            for text in calm {
                corpus.push(LabeledExample::new(format!("{text} note {round}"), "calm"));
            }
            for text in fear {
                corpus.push(LabeledExample::new(format!("{text} note {round}"), "fear"));
            }
        }
        corpus
    }

    #[test]
    fn test_formal_email_profile() {
        let profile = profiler().analyze(FORMAL);

        assert_eq!(profile.formality, 70.18);
        assert!(profile.sentiment.compound > 0.5);
        assert_eq!(profile.feedback, [STRONG_POSITIVE_FEEDBACK, FORMAL_FEEDBACK]);
        assert_eq!(profile.suggestions, [WELL_COMPOSED_SUGGESTION]);
    }

    #[test]
    fn test_informal_message_profile() {
        let profile = profiler().analyze(INFORMAL);

        assert!(profile.formality < 60.0);
        assert!(profile.sentiment.compound < 0.0);
        assert!(profile.suggestions.len() >= 2);
        assert_eq!(profile.suggestions[0], POSITIVE_PHRASING_SUGGESTION);
        assert_eq!(profile.suggestions[1], FORMAL_STRUCTURE_SUGGESTION);
    }

    #[test]
    fn test_missing_models_degrade() {
        let profile = profiler().analyze(FORMAL);

        assert_eq!(profile.emotion, "Error");
        assert_eq!(profile.tone, "Error");
        assert!(profile.is_degraded());
        assert_eq!(profile.warnings.len(), 2);
    }

    #[test]
    fn test_train_serves_new_model() {
        let profiler = profiler();
        assert_eq!(profiler.analyze("I feel anxious").tone, "Error");

        let artifact = profiler.train(ModelKind::Tone, tone_corpus()).unwrap();
        assert_eq!(artifact.labels(), ["calm".to_string(), "fear".to_string()]);
        assert!(!profiler.predictor().is_cached(ModelKind::Tone));

        let profile = profiler.analyze("I feel anxious and worried about the audit");
        assert_eq!(profile.tone, "fear");
        assert!(profile.feedback.iter().any(|line| line == ANXIOUS_FEEDBACK));
        assert_eq!(profile.warnings.len(), 1);
        assert!(profiler.predictor().is_cached(ModelKind::Tone));

        // retraining drops the cached artifact
        profiler.train(ModelKind::Tone, tone_corpus()).unwrap();
        assert!(!profiler.predictor().is_cached(ModelKind::Tone));
    }

    #[test]
    fn test_analyze_batch_keeps_order() {
        let profiler = profiler();
        let texts = vec![FORMAL.to_string(), INFORMAL.to_string(), FORMAL.to_string()];

        let profiles = profiler.analyze_batch(&texts);
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0], profiler.analyze(FORMAL));
        assert_eq!(profiles[1], profiler.analyze(INFORMAL));
        assert_eq!(profiles[0], profiles[2]);
    }

    #[test]
    fn test_profile_serializes() {
        let profile = profiler().analyze(FORMAL);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["tone"], "Error");
        assert!((json["radar"]["formality"].as_f64().unwrap() - 0.7018).abs() < 1e-9);
        assert!(json["sentiment"]["compound"].as_f64().unwrap() > 0.5);
    }
}
