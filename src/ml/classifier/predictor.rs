//! Inference with a process-wide artifact cache.
//!
//! Prediction never fails past this boundary. A missing artifact or any
//! transform failure is reported as a degraded [`Prediction`] whose
//! [`label`](Prediction::label) is the `"Error"` sentinel, so callers can
//! keep producing a profile while still telling a degraded result apart
//! from a real label.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use super::ModelKind;
use super::artifact::ClassifierArtifact;
use super::store::ModelStore;
use crate::error::{Result, ToneError};

/// Label reported by degraded predictions.
pub const ERROR_LABEL: &str = "Error";

/// Outcome of a single prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prediction {
    /// The artifact produced this label.
    Label(String),
    /// No artifact of this kind has been trained yet.
    Unavailable { kind: ModelKind },
    /// The artifact could not be loaded or applied.
    Failed { reason: String },
}

impl Prediction {
    /// The predicted label, or `"Error"` for a degraded prediction.
    pub fn label(&self) -> &str {
        match self {
            Prediction::Label(label) => label,
            Prediction::Unavailable { .. } | Prediction::Failed { .. } => ERROR_LABEL,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, Prediction::Label(_))
    }

    /// Human-readable reason for a degraded prediction.
    pub fn degradation(&self) -> Option<String> {
        match self {
            Prediction::Label(_) => None,
            Prediction::Unavailable { kind } => Some(ToneError::model_not_found(*kind).to_string()),
            Prediction::Failed { reason } => Some(reason.clone()),
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Applies persisted classifiers, caching each loaded artifact.
///
/// Artifacts are immutable, so cached entries are shared between threads
/// as `Arc`s; the lock only guards the map itself.
#[derive(Debug)]
pub struct Predictor {
    store: ModelStore,
    cache: RwLock<HashMap<ModelKind, Arc<ClassifierArtifact>>>,
}

impl Predictor {
    pub fn new(store: ModelStore) -> Self {
        Predictor {
            store,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Classify `text` with the artifact of `kind`.
    pub fn predict(&self, kind: ModelKind, text: &str) -> Prediction {
        match self.try_predict(kind, text) {
            Ok(label) => Prediction::Label(label),
            Err(ToneError::ModelNotFound { kind }) => {
                log::warn!("No {kind} model available, reporting {ERROR_LABEL}");
                Prediction::Unavailable { kind }
            }
            Err(e) => {
                log::warn!("{kind} prediction failed: {e}");
                Prediction::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Classify `text`, propagating failures instead of degrading.
    pub fn try_predict(&self, kind: ModelKind, text: &str) -> Result<String> {
        self.artifact(kind)?.predict(text)
    }

    /// Decision score of every label of the `kind` artifact.
    pub fn predict_scores(&self, kind: ModelKind, text: &str) -> Result<Vec<(String, f64)>> {
        self.artifact(kind)?.decision_scores(text)
    }

    /// Get the artifact of a kind, loading it on first use.
    pub fn artifact(&self, kind: ModelKind) -> Result<Arc<ClassifierArtifact>> {
        if let Some(artifact) = self.cache.read().get(&kind) {
            return Ok(Arc::clone(artifact));
        }

        let mut cache = self.cache.write();
        if let Some(artifact) = cache.get(&kind) {
            return Ok(Arc::clone(artifact));
        }

        let artifact = Arc::new(self.store.load(kind)?);
        log::debug!(
            "Loaded {kind} artifact with {} labels into cache",
            artifact.labels().len()
        );
        cache.insert(kind, Arc::clone(&artifact));
        Ok(artifact)
    }

    /// Drop the cached artifact of a kind so the next call reloads it.
    pub fn invalidate(&self, kind: ModelKind) {
        if self.cache.write().remove(&kind).is_some() {
            log::debug!("Invalidated cached {kind} artifact");
        }
    }

    pub fn is_cached(&self, kind: ModelKind) -> bool {
        self.cache.read().contains_key(&kind)
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::config::VectorizerConfig;
    use crate::ml::classifier::linear::LinearModel;
    use crate::ml::classifier::metrics::EvaluationReport;
    use crate::ml::classifier::tfidf::TfIdfVectorizer;
    use crate::storage::memory::MemoryStorage;

    fn artifact() -> ClassifierArtifact {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig {
            ngram_range: (1, 1),
            ..VectorizerConfig::default()
        });
        vectorizer
            .fit(&["calm news".to_string(), "scary news".to_string()])
            .unwrap();
        // features: calm, news, scary
        let model = LinearModel::new(
            vec!["calm".to_string(), "fear".to_string()],
            vec![vec![1.0, 0.0, -1.0], vec![-1.0, 0.0, 1.0]],
            vec![0.0, 0.0],
        )
        .unwrap();
        let report = EvaluationReport::default();
        ClassifierArtifact::new(ModelKind::Tone, vectorizer, model, report, "manual").unwrap()
    }

    /// Store the artifact after `edit` rewrites its JSON, then predict.
    fn predict_edited(edit: impl FnOnce(&mut Value)) -> Prediction {
        let mut stored = serde_json::to_value(artifact()).unwrap();
        edit(&mut stored);

        let storage = Arc::new(MemoryStorage::default());
        storage.put("tone.model.json", &serde_json::to_vec(&stored).unwrap());
        let predictor = Predictor::new(ModelStore::new(storage));
        predictor.predict(ModelKind::Tone, "scary news about calm and scary things")
    }

    fn assert_failed(prediction: Prediction, cause: &str) {
        match &prediction {
            Prediction::Failed { reason } => {
                assert!(reason.contains(cause), "{reason:?} should mention {cause:?}")
            }
            other => panic!("expected a failed prediction, got {other:?}"),
        }
        assert_eq!(prediction.label(), "Error");
    }

    #[test]
    fn test_unedited_artifact_predicts() {
        assert_eq!(predict_edited(|_| {}), Prediction::Label("fear".to_string()));
    }

    #[test]
    fn test_truncated_idf_degrades_to_failed() {
        let prediction = predict_edited(|stored| stored["vectorizer"]["idf"] = json!([]));
        assert_failed(prediction, "idf");
    }

    #[test]
    fn test_out_of_range_vocabulary_index_degrades_to_failed() {
        let prediction =
            predict_edited(|stored| stored["vectorizer"]["vocabulary"]["scary"] = json!(7));
        assert_failed(prediction, "scary");
    }

    #[test]
    fn test_short_weight_rows_degrade_to_failed() {
        let prediction = predict_edited(|stored| {
            stored["model"]["weights"] = json!([[0.5], [-0.5]]);
            stored["model"]["n_features"] = json!(1);
        });
        assert_failed(prediction, "features");

        let prediction = predict_edited(|stored| stored["model"]["weights"][0] = json!([0.5]));
        assert_failed(prediction, "same length");

        let prediction = predict_edited(|stored| stored["model"]["n_features"] = json!(2));
        assert_failed(prediction, "declares 2");
    }

    #[test]
    fn test_missing_labels_degrade_to_failed() {
        let prediction = predict_edited(|stored| stored["model"]["labels"] = json!([]));
        assert_failed(prediction, "two labels");

        let prediction = predict_edited(|stored| stored["model"]["intercepts"] = json!([0.0]));
        assert_failed(prediction, "one entry per label");
    }

    #[test]
    fn test_missing_artifact_degrades_to_sentinel() {
        let predictor = Predictor::new(ModelStore::new(Arc::new(MemoryStorage::default())));

        let prediction = predictor.predict(ModelKind::Emotion, "hello there");
        assert_eq!(
            prediction,
            Prediction::Unavailable {
                kind: ModelKind::Emotion
            }
        );
        assert_eq!(prediction.label(), "Error");
        assert!(prediction.is_degraded());
        assert!(prediction.degradation().unwrap().contains("run training first"));
        assert!(!predictor.is_cached(ModelKind::Emotion));
    }

    #[test]
    fn test_corrupt_artifact_degrades_to_failed() {
        let storage = Arc::new(MemoryStorage::default());
        storage.put("tone.model.json", b"[1, 2, 3]");
        let predictor = Predictor::new(ModelStore::new(storage));

        let prediction = predictor.predict(ModelKind::Tone, "hello there");
        assert!(matches!(prediction, Prediction::Failed { .. }));
        assert_eq!(prediction.to_string(), "Error");
    }

    #[test]
    fn test_label_prediction() {
        let prediction = Prediction::Label("joy".to_string());
        assert_eq!(prediction.label(), "joy");
        assert!(!prediction.is_degraded());
        assert!(prediction.degradation().is_none());
    }
}
