//! The persisted classifier bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelKind;
use super::linear::LinearModel;
use super::metrics::EvaluationReport;
use super::tfidf::TfIdfVectorizer;
use crate::error::{Result, ToneError};

/// A fitted feature transform and decision function, kept as one unit.
///
/// Artifacts are immutable once built; a new training run replaces the
/// stored artifact wholesale. A deserialized artifact passes the same
/// consistency checks as a freshly trained one, so applying it cannot
/// index outside its weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredArtifact")]
pub struct ClassifierArtifact {
    kind: ModelKind,
    vectorizer: TfIdfVectorizer,
    model: LinearModel,
    report: EvaluationReport,
    trainer: String,
    trained_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StoredArtifact {
    kind: ModelKind,
    vectorizer: TfIdfVectorizer,
    model: LinearModel,
    report: EvaluationReport,
    trainer: String,
    trained_at: DateTime<Utc>,
}

impl TryFrom<StoredArtifact> for ClassifierArtifact {
    type Error = ToneError;

    fn try_from(stored: StoredArtifact) -> Result<Self> {
        check_dimensions(&stored.vectorizer, &stored.model).map_err(ToneError::prediction)?;
        Ok(ClassifierArtifact {
            kind: stored.kind,
            vectorizer: stored.vectorizer,
            model: stored.model,
            report: stored.report,
            trainer: stored.trainer,
            trained_at: stored.trained_at,
        })
    }
}

fn check_dimensions(
    vectorizer: &TfIdfVectorizer,
    model: &LinearModel,
) -> std::result::Result<(), String> {
    if vectorizer.vocabulary_size() != model.n_features() {
        return Err(format!(
            "vectorizer has {} features but model expects {}",
            vectorizer.vocabulary_size(),
            model.n_features()
        ));
    }
    Ok(())
}

impl ClassifierArtifact {
    pub fn new(
        kind: ModelKind,
        vectorizer: TfIdfVectorizer,
        model: LinearModel,
        report: EvaluationReport,
        trainer: &str,
    ) -> Result<Self> {
        check_dimensions(&vectorizer, &model).map_err(ToneError::invalid_argument)?;

        Ok(ClassifierArtifact {
            kind,
            vectorizer,
            model,
            report,
            trainer: trainer.to_string(),
            trained_at: Utc::now(),
        })
    }

    /// Classify one text.
    pub fn predict(&self, text: &str) -> Result<String> {
        let features = self.vectorizer.transform(text)?;
        Ok(self.model.predict(&features)?.to_string())
    }

    /// Decision score of every supported label, in label order.
    pub fn decision_scores(&self, text: &str) -> Result<Vec<(String, f64)>> {
        let features = self.vectorizer.transform(text)?;
        let scores = self.model.decision_function(&features)?;
        Ok(self.labels().iter().cloned().zip(scores).collect())
    }

    /// Labels this artifact can produce.
    pub fn labels(&self) -> &[String] {
        self.model.labels()
    }

    /// Check whether `label` belongs to this artifact's vocabulary.
    pub fn supports_label(&self, label: &str) -> bool {
        self.labels().binary_search_by(|l| l.as_str().cmp(label)).is_ok()
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn report(&self) -> &EvaluationReport {
        &self.report
    }

    /// Name of the trainer that fitted the model.
    pub fn trainer(&self) -> &str {
        &self.trainer
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }
}
