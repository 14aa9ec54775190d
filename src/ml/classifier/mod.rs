//! Trainable text classification: TF-IDF features feeding a linear model.
//!
//! Two independent instances exist, addressed by [`ModelKind`]. Training is
//! an offline batch run that fails hard and never persists a partial
//! artifact. Prediction fails soft: it returns a [`Prediction`] whose
//! degraded variants carry the `"Error"` sentinel label.
//!
//! # Architecture
//!
//! - `corpus`: labeled examples, CSV/JSON loading and cleaning
//! - `sampling`: seeded class balancing and train/validation split
//! - `tfidf`: the fitted feature transform
//! - `linear`: linear decision functions and their trainers
//! - `metrics`: weighted evaluation report
//! - `artifact`: the persisted vectorizer + model bundle
//! - `store`: atomic artifact slots on a [`Storage`](crate::storage::Storage)
//! - `trainer`: the end-to-end training run
//! - `predictor`: cached inference with the sentinel contract
//!
//! # Example
//!
//! ```
//! use tonescope::config::TrainingConfig;
//! use tonescope::ml::classifier::{LabeledExample, ModelKind, ModelStore, Predictor, Trainer};
//! use tonescope::storage::memory::MemoryStorage;
//! use std::sync::Arc;
//!
//! let store = ModelStore::new(Arc::new(MemoryStorage::default()));
//! let predictor = Predictor::new(store.clone());
//! assert_eq!(predictor.predict(ModelKind::Tone, "hello there").label(), "Error");
//!
//! let corpus: Vec<LabeledExample> = (0..20)
//!     .flat_map(|i| {
//!         [
//!             LabeledExample::new(format!("thank you so much, wonderful news {i}"), "joy"),
//!             LabeledExample::new(format!("this is terrible and scary {i}"), "fear"),
//!         ]
//!     })
//!     .collect();
//!
//! let artifact = Trainer::new(ModelKind::Tone, TrainingConfig::tone())
//!     .train(corpus)
//!     .unwrap();
//! store.save(&artifact).unwrap();
//! predictor.invalidate(ModelKind::Tone);
//!
//! assert_eq!(predictor.predict(ModelKind::Tone, "wonderful news, thank you").label(), "joy");
//! ```

mod artifact;
mod corpus;
mod linear;
mod metrics;
mod predictor;
mod sampling;
mod store;
mod tfidf;
mod trainer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ToneError;

pub use artifact::ClassifierArtifact;
pub use corpus::{LabeledExample, clean_corpus, load_corpus, load_csv, load_json, read_csv};
pub use linear::{HingeSgd, LinearModel, LinearTrainer, LogisticRegression};
pub use metrics::{EvaluationReport, LabelMetrics};
pub use predictor::{ERROR_LABEL, Prediction, Predictor};
pub use sampling::{balance_classes, class_distribution, train_validation_split};
pub use store::ModelStore;
pub use tfidf::{SparseVector, TfIdfVectorizer};
pub use trainer::{CancellationFlag, Trainer};

/// The two classifier instances.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Emotion detected in the text (e.g. joy, fear, anger).
    Emotion,
    /// Communication tone of the text.
    Tone,
}

impl ModelKind {
    /// Both kinds, in slot order.
    pub const ALL: [ModelKind; 2] = [ModelKind::Emotion, ModelKind::Tone];

    /// Lower-case name used for slots, locks and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Emotion => "emotion",
            ModelKind::Tone => "tone",
        }
    }

    /// Name of the storage slot holding this kind's artifact.
    pub fn file_name(&self) -> String {
        format!("{}.model.json", self.as_str())
    }

    /// Name of the lock held while this kind is being trained.
    pub fn lock_name(&self) -> String {
        format!("{}.train", self.as_str())
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ToneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emotion" => Ok(ModelKind::Emotion),
            "tone" => Ok(ModelKind::Tone),
            other => Err(ToneError::invalid_argument(format!(
                "unknown model kind '{other}', expected 'emotion' or 'tone'"
            ))),
        }
    }
}
