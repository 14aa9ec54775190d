//! Configuration for profiling and training.
//!
//! [`ToneConfig`] is the root structure. It deserializes from JSON and every
//! field falls back to its default, so a config file only needs to name the
//! values it overrides:
//!
//! ```
//! use tonescope::config::ToneConfig;
//!
//! let config = ToneConfig::from_json(r#"{ "models_dir": "/tmp/models" }"#).unwrap();
//! assert_eq!(config.tone.seed, 42);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ToneError};
use crate::ml::classifier::ModelKind;
use crate::profile::AggregationRules;
use crate::scoring::formality::FormalityWeights;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Directory holding the persisted classifier artifacts.
    pub models_dir: PathBuf,

    /// Training pipeline for the emotion classifier.
    pub emotion: TrainingConfig,

    /// Training pipeline for the tone classifier.
    pub tone: TrainingConfig,

    /// Weights of the formality sub-signals.
    pub formality: FormalityWeights,

    /// Thresholds of the feedback and suggestion rules.
    pub rules: AggregationRules,
}

impl Default for ToneConfig {
    fn default() -> Self {
        ToneConfig {
            models_dir: PathBuf::from("models"),
            emotion: TrainingConfig::emotion(),
            tone: TrainingConfig::tone(),
            formality: FormalityWeights::default(),
            rules: AggregationRules::default(),
        }
    }
}

impl ToneConfig {
    /// Parse a configuration from a JSON string.
    ///
    /// The document is overlaid onto [`ToneConfig::default`], so nested
    /// sections keep their per-kind defaults for fields left out.
    pub fn from_json(json: &str) -> Result<Self> {
        let overlay: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(ToneConfig::default())?;
        merge_json(&mut merged, overlay);

        let config: ToneConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ToneError::invalid_config(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Set the model directory.
    pub fn with_models_dir<P: Into<PathBuf>>(mut self, models_dir: P) -> Self {
        self.models_dir = models_dir.into();
        self
    }

    /// Get the training pipeline for a model kind.
    pub fn training(&self, kind: ModelKind) -> &TrainingConfig {
        match kind {
            ModelKind::Emotion => &self.emotion,
            ModelKind::Tone => &self.tone,
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.emotion.validate()?;
        self.tone.validate()?;
        Ok(())
    }
}

/// Recursively overlay `overlay` onto `base`. An object carrying a different
/// `type` tag replaces the base object instead of merging into it.
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            if overlay_map.contains_key("type") && overlay_map.get("type") != base_map.get("type") {
                *base_map = overlay_map;
                return;
            }
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Training pipeline for one classifier kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Name of the free-text column in a CSV corpus.
    pub text_column: String,

    /// Name of the label column in a CSV corpus.
    pub label_column: String,

    /// Texts whose trimmed length does not exceed this many characters are
    /// dropped as noise.
    pub min_text_length: usize,

    /// Feature extraction settings.
    pub vectorizer: VectorizerConfig,

    /// Class balancing settings.
    pub balance: BalanceConfig,

    /// Fraction of the balanced corpus held out for evaluation.
    pub validation_ratio: f64,

    /// Seed for balancing, splitting and training.
    pub seed: u64,

    /// Linear model family and its hyper-parameters.
    pub model: ModelConfig,
}

impl TrainingConfig {
    /// Emotion pipeline: logistic regression over the 5000 most frequent
    /// unigrams and bigrams, every label capped at the smallest class.
    pub fn emotion() -> Self {
        TrainingConfig {
            text_column: "content".to_string(),
            label_column: "sentiment".to_string(),
            min_text_length: 0,
            vectorizer: VectorizerConfig {
                max_features: Some(5000),
                ..VectorizerConfig::default()
            },
            balance: BalanceConfig { max_slack: 0 },
            validation_ratio: 0.2,
            seed: 42,
            model: ModelConfig::default(),
        }
    }

    /// Tone pipeline: hinge-loss SGD, terms pruned by document frequency,
    /// labels capped near the smallest class with up to 50 rows of slack.
    pub fn tone() -> Self {
        TrainingConfig {
            text_column: "content".to_string(),
            label_column: "tone".to_string(),
            min_text_length: 10,
            vectorizer: VectorizerConfig {
                min_df: 2,
                max_df: 0.9,
                ..VectorizerConfig::default()
            },
            balance: BalanceConfig { max_slack: 50 },
            validation_ratio: 0.2,
            seed: 42,
            model: ModelConfig::HingeSgd {
                alpha: 1e-4,
                max_iter: 1000,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.validation_ratio) {
            return Err(ToneError::invalid_config(format!(
                "validation_ratio must be in [0, 1), got {}",
                self.validation_ratio
            )));
        }
        self.vectorizer.validate()?;
        self.model.validate()
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::emotion()
    }
}

/// TF-IDF feature extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Smallest and largest n-gram size.
    pub ngram_range: (usize, usize),

    /// Keep only the most frequent terms across the corpus.
    pub max_features: Option<usize>,

    /// Ignore terms appearing in fewer documents than this.
    pub min_df: usize,

    /// Ignore terms appearing in a larger fraction of documents than this.
    pub max_df: f64,

    /// Remove English stop words before building n-grams.
    pub stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            ngram_range: (1, 2),
            max_features: None,
            min_df: 1,
            max_df: 1.0,
            stop_words: true,
        }
    }
}

impl VectorizerConfig {
    fn validate(&self) -> Result<()> {
        let (low, high) = self.ngram_range;
        if low == 0 || low > high {
            return Err(ToneError::invalid_config(format!(
                "invalid ngram_range ({low}, {high})"
            )));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(ToneError::invalid_config(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.max_features == Some(0) {
            return Err(ToneError::invalid_config("max_features must be positive"));
        }
        Ok(())
    }
}

/// Class balancing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Upper bound of the random extra rows each label may keep above the
    /// smallest label's count.
    pub max_slack: usize,
}

/// Linear model family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Multinomial logistic regression trained by full-batch gradient descent.
    LogisticRegression {
        max_iter: usize,
        learning_rate: f64,
        l2: f64,
    },
    /// One-vs-rest linear SVM trained by hinge-loss SGD.
    HingeSgd { alpha: f64, max_iter: usize },
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::LogisticRegression {
            max_iter: 1000,
            learning_rate: 1.0,
            l2: 1e-4,
        }
    }
}

impl ModelConfig {
    /// Short name of the model family.
    pub fn name(&self) -> &'static str {
        match self {
            ModelConfig::LogisticRegression { .. } => "logistic_regression",
            ModelConfig::HingeSgd { .. } => "hinge_sgd",
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            ModelConfig::LogisticRegression {
                max_iter,
                learning_rate,
                l2,
            } => {
                if max_iter == 0 || learning_rate <= 0.0 || l2 < 0.0 {
                    return Err(ToneError::invalid_config(
                        "logistic regression needs max_iter > 0, learning_rate > 0, l2 >= 0",
                    ));
                }
            }
            ModelConfig::HingeSgd { alpha, max_iter } => {
                if max_iter == 0 || alpha <= 0.0 {
                    return Err(ToneError::invalid_config(
                        "hinge SGD needs max_iter > 0 and alpha > 0",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_pipelines() {
        let config = ToneConfig::default();

        assert_eq!(config.emotion.label_column, "sentiment");
        assert_eq!(config.emotion.vectorizer.max_features, Some(5000));
        assert_eq!(config.emotion.model.name(), "logistic_regression");

        assert_eq!(config.tone.label_column, "tone");
        assert_eq!(config.tone.vectorizer.min_df, 2);
        assert_eq!(config.tone.balance.max_slack, 50);
        assert_eq!(config.tone.model.name(), "hinge_sgd");
        assert_eq!(config.training(ModelKind::Tone).min_text_length, 10);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ToneConfig::from_json(
            r#"{
                "models_dir": "artifacts",
                "tone": { "seed": 7, "model": { "type": "hinge_sgd", "alpha": 0.001, "max_iter": 20 } },
                "rules": { "formal_feedback": 80.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.models_dir, PathBuf::from("artifacts"));
        assert_eq!(config.tone.seed, 7);
        assert_eq!(config.tone.label_column, "tone");
        assert_eq!(config.tone.vectorizer.min_df, 2);
        assert_eq!(config.rules.formal_feedback, 80.0);
        assert_eq!(config.rules.strong_positive, 0.5);
        assert_eq!(config.emotion.seed, 42);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ToneConfig::from_json(r#"{ "emotion": { "validation_ratio": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(err, ToneError::InvalidConfig(_)));

        let err = ToneConfig::from_json(r#"{ "tone": { "vectorizer": { "ngram_range": [2, 1] } } }"#)
            .unwrap_err();
        assert!(matches!(err, ToneError::InvalidConfig(_)));
    }
}
