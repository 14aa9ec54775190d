//! End-to-end training run: clean, balance, split, vectorize, fit, evaluate.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::ModelKind;
use super::artifact::ClassifierArtifact;
use super::corpus::{LabeledExample, clean_corpus, load_corpus};
use super::linear::{HingeSgd, LinearTrainer, LogisticRegression};
use super::metrics::EvaluationReport;
use super::sampling::{balance_classes, class_distribution, train_validation_split};
use super::store::ModelStore;
use super::tfidf::TfIdfVectorizer;
use crate::config::{ModelConfig, TrainingConfig};
use crate::error::{Result, ToneError};

/// Shared abort switch for a training run.
///
/// Clones share the same flag; cancelling any clone makes the run stop at
/// its next checkpoint with [`ToneError::OperationCancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with `OperationCancelled` if cancellation was requested.
    pub fn check(&self, stage: &str) -> Result<()> {
        if self.is_cancelled() {
            Err(ToneError::cancelled(stage.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Trains one classifier kind from a labeled corpus.
#[derive(Debug, Clone)]
pub struct Trainer {
    kind: ModelKind,
    config: TrainingConfig,
    cancel: CancellationFlag,
}

impl Trainer {
    pub fn new(kind: ModelKind, config: TrainingConfig) -> Self {
        Trainer {
            kind,
            config,
            cancel: CancellationFlag::new(),
        }
    }

    /// Use an externally owned cancellation flag.
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that aborts this trainer's runs.
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Load a corpus file and train on it.
    pub fn train_file<P: AsRef<Path>>(&self, path: P) -> Result<ClassifierArtifact> {
        let corpus = load_corpus(path, &self.config)?;
        self.train(corpus)
    }

    /// Train under the kind's exclusive lock and persist the artifact.
    ///
    /// Nothing is written unless training completes.
    pub fn train_into(
        &self,
        corpus: Vec<LabeledExample>,
        store: &ModelStore,
    ) -> Result<ClassifierArtifact> {
        let _lock = store.lock_training(self.kind)?;
        let artifact = self.train(corpus)?;
        self.cancel.check("before persisting")?;
        store.save(&artifact)?;
        Ok(artifact)
    }

    /// Run the full pipeline and return the fitted artifact.
    pub fn train(&self, corpus: Vec<LabeledExample>) -> Result<ClassifierArtifact> {
        let kind = self.kind;
        if corpus.is_empty() {
            return Err(ToneError::data_quality(format!("{kind} corpus is empty")));
        }

        let cleaned = clean_corpus(corpus, self.config.min_text_length);
        let distribution_before = class_distribution(&cleaned);
        if distribution_before.len() < 2 {
            return Err(ToneError::data_quality(format!(
                "{kind} corpus needs at least two labels after cleaning, found {}",
                distribution_before.len()
            )));
        }
        log::info!("{kind} class distribution before balancing: {distribution_before:?}");
        self.cancel.check("after cleaning")?;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let balanced = balance_classes(cleaned, self.config.balance.max_slack, &mut rng);
        let distribution_after = class_distribution(&balanced);
        log::info!("{kind} class distribution after balancing: {distribution_after:?}");

        let (train, validation) =
            train_validation_split(balanced, self.config.validation_ratio, &mut rng);
        log::info!(
            "{kind} split: {} training rows, {} validation rows",
            train.len(),
            validation.len()
        );

        let labels: Vec<String> = class_distribution(&train).into_keys().collect();
        if labels.len() < 2 {
            return Err(ToneError::data_quality(format!(
                "{kind} training split holds a single label; the corpus is too small"
            )));
        }
        self.cancel.check("after splitting")?;

        let texts: Vec<String> = train.iter().map(|example| example.text.clone()).collect();
        let mut vectorizer = TfIdfVectorizer::new(self.config.vectorizer.clone());
        let features = vectorizer.fit_transform(&texts)?;
        let targets: Vec<usize> = train
            .iter()
            .map(|example| label_index(&labels, &example.label))
            .collect::<Result<_>>()?;
        self.cancel.check("after vectorizing")?;

        let trainer = self.linear_trainer();
        let model = trainer.fit(
            &features,
            &targets,
            labels,
            vectorizer.vocabulary_size(),
            &self.cancel,
        )?;

        // validation may hold labels the model never saw
        let mut evaluation_labels: Vec<String> = model.labels().to_vec();
        evaluation_labels.extend(validation.iter().map(|example| example.label.clone()));
        evaluation_labels.sort();
        evaluation_labels.dedup();

        let mut truth = Vec::with_capacity(validation.len());
        let mut predicted = Vec::with_capacity(validation.len());
        for example in &validation {
            let label = model.predict(&vectorizer.transform(&example.text)?)?;
            truth.push(label_index(&evaluation_labels, &example.label)?);
            predicted.push(label_index(&evaluation_labels, label)?);
        }

        let report = EvaluationReport {
            distribution_before,
            distribution_after,
            train_size: train.len(),
            ..EvaluationReport::evaluate(&evaluation_labels, &truth, &predicted)
        };
        log::info!(
            "{kind} model trained with {}: accuracy {:.4}, precision {:.4}, recall {:.4}, f1 {:.4}",
            trainer.name(),
            report.accuracy,
            report.precision,
            report.recall,
            report.f1
        );

        ClassifierArtifact::new(kind, vectorizer, model, report, trainer.name())
    }

    fn linear_trainer(&self) -> Box<dyn LinearTrainer> {
        match self.config.model {
            ModelConfig::LogisticRegression {
                max_iter,
                learning_rate,
                l2,
            } => Box::new(LogisticRegression {
                max_iter,
                learning_rate,
                l2,
            }),
            ModelConfig::HingeSgd { alpha, max_iter } => Box::new(HingeSgd {
                alpha,
                max_iter,
                seed: self.config.seed,
            }),
        }
    }
}

fn label_index(labels: &[String], label: &str) -> Result<usize> {
    labels
        .binary_search_by(|l| l.as_str().cmp(label))
        .map_err(|_| ToneError::prediction(format!("label '{label}' outside label set")))
}
