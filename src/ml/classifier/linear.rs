//! Linear decision functions and the trainers that fit them.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tfidf::SparseVector;
use super::trainer::CancellationFlag;
use crate::error::{Result, ToneError};

/// A fitted linear classifier: one weight row and bias per label.
///
/// Deserialization runs the same shape checks as [`LinearModel::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredModel")]
pub struct LinearModel {
    /// Label vocabulary, sorted; row `k` scores `labels[k]`.
    labels: Vec<String>,
    /// Dense weight rows, one per label.
    weights: Vec<Vec<f64>>,
    /// Bias per label.
    intercepts: Vec<f64>,
    /// Dimension of the feature space.
    n_features: usize,
}

#[derive(Deserialize)]
struct StoredModel {
    labels: Vec<String>,
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    n_features: usize,
}

impl TryFrom<StoredModel> for LinearModel {
    type Error = ToneError;

    fn try_from(stored: StoredModel) -> Result<Self> {
        let model = LinearModel::new(stored.labels, stored.weights, stored.intercepts)?;
        if model.n_features != stored.n_features {
            return Err(ToneError::prediction(format!(
                "weight rows have {} features but the model declares {}",
                model.n_features, stored.n_features
            )));
        }
        Ok(model)
    }
}

impl LinearModel {
    /// Build a model from its parts.
    pub fn new(labels: Vec<String>, weights: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Result<Self> {
        if labels.len() < 2 {
            return Err(ToneError::data_quality(
                "a classifier needs at least two labels",
            ));
        }
        if weights.len() != labels.len() || intercepts.len() != labels.len() {
            return Err(ToneError::invalid_argument(
                "weights and intercepts must have one entry per label",
            ));
        }
        let n_features = weights[0].len();
        if weights.iter().any(|row| row.len() != n_features) {
            return Err(ToneError::invalid_argument(
                "all weight rows must have the same length",
            ));
        }

        Ok(LinearModel {
            labels,
            weights,
            intercepts,
            n_features,
        })
    }

    /// Score every label for one feature vector.
    pub fn decision_function(&self, features: &SparseVector) -> Result<Vec<f64>> {
        if let Some(&(idx, _)) = features.iter().find(|(idx, _)| *idx >= self.n_features) {
            return Err(ToneError::prediction(format!(
                "feature index {idx} outside model dimension {}",
                self.n_features
            )));
        }

        Ok(self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, bias)| bias + sparse_dot(row, features))
            .collect())
    }

    /// Highest-scoring label; ties go to the earlier label.
    pub fn predict(&self, features: &SparseVector) -> Result<&str> {
        let scores = self.decision_function(features)?;
        let best = argmax(&scores);
        Ok(&self.labels[best])
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Fits a [`LinearModel`] on vectorized examples.
///
/// `targets[i]` is the index into `labels` of example `i`.
pub trait LinearTrainer: Send + Sync {
    fn fit(
        &self,
        features: &[SparseVector],
        targets: &[usize],
        labels: Vec<String>,
        n_features: usize,
        cancel: &CancellationFlag,
    ) -> Result<LinearModel>;

    /// Get the name of this trainer.
    fn name(&self) -> &'static str;
}

/// Multinomial logistic regression, full-batch gradient descent with L2.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub max_iter: usize,
    pub learning_rate: f64,
    pub l2: f64,
}

impl LogisticRegression {
    /// Stop once the largest gradient component falls below this.
    const TOLERANCE: f64 = 1e-5;
}

impl LinearTrainer for LogisticRegression {
    fn fit(
        &self,
        features: &[SparseVector],
        targets: &[usize],
        labels: Vec<String>,
        n_features: usize,
        cancel: &CancellationFlag,
    ) -> Result<LinearModel> {
        check_inputs(features, targets, &labels)?;

        let n_labels = labels.len();
        let n = features.len() as f64;
        let mut weights = vec![vec![0.0; n_features]; n_labels];
        let mut intercepts = vec![0.0; n_labels];

        for iteration in 0..self.max_iter {
            cancel.check("logistic regression training")?;

            let mut grad_w = vec![vec![0.0; n_features]; n_labels];
            let mut grad_b = vec![0.0; n_labels];

            for (x, &target) in features.iter().zip(targets) {
                let scores: Vec<f64> = weights
                    .iter()
                    .zip(&intercepts)
                    .map(|(row, bias)| bias + sparse_dot(row, x))
                    .collect();
                let probabilities = softmax(&scores);

                for (k, p) in probabilities.into_iter().enumerate() {
                    let error = p - if k == target { 1.0 } else { 0.0 };
                    grad_b[k] += error;
                    for &(idx, value) in x {
                        grad_w[k][idx] += error * value;
                    }
                }
            }

            let mut max_gradient: f64 = 0.0;
            for k in 0..n_labels {
                for j in 0..n_features {
                    let g = grad_w[k][j] / n + self.l2 * weights[k][j];
                    weights[k][j] -= self.learning_rate * g;
                    max_gradient = max_gradient.max(g.abs());
                }
                let g = grad_b[k] / n;
                intercepts[k] -= self.learning_rate * g;
                max_gradient = max_gradient.max(g.abs());
            }

            if max_gradient < Self::TOLERANCE {
                log::debug!("Logistic regression converged after {} iterations", iteration + 1);
                break;
            }
        }

        LinearModel::new(labels, weights, intercepts)
    }

    fn name(&self) -> &'static str {
        "logistic_regression"
    }
}

/// One-vs-rest linear SVM fitted by hinge-loss SGD.
///
/// Uses the `1 / (alpha * (t0 + t))` learning-rate schedule with L2
/// shrinkage applied through a scale factor, and stops a label early when
/// its epoch loss has not improved for a few epochs.
#[derive(Debug, Clone)]
pub struct HingeSgd {
    pub alpha: f64,
    pub max_iter: usize,
    pub seed: u64,
}

impl HingeSgd {
    const TOLERANCE: f64 = 1e-3;
    const N_ITER_NO_CHANGE: usize = 5;
    const INTERCEPT_DECAY: f64 = 0.01;

    fn fit_binary(
        &self,
        features: &[SparseVector],
        signs: &[f64],
        n_features: usize,
        seed: u64,
        cancel: &CancellationFlag,
    ) -> Result<(Vec<f64>, f64)> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..features.len()).collect();

        let typical_weight = self.alpha.sqrt().sqrt().recip();
        let t0 = 1.0 / (typical_weight * self.alpha);

        let mut v = vec![0.0; n_features];
        let mut scale = 1.0;
        let mut bias = 0.0;
        let mut t = 0.0;

        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0;

        for _ in 0..self.max_iter {
            cancel.check("hinge SGD training")?;
            order.shuffle(&mut rng);

            let mut epoch_loss = 0.0;
            for &i in &order {
                let x = &features[i];
                let y = signs[i];

                t += 1.0;
                let eta = 1.0 / (self.alpha * (t0 + t));
                let margin = y * (scale * sparse_dot(&v, x) + bias);
                epoch_loss += (1.0 - margin).max(0.0);

                scale *= 1.0 - eta * self.alpha;
                if margin < 1.0 {
                    for &(idx, value) in x {
                        v[idx] += eta * y * value / scale;
                    }
                    bias += eta * y * Self::INTERCEPT_DECAY;
                }

                if scale < 1e-9 {
                    v.iter_mut().for_each(|w| *w *= scale);
                    scale = 1.0;
                }
            }

            if epoch_loss > best_loss - Self::TOLERANCE * features.len() as f64 {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }
            best_loss = best_loss.min(epoch_loss);
            if no_improvement >= Self::N_ITER_NO_CHANGE {
                break;
            }
        }

        v.iter_mut().for_each(|w| *w *= scale);
        Ok((v, bias))
    }
}

impl LinearTrainer for HingeSgd {
    fn fit(
        &self,
        features: &[SparseVector],
        targets: &[usize],
        labels: Vec<String>,
        n_features: usize,
        cancel: &CancellationFlag,
    ) -> Result<LinearModel> {
        check_inputs(features, targets, &labels)?;

        let rows: Vec<(Vec<f64>, f64)> = (0..labels.len())
            .into_par_iter()
            .map(|k| {
                let signs: Vec<f64> = targets
                    .iter()
                    .map(|&target| if target == k { 1.0 } else { -1.0 })
                    .collect();
                self.fit_binary(
                    features,
                    &signs,
                    n_features,
                    self.seed.wrapping_add(k as u64),
                    cancel,
                )
            })
            .collect::<Result<_>>()?;

        let (weights, intercepts) = rows.into_iter().unzip();
        LinearModel::new(labels, weights, intercepts)
    }

    fn name(&self) -> &'static str {
        "hinge_sgd"
    }
}

fn check_inputs(features: &[SparseVector], targets: &[usize], labels: &[String]) -> Result<()> {
    if features.is_empty() || features.len() != targets.len() {
        return Err(ToneError::data_quality(
            "training needs one target per non-empty feature row",
        ));
    }
    if targets.iter().any(|&target| target >= labels.len()) {
        return Err(ToneError::invalid_argument("target index outside label set"));
    }
    Ok(())
}

fn sparse_dot(dense: &[f64], sparse: &SparseVector) -> f64 {
    sparse.iter().map(|&(idx, value)| dense[idx] * value).sum()
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = idx;
        }
    }
    best
}
