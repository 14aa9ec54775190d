//! Validation metrics.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Precision, recall and F1 of a single label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of validation rows carrying this label.
    pub support: usize,
}

/// Result of evaluating a trained model on its validation split.
///
/// Averages are weighted by label support; a ratio with a zero
/// denominator counts as 0. The metrics are reported only and never
/// block persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub per_label: BTreeMap<String, LabelMetrics>,
    /// Rows per label after cleaning, before balancing.
    pub distribution_before: BTreeMap<String, usize>,
    /// Rows per label after balancing.
    pub distribution_after: BTreeMap<String, usize>,
    pub train_size: usize,
    pub validation_size: usize,
}

impl EvaluationReport {
    /// Compute the metrics from label indices.
    pub fn evaluate(labels: &[String], truth: &[usize], predicted: &[usize]) -> Self {
        let n_labels = labels.len();
        let mut true_positive = vec![0usize; n_labels];
        let mut predicted_count = vec![0usize; n_labels];
        let mut support = vec![0usize; n_labels];

        for (&t, &p) in truth.iter().zip(predicted) {
            support[t] += 1;
            predicted_count[p] += 1;
            if t == p {
                true_positive[t] += 1;
            }
        }

        let total = truth.len();
        let mut report = EvaluationReport {
            accuracy: ratio(true_positive.iter().sum(), total),
            validation_size: total,
            ..EvaluationReport::default()
        };

        for (k, label) in labels.iter().enumerate() {
            let precision = ratio(true_positive[k], predicted_count[k]);
            let recall = ratio(true_positive[k], support[k]);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            if total > 0 {
                let weight = support[k] as f64 / total as f64;
                report.precision += weight * precision;
                report.recall += weight * recall;
                report.f1 += weight * f1;
            }

            report.per_label.insert(
                label.clone(),
                LabelMetrics {
                    precision,
                    recall,
                    f1,
                    support: support[k],
                },
            );
        }

        report
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy : {:.4}", self.accuracy)?;
        writeln!(f, "Precision: {:.4}", self.precision)?;
        writeln!(f, "Recall   : {:.4}", self.recall)?;
        write!(f, "F1 Score : {:.4}", self.f1)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
