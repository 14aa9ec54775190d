//! Seeded class balancing and train/validation splitting.

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::corpus::LabeledExample;

/// Count examples per label, in label order.
pub fn class_distribution(examples: &[LabeledExample]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for example in examples {
        *counts.entry(example.label.clone()).or_insert(0) += 1;
    }
    counts
}

/// Undersample every label to the smallest label's count plus a random
/// slack in `0..=max_slack`, never more than the label actually has.
///
/// Labels are visited in sorted order and rows are drawn without
/// replacement, so the result depends only on the input and the RNG state.
/// The output is grouped by label.
pub fn balance_classes(
    examples: Vec<LabeledExample>,
    max_slack: usize,
    rng: &mut StdRng,
) -> Vec<LabeledExample> {
    let mut groups: BTreeMap<String, Vec<LabeledExample>> = BTreeMap::new();
    for example in examples {
        groups.entry(example.label.clone()).or_default().push(example);
    }

    let Some(min_count) = groups.values().map(Vec::len).min() else {
        return Vec::new();
    };

    let mut balanced = Vec::new();
    for (_, mut group) in groups {
        let slack = if max_slack > 0 {
            rng.random_range(0..=max_slack)
        } else {
            0
        };
        let target = (min_count + slack).min(group.len());

        group.shuffle(rng);
        group.truncate(target);
        balanced.extend(group);
    }

    balanced
}

/// Shuffle and split into (train, validation).
///
/// The validation side gets `ceil(n * ratio)` rows, but the train side
/// always keeps at least one row.
pub fn train_validation_split(
    mut examples: Vec<LabeledExample>,
    validation_ratio: f64,
    rng: &mut StdRng,
) -> (Vec<LabeledExample>, Vec<LabeledExample>) {
    examples.shuffle(rng);

    let n = examples.len();
    let n_validation = ((n as f64 * validation_ratio).ceil() as usize).min(n.saturating_sub(1));
    let validation = examples.split_off(n - n_validation);

    (examples, validation)
}
