//! Evaluation metrics for the trained classifier.
//!
//! Confusion matrix, per-class precision/recall/F1 with support, accuracy,
//! and rank-based AUC-ROC. Zero-denominator cases report 0.0; AUC is `None`
//! when the test partition contains a single class, since the statistic is
//! undefined there.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    /// Rows are actual class (0 then 1), columns are predicted class.
    pub confusion: [[u64; 2]; 2],
    pub legit: ClassMetrics,
    pub fraud: ClassMetrics,
    pub accuracy: f64,
    pub auc_roc: Option<f64>,
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn class_metrics(confusion: &[[u64; 2]; 2], class: usize) -> ClassMetrics {
    let other = 1 - class;
    let true_pos = confusion[class][class];
    let false_pos = confusion[other][class];
    let false_neg = confusion[class][other];

    let precision = ratio(true_pos, true_pos + false_pos);
    let recall = ratio(true_pos, true_pos + false_neg);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    ClassMetrics {
        precision,
        recall,
        f1,
        support: confusion[class][0] + confusion[class][1],
    }
}

/// Compute the full evaluation block from parallel label/prediction/score
/// slices over the test partition.
pub fn evaluate(labels: &[u8], predictions: &[u8], probabilities: &[f64]) -> EvalMetrics {
    debug_assert_eq!(labels.len(), predictions.len());
    debug_assert_eq!(labels.len(), probabilities.len());

    let mut confusion = [[0u64; 2]; 2];
    for (&label, &prediction) in labels.iter().zip(predictions) {
        confusion[label as usize][prediction as usize] += 1;
    }

    let total = labels.len() as u64;
    let correct = confusion[0][0] + confusion[1][1];

    EvalMetrics {
        confusion,
        legit: class_metrics(&confusion, 0),
        fraud: class_metrics(&confusion, 1),
        accuracy: ratio(correct, total),
        auc_roc: roc_auc(labels, probabilities),
    }
}

/// AUC-ROC via the Mann-Whitney rank statistic, with tied scores assigned
/// their average rank. `None` when either class is absent.
pub fn roc_auc(labels: &[u8], probabilities: &[f64]) -> Option<f64> {
    let n_pos = labels.iter().filter(|&&label| label == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| {
        probabilities[a]
            .partial_cmp(&probabilities[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Average ranks across ties (ranks are 1-based).
    let mut ranks = vec![0.0f64; labels.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && probabilities[order[j + 1]] == probabilities[order[i]] {
            j += 1;
        }
        let average_rank = (i + j) as f64 / 2.0 + 1.0;
        for &index in &order[i..=j] {
            ranks[index] = average_rank;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|(&label, _)| label == 1)
        .map(|(_, &rank)| rank)
        .sum();

    let u = positive_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos as f64 * n_neg as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confusion_and_per_class_report() {
        let labels = [0, 0, 1, 1];
        let predictions = [0, 1, 1, 1];
        let probabilities = [0.1, 0.7, 0.8, 0.9];
        let metrics = evaluate(&labels, &predictions, &probabilities);

        assert_eq!(metrics.confusion, [[1, 1], [0, 2]]);
        assert_eq!(metrics.fraud.support, 2);
        assert!((metrics.fraud.precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(metrics.fraud.recall, 1.0);
        assert_eq!(metrics.legit.recall, 0.5);
        assert_eq!(metrics.accuracy, 0.75);
    }

    #[test]
    fn auc_perfect_separation() {
        let labels = [0, 0, 1, 1];
        let probabilities = [0.1, 0.2, 0.8, 0.9];
        assert_eq!(roc_auc(&labels, &probabilities), Some(1.0));
    }

    #[test]
    fn auc_inverted_separation() {
        let labels = [1, 1, 0, 0];
        let probabilities = [0.1, 0.2, 0.8, 0.9];
        assert_eq!(roc_auc(&labels, &probabilities), Some(0.0));
    }

    #[test]
    fn auc_all_tied_is_half() {
        let labels = [0, 1, 0, 1];
        let probabilities = [0.5, 0.5, 0.5, 0.5];
        assert_eq!(roc_auc(&labels, &probabilities), Some(0.5));
    }

    #[test]
    fn auc_undefined_for_single_class() {
        assert_eq!(roc_auc(&[1, 1, 1], &[0.2, 0.4, 0.6]), None);
        assert_eq!(roc_auc(&[0, 0], &[0.2, 0.4]), None);
    }

    #[test]
    fn zero_support_reports_zero_not_nan() {
        // Everything is legit and predicted legit: fraud metrics degrade
        // to 0.0 rather than NaN.
        let metrics = evaluate(&[0, 0], &[0, 0], &[0.1, 0.2]);
        assert_eq!(metrics.fraud.precision, 0.0);
        assert_eq!(metrics.fraud.recall, 0.0);
        assert_eq!(metrics.fraud.f1, 0.0);
        assert_eq!(metrics.accuracy, 1.0);
    }
}
