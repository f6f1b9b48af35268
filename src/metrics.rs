//! Confusion-derived evaluation metrics for binary and multi-class predictions
//!
//! Every value is a percentage in `[0, 100]`. Precision and recall are 100
//! when their denominator is zero (the numerator is then zero as well); F1 is 0
//! when precision and recall are both 0.

use crate::core::{Result, TsvmError};
use crate::utils::validation::{class_labels, validate_binary_labels};
use serde::{Deserialize, Serialize};

/// Confusion counts relative to a positive class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    /// Count outcomes treating `positive` as the positive class and every
    /// other label as negative
    pub fn one_vs_rest(y_true: &[f64], y_pred: &[f64], positive: f64) -> Self {
        let mut counts = Self::default();
        for (&actual, &predicted) in y_true.iter().zip(y_pred) {
            match (actual == positive, predicted == positive) {
                (true, true) => counts.true_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (false, true) => counts.false_positives += 1,
                (true, false) => counts.false_negatives += 1,
            }
        }
        counts
    }

    /// Total number of samples counted
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Recall of the positive class, TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        percentage(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Precision of the positive class, TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        percentage(self.true_positives, self.true_positives + self.false_positives)
    }

    /// F1 score of the positive class
    pub fn f1_score(&self) -> f64 {
        f1(self.precision(), self.recall())
    }

    /// The same counts seen from the negative class
    pub fn swapped(&self) -> Self {
        Self {
            true_positives: self.true_negatives,
            true_negatives: self.true_positives,
            false_positives: self.false_negatives,
            false_negatives: self.false_positives,
        }
    }
}

/// Metrics of a binary (+1/-1) prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryMetrics {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub accuracy: f64,
    pub recall_pos: f64,
    pub precision_pos: f64,
    pub f1_pos: f64,
    pub recall_neg: f64,
    pub precision_neg: f64,
    pub f1_neg: f64,
}

/// One-vs-rest metrics of a single class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: f64,
    pub counts: ConfusionCounts,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Metrics of a multi-class prediction, one row per class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiClassMetrics {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
}

/// Metrics of one evaluated fold or split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricsReport {
    Binary(BinaryMetrics),
    MultiClass(MultiClassMetrics),
}

impl MetricsReport {
    /// Overall accuracy in percent
    pub fn accuracy(&self) -> f64 {
        match self {
            Self::Binary(m) => m.accuracy,
            Self::MultiClass(m) => m.accuracy,
        }
    }
}

fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        100.0
    } else {
        100.0 * numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn check_shapes(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.is_empty() || y_pred.is_empty() {
        return Err(TsvmError::ShapeMismatch(
            "label vectors must not be empty".to_string(),
        ));
    }
    if y_true.len() != y_pred.len() {
        return Err(TsvmError::ShapeMismatch(format!(
            "{} true labels but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

fn exact_match_accuracy(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let correct = y_true.iter().zip(y_pred).filter(|(a, b)| a == b).count();
    percentage(correct, y_true.len())
}

/// Binary metrics; both vectors must contain only +1/-1
pub fn binary(y_true: &[f64], y_pred: &[f64]) -> Result<BinaryMetrics> {
    check_shapes(y_true, y_pred)?;
    validate_binary_labels(y_true)?;
    validate_binary_labels(y_pred)?;

    let pos = ConfusionCounts::one_vs_rest(y_true, y_pred, 1.0);
    let neg = pos.swapped();

    Ok(BinaryMetrics {
        tp: pos.true_positives,
        tn: pos.true_negatives,
        fp: pos.false_positives,
        fn_: pos.false_negatives,
        accuracy: percentage(pos.true_positives + pos.true_negatives, pos.total()),
        recall_pos: pos.recall(),
        precision_pos: pos.precision(),
        f1_pos: pos.f1_score(),
        recall_neg: neg.recall(),
        precision_neg: neg.precision(),
        f1_neg: neg.f1_score(),
    })
}

/// Per-class one-vs-rest metrics over the sorted union of observed labels
pub fn multiclass(y_true: &[f64], y_pred: &[f64]) -> Result<MultiClassMetrics> {
    check_shapes(y_true, y_pred)?;

    let mut all = y_true.to_vec();
    all.extend_from_slice(y_pred);

    let classes = class_labels(&all)
        .into_iter()
        .map(|label| {
            let counts = ConfusionCounts::one_vs_rest(y_true, y_pred, label);
            ClassMetrics {
                label,
                counts,
                precision: counts.precision(),
                recall: counts.recall(),
                f1: counts.f1_score(),
            }
        })
        .collect();

    Ok(MultiClassMetrics {
        accuracy: exact_match_accuracy(y_true, y_pred),
        classes,
    })
}

/// Binary report when every label is +1/-1, multi-class report otherwise
pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<MetricsReport> {
    check_shapes(y_true, y_pred)?;
    let is_binary = y_true
        .iter()
        .chain(y_pred)
        .all(|&l| l == 1.0 || l == -1.0);

    if is_binary {
        binary(y_true, y_pred).map(MetricsReport::Binary)
    } else {
        multiclass(y_true, y_pred).map(MetricsReport::MultiClass)
    }
}
