//! Held-out evaluation metrics.
//!
//! Computes the confusion matrix and per-class precision/recall/F1 from
//! predicted and ground-truth labels.

use serde::{Deserialize, Serialize};

/// 2x2 confusion matrix. `counts[actual][predicted]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    /// Tally predictions against labels. Pairs with a non-binary label are skipped.
    #[must_use]
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Self {
        let mut counts = [[0; 2]; 2];
        for (&a, &p) in actual.iter().zip(predicted) {
            if a < 2 && p < 2 {
                counts[a as usize][p as usize] += 1;
            }
        }
        Self { counts }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }

    /// Metrics for one class, treating it as the positive class.
    #[must_use]
    pub fn class_metrics(&self, class: usize) -> ClassMetrics {
        let other = 1 - class;
        let tp = self.counts[class][class];
        let fp = self.counts[other][class];
        let fn_count = self.counts[class][other];

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_count);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ClassMetrics {
            precision,
            recall,
            f1,
            support: tp + fn_count,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

/// Precision, recall and F1 for a single class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of held-out samples whose actual label is this class.
    pub support: usize,
}

/// Evaluation of a fitted model on the held-out split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    /// Indexed by class label (0, 1).
    pub classes: [ClassMetrics; 2],
}

impl EvaluationReport {
    #[must_use]
    pub fn compute(actual: &[u8], predicted: &[u8]) -> Self {
        let confusion = ConfusionMatrix::from_labels(actual, predicted);
        Self {
            accuracy: ratio(confusion.correct(), confusion.total()),
            classes: [confusion.class_metrics(0), confusion.class_metrics(1)],
            confusion,
        }
    }
}

impl std::fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [[tn, fp], [fn_count, tp]] = self.confusion.counts;
        writeln!(f, "MODEL RESULTS")?;
        writeln!(f, "Overall accuracy: {:.2}", self.accuracy)?;
        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows = actual, columns = predicted):")?;
        writeln!(f, "[[{tn:>4} {fp:>4}]")?;
        writeln!(f, " [{fn_count:>4} {tp:>4}]]")?;
        writeln!(f)?;
        writeln!(f, "CLASSIFICATION REPORT")?;
        for (label, name, m) in [
            (0, "no diabetes", &self.classes[0]),
            (1, "diabetes", &self.classes[1]),
        ] {
            writeln!(
                f,
                "Class {label} ({name}) -> precision: {:.2}, recall: {:.2}, F1: {:.2}, support: {}",
                m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
