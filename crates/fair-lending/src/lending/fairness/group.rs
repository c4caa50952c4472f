use serde::{Deserialize, Serialize};

/// 2×2 confusion matrix for binary approval labels (1 = approved).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_positives: usize,
}

impl ConfusionMatrix {
    pub fn tally(pairs: impl IntoIterator<Item = (u8, u8)>) -> Self {
        let mut matrix = Self::default();
        for (truth, predicted) in pairs {
            match (truth, predicted) {
                (0, 0) => matrix.true_negatives += 1,
                (0, _) => matrix.false_positives += 1,
                (_, 0) => matrix.false_negatives += 1,
                _ => matrix.true_positives += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> usize {
        self.true_negatives + self.false_positives + self.false_negatives + self.true_positives
    }
}

/// Classification rates for one side of the protected attribute.
///
/// Every rate falls back to 0 when its denominator is empty so sparse groups still report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub true_positive_rate: f64,
    pub false_positive_rate: f64,
    pub approval_rate: f64,
    pub accuracy: f64,
    pub size: usize,
}

impl GroupMetrics {
    pub fn from_confusion(matrix: &ConfusionMatrix) -> Self {
        let ConfusionMatrix {
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
            true_positives: tp,
        } = *matrix;
        let total = matrix.total();

        Self {
            true_positive_rate: ratio(tp, tp + fn_),
            false_positive_rate: ratio(fp, fp + tn),
            approval_rate: ratio(tp + fp, total),
            accuracy: ratio(tp + tn, total),
            size: total,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
