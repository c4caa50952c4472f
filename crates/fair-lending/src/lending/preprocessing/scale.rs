use serde::{Deserialize, Serialize};

use super::features::{FeatureRow, NumericFeature};

/// Standardization parameters for the numeric block, frozen at fit time.
///
/// Variance uses the population convention (divide by `n`). Constant columns keep a scale
/// of 1 and are centred on their single value, so they standardize to exactly zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    means: [f64; NumericFeature::COUNT],
    scales: [f64; NumericFeature::COUNT],
}

impl ScalerParams {
    pub fn fit(rows: &[FeatureRow]) -> Self {
        let mut means = [0.0; NumericFeature::COUNT];
        let mut scales = [1.0; NumericFeature::COUNT];
        if rows.is_empty() {
            return Self { means, scales };
        }

        let count = rows.len() as f64;
        for feature in NumericFeature::ordered() {
            let index = feature.index();
            let first = rows[0].numeric[index];
            let constant = rows.iter().all(|row| row.numeric[index] == first);
            if constant {
                means[index] = first;
                continue;
            }

            let mean = rows.iter().map(|row| row.numeric[index]).sum::<f64>() / count;
            let variance = rows
                .iter()
                .map(|row| {
                    let delta = row.numeric[index] - mean;
                    delta * delta
                })
                .sum::<f64>()
                / count;
            let std = variance.sqrt();

            means[index] = mean;
            scales[index] = if std.is_finite() && std > 0.0 { std } else { 1.0 };
        }

        Self { means, scales }
    }

    pub fn mean(&self, feature: NumericFeature) -> f64 {
        self.means[feature.index()]
    }

    pub fn scale(&self, feature: NumericFeature) -> f64 {
        self.scales[feature.index()]
    }

    /// Stage three: standardize the numeric block of every row.
    pub(crate) fn apply(&self, rows: Vec<FeatureRow>) -> Vec<FeatureRow> {
        rows.into_iter()
            .map(|mut row| {
                for (index, value) in row.numeric.iter_mut().enumerate() {
                    *value = (*value - self.means[index]) / self.scales[index];
                }
                row
            })
            .collect()
    }
}
