use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::features::FeatureSet;

/// Summary of one output column after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub mean: f64,
    /// Sample standard deviation (`n - 1`); zero for a single row.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Diagnostic snapshot of every output column, taken once per fit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    columns: BTreeMap<String, ColumnStats>,
}

impl FeatureStats {
    pub fn from_features(features: &FeatureSet) -> Self {
        let matrix = features.matrix();
        let columns = features
            .columns()
            .into_iter()
            .enumerate()
            .filter_map(|(position, name)| {
                let values: Vec<f64> = matrix.iter().map(|row| row[position]).collect();
                summarize(&values).map(|stats| (name, stats))
            })
            .collect();

        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&ColumnStats> {
        self.columns.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnStats)> {
        self.columns
            .iter()
            .map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn summarize(values: &[f64]) -> Option<ColumnStats> {
    if values.is_empty() {
        return None;
    }

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let std = if values.len() > 1 {
        let squared = values
            .iter()
            .map(|value| (value - mean) * (value - mean))
            .sum::<f64>();
        (squared / (count - 1.0)).sqrt()
    } else {
        0.0
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ColumnStats {
        mean,
        std,
        min,
        max,
    })
}
