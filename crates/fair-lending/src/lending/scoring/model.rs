use serde::{Deserialize, Serialize};

use super::super::preprocessing::FeatureSet;

/// Trained approval model consumed by the scoring service.
///
/// Training and selection happen elsewhere; the service only needs labels and, when the
/// model supports it, class probabilities ordered `[denied, approved]`.
pub trait ApprovalModel: Send + Sync {
    fn predict(&self, features: &FeatureSet) -> Result<Vec<u8>, ModelError>;

    fn predict_proba(&self, _features: &FeatureSet) -> Result<Vec<[f64; 2]>, ModelError> {
        Err(ModelError::ProbabilitiesUnsupported)
    }

    /// Whether the model holds usable parameters.
    fn is_loaded(&self) -> bool {
        true
    }
}

/// Errors raised by model implementations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("model expects columns {expected:?} but received {found:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("model does not provide class probabilities")]
    ProbabilitiesUnsupported,
    #[error("invalid model parameters: {0}")]
    InvalidParameters(String),
    #[error("model returned invalid output: {0}")]
    InvalidOutput(String),
}

fn default_decision_threshold() -> f64 {
    0.5
}

/// Logistic regression exported from the training pipeline as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_decision_threshold")]
    pub decision_threshold: f64,
}

impl LogisticModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names.len() != self.coefficients.len() {
            return Err(ModelError::InvalidParameters(format!(
                "{} feature names but {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::InvalidParameters(
                "coefficients and intercept must be finite".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(ModelError::InvalidParameters(format!(
                "decision threshold {} outside [0, 1]",
                self.decision_threshold
            )));
        }
        Ok(())
    }

    /// Reject inputs whose column layout differs from the one the model was trained on.
    pub fn check_columns(&self, columns: &[String]) -> Result<(), ModelError> {
        if columns == self.feature_names.as_slice() {
            Ok(())
        } else {
            Err(ModelError::FeatureMismatch {
                expected: self.feature_names.clone(),
                found: columns.to_vec(),
            })
        }
    }

    fn approval_probabilities(&self, features: &FeatureSet) -> Result<Vec<f64>, ModelError> {
        self.check_columns(&features.columns())?;
        Ok(features
            .rows()
            .iter()
            .map(|row| {
                let logit = row
                    .to_vector()
                    .iter()
                    .zip(&self.coefficients)
                    .fold(self.intercept, |acc, (value, weight)| acc + value * weight);
                sigmoid(logit)
            })
            .collect())
    }
}

impl ApprovalModel for LogisticModel {
    fn is_loaded(&self) -> bool {
        !self.feature_names.is_empty() && self.validate().is_ok()
    }

    fn predict(&self, features: &FeatureSet) -> Result<Vec<u8>, ModelError> {
        Ok(self
            .approval_probabilities(features)?
            .into_iter()
            .map(|probability| u8::from(probability >= self.decision_threshold))
            .collect())
    }

    fn predict_proba(&self, features: &FeatureSet) -> Result<Vec<[f64; 2]>, ModelError> {
        Ok(self
            .approval_probabilities(features)?
            .into_iter()
            .map(|probability| [1.0 - probability, probability])
            .collect())
    }
}

fn sigmoid(logit: f64) -> f64 {
    if logit >= 0.0 {
        1.0 / (1.0 + (-logit).exp())
    } else {
        let exp = logit.exp();
        exp / (1.0 + exp)
    }
}
