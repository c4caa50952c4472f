use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::super::domain::{IncomeVariability, LoanRecord};
use super::super::fairness::{
    ApprovalBaseline, FairnessError, FairnessEvaluator, FairnessReport, FairnessVerdict,
};
use super::super::preprocessing::{FeatureSet, FeatureTransformer, PreprocessError};
use super::artifacts::{load_model, ArtifactError, PreprocessorArtifact};
use super::model::{ApprovalModel, LogisticModel, ModelError};
use crate::config::{ArtifactConfig, FairnessConfig};

/// Descriptive summary of the applicant's protected group; never used to decide approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantFairnessSummary {
    pub group: String,
    pub group_approval_rate: Option<f64>,
}

/// Response body for a single scored application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResponse {
    pub loan_approved: bool,
    pub approval_probability: f64,
    pub fairness_metrics: ApplicantFairnessSummary,
}

/// Predictions for a batch, kept alongside the features that produced them.
#[derive(Debug, Clone)]
pub struct BatchPredictions {
    pub features: FeatureSet,
    pub labels: Vec<u8>,
    pub approval_probabilities: Vec<f64>,
}

/// Outcome of auditing a labelled batch.
#[derive(Debug, Clone)]
pub struct FairnessAudit {
    pub report: FairnessReport,
    pub verdict: FairnessVerdict,
    pub rendered: String,
}

/// Error raised while scoring.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Fairness(#[from] FairnessError),
    #[error("audit requires a loan_status label on every record")]
    MissingLabels,
}

/// Pairs a fitted transformer with a trained model. Read-only once built, so one instance
/// can be shared across request handlers.
pub struct LoanScoringService<M> {
    transformer: Arc<FeatureTransformer>,
    model: Arc<M>,
    baseline: Option<ApprovalBaseline>,
    fairness: FairnessConfig,
}

impl LoanScoringService<LogisticModel> {
    /// Startup initialization: both artifacts must load or the service does not exist.
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactError> {
        let artifact = PreprocessorArtifact::load(&config.preprocessor_path)?;
        let model = load_model(&config.model_path)?;
        let columns = artifact
            .transformer
            .columns()
            .map_err(|_| ArtifactError::Unfitted)?;
        model
            .check_columns(&columns)
            .map_err(|source| ArtifactError::InvalidModel {
                path: config.model_path.clone(),
                source,
            })?;

        Self::new(artifact.transformer, model, artifact.approval_baseline)
            .map_err(|_| ArtifactError::Unfitted)
    }
}

impl<M> LoanScoringService<M>
where
    M: ApprovalModel + 'static,
{
    pub fn new(
        transformer: FeatureTransformer,
        model: M,
        baseline: Option<ApprovalBaseline>,
    ) -> Result<Self, PreprocessError> {
        if !transformer.is_fitted() {
            return Err(PreprocessError::NotFitted);
        }
        Ok(Self {
            transformer: Arc::new(transformer),
            model: Arc::new(model),
            baseline,
            fairness: FairnessConfig::default(),
        })
    }

    pub fn with_fairness_config(mut self, fairness: FairnessConfig) -> Self {
        self.fairness = fairness;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.preprocessor_loaded() && self.model_loaded()
    }

    pub fn preprocessor_loaded(&self) -> bool {
        self.transformer.is_fitted()
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    pub fn transformer(&self) -> &FeatureTransformer {
        &self.transformer
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn baseline(&self) -> Option<&ApprovalBaseline> {
        self.baseline.as_ref()
    }

    pub fn fairness_config(&self) -> &FairnessConfig {
        &self.fairness
    }

    /// Score one application.
    pub fn score(&self, record: LoanRecord) -> Result<ScoringResponse, ScoringError> {
        let group = IncomeVariability::from_label(&record.income_variability);
        let batch = self.predict_batch(std::slice::from_ref(&record))?;

        let (loan_approved, approval_probability) = match (
            batch.labels.first(),
            batch.approval_probabilities.first(),
        ) {
            (Some(label), Some(probability)) => (*label == 1, *probability),
            _ => {
                return Err(
                    ModelError::InvalidOutput("no prediction for the applicant".to_string()).into(),
                )
            }
        };

        // The transformer already rejected unknown variability labels.
        let group = group.ok_or(PreprocessError::UnknownCategory {
            field: "income_variability",
            value: record.income_variability.clone(),
        })?;
        let protected = group.group();

        Ok(ScoringResponse {
            loan_approved,
            approval_probability,
            fairness_metrics: ApplicantFairnessSummary {
                group: protected.label().to_string(),
                group_approval_rate: self
                    .baseline
                    .as_ref()
                    .map(|baseline| baseline.approval_rate(protected)),
            },
        })
    }

    /// Transform and predict a batch. Models without probabilities report their labels as
    /// 0 or 1 probabilities. Output that does not cover every row with a binary label and a
    /// probability in `[0, 1]` is rejected.
    pub fn predict_batch(&self, records: &[LoanRecord]) -> Result<BatchPredictions, ScoringError> {
        let features = self.transformer.transform(records)?;
        let labels = self.model.predict(&features)?;
        check_labels(&labels, features.len())?;

        let approval_probabilities: Vec<f64> = match self.model.predict_proba(&features) {
            Ok(probabilities) => probabilities.iter().map(|pair| pair[1]).collect(),
            Err(ModelError::ProbabilitiesUnsupported) => {
                labels.iter().map(|label| f64::from(*label)).collect()
            }
            Err(other) => return Err(other.into()),
        };
        check_probabilities(&approval_probabilities, features.len())?;

        Ok(BatchPredictions {
            features,
            labels,
            approval_probabilities,
        })
    }

    /// Score a labelled batch and compare predicted approvals across protected groups.
    pub fn audit(
        &self,
        records: &[LoanRecord],
        threshold: f64,
    ) -> Result<FairnessAudit, ScoringError> {
        let batch = self.predict_batch(records)?;
        let truth = batch.features.labels().ok_or(ScoringError::MissingLabels)?;

        let mut evaluator = FairnessEvaluator::new(&self.fairness.protected_attribute);
        let report = evaluator
            .calculate_metrics(&truth, &batch.labels, &batch.features.protected_attribute())?
            .clone();
        let verdict = evaluator.is_fair(threshold)?;

        Ok(FairnessAudit {
            report,
            verdict,
            rendered: evaluator.get_fairness_report(),
        })
    }
}

fn check_labels(labels: &[u8], rows: usize) -> Result<(), ModelError> {
    if labels.len() != rows {
        return Err(ModelError::InvalidOutput(format!(
            "expected {rows} labels, received {}",
            labels.len()
        )));
    }
    match labels.iter().enumerate().find(|(_, label)| **label > 1) {
        Some((index, label)) => Err(ModelError::InvalidOutput(format!(
            "label {label} at row {index} is not 0 or 1"
        ))),
        None => Ok(()),
    }
}

fn check_probabilities(probabilities: &[f64], rows: usize) -> Result<(), ModelError> {
    if probabilities.len() != rows {
        return Err(ModelError::InvalidOutput(format!(
            "expected {rows} probabilities, received {}",
            probabilities.len()
        )));
    }
    match probabilities
        .iter()
        .enumerate()
        .find(|(_, probability)| !(0.0..=1.0).contains(*probability))
    {
        Some((index, probability)) => Err(ModelError::InvalidOutput(format!(
            "probability {probability} at row {index} is outside [0, 1]"
        ))),
        None => Ok(()),
    }
}
