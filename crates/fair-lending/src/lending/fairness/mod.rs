//! Group fairness metrics over binary approval decisions.
//!
//! Protected-attribute codes follow the income variability encoding: 0 marks the privileged
//! (Low) group and 1 the unprivileged (High) group.

mod baseline;
mod group;
mod policy;
mod report;

pub use baseline::ApprovalBaseline;
pub use group::{ConfusionMatrix, GroupMetrics};
pub use policy::{
    FairnessVerdict, DEMOGRAPHIC_PARITY_EXCEEDED, DISPARATE_IMPACT_EXCEEDED,
    DISPARATE_IMPACT_UNDEFINED, EQUAL_OPPORTUNITY_EXCEEDED,
};
pub use report::FairnessReport;

use super::domain::ProtectedGroup;

pub const NO_METRICS_MESSAGE: &str = "No metrics have been calculated yet.";

/// Errors raised by the fairness evaluator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FairnessError {
    #[error("invalid fairness input: {0}")]
    InvalidInput(String),
    #[error("disparate impact is undefined: privileged approval rate is zero")]
    DivisionByZero,
    #[error("no fairness metrics have been calculated yet")]
    NoMetrics,
}

/// Holds the most recent fairness report for one protected attribute.
#[derive(Debug, Clone)]
pub struct FairnessEvaluator {
    protected_attribute: String,
    report: Option<FairnessReport>,
}

impl Default for FairnessEvaluator {
    fn default() -> Self {
        Self::new("income_variability")
    }
}

impl FairnessEvaluator {
    pub fn new(protected_attribute: impl Into<String>) -> Self {
        Self {
            protected_attribute: protected_attribute.into(),
            report: None,
        }
    }

    pub fn protected_attribute(&self) -> &str {
        &self.protected_attribute
    }

    pub fn report(&self) -> Option<&FairnessReport> {
        self.report.as_ref()
    }

    /// Compare privileged and unprivileged outcomes, replacing any previous report.
    ///
    /// Invalid input leaves the previous report in place.
    pub fn calculate_metrics(
        &mut self,
        y_true: &[u8],
        y_pred: &[u8],
        protected_values: &[u8],
    ) -> Result<&FairnessReport, FairnessError> {
        validate(y_true, y_pred, protected_values)?;

        let partition = |wanted: ProtectedGroup| {
            let pairs = y_true
                .iter()
                .zip(y_pred)
                .zip(protected_values)
                .filter(move |(_, code)| ProtectedGroup::from_code(**code) == Some(wanted))
                .map(|((truth, predicted), _)| (*truth, *predicted));
            GroupMetrics::from_confusion(&ConfusionMatrix::tally(pairs))
        };

        let report = FairnessReport::from_groups(
            partition(ProtectedGroup::Privileged),
            partition(ProtectedGroup::Unprivileged),
        );
        Ok(&*self.report.insert(report))
    }

    /// Apply the fairness policy to the current report.
    pub fn is_fair(&self, threshold: f64) -> Result<FairnessVerdict, FairnessError> {
        let report = self.report.as_ref().ok_or(FairnessError::NoMetrics)?;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(FairnessError::InvalidInput(format!(
                "threshold must be a non-negative number, found {threshold}"
            )));
        }
        Ok(policy::assess(report, threshold))
    }

    /// Human-readable report, or a notice when nothing has been computed yet.
    pub fn get_fairness_report(&self) -> String {
        match &self.report {
            Some(report) => report.render(&self.protected_attribute),
            None => NO_METRICS_MESSAGE.to_string(),
        }
    }
}

fn validate(y_true: &[u8], y_pred: &[u8], protected_values: &[u8]) -> Result<(), FairnessError> {
    if y_true.len() != y_pred.len() || y_true.len() != protected_values.len() {
        return Err(FairnessError::InvalidInput(format!(
            "length mismatch: y_true={}, y_pred={}, protected_values={}",
            y_true.len(),
            y_pred.len(),
            protected_values.len()
        )));
    }

    if let Some((index, code)) = protected_values
        .iter()
        .enumerate()
        .find(|(_, code)| ProtectedGroup::from_code(**code).is_none())
    {
        return Err(FairnessError::InvalidInput(format!(
            "unrecognized protected attribute code {code} at index {index}"
        )));
    }

    for (name, labels) in [("y_true", y_true), ("y_pred", y_pred)] {
        if let Some((index, label)) = labels.iter().enumerate().find(|(_, label)| **label > 1) {
            return Err(FairnessError::InvalidInput(format!(
                "{name} must be binary, found {label} at index {index}"
            )));
        }
    }

    Ok(())
}
