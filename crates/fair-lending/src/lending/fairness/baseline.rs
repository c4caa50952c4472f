use serde::{Deserialize, Serialize};

use super::super::domain::ProtectedGroup;
use super::super::preprocessing::FeatureSet;
use super::FairnessError;

/// Historical approval rate of each protected group, taken from labelled training data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApprovalBaseline {
    pub privileged_approval_rate: f64,
    pub unprivileged_approval_rate: f64,
    pub privileged_count: usize,
    pub unprivileged_count: usize,
}

impl ApprovalBaseline {
    /// Share of approved labels per group; an empty group reports 0.
    pub fn from_labels(labels: &[u8], protected_values: &[u8]) -> Result<Self, FairnessError> {
        super::validate(labels, labels, protected_values)?;

        let tally = |wanted: ProtectedGroup| {
            labels
                .iter()
                .zip(protected_values)
                .filter(|(_, code)| ProtectedGroup::from_code(**code) == Some(wanted))
                .fold((0usize, 0usize), |(approved, total), (label, _)| {
                    (approved + usize::from(*label == 1), total + 1)
                })
        };
        let (privileged_approved, privileged_count) = tally(ProtectedGroup::Privileged);
        let (unprivileged_approved, unprivileged_count) = tally(ProtectedGroup::Unprivileged);

        Ok(Self {
            privileged_approval_rate: rate(privileged_approved, privileged_count),
            unprivileged_approval_rate: rate(unprivileged_approved, unprivileged_count),
            privileged_count,
            unprivileged_count,
        })
    }

    /// Baseline for a transformed training batch; `None` when any row is unlabelled.
    pub fn from_features(features: &FeatureSet) -> Option<Result<Self, FairnessError>> {
        let labels = features.labels()?;
        Some(Self::from_labels(&labels, &features.protected_attribute()))
    }

    pub fn approval_rate(&self, group: ProtectedGroup) -> f64 {
        match group {
            ProtectedGroup::Privileged => self.privileged_approval_rate,
            ProtectedGroup::Unprivileged => self.unprivileged_approval_rate,
        }
    }
}

fn rate(approved: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        approved as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_are_per_group() {
        let baseline =
            ApprovalBaseline::from_labels(&[1, 0, 1, 1, 0], &[0, 0, 1, 1, 1]).expect("valid");
        assert_eq!(baseline.privileged_approval_rate, 0.5);
        assert_eq!(baseline.unprivileged_approval_rate, 2.0 / 3.0);
        assert_eq!(baseline.privileged_count, 2);
        assert_eq!(baseline.unprivileged_count, 3);
        assert_eq!(baseline.approval_rate(ProtectedGroup::Privileged), 0.5);
    }

    #[test]
    fn missing_group_reports_zero() {
        let baseline = ApprovalBaseline::from_labels(&[1, 1], &[1, 1]).expect("valid");
        assert_eq!(baseline.privileged_approval_rate, 0.0);
        assert_eq!(baseline.privileged_count, 0);
        assert_eq!(baseline.unprivileged_approval_rate, 1.0);
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!(matches!(
            ApprovalBaseline::from_labels(&[1], &[2]),
            Err(FairnessError::InvalidInput(_))
        ));
    }
}
