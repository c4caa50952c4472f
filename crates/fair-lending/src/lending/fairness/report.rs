use serde::{Deserialize, Serialize};

use super::super::domain::ProtectedGroup;
use super::group::GroupMetrics;
use super::FairnessError;

/// Group comparison produced by a single `calculate_metrics` call.
///
/// `disparate_impact` is `None` when the privileged approval rate is zero; the ratio is
/// undefined there and is reported as such rather than as infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    pub disparate_impact: Option<f64>,
    pub equal_opportunity_difference: f64,
    pub demographic_parity_difference: f64,
    pub privileged_group_metrics: GroupMetrics,
    pub unprivileged_group_metrics: GroupMetrics,
}

impl FairnessReport {
    pub fn from_groups(privileged: GroupMetrics, unprivileged: GroupMetrics) -> Self {
        let disparate_impact = if privileged.approval_rate == 0.0 {
            None
        } else {
            Some(unprivileged.approval_rate / privileged.approval_rate)
        };

        Self {
            disparate_impact,
            equal_opportunity_difference: unprivileged.true_positive_rate
                - privileged.true_positive_rate,
            demographic_parity_difference: unprivileged.approval_rate - privileged.approval_rate,
            privileged_group_metrics: privileged,
            unprivileged_group_metrics: unprivileged,
        }
    }

    /// Ratio of unprivileged to privileged approval rates.
    pub fn disparate_impact(&self) -> Result<f64, FairnessError> {
        self.disparate_impact.ok_or(FairnessError::DivisionByZero)
    }

    pub fn group(&self, group: ProtectedGroup) -> &GroupMetrics {
        match group {
            ProtectedGroup::Privileged => &self.privileged_group_metrics,
            ProtectedGroup::Unprivileged => &self.unprivileged_group_metrics,
        }
    }

    /// Plain-text rendering with every rate at three decimal places.
    pub fn render(&self, protected_attribute: &str) -> String {
        let disparate_impact = match self.disparate_impact {
            Some(value) => format!("{value:.3}"),
            None => "undefined (privileged approval rate is 0)".to_string(),
        };

        let mut lines = vec![
            "Fairness Metrics Report".to_string(),
            "=======================".to_string(),
            format!("Protected Attribute: {protected_attribute}"),
            String::new(),
            "Overall Fairness Metrics:".to_string(),
            format!("- Disparate Impact: {disparate_impact}"),
            format!(
                "- Equal Opportunity Difference: {:.3}",
                self.equal_opportunity_difference
            ),
            format!(
                "- Demographic Parity Difference: {:.3}",
                self.demographic_parity_difference
            ),
            String::new(),
            "Group-specific Metrics:".to_string(),
        ];
        for group in [ProtectedGroup::Privileged, ProtectedGroup::Unprivileged] {
            let heading = match group {
                ProtectedGroup::Privileged => "Privileged",
                ProtectedGroup::Unprivileged => "Unprivileged",
            };
            let metrics = self.group(group);
            lines.extend([
                String::new(),
                format!("{heading} Group ({}):", group.label()),
                format!("- Applications: {}", metrics.size),
                format!("- Approval Rate: {:.3}", metrics.approval_rate),
                format!("- True Positive Rate: {:.3}", metrics.true_positive_rate),
                format!("- False Positive Rate: {:.3}", metrics.false_positive_rate),
                format!("- Accuracy: {:.3}", metrics.accuracy),
            ]);
        }
        lines.join("\n")
    }
}
