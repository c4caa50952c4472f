use serde::{Deserialize, Serialize};

use super::report::FairnessReport;

pub const DISPARATE_IMPACT_EXCEEDED: &str = "Disparate impact exceeds threshold";
pub const DISPARATE_IMPACT_UNDEFINED: &str =
    "Disparate impact is undefined (privileged approval rate is zero)";
pub const EQUAL_OPPORTUNITY_EXCEEDED: &str = "Equal opportunity difference exceeds threshold";
pub const DEMOGRAPHIC_PARITY_EXCEEDED: &str = "Demographic parity difference exceeds threshold";

/// Pass/fail outcome of the fairness policy with the failed checks in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessVerdict {
    pub fair: bool,
    pub reasons: Vec<String>,
}

impl FairnessVerdict {
    pub fn summary(&self) -> String {
        if self.fair {
            "All fairness criteria met".to_string()
        } else {
            format!("Fairness criteria not met: {}", self.reasons.join("; "))
        }
    }
}

/// Checks disparate impact, equal opportunity and demographic parity against `threshold`.
pub(crate) fn assess(report: &FairnessReport, threshold: f64) -> FairnessVerdict {
    let mut reasons = Vec::new();

    match report.disparate_impact {
        Some(ratio) if (1.0 - ratio).abs() <= threshold => {}
        Some(_) => reasons.push(DISPARATE_IMPACT_EXCEEDED.to_string()),
        None => reasons.push(DISPARATE_IMPACT_UNDEFINED.to_string()),
    }

    if report.equal_opportunity_difference.abs() > threshold {
        reasons.push(EQUAL_OPPORTUNITY_EXCEEDED.to_string());
    }

    if report.demographic_parity_difference.abs() > threshold {
        reasons.push(DEMOGRAPHIC_PARITY_EXCEEDED.to_string());
    }

    FairnessVerdict {
        fair: reasons.is_empty(),
        reasons,
    }
}
