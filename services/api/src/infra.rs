use fair_lending::lending::{ApprovalModel, LoanScoringService};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) artifacts: ArtifactStatus,
}

/// Which startup artifacts made it into the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct ArtifactStatus {
    pub(crate) model_loaded: bool,
    pub(crate) preprocessor_loaded: bool,
}

impl ArtifactStatus {
    pub(crate) fn of<M: ApprovalModel + 'static>(service: &LoanScoringService<M>) -> Self {
        Self {
            model_loaded: service.model_loaded(),
            preprocessor_loaded: service.preprocessor_loaded(),
        }
    }
}

pub(crate) fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("threshold must be a non-negative number, found {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fitted_parts, fitted_service};
    use fair_lending::lending::LogisticModel;

    #[test]
    fn artifact_status_reflects_the_loaded_service() {
        let status = ArtifactStatus::of(&fitted_service());
        assert!(status.model_loaded);
        assert!(status.preprocessor_loaded);
    }

    #[test]
    fn empty_model_is_not_reported_as_loaded() {
        let (transformer, baseline) = fitted_parts();
        let model = LogisticModel {
            feature_names: Vec::new(),
            coefficients: Vec::new(),
            intercept: 0.0,
            decision_threshold: 0.5,
        };
        let service = LoanScoringService::new(transformer, model, baseline).expect("service builds");

        let status = ArtifactStatus::of(&service);
        assert!(!status.model_loaded);
        assert!(status.preprocessor_loaded);
    }

    #[test]
    fn threshold_parser_accepts_zero_and_rejects_nan() {
        assert_eq!(parse_threshold(" 0 "), Ok(0.0));
        assert_eq!(parse_threshold("0.25"), Ok(0.25));
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("lots").is_err());
    }
}
