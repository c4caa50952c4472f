use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::super::domain::LoanRecord;
use super::super::fairness::{FairnessError, FairnessEvaluator, FairnessReport, FairnessVerdict};
use super::model::ApprovalModel;
use super::service::{LoanScoringService, ScoringError};

/// Labelled predictions submitted for an ad-hoc fairness evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct FairnessEvaluationRequest {
    pub y_true: Vec<u8>,
    pub y_pred: Vec<u8>,
    pub protected_values: Vec<u8>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FairnessEvaluationResponse {
    pub report: FairnessReport,
    pub verdict: FairnessVerdict,
    pub summary: String,
    pub rendered: String,
}

/// Router builder exposing the scoring and fairness endpoints.
pub fn scoring_router<M>(service: Arc<LoanScoringService<M>>) -> Router
where
    M: ApprovalModel + 'static,
{
    Router::new()
        .route("/api/v1/predict", post(predict_handler::<M>))
        .route("/api/v1/fairness/evaluate", post(fairness_handler::<M>))
        .with_state(service)
}

pub(crate) async fn predict_handler<M>(
    State(service): State<Arc<LoanScoringService<M>>>,
    Json(record): Json<LoanRecord>,
) -> Response
where
    M: ApprovalModel + 'static,
{
    match service.score(record) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(ScoringError::Preprocess(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            warn!(error = %other, "loan scoring failed");
            let payload = json!({ "error": format!("error making prediction: {other}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn fairness_handler<M>(
    State(service): State<Arc<LoanScoringService<M>>>,
    Json(request): Json<FairnessEvaluationRequest>,
) -> Response
where
    M: ApprovalModel + 'static,
{
    let config = service.fairness_config();
    let threshold = request.threshold.unwrap_or(config.threshold);
    let mut evaluator = FairnessEvaluator::new(config.protected_attribute.clone());

    let computed = evaluator.calculate_metrics(
        &request.y_true,
        &request.y_pred,
        &request.protected_values,
    );
    let evaluated = match computed {
        Ok(report) => {
            let report = report.clone();
            evaluator
                .is_fair(threshold)
                .map(|verdict| (report, verdict))
        }
        Err(error) => Err(error),
    };

    match evaluated {
        Ok((report, verdict)) => {
            let body = FairnessEvaluationResponse {
                summary: verdict.summary(),
                rendered: evaluator.get_fairness_report(),
                report,
                verdict,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error @ FairnessError::InvalidInput(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            warn!(error = %other, "fairness evaluation failed");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
