use crate::infra::{AppState, ArtifactStatus};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use fair_lending::lending::{scoring_router, ApprovalModel, LoanScoringService};
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) const SERVICE_NAME: &str = "Loan Approval Prediction API";

/// Scoring endpoints plus the operational routes served alongside them.
pub(crate) fn with_service_routes<M>(service: Arc<LoanScoringService<M>>) -> Router
where
    M: ApprovalModel + 'static,
{
    scoring_router(service)
        .route("/", get(root))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    #[serde(flatten)]
    pub(crate) artifacts: ArtifactStatus,
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let artifacts = state.artifacts;
    let status = if artifacts.model_loaded && artifacts.preprocessor_loaded {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse { status, artifacts })
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
