use crate::infra::{AppState, ArtifactStatus};
use axum::response::Response;
use fair_lending::config::ArtifactConfig;
use fair_lending::lending::dataset;
use fair_lending::lending::preprocessing::NumericFeature;
use fair_lending::lending::scoring::{save_model, PreprocessorArtifact};
use fair_lending::lending::{
    ApprovalBaseline, FeatureTransformer, LoanRecord, LoanScoringService, LogisticModel,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) const SAMPLE_CSV: &str =
    include_str!("../../../crates/fair-lending/data/loan_applications.csv");

pub(crate) fn sample_records() -> Vec<LoanRecord> {
    dataset::from_reader(SAMPLE_CSV.as_bytes()).expect("bundled dataset parses")
}

pub(crate) fn fitted_parts() -> (FeatureTransformer, Option<ApprovalBaseline>) {
    let mut transformer = FeatureTransformer::new();
    let features = transformer
        .fit_transform(&sample_records())
        .expect("bundled dataset fits");
    let baseline = ApprovalBaseline::from_features(&features)
        .transpose()
        .expect("valid baseline");
    (transformer, baseline)
}

/// Approves applicants whose credit score is above the training mean.
pub(crate) fn credit_model(transformer: &FeatureTransformer) -> LogisticModel {
    let feature_names = transformer.columns().expect("fitted transformer");
    let coefficients = feature_names
        .iter()
        .map(|name| {
            if name == NumericFeature::CreditScore.column() {
                2.0
            } else {
                0.0
            }
        })
        .collect();
    LogisticModel {
        feature_names,
        coefficients,
        intercept: 0.0,
        decision_threshold: 0.5,
    }
}

pub(crate) fn fitted_service() -> LoanScoringService<LogisticModel> {
    let (transformer, baseline) = fitted_parts();
    let model = credit_model(&transformer);
    LoanScoringService::new(transformer, model, baseline).expect("service builds")
}

pub(crate) fn write_model(dir: &Path) -> ArtifactConfig {
    let config = ArtifactConfig::new(dir, "best_model.json", "preprocessor.json");
    let (transformer, _) = fitted_parts();
    save_model(&credit_model(&transformer), &config.model_path).expect("model written");
    config
}

pub(crate) fn write_artifacts(dir: &Path) -> ArtifactConfig {
    let config = write_model(dir);
    let (transformer, baseline) = fitted_parts();
    PreprocessorArtifact::new(transformer, baseline)
        .expect("fitted transformer")
        .save(&config.preprocessor_path)
        .expect("preprocessor written");
    config
}

pub(crate) fn test_state(ready: bool, artifacts: ArtifactStatus) -> AppState {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    AppState {
        readiness: Arc::new(AtomicBool::new(ready)),
        metrics: Arc::new(handle),
        artifacts,
    }
}

pub(crate) async fn read_json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
