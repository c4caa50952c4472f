use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::lending::domain::LoanRecord;
use crate::lending::fairness::ApprovalBaseline;
use crate::lending::preprocessing::{FeatureSet, FeatureTransformer, NumericFeature};
use crate::lending::scoring::{scoring_router, LoanScoringService, LogisticModel};

#[allow(clippy::too_many_arguments)]
pub(super) fn loan(
    age: u32,
    income: f64,
    loan_amount: f64,
    loan_term: u32,
    credit_score: i32,
    employment_status: &str,
    loan_purpose: &str,
    existing_loans: u32,
    income_variability: &str,
    loan_status: Option<u8>,
) -> LoanRecord {
    LoanRecord {
        age,
        income,
        loan_amount,
        loan_term,
        credit_score,
        employment_status: employment_status.to_string(),
        loan_purpose: loan_purpose.to_string(),
        existing_loans,
        income_variability: income_variability.to_string(),
        loan_status,
    }
}

/// Three-row batch covering every employment level and purpose once.
pub(super) fn sample_records() -> Vec<LoanRecord> {
    vec![
        loan(30, 50_000.0, 20_000.0, 12, 650, "Employed", "Car", 1, "Low", Some(1)),
        loan(40, 60_000.0, 30_000.0, 24, 700, "Self-Employed", "Home", 2, "High", Some(0)),
        loan(50, 70_000.0, 40_000.0, 36, 750, "Unemployed", "Business", 3, "Low", Some(1)),
    ]
}

/// Labelled training batch; mean credit score is 685.
pub(super) fn training_records() -> Vec<LoanRecord> {
    vec![
        loan(30, 50_000.0, 20_000.0, 12, 650, "Employed", "Car", 1, "Low", Some(1)),
        loan(40, 60_000.0, 30_000.0, 24, 700, "Self-Employed", "Home", 2, "High", Some(0)),
        loan(50, 70_000.0, 40_000.0, 36, 750, "Unemployed", "Business", 3, "Low", Some(1)),
        loan(28, 42_000.0, 15_000.0, 48, 610, "Employed", "Car", 0, "High", Some(0)),
        loan(35, 85_000.0, 25_000.0, 60, 720, "Employed", "Home", 1, "Low", Some(1)),
        loan(45, 39_000.0, 18_000.0, 36, 590, "Self-Employed", "Education", 2, "High", Some(0)),
        loan(52, 91_000.0, 35_000.0, 24, 780, "Employed", "Business", 1, "Low", Some(1)),
        loan(33, 56_000.0, 22_000.0, 36, 680, "Unemployed", "Car", 4, "High", Some(1)),
    ]
}

pub(super) fn applicant() -> LoanRecord {
    loan(45, 80_000.0, 20_000.0, 36, 760, "Employed", "Home", 1, "High", None)
}

pub(super) fn fitted_transformer() -> (FeatureTransformer, FeatureSet) {
    let mut transformer = FeatureTransformer::new();
    let features = transformer
        .fit_transform(&training_records())
        .expect("training batch fits");
    (transformer, features)
}

/// Approves applicants whose credit score is above the training mean.
pub(super) fn credit_model(transformer: &FeatureTransformer) -> LogisticModel {
    let feature_names = transformer.columns().expect("fitted transformer");
    let coefficients = feature_names
        .iter()
        .map(|name| {
            if name == NumericFeature::CreditScore.column() {
                3.0
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

pub(super) fn build_service() -> LoanScoringService<LogisticModel> {
    let (transformer, features) = fitted_transformer();
    let baseline = ApprovalBaseline::from_features(&features)
        .expect("labelled batch")
        .expect("valid baseline");
    let model = credit_model(&transformer);
    LoanScoringService::new(transformer, model, Some(baseline)).expect("service builds")
}

pub(super) fn router_with_service(service: LoanScoringService<LogisticModel>) -> axum::Router {
    scoring_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
