use super::common::*;
use crate::lending::preprocessing::{
    FeatureTransformer, NumericFeature, PreprocessError, EMPLOYMENT_STATUS_COLUMN,
    INCOME_VARIABILITY_COLUMN,
};

#[test]
fn fit_transform_lays_out_numeric_codes_and_purposes() {
    let mut transformer = FeatureTransformer::new();
    let features = transformer
        .fit_transform(&sample_records())
        .expect("sample batch fits");

    let columns = features.columns();
    let expected: Vec<String> = [
        "age",
        "income",
        "loan_amount",
        "loan_term",
        "credit_score",
        "existing_loans",
        "debt_to_income",
        "loan_to_income",
        EMPLOYMENT_STATUS_COLUMN,
        INCOME_VARIABILITY_COLUMN,
        "purpose_Business",
        "purpose_Car",
        "purpose_Home",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect();
    assert_eq!(columns, expected);
    assert_eq!(transformer.columns().expect("fitted"), expected);

    assert_eq!(
        features.column(EMPLOYMENT_STATUS_COLUMN).expect("column"),
        vec![2.0, 1.0, 0.0]
    );
    assert_eq!(features.protected_attribute(), vec![0, 1, 0]);
    assert_eq!(features.labels(), Some(vec![1, 0, 1]));
    assert_eq!(features.rows()[0].purpose, vec![0, 1, 0]);
}

#[test]
fn scaled_numeric_columns_have_zero_mean_and_unit_variance() {
    let mut transformer = FeatureTransformer::new();
    let features = transformer
        .fit_transform(&training_records())
        .expect("training batch fits");

    for feature in NumericFeature::ordered() {
        let values: Vec<f64> = features
            .rows()
            .iter()
            .map(|row| row.numeric(feature))
            .collect();
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count;
        assert!(mean.abs() < 1e-9, "{} mean {mean}", feature.column());
        assert!(
            (variance.sqrt() - 1.0).abs() < 1e-9,
            "{} std {}",
            feature.column(),
            variance.sqrt()
        );
    }
}

#[test]
fn transform_replays_fit_transform_exactly() {
    let mut transformer = FeatureTransformer::new();
    let fitted = transformer
        .fit_transform(&training_records())
        .expect("training batch fits");
    let replayed = transformer
        .transform(&training_records())
        .expect("fitted transformer replays");

    assert_eq!(fitted, replayed);
}

#[test]
fn transform_before_fit_is_rejected() {
    let transformer = FeatureTransformer::new();
    assert_eq!(
        transformer.transform(&sample_records()),
        Err(PreprocessError::NotFitted)
    );
    assert_eq!(transformer.columns(), Err(PreprocessError::NotFitted));
    assert!(transformer.feature_stats().is_none());
}

#[test]
fn unseen_purpose_yields_all_zero_indicators() {
    let (transformer, _) = fitted_transformer();
    let mut record = applicant();
    record.loan_purpose = "Wedding".to_string();

    let features = transformer.transform(&[record]).expect("unseen purpose tolerated");
    let schema_width = transformer
        .encoding()
        .expect("fitted")
        .purpose_values()
        .len();
    assert_eq!(features.rows()[0].purpose, vec![0; schema_width]);
    assert_eq!(features.columns(), transformer.columns().expect("fitted"));
}

#[test]
fn unknown_employment_status_fails_transform() {
    let (transformer, _) = fitted_transformer();
    let mut record = applicant();
    record.employment_status = "Retired".to_string();

    match transformer.transform(&[record]) {
        Err(PreprocessError::UnknownCategory { field, value }) => {
            assert_eq!(field, "employment_status");
            assert_eq!(value, "Retired");
        }
        other => panic!("expected unknown category, got {other:?}"),
    }
}

#[test]
fn unknown_income_variability_fails_transform() {
    let (transformer, _) = fitted_transformer();
    let mut record = applicant();
    record.income_variability = "Medium".to_string();

    assert!(matches!(
        transformer.transform(&[record]),
        Err(PreprocessError::UnknownCategory {
            field: "income_variability",
            ..
        })
    ));
}

#[test]
fn failed_refit_keeps_previous_parameters() {
    let (mut transformer, fitted) = fitted_transformer();
    let mut broken = training_records();
    broken[3].income = 0.0;
    broken.push(loan(
        29, 1.0, 1.0, 1, 500, "Employed", "Boat", 0, "Low", Some(0),
    ));

    let err = transformer
        .fit_transform(&broken)
        .expect_err("zero income rejected");
    assert!(matches!(err, PreprocessError::InvalidRecord { index: 3, .. }));

    let replayed = transformer
        .transform(&training_records())
        .expect("previous fit still usable");
    assert_eq!(replayed, fitted);
}

#[test]
fn empty_batch_cannot_be_fitted() {
    let mut transformer = FeatureTransformer::new();
    assert_eq!(
        transformer.fit_transform(&[]),
        Err(PreprocessError::EmptyInput)
    );
    assert!(!transformer.is_fitted());
}

#[test]
fn constant_numeric_column_standardizes_to_zero() {
    let mut records = sample_records();
    for record in &mut records {
        record.existing_loans = 2;
    }

    let mut transformer = FeatureTransformer::new();
    let features = transformer.fit_transform(&records).expect("fits");
    let existing = features.column("existing_loans").expect("column");
    assert!(existing.iter().all(|value| *value == 0.0));
    assert!(features
        .matrix()
        .iter()
        .flatten()
        .all(|value| value.is_finite()));
}

#[test]
fn feature_stats_snapshot_post_scaling_columns() {
    let mut transformer = FeatureTransformer::new();
    transformer
        .fit_transform(&sample_records())
        .expect("sample batch fits");
    let stats = transformer.feature_stats().expect("stats captured on fit");

    assert_eq!(stats.len(), 13);
    for feature in NumericFeature::ordered() {
        let column = stats.get(feature.column()).expect("numeric column tracked");
        assert!(column.mean.abs() < 1e-9);
        // Three rows scaled to unit population variance have sample std sqrt(3/2).
        assert_close(column.std, 1.5_f64.sqrt());
        assert!(column.min < 0.0 && column.max > 0.0);
    }

    let purpose = stats.get("purpose_Car").expect("purpose tracked");
    assert_eq!(purpose.min, 0.0);
    assert_eq!(purpose.max, 1.0);
}

#[test]
fn persisted_transformer_replays_identically() {
    let (transformer, fitted) = fitted_transformer();
    let json = serde_json::to_string(&transformer).expect("serializes");
    let restored: FeatureTransformer = serde_json::from_str(&json).expect("deserializes");

    assert_eq!(restored, transformer);
    assert_eq!(
        restored
            .transform(&training_records())
            .expect("restored transformer replays"),
        fitted
    );
}
