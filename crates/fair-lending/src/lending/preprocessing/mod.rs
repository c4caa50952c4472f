//! Feature preprocessing for loan applications.
//!
//! The pipeline runs three pure stages in a fixed order: ratio derivation, categorical
//! encoding and numeric standardization. `fit_transform` learns the encoding vocabulary and
//! scaler parameters from a training batch; `transform` replays them unchanged, so applying
//! `transform` to the fitting batch reproduces the `fit_transform` output exactly.

mod derive;
mod encode;
mod features;
mod scale;
mod stats;

pub use derive::DerivedFeatures;
pub use encode::CategoricalEncoding;
pub use features::{
    FeatureRow, FeatureSet, NumericFeature, EMPLOYMENT_STATUS_COLUMN, INCOME_VARIABILITY_COLUMN,
    PURPOSE_PREFIX,
};
pub use scale::ScalerParams;
pub use stats::{ColumnStats, FeatureStats};

use serde::{Deserialize, Serialize};

use super::domain::LoanRecord;
use derive::derive_features;

/// Errors raised while validating, encoding or scaling records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreprocessError {
    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("unknown {field} category '{value}'")]
    UnknownCategory { field: &'static str, value: String },
    #[error("feature transformer has not been fitted")]
    NotFitted,
    #[error("cannot fit the feature transformer on an empty batch")]
    EmptyInput,
}

/// Parameters learned by `fit_transform`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransform {
    encoding: CategoricalEncoding,
    scaler: ScalerParams,
    feature_stats: FeatureStats,
}

/// Stateful transformer; unfit until the first successful `fit_transform`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTransformer {
    fitted: Option<FittedTransform>,
}

impl FeatureTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Learn the schema and scaler from `records` and return the transformed batch.
    ///
    /// On error the previous fit (if any) is left untouched.
    pub fn fit_transform(&mut self, records: &[LoanRecord]) -> Result<FeatureSet, PreprocessError> {
        if records.is_empty() {
            return Err(PreprocessError::EmptyInput);
        }

        let derived = derive_features(records)?;
        let encoding = CategoricalEncoding::fit(records);
        let encoded = encoding.encode(&derived)?;
        let scaler = ScalerParams::fit(&encoded);
        let features = FeatureSet::new(
            encoding.purpose_values().to_vec(),
            scaler.apply(encoded),
        );
        let feature_stats = FeatureStats::from_features(&features);

        self.fitted = Some(FittedTransform {
            encoding,
            scaler,
            feature_stats,
        });
        Ok(features)
    }

    /// Apply the fitted parameters to new records without updating them.
    pub fn transform(&self, records: &[LoanRecord]) -> Result<FeatureSet, PreprocessError> {
        let fitted = self.fitted.as_ref().ok_or(PreprocessError::NotFitted)?;

        let derived = derive_features(records)?;
        let encoded = fitted.encoding.encode(&derived)?;
        Ok(FeatureSet::new(
            fitted.encoding.purpose_values().to_vec(),
            fitted.scaler.apply(encoded),
        ))
    }

    /// Output column names in model input order.
    pub fn columns(&self) -> Result<Vec<String>, PreprocessError> {
        let fitted = self.fitted.as_ref().ok_or(PreprocessError::NotFitted)?;
        Ok(features::column_names(fitted.encoding.purpose_values()))
    }

    pub fn feature_stats(&self) -> Option<&FeatureStats> {
        self.fitted.as_ref().map(|fitted| &fitted.feature_stats)
    }

    pub fn encoding(&self) -> Option<&CategoricalEncoding> {
        self.fitted.as_ref().map(|fitted| &fitted.encoding)
    }

    pub fn scaler(&self) -> Option<&ScalerParams> {
        self.fitted.as_ref().map(|fitted| &fitted.scaler)
    }
}
