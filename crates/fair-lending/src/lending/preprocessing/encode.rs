use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::super::domain::{EmploymentStatus, IncomeVariability, LoanRecord};
use super::derive::DerivedRecord;
use super::features::{FeatureRow, NumericFeature};
use super::PreprocessError;

/// Encoding vocabulary frozen at fit time and replayed verbatim at inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalEncoding {
    employment_levels: BTreeMap<String, u8>,
    income_variability_levels: BTreeMap<String, u8>,
    purpose_values: Vec<String>,
}

impl CategoricalEncoding {
    /// Fix the one-hot schema from the purposes observed in `records` (sorted, de-duplicated).
    pub fn fit(records: &[LoanRecord]) -> Self {
        let purpose_values = records
            .iter()
            .map(|record| record.loan_purpose.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            employment_levels: EmploymentStatus::ordered()
                .into_iter()
                .map(|status| (status.label().to_string(), status.ordinal()))
                .collect(),
            income_variability_levels: IncomeVariability::ordered()
                .into_iter()
                .map(|level| (level.label().to_string(), level.code()))
                .collect(),
            purpose_values,
        }
    }

    pub fn purpose_values(&self) -> &[String] {
        &self.purpose_values
    }

    pub fn employment_code(&self, raw: &str) -> Result<u8, PreprocessError> {
        self.employment_levels
            .get(raw)
            .copied()
            .ok_or_else(|| PreprocessError::UnknownCategory {
                field: "employment_status",
                value: raw.to_string(),
            })
    }

    pub fn income_variability_code(&self, raw: &str) -> Result<u8, PreprocessError> {
        self.income_variability_levels
            .get(raw)
            .copied()
            .ok_or_else(|| PreprocessError::UnknownCategory {
                field: "income_variability",
                value: raw.to_string(),
            })
    }

    /// Indicators for the fitted purposes; an unseen purpose yields all zeros.
    pub fn purpose_indicators(&self, raw: &str) -> Vec<u8> {
        self.purpose_values
            .iter()
            .map(|value| u8::from(value == raw))
            .collect()
    }

    /// Stage two: map categoricals and lay out the unscaled numeric block.
    pub(crate) fn encode(
        &self,
        derived: &[DerivedRecord<'_>],
    ) -> Result<Vec<FeatureRow>, PreprocessError> {
        derived
            .iter()
            .map(|row| {
                let record = row.source;
                let mut numeric = [0.0; NumericFeature::COUNT];
                numeric[NumericFeature::Age.index()] = f64::from(record.age);
                numeric[NumericFeature::Income.index()] = record.income;
                numeric[NumericFeature::LoanAmount.index()] = record.loan_amount;
                numeric[NumericFeature::LoanTerm.index()] = f64::from(record.loan_term);
                numeric[NumericFeature::CreditScore.index()] = f64::from(record.credit_score);
                numeric[NumericFeature::ExistingLoans.index()] = f64::from(record.existing_loans);
                numeric[NumericFeature::DebtToIncome.index()] = row.derived.debt_to_income;
                numeric[NumericFeature::LoanToIncome.index()] = row.derived.loan_to_income;

                Ok(FeatureRow {
                    numeric,
                    employment_status: self.employment_code(&record.employment_status)?,
                    income_variability: self.income_variability_code(&record.income_variability)?,
                    purpose: self.purpose_indicators(&record.loan_purpose),
                    loan_status: record.loan_status,
                })
            })
            .collect()
    }
}
