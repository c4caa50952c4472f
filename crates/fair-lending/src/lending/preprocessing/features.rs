use serde::{Deserialize, Serialize};

/// Numeric columns standardized by the scaler, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericFeature {
    Age,
    Income,
    LoanAmount,
    LoanTerm,
    CreditScore,
    ExistingLoans,
    DebtToIncome,
    LoanToIncome,
}

impl NumericFeature {
    pub const COUNT: usize = 8;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Age,
            Self::Income,
            Self::LoanAmount,
            Self::LoanTerm,
            Self::CreditScore,
            Self::ExistingLoans,
            Self::DebtToIncome,
            Self::LoanToIncome,
        ]
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Income => "income",
            Self::LoanAmount => "loan_amount",
            Self::LoanTerm => "loan_term",
            Self::CreditScore => "credit_score",
            Self::ExistingLoans => "existing_loans",
            Self::DebtToIncome => "debt_to_income",
            Self::LoanToIncome => "loan_to_income",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

pub const EMPLOYMENT_STATUS_COLUMN: &str = "employment_status";
pub const INCOME_VARIABILITY_COLUMN: &str = "income_variability";
pub const PURPOSE_PREFIX: &str = "purpose_";

/// A single encoded (and, after the scaling stage, standardized) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub numeric: [f64; NumericFeature::COUNT],
    pub employment_status: u8,
    pub income_variability: u8,
    /// Indicators aligned with the fitted purpose schema.
    pub purpose: Vec<u8>,
    pub loan_status: Option<u8>,
}

impl FeatureRow {
    pub fn numeric(&self, feature: NumericFeature) -> f64 {
        self.numeric[feature.index()]
    }

    /// Flatten into model input order (see [`FeatureSet::columns`]).
    pub fn to_vector(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(NumericFeature::COUNT + 2 + self.purpose.len());
        values.extend_from_slice(&self.numeric);
        values.push(f64::from(self.employment_status));
        values.push(f64::from(self.income_variability));
        values.extend(self.purpose.iter().map(|flag| f64::from(*flag)));
        values
    }
}

/// Output of the preprocessing pipeline: rows plus the frozen purpose schema they follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    purpose_columns: Vec<String>,
    rows: Vec<FeatureRow>,
}

impl FeatureSet {
    pub(crate) fn new(purpose_columns: Vec<String>, rows: Vec<FeatureRow>) -> Self {
        Self {
            purpose_columns,
            rows,
        }
    }

    /// Column names in model input order: scaled numerics, ordinal/binary codes, purpose flags.
    pub fn columns(&self) -> Vec<String> {
        column_names(&self.purpose_columns)
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(FeatureRow::to_vector).collect()
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let position = self.columns().iter().position(|column| column == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.to_vector()[position])
                .collect(),
        )
    }

    /// Encoded income variability codes (0 = Low, 1 = High) for fairness evaluation.
    pub fn protected_attribute(&self) -> Vec<u8> {
        self.rows.iter().map(|row| row.income_variability).collect()
    }

    /// Ground-truth labels, present only when every row carried `loan_status`.
    pub fn labels(&self) -> Option<Vec<u8>> {
        self.rows.iter().map(|row| row.loan_status).collect()
    }
}

pub(crate) fn purpose_column(value: &str) -> String {
    format!("{PURPOSE_PREFIX}{value}")
}

pub(crate) fn column_names(purpose_columns: &[String]) -> Vec<String> {
    NumericFeature::ordered()
        .into_iter()
        .map(|feature| feature.column().to_string())
        .chain([
            EMPLOYMENT_STATUS_COLUMN.to_string(),
            INCOME_VARIABILITY_COLUMN.to_string(),
        ])
        .chain(purpose_columns.iter().map(|value| purpose_column(value)))
        .collect()
}
