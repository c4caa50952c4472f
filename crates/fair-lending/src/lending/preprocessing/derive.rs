use super::super::domain::LoanRecord;
use super::PreprocessError;

/// Ratio features computed from a single application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub debt_to_income: f64,
    pub loan_to_income: f64,
}

impl DerivedFeatures {
    /// `debt_to_income = loan_amount / (income * loan_term / 12)`,
    /// `loan_to_income = loan_amount / income`.
    pub fn compute(record: &LoanRecord) -> Result<Self, String> {
        if !record.income.is_finite() || record.income <= 0.0 {
            return Err(format!("income must be positive, found {}", record.income));
        }
        if record.loan_term == 0 {
            return Err("loan_term must be at least one month".to_string());
        }
        if !record.loan_amount.is_finite() || record.loan_amount <= 0.0 {
            return Err(format!(
                "loan_amount must be positive, found {}",
                record.loan_amount
            ));
        }

        let annualized_term = f64::from(record.loan_term) / 12.0;
        Ok(Self {
            debt_to_income: record.loan_amount / (record.income * annualized_term),
            loan_to_income: record.loan_amount / record.income,
        })
    }
}

/// A validated record paired with its derived ratios.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DerivedRecord<'a> {
    pub source: &'a LoanRecord,
    pub derived: DerivedFeatures,
}

/// Stage one: validate every row and attach its ratio features.
pub(crate) fn derive_features(
    records: &[LoanRecord],
) -> Result<Vec<DerivedRecord<'_>>, PreprocessError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            validate(record).map_err(|reason| PreprocessError::InvalidRecord { index, reason })?;
            let derived = DerivedFeatures::compute(record)
                .map_err(|reason| PreprocessError::InvalidRecord { index, reason })?;
            Ok(DerivedRecord {
                source: record,
                derived,
            })
        })
        .collect()
}

fn validate(record: &LoanRecord) -> Result<(), String> {
    if record.age == 0 {
        return Err("age must be positive".to_string());
    }
    match record.loan_status {
        None | Some(0) | Some(1) => Ok(()),
        Some(other) => Err(format!("loan_status must be 0 or 1, found {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(loan_amount: f64, income: f64, loan_term: u32) -> LoanRecord {
        LoanRecord {
            age: 30,
            income,
            loan_amount,
            loan_term,
            credit_score: 650,
            employment_status: "Employed".to_string(),
            loan_purpose: "Car".to_string(),
            existing_loans: 1,
            income_variability: "Low".to_string(),
            loan_status: None,
        }
    }

    #[test]
    fn one_year_term_makes_ratios_equal() {
        let derived = DerivedFeatures::compute(&record(20_000.0, 50_000.0, 12)).expect("valid");
        assert_eq!(derived.loan_to_income, 0.4);
        assert_eq!(derived.debt_to_income, 0.4);
    }

    #[test]
    fn longer_terms_spread_debt_over_more_income() {
        let derived = DerivedFeatures::compute(&record(30_000.0, 60_000.0, 24)).expect("valid");
        assert_eq!(derived.loan_to_income, 0.5);
        assert_eq!(derived.debt_to_income, 0.25);
    }

    #[test]
    fn zero_income_is_an_invalid_record() {
        let rows = vec![record(20_000.0, 50_000.0, 12), record(20_000.0, 0.0, 12)];
        match derive_features(&rows) {
            Err(PreprocessError::InvalidRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("income"));
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn zero_term_is_an_invalid_record() {
        let rows = vec![record(20_000.0, 50_000.0, 0)];
        assert!(matches!(
            derive_features(&rows),
            Err(PreprocessError::InvalidRecord { index: 0, .. })
        ));
    }

    #[test]
    fn non_binary_label_is_rejected() {
        let mut row = record(20_000.0, 50_000.0, 12);
        row.loan_status = Some(2);
        assert!(matches!(
            derive_features(std::slice::from_ref(&row)),
            Err(PreprocessError::InvalidRecord { .. })
        ));
    }
}
