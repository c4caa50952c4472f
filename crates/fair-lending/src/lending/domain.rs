use serde::{Deserialize, Serialize};

/// One loan application row as received from intake or a training export.
///
/// Categorical fields stay as raw strings so that out-of-vocabulary values reach the
/// encoder and are reported as unknown categories instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub age: u32,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_term: u32,
    pub credit_score: i32,
    pub employment_status: String,
    pub loan_purpose: String,
    pub existing_loans: u32,
    pub income_variability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_status: Option<u8>,
}

/// Ordinal employment levels; higher means more stable income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Unemployed,
    SelfEmployed,
    Employed,
}

impl EmploymentStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Unemployed, Self::SelfEmployed, Self::Employed]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unemployed => "Unemployed",
            Self::SelfEmployed => "Self-Employed",
            Self::Employed => "Employed",
        }
    }

    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Unemployed => 0,
            Self::SelfEmployed => 1,
            Self::Employed => 2,
        }
    }
}

/// The protected attribute audited for approval disparities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeVariability {
    Low,
    High,
}

impl IncomeVariability {
    pub const fn ordered() -> [Self; 2] {
        [Self::Low, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::High => "High",
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|level| level.label() == raw)
    }

    pub const fn group(self) -> ProtectedGroup {
        match self {
            Self::Low => ProtectedGroup::Privileged,
            Self::High => ProtectedGroup::Unprivileged,
        }
    }
}

/// Side of the fairness comparison a protected-attribute code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedGroup {
    Privileged,
    Unprivileged,
}

impl ProtectedGroup {
    pub const PRIVILEGED_CODE: u8 = 0;
    pub const UNPRIVILEGED_CODE: u8 = 1;

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            Self::PRIVILEGED_CODE => Some(Self::Privileged),
            Self::UNPRIVILEGED_CODE => Some(Self::Unprivileged),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Privileged => "Low Income Variability",
            Self::Unprivileged => "High Income Variability",
        }
    }
}
