//! Loan approval scoring and fairness auditing.
//!
//! Records flow through `preprocessing` into a trained model behind `scoring`; the model's
//! decisions are compared across income variability groups by `fairness`.

pub mod dataset;
pub mod domain;
pub mod fairness;
pub mod preprocessing;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use domain::{EmploymentStatus, IncomeVariability, LoanRecord, ProtectedGroup};
pub use fairness::{
    ApprovalBaseline, FairnessError, FairnessEvaluator, FairnessReport, FairnessVerdict,
    GroupMetrics,
};
pub use preprocessing::{FeatureSet, FeatureStats, FeatureTransformer, PreprocessError};
pub use scoring::{
    scoring_router, ApprovalModel, LoanScoringService, LogisticModel, ScoringError,
    ScoringResponse,
};
