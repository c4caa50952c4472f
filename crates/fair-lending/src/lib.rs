//! Loan application scoring with fairness auditing.
//!
//! `lending` holds the feature preprocessing pipeline, the fairness evaluator and the
//! scoring boundary that pairs a fitted transformer with a trained model. `config`,
//! `error` and `telemetry` carry the service plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;
