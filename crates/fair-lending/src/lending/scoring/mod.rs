//! Serving boundary: a fitted transformer plus a trained model behind HTTP handlers.

pub mod artifacts;
pub mod model;
pub mod router;
pub mod service;

pub use artifacts::{load_model, save_model, ArtifactError, PreprocessorArtifact};
pub use model::{ApprovalModel, LogisticModel, ModelError};
pub use router::{scoring_router, FairnessEvaluationRequest, FairnessEvaluationResponse};
pub use service::{
    ApplicantFairnessSummary, BatchPredictions, FairnessAudit, LoanScoringService,
    ScoringError, ScoringResponse,
};
