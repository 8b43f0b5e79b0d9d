//! Quota-constrained internship allocation.
//!
//! A run validates the roster, builds a fresh [`QuotaLedger`] from each position's
//! reservations, and lets the [`AllocationDriver`] walk candidates in merit order, scoring
//! every still-eligible position through a [`CompatibilityScorer`]. The service and router
//! wrap the engine with storage and HTTP access.

pub mod domain;
pub mod driver;
pub mod ledger;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AllocationOutcome, AllocationSummary, Assignment, Candidate, CandidateId,
    CandidateSubmission, Category, NoMatchReason, Position, PositionId, PositionSubmission,
    UnassignedCandidate, UnknownCategory,
};
pub use driver::{AllocationDriver, AllocationError};
pub use ledger::{LedgerError, QuotaLedger};
pub use repository::{AllocationStore, AssignmentView, StoreError};
pub use router::allocation_router;
pub use scoring::{
    AllocationConfig, CompatibilityScorer, ScoreCard, ScoreComponent, ScoreTerm, ScoringWeights,
    WeightedScorer,
};
pub use service::{AllocationService, AllocationServiceError, RunReport};
pub use validation::{AllocationGuard, ValidationError, MERIT_MAX};
