//! Overpricing risk analysis for public procurement bids.
//!
//! The engine combines five independent suspicion signals into one weighted
//! 0–100 risk score: price deviation against market references, tailor-made
//! specification wording, cartel-style win concentration, low competition,
//! and (inert, weight zero) suspiciously short deadlines. The surrounding
//! service, provider, and repository modules carry the I/O the pure engine
//! refuses to do.

pub mod domain;
pub mod engine;
pub mod provider;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AwardRecord, BidId, BidRecord, CaseStatus, PriorityLevel, ReferenceData, RiskAssessment,
    RiskLevel, SignalKind, SignalResult,
};
pub use engine::{
    AssessmentError, EngineConfig, EngineConfigError, RiskEngine, SignalWeights, CARTEL_WEIGHT,
    COMPETITION_WEIGHT, DEADLINE_WEIGHT, PRICE_WEIGHT, SPECIFICATION_WEIGHT,
};
pub use provider::{ProviderError, ReferenceDataProvider};
pub use repository::{CaseRecord, CaseRepository, CaseView, RepositoryError, SignalView};
pub use router::cases_router;
pub use service::{AgencySummary, CaseFilters, CaseService, CaseServiceError, Statistics};
