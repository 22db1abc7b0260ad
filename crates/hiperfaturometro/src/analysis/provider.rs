use super::domain::{BidRecord, ReferenceData};

/// Narrow interface to the external reference data collaborator.
///
/// All I/O (and any caching, retry, or timeout policy) lives behind this
/// trait; the engine itself stays pure. Absent lookups must surface as
/// explicit unknowns inside `ReferenceData`, never as zeros.
pub trait ReferenceDataProvider: Send + Sync {
    fn reference_for(&self, bid: &BidRecord) -> Result<ReferenceData, ProviderError>;
}

/// Reference lookup failure.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("reference data source unavailable: {0}")]
    Unavailable(String),
}
