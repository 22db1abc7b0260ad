use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::analysis::domain::{AwardRecord, BidId, BidRecord, ReferenceData};
use crate::analysis::provider::{ProviderError, ReferenceDataProvider};
use crate::analysis::repository::{CaseRecord, CaseRepository, RepositoryError};
use crate::analysis::service::CaseService;
use crate::analysis::{EngineConfig, RiskEngine};

pub(super) fn engine() -> RiskEngine {
    RiskEngine::new(EngineConfig::default()).expect("default config is valid")
}

/// The worked example from the documentation: notebook at R$ 3.600 against
/// a R$ 2.500 market reference (44% above).
pub(super) fn notebook_bid() -> BidRecord {
    BidRecord {
        id: BidId("caso-001".to_string()),
        title: "Aquisição de notebooks".to_string(),
        agency: "Ministério da Educação".to_string(),
        winning_company: Some("TechSupply LTDA".to_string()),
        product: "Notebook Dell Inspiron 15".to_string(),
        specification: Some("Notebook com processador de última geração".to_string()),
        estimated_total: 360_000.0,
        unit_price: 3_600.0,
        quantity: 100,
        bidders: Some(4),
        opening_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        closing_deadline: NaiveDate::from_ymd_opt(2025, 3, 31),
    }
}

pub(super) fn reference_with_price(market: f64) -> ReferenceData {
    ReferenceData {
        market_unit_price: Some(market),
        award_history: Vec::new(),
        suspicious_terms: None,
    }
}

/// Award history with `wins` victories out of `total` bids for the company
/// at the agency.
pub(super) fn award_history(agency: &str, company: &str, wins: u32, total: u32) -> Vec<AwardRecord> {
    (0..total)
        .map(|i| AwardRecord {
            agency: agency.to_string(),
            company: company.to_string(),
            won: i < wins,
        })
        .collect()
}

/// Bid carrying nothing the evaluators could work with: every signal must
/// abstain rather than fabricate suspicion.
pub(super) fn opaque_bid() -> BidRecord {
    BidRecord {
        id: BidId("caso-opaco".to_string()),
        title: "Contratação sem histórico".to_string(),
        agency: "Prefeitura de Nova Aurora".to_string(),
        winning_company: None,
        product: "Serviço de manutenção".to_string(),
        specification: None,
        estimated_total: 50_000.0,
        unit_price: 500.0,
        quantity: 100,
        bidders: None,
        opening_date: None,
        closing_deadline: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<BidId, CaseRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl CaseRepository for MemoryRepository {
    fn upsert(&self, record: CaseRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.bid.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &BidId) -> Result<Option<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Provider keyed by product description; unknown products resolve to an
/// all-unknown bundle instead of an error.
#[derive(Default, Clone)]
pub(super) struct StaticProvider {
    references: Arc<HashMap<String, ReferenceData>>,
}

impl StaticProvider {
    pub(super) fn with_references(references: HashMap<String, ReferenceData>) -> Self {
        Self {
            references: Arc::new(references),
        }
    }
}

impl ReferenceDataProvider for StaticProvider {
    fn reference_for(&self, bid: &BidRecord) -> Result<ReferenceData, ProviderError> {
        Ok(self
            .references
            .get(&bid.product)
            .cloned()
            .unwrap_or_default())
    }
}

pub(super) struct UnreachableProvider;

impl ReferenceDataProvider for UnreachableProvider {
    fn reference_for(&self, _bid: &BidRecord) -> Result<ReferenceData, ProviderError> {
        Err(ProviderError::Unavailable(
            "price reference service offline".to_string(),
        ))
    }
}

pub(super) fn build_service() -> (
    Arc<CaseService<StaticProvider, MemoryRepository>>,
    MemoryRepository,
) {
    let mut references = HashMap::new();
    references.insert(
        notebook_bid().product,
        reference_with_price(2_500.0),
    );
    let repository = MemoryRepository::default();
    let service = CaseService::new(
        Arc::new(StaticProvider::with_references(references)),
        Arc::new(repository.clone()),
        EngineConfig::default(),
    )
    .expect("default config is valid");
    (Arc::new(service), repository)
}
