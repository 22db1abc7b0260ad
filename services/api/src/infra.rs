use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use hiperfaturometro::analysis::{
    AwardRecord, BidId, BidRecord, CaseRecord, CaseRepository, EngineConfig, ProviderError,
    ReferenceData, ReferenceDataProvider, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseRepository {
    records: Arc<Mutex<HashMap<BidId, CaseRecord>>>,
}

impl CaseRepository for InMemoryCaseRepository {
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

/// Reference adapter backed by static tables: market prices per product
/// description and a flat award history. Stands in for the market-price and
/// procurement-history collaborators until those integrations land.
#[derive(Default, Clone)]
pub(crate) struct StaticReferenceProvider {
    market_prices: HashMap<String, f64>,
    award_history: Vec<AwardRecord>,
}

impl StaticReferenceProvider {
    pub(crate) fn new(market_prices: HashMap<String, f64>, award_history: Vec<AwardRecord>) -> Self {
        Self {
            market_prices,
            award_history,
        }
    }
}

impl ReferenceDataProvider for StaticReferenceProvider {
    fn reference_for(&self, bid: &BidRecord) -> Result<ReferenceData, ProviderError> {
        let market_unit_price = self.market_prices.get(&bid.product).copied();
        let award_history = self
            .award_history
            .iter()
            .filter(|record| record.agency == bid.agency)
            .cloned()
            .collect();
        Ok(ReferenceData {
            market_unit_price,
            award_history,
            suspicious_terms: None,
        })
    }
}

pub(crate) fn default_engine_config() -> EngineConfig {
    EngineConfig::default()
}
