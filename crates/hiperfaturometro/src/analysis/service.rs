use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{BidId, BidRecord, PriorityLevel, RiskAssessment, RiskLevel};
use super::engine::{AssessmentError, EngineConfig, EngineConfigError, RiskEngine};
use super::provider::{ProviderError, ReferenceDataProvider};
use super::repository::{CaseRecord, CaseRepository, CaseView, RepositoryError};

/// Service composing the reference data provider, the case store, and the
/// pure scoring engine. All I/O happens here, before and after the engine
/// call, keeping the engine itself free of timeout and retry concerns.
pub struct CaseService<P, R> {
    provider: Arc<P>,
    repository: Arc<R>,
    engine: RiskEngine,
}

impl<P, R> CaseService<P, R>
where
    P: ReferenceDataProvider + 'static,
    R: CaseRepository + 'static,
{
    pub fn new(
        provider: Arc<P>,
        repository: Arc<R>,
        config: EngineConfig,
    ) -> Result<Self, EngineConfigError> {
        let engine = RiskEngine::new(config)?;
        Ok(Self {
            provider,
            repository,
            engine,
        })
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    /// Fetch reference data, score the bid, and persist the resulting case.
    /// A re-assessment of the same bid supersedes the stored record.
    pub fn assess(&self, bid: BidRecord) -> Result<RiskAssessment, CaseServiceError> {
        let reference = self.provider.reference_for(&bid)?;
        let assessment = self.engine.evaluate(&bid, &reference)?;

        if assessment.risk_level >= RiskLevel::Alto {
            warn!(
                bid_id = %bid.id.0,
                score = assessment.risk_score,
                level = assessment.risk_level.label(),
                "high-risk procurement case detected"
            );
        } else {
            info!(bid_id = %bid.id.0, score = assessment.risk_score, "bid assessed");
        }

        self.repository.upsert(CaseRecord {
            market_unit_price: reference.market_unit_price,
            bid,
            assessment: assessment.clone(),
        })?;

        Ok(assessment)
    }

    /// Batch assessment preserving input order in the output.
    pub fn assess_all(
        &self,
        bids: Vec<BidRecord>,
    ) -> Result<Vec<RiskAssessment>, CaseServiceError> {
        bids.into_iter().map(|bid| self.assess(bid)).collect()
    }

    pub fn get(&self, id: &BidId) -> Result<CaseRecord, CaseServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Stored cases ordered by score descending (identifier as tiebreaker
    /// so the order is reproducible), filtered and truncated per request.
    pub fn list(&self, filters: &CaseFilters) -> Result<Vec<CaseView>, CaseServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by(|a, b| {
            b.assessment
                .risk_score
                .total_cmp(&a.assessment.risk_score)
                .then_with(|| a.bid.id.0.cmp(&b.bid.id.0))
        });

        let views = records
            .iter()
            .filter(|record| filters.matches(record))
            .take(filters.limit.unwrap_or(usize::MAX))
            .map(CaseRecord::view)
            .collect();
        Ok(views)
    }

    /// Aggregate counters rendered on the statistics panel.
    pub fn statistics(&self) -> Result<Statistics, CaseServiceError> {
        let records = self.repository.list()?;

        let mut por_nivel = BTreeMap::new();
        for level in [
            RiskLevel::Baixo,
            RiskLevel::Medio,
            RiskLevel::Alto,
            RiskLevel::Critico,
        ] {
            por_nivel.insert(level.label().to_string(), 0usize);
        }

        let mut valor_total_estimado = 0.0;
        let mut valor_total_superfaturado = 0.0;
        let mut score_sum = 0.0;
        for record in &records {
            *por_nivel
                .entry(record.assessment.risk_level.label().to_string())
                .or_insert(0) += 1;
            valor_total_estimado += record.bid.estimated_total;
            valor_total_superfaturado += record.assessment.valor_superfaturado.unwrap_or(0.0);
            score_sum += record.assessment.risk_score;
        }

        let total_casos = records.len();
        let score_medio = if total_casos == 0 {
            0.0
        } else {
            score_sum / total_casos as f64
        };

        Ok(Statistics {
            total_casos,
            por_nivel,
            valor_total_estimado,
            valor_total_superfaturado,
            score_medio,
        })
    }

    /// Cases grouped per issuing agency, largest group first (agency name
    /// as tiebreaker for reproducible reports).
    pub fn by_agency(&self) -> Result<Vec<AgencySummary>, CaseServiceError> {
        let records = self.repository.list()?;

        let mut groups: BTreeMap<String, (usize, f64, f64)> = BTreeMap::new();
        for record in &records {
            let entry = groups
                .entry(record.bid.agency.clone())
                .or_insert((0, 0.0, 0.0));
            entry.0 += 1;
            entry.1 += record.assessment.risk_score;
            entry.2 += record.bid.estimated_total;
        }

        let mut summaries: Vec<AgencySummary> = groups
            .into_iter()
            .map(|(orgao, (count, score_sum, valor))| AgencySummary {
                orgao,
                total_casos: count,
                score_medio: score_sum / count as f64,
                valor_estimado_total: valor,
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.total_casos
                .cmp(&a.total_casos)
                .then_with(|| a.orgao.cmp(&b.orgao))
        });
        Ok(summaries)
    }
}

/// Optional list filters mirroring the query parameters the UI sends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseFilters {
    pub limit: Option<usize>,
    pub risk_level: Option<RiskLevel>,
    pub orgao: Option<String>,
    pub priority_level: Option<PriorityLevel>,
}

impl CaseFilters {
    fn matches(&self, record: &CaseRecord) -> bool {
        if let Some(level) = self.risk_level {
            if record.assessment.risk_level != level {
                return false;
            }
        }
        if let Some(orgao) = &self.orgao {
            if !record.bid.agency.eq_ignore_ascii_case(orgao) {
                return false;
            }
        }
        if let Some(priority) = self.priority_level {
            if record.assessment.priority_level != priority {
                return false;
            }
        }
        true
    }
}

/// Aggregate counters for the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_casos: usize,
    pub por_nivel: BTreeMap<String, usize>,
    pub valor_total_estimado: f64,
    pub valor_total_superfaturado: f64,
    pub score_medio: f64,
}

/// Per-agency rollup for the by-orgao view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencySummary {
    pub orgao: String,
    pub total_casos: usize,
    pub score_medio: f64,
    pub valor_estimado_total: f64,
}

/// Error raised by the case service.
#[derive(Debug, thiserror::Error)]
pub enum CaseServiceError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
