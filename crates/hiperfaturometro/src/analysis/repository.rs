use serde::{Deserialize, Serialize};

use super::domain::{BidId, BidRecord, RiskAssessment, SignalResult};

/// Stored case: the bid under analysis, the market price the assessment was
/// computed against, and the immutable assessment itself. A re-assessment
/// supersedes the record wholesale; nothing is ever edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub bid: BidRecord,
    pub market_unit_price: Option<f64>,
    pub assessment: RiskAssessment,
}

impl CaseRecord {
    /// Flattened view matching the field names the presentation layer
    /// renders in case cards and the detail modal.
    pub fn view(&self) -> CaseView {
        CaseView {
            id: self.bid.id.0.clone(),
            orgao: self.bid.agency.clone(),
            produto: self.bid.product.clone(),
            empresa_vencedora: self.bid.winning_company.clone(),
            valor_estimado: self.bid.estimated_total,
            preco_edital: self.bid.unit_price,
            preco_mercado: self.market_unit_price,
            risk_score: self.assessment.risk_score,
            risk_level: self.assessment.risk_level.label(),
            priority_level: self.assessment.priority_level.label(),
            status: self.assessment.status.label(),
            diferenca_percentual: self.assessment.diferenca_percentual,
            valor_superfaturado: self.assessment.valor_superfaturado,
            evidencias: self.assessment.evidencias.clone(),
            sinais: self.assessment.signals.iter().map(SignalView::from).collect(),
        }
    }
}

/// Wire representation of a case, exactly as the existing UI consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseView {
    pub id: String,
    pub orgao: String,
    pub produto: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa_vencedora: Option<String>,
    pub valor_estimado: f64,
    pub preco_edital: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_mercado: Option<f64>,
    pub risk_score: f64,
    pub risk_level: &'static str,
    pub priority_level: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diferenca_percentual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_superfaturado: Option<f64>,
    pub evidencias: Vec<String>,
    pub sinais: Vec<SignalView>,
}

/// One row of the per-signal breakdown rendered in the case detail modal,
/// labelled the way the dashboard names the signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalView {
    pub nome: &'static str,
    pub score: f64,
    pub aplicavel: bool,
}

impl From<&SignalResult> for SignalView {
    fn from(signal: &SignalResult) -> Self {
        Self {
            nome: signal.kind.label(),
            score: signal.score,
            aplicavel: signal.applicable,
        }
    }
}

/// Storage abstraction so the case service can be exercised in isolation;
/// the engine places no constraint on storage beyond reproducibility.
pub trait CaseRepository: Send + Sync {
    /// Insert or supersede the record keyed by its bid identifier.
    fn upsert(&self, record: CaseRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BidId) -> Result<Option<CaseRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<CaseRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("case not found")]
    NotFound,
    #[error("case store unavailable: {0}")]
    Unavailable(String),
}
