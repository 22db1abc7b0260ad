use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for procurement line items under analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidId(pub String);

/// One procurement line item as delivered by the ingestion collaborator.
///
/// Immutable once ingested; the engine reads it and never writes it back.
/// Optional fields carry explicit unknowns so evaluators can distinguish
/// "no data" from "zero". Serialized names follow the wire contract shared
/// with the ingestion service and the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRecord {
    pub id: BidId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "orgao")]
    pub agency: String,
    #[serde(rename = "empresa_vencedora")]
    pub winning_company: Option<String>,
    #[serde(rename = "produto")]
    pub product: String,
    #[serde(rename = "especificacao")]
    pub specification: Option<String>,
    #[serde(rename = "valor_estimado")]
    pub estimated_total: f64,
    #[serde(rename = "preco_edital")]
    pub unit_price: f64,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "num_participantes")]
    pub bidders: Option<u32>,
    #[serde(rename = "data_abertura")]
    pub opening_date: Option<NaiveDate>,
    #[serde(rename = "data_fechamento")]
    pub closing_deadline: Option<NaiveDate>,
}

/// One historical award outcome at an agency, used by the cartel signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub agency: String,
    pub company: String,
    pub won: bool,
}

/// Per-bid lookup bundle supplied fresh by the reference data provider.
///
/// A missing market price means "unknown", never "free": the price signal
/// must abstain instead of scoring. The suspicious-term override, when
/// present and non-empty, replaces the engine's configured lexicon for this
/// one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub market_unit_price: Option<f64>,
    pub award_history: Vec<AwardRecord>,
    pub suspicious_terms: Option<Vec<String>>,
}

/// The five suspicion signals, in the fixed declaration order used for
/// evidence compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    PriceDeviation,
    SpecificationBias,
    CartelConcentration,
    LowCompetition,
    ShortDeadline,
}

impl SignalKind {
    pub const fn label(self) -> &'static str {
        match self {
            SignalKind::PriceDeviation => "Preço Excessivo",
            SignalKind::SpecificationBias => "Especificações Tailor-Made",
            SignalKind::CartelConcentration => "Empresa Cartel",
            SignalKind::LowCompetition => "Baixa Concorrência",
            SignalKind::ShortDeadline => "Prazo Suspeito",
        }
    }
}

/// Output of one signal evaluator before weighting.
///
/// `applicable` is false when the reference data required by the evaluator
/// is missing; such results carry a zero score and no evidence, and are
/// excluded from the compiled evidence list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub kind: SignalKind,
    pub score: f64,
    pub applicable: bool,
    pub evidence: Vec<String>,
}

impl SignalResult {
    pub(crate) fn not_applicable(kind: SignalKind) -> Self {
        Self {
            kind,
            score: 0.0,
            applicable: false,
            evidence: Vec::new(),
        }
    }
}

/// Risk category derived from the final weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Baixo,
    #[serde(rename = "Médio", alias = "Medio")]
    Medio,
    Alto,
    #[serde(rename = "Crítico", alias = "Critico")]
    Critico,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Baixo => "Baixo",
            RiskLevel::Medio => "Médio",
            RiskLevel::Alto => "Alto",
            RiskLevel::Critico => "Crítico",
        }
    }
}

/// Investigation priority proposed alongside the risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityLevel {
    Baixa,
    #[serde(rename = "Média", alias = "Media")]
    Media,
    Alta,
    Urgente,
}

impl PriorityLevel {
    pub const fn label(self) -> &'static str {
        match self {
            PriorityLevel::Baixa => "Baixa",
            PriorityLevel::Media => "Média",
            PriorityLevel::Alta => "Alta",
            PriorityLevel::Urgente => "Urgente",
        }
    }
}

/// Case lifecycle status. The engine only ever proposes the initial
/// "Em análise"; transitions belong to the case-management collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "Em análise", alias = "Em analise")]
    EmAnalise,
    Investigado,
    Arquivado,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CaseStatus::EmAnalise => "Em análise",
            CaseStatus::Investigado => "Investigado",
            CaseStatus::Arquivado => "Arquivado",
        }
    }
}

/// Final output of one evaluation: a deterministic, pure function of the
/// (BidRecord, ReferenceData) pair, kept immutable for audit reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub bid_id: BidId,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub evidencias: Vec<String>,
    pub priority_level: PriorityLevel,
    pub status: CaseStatus,
    /// Price deviation against the market reference, in percent; absent
    /// when the reference price is unknown.
    pub diferenca_percentual: Option<f64>,
    /// Estimated overcharge `(proposed - reference) * quantity`, floored at
    /// zero; absent when the reference price is unknown.
    pub valor_superfaturado: Option<f64>,
    /// Per-signal breakdown retained for transparent audits.
    pub signals: Vec<SignalResult>,
}
