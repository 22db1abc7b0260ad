use super::super::domain::{CaseStatus, PriorityLevel, RiskLevel};

/// Half-open category bands, upper bound exclusive except the top:
/// [0,40) Baixo, [40,60) Médio, [60,80) Alto, [80,100] Crítico.
pub(crate) fn risk_level_for(score: f64) -> RiskLevel {
    if score < 40.0 {
        RiskLevel::Baixo
    } else if score < 60.0 {
        RiskLevel::Medio
    } else if score < 80.0 {
        RiskLevel::Alto
    } else {
        RiskLevel::Critico
    }
}

/// Every category maps to a distinct priority; Crítico escalates past Alta
/// instead of collapsing into it.
pub(crate) fn priority_for(level: RiskLevel) -> PriorityLevel {
    match level {
        RiskLevel::Baixo => PriorityLevel::Baixa,
        RiskLevel::Medio => PriorityLevel::Media,
        RiskLevel::Alto => PriorityLevel::Alta,
        RiskLevel::Critico => PriorityLevel::Urgente,
    }
}

/// Freshly computed assessments always start here; later transitions are
/// owned by the case-management collaborator.
pub(crate) fn initial_status() -> CaseStatus {
    CaseStatus::EmAnalise
}
