use std::sync::Arc;

use super::common::*;
use crate::analysis::domain::{BidId, RiskLevel};
use crate::analysis::service::{CaseFilters, CaseService, CaseServiceError};
use crate::analysis::EngineConfig;

#[test]
fn assess_persists_the_case_with_its_market_price() {
    let (service, repository) = build_service();
    let bid = notebook_bid();

    let assessment = service.assess(bid.clone()).expect("assessment succeeds");
    assert_eq!(assessment.risk_score, 3.3);

    let record = service.get(&bid.id).expect("case stored");
    assert_eq!(record.market_unit_price, Some(2_500.0));
    assert_eq!(record.assessment, assessment);
    assert_eq!(repository.len(), 1);
}

#[test]
fn case_view_labels_the_signal_breakdown() {
    let (service, _) = build_service();
    let bid = notebook_bid();
    service.assess(bid.clone()).expect("assessment succeeds");

    let view = service.get(&bid.id).expect("case stored").view();
    let nomes: Vec<&str> = view.sinais.iter().map(|sinal| sinal.nome).collect();
    assert_eq!(
        nomes,
        vec![
            "Preço Excessivo",
            "Especificações Tailor-Made",
            "Empresa Cartel",
            "Baixa Concorrência",
            "Prazo Suspeito",
        ]
    );
    assert!(view.sinais[0].aplicavel);
    assert!(view.sinais[0].score > 0.0);
}

#[test]
fn reassessment_supersedes_the_stored_record() {
    let (service, repository) = build_service();
    let mut bid = notebook_bid();
    service.assess(bid.clone()).expect("first assessment");

    bid.unit_price = 7_500.0;
    let second = service.assess(bid.clone()).expect("second assessment");

    assert_eq!(repository.len(), 1);
    let record = service.get(&bid.id).expect("case stored");
    assert_eq!(record.assessment.risk_score, second.risk_score);
    assert_eq!(record.bid.unit_price, 7_500.0);
}

#[test]
fn list_orders_by_score_and_honors_filters() {
    let (service, _) = build_service();

    let low = notebook_bid();
    service.assess(low).expect("low-risk case");

    let mut high = notebook_bid();
    high.id = BidId("caso-002".to_string());
    high.unit_price = 7_500.0;
    high.bidders = Some(1);
    service.assess(high).expect("high-risk case");

    let all = service.list(&CaseFilters::default()).expect("list");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "caso-002");
    assert!(all[0].risk_score > all[1].risk_score);

    let only_low = service
        .list(&CaseFilters {
            risk_level: Some(RiskLevel::Baixo),
            ..CaseFilters::default()
        })
        .expect("filtered list");
    assert_eq!(only_low.len(), 1);
    assert_eq!(only_low[0].id, "caso-001");

    let limited = service
        .list(&CaseFilters {
            limit: Some(1),
            ..CaseFilters::default()
        })
        .expect("limited list");
    assert_eq!(limited.len(), 1);

    let other_agency = service
        .list(&CaseFilters {
            orgao: Some("Ministerio inexistente".to_string()),
            ..CaseFilters::default()
        })
        .expect("agency filter");
    assert!(other_agency.is_empty());
}

#[test]
fn statistics_aggregate_stored_cases() {
    let (service, _) = build_service();
    service.assess(notebook_bid()).expect("case assessed");

    let statistics = service.statistics().expect("statistics");

    assert_eq!(statistics.total_casos, 1);
    assert_eq!(statistics.por_nivel.get("Baixo"), Some(&1));
    assert_eq!(statistics.por_nivel.get("Crítico"), Some(&0));
    assert_eq!(statistics.valor_total_estimado, 360_000.0);
    assert_eq!(statistics.valor_total_superfaturado, 110_000.0);
    assert_eq!(statistics.score_medio, 3.3);
}

#[test]
fn by_agency_groups_and_averages() {
    let (service, _) = build_service();
    service.assess(notebook_bid()).expect("first case");

    let mut other = notebook_bid();
    other.id = BidId("caso-002".to_string());
    other.agency = "Ministério da Saúde".to_string();
    service.assess(other).expect("second case");

    let groups = service.by_agency().expect("grouping");

    assert_eq!(groups.len(), 2);
    assert!(groups
        .iter()
        .any(|group| group.orgao == "Ministério da Educação" && group.total_casos == 1));
    assert!(groups.iter().all(|group| group.score_medio >= 0.0));
}

#[test]
fn batch_assessment_preserves_order_and_fails_fast_on_a_malformed_bid() {
    let (service, _) = build_service();

    let first = notebook_bid();
    let mut second = notebook_bid();
    second.id = BidId("caso-002".to_string());
    let assessments = service
        .assess_all(vec![first.clone(), second.clone()])
        .expect("well-formed batch");
    assert_eq!(assessments[0].bid_id, first.id);
    assert_eq!(assessments[1].bid_id, second.id);

    let (service, repository) = build_service();
    let mut malformed = notebook_bid();
    malformed.id = BidId("caso-002".to_string());
    malformed.quantity = 0;

    let result = service.assess_all(vec![notebook_bid(), malformed]);

    assert!(matches!(
        result,
        Err(CaseServiceError::Assessment(_))
    ));
    // Cases assessed before the malformed bid stay stored.
    assert_eq!(repository.len(), 1);
}

#[test]
fn provider_failure_surfaces_instead_of_scoring_blind() {
    let repository = MemoryRepository::default();
    let service = CaseService::new(
        Arc::new(UnreachableProvider),
        Arc::new(repository.clone()),
        EngineConfig::default(),
    )
    .expect("default config is valid");

    let result = service.assess(notebook_bid());

    assert!(matches!(result, Err(CaseServiceError::Provider(_))));
    assert_eq!(repository.len(), 0);
}
