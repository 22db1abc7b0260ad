use crate::infra::{default_engine_config, InMemoryCaseRepository, StaticReferenceProvider};
use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use hiperfaturometro::analysis::{
    AwardRecord, BidId, BidRecord, CaseFilters, CaseService, ReferenceData, RiskEngine,
};
use hiperfaturometro::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print each compiled evidence list alongside the case summary.
    #[arg(long)]
    pub(crate) show_evidence: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file with an array of { "bid": ..., "reference": ... } pairs.
    pub(crate) input: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ScoreInput {
    bid: BidRecord,
    reference: ReferenceData,
}

/// Reference tables seeding the worked examples from the method
/// documentation: the overpriced notebook, the concentrated supplier, the
/// single-bidder rush.
pub(crate) fn demo_reference_provider() -> StaticReferenceProvider {
    let mut market_prices = HashMap::new();
    market_prices.insert("Notebook Dell Inspiron 15".to_string(), 2_500.0);
    market_prices.insert("Papel A4 resma 500 folhas".to_string(), 25.0);
    market_prices.insert("Cadeira de escritório ergonômica".to_string(), 900.0);

    let mut award_history = Vec::new();
    for i in 0..18 {
        award_history.push(AwardRecord {
            agency: "Ministério da Educação".to_string(),
            company: "TechSupply LTDA".to_string(),
            won: i < 15,
        });
    }
    for i in 0..6 {
        award_history.push(AwardRecord {
            agency: "Prefeitura de Rio Verde".to_string(),
            company: "Móveis Central ME".to_string(),
            won: i < 2,
        });
    }

    StaticReferenceProvider::new(market_prices, award_history)
}

fn demo_bids() -> Vec<BidRecord> {
    vec![
        BidRecord {
            id: BidId("demo-001".to_string()),
            title: "Aquisição de notebooks para laboratórios".to_string(),
            agency: "Ministério da Educação".to_string(),
            winning_company: Some("TechSupply LTDA".to_string()),
            product: "Notebook Dell Inspiron 15".to_string(),
            specification: Some(
                "Fornecer exclusivamente notebooks do modelo indicado, \
                 obrigatoriamente com assistência do fabricante"
                    .to_string(),
            ),
            estimated_total: 360_000.0,
            unit_price: 3_600.0,
            quantity: 100,
            bidders: Some(2),
            opening_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            closing_deadline: NaiveDate::from_ymd_opt(2025, 3, 31),
        },
        BidRecord {
            id: BidId("demo-002".to_string()),
            title: "Material de expediente".to_string(),
            agency: "Prefeitura de Rio Verde".to_string(),
            winning_company: Some("Papelaria Boa Vista EPP".to_string()),
            product: "Papel A4 resma 500 folhas".to_string(),
            specification: Some("Resma de papel A4, 75g/m², alvura mínima de 90%".to_string()),
            estimated_total: 12_500.0,
            unit_price: 26.0,
            quantity: 500,
            bidders: Some(7),
            opening_date: NaiveDate::from_ymd_opt(2025, 4, 2),
            closing_deadline: NaiveDate::from_ymd_opt(2025, 4, 22),
        },
        BidRecord {
            id: BidId("demo-003".to_string()),
            title: "Mobiliário para gabinete".to_string(),
            agency: "Prefeitura de Rio Verde".to_string(),
            winning_company: Some("Móveis Central ME".to_string()),
            product: "Cadeira de escritório ergonômica".to_string(),
            specification: Some("Cadeira giratória com apoio lombar".to_string()),
            estimated_total: 105_000.0,
            unit_price: 2_100.0,
            quantity: 50,
            bidders: Some(1),
            opening_date: NaiveDate::from_ymd_opt(2025, 5, 5),
            closing_deadline: NaiveDate::from_ymd_opt(2025, 5, 8),
        },
    ]
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = CaseService::new(
        Arc::new(demo_reference_provider()),
        Arc::new(InMemoryCaseRepository::default()),
        default_engine_config(),
    )?;

    println!("Hiperfaturômetro demo: scoring {} seeded cases\n", demo_bids().len());
    for bid in demo_bids() {
        service.assess(bid)?;
    }

    let cases = service.list(&CaseFilters::default())?;
    for case in &cases {
        println!(
            "{} | {} | score {:>5.1} | {} | prioridade {}",
            case.id, case.produto, case.risk_score, case.risk_level, case.priority_level
        );
        if args.show_evidence {
            for evidencia in &case.evidencias {
                println!("    - {evidencia}");
            }
        }
    }

    let statistics = service.statistics()?;
    println!(
        "\n{} casos | valor estimado R$ {:.2} | superfaturamento estimado R$ {:.2}",
        statistics.total_casos,
        statistics.valor_total_estimado,
        statistics.valor_total_superfaturado
    );
    for (nivel, count) in &statistics.por_nivel {
        println!("  {nivel}: {count}");
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = std::fs::read(&args.input)?;
    let inputs: Vec<ScoreInput> = serde_json::from_slice(&raw)?;

    let engine = RiskEngine::new(default_engine_config())?;
    let pairs: Vec<_> = inputs
        .iter()
        .map(|input| (&input.bid, &input.reference))
        .collect();
    let assessments = engine.evaluate_all(pairs)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&assessments).map_err(AppError::from)?
    );
    Ok(())
}
