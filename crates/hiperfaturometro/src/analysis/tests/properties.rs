use proptest::prelude::*;

use super::common::*;
use crate::analysis::domain::ReferenceData;

fn arb_reference() -> impl Strategy<Value = ReferenceData> {
    (
        proptest::option::of(100.0f64..10_000.0),
        0u32..30,
        1u32..30,
    )
        .prop_map(|(market, wins, losses)| ReferenceData {
            market_unit_price: market,
            award_history: award_history(
                "Ministério da Educação",
                "TechSupply LTDA",
                wins,
                wins + losses,
            ),
            suspicious_terms: None,
        })
}

proptest! {
    #[test]
    fn final_score_is_always_within_bounds(
        unit_price in 1.0f64..50_000.0,
        bidders in proptest::option::of(0u32..10),
        reference in arb_reference(),
    ) {
        let engine = engine();
        let mut bid = notebook_bid();
        bid.unit_price = unit_price;
        bid.bidders = bidders;

        let assessment = engine.evaluate(&bid, &reference).expect("valid bid");

        prop_assert!(assessment.risk_score >= 0.0);
        prop_assert!(assessment.risk_score <= 100.0);
        for signal in &assessment.signals {
            prop_assert!(signal.score >= 0.0 && signal.score <= 100.0);
        }
    }

    #[test]
    fn final_score_is_monotonic_in_the_proposed_price(
        lower in 1.0f64..25_000.0,
        bump in 0.0f64..25_000.0,
        market in 100.0f64..10_000.0,
    ) {
        let engine = engine();
        let reference = reference_with_price(market);

        let mut cheaper = notebook_bid();
        cheaper.unit_price = lower;
        let mut dearer = notebook_bid();
        dearer.unit_price = lower + bump;

        let low = engine.evaluate(&cheaper, &reference).expect("valid bid");
        let high = engine.evaluate(&dearer, &reference).expect("valid bid");

        prop_assert!(high.risk_score >= low.risk_score);
    }

    #[test]
    fn evaluation_is_deterministic(
        unit_price in 1.0f64..50_000.0,
        reference in arb_reference(),
    ) {
        let engine = engine();
        let mut bid = notebook_bid();
        bid.unit_price = unit_price;

        let first = engine.evaluate(&bid, &reference).expect("valid bid");
        let second = engine.evaluate(&bid, &reference).expect("valid bid");

        prop_assert_eq!(first, second);
    }
}
