use super::super::domain::{BidRecord, ReferenceData, SignalKind, SignalResult};
use super::config::EngineConfig;

/// Common contract shared by the suspicion signals so the aggregation loop
/// stays generic: future signals only need a new implementation plus a
/// weight, never an Aggregator change.
pub(crate) trait SignalEvaluator: Send + Sync {
    fn kind(&self) -> SignalKind;

    fn evaluate(
        &self,
        bid: &BidRecord,
        reference: &ReferenceData,
        config: &EngineConfig,
    ) -> SignalResult;
}

/// Evaluators in the fixed declaration order that governs evidence
/// compilation: Price, Specification, Cartel, Competition, Deadline.
pub(crate) fn evaluators() -> Vec<Box<dyn SignalEvaluator>> {
    vec![
        Box::new(PriceDeviation),
        Box::new(SpecificationBias),
        Box::new(CartelConcentration),
        Box::new(LowCompetition),
        Box::new(ShortDeadline),
    ]
}

/// Market price deviation, usable only when the reference price is known
/// and positive.
pub(crate) fn price_deviation_pct(bid: &BidRecord, reference: &ReferenceData) -> Option<f64> {
    let market = reference.market_unit_price.filter(|p| p.is_finite() && *p > 0.0)?;
    Some((bid.unit_price - market) / market * 100.0)
}

/// Compares the proposed unit price against the market reference.
///
/// Clamped-linear scaling: zero at or below the trigger deviation, 100 at
/// or above saturation, linear in between. Abstains (never fabricating
/// suspicion) when the reference price is absent or non-positive.
pub(crate) struct PriceDeviation;

impl SignalEvaluator for PriceDeviation {
    fn kind(&self) -> SignalKind {
        SignalKind::PriceDeviation
    }

    fn evaluate(
        &self,
        bid: &BidRecord,
        reference: &ReferenceData,
        config: &EngineConfig,
    ) -> SignalResult {
        let Some(market) = reference
            .market_unit_price
            .filter(|p| p.is_finite() && *p > 0.0)
        else {
            return SignalResult::not_applicable(self.kind());
        };
        let deviation = (bid.unit_price - market) / market * 100.0;

        let span = config.price_saturation_pct - config.price_trigger_pct;
        let score = ((deviation - config.price_trigger_pct) / span * 100.0).clamp(0.0, 100.0);

        let mut evidence = Vec::new();
        if score > 0.0 {
            evidence.push(format!(
                "Preço proposto R$ {:.2} é {:.1}% acima da referência de mercado R$ {:.2}",
                bid.unit_price, deviation, market
            ));
        }

        SignalResult {
            kind: self.kind(),
            score,
            applicable: true,
            evidence,
        }
    }
}

/// Detects tailor-made specification wording via whole-word, case-insensitive
/// matching of a suspicious-term lexicon.
///
/// Metric: lexicon coverage (matched terms over lexicon size). Coverage at
/// or above the configured trigger saturates the score at 100; partial
/// coverage below it still contributes proportionally. Evidence names each
/// matched term once the text contains at least one.
pub(crate) struct SpecificationBias;

impl SignalEvaluator for SpecificationBias {
    fn kind(&self) -> SignalKind {
        SignalKind::SpecificationBias
    }

    fn evaluate(
        &self,
        bid: &BidRecord,
        reference: &ReferenceData,
        config: &EngineConfig,
    ) -> SignalResult {
        let Some(text) = bid.specification.as_deref().filter(|t| !t.trim().is_empty()) else {
            return SignalResult::not_applicable(self.kind());
        };

        let lexicon: Vec<&str> = match &reference.suspicious_terms {
            Some(terms) if !terms.is_empty() => terms.iter().map(String::as_str).collect(),
            _ => config.lexicon.iter().map(String::as_str).collect(),
        };
        if lexicon.is_empty() {
            return SignalResult::not_applicable(self.kind());
        }

        let haystack = tokenize(text);
        let matched: Vec<&str> = lexicon
            .iter()
            .copied()
            .filter(|term| contains_phrase(&haystack, &tokenize(term)))
            .collect();

        let coverage = matched.len() as f64 / lexicon.len() as f64;
        let score = if coverage >= config.spec_trigger_coverage {
            100.0
        } else {
            coverage * 100.0
        };

        let evidence = matched
            .iter()
            .map(|term| format!("Termo suspeito encontrado na especificação: \"{term}\""))
            .collect();

        SignalResult {
            kind: self.kind(),
            score,
            applicable: true,
            evidence,
        }
    }
}

/// Flags companies winning an outsized share of bids at one agency.
///
/// Requires a minimum historical sample before drawing conclusions; scales
/// from zero at the trigger win rate to 100 at a 100% win rate, and stays
/// zero at or below the trigger regardless of sample size.
pub(crate) struct CartelConcentration;

impl SignalEvaluator for CartelConcentration {
    fn kind(&self) -> SignalKind {
        SignalKind::CartelConcentration
    }

    fn evaluate(
        &self,
        bid: &BidRecord,
        reference: &ReferenceData,
        config: &EngineConfig,
    ) -> SignalResult {
        let Some(company) = bid.winning_company.as_deref() else {
            return SignalResult::not_applicable(self.kind());
        };

        let relevant: Vec<_> = reference
            .award_history
            .iter()
            .filter(|record| record.agency == bid.agency && record.company == company)
            .collect();
        if relevant.is_empty() {
            return SignalResult::not_applicable(self.kind());
        }

        let total = relevant.len() as u32;
        let wins = relevant.iter().filter(|record| record.won).count() as u32;
        let win_rate = f64::from(wins) / f64::from(total);

        let score = if total < config.cartel_min_sample || win_rate <= config.cartel_trigger_rate {
            0.0
        } else {
            let span = 1.0 - config.cartel_trigger_rate;
            ((win_rate - config.cartel_trigger_rate) / span * 100.0).clamp(0.0, 100.0)
        };

        let mut evidence = Vec::new();
        if score > 0.0 {
            evidence.push(format!(
                "Empresa venceu {wins} de {total} licitações no órgão"
            ));
        }

        SignalResult {
            kind: self.kind(),
            score,
            applicable: true,
            evidence,
        }
    }
}

/// Step signal: fewer than the configured minimum of bidders means a full
/// score, anything else zero. Documented source behavior, not softened.
pub(crate) struct LowCompetition;

impl SignalEvaluator for LowCompetition {
    fn kind(&self) -> SignalKind {
        SignalKind::LowCompetition
    }

    fn evaluate(
        &self,
        bid: &BidRecord,
        _reference: &ReferenceData,
        config: &EngineConfig,
    ) -> SignalResult {
        let Some(bidders) = bid.bidders else {
            return SignalResult::not_applicable(self.kind());
        };

        if bidders < config.competition_min_bidders {
            SignalResult {
                kind: self.kind(),
                score: 100.0,
                applicable: true,
                evidence: vec![format!(
                    "Apenas {bidders} empresa(s) participou(aram) da licitação"
                )],
            }
        } else {
            SignalResult {
                kind: self.kind(),
                score: 0.0,
                applicable: true,
                evidence: Vec::new(),
            }
        }
    }
}

/// Step signal for suspiciously short submission windows. Wired with weight
/// zero in the default configuration, so it annotates without scoring.
pub(crate) struct ShortDeadline;

impl SignalEvaluator for ShortDeadline {
    fn kind(&self) -> SignalKind {
        SignalKind::ShortDeadline
    }

    fn evaluate(
        &self,
        bid: &BidRecord,
        _reference: &ReferenceData,
        config: &EngineConfig,
    ) -> SignalResult {
        let (Some(opening), Some(closing)) = (bid.opening_date, bid.closing_deadline) else {
            return SignalResult::not_applicable(self.kind());
        };

        let days = (closing - opening).num_days();
        if days < config.deadline_min_days {
            SignalResult {
                kind: self.kind(),
                score: 100.0,
                applicable: true,
                evidence: vec![format!(
                    "Licitação aberta com apenas {days} dia(s) para fechamento"
                )],
            }
        } else {
            SignalResult {
                kind: self.kind(),
                score: 0.0,
                applicable: true,
                evidence: Vec::new(),
            }
        }
    }
}

/// Lowercased word sequence; split points are any non-alphanumeric
/// characters so punctuation never hides a match.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole-word phrase containment: the needle tokens must appear contiguously
/// in the haystack, so "modelo" never matches inside "remodelou".
fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
