mod classify;
mod config;
mod signals;

pub use config::{
    EngineConfig, EngineConfigError, SignalWeights, CARTEL_WEIGHT, COMPETITION_WEIGHT,
    DEADLINE_WEIGHT, PRICE_WEIGHT, SPECIFICATION_WEIGHT,
};

use super::domain::{BidRecord, ReferenceData, RiskAssessment, SignalResult};
use signals::{price_deviation_pct, SignalEvaluator};

/// Stateless scoring engine applying the configured signal evaluators to a
/// bid and its reference data.
///
/// `evaluate` is a pure function of its two arguments: no I/O, no shared
/// mutable state, byte-identical output for identical inputs. A regulator
/// must be able to reproduce any stored score from the stored inputs.
pub struct RiskEngine {
    config: EngineConfig,
    evaluators: Vec<Box<dyn SignalEvaluator>>,
}

impl RiskEngine {
    /// Builds an engine after validating the configuration; a misconfigured
    /// engine (weights off 1.0, empty lexicon) never serves evaluations.
    pub fn new(config: EngineConfig) -> Result<Self, EngineConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            evaluators: signals::evaluators(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scores one bid against its reference data.
    ///
    /// Missing reference data never aborts the assessment: the affected
    /// evaluator abstains via `applicable=false`. Malformed bids are caller
    /// errors and fail the whole call.
    pub fn evaluate(
        &self,
        bid: &BidRecord,
        reference: &ReferenceData,
    ) -> Result<RiskAssessment, AssessmentError> {
        validate_bid(bid)?;

        let signals: Vec<SignalResult> = self
            .evaluators
            .iter()
            .map(|evaluator| evaluator.evaluate(bid, reference, &self.config))
            .collect();

        let weighted: f64 = signals
            .iter()
            .map(|signal| signal.score * self.config.weights.weight_for(signal.kind))
            .sum();
        let risk_score = round_one_decimal(weighted.clamp(0.0, 100.0));

        let risk_level = classify::risk_level_for(risk_score);

        // Evidence keeps the evaluator declaration order regardless of
        // which evaluator produced output first.
        let evidencias: Vec<String> = signals
            .iter()
            .filter(|signal| signal.applicable)
            .flat_map(|signal| signal.evidence.iter().cloned())
            .collect();

        let diferenca_percentual =
            price_deviation_pct(bid, reference).map(round_one_decimal);
        let valor_superfaturado = reference
            .market_unit_price
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|market| {
                let overcharge = (bid.unit_price - market) * f64::from(bid.quantity);
                round_two_decimals(overcharge.max(0.0))
            });

        Ok(RiskAssessment {
            bid_id: bid.id.clone(),
            risk_score,
            risk_level,
            evidencias,
            priority_level: classify::priority_for(risk_level),
            status: classify::initial_status(),
            diferenca_percentual,
            valor_superfaturado,
            signals,
        })
    }

    /// Batch variant; output order mirrors input order. Fails fast on the
    /// first malformed bid, since malformed input is a caller error.
    pub fn evaluate_all<'a, I>(&self, pairs: I) -> Result<Vec<RiskAssessment>, AssessmentError>
    where
        I: IntoIterator<Item = (&'a BidRecord, &'a ReferenceData)>,
    {
        pairs
            .into_iter()
            .map(|(bid, reference)| self.evaluate(bid, reference))
            .collect()
    }
}

/// Caller errors: required fields absent or malformed. The engine fails the
/// whole call rather than guessing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("bid record has an empty identifier")]
    EmptyIdentifier,
    #[error("bid '{bid_id}' has a non-positive or non-finite unit price")]
    InvalidUnitPrice { bid_id: String },
    #[error("bid '{bid_id}' has a negative or non-finite estimated value")]
    InvalidEstimatedValue { bid_id: String },
    #[error("bid '{bid_id}' has zero quantity")]
    ZeroQuantity { bid_id: String },
    #[error("bid '{bid_id}' closes before it opens")]
    DeadlineBeforeOpening { bid_id: String },
}

fn validate_bid(bid: &BidRecord) -> Result<(), AssessmentError> {
    if bid.id.0.trim().is_empty() {
        return Err(AssessmentError::EmptyIdentifier);
    }
    if !bid.unit_price.is_finite() || bid.unit_price <= 0.0 {
        return Err(AssessmentError::InvalidUnitPrice {
            bid_id: bid.id.0.clone(),
        });
    }
    if !bid.estimated_total.is_finite() || bid.estimated_total < 0.0 {
        return Err(AssessmentError::InvalidEstimatedValue {
            bid_id: bid.id.0.clone(),
        });
    }
    if bid.quantity == 0 {
        return Err(AssessmentError::ZeroQuantity {
            bid_id: bid.id.0.clone(),
        });
    }
    if let (Some(opening), Some(closing)) = (bid.opening_date, bid.closing_deadline) {
        if closing < opening {
            return Err(AssessmentError::DeadlineBeforeOpening {
                bid_id: bid.id.0.clone(),
            });
        }
    }
    Ok(())
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
