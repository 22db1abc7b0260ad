use serde::{Deserialize, Serialize};

use super::super::domain::SignalKind;

/// Weight of the price-deviation signal in the final score.
pub const PRICE_WEIGHT: f64 = 0.40;
/// Weight of the specification-bias signal.
pub const SPECIFICATION_WEIGHT: f64 = 0.30;
/// Weight of the cartel-concentration signal.
pub const CARTEL_WEIGHT: f64 = 0.20;
/// Weight of the low-competition signal.
pub const COMPETITION_WEIGHT: f64 = 0.10;
/// The short-deadline signal is defined but intentionally excluded from
/// scoring; it stays wired with weight zero so raising it later does not
/// change the engine surface.
pub const DEADLINE_WEIGHT: f64 = 0.0;

/// Fixed per-signal weights. Not bid-specific configuration: tests assert
/// they sum to exactly 1.0 before the engine serves any evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub price: f64,
    pub specification: f64,
    pub cartel: f64,
    pub competition: f64,
    pub deadline: f64,
}

impl SignalWeights {
    pub fn weight_for(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::PriceDeviation => self.price,
            SignalKind::SpecificationBias => self.specification,
            SignalKind::CartelConcentration => self.cartel,
            SignalKind::LowCompetition => self.competition,
            SignalKind::ShortDeadline => self.deadline,
        }
    }

    pub fn sum(&self) -> f64 {
        self.price + self.specification + self.cartel + self.competition + self.deadline
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            price: PRICE_WEIGHT,
            specification: SPECIFICATION_WEIGHT,
            cartel: CARTEL_WEIGHT,
            competition: COMPETITION_WEIGHT,
            deadline: DEADLINE_WEIGHT,
        }
    }
}

/// Engine configuration: weights, suspicious-term lexicon, and the signal
/// thresholds. Passed explicitly at construction so multiple configurations
/// can run side by side; never read from process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub weights: SignalWeights,
    /// Default lexicon of terms implying sole-source exclusivity. A per-bid
    /// override may arrive through `ReferenceData::suspicious_terms`.
    pub lexicon: Vec<String>,
    /// Price deviation (percent above reference) below which the price
    /// signal scores zero.
    pub price_trigger_pct: f64,
    /// Price deviation at which the price signal saturates at 100.
    pub price_saturation_pct: f64,
    /// Lexicon coverage at or above which the specification signal
    /// saturates at 100; partial coverage below it still contributes.
    pub spec_trigger_coverage: f64,
    /// Win rate above which the cartel signal starts scaling.
    pub cartel_trigger_rate: f64,
    /// Minimum historical bids at the agency before the cartel signal may
    /// trigger, guarding against conclusions drawn from thin history.
    pub cartel_min_sample: u32,
    /// Bidder count below which the competition signal fires (step).
    pub competition_min_bidders: u32,
    /// Days between opening and closing below which the deadline signal
    /// fires (step).
    pub deadline_min_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            lexicon: vec![
                "exclusivamente".to_string(),
                "obrigatoriamente".to_string(),
                "apenas modelo específico".to_string(),
            ],
            price_trigger_pct: 30.0,
            price_saturation_pct: 200.0,
            spec_trigger_coverage: 0.8,
            cartel_trigger_rate: 0.70,
            cartel_min_sample: 5,
            competition_min_bidders: 2,
            deadline_min_days: 7,
        }
    }
}

impl EngineConfig {
    /// Fatal-at-startup validation: a misconfigured engine must not serve
    /// any evaluation.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(EngineConfigError::WeightsDoNotSumToOne { sum });
        }
        if self.lexicon.iter().all(|term| term.trim().is_empty()) {
            return Err(EngineConfigError::EmptyLexicon);
        }
        if self.price_saturation_pct <= self.price_trigger_pct {
            return Err(EngineConfigError::InvalidThreshold {
                detail: "price saturation must exceed the trigger deviation",
            });
        }
        if !(0.0..=1.0).contains(&self.spec_trigger_coverage) || self.spec_trigger_coverage == 0.0 {
            return Err(EngineConfigError::InvalidThreshold {
                detail: "specification trigger coverage must be within (0, 1]",
            });
        }
        if !(0.0..1.0).contains(&self.cartel_trigger_rate) {
            return Err(EngineConfigError::InvalidThreshold {
                detail: "cartel trigger rate must be within [0, 1)",
            });
        }
        if self.cartel_min_sample == 0 {
            return Err(EngineConfigError::InvalidThreshold {
                detail: "cartel minimum sample must be at least 1",
            });
        }
        Ok(())
    }
}

/// Configuration errors that prevent engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("signal weights must sum to 1.0, got {sum}")]
    WeightsDoNotSumToOne { sum: f64 },
    #[error("suspicious-term lexicon must not be empty")]
    EmptyLexicon,
    #[error("invalid threshold: {detail}")]
    InvalidThreshold { detail: &'static str },
}
