//! Confidence gate applied before any voting.

use crate::models::prediction::StrategyPrediction;

/// Drops predictions whose confidence is below the threshold. Only
/// `confidence` is inspected; input order is preserved.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceGate {
    min_confidence: f64,
}

impl ConfidenceGate {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn passes(&self, prediction: &StrategyPrediction) -> bool {
        prediction.confidence >= self.min_confidence
    }

    pub fn apply<'a>(&self, predictions: &'a [StrategyPrediction]) -> Vec<&'a StrategyPrediction> {
        predictions.iter().filter(|p| self.passes(p)).collect()
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(0.6)
    }
}
