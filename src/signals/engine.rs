//! Aggregation engine: predictions + price window (+ advisory) -> one result.
//!
//! Every evaluation is independent. The engine holds only its immutable
//! configuration, so one instance can be shared across threads and tasks.

use std::future::Future;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{ConfigError, ValidationError};
use crate::models::indicators::PriceSample;
use crate::models::prediction::{validate_all, StrategyPrediction};
use crate::models::regime::RegimeClassification;
use crate::models::signal::{AggregationResult, ConfidenceScale};
use crate::regime::RegimeClassifier;
use crate::services::advisory::AdvisoryAdapter;
use crate::signals::advisory::{apply_advisory, AdvisoryRating};
use crate::signals::aggregation::ConsensusAggregator;
use crate::signals::amplification::AmplificationPipeline;
use crate::signals::gate::ConfidenceGate;

#[derive(Debug, Clone)]
pub struct AggregationEngine {
    config: EngineConfig,
    classifier: RegimeClassifier,
    gate: ConfidenceGate,
    aggregator: ConsensusAggregator,
    amplifier: AmplificationPipeline,
}

impl AggregationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            classifier: RegimeClassifier::new(config.regime.clone()),
            gate: ConfidenceGate::new(config.min_confidence),
            aggregator: ConsensusAggregator::new(config.quorum),
            amplifier: AmplificationPipeline::new(config.amplification.clone()),
            config,
        }
    }

    /// Build after validating the configuration.
    pub fn try_new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &RegimeClassifier {
        &self.classifier
    }

    /// Core evaluation without an advisory step.
    pub fn evaluate(
        &self,
        predictions: &[StrategyPrediction],
        samples: &[PriceSample],
    ) -> Result<AggregationResult, ValidationError> {
        let regime = self.classifier.classify(samples);
        self.evaluate_with_regime(predictions, &regime)
    }

    /// Core evaluation against an already classified regime.
    pub fn evaluate_with_regime(
        &self,
        predictions: &[StrategyPrediction],
        regime: &RegimeClassification,
    ) -> Result<AggregationResult, ValidationError> {
        let result = self.evaluate_unit(predictions, regime)?;
        Ok(self.finish(result))
    }

    /// Full evaluation including the advisory step, bounded by the adapter's
    /// timeout. Results without a direction skip the advisory entirely.
    pub async fn evaluate_with_advisory(
        &self,
        asset_id: &str,
        predictions: &[StrategyPrediction],
        samples: &[PriceSample],
        advisory: &AdvisoryAdapter,
    ) -> Result<AggregationResult, ValidationError> {
        let never = std::future::pending::<()>();
        self.evaluate_with_advisory_until(asset_id, predictions, samples, advisory, never)
            .await
    }

    /// As [`evaluate_with_advisory`](Self::evaluate_with_advisory), but an
    /// advisory call still in flight when `cancel` completes is abandoned
    /// and the pre-advisory value is returned.
    pub async fn evaluate_with_advisory_until<F>(
        &self,
        asset_id: &str,
        predictions: &[StrategyPrediction],
        samples: &[PriceSample],
        advisory: &AdvisoryAdapter,
        cancel: F,
    ) -> Result<AggregationResult, ValidationError>
    where
        F: Future<Output = ()>,
    {
        let regime = self.classifier.classify(samples);
        let result = self.evaluate_unit(predictions, &regime)?;

        if !result.is_resolved() {
            return Ok(self.finish(result));
        }

        let rating = advisory.rate_until(asset_id, cancel).await;
        Ok(self.adjust_with_rating(result, rating))
    }

    /// Apply an advisory rating obtained by the caller. `result` may be on
    /// either scale; the adjustment runs on [0, 1] and the returned result
    /// is on the configured reporting scale.
    pub fn adjust_with_rating(
        &self,
        mut result: AggregationResult,
        rating: Option<AdvisoryRating>,
    ) -> AggregationResult {
        result.final_confidence = result.unit_confidence();
        result.confidence_scale = ConfidenceScale::Unit;
        apply_advisory(&mut result, rating, &self.config.advisory);
        self.finish(result)
    }

    /// Validate, gate, tally and amplify. Confidence stays on the unit scale.
    fn evaluate_unit(
        &self,
        predictions: &[StrategyPrediction],
        regime: &RegimeClassification,
    ) -> Result<AggregationResult, ValidationError> {
        validate_all(predictions)?;

        let gated = self.gate.apply(predictions);
        debug!(
            received = predictions.len(),
            gated = gated.len(),
            dropped = predictions.len() - gated.len(),
            min_confidence = self.gate.min_confidence(),
            "Confidence gate applied"
        );

        let mut result = self.aggregator.aggregate(&gated, regime);
        if let Some(direction) = result.direction {
            let supporting: Vec<&StrategyPrediction> = gated
                .iter()
                .copied()
                .filter(|p| p.direction == direction)
                .collect();
            self.amplifier.apply(&mut result, &supporting);
        }

        debug!(
            regime = %regime.regime_type,
            strength = regime.strength,
            long = result.long_count,
            short = result.short_count,
            status = ?result.status,
            "Consensus tallied"
        );

        Ok(result)
    }

    /// Convert the unit-scale confidence to the configured reporting scale.
    fn finish(&self, mut result: AggregationResult) -> AggregationResult {
        let scale = self.config.confidence_scale;
        result.final_confidence = scale.rescale(result.final_confidence);
        result.confidence_scale = scale;

        if let Some(direction) = result.direction {
            info!(
                direction = %direction,
                consensus = result.consensus_percent,
                confidence = result.final_confidence,
                supporting = result.supporting_count,
                advisory = result.advisory.label(),
                "Aggregation resolved"
            );
        }

        result
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
