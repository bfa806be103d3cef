//! Bounded confidence amplification for strong agreement.
//!
//! Two separable bonuses, applied in a fixed order: majority agreement,
//! then agreement among contrarian-category agents. The confidence never
//! leaves [0, 1].

use crate::common::math::clamp;
use crate::config::{AmplificationConfig, BonusComposition};
use crate::models::prediction::{AgentCategory, StrategyPrediction};
use crate::models::signal::{AggregationResult, SignalReason};

#[derive(Debug, Clone, Default)]
pub struct AmplificationPipeline {
    config: AmplificationConfig,
}

impl AmplificationPipeline {
    pub fn new(config: AmplificationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AmplificationConfig {
        &self.config
    }

    /// First majority tier the consensus reaches, or 1.0.
    pub fn majority_multiplier(&self, consensus_percent: f64) -> f64 {
        if !self.config.majority_enabled {
            return 1.0;
        }
        self.config
            .majority_tiers
            .iter()
            .find(|tier| consensus_percent >= tier.min_consensus)
            .map(|tier| tier.multiplier)
            .unwrap_or(1.0)
    }

    /// First contrarian tier met by the supporting contrarian count, or 1.0.
    pub fn contrarian_multiplier(&self, contrarian_count: usize, consensus_percent: f64) -> f64 {
        if !self.config.contrarian_enabled {
            return 1.0;
        }
        self.config
            .contrarian_tiers
            .iter()
            .find(|tier| {
                contrarian_count >= tier.min_count && consensus_percent >= tier.min_consensus
            })
            .map(|tier| tier.multiplier)
            .unwrap_or(1.0)
    }

    /// Amplify a resolved result in place. `supporting` are the gated
    /// predictions that agree with the result's direction.
    pub fn apply(&self, result: &mut AggregationResult, supporting: &[&StrategyPrediction]) {
        if !result.is_resolved() {
            return;
        }

        let contrarian_count = supporting
            .iter()
            .filter(|p| p.category == AgentCategory::Contrarian)
            .count();

        let mut majority = self.majority_multiplier(result.consensus_percent);
        let mut contrarian = self.contrarian_multiplier(contrarian_count, result.consensus_percent);

        if self.config.composition == BonusComposition::Strongest {
            if majority >= contrarian {
                contrarian = 1.0;
            } else {
                majority = 1.0;
            }
        }

        let mut confidence = clamp(result.final_confidence, 0.0, 1.0);
        confidence = clamp(confidence * majority, 0.0, 1.0);
        confidence = clamp(confidence * contrarian, 0.0, 1.0);

        result.final_confidence = confidence;
        result.majority_multiplier = majority;
        result.contrarian_multiplier = contrarian;

        if majority != 1.0 {
            result.reasons.push(SignalReason {
                description: format!(
                    "Majority bonus x{:.2} at {:.1}% consensus",
                    majority, result.consensus_percent
                ),
                weight: majority - 1.0,
            });
        }
        if contrarian != 1.0 {
            result.reasons.push(SignalReason {
                description: format!(
                    "Contrarian alignment x{:.2} ({} contrarian supporters)",
                    contrarian, contrarian_count
                ),
                weight: contrarian - 1.0,
            });
        }
    }
}
