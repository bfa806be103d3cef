//! Aggregation output model

use serde::{Deserialize, Serialize};

use crate::models::prediction::Direction;
use crate::models::regime::RegimeClassification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationStatus {
    Resolved,
    NoSignal,
}

/// Scale `final_confidence` is reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceScale {
    /// [0, 1]
    #[default]
    Unit,
    /// [0, 100]
    Percent,
}

impl ConfidenceScale {
    pub fn top(&self) -> f64 {
        match self {
            ConfidenceScale::Unit => 1.0,
            ConfidenceScale::Percent => 100.0,
        }
    }

    /// Express a unit-scale value on this scale.
    pub fn rescale(&self, value: f64) -> f64 {
        value * self.top()
    }
}

/// What the advisory step did to the confidence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvisoryOutcome {
    #[default]
    NotConsulted,
    Unavailable,
    Agreed { strength: f64, multiplier: f64 },
    Disagreed { strength: f64, multiplier: f64 },
}

impl AdvisoryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            AdvisoryOutcome::NotConsulted => "not_consulted",
            AdvisoryOutcome::Unavailable => "unavailable",
            AdvisoryOutcome::Agreed { .. } => "agreed",
            AdvisoryOutcome::Disagreed { .. } => "disagreed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReason {
    pub description: String,
    pub weight: f64,
}

/// The engine's sole output. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub status: AggregationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub consensus_percent: f64,
    pub final_confidence: f64,
    pub supporting_count: usize,
    pub avg_entry: Option<f64>,
    pub avg_target: Option<f64>,
    pub avg_stop: Option<f64>,
    pub total_gated: usize,
    pub long_count: usize,
    pub short_count: usize,
    pub regime: RegimeClassification,
    pub majority_multiplier: f64,
    pub contrarian_multiplier: f64,
    pub advisory: AdvisoryOutcome,
    pub confidence_scale: ConfidenceScale,
    pub reasons: Vec<SignalReason>,
}

impl AggregationResult {
    /// Empty result for a window that cannot resolve a direction.
    pub fn no_signal(regime: RegimeClassification, long_count: usize, short_count: usize) -> Self {
        Self {
            status: AggregationStatus::NoSignal,
            direction: None,
            consensus_percent: 0.0,
            final_confidence: 0.0,
            supporting_count: 0,
            avg_entry: None,
            avg_target: None,
            avg_stop: None,
            total_gated: long_count + short_count,
            long_count,
            short_count,
            regime,
            majority_multiplier: 1.0,
            contrarian_multiplier: 1.0,
            advisory: AdvisoryOutcome::NotConsulted,
            confidence_scale: ConfidenceScale::Unit,
            reasons: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == AggregationStatus::Resolved
    }

    /// `final_confidence` brought back to [0, 1] regardless of the reporting scale.
    pub fn unit_confidence(&self) -> f64 {
        self.final_confidence / self.confidence_scale.top()
    }

    pub fn with_reason(mut self, description: impl Into<String>, weight: f64) -> Self {
        self.reasons.push(SignalReason {
            description: description.into(),
            weight,
        });
        self
    }
}
