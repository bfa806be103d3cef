//! Strategy prediction input model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Fixed category an agent is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentCategory {
    Trend,
    Range,
    Volatility,
    Derivatives,
    Contrarian,
    Other,
}

impl AgentCategory {
    pub fn all() -> [AgentCategory; 6] {
        [
            AgentCategory::Trend,
            AgentCategory::Range,
            AgentCategory::Volatility,
            AgentCategory::Derivatives,
            AgentCategory::Contrarian,
            AgentCategory::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::Trend => "TREND",
            AgentCategory::Range => "RANGE",
            AgentCategory::Volatility => "VOLATILITY",
            AgentCategory::Derivatives => "DERIVATIVES",
            AgentCategory::Contrarian => "CONTRARIAN",
            AgentCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TREND" => Ok(AgentCategory::Trend),
            "RANGE" => Ok(AgentCategory::Range),
            "VOLATILITY" => Ok(AgentCategory::Volatility),
            "DERIVATIVES" => Ok(AgentCategory::Derivatives),
            "CONTRARIAN" => Ok(AgentCategory::Contrarian),
            "OTHER" => Ok(AgentCategory::Other),
            _ => Err(ValidationError::UnknownCategory(s.to_string())),
        }
    }
}

/// Trade direction. Agents without an opinion simply emit no prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("LONG"),
            Direction::Short => f.write_str("SHORT"),
        }
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            _ => Err(ValidationError::UnknownDirection(s.to_string())),
        }
    }
}

/// One agent's opinion for one asset at one evaluation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPrediction {
    pub agent_id: String,
    pub category: AgentCategory,
    pub direction: Direction,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<f64>,
}

impl StrategyPrediction {
    pub fn new(
        agent_id: impl Into<String>,
        category: AgentCategory,
        direction: Direction,
        confidence: f64,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            category,
            direction,
            confidence,
            entry_price: None,
            target_price: None,
            stop_price: None,
        }
    }

    pub fn with_levels(mut self, entry: f64, target: f64, stop: f64) -> Self {
        self.entry_price = Some(entry);
        self.target_price = Some(target);
        self.stop_price = Some(stop);
        self
    }

    pub fn with_entry(mut self, entry: f64) -> Self {
        self.entry_price = Some(entry);
        self
    }

    /// Reject malformed input instead of coercing it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.agent_id.trim().is_empty() {
            return Err(ValidationError::MissingAgentId);
        }

        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::ConfidenceOutOfRange {
                agent_id: self.agent_id.clone(),
                confidence: self.confidence,
            });
        }

        let levels = [
            ("entry", self.entry_price),
            ("target", self.target_price),
            ("stop", self.stop_price),
        ];
        for (field, level) in levels {
            if let Some(value) = level {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ValidationError::InvalidPriceLevel {
                        agent_id: self.agent_id.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Validate a whole batch, failing on the first malformed prediction.
pub fn validate_all(predictions: &[StrategyPrediction]) -> Result<(), ValidationError> {
    predictions.iter().try_for_each(StrategyPrediction::validate)
}
