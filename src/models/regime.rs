use serde::{Deserialize, Serialize};
use std::fmt;

/// Market condition label derived from a price window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegimeType {
    Trending,
    Ranging,
    Volatile,
    Unknown,
}

impl fmt::Display for RegimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trending => write!(f, "TRENDING"),
            Self::Ranging => write!(f, "RANGING"),
            Self::Volatile => write!(f, "VOLATILE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Regime label plus how far the governing indicator sits past its threshold.
///
/// Recomputed on every evaluation; never persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeClassification {
    pub regime_type: RegimeType,
    /// Normalized to [0, 1]; always 0 for `Unknown`.
    pub strength: f64,
    /// Trend-strength reading (ADX), when it could be computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_strength: Option<f64>,
    /// ATR as a percentage of the last close, when it could be computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility_pct: Option<f64>,
}

impl RegimeClassification {
    pub fn unknown() -> Self {
        Self {
            regime_type: RegimeType::Unknown,
            strength: 0.0,
            trend_strength: None,
            volatility_pct: None,
        }
    }

    pub fn new(regime_type: RegimeType, strength: f64) -> Self {
        if regime_type == RegimeType::Unknown {
            return Self::unknown();
        }
        Self {
            regime_type,
            strength: crate::common::math::clamp(strength, 0.0, 1.0),
            trend_strength: None,
            volatility_pct: None,
        }
    }

    pub fn with_readings(mut self, trend_strength: f64, volatility_pct: f64) -> Self {
        self.trend_strength = Some(trend_strength);
        self.volatility_pct = Some(volatility_pct);
        self
    }
}

impl Default for RegimeClassification {
    fn default() -> Self {
        Self::unknown()
    }
}
