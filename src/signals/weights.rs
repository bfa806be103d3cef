//! Regime-adaptive category weights.
//!
//! Categories are plain data looked up in a fixed table. Weights only
//! calibrate the averaged confidence; the direction vote stays unweighted.

use crate::common::math::clamp;
use crate::models::prediction::AgentCategory;
use crate::models::regime::{RegimeClassification, RegimeType};

pub struct WeightTable;

impl WeightTable {
    /// Largest shift strength can apply to a base weight.
    pub const STRENGTH_ADJUSTMENT: f64 = 0.2;
    pub const MIN_WEIGHT: f64 = 0.3;
    pub const MAX_WEIGHT: f64 = 2.0;

    /// Base multiplier before the strength adjustment.
    pub fn base(category: AgentCategory, regime: RegimeType) -> f64 {
        use AgentCategory::*;
        use RegimeType::*;

        match (category, regime) {
            (_, Unknown) => 1.0,

            (Trend, Trending) => 1.5,
            (Trend, Ranging) => 0.55,
            (Trend, Volatile) => 0.8,

            (Range, Trending) => 0.55,
            (Range, Ranging) => 1.5,
            (Range, Volatile) => 0.8,

            (Volatility, Trending) => 0.8,
            (Volatility, Ranging) => 0.8,
            (Volatility, Volatile) => 1.6,

            (Contrarian, Trending) => 0.5,
            (Contrarian, Ranging) => 1.3,
            (Contrarian, Volatile) => 1.2,

            (Derivatives, _) => 1.2,
            (Other, _) => 1.0,
        }
    }

    /// Whether regime strength moves this category's weight.
    pub fn is_strength_sensitive(category: AgentCategory) -> bool {
        !matches!(category, AgentCategory::Derivatives | AgentCategory::Other)
    }

    /// Weight for a category under a regime: favored categories gain up to
    /// +0.2, disfavored lose up to 0.2, clamped to [0.3, 2.0].
    pub fn weight_for(category: AgentCategory, regime: RegimeType, strength: f64) -> f64 {
        if regime == RegimeType::Unknown {
            return 1.0;
        }

        let base = Self::base(category, regime);
        if !Self::is_strength_sensitive(category) {
            return clamp(base, Self::MIN_WEIGHT, Self::MAX_WEIGHT);
        }

        let shift = clamp(strength, 0.0, 1.0) * Self::STRENGTH_ADJUSTMENT;
        let adjusted = if base > 1.0 {
            base + shift
        } else if base < 1.0 {
            base - shift
        } else {
            base
        };

        clamp(adjusted, Self::MIN_WEIGHT, Self::MAX_WEIGHT)
    }

    pub fn weight(category: AgentCategory, regime: &RegimeClassification) -> f64 {
        Self::weight_for(category, regime.regime_type, regime.strength)
    }
}
