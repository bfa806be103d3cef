// =============================================================================
// Regime Classifier
// =============================================================================
//
// Labels the market from a price window using two readings:
//
//   T = ADX (trend strength, 0-100)
//   V = ATR as a percentage of the last close
//
// Evaluated top-to-bottom, first match wins:
//
//   1. UNKNOWN   window shorter than the configured minimum, or readings
//                could not be computed
//   2. TRENDING  T > trend_threshold
//   3. RANGING   V < low_volatility_pct
//   4. VOLATILE  otherwise
//
// Strength is the normalized distance of the governing reading past its
// threshold, clamped to [0, 1].

use tracing::trace;

use crate::common::math::clamp;
use crate::config::RegimeConfig;
use crate::indicators::trend::calculate_adx;
use crate::indicators::volatility::calculate_atr_percent;
use crate::models::indicators::PriceSample;
use crate::models::regime::{RegimeClassification, RegimeType};

/// Pure classifier: identical windows always produce identical results.
#[derive(Debug, Clone, Default)]
pub struct RegimeClassifier {
    config: RegimeConfig,
}

impl RegimeClassifier {
    pub fn new(config: RegimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegimeConfig {
        &self.config
    }

    /// Classify the window. Never fails; short or degenerate windows are
    /// `Unknown` with zero strength.
    pub fn classify(&self, samples: &[PriceSample]) -> RegimeClassification {
        if samples.len() < self.config.window.max(2) {
            trace!(
                samples = samples.len(),
                window = self.config.window,
                "Window too short for regime classification"
            );
            return RegimeClassification::unknown();
        }

        let period = self.config.window.min(samples.len() - 1) as u32;

        let trend_strength = match calculate_adx(samples, period) {
            Some(adx) if adx.value.is_finite() => adx.value,
            _ => return RegimeClassification::unknown(),
        };
        let volatility_pct = match calculate_atr_percent(samples, period) {
            Some(v) if v.is_finite() => v,
            _ => return RegimeClassification::unknown(),
        };

        let classification = self.classify_readings(trend_strength, volatility_pct);
        trace!(
            regime = %classification.regime_type,
            strength = classification.strength,
            adx = trend_strength,
            atr_pct = volatility_pct,
            "Regime classified"
        );
        classification
    }

    /// Apply the threshold rules to precomputed readings.
    pub fn classify_readings(
        &self,
        trend_strength: f64,
        volatility_pct: f64,
    ) -> RegimeClassification {
        let t_trend = self.config.trend_threshold;
        let v_low = self.config.low_volatility_pct;

        let (regime_type, strength) = if trend_strength > t_trend {
            (RegimeType::Trending, (trend_strength - t_trend) / t_trend)
        } else if volatility_pct < v_low {
            (RegimeType::Ranging, (v_low - volatility_pct) / v_low)
        } else {
            (RegimeType::Volatile, (volatility_pct - v_low) / v_low)
        };

        RegimeClassification::new(regime_type, clamp(strength, 0.0, 1.0))
            .with_readings(trend_strength, volatility_pct)
    }
}
