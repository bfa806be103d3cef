//! Engine configuration.
//!
//! A single immutable [`EngineConfig`] is handed to the engine at
//! construction, so concurrent evaluations with different tuning never
//! interfere. Defaults match the documented configuration surface; the
//! environment can override them through `CONSENSUS_*` variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::error::ConfigError;
use crate::models::signal::ConfidenceScale;

/// Get the deployment environment (`APP_ENV`), defaulting to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Base URL of the advisory service, if one is configured.
pub fn get_advisory_url() -> Option<String> {
    env::var("CONSENSUS_ADVISORY_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Minimum number of samples before a regime is classified.
    pub window: usize,
    /// ADX level above which the market counts as trending.
    pub trend_threshold: f64,
    /// ATR% below which a non-trending market counts as ranging.
    pub low_volatility_pct: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            window: 14,
            trend_threshold: 30.0,
            low_volatility_pct: 4.0,
        }
    }
}

/// `consensus_percent >= min_consensus` earns `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MajorityTier {
    pub min_consensus: f64,
    pub multiplier: f64,
}

/// At least `min_count` supporting contrarian agents and
/// `consensus_percent >= min_consensus` earns `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrarianTier {
    pub min_count: usize,
    pub min_consensus: f64,
    pub multiplier: f64,
}

/// How the majority and contrarian bonuses combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusComposition {
    /// Apply majority, then contrarian.
    #[default]
    Multiplicative,
    /// Only the larger of the two multipliers applies.
    Strongest,
}

impl FromStr for BonusComposition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiplicative" => Ok(BonusComposition::Multiplicative),
            "strongest" | "max" => Ok(BonusComposition::Strongest),
            other => Err(format!("unknown bonus composition '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmplificationConfig {
    pub majority_enabled: bool,
    /// Checked in order; first match wins.
    pub majority_tiers: Vec<MajorityTier>,
    pub contrarian_enabled: bool,
    /// Checked in order; first match wins.
    pub contrarian_tiers: Vec<ContrarianTier>,
    pub composition: BonusComposition,
}

impl Default for AmplificationConfig {
    fn default() -> Self {
        Self {
            majority_enabled: true,
            majority_tiers: vec![
                MajorityTier {
                    min_consensus: 80.0,
                    multiplier: 1.15,
                },
                MajorityTier {
                    min_consensus: 70.0,
                    multiplier: 1.08,
                },
            ],
            contrarian_enabled: true,
            contrarian_tiers: vec![
                ContrarianTier {
                    min_count: 3,
                    min_consensus: 70.0,
                    multiplier: 1.15,
                },
                ContrarianTier {
                    min_count: 2,
                    min_consensus: 75.0,
                    multiplier: 1.10,
                },
            ],
            composition: BonusComposition::Multiplicative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub agree_multiplier: f64,
    pub disagree_multiplier: f64,
    /// Ceiling for an agreeing advisory, on the unit scale.
    pub agree_cap: f64,
    pub timeout_ms: u64,
}

impl AdvisoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            agree_multiplier: 1.15,
            disagree_multiplier: 0.85,
            agree_cap: 0.95,
            timeout_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Predictions below this confidence never reach the vote.
    pub min_confidence: f64,
    /// Minimum gated predictions for a resolved result.
    pub quorum: usize,
    pub regime: RegimeConfig,
    pub amplification: AmplificationConfig,
    pub advisory: AdvisoryConfig,
    pub confidence_scale: ConfidenceScale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            quorum: 3,
            regime: RegimeConfig::default(),
            amplification: AmplificationConfig::default(),
            advisory: AdvisoryConfig::default(),
            confidence_scale: ConfidenceScale::Unit,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `CONSENSUS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Unparseable values are
    /// logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        override_with(&lookup, "CONSENSUS_MIN_CONFIDENCE", &mut config.min_confidence);
        override_with(&lookup, "CONSENSUS_QUORUM", &mut config.quorum);
        override_with(&lookup, "CONSENSUS_REGIME_WINDOW", &mut config.regime.window);
        override_with(
            &lookup,
            "CONSENSUS_TREND_THRESHOLD",
            &mut config.regime.trend_threshold,
        );
        override_with(
            &lookup,
            "CONSENSUS_LOW_VOLATILITY_PCT",
            &mut config.regime.low_volatility_pct,
        );
        override_with(
            &lookup,
            "CONSENSUS_MAJORITY_BONUS_ENABLED",
            &mut config.amplification.majority_enabled,
        );
        override_with(
            &lookup,
            "CONSENSUS_CONTRARIAN_BONUS_ENABLED",
            &mut config.amplification.contrarian_enabled,
        );
        override_with(
            &lookup,
            "CONSENSUS_BONUS_COMPOSITION",
            &mut config.amplification.composition,
        );
        override_with(
            &lookup,
            "CONSENSUS_ADVISORY_TIMEOUT_MS",
            &mut config.advisory.timeout_ms,
        );

        if let Some(raw) = lookup("CONSENSUS_CONFIDENCE_SCALE") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "unit" => config.confidence_scale = ConfidenceScale::Unit,
                "percent" => config.confidence_scale = ConfidenceScale::Percent,
                other => warn!(
                    value = other,
                    "Ignoring unknown CONSENSUS_CONFIDENCE_SCALE"
                ),
            }
        }

        config
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_quorum(mut self, quorum: usize) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn with_regime(mut self, regime: RegimeConfig) -> Self {
        self.regime = regime;
        self
    }

    pub fn with_amplification(mut self, amplification: AmplificationConfig) -> Self {
        self.amplification = amplification;
        self
    }

    pub fn with_advisory(mut self, advisory: AdvisoryConfig) -> Self {
        self.advisory = advisory;
        self
    }

    pub fn with_confidence_scale(mut self, scale: ConfidenceScale) -> Self {
        self.confidence_scale = scale;
        self
    }

    /// Reject tuning that cannot produce meaningful results.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("min_confidence", self.min_confidence, 0.0, 1.0)?;
        if self.quorum == 0 {
            return Err(ConfigError::NotPositive("quorum"));
        }
        if self.regime.window == 0 {
            return Err(ConfigError::NotPositive("regime.window"));
        }
        check_positive("regime.trend_threshold", self.regime.trend_threshold)?;
        check_positive("regime.low_volatility_pct", self.regime.low_volatility_pct)?;

        for tier in &self.amplification.majority_tiers {
            check_range("majority_tier.min_consensus", tier.min_consensus, 0.0, 100.0)?;
            check_positive("majority_tier.multiplier", tier.multiplier)?;
        }
        for tier in &self.amplification.contrarian_tiers {
            check_range(
                "contrarian_tier.min_consensus",
                tier.min_consensus,
                0.0,
                100.0,
            )?;
            check_positive("contrarian_tier.multiplier", tier.multiplier)?;
        }

        check_positive("advisory.agree_multiplier", self.advisory.agree_multiplier)?;
        check_positive(
            "advisory.disagree_multiplier",
            self.advisory.disagree_multiplier,
        )?;
        check_range("advisory.agree_cap", self.advisory.agree_cap, 0.0, 1.0)?;
        if self.advisory.timeout_ms == 0 {
            return Err(ConfigError::NotPositive("advisory.timeout_ms"));
        }

        Ok(())
    }
}

fn override_with<T, F>(lookup: &F, key: &str, slot: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(value) => *slot = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparseable config override"),
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NotPositive(field));
    }
    Ok(())
}
