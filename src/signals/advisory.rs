//! Final advisory nudge, applied after amplification.

use serde::{Deserialize, Serialize};

use crate::common::math::clamp;
use crate::config::AdvisoryConfig;
use crate::models::prediction::Direction;
use crate::models::signal::{AdvisoryOutcome, AggregationResult, SignalReason};

/// An external, non-authoritative opinion on an asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRating {
    pub direction: Direction,
    /// Within [0, 1].
    pub strength: f64,
}

impl AdvisoryRating {
    pub fn new(direction: Direction, strength: f64) -> Self {
        Self {
            direction,
            strength,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.strength.is_finite() && (0.0..=1.0).contains(&self.strength)
    }
}

/// Adjust a unit-scale result by the advisory rating.
///
/// Agreement multiplies by `agree_multiplier` but never lifts the value past
/// `agree_cap` (and never lowers it). Disagreement multiplies by
/// `disagree_multiplier`. A missing or invalid rating leaves the value alone.
/// Results without a direction are not consulted.
pub fn apply_advisory(
    result: &mut AggregationResult,
    rating: Option<AdvisoryRating>,
    config: &AdvisoryConfig,
) {
    let Some(direction) = result.direction else {
        result.advisory = AdvisoryOutcome::NotConsulted;
        return;
    };

    let rating = match rating {
        Some(rating) if rating.is_valid() => rating,
        _ => {
            result.advisory = AdvisoryOutcome::Unavailable;
            return;
        }
    };

    let before = result.final_confidence;
    if rating.direction == direction {
        let boosted = (before * config.agree_multiplier).min(config.agree_cap).max(before);
        result.final_confidence = clamp(boosted, 0.0, 1.0);
        result.advisory = AdvisoryOutcome::Agreed {
            strength: rating.strength,
            multiplier: config.agree_multiplier,
        };
        result.reasons.push(SignalReason {
            description: format!(
                "Advisory agrees ({}, strength {:.2})",
                rating.direction, rating.strength
            ),
            weight: result.final_confidence - before,
        });
    } else {
        result.final_confidence = clamp(before * config.disagree_multiplier, 0.0, 1.0);
        result.advisory = AdvisoryOutcome::Disagreed {
            strength: rating.strength,
            multiplier: config.disagree_multiplier,
        };
        result.reasons.push(SignalReason {
            description: format!(
                "Advisory disagrees ({}, strength {:.2})",
                rating.direction, rating.strength
            ),
            weight: before - result.final_confidence,
        });
    }
}
