//! Consensus tally over gated predictions

use std::collections::BTreeMap;

use crate::common::math;
use crate::models::prediction::{AgentCategory, Direction, StrategyPrediction};
use crate::models::regime::RegimeClassification;
use crate::models::signal::{
    AdvisoryOutcome, AggregationResult, AggregationStatus, ConfidenceScale, SignalReason,
};
use crate::signals::weights::WeightTable;

/// Gated predictions split by direction, input order preserved.
#[derive(Debug, Default)]
pub struct Tally<'a> {
    pub long: Vec<&'a StrategyPrediction>,
    pub short: Vec<&'a StrategyPrediction>,
}

impl<'a> Tally<'a> {
    pub fn from_gated(gated: &[&'a StrategyPrediction]) -> Self {
        let (long, short): (Vec<_>, Vec<_>) = gated
            .iter()
            .copied()
            .partition(|p| p.direction == Direction::Long);
        Self { long, short }
    }

    pub fn total(&self) -> usize {
        self.long.len() + self.short.len()
    }

    /// Strictly larger side, `None` on a tie.
    pub fn leader(&self) -> Option<Direction> {
        use std::cmp::Ordering;
        match self.long.len().cmp(&self.short.len()) {
            Ordering::Greater => Some(Direction::Long),
            Ordering::Less => Some(Direction::Short),
            Ordering::Equal => None,
        }
    }

    pub fn side(&self, direction: Direction) -> &[&'a StrategyPrediction] {
        match direction {
            Direction::Long => &self.long,
            Direction::Short => &self.short,
        }
    }
}

/// Picks the dominant direction by unweighted majority and computes the
/// regime-weighted average confidence of its supporters.
#[derive(Debug, Clone, Copy)]
pub struct ConsensusAggregator {
    quorum: usize,
}

impl ConsensusAggregator {
    pub fn new(quorum: usize) -> Self {
        Self { quorum }
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Raw result with `final_confidence` equal to the weighted average
    /// confidence, before any amplification.
    pub fn aggregate(
        &self,
        gated: &[&StrategyPrediction],
        regime: &RegimeClassification,
    ) -> AggregationResult {
        let tally = Tally::from_gated(gated);
        let (long_count, short_count) = (tally.long.len(), tally.short.len());
        let total = tally.total();

        let direction = match tally.leader() {
            Some(direction) if total >= self.quorum => direction,
            Some(_) => {
                return AggregationResult::no_signal(*regime, long_count, short_count).with_reason(
                    format!("Quorum not met: {} gated < {}", total, self.quorum),
                    0.0,
                );
            }
            None => {
                return AggregationResult::no_signal(*regime, long_count, short_count)
                    .with_reason(format!("Tie: {} LONG vs {} SHORT", long_count, short_count), 0.0);
            }
        };

        let supporting = tally.side(direction);
        let supporting_count = supporting.len();
        let consensus_percent = 100.0 * supporting_count as f64 / total as f64;
        let avg_confidence = Self::weighted_confidence(supporting, regime);

        let mut reasons = vec![
            SignalReason {
                description: format!(
                    "Regime: {} (strength {:.2})",
                    regime.regime_type, regime.strength
                ),
                weight: regime.strength,
            },
            SignalReason {
                description: format!(
                    "Consensus: {}/{} {} ({:.1}%)",
                    supporting_count, total, direction, consensus_percent
                ),
                weight: consensus_percent / 100.0,
            },
        ];
        reasons.extend(Self::category_reasons(supporting, regime));

        AggregationResult {
            status: AggregationStatus::Resolved,
            direction: Some(direction),
            consensus_percent,
            final_confidence: math::clamp(avg_confidence, 0.0, 1.0),
            supporting_count,
            avg_entry: mean_of(supporting, |p| p.entry_price),
            avg_target: mean_of(supporting, |p| p.target_price),
            avg_stop: mean_of(supporting, |p| p.stop_price),
            total_gated: total,
            long_count,
            short_count,
            regime: *regime,
            majority_multiplier: 1.0,
            contrarian_multiplier: 1.0,
            advisory: AdvisoryOutcome::NotConsulted,
            confidence_scale: ConfidenceScale::Unit,
            reasons,
        }
    }

    /// Mean confidence weighted by each prediction's category weight.
    pub fn weighted_confidence(
        supporting: &[&StrategyPrediction],
        regime: &RegimeClassification,
    ) -> f64 {
        let (weighted_sum, weight_total) =
            supporting
                .iter()
                .fold((0.0, 0.0), |(sum, total), prediction| {
                    let weight = WeightTable::weight(prediction.category, regime);
                    (sum + prediction.confidence * weight, total + weight)
                });

        if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        }
    }

    fn category_reasons(
        supporting: &[&StrategyPrediction],
        regime: &RegimeClassification,
    ) -> Vec<SignalReason> {
        let mut by_category: BTreeMap<&'static str, (AgentCategory, usize)> = BTreeMap::new();
        for prediction in supporting {
            by_category
                .entry(prediction.category.as_str())
                .or_insert((prediction.category, 0))
                .1 += 1;
        }

        let mut reasons: Vec<SignalReason> = by_category
            .into_values()
            .map(|(category, count)| {
                let weight = WeightTable::weight(category, regime);
                SignalReason {
                    description: format!(
                        "{}: {} supporting (weight {:.2})",
                        category, count, weight
                    ),
                    weight: weight * count as f64,
                }
            })
            .collect();
        reasons.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        reasons
    }
}

impl Default for ConsensusAggregator {
    fn default() -> Self {
        Self::new(3)
    }
}

fn mean_of<F>(predictions: &[&StrategyPrediction], field: F) -> Option<f64>
where
    F: Fn(&StrategyPrediction) -> Option<f64>,
{
    let values: Vec<f64> = predictions.iter().filter_map(|p| field(p)).collect();
    math::mean(&values)
}
