//! Unit tests for the consensus aggregator

use regime_consensus::models::{
    AggregationStatus, AgentCategory, Direction, RegimeClassification, RegimeType,
    StrategyPrediction,
};
use regime_consensus::signals::{ConsensusAggregator, Tally};

fn prediction(
    id: &str,
    category: AgentCategory,
    direction: Direction,
    confidence: f64,
) -> StrategyPrediction {
    StrategyPrediction::new(id, category, direction, confidence)
}

fn refs(predictions: &[StrategyPrediction]) -> Vec<&StrategyPrediction> {
    predictions.iter().collect()
}

#[test]
fn test_tally_leader_and_tie() {
    let predictions = vec![
        prediction("a", AgentCategory::Trend, Direction::Long, 0.8),
        prediction("b", AgentCategory::Trend, Direction::Short, 0.8),
    ];
    let gated = refs(&predictions);
    let tally = Tally::from_gated(&gated);
    assert_eq!(tally.total(), 2);
    assert!(tally.leader().is_none());
}

#[test]
fn test_tie_is_no_signal() {
    let predictions = vec![
        prediction("a", AgentCategory::Trend, Direction::Long, 0.9),
        prediction("b", AgentCategory::Range, Direction::Long, 0.9),
        prediction("c", AgentCategory::Trend, Direction::Short, 0.9),
        prediction("d", AgentCategory::Range, Direction::Short, 0.9),
    ];
    let regime = RegimeClassification::unknown();
    let result = ConsensusAggregator::default().aggregate(&refs(&predictions), &regime);
    assert_eq!(result.status, AggregationStatus::NoSignal);
    assert!(result.direction.is_none());
    assert_eq!(result.long_count, 2);
    assert_eq!(result.short_count, 2);
    assert_eq!(result.final_confidence, 0.0);
}

#[test]
fn test_below_quorum_is_no_signal() {
    let predictions = vec![
        prediction("a", AgentCategory::Trend, Direction::Long, 0.9),
        prediction("b", AgentCategory::Trend, Direction::Long, 0.9),
    ];
    let regime = RegimeClassification::unknown();
    let result = ConsensusAggregator::new(3).aggregate(&refs(&predictions), &regime);
    assert_eq!(result.status, AggregationStatus::NoSignal);
    assert_eq!(result.total_gated, 2);
}

#[test]
fn test_consensus_percent_and_direction() {
    let predictions = vec![
        prediction("a", AgentCategory::Trend, Direction::Short, 0.7),
        prediction("b", AgentCategory::Trend, Direction::Short, 0.7),
        prediction("c", AgentCategory::Trend, Direction::Short, 0.7),
        prediction("d", AgentCategory::Trend, Direction::Long, 0.7),
        prediction("e", AgentCategory::Trend, Direction::Long, 0.7),
    ];
    let regime = RegimeClassification::unknown();
    let result = ConsensusAggregator::default().aggregate(&refs(&predictions), &regime);
    assert_eq!(result.status, AggregationStatus::Resolved);
    assert_eq!(result.direction, Some(Direction::Short));
    assert_eq!(result.supporting_count, 3);
    assert_eq!(result.total_gated, 5);
    assert!((result.consensus_percent - 60.0).abs() < 1e-12);
    assert!((result.final_confidence - 0.7).abs() < 1e-12);
}

#[test]
fn test_weighted_confidence_uses_regime_weights() {
    let regime = RegimeClassification::new(RegimeType::Trending, 0.5);
    let predictions = vec![
        prediction("trend", AgentCategory::Trend, Direction::Long, 0.9),
        prediction("range", AgentCategory::Range, Direction::Long, 0.6),
        prediction("other", AgentCategory::Other, Direction::Long, 0.7),
    ];
    let result = ConsensusAggregator::default().aggregate(&refs(&predictions), &regime);
    // weights 1.6, 0.45, 1.0
    let expected = (0.9 * 1.6 + 0.6 * 0.45 + 0.7 * 1.0) / (1.6 + 0.45 + 1.0);
    assert!((result.final_confidence - expected).abs() < 1e-12);
}

#[test]
fn test_weights_do_not_change_the_vote() {
    // Two heavily weighted TREND shorts cannot outvote three lightly weighted longs.
    let regime = RegimeClassification::new(RegimeType::Trending, 1.0);
    let predictions = vec![
        prediction("t1", AgentCategory::Trend, Direction::Short, 0.95),
        prediction("t2", AgentCategory::Trend, Direction::Short, 0.95),
        prediction("c1", AgentCategory::Contrarian, Direction::Long, 0.65),
        prediction("c2", AgentCategory::Contrarian, Direction::Long, 0.65),
        prediction("c3", AgentCategory::Contrarian, Direction::Long, 0.65),
    ];
    let result = ConsensusAggregator::default().aggregate(&refs(&predictions), &regime);
    assert_eq!(result.direction, Some(Direction::Long));
    assert!((result.final_confidence - 0.65).abs() < 1e-12);
}

#[test]
fn test_levels_average_ignores_missing() {
    let predictions = vec![
        prediction("a", AgentCategory::Trend, Direction::Long, 0.8).with_levels(100.0, 110.0, 95.0),
        prediction("b", AgentCategory::Trend, Direction::Long, 0.8).with_entry(102.0),
        prediction("c", AgentCategory::Trend, Direction::Long, 0.8),
        prediction("d", AgentCategory::Trend, Direction::Short, 0.8)
            .with_levels(500.0, 400.0, 520.0),
    ];
    let regime = RegimeClassification::unknown();
    let result = ConsensusAggregator::default().aggregate(&refs(&predictions), &regime);
    assert_eq!(result.avg_entry, Some(101.0));
    assert_eq!(result.avg_target, Some(110.0));
    assert_eq!(result.avg_stop, Some(95.0));
}

#[test]
fn test_levels_absent_when_no_supporter_provides_them() {
    let predictions = vec![
        prediction("a", AgentCategory::Range, Direction::Long, 0.8),
        prediction("b", AgentCategory::Range, Direction::Long, 0.8),
        prediction("c", AgentCategory::Range, Direction::Long, 0.8),
    ];
    let regime = RegimeClassification::unknown();
    let result = ConsensusAggregator::default().aggregate(&refs(&predictions), &regime);
    assert!(result.avg_entry.is_none());
    assert!(result.avg_target.is_none());
    assert!(result.avg_stop.is_none());
}

#[test]
fn test_reasons_explain_the_result() {
    let predictions = vec![
        prediction("a", AgentCategory::Trend, Direction::Long, 0.8),
        prediction("b", AgentCategory::Derivatives, Direction::Long, 0.8),
        prediction("c", AgentCategory::Trend, Direction::Long, 0.8),
    ];
    let regime = RegimeClassification::new(RegimeType::Trending, 0.4);
    let result = ConsensusAggregator::default().aggregate(&refs(&predictions), &regime);
    let descriptions: Vec<&str> = result.reasons.iter().map(|r| r.description.as_str()).collect();
    assert!(descriptions.iter().any(|d| d.starts_with("Regime: TRENDING")));
    assert!(descriptions.iter().any(|d| d.starts_with("Consensus: 3/3 LONG")));
    assert!(descriptions.iter().any(|d| d.starts_with("TREND: 2 supporting")));
    assert!(descriptions.iter().any(|d| d.starts_with("DERIVATIVES: 1 supporting")));
}
