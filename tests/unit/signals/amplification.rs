//! Unit tests for the amplification pipeline

use regime_consensus::config::{AmplificationConfig, BonusComposition};
use regime_consensus::models::{
    AgentCategory, AggregationResult, Direction, RegimeClassification, StrategyPrediction,
};
use regime_consensus::signals::{AmplificationPipeline, ConsensusAggregator};

fn resolved(predictions: &[StrategyPrediction]) -> AggregationResult {
    let gated: Vec<&StrategyPrediction> = predictions.iter().collect();
    ConsensusAggregator::default().aggregate(&gated, &RegimeClassification::unknown())
}

fn supporting(
    predictions: &[StrategyPrediction],
    direction: Direction,
) -> Vec<&StrategyPrediction> {
    predictions.iter().filter(|p| p.direction == direction).collect()
}

fn three_contrarian_longs_one_short(confidence: f64) -> Vec<StrategyPrediction> {
    vec![
        StrategyPrediction::new("c1", AgentCategory::Contrarian, Direction::Long, confidence),
        StrategyPrediction::new("c2", AgentCategory::Contrarian, Direction::Long, confidence),
        StrategyPrediction::new("c3", AgentCategory::Contrarian, Direction::Long, confidence),
        StrategyPrediction::new("t1", AgentCategory::Trend, Direction::Short, confidence),
    ]
}

#[test]
fn test_majority_tiers() {
    let pipeline = AmplificationPipeline::default();
    assert_eq!(pipeline.majority_multiplier(100.0), 1.15);
    assert_eq!(pipeline.majority_multiplier(80.0), 1.15);
    assert_eq!(pipeline.majority_multiplier(79.9), 1.08);
    assert_eq!(pipeline.majority_multiplier(70.0), 1.08);
    assert_eq!(pipeline.majority_multiplier(69.9), 1.0);
}

#[test]
fn test_contrarian_tiers() {
    let pipeline = AmplificationPipeline::default();
    assert_eq!(pipeline.contrarian_multiplier(3, 70.0), 1.15);
    assert_eq!(pipeline.contrarian_multiplier(4, 90.0), 1.15);
    assert_eq!(pipeline.contrarian_multiplier(2, 75.0), 1.10);
    assert_eq!(pipeline.contrarian_multiplier(2, 74.0), 1.0);
    assert_eq!(pipeline.contrarian_multiplier(3, 69.0), 1.0);
    assert_eq!(pipeline.contrarian_multiplier(1, 100.0), 1.0);
}

#[test]
fn test_bonuses_compose_multiplicatively() {
    let predictions = three_contrarian_longs_one_short(0.7);
    let mut result = resolved(&predictions);
    assert!((result.consensus_percent - 75.0).abs() < 1e-12);

    AmplificationPipeline::default().apply(&mut result, &supporting(&predictions, Direction::Long));

    assert_eq!(result.majority_multiplier, 1.08);
    assert_eq!(result.contrarian_multiplier, 1.15);
    assert!((result.final_confidence - 0.7 * 1.08 * 1.15).abs() < 1e-12);
}

#[test]
fn test_strongest_composition_applies_one_bonus() {
    let config = AmplificationConfig {
        composition: BonusComposition::Strongest,
        ..AmplificationConfig::default()
    };
    let predictions = three_contrarian_longs_one_short(0.7);
    let mut result = resolved(&predictions);

    let supporters = supporting(&predictions, Direction::Long);
    AmplificationPipeline::new(config).apply(&mut result, &supporters);

    assert_eq!(result.majority_multiplier, 1.0);
    assert_eq!(result.contrarian_multiplier, 1.15);
    assert!((result.final_confidence - 0.7 * 1.15).abs() < 1e-12);
}

#[test]
fn test_bonuses_can_be_disabled_independently() {
    let config = AmplificationConfig {
        contrarian_enabled: false,
        ..AmplificationConfig::default()
    };
    let predictions = three_contrarian_longs_one_short(0.7);
    let mut result = resolved(&predictions);

    let supporters = supporting(&predictions, Direction::Long);
    AmplificationPipeline::new(config).apply(&mut result, &supporters);

    assert_eq!(result.majority_multiplier, 1.08);
    assert_eq!(result.contrarian_multiplier, 1.0);
    assert!((result.final_confidence - 0.7 * 1.08).abs() < 1e-12);
}

#[test]
fn test_amplification_never_exceeds_one() {
    let predictions = three_contrarian_longs_one_short(0.95);
    let mut result = resolved(&predictions);
    let pipeline = AmplificationPipeline::default();
    let support = supporting(&predictions, Direction::Long);

    pipeline.apply(&mut result, &support);
    assert_eq!(result.final_confidence, 1.0);

    // Clamp is idempotent
    pipeline.apply(&mut result, &support);
    assert_eq!(result.final_confidence, 1.0);
}

#[test]
fn test_no_signal_is_untouched() {
    let predictions = vec![
        StrategyPrediction::new("a", AgentCategory::Contrarian, Direction::Long, 0.9),
        StrategyPrediction::new("b", AgentCategory::Contrarian, Direction::Short, 0.9),
    ];
    let mut result = resolved(&predictions);
    let before = result.clone();
    AmplificationPipeline::default().apply(&mut result, &supporting(&predictions, Direction::Long));
    assert_eq!(result, before);
}
