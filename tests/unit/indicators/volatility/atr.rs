//! Unit tests for ATR indicator

use chrono::Utc;
use regime_consensus::indicators::volatility::{
    calculate_atr, calculate_atr_default, calculate_atr_percent,
};
use regime_consensus::models::PriceSample;

fn constant_bars(count: usize, close: f64, half_range: f64) -> Vec<PriceSample> {
    (0..count)
        .map(|_| {
            let (high, low) = (close + half_range, close - half_range);
            PriceSample::new(close, high, low, close, 1000.0, Utc::now())
        })
        .collect()
}

#[test]
fn test_atr_insufficient_data() {
    let samples = constant_bars(10, 100.0, 1.0);
    assert!(calculate_atr(&samples, 14).is_none());
}

#[test]
fn test_atr_constant_range() {
    let samples = constant_bars(20, 100.0, 1.0);
    let atr = calculate_atr_default(&samples).unwrap();
    assert_eq!(atr.period, 14);
    assert!((atr.value - 2.0).abs() < 1e-12);
}

#[test]
fn test_atr_percent_of_last_close() {
    let samples = constant_bars(20, 100.0, 1.0);
    let pct = calculate_atr_percent(&samples, 14).unwrap();
    assert!((pct - 2.0).abs() < 1e-12);
}

#[test]
fn test_atr_percent_requires_positive_close() {
    let samples = constant_bars(20, 0.0, 1.0);
    assert!(calculate_atr_percent(&samples, 14).is_none());
    assert!(calculate_atr_percent(&[], 14).is_none());
}
