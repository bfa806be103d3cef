//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::indicators::{AtrIndicator, PriceSample};

/// Calculate ATR as the SMA of the last `period` true ranges.
pub fn calculate_atr(samples: &[PriceSample], period: u32) -> Option<AtrIndicator> {
    if period == 0 || samples.len() < period as usize + 1 {
        return None;
    }

    let tr_values: Vec<f64> = samples
        .windows(2)
        .map(|pair| math::true_range(pair[1].high, pair[1].low, pair[0].close))
        .collect();

    let atr_value = math::sma(&tr_values, period as usize)?;

    Some(AtrIndicator {
        value: atr_value,
        period,
    })
}

/// Calculate ATR with default period (14)
pub fn calculate_atr_default(samples: &[PriceSample]) -> Option<AtrIndicator> {
    calculate_atr(samples, 14)
}

/// ATR expressed as a percentage of the last close.
pub fn calculate_atr_percent(samples: &[PriceSample], period: u32) -> Option<f64> {
    let last_close = samples.last()?.close;
    if !last_close.is_finite() || last_close <= 0.0 {
        return None;
    }
    let atr = calculate_atr(samples, period)?;
    Some(atr.value / last_close * 100.0)
}
