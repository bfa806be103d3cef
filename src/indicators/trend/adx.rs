//! ADX (Average Directional Index) indicator

use crate::common::math;
use crate::models::indicators::{AdxIndicator, PriceSample};

/// Calculate ADX with Wilder smoothing.
///
/// ADX measures trend strength regardless of direction on a 0-100 scale.
/// Needs at least `period + 1` samples. When fewer than `period` DX readings
/// are available the ADX is the mean of the readings that exist.
pub fn calculate_adx(samples: &[PriceSample], period: u32) -> Option<AdxIndicator> {
    let p = period as usize;
    if p == 0 || samples.len() < p + 1 {
        return None;
    }

    let mut tr_values = Vec::with_capacity(samples.len() - 1);
    let mut plus_dm_values = Vec::with_capacity(samples.len() - 1);
    let mut minus_dm_values = Vec::with_capacity(samples.len() - 1);

    for pair in samples.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        tr_values.push(math::true_range(cur.high, cur.low, prev.close));

        let up_move = cur.high - prev.high;
        let down_move = prev.low - cur.low;
        plus_dm_values.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm_values.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let mut smoothed_tr: f64 = tr_values[..p].iter().sum();
    let mut smoothed_plus: f64 = plus_dm_values[..p].iter().sum();
    let mut smoothed_minus: f64 = minus_dm_values[..p].iter().sum();

    let (mut plus_di, mut minus_di) =
        directional_indices(smoothed_tr, smoothed_plus, smoothed_minus);
    let mut dx_values = vec![directional_index(plus_di, minus_di)];

    for i in p..tr_values.len() {
        smoothed_tr = smoothed_tr - smoothed_tr / p as f64 + tr_values[i];
        smoothed_plus = smoothed_plus - smoothed_plus / p as f64 + plus_dm_values[i];
        smoothed_minus = smoothed_minus - smoothed_minus / p as f64 + minus_dm_values[i];

        let (plus, minus) = directional_indices(smoothed_tr, smoothed_plus, smoothed_minus);
        plus_di = plus;
        minus_di = minus;
        dx_values.push(directional_index(plus_di, minus_di));
    }

    let adx_value = if dx_values.len() >= p {
        let mut adx = math::mean(&dx_values[..p])?;
        for dx in &dx_values[p..] {
            adx = (adx * (p as f64 - 1.0) + dx) / p as f64;
        }
        adx
    } else {
        math::mean(&dx_values)?
    };

    Some(AdxIndicator {
        value: adx_value,
        plus_di,
        minus_di,
        period,
    })
}

/// Calculate ADX with default period (14)
pub fn calculate_adx_default(samples: &[PriceSample]) -> Option<AdxIndicator> {
    calculate_adx(samples, 14)
}

fn directional_indices(tr: f64, plus_dm: f64, minus_dm: f64) -> (f64, f64) {
    if tr > 0.0 {
        (100.0 * plus_dm / tr, 100.0 * minus_dm / tr)
    } else {
        (0.0, 0.0)
    }
}

fn directional_index(plus_di: f64, minus_di: f64) -> f64 {
    let di_sum = plus_di + minus_di;
    if di_sum > 0.0 {
        100.0 * (plus_di - minus_di).abs() / di_sum
    } else {
        0.0
    }
}
