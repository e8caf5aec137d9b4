//! Rolling signal-to-noise ratio over a validated series.
//!
//! For a window length `P` and index `i`, the window is the `P` observations
//! `[i-P+1, i]` inclusive. `noise` is the sum of close deltas over the
//! window; `signal` is the absolute close change between the observation `P`
//! steps back and the current one, `|close[i] - close[i-P]|`. The boundary
//! observation sits one step before the window starts, so the signal is not
//! a re-summation of the window. `SNR = signal / noise`.
//!
//! High values indicate trending, low values indicate choppiness. With
//! strictly monotone closes the telescoping deltas make the ratio exactly
//! 1.0.
//!
//! Indices with fewer than `P` preceding observations score
//! [`SnrValue::Insufficient`]. A window whose noise sums to exactly 0.0
//! (all closes equal) also scores `Insufficient` rather than a non-finite
//! number; see DESIGN.md for the rationale.

use crate::series::Series;
use crate::types::{Observation, SnrValue};

/// SNR at one index. Pure function of the observation slice, the index, and
/// the window length.
pub fn snr_at(observations: &[Observation], index: usize, period: usize) -> SnrValue {
    if period == 0 || index < period {
        return SnrValue::Insufficient;
    }

    let noise: f64 = observations[index - period + 1..=index]
        .iter()
        .map(|o| o.close_delta)
        .sum();
    if noise == 0.0 {
        return SnrValue::Insufficient;
    }

    let signal = (observations[index].close - observations[index - period].close).abs();
    SnrValue::Value(signal / noise)
}

/// Score every observation of a series in one pass, annotating `snr` in
/// place. Series are independent; scoring one never reads another.
pub fn score_series(series: &mut Series, period: usize) {
    for index in 0..series.len() {
        let snr = snr_at(series.observations(), index, period);
        series.observations_mut()[index].snr = snr;
    }
}
