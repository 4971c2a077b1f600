// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared rounding helpers.
//!
//! Half values always round upward (towards positive infinity), so -2.5
//! rounds to -2 and 2.5 rounds to 3.

/// Round to the nearest integer, halves upward.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to a fixed number of decimal places, halves upward.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
