// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resampling of irregular telemetry to one sample per second.

use std::borrow::Cow;

/// Whether `time` can be used to expand `data`.
pub fn is_aligned(data: &[f64], time: Option<&[f64]>) -> bool {
    time.is_some_and(|t| t.len() == data.len())
}

/// Linearly interpolate `data` onto whole seconds using its `time` stream.
///
/// Each gap `time[i]..time[i+1]` contributes `ceil(dt)` samples starting at
/// `data[i]`; the final raw sample is appended last. Gaps that do not move
/// forward contribute nothing.
///
/// Without a time stream, or when the lengths differ, `data` is returned
/// unchanged and callers work with the irregular cadence.
pub fn expand_to_per_second<'a>(data: &'a [f64], time: Option<&[f64]>) -> Cow<'a, [f64]> {
    let time = match time {
        Some(time) if time.len() == data.len() => time,
        _ => return Cow::Borrowed(data),
    };

    let mut expanded = Vec::with_capacity(expected_len(time));
    for (values, times) in data.windows(2).zip(time.windows(2)) {
        let dt = times[1] - times[0];
        let delta = values[1] - values[0];
        let mut s = 0.0;
        while s < dt {
            expanded.push(values[0] + delta * s / dt);
            s += 1.0;
        }
    }
    if let Some(last) = data.last() {
        expanded.push(*last);
    }
    Cow::Owned(expanded)
}

fn expected_len(time: &[f64]) -> usize {
    match (time.first(), time.last()) {
        (Some(first), Some(last)) if last > first => (last - first).ceil() as usize + 1,
        _ => time.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_gaps_linearly() {
        let data = [100.0, 200.0, 200.0];
        let time = [0.0, 4.0, 5.0];
        let expanded = expand_to_per_second(&data, Some(&time));
        assert_eq!(
            expanded.as_ref(),
            &[100.0, 125.0, 150.0, 175.0, 200.0, 200.0]
        );
    }

    #[test]
    fn test_regular_stream_is_unchanged_in_value() {
        let data = [1.0, 2.0, 3.0];
        let time = [0.0, 1.0, 2.0];
        assert_eq!(expand_to_per_second(&data, Some(&time)).as_ref(), &data);
    }

    #[test]
    fn test_fractional_gap_rounds_up() {
        let data = [0.0, 10.0];
        let time = [0.0, 2.5];
        let expanded = expand_to_per_second(&data, Some(&time));
        assert_eq!(expanded.as_ref(), &[0.0, 4.0, 8.0, 10.0]);
    }

    #[test]
    fn test_repeated_timestamp_adds_nothing() {
        let data = [5.0, 7.0, 9.0];
        let time = [0.0, 0.0, 1.0];
        assert_eq!(expand_to_per_second(&data, Some(&time)).as_ref(), &[7.0, 9.0]);
    }

    #[test]
    fn test_missing_or_mismatched_time_returns_input() {
        let data = [1.0, 2.0, 3.0];
        assert!(matches!(expand_to_per_second(&data, None), Cow::Borrowed(_)));
        let short_time = [0.0, 5.0];
        let out = expand_to_per_second(&data, Some(&short_time));
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), &data);
        assert!(!is_aligned(&data, Some(&short_time)));
    }

    #[test]
    fn test_empty_stream() {
        let out = expand_to_per_second(&[], Some(&[]));
        assert!(out.is_empty());
    }
}
