// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TRIMP and heart-rate based TSS.

use crate::config::{AthleteThresholds, ZoneSettings};
use crate::models::metrics::{ProcessingNote, HR_ZONE_COUNT};
use crate::models::stream::StreamKind;
use crate::numeric::{mean, round_half_up};
use crate::services::streams::{expand_to_per_second, is_aligned};
use crate::services::zones::{heart_rate_zones, ZoneTable};

/// Heart-rate results for one activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HrMetrics {
    pub trimp: Option<u32>,
    /// Negative when the average sits below resting HR
    pub hr_tss: Option<i64>,
    pub zone_seconds: [u32; HR_ZONE_COUNT],
    pub notes: Vec<ProcessingNote>,
}

#[derive(Debug, Clone)]
pub struct HrMetricsCalculator {
    max_hr: u32,
    resting_hr: u32,
    zones: ZoneTable<HR_ZONE_COUNT>,
    ratio_breaks: [f64; HR_ZONE_COUNT - 1],
    coefficients: [f64; HR_ZONE_COUNT],
}

impl HrMetricsCalculator {
    pub fn new(thresholds: &AthleteThresholds, settings: &ZoneSettings) -> Self {
        Self {
            max_hr: thresholds.max_hr,
            resting_hr: thresholds.resting_hr,
            zones: heart_rate_zones(thresholds.max_hr, settings),
            ratio_breaks: settings.hr_fractions,
            coefficients: settings.hr_coefficients,
        }
    }

    pub fn calculate(&self, heartrate: Option<&[f64]>, time: Option<&[f64]>) -> HrMetrics {
        let mut metrics = HrMetrics::default();
        let Some(raw) = heartrate.filter(|hr| !hr.is_empty()) else {
            return metrics;
        };

        if time.is_some() && !is_aligned(raw, time) {
            metrics
                .notes
                .push(ProcessingNote::UnalignedTimeStream(StreamKind::Heartrate));
        }
        let hr = expand_to_per_second(raw, time);
        metrics.zone_seconds = self.zones.bucketize(&hr);

        let trimp: f64 = metrics
            .zone_seconds
            .iter()
            .zip(self.coefficients)
            .map(|(secs, coef)| f64::from(*secs) / 60.0 * coef)
            .sum();
        metrics.trimp = Some(round_half_up(trimp) as u32);

        let reserve = f64::from(self.max_hr) - f64::from(self.resting_hr);
        if let Some(avg) = mean(&hr).filter(|_| reserve > 0.0) {
            let ratio = (avg - f64::from(self.resting_hr)) / reserve;
            let hours = hr.len() as f64 / 3600.0;
            let tss = hours * ratio * 100.0 * self.coefficient_for_ratio(ratio);
            metrics.hr_tss = Some(round_half_up(tss) as i64);
        }

        metrics
    }

    /// Coefficient of the bucket the reserve ratio falls into.
    fn coefficient_for_ratio(&self, ratio: f64) -> f64 {
        let bucket = self
            .ratio_breaks
            .iter()
            .position(|brk| ratio < *brk)
            .unwrap_or(HR_ZONE_COUNT - 1);
        self.coefficients[bucket]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> HrMetricsCalculator {
        HrMetricsCalculator::new(&AthleteThresholds::default(), &ZoneSettings::default())
    }

    #[test]
    fn test_no_heart_rate() {
        assert_eq!(calculator().calculate(None, None), HrMetrics::default());
        assert_eq!(calculator().calculate(Some(&[]), None), HrMetrics::default());
    }

    #[test]
    fn test_trimp_and_hr_tss() {
        // One hour at 140 bpm: zone 3 (133..152), reserve ratio 95/145
        let hr = vec![140.0; 3600];
        let metrics = calculator().calculate(Some(&hr), None);
        assert_eq!(metrics.zone_seconds, [0, 0, 3600, 0, 0]);
        assert_eq!(metrics.trimp, Some(72));
        // ratio 0.655 falls in the second bucket (coef 1.1): 65.5 * 1.1 = 72.07
        assert_eq!(metrics.hr_tss, Some(72));
    }

    #[test]
    fn test_trimp_mixes_zones() {
        let mut hr = vec![100.0; 600];
        hr.extend(vec![180.0; 600]);
        let metrics = calculator().calculate(Some(&hr), None);
        assert_eq!(metrics.zone_seconds, [600, 0, 0, 0, 600]);
        // 10 min * 1.0 + 10 min * 4.5
        assert_eq!(metrics.trimp, Some(55));
    }

    #[test]
    fn test_resting_average_gives_non_positive_hr_tss() {
        let hr = vec![40.0; 600];
        let metrics = calculator().calculate(Some(&hr), None);
        assert!(metrics.hr_tss.is_some_and(|t| t <= 0));
    }

    #[test]
    fn test_expands_with_time() {
        let hr = vec![150.0, 150.0];
        let time = vec![0.0, 59.0];
        let metrics = calculator().calculate(Some(&hr), Some(&time));
        assert_eq!(metrics.zone_seconds.iter().sum::<u32>(), 60);
        assert_eq!(metrics.trimp, Some(1));
    }
}
