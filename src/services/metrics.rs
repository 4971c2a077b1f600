// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived per-activity metrics: power, heart rate and effective load.

use crate::config::{AthleteThresholds, ZoneSettings};
use crate::models::activity::ActivitySummary;
use crate::models::metrics::{DerivedActivityMetrics, ProcessingNote};
use crate::models::stream::{StreamKind, StreamSet};
use crate::numeric::round_half_up;
use crate::services::heart_rate::HrMetricsCalculator;
use crate::services::power::PowerMetricsCalculator;

/// TSS per hour assumed when there is neither power nor heart rate.
const DEFAULT_TSS_PER_HOUR: f64 = 40.0;

/// Computes [`DerivedActivityMetrics`] for one athlete's thresholds.
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    power: PowerMetricsCalculator,
    heart_rate: HrMetricsCalculator,
}

impl MetricsCalculator {
    pub fn new(thresholds: &AthleteThresholds, zones: &ZoneSettings) -> Self {
        Self {
            power: PowerMetricsCalculator::new(thresholds.ftp, zones),
            heart_rate: HrMetricsCalculator::new(thresholds, zones),
        }
    }

    pub fn calculate(
        &self,
        activity: &ActivitySummary,
        streams: &StreamSet,
    ) -> DerivedActivityMetrics {
        let time = streams.get(StreamKind::Time);
        let watts = streams.get(StreamKind::Watts);
        let heartrate = streams.get(StreamKind::Heartrate);
        let moving_time = activity.duration_seconds();

        let power = self.power.calculate(
            watts,
            time,
            moving_time,
            activity.weighted_average_watts,
        );
        let hr = self.heart_rate.calculate(heartrate, time);

        let mut notes = power.notes;
        notes.extend(hr.notes);

        let effective_tss = match (power.tss, hr.hr_tss) {
            (Some(tss), _) if tss > 0 => tss,
            (_, Some(hr_tss)) if hr_tss > 0 => u32::try_from(hr_tss).unwrap_or(u32::MAX),
            _ => {
                notes.push(ProcessingNote::TimeBasedTssEstimate);
                round_half_up(f64::from(moving_time) / 3600.0 * DEFAULT_TSS_PER_HOUR) as u32
            }
        };

        if !notes.is_empty() {
            tracing::debug!(
                activity_id = activity.id,
                notes = ?notes,
                "Metrics computed from degraded data"
            );
        }

        DerivedActivityMetrics {
            activity_id: activity.id,
            is_ride: activity.is_ride(),
            has_power_data: power.has_power_data,
            has_stream_data: watts.is_some() || heartrate.is_some(),
            normalized_power: power.normalized_power,
            intensity_factor: power.intensity_factor,
            tss: power.tss,
            hr_tss: hr.hr_tss,
            trimp: hr.trimp,
            effective_tss,
            ftp_at_time: self.power.ftp(),
            power_zone_seconds: power.zone_seconds,
            hr_zone_seconds: hr.zone_seconds,
            processing_notes: notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::AthleteRef;
    use crate::models::metrics::{HR_ZONE_COUNT, POWER_ZONE_COUNT};

    fn activity(moving_time: u32, wap: Option<f64>) -> ActivitySummary {
        ActivitySummary {
            id: 42,
            athlete: AthleteRef { id: 7 },
            name: "Test".to_string(),
            activity_type: Some("Ride".to_string()),
            sport_type: Some("Ride".to_string()),
            distance: 30_000.0,
            moving_time,
            elapsed_time: moving_time,
            total_elevation_gain: 0.0,
            trainer: false,
            weighted_average_watts: wap,
            start_date: "2025-01-10T08:00:00Z".to_string(),
            start_date_local: None,
        }
    }

    fn calculator() -> MetricsCalculator {
        MetricsCalculator::new(&AthleteThresholds::default(), &ZoneSettings::default())
    }

    #[test]
    fn test_power_only_uses_power_tss() {
        let streams = StreamSet::default().with(StreamKind::Watts, vec![280.0; 3600]);
        let metrics = calculator().calculate(&activity(3600, None), &streams);
        assert_eq!(metrics.tss, Some(100));
        assert_eq!(metrics.effective_tss, 100);
        assert_eq!(metrics.hr_tss, None);
        assert_eq!(metrics.trimp, None);
        assert_eq!(metrics.hr_zone_seconds, [0; HR_ZONE_COUNT]);
        assert!(metrics.has_stream_data);
        assert!(metrics.processing_notes.is_empty());
    }

    #[test]
    fn test_heart_rate_used_when_power_tss_is_zero() {
        let streams = StreamSet::default()
            .with(StreamKind::Watts, vec![100.0; 10])
            .with(StreamKind::Heartrate, vec![140.0; 3600]);
        let metrics = calculator().calculate(&activity(3600, None), &streams);
        assert_eq!(metrics.tss, Some(0));
        assert_eq!(metrics.effective_tss, 72);
        assert_eq!(metrics.processing_notes, vec![ProcessingNote::ShortPowerStream]);
    }

    #[test]
    fn test_time_based_estimate_without_streams() {
        let metrics = calculator().calculate(&activity(5400, None), &StreamSet::default());
        assert!(!metrics.has_power_data);
        assert!(!metrics.has_stream_data);
        assert_eq!(metrics.normalized_power, None);
        assert_eq!(metrics.effective_tss, 60);
        assert_eq!(metrics.power_zone_seconds, [0; POWER_ZONE_COUNT]);
        assert_eq!(
            metrics.processing_notes,
            vec![ProcessingNote::TimeBasedTssEstimate]
        );
    }

    #[test]
    fn test_weighted_average_fallback_feeds_effective_tss() {
        let metrics = calculator().calculate(&activity(3600, Some(210.4)), &StreamSet::default());
        assert!(metrics.has_power_data);
        assert!(!metrics.has_stream_data);
        assert_eq!(metrics.effective_tss, 56);
        assert_eq!(metrics.ftp_at_time, 280);
    }

    #[test]
    fn test_recalculation_is_deterministic() {
        let streams = StreamSet::default()
            .with(StreamKind::Watts, vec![220.0; 120])
            .with(StreamKind::Heartrate, vec![150.0; 120]);
        let a = calculator().calculate(&activity(120, None), &streams);
        let b = calculator().calculate(&activity(120, None), &streams);
        assert_eq!(a, b);
    }
}
