// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Normalized Power, Intensity Factor and TSS from a power stream.

use crate::config::ZoneSettings;
use crate::models::metrics::{ProcessingNote, POWER_ZONE_COUNT};
use crate::models::stream::StreamKind;
use crate::numeric::{mean, round_half_up, round_to};
use crate::services::streams::{expand_to_per_second, is_aligned};
use crate::services::zones::{power_zones, ZoneTable};

/// Rolling window for NP, in samples.
pub const NP_WINDOW: usize = 30;

/// Power-side results for one activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerMetrics {
    pub has_power_data: bool,
    pub normalized_power: Option<u32>,
    pub intensity_factor: Option<f64>,
    pub tss: Option<u32>,
    pub zone_seconds: [u32; POWER_ZONE_COUNT],
    pub notes: Vec<ProcessingNote>,
}

/// Unrounded NP: 4th root of the mean 4th power of the 30-sample rolling
/// mean. `None` for fewer than 30 samples.
pub fn normalized_power(watts: &[f64]) -> Option<f64> {
    if watts.len() < NP_WINDOW {
        return None;
    }
    let window = NP_WINDOW as f64;
    let mut sum: f64 = watts[..NP_WINDOW - 1].iter().sum();
    let mut fourth_sum = 0.0;
    let mut count = 0usize;
    for i in NP_WINDOW - 1..watts.len() {
        sum += watts[i];
        if i >= NP_WINDOW {
            sum -= watts[i - NP_WINDOW];
        }
        fourth_sum += (sum / window).powi(4);
        count += 1;
    }
    Some((fourth_sum / count as f64).powf(0.25))
}

/// Power calculator bound to one FTP.
#[derive(Debug, Clone)]
pub struct PowerMetricsCalculator {
    ftp: u32,
    zones: ZoneTable<POWER_ZONE_COUNT>,
}

impl PowerMetricsCalculator {
    pub fn new(ftp: u32, settings: &ZoneSettings) -> Self {
        Self {
            ftp,
            zones: power_zones(ftp, settings),
        }
    }

    pub fn ftp(&self) -> u32 {
        self.ftp
    }

    /// Compute power metrics.
    ///
    /// `moving_time` and `weighted_average_watts` are only used when there is
    /// no power stream.
    pub fn calculate(
        &self,
        watts: Option<&[f64]>,
        time: Option<&[f64]>,
        moving_time: u32,
        weighted_average_watts: Option<f64>,
    ) -> PowerMetrics {
        let mut metrics = PowerMetrics::default();

        if let Some(raw) = watts.filter(|w| !w.is_empty()) {
            if time.is_some() && !is_aligned(raw, time) {
                metrics
                    .notes
                    .push(ProcessingNote::UnalignedTimeStream(StreamKind::Watts));
            }
            let watts = expand_to_per_second(raw, time);
            metrics.has_power_data = true;
            metrics.zone_seconds = self.zones.bucketize(&watts);

            let seconds = watts.len() as f64;
            match normalized_power(&watts) {
                Some(np) => {
                    let np = round_half_up(np);
                    self.fill_load(&mut metrics, np, np, seconds);
                }
                None => {
                    metrics.notes.push(ProcessingNote::ShortPowerStream);
                    if let Some(avg) = mean(&watts) {
                        self.fill_load(&mut metrics, round_half_up(avg), avg, seconds);
                    }
                }
            }
        } else if let Some(wap) = weighted_average_watts.filter(|w| *w > 0.0) {
            metrics.notes.push(ProcessingNote::WeightedAverageFallback);
            metrics.has_power_data = true;
            self.fill_load(&mut metrics, round_half_up(wap), wap, f64::from(moving_time));
        }

        metrics
    }

    /// IF and TSS from `intensity_watts`; `np` is the reported NP.
    fn fill_load(&self, metrics: &mut PowerMetrics, np: f64, intensity_watts: f64, seconds: f64) {
        let ftp = f64::from(self.ftp);
        let intensity_factor = round_to(intensity_watts / ftp, 3);
        let tss = round_half_up(seconds * intensity_watts * intensity_factor / (ftp * 3600.0) * 100.0);
        metrics.normalized_power = Some(np.max(0.0) as u32);
        metrics.intensity_factor = Some(intensity_factor);
        metrics.tss = Some(tss.max(0.0) as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> PowerMetricsCalculator {
        PowerMetricsCalculator::new(280, &ZoneSettings::default())
    }

    #[test]
    fn test_constant_power_np_equals_power() {
        let watts = vec![200.0; 40];
        let np = normalized_power(&watts).unwrap();
        assert!((np - 200.0).abs() < 1e-9);

        let metrics = calculator().calculate(Some(&watts), None, 0, None);
        assert_eq!(metrics.normalized_power, Some(200));
        assert_eq!(metrics.intensity_factor, Some(0.714));
        assert_eq!(metrics.tss, Some(1));
        assert!(metrics.notes.is_empty());
    }

    #[test]
    fn test_np_weights_surges() {
        let mut watts = vec![100.0; 60];
        watts.extend(vec![300.0; 60]);
        let np = normalized_power(&watts).unwrap();
        assert!(np > 200.0);
    }

    #[test]
    fn test_hour_at_ftp_is_100_tss() {
        let watts = vec![280.0; 3600];
        let metrics = calculator().calculate(Some(&watts), None, 3600, None);
        assert_eq!(metrics.normalized_power, Some(280));
        assert_eq!(metrics.intensity_factor, Some(1.0));
        assert_eq!(metrics.tss, Some(100));
        assert_eq!(metrics.zone_seconds[3], 3600);
    }

    #[test]
    fn test_short_stream_falls_back_to_average() {
        let watts = vec![150.0, 250.0, 200.0];
        let metrics = calculator().calculate(Some(&watts), None, 0, None);
        assert_eq!(metrics.normalized_power, Some(200));
        assert_eq!(metrics.tss, Some(0));
        assert_eq!(metrics.notes, vec![ProcessingNote::ShortPowerStream]);
    }

    #[test]
    fn test_weighted_average_fallback() {
        let metrics = calculator().calculate(None, None, 3600, Some(210.4));
        assert!(metrics.has_power_data);
        assert_eq!(metrics.normalized_power, Some(210));
        assert_eq!(metrics.intensity_factor, Some(0.751));
        // 3600 * 210.4 * 0.751 / (280 * 3600) * 100 = 56.43
        assert_eq!(metrics.tss, Some(56));
        assert_eq!(metrics.zone_seconds, [0; POWER_ZONE_COUNT]);
        assert_eq!(metrics.notes, vec![ProcessingNote::WeightedAverageFallback]);
    }

    #[test]
    fn test_no_power_at_all() {
        let metrics = calculator().calculate(Some(&[]), None, 3600, Some(0.0));
        assert_eq!(metrics, PowerMetrics::default());
    }

    #[test]
    fn test_expansion_uses_time_stream() {
        // 20 samples every 2 seconds expand to 39 per-second samples
        let watts = vec![200.0; 20];
        let time: Vec<f64> = (0..20).map(|i| f64::from(i) * 2.0).collect();
        let metrics = calculator().calculate(Some(&watts), Some(&time), 0, None);
        assert_eq!(metrics.zone_seconds.iter().sum::<u32>(), 39);
        assert_eq!(metrics.normalized_power, Some(200));
        assert!(metrics.notes.is_empty());
    }

    #[test]
    fn test_unaligned_time_is_noted() {
        let watts = vec![200.0; 40];
        let time = vec![0.0; 10];
        let metrics = calculator().calculate(Some(&watts), Some(&time), 0, None);
        assert_eq!(metrics.zone_seconds.iter().sum::<u32>(), 40);
        assert_eq!(
            metrics.notes,
            vec![ProcessingNote::UnalignedTimeStream(StreamKind::Watts)]
        );
    }
}
