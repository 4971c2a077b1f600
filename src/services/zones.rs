// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-in-zone accounting for power and heart rate.
//!
//! Zones are half-open `[min, max)` intervals partitioning `[0, ∞)`. Samples
//! outside every zone (negative values, NaN) are not counted.

use crate::config::ZoneSettings;
use crate::models::metrics::{HR_ZONE_COUNT, POWER_ZONE_COUNT};

/// One zone, `min <= value < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub min: f64,
    pub max: f64,
}

impl Zone {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// An ordered table of `N` contiguous zones.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTable<const N: usize> {
    zones: [Zone; N],
}

impl<const N: usize> ZoneTable<N> {
    /// Build from the absolute upper bounds of zones `1..N`; the first zone
    /// starts at zero and the last is unbounded.
    pub fn from_upper_bounds(bounds: &[f64]) -> Self {
        debug_assert_eq!(bounds.len() + 1, N);
        let zones = std::array::from_fn(|i| Zone {
            min: if i == 0 { 0.0 } else { bounds.get(i - 1).copied().unwrap_or(f64::INFINITY) },
            max: bounds.get(i).copied().unwrap_or(f64::INFINITY),
        });
        Self { zones }
    }

    pub fn zones(&self) -> &[Zone; N] {
        &self.zones
    }

    /// Index of the first zone containing `value`.
    pub fn zone_of(&self, value: f64) -> Option<usize> {
        self.zones.iter().position(|z| z.contains(value))
    }

    /// Seconds per zone for a per-second series.
    pub fn bucketize(&self, samples: &[f64]) -> [u32; N] {
        let mut seconds = [0u32; N];
        for zone in samples.iter().filter_map(|v| self.zone_of(*v)) {
            seconds[zone] += 1;
        }
        seconds
    }
}

/// Power zones relative to FTP.
pub fn power_zones(ftp: u32, settings: &ZoneSettings) -> ZoneTable<POWER_ZONE_COUNT> {
    let bounds = settings.power_fractions.map(|f| f64::from(ftp) * f);
    ZoneTable::from_upper_bounds(&bounds)
}

/// Heart-rate zones relative to max HR.
pub fn heart_rate_zones(max_hr: u32, settings: &ZoneSettings) -> ZoneTable<HR_ZONE_COUNT> {
    let bounds = settings.hr_fractions.map(|f| f64::from(max_hr) * f);
    ZoneTable::from_upper_bounds(&bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_zone_bounds() {
        let table = power_zones(280, &ZoneSettings::default());
        let zones = table.zones();
        assert_eq!(zones[0].min, 0.0);
        assert!((zones[0].max - 154.0).abs() < 1e-9);
        assert!((zones[3].min - 252.0).abs() < 1e-9);
        assert!((zones[3].max - 294.0).abs() < 1e-9);
        assert_eq!(zones[6].max, f64::INFINITY);
    }

    #[test]
    fn test_boundaries_are_half_open() {
        let table = power_zones(280, &ZoneSettings::default());
        assert_eq!(table.zone_of(0.0), Some(0));
        assert_eq!(table.zone_of(153.9), Some(0));
        assert_eq!(table.zone_of(154.5), Some(1));
        assert_eq!(table.zone_of(1000.0), Some(6));
        assert_eq!(table.zone_of(-1.0), None);
        assert_eq!(table.zone_of(f64::NAN), None);
    }

    #[test]
    fn test_bucketize_counts_seconds() {
        let table = heart_rate_zones(190, &ZoneSettings::default());
        // Z1 < 114, Z2 < 133, Z3 < 152, Z4 < 171
        let samples = [100.0, 113.0, 120.0, 140.0, 160.0, 175.0, 180.0];
        assert_eq!(table.bucketize(&samples), [2, 1, 1, 1, 2]);
    }

    #[test]
    fn test_bucketize_total_matches_valid_samples() {
        let table = power_zones(250, &ZoneSettings::default());
        let samples: Vec<f64> = (0..600).map(f64::from).collect();
        let seconds = table.bucketize(&samples);
        assert_eq!(seconds.iter().sum::<u32>(), 600);
    }
}
