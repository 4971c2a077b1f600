// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-athlete ride aggregates for dashboard period summaries.
//!
//! Aggregates are folded one activity at a time so a batch can update them
//! incrementally; replaying an activity is a no-op.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::activity::ActivitySummary;
use crate::models::metrics::DerivedActivityMetrics;
use crate::numeric::{round_half_up, round_to};
use crate::time_utils::{calendar_day, YearMonth};

/// Rides longer than this count towards the long-ride average distance.
const LONG_RIDE_SECONDS: u32 = 3600;

/// Running totals over the rides of one athlete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RideStats {
    // ─── Totals ──────────────────────────────────────────────────
    /// Rides folded in
    #[serde(default)]
    pub rides: u32,
    /// Total distance (meters)
    #[serde(default)]
    pub total_distance_meters: f64,
    /// Total moving time (seconds)
    #[serde(default)]
    pub total_moving_seconds: u64,
    /// Total elevation gain (meters)
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Sum of effective TSS over rides with metrics
    #[serde(default)]
    pub total_tss: u64,

    // ─── Averages ────────────────────────────────────────────────
    #[serde(default)]
    np_sum: u64,
    #[serde(default)]
    np_rides: u32,
    #[serde(default)]
    long_ride_distance_meters: f64,
    #[serde(default)]
    long_rides: u32,

    // ─── Breakdown ───────────────────────────────────────────────
    /// Distinct local calendar days with a ride
    #[serde(default)]
    pub active_days: BTreeSet<NaiveDate>,
    /// Ride count per sport type
    #[serde(default)]
    pub rides_by_sport: BTreeMap<String, u32>,
    /// Distance per sport type (meters)
    #[serde(default)]
    pub distance_by_sport: BTreeMap<String, f64>,
    /// Ride count per month
    #[serde(default)]
    pub rides_by_month: BTreeMap<YearMonth, u32>,
    /// Distance per month (meters)
    #[serde(default)]
    pub distance_by_month: BTreeMap<YearMonth, f64>,

    // ─── Idempotency ─────────────────────────────────────────────
    #[serde(default)]
    processed_activity_ids: HashSet<u64>,
}

/// Rounded, display-ready view of a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub rides: u32,
    pub distance_km: f64,
    pub hours: f64,
    pub elevation: f64,
    pub active_days: u32,
    pub total_tss: u64,
    /// Mean NP over rides that had power
    pub avg_np: Option<u32>,
    /// Mean distance of rides longer than one hour
    pub avg_long_ride_km: Option<f64>,
}

impl RideStats {
    /// Fold one activity (and its metrics, if computed) into the totals.
    ///
    /// Returns `false` when the activity is not a ride or was already folded.
    pub fn update_from_activity(
        &mut self,
        activity: &ActivitySummary,
        metrics: Option<&DerivedActivityMetrics>,
    ) -> bool {
        if !activity.is_ride() || self.processed_activity_ids.contains(&activity.id) {
            return false;
        }
        self.processed_activity_ids.insert(activity.id);

        let moving = activity.duration_seconds();
        self.rides += 1;
        self.total_distance_meters += activity.distance;
        self.total_moving_seconds += u64::from(moving);
        self.total_elevation_gain += activity.total_elevation_gain;

        if let Some(metrics) = metrics {
            self.total_tss += u64::from(metrics.effective_tss);
            if let Some(np) = metrics.normalized_power.filter(|np| *np > 0) {
                self.np_sum += u64::from(np);
                self.np_rides += 1;
            }
        }

        if moving > LONG_RIDE_SECONDS {
            self.long_ride_distance_meters += activity.distance;
            self.long_rides += 1;
        }

        let sport = activity
            .sport_type
            .clone()
            .or_else(|| activity.activity_type.clone())
            .unwrap_or_else(|| "Ride".to_string());
        *self.rides_by_sport.entry(sport.clone()).or_insert(0) += 1;
        *self.distance_by_sport.entry(sport).or_insert(0.0) += activity.distance;

        if let Some(day) = calendar_day(activity.local_start()) {
            self.active_days.insert(day);
            let month = YearMonth::of(day);
            *self.rides_by_month.entry(month).or_insert(0) += 1;
            *self.distance_by_month.entry(month).or_insert(0.0) += activity.distance;
        }

        true
    }

    pub fn avg_np(&self) -> Option<u32> {
        (self.np_rides > 0).then(|| {
            let avg = self.np_sum as f64 / f64::from(self.np_rides);
            round_half_up(avg) as u32
        })
    }

    pub fn avg_long_ride_meters(&self) -> Option<f64> {
        (self.long_rides > 0).then(|| self.long_ride_distance_meters / f64::from(self.long_rides))
    }

    pub fn summary(&self) -> PeriodSummary {
        PeriodSummary {
            rides: self.rides,
            distance_km: round_to(self.total_distance_meters / 1000.0, 1),
            hours: round_to(self.total_moving_seconds as f64 / 3600.0, 1),
            elevation: round_to(self.total_elevation_gain, 0),
            active_days: self.active_days.len() as u32,
            total_tss: self.total_tss,
            avg_np: self.avg_np(),
            avg_long_ride_km: self.avg_long_ride_meters().map(|m| round_to(m / 1000.0, 1)),
        }
    }
}
