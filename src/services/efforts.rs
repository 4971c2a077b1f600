// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-effort extraction: fastest coverage of fixed distances in a ride.

use crate::config::EffortSettings;
use crate::models::activity::ActivitySummary;
use crate::models::effort::{BestEffort, EffortDistance};
use crate::models::stream::{StreamKind, StreamSet};
use crate::numeric::round_half_up;

/// Minimum time of any contiguous segment covering at least `target` meters.
///
/// Two-pointer sliding window over aligned cumulative `distance` and `time`
/// streams. Windows that round to zero seconds (a GPS jump inside one time
/// sample) are skipped. Returns `None` when no other segment reaches the
/// target or the streams do not line up.
pub fn fastest_segment(distance: &[f64], time: &[f64], target: f64) -> Option<f64> {
    if distance.len() != time.len() {
        return None;
    }
    let n = distance.len();
    let mut best: Option<f64> = None;
    let mut j = 0;
    for i in 0..n {
        while j < n && distance[j] - distance[i] < target {
            j += 1;
        }
        if j == n {
            break;
        }
        let elapsed = time[j] - time[i];
        if round_half_up(elapsed) > 0.0 {
            best = Some(best.map_or(elapsed, |b| b.min(elapsed)));
        }
    }
    best
}

/// Finds best efforts for eligible outdoor rides.
#[derive(Debug, Clone)]
pub struct BestEffortFinder {
    settings: EffortSettings,
}

impl BestEffortFinder {
    pub fn new(settings: EffortSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EffortSettings {
        &self.settings
    }

    /// Outdoor ride, long enough, and not excluded by name.
    pub fn is_eligible(&self, activity: &ActivitySummary) -> bool {
        activity.is_outdoor_ride()
            && activity.distance >= self.settings.min_activity_distance
            && !activity.name_contains_any(&self.settings.excluded_name_keywords)
    }

    /// Whether the activity is long enough to try `target`.
    pub fn attempts(&self, activity: &ActivitySummary, target: EffortDistance) -> bool {
        activity.distance >= target.meters() * self.settings.distance_tolerance
    }

    /// One record per target that has a qualifying segment; none for
    /// ineligible activities or missing streams.
    pub fn find_best_efforts(
        &self,
        activity: &ActivitySummary,
        streams: &StreamSet,
    ) -> Vec<BestEffort> {
        if !self.is_eligible(activity) {
            tracing::debug!(activity_id = activity.id, "Not eligible for best efforts");
            return Vec::new();
        }
        let (Some(distance), Some(time)) = (
            streams.get(StreamKind::Distance),
            streams.get(StreamKind::Time),
        ) else {
            return Vec::new();
        };
        if distance.len() != time.len() {
            tracing::debug!(
                activity_id = activity.id,
                distance_len = distance.len(),
                time_len = time.len(),
                "Distance and time streams differ in length"
            );
            return Vec::new();
        }

        let mut targets = self.settings.targets.clone();
        targets.sort();
        targets.dedup();

        targets
            .into_iter()
            .filter(|target| self.attempts(activity, *target))
            .filter_map(|target| {
                let seconds = round_half_up(fastest_segment(distance, time, target.meters())?);
                (seconds > 0.0).then(|| BestEffort {
                    activity_id: activity.id,
                    athlete_id: activity.athlete_id(),
                    effort: target,
                    distance: target.meters(),
                    moving_time: seconds as u32,
                    elapsed_time: seconds as u32,
                    avg_speed: target.meters() / seconds,
                    activity_date: activity.start_date.clone(),
                })
            })
            .collect()
    }
}
