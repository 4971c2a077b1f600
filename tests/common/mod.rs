// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

use async_trait::async_trait;
use ride_league::error::{AppError, Result};
use ride_league::models::activity::{ActivitySummary, AthleteRef};
use ride_league::models::effort::{BestEffort, EffortDistance};
use ride_league::models::{Athlete, StreamKind, StreamSet};
use ride_league::services::StreamSource;
use std::collections::{HashMap, HashSet};

/// Roster entry with just a first name.
pub fn athlete(athlete_id: u64, firstname: &str) -> Athlete {
    Athlete {
        athlete_id,
        firstname: Some(firstname.to_string()),
        lastname: None,
        profile_medium: None,
    }
}

/// Outdoor ride at 20 km/h starting at `start` (local time equal to UTC).
pub fn ride(id: u64, athlete_id: u64, start: &str, distance: f64) -> ActivitySummary {
    ActivitySummary {
        id,
        athlete: AthleteRef { id: athlete_id },
        name: format!("Ride {}", id),
        activity_type: Some("Ride".to_string()),
        sport_type: Some("Ride".to_string()),
        distance,
        moving_time: (distance / 20_000.0 * 3600.0) as u32,
        elapsed_time: (distance / 20_000.0 * 3600.0) as u32 + 120,
        total_elevation_gain: 0.0,
        trainer: false,
        weighted_average_watts: None,
        start_date: start.to_string(),
        start_date_local: Some(start.to_string()),
    }
}

/// Best effort record dated `activity_date`.
pub fn effort(
    activity_id: u64,
    athlete_id: u64,
    effort: EffortDistance,
    seconds: u32,
    activity_date: &str,
) -> BestEffort {
    BestEffort {
        activity_id,
        athlete_id,
        effort,
        distance: effort.meters(),
        moving_time: seconds,
        elapsed_time: seconds,
        avg_speed: effort.meters() / f64::from(seconds),
        activity_date: activity_date.to_string(),
    }
}

/// One sample per second at a constant speed.
pub fn steady_streams(seconds: u32, meters_per_second: f64) -> StreamSet {
    let time: Vec<f64> = (0..=seconds).map(f64::from).collect();
    let distance: Vec<f64> = time.iter().map(|t| t * meters_per_second).collect();
    StreamSet::default()
        .with(StreamKind::Time, time)
        .with(StreamKind::Distance, distance)
}

/// Stream source with canned streams that can be told to fail for some IDs.
#[derive(Default)]
pub struct FakeSource {
    streams: HashMap<u64, StreamSet>,
    fail_ids: HashSet<u64>,
}

impl FakeSource {
    pub fn with_streams(mut self, activity_id: u64, streams: StreamSet) -> Self {
        self.streams.insert(activity_id, streams);
        self
    }

    pub fn failing(mut self, activity_id: u64) -> Self {
        self.fail_ids.insert(activity_id);
        self
    }
}

#[async_trait]
impl StreamSource for FakeSource {
    async fn fetch_streams(&self, activity: &ActivitySummary) -> Result<StreamSet> {
        if self.fail_ids.contains(&activity.id) {
            return Err(AppError::Provider(format!(
                "{} for activity {}",
                AppError::PROVIDER_RATE_LIMIT,
                activity.id
            )));
        }
        Ok(self.streams.get(&activity.id).cloned().unwrap_or_default())
    }
}
