// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity summary as supplied by the telemetry collaborator.

use serde::{Deserialize, Serialize};

/// Sport tags that count as cycling for training-load purposes.
pub const RIDE_TYPES: &[&str] = &[
    "Ride",
    "VirtualRide",
    "EBikeRide",
    "GravelRide",
    "MountainBikeRide",
    "Velomobile",
];

const OUTDOOR_RIDE: &str = "Ride";
const VIRTUAL_RIDE: &str = "VirtualRide";

/// Owner reference embedded in Strava activity payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteRef {
    pub id: u64,
}

/// Immutable facts about one ride, read once per sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Strava activity ID
    pub id: u64,
    /// Owner of the activity
    #[serde(default)]
    pub athlete: AthleteRef,
    /// Activity name/title
    #[serde(default)]
    pub name: String,
    /// Legacy activity type tag
    #[serde(rename = "type", default)]
    pub activity_type: Option<String>,
    /// Sport type (Ride, GravelRide, VirtualRide, etc.)
    #[serde(default)]
    pub sport_type: Option<String>,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u32,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: u32,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Recorded on an indoor trainer
    #[serde(default)]
    pub trainer: bool,
    /// Strava's own weighted average power, when it has one
    #[serde(default)]
    pub weighted_average_watts: Option<f64>,
    /// Start date/time (ISO 8601, UTC)
    pub start_date: String,
    /// Start date/time in the athlete's local time zone
    #[serde(default)]
    pub start_date_local: Option<String>,
}

impl ActivitySummary {
    pub fn athlete_id(&self) -> u64 {
        self.athlete.id
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.activity_type.as_deref() == Some(tag) || self.sport_type.as_deref() == Some(tag)
    }

    /// Any cycling activity, indoor or outdoor.
    pub fn is_ride(&self) -> bool {
        RIDE_TYPES.iter().any(|t| self.has_tag(t))
    }

    /// A plain outdoor ride: tagged `Ride`, not virtual, not on a trainer.
    pub fn is_outdoor_ride(&self) -> bool {
        self.has_tag(OUTDOOR_RIDE) && !self.has_tag(VIRTUAL_RIDE) && !self.trainer
    }

    /// Moving time, falling back to elapsed time when Strava reports zero.
    pub fn duration_seconds(&self) -> u32 {
        if self.moving_time > 0 {
            self.moving_time
        } else {
            self.elapsed_time
        }
    }

    /// Timestamp used for calendar bucketing (local when available).
    pub fn local_start(&self) -> &str {
        self.start_date_local.as_deref().unwrap_or(&self.start_date)
    }

    /// Case-insensitive check of the name against excluded keywords.
    pub fn name_contains_any(&self, keywords: &[String]) -> bool {
        let name = self.name.to_lowercase();
        keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| name.contains(&k.to_lowercase()))
    }
}
