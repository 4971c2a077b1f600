// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Best-effort target distances and stored best-effort rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed target distances for best-effort extraction and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffortDistance {
    #[serde(rename = "10 km")]
    Km10,
    #[serde(rename = "20 km")]
    Km20,
    #[serde(rename = "30 km")]
    Km30,
    #[serde(rename = "40 km")]
    Km40,
    #[serde(rename = "50 km")]
    Km50,
    #[serde(rename = "80 km")]
    Km80,
    #[serde(rename = "100 km")]
    Km100,
}

impl EffortDistance {
    /// Every target, shortest first.
    pub const ALL: [EffortDistance; 7] = [
        Self::Km10,
        Self::Km20,
        Self::Km30,
        Self::Km40,
        Self::Km50,
        Self::Km80,
        Self::Km100,
    ];

    pub fn kilometers(&self) -> u32 {
        match self {
            Self::Km10 => 10,
            Self::Km20 => 20,
            Self::Km30 => 30,
            Self::Km40 => 40,
            Self::Km50 => 50,
            Self::Km80 => 80,
            Self::Km100 => 100,
        }
    }

    pub fn meters(&self) -> f64 {
        f64::from(self.kilometers()) * 1000.0
    }

    /// Display label, e.g. `"50 km"`.
    pub fn label(&self) -> String {
        format!("{} km", self.kilometers())
    }

    pub fn from_kilometers(km: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.kilometers() == km)
    }
}

impl fmt::Display for EffortDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.kilometers())
    }
}

/// Error for an unknown effort label.
#[derive(Debug, thiserror::Error)]
#[error("Unknown effort distance: {0}")]
pub struct ParseEffortError(String);

impl FromStr for EffortDistance {
    type Err = ParseEffortError;

    /// Accepts `"50 km"`, `"50km"` or a bare `"50"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let km = s.trim().trim_end_matches("km").trim();
        km.parse::<u32>()
            .ok()
            .and_then(Self::from_kilometers)
            .ok_or_else(|| ParseEffortError(s.to_string()))
    }
}

/// Fastest coverage of a target distance inside one activity.
///
/// `(activity_id, effort)` is the natural key; rows are upserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestEffort {
    /// Strava activity ID
    pub activity_id: u64,
    /// Strava athlete ID (owner)
    pub athlete_id: u64,
    /// Target distance label
    #[serde(rename = "effort_name")]
    pub effort: EffortDistance,
    /// Target distance in meters
    pub distance: f64,
    /// Minimum time over the target distance, whole seconds
    pub moving_time: u32,
    /// Same as moving time; the window is measured on elapsed GPS time
    pub elapsed_time: u32,
    /// Average speed over the window (m/s)
    pub avg_speed: f64,
    /// Activity start date (ISO 8601)
    pub activity_date: String,
}

impl BestEffort {
    pub fn key(&self) -> (u64, EffortDistance) {
        (self.activity_id, self.effort)
    }
}
