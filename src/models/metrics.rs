// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Derived per-activity training metrics, keyed by activity for upsert.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::stream::StreamKind;

/// Number of power zones (Coggan 7-zone model).
pub const POWER_ZONE_COUNT: usize = 7;
/// Number of heart-rate zones.
pub const HR_ZONE_COUNT: usize = 5;

/// Why a metric is less precise than it could be, or missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "stream", rename_all = "snake_case")]
pub enum ProcessingNote {
    /// Fewer than 30 seconds of power; NP is the plain average.
    ShortPowerStream,
    /// No power stream; NP taken from Strava's weighted average watts.
    WeightedAverageFallback,
    /// Neither power nor HR; effective TSS is a duration-based guess.
    TimeBasedTssEstimate,
    /// The time stream did not line up with this stream, so it was used unexpanded.
    UnalignedTimeStream(StreamKind),
}

impl fmt::Display for ProcessingNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortPowerStream => write!(f, "Power data too short for NP (<30s)"),
            Self::WeightedAverageFallback => {
                write!(f, "Power from Strava weighted average watts (no stream)")
            }
            Self::TimeBasedTssEstimate => write!(f, "No power/HR data, time-based TSS estimate"),
            Self::UnalignedTimeStream(kind) => {
                write!(f, "Time stream length differs from {} stream", kind)
            }
        }
    }
}

/// One record per activity; replaced wholesale on reprocessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedActivityMetrics {
    /// Strava activity ID (upsert key)
    pub activity_id: u64,
    pub is_ride: bool,
    pub has_power_data: bool,
    pub has_stream_data: bool,
    pub normalized_power: Option<u32>,
    pub intensity_factor: Option<f64>,
    pub tss: Option<u32>,
    pub hr_tss: Option<i64>,
    pub trimp: Option<u32>,
    /// Load figure used for aggregation: power TSS, else hrTSS, else a time estimate
    pub effective_tss: u32,
    /// FTP the metrics were computed against
    pub ftp_at_time: u32,
    /// Seconds spent in power zones Z1..Z7
    pub power_zone_seconds: [u32; POWER_ZONE_COUNT],
    /// Seconds spent in heart-rate zones Z1..Z5
    pub hr_zone_seconds: [u32; HR_ZONE_COUNT],
    #[serde(default)]
    pub processing_notes: Vec<ProcessingNote>,
}
