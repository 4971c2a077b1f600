// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Telemetry collaborator seam and the JSON snapshot it can be served from.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::activity::ActivitySummary;
use crate::models::athlete::Athlete;
use crate::models::stream::{StreamSet, TypedStream};

/// Supplies already-fetched streams for an activity.
///
/// Implementations own I/O and rate limiting; the engine only awaits the
/// result. A missing stream is an empty [`StreamSet`], not an error.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn fetch_streams(&self, activity: &ActivitySummary) -> Result<StreamSet>;
}

/// Streams as delivered by Strava, keyed or as a typed list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StreamPayload {
    Typed(Vec<TypedStream>),
    Keyed(StreamSet),
}

impl From<StreamPayload> for StreamSet {
    fn from(payload: StreamPayload) -> Self {
        match payload {
            StreamPayload::Typed(list) => StreamSet::from_typed(list),
            StreamPayload::Keyed(set) => set,
        }
    }
}

fn deserialize_streams<'de, D>(deserializer: D) -> std::result::Result<StreamSet, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<StreamPayload>::deserialize(deserializer)
        .map(|payload| payload.map(StreamSet::from).unwrap_or_default())
}

/// One activity summary with its streams.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotActivity {
    #[serde(flatten)]
    pub summary: ActivitySummary,
    #[serde(default, deserialize_with = "deserialize_streams")]
    pub streams: StreamSet,
}

/// Roster, activities and streams captured for one batch run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub athletes: Vec<Athlete>,
    #[serde(default)]
    pub activities: Vec<SnapshotActivity>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, SnapshotError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| SnapshotError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    pub fn load_from_json(json_data: &str) -> std::result::Result<Self, SnapshotError> {
        serde_json::from_str(json_data).map_err(|e| SnapshotError::ParseError(e.to_string()))
    }

    pub fn summaries(&self) -> Vec<ActivitySummary> {
        self.activities.iter().map(|a| a.summary.clone()).collect()
    }

    /// Split into the roster, the summaries and a stream source.
    pub fn into_parts(self) -> (Vec<Athlete>, Vec<ActivitySummary>, SnapshotSource) {
        let mut summaries = Vec::with_capacity(self.activities.len());
        let mut streams = HashMap::with_capacity(self.activities.len());
        for activity in self.activities {
            streams.insert(activity.summary.id, activity.streams);
            summaries.push(activity.summary);
        }
        (self.athletes, summaries, SnapshotSource { streams })
    }
}

/// In-memory [`StreamSource`] backed by a loaded snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    streams: HashMap<u64, StreamSet>,
}

impl SnapshotSource {
    pub fn new(streams: HashMap<u64, StreamSet>) -> Self {
        Self { streams }
    }
}

#[async_trait]
impl StreamSource for SnapshotSource {
    async fn fetch_streams(&self, activity: &ActivitySummary) -> Result<StreamSet> {
        self.streams
            .get(&activity.id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Streams for activity {}", activity.id)))
    }
}

/// Errors loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse snapshot: {0}")]
    ParseError(String),
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stream::StreamKind;

    const SNAPSHOT: &str = r#"{
        "athletes": [{"athlete_id": 1, "firstname": "Ada"}],
        "activities": [
            {
                "id": 10, "athlete": {"id": 1}, "name": "Keyed", "type": "Ride",
                "distance": 1000.0, "moving_time": 100, "elapsed_time": 100,
                "start_date": "2025-01-02T10:00:00Z",
                "streams": {"time": {"data": [0, 1]}, "distance": {"data": [0, 10]}}
            },
            {
                "id": 11, "athlete": {"id": 1}, "name": "Typed", "type": "Ride",
                "distance": 1000.0, "moving_time": 100, "elapsed_time": 100,
                "start_date": "2025-01-03T10:00:00Z",
                "streams": [{"type": "watts", "data": [100, 200]}, {"type": "latlng", "data": []}]
            },
            {
                "id": 12, "athlete": {"id": 1}, "name": "Bare", "type": "Ride",
                "distance": 1000.0, "moving_time": 100, "elapsed_time": 100,
                "start_date": "2025-01-04T10:00:00Z"
            }
        ]
    }"#;

    #[test]
    fn test_parse_both_stream_formats() {
        let snapshot = Snapshot::load_from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.athletes.len(), 1);
        assert_eq!(snapshot.activities.len(), 3);
        assert_eq!(
            snapshot.activities[0].streams.get(StreamKind::Distance),
            Some(&[0.0, 10.0][..])
        );
        assert_eq!(
            snapshot.activities[1].streams.get(StreamKind::Watts),
            Some(&[100.0, 200.0][..])
        );
        assert_eq!(snapshot.activities[2].streams, StreamSet::default());
    }

    #[test]
    fn test_dropped_samples_do_not_reject_snapshot() {
        let json = r#"{
            "activities": [
                {
                    "id": 20, "athlete": {"id": 1}, "name": "Dropout", "type": "Ride",
                    "distance": 20.0, "moving_time": 2, "elapsed_time": 2,
                    "start_date": "2025-01-05T10:00:00Z",
                    "streams": {"time": {"data": [0, 1, 2]}, "watts": {"data": [100, null, 120]}}
                },
                {
                    "id": 21, "athlete": {"id": 1}, "name": "Typed", "type": "Ride",
                    "distance": 20.0, "moving_time": 2, "elapsed_time": 2,
                    "start_date": "2025-01-06T10:00:00Z",
                    "streams": [{"type": "distance", "data": [0, null, 20]}]
                }
            ]
        }"#;
        let snapshot = Snapshot::load_from_json(json).unwrap();
        assert_eq!(
            snapshot.activities[0].streams.get(StreamKind::Watts),
            Some(&[100.0, 0.0, 120.0][..])
        );
        assert_eq!(
            snapshot.activities[1].streams.get(StreamKind::Distance),
            Some(&[0.0, 0.0, 20.0][..])
        );
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Snapshot::load_from_json("{\"activities\": 3}"),
            Err(SnapshotError::ParseError(_))
        ));
        assert!(matches!(
            Snapshot::load_from_file("/nonexistent/snapshot.json"),
            Err(SnapshotError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_source_lookup() {
        let (_, summaries, source) = Snapshot::load_from_json(SNAPSHOT).unwrap().into_parts();
        let streams = source.fetch_streams(&summaries[0]).await.unwrap();
        assert!(streams.get(StreamKind::Time).is_some());

        let mut unknown = summaries[0].clone();
        unknown.id = 99;
        let err = source.fetch_streams(&unknown).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
