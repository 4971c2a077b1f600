// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-activity telemetry streams.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The stream types the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Distance,
    Time,
    Watts,
    Heartrate,
}

impl StreamKind {
    /// Parse a Strava stream type tag. Unknown tags are ignored by callers.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "distance" => Some(Self::Distance),
            "time" => Some(Self::Time),
            "watts" => Some(Self::Watts),
            "heartrate" => Some(Self::Heartrate),
            _ => None,
        }
    }

    /// Cumulative streams never step back to zero mid-ride.
    fn is_cumulative(self) -> bool {
        matches!(self, Self::Distance | Self::Time)
    }

    /// Replace dropped samples without shifting the rest of the series.
    ///
    /// A gap in a cumulative stream repeats the previous sample (zero before
    /// the first one); a gap in a power or heart rate stream reads as zero.
    pub fn fill_gaps(self, samples: Vec<Option<f64>>) -> Vec<f64> {
        let mut last = 0.0;
        samples
            .into_iter()
            .map(|sample| match sample {
                Some(value) => {
                    last = value;
                    value
                }
                None if self.is_cumulative() => last,
                None => 0.0,
            })
            .collect()
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Distance => "distance",
            Self::Time => "time",
            Self::Watts => "watts",
            Self::Heartrate => "heartrate",
        };
        f.write_str(tag)
    }
}

/// One named series; Strava's extra fields (`series_type`, `resolution`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    #[serde(default)]
    pub data: Vec<f64>,
}

/// Keyed stream as received, before gaps are filled.
#[derive(Deserialize)]
struct RawStream {
    #[serde(default)]
    data: Vec<Option<f64>>,
}

fn keyed_stream<'de, D>(deserializer: D, kind: StreamKind) -> Result<Option<Stream>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawStream>::deserialize(deserializer)?.map(|raw| Stream {
        data: kind.fill_gaps(raw.data),
    }))
}

fn distance_stream<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Stream>, D::Error> {
    keyed_stream(d, StreamKind::Distance)
}

fn time_stream<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Stream>, D::Error> {
    keyed_stream(d, StreamKind::Time)
}

fn watts_stream<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Stream>, D::Error> {
    keyed_stream(d, StreamKind::Watts)
}

fn heartrate_stream<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Stream>, D::Error> {
    keyed_stream(d, StreamKind::Heartrate)
}

/// A stream in the list form of the Strava streams endpoint.
///
/// `data` stays untyped because some streams (`latlng`) are not scalar.
#[derive(Debug, Clone, Deserialize)]
pub struct TypedStream {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl TypedStream {
    /// Scalar samples; `null` and non-numeric entries become gaps.
    fn samples(&self, kind: StreamKind) -> Vec<f64> {
        let raw = self
            .data
            .as_array()
            .map(|values| values.iter().map(serde_json::Value::as_f64).collect())
            .unwrap_or_default();
        kind.fill_gaps(raw)
    }
}

/// All streams of one activity, in the keyed (`key_by_type=true`) form.
///
/// Streams of different names may differ in length and cadence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSet {
    #[serde(
        default,
        deserialize_with = "distance_stream",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance: Option<Stream>,
    #[serde(
        default,
        deserialize_with = "time_stream",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<Stream>,
    #[serde(
        default,
        deserialize_with = "watts_stream",
        skip_serializing_if = "Option::is_none"
    )]
    pub watts: Option<Stream>,
    #[serde(
        default,
        deserialize_with = "heartrate_stream",
        skip_serializing_if = "Option::is_none"
    )]
    pub heartrate: Option<Stream>,
}

impl StreamSet {
    /// Build from the list form; unknown stream types are dropped.
    pub fn from_typed(streams: Vec<TypedStream>) -> Self {
        streams
            .into_iter()
            .filter_map(|s| StreamKind::from_tag(&s.kind).map(|kind| (kind, s.samples(kind))))
            .fold(Self::default(), |set, (kind, data)| set.with(kind, data))
    }

    /// Return a copy with the given stream replaced.
    pub fn with(mut self, kind: StreamKind, data: Vec<f64>) -> Self {
        let stream = Some(Stream { data });
        match kind {
            StreamKind::Distance => self.distance = stream,
            StreamKind::Time => self.time = stream,
            StreamKind::Watts => self.watts = stream,
            StreamKind::Heartrate => self.heartrate = stream,
        }
        self
    }

    /// Samples of a stream, or `None` when absent or empty.
    pub fn get(&self, kind: StreamKind) -> Option<&[f64]> {
        let stream = match kind {
            StreamKind::Distance => self.distance.as_ref(),
            StreamKind::Time => self.time.as_ref(),
            StreamKind::Watts => self.watts.as_ref(),
            StreamKind::Heartrate => self.heartrate.as_ref(),
        };
        stream
            .map(|s| s.data.as_slice())
            .filter(|data| !data.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyed_streams() {
        let json = r#"{
            "distance": {"data": [0.0, 5.1, 10.4], "series_type": "distance", "resolution": "high"},
            "time": {"data": [0, 1, 2]},
            "watts": {"data": []}
        }"#;
        let set: StreamSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.get(StreamKind::Distance), Some(&[0.0, 5.1, 10.4][..]));
        assert_eq!(set.get(StreamKind::Time).map(<[f64]>::len), Some(3));
        assert_eq!(set.get(StreamKind::Watts), None);
        assert_eq!(set.get(StreamKind::Heartrate), None);
    }

    #[test]
    fn test_from_typed_drops_unknown_streams() {
        let streams = vec![
            TypedStream {
                kind: "heartrate".to_string(),
                data: serde_json::json!([120, 121]),
            },
            TypedStream {
                kind: "latlng".to_string(),
                data: serde_json::json!([[37.4, -122.1], [37.5, -122.2]]),
            },
        ];
        let set = StreamSet::from_typed(streams);
        assert_eq!(set.get(StreamKind::Heartrate), Some(&[120.0, 121.0][..]));
        assert_eq!(set, StreamSet::default().with(StreamKind::Heartrate, vec![120.0, 121.0]));
    }

    #[test]
    fn test_keyed_nulls_keep_alignment() {
        let json = r#"{
            "time": {"data": [0, 1, 2, 3]},
            "distance": {"data": [null, 5.0, null, 15.0]},
            "watts": {"data": [100, null, 120, 130]}
        }"#;
        let set: StreamSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.get(StreamKind::Watts), Some(&[100.0, 0.0, 120.0, 130.0][..]));
        assert_eq!(set.get(StreamKind::Distance), Some(&[0.0, 5.0, 5.0, 15.0][..]));
        assert_eq!(set.get(StreamKind::Time).map(<[f64]>::len), Some(4));
    }

    #[test]
    fn test_typed_nulls_keep_alignment() {
        let json = r#"[
            {"type": "time", "data": [0, 1, 2]},
            {"type": "watts", "data": [100, null, 120]},
            {"type": "heartrate", "data": [null, 140, 141]},
            {"type": "latlng", "data": [[37.4, -122.1], null, [37.5, -122.2]]}
        ]"#;
        let streams: Vec<TypedStream> = serde_json::from_str(json).unwrap();
        let set = StreamSet::from_typed(streams);
        assert_eq!(set.get(StreamKind::Watts), Some(&[100.0, 0.0, 120.0][..]));
        assert_eq!(set.get(StreamKind::Heartrate), Some(&[0.0, 140.0, 141.0][..]));
        assert_eq!(set.get(StreamKind::Time), Some(&[0.0, 1.0, 2.0][..]));
    }

    #[test]
    fn test_fill_gaps() {
        let raw = vec![None, Some(3.0), None, None, Some(9.0)];
        assert_eq!(
            StreamKind::Time.fill_gaps(raw.clone()),
            [0.0, 3.0, 3.0, 3.0, 9.0]
        );
        assert_eq!(StreamKind::Watts.fill_gaps(raw), [0.0, 3.0, 0.0, 0.0, 9.0]);
    }
}
