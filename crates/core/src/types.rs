use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single sensor reading: how many events a location reported at an instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorEvent {
    /// Opaque identifier, only meaningful to whoever displays the event.
    pub id: String,
    /// ISO-8601 date-time, e.g. `2024-03-01T08:00:00Z`.
    pub timestamp: String,
    pub location: String,
    pub event_count: u64,
}

impl SensorEvent {
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        location: impl Into<String>,
        event_count: u64,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            location: location.into(),
            event_count,
        }
    }
}

/// Rollup row for one hour bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyStats {
    /// Bucket label, e.g. `Mar 01, 08 AM`. Also the grouping key.
    pub hour: String,
    pub total_events: u64,
    /// Total divided by the number of events in the bucket (not by locations).
    pub avg_events_per_location: f64,
    pub unique_locations: usize,
}

/// Rollup row for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// Day label, e.g. `Mar 01, 2024`. Also the grouping key.
    pub date: String,
    pub total_events: u64,
    /// Always `total_events / 24`, however many hours carry data.
    pub avg_events_per_hour: f64,
    pub peak_hour: PeakHour,
    pub unique_locations: usize,
}

/// Busiest clock hour of a day and the events summed in it.
///
/// Serialized as its display form, `1:00 (30 events)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakHour {
    pub hour: u32,
    pub total: u64,
}

impl fmt::Display for PeakHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00 ({} events)", self.hour, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid peak hour label: {0:?}")]
pub struct ParsePeakHourError(String);

impl FromStr for PeakHour {
    type Err = ParsePeakHourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePeakHourError(s.to_string());

        let (hour, rest) = s.split_once(":00 (").ok_or_else(err)?;
        let total = rest.strip_suffix(" events)").ok_or_else(err)?;

        let hour: u32 = hour.parse().map_err(|_| err())?;
        if hour > 23 {
            return Err(err());
        }

        Ok(PeakHour {
            hour,
            total: total.parse().map_err(|_| err())?,
        })
    }
}

impl Serialize for PeakHour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeakHour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A flat, ordered key-value row as consumed by the exporter.
pub type Record = serde_json::Map<String, serde_json::Value>;
