use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::aggregator::sum_counts;
use crate::calendar::DisplayCalendar;
use crate::error::{Result, RollupError};
use crate::types::SensorEvent;

/// Headline numbers for a whole event collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataOverview {
    pub total_events: u64,
    pub unique_locations: usize,
    pub date_range: Option<DateRange>,
    /// `total_events / unique_locations`, rounded half away from zero.
    pub avg_events_per_location: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    /// `3/1/2024 - 3/7/2024`
    pub fn label(&self, calendar: &DisplayCalendar) -> String {
        format!(
            "{} - {}",
            calendar.short_date(&self.start),
            calendar.short_date(&self.end)
        )
    }
}

pub fn compute_overview(
    events: &[SensorEvent],
    calendar: &DisplayCalendar,
) -> Result<DataOverview> {
    let mut total_events = 0u64;
    let mut locations = HashSet::new();
    let mut date_range: Option<DateRange> = None;

    for (index, event) in events.iter().enumerate() {
        if event.location.is_empty() {
            return Err(RollupError::EmptyLocation { index });
        }
        let at = calendar.parse_timestamp(&event.timestamp)?;
        total_events = sum_counts([total_events, event.event_count])?;
        locations.insert(event.location.as_str());

        date_range = Some(match date_range {
            Some(range) => DateRange {
                start: range.start.min(at),
                end: range.end.max(at),
            },
            None => DateRange { start: at, end: at },
        });
    }

    let unique_locations = locations.len();
    let avg_events_per_location = (unique_locations > 0)
        .then(|| (total_events as f64 / unique_locations as f64).round() as u64);

    Ok(DataOverview {
        total_events,
        unique_locations,
        date_range,
        avg_events_per_location,
    })
}
