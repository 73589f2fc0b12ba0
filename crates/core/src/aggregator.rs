use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::DisplayCalendar;
use crate::error::{Result, RollupError};
use crate::types::{DailyStats, HourlyStats, PeakHour, SensorEvent};

/// Divisor for `avg_events_per_hour`, fixed regardless of hours with data.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Order in which buckets come out of an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BucketOrder {
    /// Order in which each bucket's first event was scanned.
    #[default]
    FirstSeen,
    /// By each bucket's earliest instant. Ties keep first-seen order.
    Chronological,
}

impl BucketOrder {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "chronological" | "chrono" | "time" => BucketOrder::Chronological,
            _ => BucketOrder::FirstSeen,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BucketOrder::FirstSeen => "first_seen",
            BucketOrder::Chronological => "chronological",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    pub calendar: DisplayCalendar,
    pub order: BucketOrder,
}

struct TimedEvent<'a> {
    event: &'a SensorEvent,
    at: DateTime<FixedOffset>,
}

struct Bucket<'a> {
    earliest: DateTime<FixedOffset>,
    events: Vec<TimedEvent<'a>>,
}

impl Bucket<'_> {
    fn total_events(&self) -> Result<u64> {
        sum_counts(self.events.iter().map(|e| e.event.event_count))
    }

    fn unique_locations(&self) -> usize {
        self.events
            .iter()
            .map(|e| e.event.location.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Sums event counts, failing rather than wrapping on overflow.
pub(crate) fn sum_counts(counts: impl IntoIterator<Item = u64>) -> Result<u64> {
    counts
        .into_iter()
        .try_fold(0u64, |total, count| total.checked_add(count))
        .ok_or(RollupError::CountOverflow)
}

/// Hourly rollup with the default options (UTC labels, first-seen order).
pub fn compute_hourly_stats(events: &[SensorEvent]) -> Result<Vec<HourlyStats>> {
    compute_hourly_stats_with(events, &AggregateOptions::default())
}

/// Daily rollup with the default options (UTC labels, first-seen order).
pub fn compute_daily_stats(events: &[SensorEvent]) -> Result<Vec<DailyStats>> {
    compute_daily_stats_with(events, &AggregateOptions::default())
}

pub fn compute_hourly_stats_with(
    events: &[SensorEvent],
    options: &AggregateOptions,
) -> Result<Vec<HourlyStats>> {
    let calendar = options.calendar;
    let timed = parse_events(events, &calendar)?;
    let buckets = group_by_label(timed, options.order, |at| calendar.hour_label(at));

    debug!(
        events = events.len(),
        buckets = buckets.len(),
        "Computed hourly buckets"
    );

    buckets
        .into_iter()
        .map(|(hour, bucket)| {
            let total_events = bucket.total_events()?;
            Ok(HourlyStats {
                hour,
                total_events,
                avg_events_per_location: total_events as f64 / bucket.events.len() as f64,
                unique_locations: bucket.unique_locations(),
            })
        })
        .collect()
}

pub fn compute_daily_stats_with(
    events: &[SensorEvent],
    options: &AggregateOptions,
) -> Result<Vec<DailyStats>> {
    let calendar = options.calendar;
    let timed = parse_events(events, &calendar)?;
    let buckets = group_by_label(timed, options.order, |at| calendar.day_label(at));

    debug!(
        events = events.len(),
        buckets = buckets.len(),
        "Computed daily buckets"
    );

    let mut stats = Vec::with_capacity(buckets.len());
    for (date, bucket) in buckets {
        let mut per_hour: IndexMap<u32, u64> = IndexMap::new();
        for timed in &bucket.events {
            let total = per_hour.entry(calendar.clock_hour(&timed.at)).or_insert(0);
            *total = total
                .checked_add(timed.event.event_count)
                .ok_or(RollupError::CountOverflow)?;
        }

        // Buckets are created by their first event, so this never skips.
        let Some(peak_hour) = peak_hour(&per_hour) else {
            continue;
        };

        let total_events = bucket.total_events()?;
        stats.push(DailyStats {
            date,
            total_events,
            avg_events_per_hour: total_events as f64 / HOURS_PER_DAY,
            peak_hour,
            unique_locations: bucket.unique_locations(),
        });
    }

    Ok(stats)
}

/// Highest per-hour total. On a tie the hour inserted first wins.
fn peak_hour(per_hour: &IndexMap<u32, u64>) -> Option<PeakHour> {
    let mut peak: Option<PeakHour> = None;
    for (&hour, &total) in per_hour {
        match peak {
            Some(current) if current.total >= total => {}
            _ => peak = Some(PeakHour { hour, total }),
        }
    }
    peak
}

fn parse_events<'a>(
    events: &'a [SensorEvent],
    calendar: &DisplayCalendar,
) -> Result<Vec<TimedEvent<'a>>> {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            if event.location.is_empty() {
                return Err(RollupError::EmptyLocation { index });
            }
            let at = calendar.parse_timestamp(&event.timestamp)?;
            Ok(TimedEvent { event, at })
        })
        .collect()
}

fn group_by_label<'a>(
    events: Vec<TimedEvent<'a>>,
    order: BucketOrder,
    label: impl Fn(&DateTime<FixedOffset>) -> String,
) -> Vec<(String, Bucket<'a>)> {
    let mut map: IndexMap<String, Bucket<'a>> = IndexMap::new();

    for timed in events {
        let bucket = map.entry(label(&timed.at)).or_insert_with(|| Bucket {
            earliest: timed.at,
            events: Vec::new(),
        });
        if timed.at < bucket.earliest {
            bucket.earliest = timed.at;
        }
        bucket.events.push(timed);
    }

    let mut buckets: Vec<_> = map.into_iter().collect();
    if order == BucketOrder::Chronological {
        buckets.sort_by_key(|(_, bucket)| bucket.earliest);
    }
    buckets
}
