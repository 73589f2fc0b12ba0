//! Fixed display calendar shared by every rollup.
//!
//! Bucket keys are the rendered labels themselves, so the whole system has to
//! agree on one offset and one set of formats for labels to stay byte-identical.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike};

use crate::error::{Result, RollupError};

pub const HOUR_LABEL_FORMAT: &str = "%b %d, %I %p";
pub const DAY_LABEL_FORMAT: &str = "%b %d, %Y";
pub const SHORT_DATE_FORMAT: &str = "%-m/%-d/%Y";

const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCalendar {
    offset: FixedOffset,
}

impl Default for DisplayCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl DisplayCalendar {
    pub fn utc() -> Self {
        Self {
            offset: FixedOffset::east_opt(0).expect("zero offset is in range"),
        }
    }

    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Returns `None` when the offset is a day or more away from UTC.
    pub fn from_utc_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parses an ISO-8601 timestamp into this calendar's offset.
    ///
    /// Accepts RFC 3339 (`2024-03-01T08:00:00Z`), a naive date-time which is
    /// read as wall time in this calendar, or a bare date read as UTC midnight.
    pub fn parse_timestamp(&self, value: &str) -> Result<DateTime<FixedOffset>> {
        let rfc_err = match DateTime::parse_from_rfc3339(value) {
            Ok(dt) => return Ok(dt.with_timezone(&self.offset)),
            Err(e) => e,
        };

        if let Ok(naive) = NaiveDateTime::parse_from_str(value, NAIVE_DATETIME_FORMAT) {
            if let Some(dt) = self.offset.from_local_datetime(&naive).single() {
                return Ok(dt);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(midnight.and_utc().with_timezone(&self.offset));
            }
        }

        Err(RollupError::InvalidTimestamp {
            value: value.to_string(),
            source: rfc_err,
        })
    }

    pub fn hour_label(&self, dt: &DateTime<FixedOffset>) -> String {
        dt.with_timezone(&self.offset)
            .format(HOUR_LABEL_FORMAT)
            .to_string()
    }

    pub fn day_label(&self, dt: &DateTime<FixedOffset>) -> String {
        dt.with_timezone(&self.offset)
            .format(DAY_LABEL_FORMAT)
            .to_string()
    }

    pub fn short_date(&self, dt: &DateTime<FixedOffset>) -> String {
        dt.with_timezone(&self.offset)
            .format(SHORT_DATE_FORMAT)
            .to_string()
    }

    pub fn clock_hour(&self, dt: &DateTime<FixedOffset>) -> u32 {
        dt.with_timezone(&self.offset).hour()
    }
}
