use std::sync::OnceLock;

use crate::aggregator::{compute_daily_stats_with, compute_hourly_stats_with, AggregateOptions};
use crate::error::Result;
use crate::types::{DailyStats, HourlyStats, SensorEvent};

/// An event collection with its rollups computed at most once.
///
/// Both rollups are recomputed in full after [`RollupView::replace_events`].
#[derive(Debug, Default)]
pub struct RollupView {
    events: Vec<SensorEvent>,
    options: AggregateOptions,
    hourly: OnceLock<Vec<HourlyStats>>,
    daily: OnceLock<Vec<DailyStats>>,
}

impl RollupView {
    pub fn new(events: Vec<SensorEvent>, options: AggregateOptions) -> Self {
        Self {
            events,
            options,
            hourly: OnceLock::new(),
            daily: OnceLock::new(),
        }
    }

    pub fn events(&self) -> &[SensorEvent] {
        &self.events
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// Errors are not cached; a failing collection fails on every call.
    pub fn hourly(&self) -> Result<&[HourlyStats]> {
        if let Some(stats) = self.hourly.get() {
            return Ok(stats.as_slice());
        }
        let stats = compute_hourly_stats_with(&self.events, &self.options)?;
        Ok(self.hourly.get_or_init(|| stats).as_slice())
    }

    pub fn daily(&self) -> Result<&[DailyStats]> {
        if let Some(stats) = self.daily.get() {
            return Ok(stats.as_slice());
        }
        let stats = compute_daily_stats_with(&self.events, &self.options)?;
        Ok(self.daily.get_or_init(|| stats).as_slice())
    }

    pub fn is_computed(&self) -> (bool, bool) {
        (self.hourly.get().is_some(), self.daily.get().is_some())
    }

    /// Swaps in a new collection and drops both cached rollups.
    pub fn replace_events(&mut self, events: Vec<SensorEvent>) -> Vec<SensorEvent> {
        self.hourly = OnceLock::new();
        self.daily = OnceLock::new();
        std::mem::replace(&mut self.events, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<SensorEvent> {
        vec![
            SensorEvent::new("1", "2024-03-01T08:00:00Z", "A", 5),
            SensorEvent::new("2", "2024-03-01T08:00:00Z", "B", 3),
        ]
    }

    #[test]
    fn test_rollups_computed_lazily_once() {
        let view = RollupView::new(events(), AggregateOptions::default());
        assert_eq!(view.is_computed(), (false, false));

        let first = view.hourly().unwrap().as_ptr();
        assert_eq!(view.is_computed(), (true, false));
        let second = view.hourly().unwrap().as_ptr();
        assert_eq!(first, second);

        assert_eq!(view.daily().unwrap()[0].total_events, 8);
        assert_eq!(view.is_computed(), (true, true));
    }

    #[test]
    fn test_replace_events_resets_cache() {
        let mut view = RollupView::new(events(), AggregateOptions::default());
        assert_eq!(view.hourly().unwrap()[0].total_events, 8);

        let old = view.replace_events(vec![SensorEvent::new(
            "3",
            "2024-03-02T09:00:00Z",
            "C",
            11,
        )]);
        assert_eq!(old.len(), 2);
        assert_eq!(view.is_computed(), (false, false));
        assert_eq!(view.hourly().unwrap()[0].hour, "Mar 02, 09 AM");
        assert_eq!(view.hourly().unwrap()[0].total_events, 11);
    }

    #[test]
    fn test_invalid_events_fail_every_call() {
        let view = RollupView::new(
            vec![SensorEvent::new("1", "bogus", "A", 1)],
            AggregateOptions::default(),
        );
        assert!(view.hourly().is_err());
        assert!(view.hourly().is_err());
        assert_eq!(view.is_computed(), (false, false));
    }

    #[test]
    fn test_view_is_sync() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<RollupView>();
    }
}
