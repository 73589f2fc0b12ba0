mod aggregator;
mod calendar;
mod error;
mod export;
mod overview;
pub mod sample_data;
mod types;
mod view;

pub use aggregator::{
    compute_daily_stats, compute_daily_stats_with, compute_hourly_stats,
    compute_hourly_stats_with, AggregateOptions, BucketOrder, HOURS_PER_DAY,
};
pub use calendar::{DisplayCalendar, DAY_LABEL_FORMAT, HOUR_LABEL_FORMAT};
pub use error::{ErrorKind, Result, RollupError};
pub use export::{
    escape_csv, export_records, export_records_with, to_records, ExportFormat, ExportOptions,
    ExportPayload, DEFAULT_FILE_STEM,
};
pub use overview::{compute_overview, DataOverview, DateRange};
pub use types::{DailyStats, HourlyStats, ParsePeakHourError, PeakHour, Record, SensorEvent};
pub use view::RollupView;
