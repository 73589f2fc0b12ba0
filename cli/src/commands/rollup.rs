use std::fmt::Write;

use color_eyre::eyre::Result;
use rollup_core::{
    compute_daily_stats_with, compute_hourly_stats_with, compute_overview, AggregateOptions,
    DailyStats, DataOverview, DisplayCalendar, HourlyStats,
};

use crate::source::read_events;

pub fn run_hourly(input: &str, json: bool, options: &AggregateOptions) -> Result<()> {
    let events = read_events(input)?;
    let stats = compute_hourly_stats_with(&events, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_hourly(&stats));
    }
    Ok(())
}

pub fn run_daily(input: &str, json: bool, options: &AggregateOptions) -> Result<()> {
    let events = read_events(input)?;
    let stats = compute_daily_stats_with(&events, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_daily(&stats));
    }
    Ok(())
}

pub fn run_summary(input: &str, calendar: &DisplayCalendar) -> Result<()> {
    let events = read_events(input)?;
    let overview = compute_overview(&events, calendar)?;
    print!("{}", render_overview(&overview, calendar));
    Ok(())
}

pub fn render_hourly(stats: &[HourlyStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hourly Summary ({} buckets)", stats.len());
    let _ = writeln!(out, "{}", "=".repeat(70));

    if stats.is_empty() {
        let _ = writeln!(out, "No events.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<16} {:>14} {:>20} {:>16}",
        "Hour", "Total Events", "Avg Events/Location", "Unique Locations"
    );
    let _ = writeln!(out, "{}", "-".repeat(70));
    for row in stats {
        let _ = writeln!(
            out,
            "{:<16} {:>14} {:>20.2} {:>16}",
            row.hour, row.total_events, row.avg_events_per_location, row.unique_locations
        );
    }
    out
}

pub fn render_daily(stats: &[DailyStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daily Summary ({} days)", stats.len());
    let _ = writeln!(out, "{}", "=".repeat(86));

    if stats.is_empty() {
        let _ = writeln!(out, "No events.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<14} {:>14} {:>16} {:<22} {:>16}",
        "Date", "Total Events", "Avg Events/Hour", "Peak Hour", "Unique Locations"
    );
    let _ = writeln!(out, "{}", "-".repeat(86));
    for row in stats {
        let _ = writeln!(
            out,
            "{:<14} {:>14} {:>16.2} {:<22} {:>16}",
            row.date,
            row.total_events,
            row.avg_events_per_hour,
            row.peak_hour.to_string(),
            row.unique_locations
        );
    }
    out
}

pub fn render_overview(overview: &DataOverview, calendar: &DisplayCalendar) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Data Overview");
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out, "Total events:          {}", overview.total_events);
    let _ = writeln!(out, "Unique locations:      {}", overview.unique_locations);

    match overview.date_range {
        Some(range) => {
            let _ = writeln!(out, "Date range:            {}", range.label(calendar));
        }
        None => {
            let _ = writeln!(out, "Date range:            -");
        }
    }

    match overview.avg_events_per_location {
        Some(avg) => {
            let _ = writeln!(out, "Avg events/location:   {}", avg);
        }
        None => {
            let _ = writeln!(out, "Avg events/location:   -");
        }
    }
    out
}
