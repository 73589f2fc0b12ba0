use bytesize::ByteSize;
use color_eyre::eyre::Result;
use rollup_core::{
    compute_daily_stats_with, compute_hourly_stats_with, export_records_with, to_records,
    AggregateOptions, ExportFormat, ExportOptions, ExportPayload, Record, SensorEvent,
};
use tracing::info;

use crate::cli::ExportView;
use crate::config::ExportConfig;
use crate::source::{read_events, write_output, STDIO};

pub struct ExportRequest<'a> {
    pub input: &'a str,
    pub view: ExportView,
    pub format: Option<&'a str>,
    pub output: Option<&'a str>,
    pub quote: bool,
}

pub fn run(
    request: ExportRequest<'_>,
    config: &ExportConfig,
    options: &AggregateOptions,
) -> Result<()> {
    let format = match request.format {
        Some(f) => f.parse::<ExportFormat>()?,
        None => config.format,
    };

    let events = read_events(request.input)?;
    let payload = build_payload(
        &events,
        request.view,
        format,
        options,
        &config.options(request.quote),
    )?;

    let output = request
        .output
        .map(String::from)
        .unwrap_or_else(|| payload.suggested_file_name(&config.file_stem));

    write_output(&output, &payload.payload)?;

    info!(
        view = ?request.view,
        media_type = payload.media_type,
        bytes = payload.len(),
        "Export written"
    );

    if output != STDIO {
        println!(
            "Exported {} ({}) to: {}",
            ByteSize::b(payload.len() as u64),
            payload.media_type,
            output
        );
    }

    Ok(())
}

pub fn build_payload(
    events: &[SensorEvent],
    view: ExportView,
    format: ExportFormat,
    options: &AggregateOptions,
    export_options: &ExportOptions,
) -> Result<ExportPayload> {
    let records: Vec<Record> = match view {
        ExportView::Raw => to_records(events)?,
        ExportView::Hourly => to_records(&compute_hourly_stats_with(events, options)?)?,
        ExportView::Daily => to_records(&compute_daily_stats_with(events, options)?)?,
    };

    Ok(export_records_with(&records, format, export_options)?)
}
