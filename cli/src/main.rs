mod cli;
mod commands;
mod config;
mod logging;
mod source;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};

use cli::{Cli, Commands};
use commands::export::ExportRequest;
use config::{LogLevel, UserConfig};
use logging::LogMode;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = UserConfig::load();
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);
    let _guard = logging::init(
        config.log_level,
        LogMode::from_config(config.log_to_file),
        log_level_override,
    );

    // Resolved lazily so `config --reset` still works with a broken offset.
    let options = || {
        config.aggregate_options(cli.utc_offset).ok_or_else(|| {
            eyre!(
                "UTC offset must be less than a day, got {} minutes",
                cli.utc_offset.unwrap_or(config.utc_offset_minutes)
            )
        })
    };

    match cli.command {
        Commands::Hourly { source, json } => {
            commands::rollup::run_hourly(&source.input, json, &options()?)
        }
        Commands::Daily { source, json } => {
            commands::rollup::run_daily(&source.input, json, &options()?)
        }
        Commands::Summary { source } => {
            commands::rollup::run_summary(&source.input, &options()?.calendar)
        }
        Commands::Export {
            source,
            view,
            format,
            output,
            quote,
        } => commands::export::run(
            ExportRequest {
                input: &source.input,
                view,
                format: format.as_deref(),
                output: output.as_deref(),
                quote,
            },
            &config.export,
            &options()?,
        ),
        Commands::Generate {
            seed,
            probability,
            output,
        } => commands::generate::run(seed, probability, output.as_deref()),
        Commands::Config { path, reset } => commands::config::run(path, reset),
        Commands::Logs { lines } => commands::logs::run(lines),
    }
}
