use clap::{Args, Parser, Subcommand, ValueEnum};

/// Where to read sensor events from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// JSON array of sensor events; `-` reads stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportView {
    /// The events as loaded
    Raw,
    Hourly,
    Daily,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Roll events up per hour
    #[command(alias = "h")]
    Hourly {
        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Roll events up per day, with the peak hour of each day
    #[command(alias = "d")]
    Daily {
        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Totals, locations and date range of an events file
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Export events or a rollup as CSV or JSON
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// What to export
        #[arg(long, value_enum, default_value = "raw")]
        view: ExportView,

        /// Output format: csv, json (defaults to the configured format)
        #[arg(short, long)]
        format: Option<String>,

        /// Output file; `-` writes to stdout (defaults to <file_stem>.<ext>)
        #[arg(short, long)]
        output: Option<String>,

        /// Quote CSV fields that contain commas, quotes or line breaks
        #[arg(long)]
        quote: bool,
    },

    /// Write a reproducible set of demo events
    #[command(alias = "gen")]
    Generate {
        /// Random seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Chance that a location reports in a given hour
        #[arg(short, long, default_value_t = 0.7)]
        probability: f64,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show or reset the configuration
    Config {
        /// Print the config file path only
        #[arg(long)]
        path: bool,

        /// Reset the config to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Show the latest log file
    Logs {
        /// Number of lines to show
        #[arg(short, long, default_value_t = 50)]
        lines: usize,
    },
}

/// Hourly and daily rollups of sensor event counts
#[derive(Debug, Parser)]
#[command(name = "rollup", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Display calendar offset from UTC in minutes (overrides config)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub utc_offset: Option<i32>,
}
