use std::fs;
use std::path::PathBuf;

use rollup_core::{
    AggregateOptions, BucketOrder, DisplayCalendar, ExportFormat, ExportOptions,
    DEFAULT_FILE_STEM,
};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "sensor-rollup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "off" | "none" => LogLevel::Off,
            "error" => LogLevel::Error,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Warn,
        }
    }

    pub fn as_tracing_level(&self) -> Option<tracing::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Trace => Some(tracing::Level::TRACE),
        }
    }
}

fn default_file_stem() -> String {
    DEFAULT_FILE_STEM.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub quote_delimited: bool,
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            quote_delimited: false,
            file_stem: default_file_stem(),
        }
    }
}

impl ExportConfig {
    pub fn options(&self, quote_override: bool) -> ExportOptions {
        ExportOptions {
            quote_delimited: self.quote_delimited || quote_override,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserConfig {
    /// Offset of the display calendar used for hour and day labels.
    pub utc_offset_minutes: i32,
    pub order: BucketOrder,
    pub log_level: LogLevel,
    pub log_to_file: bool,
    #[serde(default)]
    pub export: ExportConfig,
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join(APP_DIR)
}

pub fn runtime_dir() -> PathBuf {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(APP_DIR)
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl UserConfig {
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(content: &str) -> Self {
        toml::from_str(content).unwrap_or_default()
    }

    pub fn save(&self) -> std::io::Result<()> {
        fs::create_dir_all(config_dir())?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(config_path(), content)
    }

    /// Aggregation options, with `--utc-offset` taking precedence over the file.
    /// `None` when the offset is a full day or more.
    pub fn aggregate_options(&self, offset_override: Option<i32>) -> Option<AggregateOptions> {
        let minutes = offset_override.unwrap_or(self.utc_offset_minutes);
        Some(AggregateOptions {
            calendar: DisplayCalendar::from_utc_offset_minutes(minutes)?,
            order: self.order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = UserConfig::parse(
            r#"
utc_offset_minutes = -300
order = "chronological"

[export]
format = "csv"
"#,
        );

        assert_eq!(config.utc_offset_minutes, -300);
        assert_eq!(config.order, BucketOrder::Chronological);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.export.format, ExportFormat::Csv);
        assert_eq!(config.export.file_stem, "sensor-data");
        assert!(!config.export.quote_delimited);
    }

    #[test]
    fn test_parse_garbage_falls_back_to_defaults() {
        assert_eq!(UserConfig::parse("utc_offset_minutes = ["), UserConfig::default());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = UserConfig::default();
        config.export.quote_delimited = true;
        config.log_level = LogLevel::Debug;

        let content = toml::to_string_pretty(&config).unwrap();
        assert_eq!(UserConfig::parse(&content), config);
    }

    #[test]
    fn test_aggregate_options_override() {
        let config = UserConfig {
            utc_offset_minutes: 60,
            ..Default::default()
        };

        let options = config.aggregate_options(None).unwrap();
        assert_eq!(options.calendar.offset().local_minus_utc(), 3600);

        let options = config.aggregate_options(Some(-120)).unwrap();
        assert_eq!(options.calendar.offset().local_minus_utc(), -7200);

        assert!(config.aggregate_options(Some(1440)).is_none());
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("none"), LogLevel::Off);
        assert_eq!(LogLevel::from_str("loud"), LogLevel::Warn);
        assert!(LogLevel::Off.as_tracing_level().is_none());
    }
}
