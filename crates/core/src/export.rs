//! Serialization of tabular records into downloadable payloads.
//!
//! Writing the payload somewhere is left to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::{Result, RollupError};
use crate::types::Record;

pub const DEFAULT_FILE_STEM: &str = "sensor-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated text, header line first.
    #[serde(alias = "delimited")]
    Csv,
    /// Pretty-printed JSON array.
    #[default]
    #[serde(alias = "structured")]
    Json,
}

impl ExportFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = RollupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" | "delimited" => Ok(ExportFormat::Csv),
            "json" | "structured" => Ok(ExportFormat::Json),
            _ => Err(RollupError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Quote CSV fields containing separators, quotes or line breaks.
    /// Off by default so the plain format stays byte-compatible.
    pub quote_delimited: bool,
}

/// Serialized export plus what a caller needs to save it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub payload: Vec<u8>,
    pub media_type: &'static str,
    pub extension: &'static str,
}

impl ExportPayload {
    pub fn suggested_file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

pub fn export_records(records: &[Record], format: ExportFormat) -> Result<ExportPayload> {
    export_records_with(records, format, &ExportOptions::default())
}

pub fn export_records_with(
    records: &[Record],
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<ExportPayload> {
    let first = records.first().ok_or(RollupError::EmptyRecords)?;

    for (index, record) in records.iter().enumerate().skip(1) {
        let same_fields =
            record.len() == first.len() && first.keys().all(|key| record.contains_key(key));
        if !same_fields {
            return Err(RollupError::InconsistentFields { index });
        }
    }

    let content = match format {
        ExportFormat::Csv => to_delimited(first, records, options.quote_delimited),
        ExportFormat::Json => serde_json::to_string_pretty(records)?,
    };

    trace!(
        records = records.len(),
        format = %format,
        bytes = content.len(),
        "Serialized export"
    );

    Ok(ExportPayload {
        payload: content.into_bytes(),
        media_type: format.media_type(),
        extension: format.extension(),
    })
}

/// Converts typed rows into export records, keeping their field order.
pub fn to_records<T: Serialize>(rows: &[T]) -> Result<Vec<Record>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map),
            _ => Err(RollupError::NotARecord { index }),
        })
        .collect()
}

fn to_delimited(header: &Record, records: &[Record], quote: bool) -> String {
    let field = |text: String| if quote { escape_csv(&text) } else { text };

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        header
            .keys()
            .map(|key| field(key.clone()))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        lines.push(
            header
                .keys()
                .map(|key| field(record.get(key).map(value_text).unwrap_or_default()))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(|f| f.to_string()).unwrap_or_default()
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

pub fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_csv_basic() {
        let rows = records(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]));
        let out = export_records(&rows, ExportFormat::Csv).unwrap();

        assert_eq!(out.as_str(), Some("a,b\n1,2\n3,4"));
        assert_eq!(out.media_type, "text/csv");
        assert_eq!(out.extension, "csv");
        assert_eq!(out.suggested_file_name(DEFAULT_FILE_STEM), "sensor-data.csv");
    }

    #[test]
    fn test_csv_keeps_first_record_key_order() {
        let rows = records(json!([{"b": 1, "a": 2}, {"a": 4, "b": 3}]));
        let out = export_records(&rows, ExportFormat::Csv).unwrap();
        assert_eq!(out.as_str(), Some("b,a\n1,2\n3,4"));
    }

    #[test]
    fn test_csv_value_text() {
        let rows = records(json!([{
            "s": "Building A",
            "f": 1.5,
            "whole": 4.0,
            "neg": -2,
            "t": true,
            "n": null,
            "arr": [1, 2]
        }]));
        let out = export_records(&rows, ExportFormat::Csv).unwrap();
        assert_eq!(
            out.as_str(),
            Some("s,f,whole,neg,t,n,arr\nBuilding A,1.5,4,-2,true,,[1,2]")
        );
    }

    #[test]
    fn test_csv_does_not_escape_by_default() {
        let rows = records(json!([{"name": "a,b", "note": "say \"hi\""}]));
        let out = export_records(&rows, ExportFormat::Csv).unwrap();
        assert_eq!(out.as_str(), Some("name,note\na,b,say \"hi\""));
    }

    #[test]
    fn test_csv_quoting_option() {
        let rows = records(json!([{"name": "a,b", "note": "say \"hi\"", "plain": "x"}]));
        let options = ExportOptions {
            quote_delimited: true,
        };
        let out = export_records_with(&rows, ExportFormat::Csv, &options).unwrap();
        assert_eq!(
            out.as_str(),
            Some("name,note,plain\n\"a,b\",\"say \"\"hi\"\"\",x")
        );
    }

    #[test]
    fn test_json_pretty_two_space_indent() {
        let rows = records(json!([{"a": 1, "b": "x"}]));
        let out = export_records(&rows, ExportFormat::Json).unwrap();

        assert_eq!(out.as_str(), Some("[\n  {\n    \"a\": 1,\n    \"b\": \"x\"\n  }\n]"));
        assert_eq!(out.media_type, "application/json");
        assert_eq!(out.extension, "json");
    }

    #[test]
    fn test_json_round_trip() {
        let rows = records(json!([
            {"z": 1, "a": [1, {"k": null}], "m": 2.25},
            {"z": 2, "a": [], "m": -0.5}
        ]));
        let out = export_records(&rows, ExportFormat::Json).unwrap();
        let back: Vec<Record> = serde_json::from_slice(&out.payload).unwrap();
        assert_eq!(back, rows);

        let keys: Vec<_> = back[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_whole_floats_differ_between_formats() {
        let rows = records(json!([{"avg": 4.0, "n": 4}]));

        let json = export_records(&rows, ExportFormat::Json).unwrap();
        let text = json.as_str().unwrap();
        assert!(text.contains("\"avg\": 4.0"));
        assert!(text.contains("\"n\": 4\n"));
        let back: Vec<Record> = serde_json::from_slice(&json.payload).unwrap();
        assert_eq!(back, rows);

        let csv = export_records(&rows, ExportFormat::Csv).unwrap();
        assert_eq!(csv.as_str(), Some("avg,n\n4,4"));
    }

    #[test]
    fn test_empty_records_rejected() {
        for format in [ExportFormat::Csv, ExportFormat::Json] {
            let err = export_records(&[], format).unwrap_err();
            assert!(matches!(err, RollupError::EmptyRecords));
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn test_inconsistent_fields_rejected() {
        let rows = records(json!([{"a": 1, "b": 2}, {"a": 3}]));
        let err = export_records(&rows, ExportFormat::Csv).unwrap_err();
        assert!(matches!(err, RollupError::InconsistentFields { index: 1 }));

        let rows = records(json!([{"a": 1}, {"a": 3}, {"c": 3}]));
        let err = export_records(&rows, ExportFormat::Json).unwrap_err();
        assert!(matches!(err, RollupError::InconsistentFields { index: 2 }));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("delimited".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("structured".parse::<ExportFormat>().unwrap(), ExportFormat::Json);

        let err = "xml".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, RollupError::UnsupportedFormat(ref f) if f == "xml"));
    }

    #[test]
    fn test_to_records_rejects_scalars() {
        let err = to_records(&[1, 2]).unwrap_err();
        assert!(matches!(err, RollupError::NotARecord { index: 0 }));
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
    }
}
