use std::fs;
use std::io::{Read, Write};

use color_eyre::eyre::{Result, WrapErr};
use rollup_core::SensorEvent;
use tracing::{debug, info};

pub const STDIO: &str = "-";

pub fn read_events(input: &str) -> Result<Vec<SensorEvent>> {
    let content = if input == STDIO {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("Failed to read events from stdin")?;
        buf
    } else {
        fs::read_to_string(input).wrap_err_with(|| format!("Failed to read {}", input))?
    };

    let events = parse_events(&content).wrap_err_with(|| format!("Invalid events in {}", input))?;
    info!(count = events.len(), source = input, "Loaded sensor events");
    Ok(events)
}

pub fn parse_events(content: &str) -> serde_json::Result<Vec<SensorEvent>> {
    let events: Vec<SensorEvent> = serde_json::from_str(content)?;
    debug!(count = events.len(), "Parsed events");
    Ok(events)
}

/// Writes `content` unchanged to `output`, or stdout for `-`.
pub fn write_output(output: &str, content: &[u8]) -> Result<()> {
    if output == STDIO {
        return write_to(std::io::stdout().lock(), content);
    }

    fs::write(output, content).wrap_err_with(|| format!("Failed to write {}", output))
}

fn write_to(mut writer: impl Write, content: &[u8]) -> Result<()> {
    writer.write_all(content)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        let events = parse_events(
            r#"[{"id":"1","timestamp":"2024-03-01T08:00:00Z","location":"A","eventCount":5}]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_count, 5);
    }

    #[test]
    fn test_write_to_keeps_payload_bytes() {
        let payload = b"location,count\nA,1";
        let mut out = Vec::new();
        write_to(&mut out, payload).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn test_write_output_file_matches_payload() {
        let path = std::env::temp_dir().join(format!(
            "rollup-write-output-{}.csv",
            std::process::id()
        ));
        let output = path.to_string_lossy().to_string();
        write_output(&output, b"a,b\n1,2").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n1,2");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_parse_events_rejects_negative_counts() {
        let result = parse_events(
            r#"[{"id":"1","timestamp":"2024-03-01T08:00:00Z","location":"A","eventCount":-5}]"#,
        );
        assert!(result.is_err());
    }
}
