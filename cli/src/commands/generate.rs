use color_eyre::eyre::{bail, Result};
use rollup_core::sample_data::{generate_events, SampleDataConfig};
use tracing::info;

use crate::source::{write_output, STDIO};

pub fn run(seed: u64, probability: f64, output: Option<&str>) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        bail!("Probability must be between 0 and 1, got {}", probability);
    }

    let config = SampleDataConfig {
        seed,
        report_probability: probability,
        ..Default::default()
    };
    let events = generate_events(&config);
    info!(seed, count = events.len(), "Generated demo events");

    let mut content = serde_json::to_string_pretty(&events)?;
    content.push('\n');
    let output = output.unwrap_or(STDIO);
    write_output(output, content.as_bytes())?;

    if output != STDIO {
        println!("Wrote {} events to: {}", events.len(), output);
    }

    Ok(())
}
