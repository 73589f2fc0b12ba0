use color_eyre::eyre::{Result, WrapErr};

use crate::config;
use crate::logging;

pub fn run(lines: usize) -> Result<()> {
    let Some(path) = logging::log_files().pop() else {
        println!("No log files found in {:?}", config::runtime_dir());
        println!("Set `log_to_file = true` in the config to keep logs on disk.");
        return Ok(());
    };

    let content = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read log file {:?}", path))?;

    for line in tail(&content, lines) {
        println!("{}", line);
    }

    Ok(())
}

fn tail(content: &str, lines: usize) -> impl Iterator<Item = &str> {
    let all: Vec<&str> = content.lines().collect();
    let skip = all.len().saturating_sub(lines);
    all.into_iter().skip(skip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail() {
        let content = "a\nb\nc\nd";
        assert_eq!(tail(content, 2).collect::<Vec<_>>(), vec!["c", "d"]);
        assert_eq!(tail(content, 10).count(), 4);
        assert_eq!(tail(content, 0).count(), 0);
    }
}
