//! Logger setup
//!
//! Lines look like `2024-01-15 10:00:00,123 - customgpt_cli::api - WARN - message`
//! and go to stderr, or to the configured log file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Parse a level name such as `info` or `DEBUG`
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("Invalid log level: {}", level))
}

/// Install the global logger; dependencies only log warnings and above
pub fn init(level: &str, file: Option<&Path>) -> Result<()> {
    let level = parse_level(level)?;

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn.min(level))
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.target(),
                record.level(),
                record.args()
            )
        });

    if let Some(path) = file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Failed to initialise logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("DEBUG").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" off ").unwrap(), LevelFilter::Off);
        assert!(parse_level("loud").is_err());
    }
}
